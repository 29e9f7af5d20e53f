//! # Transport
//!
//! The boundary to the HTTP stack. Generated clients are generic over
//! [`Transport`]; [`UreqTransport`] is the blocking default.

use crate::error::{ClientError, ClientResult};
use crate::http::{HttpRequest, HttpResponse};
use crate::observer::RequestObserver;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Performs one HTTP exchange.
///
/// Any status is a successful exchange; only failures to talk to the server
/// are errors here.
pub trait Transport {
    /// Sends `request` and returns the response as received.
    fn send(&self, request: &HttpRequest) -> ClientResult<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: &HttpRequest) -> ClientResult<HttpResponse> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> ClientResult<HttpResponse> {
        (**self).send(request)
    }
}

/// `ureq`-backed transport sending JSON with an optional static bearer token.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    bearer_token: Option<String>,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqTransport {
    /// Creates a transport that reports every status as a response.
    pub fn new() -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            bearer_token: None,
        }
    }

    /// Sends `Authorization: Bearer <token>` with every request.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> ClientResult<HttpResponse> {
        let mut builder = ureq::http::Request::builder()
            .method(request.method.as_str())
            .uri(request.uri.as_str())
            .header("Accept", "application/json");
        if let Some(token) = &self.bearer_token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let sent = match &request.body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(body.as_str())
                .map_err(|e| ClientError::Transport(e.to_string()))
                .and_then(|outgoing| transport_error(self.agent.run(outgoing))),
            None => builder
                .body(())
                .map_err(|e| ClientError::Transport(e.to_string()))
                .and_then(|outgoing| transport_error(self.agent.run(outgoing))),
        };

        let mut incoming = sent?;
        let status = incoming.status().as_u16();
        let body = incoming
            .body_mut()
            .read_to_string()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}

fn transport_error<T>(result: Result<T, ureq::Error>) -> ClientResult<T> {
    result.map_err(|e| ClientError::Transport(e.to_string()))
}

/// Sends `request`, notifies `observer`, and turns non-2xx into
/// [`ClientError::Status`].
pub fn execute<T: Transport + ?Sized>(
    transport: &T,
    request: &HttpRequest,
    observer: Option<&dyn RequestObserver>,
) -> ClientResult<HttpResponse> {
    tracing::debug!("{} {}", request.method, request.uri);
    if let Some(observer) = observer {
        observer.on_request(request);
    }
    let response = transport.send(request)?;
    if let Some(observer) = observer {
        observer.on_response(request, &response);
    }
    tracing::debug!("{} {} -> {}", request.method, request.uri, response.status);

    if !response.is_success() {
        return Err(ClientError::Status {
            status: response.status,
            body: response.body,
        });
    }
    Ok(response)
}

/// Decodes a success body. An empty body or JSON `null` is
/// [`ClientError::EmptyBody`].
pub fn decode_json<R: DeserializeOwned>(response: &HttpResponse) -> ClientResult<R> {
    let text = response.body.trim();
    if text.is_empty() || text == "null" {
        return Err(ClientError::EmptyBody);
    }
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::Mutex;
    use url::Url;

    struct Fixed(u16, &'static str);

    impl Transport for Fixed {
        fn send(&self, _request: &HttpRequest) -> ClientResult<HttpResponse> {
            Ok(HttpResponse::new(self.0, self.1))
        }
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl RequestObserver for Recorder {
        fn on_request(&self, request: &HttpRequest) {
            self.0.lock().unwrap().push(format!("request {}", request.method));
        }

        fn on_response(&self, _request: &HttpRequest, response: &HttpResponse) {
            self.0.lock().unwrap().push(format!("response {}", response.status));
        }
    }

    fn request() -> HttpRequest {
        HttpRequest::new(Method::Get, Url::parse("http://localhost/x").unwrap())
    }

    #[test]
    fn test_execute_maps_status_and_notifies() {
        let recorder = Recorder::default();
        let err = execute(&Fixed(503, "busy"), &request(), Some(&recorder)).unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 503, ref body } if body == "busy"));
        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec!["request GET".to_string(), "response 503".to_string()]
        );
    }

    #[test]
    fn test_decode_json() {
        let value: Vec<i32> = decode_json(&HttpResponse::new(200, "[1,2]")).unwrap();
        assert_eq!(value, vec![1, 2]);

        let empty = decode_json::<Vec<i32>>(&HttpResponse::new(200, "  "));
        assert!(matches!(empty, Err(ClientError::EmptyBody)));
        let null = decode_json::<Vec<i32>>(&HttpResponse::new(200, "null"));
        assert!(matches!(null, Err(ClientError::EmptyBody)));
        let malformed = decode_json::<Vec<i32>>(&HttpResponse::new(200, "{"));
        assert!(matches!(malformed, Err(ClientError::Deserialize(_))));
    }

    #[test]
    fn test_ureq_transport_round_trip() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut head = Vec::new();
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap();
                }
                head.push(line.trim_end().to_string());
            }
            let mut body = vec![0; content_length];
            reader.read_exact(&mut body).unwrap();

            let reply = "{\"ok\":true}";
            let mut stream = reader.into_inner();
            write!(
                stream,
                "HTTP/1.1 404 Not Found\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                reply.len(),
                reply
            )
            .unwrap();
            (head, String::from_utf8(body).unwrap())
        });

        let transport = UreqTransport::new().with_bearer_token("secret");
        let uri = Url::parse(&format!("http://{}/widgets", addr)).unwrap();
        let outgoing = HttpRequest::new(Method::Post, uri)
            .with_json(&serde_json::json!({"name": "w"}))
            .unwrap();
        let response = transport.send(&outgoing).unwrap();

        assert_eq!(response.status, 404);
        assert_eq!(response.body, "{\"ok\":true}");

        let (head, body) = server.join().unwrap();
        assert!(head[0].starts_with("POST /widgets"));
        assert!(head
            .iter()
            .any(|h| h.eq_ignore_ascii_case("authorization: Bearer secret")));
        assert_eq!(body, "{\"name\":\"w\"}");
    }
}
