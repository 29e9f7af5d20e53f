//! Generated client for Widget Store.
//!
//! Generated by `oasgen` from `openapi.yaml`. Do not edit by hand.

#![allow(clippy::all, deprecated)]

use oasgen_runtime as rt;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NewWidget {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Default for NewWidget {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: None,
            tags: None,
        }
    }
}

/// A widget in the store.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Widget {
    pub id: String,
    pub kind: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<WidgetSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f32>,
}

impl Default for Widget {
    fn default() -> Self {
        Self {
            id: String::new(),
            kind: String::from("widget"),
            name: String::new(),
            color: None,
            size: None,
            weight: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Links {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl Default for Links {
    fn default() -> Self {
        Self {
            next: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WidgetPage {
    pub items: Vec<Widget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

impl Default for WidgetPage {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            links: None,
        }
    }
}

impl rt::Paginated for WidgetPage {
    fn next_link(&self) -> Option<&str> {
        self.links.as_ref().and_then(|links| links.next.as_deref()).filter(|next| !next.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum Color {
    #[default]
    #[serde(rename = "RED")]
    Red,
    #[serde(rename = "GREEN")]
    Green,
    #[serde(rename = "dark-blue")]
    DarkBlue,
}

impl Color {
    /// Every member in declared order.
    pub const ALL: [Color; 3] = [Color::Red, Color::Green, Color::DarkBlue];

    /// The wire literal of this member.
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "RED",
            Color::Green => "GREEN",
            Color::DarkBlue => "dark-blue",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Color {
    type Err = rt::UnknownEnumValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "RED" => Ok(Color::Red),
            "GREEN" => Ok(Color::Green),
            "dark-blue" => Ok(Color::DarkBlue),
            _ => Err(rt::UnknownEnumValue::new("Color", value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum WidgetSize {
    #[default]
    #[serde(rename = "small")]
    Small,
    #[serde(rename = "large")]
    Large,
}

impl WidgetSize {
    /// Every member in declared order.
    pub const ALL: [WidgetSize; 2] = [WidgetSize::Small, WidgetSize::Large];

    /// The wire literal of this member.
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetSize::Small => "small",
            WidgetSize::Large => "large",
        }
    }
}

impl std::fmt::Display for WidgetSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WidgetSize {
    type Err = rt::UnknownEnumValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "small" => Ok(WidgetSize::Small),
            "large" => Ok(WidgetSize::Large),
            _ => Err(rt::UnknownEnumValue::new("WidgetSize", value)),
        }
    }
}

/// Client for Widget Store.
///
/// Every method retries failed attempts; `retries: None` uses the default budget.
#[derive(Debug, Clone)]
pub struct ApiClient<T = rt::UreqTransport> {
    base_url: rt::Url,
    transport: T,
}

impl ApiClient<rt::UreqTransport> {
    /// Creates a client for `base_url` over the default transport.
    pub fn connect(base_url: &str) -> Result<Self, rt::ClientError> {
        Ok(Self::new(rt::Url::parse(base_url)?, rt::UreqTransport::new()))
    }
}

impl<T: rt::Transport> ApiClient<T> {
    /// Creates a client over an explicit transport.
    pub fn new(base_url: rt::Url, transport: T) -> Self {
        Self { base_url, transport }
    }

    /// The address every path is resolved against.
    pub fn base_url(&self) -> &rt::Url {
        &self.base_url
    }

    /// Fetches the page after `page`, or `None` when it has no next link.
    pub fn next_page<R>(
        &self,
        page: &R,
        observer: Option<&dyn rt::RequestObserver>,
        retries: Option<u32>,
    ) -> Result<Option<R>, rt::ClientError>
    where
        R: rt::Paginated + serde::de::DeserializeOwned,
    {
        rt::with_retries(retries.unwrap_or(rt::DEFAULT_RETRIES), observer, || {
            rt::fetch_next_page(&self.transport, &self.base_url, page, observer)
        })
    }

    /// List widgets, one page at a time.
    ///
    /// `GET /widgets` (`listWidgets`)
    pub fn list_widgets(
        &self,
        limit: i32,
        color: Option<Color>,
        tags: Option<&[String]>,
        observer: Option<&dyn rt::RequestObserver>,
        retries: Option<u32>,
    ) -> Result<WidgetPage, rt::ClientError> {
        rt::with_retries(retries.unwrap_or(rt::DEFAULT_RETRIES), observer, || {
            let path = "/widgets";
            let mut query = rt::QueryString::new();
            query.push("limit", limit);
            if let Some(color) = color {
                query.push("color", color);
            }
            if let Some(tags) = tags {
                query.push("tags", rt::join_values(tags));
            }
            let uri = rt::build_uri(&self.base_url, &path, &query)?;
            let request = rt::HttpRequest::new(rt::Method::Get, uri);
            let response = rt::execute(&self.transport, &request, observer)?;
            rt::decode_json(&response)
        })
    }

    /// Create a widget.
    ///
    /// `POST /widgets` (`createWidget`)
    pub fn create_widget(
        &self,
        body: &NewWidget,
        observer: Option<&dyn rt::RequestObserver>,
        retries: Option<u32>,
    ) -> Result<Widget, rt::ClientError> {
        rt::with_retries(retries.unwrap_or(rt::DEFAULT_RETRIES), observer, || {
            let path = "/widgets";
            let query = rt::QueryString::new();
            let uri = rt::build_uri(&self.base_url, &path, &query)?;
            let request = rt::HttpRequest::new(rt::Method::Post, uri).with_json(body)?;
            let response = rt::execute(&self.transport, &request, observer)?;
            rt::decode_json(&response)
        })
    }

    /// Fetch one widget.
    ///
    /// `GET /widgets/{id}` (`getWidget`)
    pub fn get_widget(
        &self,
        id: &str,
        observer: Option<&dyn rt::RequestObserver>,
        retries: Option<u32>,
    ) -> Result<Widget, rt::ClientError> {
        rt::with_retries(retries.unwrap_or(rt::DEFAULT_RETRIES), observer, || {
            let path = "/widgets/{id}".replace("{id}", &rt::encode_path_segment(&id.to_string()));
            let query = rt::QueryString::new();
            let uri = rt::build_uri(&self.base_url, &path, &query)?;
            let request = rt::HttpRequest::new(rt::Method::Get, uri);
            let response = rt::execute(&self.transport, &request, observer)?;
            rt::decode_json(&response)
        })
    }

    /// `DELETE /widgets/{id}` (`deleteWidget`)
    #[deprecated]
    pub fn delete_widget(
        &self,
        id: &str,
        observer: Option<&dyn rt::RequestObserver>,
        retries: Option<u32>,
    ) -> Result<(), rt::ClientError> {
        rt::with_retries(retries.unwrap_or(rt::DEFAULT_RETRIES), observer, || {
            let path = "/widgets/{id}".replace("{id}", &rt::encode_path_segment(&id.to_string()));
            let query = rt::QueryString::new();
            let uri = rt::build_uri(&self.base_url, &path, &query)?;
            let request = rt::HttpRequest::new(rt::Method::Delete, uri);
            rt::execute(&self.transport, &request, observer)?;
            Ok(())
        })
    }
}
