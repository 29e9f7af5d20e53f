//! # Pagination
//!
//! Collection responses that carry `links.next` implement [`Paginated`];
//! [`fetch_next_page`] follows that link once.

use crate::error::ClientResult;
use crate::http::{resolve_link, HttpRequest, Method};
use crate::observer::RequestObserver;
use crate::transport::{decode_json, execute, Transport};
use serde::de::DeserializeOwned;
use url::Url;

/// A response page that may point at the next one.
pub trait Paginated {
    /// The next-page link, `None` on the last page.
    fn next_link(&self) -> Option<&str>;
}

/// Issues one GET for the page after `page`.
///
/// Returns `Ok(None)` without a request when `page` has no next link.
/// Relative links resolve against `base_url`.
pub fn fetch_next_page<R, T>(
    transport: &T,
    base_url: &Url,
    page: &R,
    observer: Option<&dyn RequestObserver>,
) -> ClientResult<Option<R>>
where
    R: Paginated + DeserializeOwned,
    T: Transport + ?Sized,
{
    let Some(link) = page.next_link() else {
        tracing::debug!("No next link; pagination finished");
        return Ok(None);
    };
    let request = HttpRequest::new(Method::Get, resolve_link(base_url, link)?);
    let response = execute(transport, &request, observer)?;
    decode_json(&response).map(Some)
}
