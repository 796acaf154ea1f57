//! HTTP request messages.
//!
//! A [`HttpRequest`] is an immutable snapshot produced by
//! [`HttpRequestBuilder::build`]. To derive a modified request, reopen it with
//! [`HttpRequest::new_builder`]; the new builder owns a copy of the header list
//! and shares the entity, so nothing done to it is visible through the
//! original request.

use std::sync::Arc;

use http::Request;

use crate::entity::Entity;
use crate::protocol::{HttpError, HttpHeader, HttpMessage, HttpMethod, MessageBuilder};

#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: HttpMethod,
    url: String,
    headers: Vec<HttpHeader>,
    entity: Option<Arc<Entity>>,
}

impl HttpRequest {
    pub fn builder() -> HttpRequestBuilder {
        HttpRequestBuilder::new()
    }

    #[inline]
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// `true` if the url uses the `https` scheme.
    pub fn is_secure(&self) -> bool {
        self.url.split_once(':').is_some_and(|(scheme, _)| scheme.eq_ignore_ascii_case("https"))
    }

    /// Reopens this request as a builder seeded with its method, url,
    /// a copy of its headers and the same entity.
    pub fn new_builder(&self) -> HttpRequestBuilder {
        HttpRequestBuilder {
            method: self.method,
            url: Some(self.url.clone()),
            headers: self.headers.clone(),
            entity: self.entity.clone(),
        }
    }
}

impl HttpMessage for HttpRequest {
    fn headers(&self) -> &[HttpHeader] {
        &self.headers
    }

    fn entity(&self) -> Option<&Arc<Entity>> {
        self.entity.as_ref()
    }
}

/// Converts the request line and headers for transports built on the `http`
/// crate. The entity is left to the caller.
impl TryFrom<&HttpRequest> for Request<()> {
    type Error = HttpError;

    fn try_from(request: &HttpRequest) -> Result<Self, Self::Error> {
        let method = http::Method::try_from(request.method).map_err(HttpError::invalid_message)?;
        let mut builder = Request::builder().method(method).uri(request.url.as_str());
        if let Some(headers) = builder.headers_mut() {
            *headers = request.to_header_map()?;
        }
        builder.body(()).map_err(HttpError::invalid_message)
    }
}

#[derive(Debug)]
pub struct HttpRequestBuilder {
    method: HttpMethod,
    url: Option<String>,
    headers: Vec<HttpHeader>,
    entity: Option<Arc<Entity>>,
}

impl Default for HttpRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpRequestBuilder {
    /// A `GET` builder without url, headers or entity.
    pub fn new() -> Self {
        Self { method: HttpMethod::Get, url: None, headers: Vec::new(), entity: None }
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = Some(url.into());
        self
    }

    /// # Errors
    ///
    /// [`HttpError::InvalidMessage`] if no url was set.
    pub fn build(self) -> Result<HttpRequest, HttpError> {
        let url = self.url.ok_or_else(|| HttpError::invalid_message("request url is required"))?;
        Ok(HttpRequest { method: self.method, url, headers: self.headers, entity: self.entity })
    }
}

impl MessageBuilder for HttpRequestBuilder {
    fn headers_mut(&mut self) -> &mut Vec<HttpHeader> {
        &mut self.headers
    }

    fn entity_mut(&mut self) -> &mut Option<Arc<Entity>> {
        &mut self.entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MediaType;

    fn request() -> HttpRequest {
        HttpRequest::builder()
            .method(HttpMethod::Post)
            .url("https://example.com/upload")
            .header("Accept", "*/*")
            .header("X-Trace", "1")
            .entity(Entity::bytes(MediaType::octet_stream(), vec![1, 2, 3]))
            .build()
            .unwrap()
    }

    #[test]
    fn test_build() {
        let request = request();
        assert_eq!(request.method(), HttpMethod::Post);
        assert_eq!(request.url(), "https://example.com/upload");
        assert_eq!(request.headers().len(), 2);
        assert_eq!(request.header_value("x-trace"), Some("1"));
        assert!(request.entity().is_some());
        assert!(request.is_secure());
    }

    #[test]
    fn test_url_is_required() {
        let result = HttpRequest::builder().build();
        assert!(matches!(result, Err(HttpError::InvalidMessage { .. })));
    }

    #[test]
    fn test_is_secure() {
        let request = HttpRequest::builder().url("HTTPS://example.com").build().unwrap();
        assert!(request.is_secure());
        let request = HttpRequest::builder().url("http://example.com").build().unwrap();
        assert!(!request.is_secure());
        let request = HttpRequest::builder().url("/relative").build().unwrap();
        assert!(!request.is_secure());
    }

    #[test]
    fn test_new_builder_does_not_touch_original() {
        let original = request();
        let derived = original
            .new_builder()
            .header("X-Trace", "2")
            .method(HttpMethod::Put)
            .entity(Entity::text(MediaType::text_plain(), "replaced").unwrap())
            .build()
            .unwrap();

        assert_eq!(original.headers().len(), 2);
        assert_eq!(original.method(), HttpMethod::Post);
        assert_eq!(original.entity().unwrap().content_length().length(), Some(3));

        assert_eq!(derived.headers().len(), 3);
        assert_eq!(derived.url(), original.url());
        assert_eq!(derived.headers_named("x-trace").len(), 2);
        assert_eq!(derived.entity().unwrap().content_length().length(), Some(8));
    }

    #[test]
    fn test_new_builder_shares_entity() {
        let original = request();
        let derived = original.new_builder().build().unwrap();
        assert!(Arc::ptr_eq(original.entity().unwrap(), derived.entity().unwrap()));
    }

    #[test]
    fn test_into_http_request() {
        let request = request();
        let converted = Request::<()>::try_from(&request).unwrap();
        assert_eq!(converted.method(), http::Method::POST);
        assert_eq!(converted.uri().host(), Some("example.com"));
        assert_eq!(converted.headers().get("x-trace").unwrap(), "1");

        let webdav = HttpRequest::builder().method(HttpMethod::Mkcol).url("/dir/").build().unwrap();
        let converted = Request::<()>::try_from(&webdav).unwrap();
        assert_eq!(converted.method().as_str(), "MKCOL");
    }
}
