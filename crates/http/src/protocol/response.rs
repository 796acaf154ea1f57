//! HTTP response messages.
//!
//! Responses are usually assembled by the transport from a status line and
//! the headers it read; [`HttpResponse::try_from`] does that for a
//! `http::Response<()>`.

use std::sync::Arc;

use http::{Response, StatusCode};

use crate::entity::Entity;
use crate::protocol::{HttpError, HttpHeader, HttpMessage, MessageBuilder};

const DEFAULT_PROTOCOL: &str = "HTTP/1.1";

#[derive(Debug, Clone)]
pub struct HttpResponse {
    protocol: String,
    status_code: u16,
    reason_phrase: String,
    headers: Vec<HttpHeader>,
    entity: Option<Arc<Entity>>,
}

impl HttpResponse {
    pub fn builder() -> HttpResponseBuilder {
        HttpResponseBuilder::new()
    }

    /// The protocol version of the status line, such as `HTTP/1.1`.
    #[inline]
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    #[inline]
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    #[inline]
    pub fn reason_phrase(&self) -> &str {
        &self.reason_phrase
    }

    /// `true` for `2xx` status codes.
    pub fn is_successful(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// `true` for `300`, `301`, `302`, `303`, `307` and `308`.
    pub fn is_redirect(&self) -> bool {
        matches!(self.status_code, 300..=303 | 307 | 308)
    }

    /// Reopens this response as a builder.
    ///
    /// A reason phrase that is just the default for the status code is not
    /// carried over, so changing the status code on the new builder also
    /// changes the phrase. A custom phrase is kept as is.
    pub fn new_builder(&self) -> HttpResponseBuilder {
        let reason_phrase =
            (self.reason_phrase != default_reason_phrase(self.status_code)).then(|| self.reason_phrase.clone());
        HttpResponseBuilder {
            protocol: self.protocol.clone(),
            status_code: self.status_code,
            reason_phrase,
            headers: self.headers.clone(),
            entity: self.entity.clone(),
        }
    }
}

impl HttpMessage for HttpResponse {
    fn headers(&self) -> &[HttpHeader] {
        &self.headers
    }

    fn entity(&self) -> Option<&Arc<Entity>> {
        self.entity.as_ref()
    }
}

impl TryFrom<Response<()>> for HttpResponse {
    type Error = HttpError;

    /// # Errors
    ///
    /// [`HttpError::InvalidMessage`] if a header value is not visible ASCII.
    fn try_from(response: Response<()>) -> Result<Self, Self::Error> {
        let mut builder = HttpResponseBuilder::new()
            .protocol(format!("{:?}", response.version()))
            .status_code(response.status().as_u16());

        for (name, value) in response.headers() {
            let value = value.to_str().map_err(HttpError::invalid_message)?;
            builder = builder.header(name.as_str(), value);
        }
        Ok(builder.build())
    }
}

#[derive(Debug)]
pub struct HttpResponseBuilder {
    protocol: String,
    status_code: u16,
    reason_phrase: Option<String>,
    headers: Vec<HttpHeader>,
    entity: Option<Arc<Entity>>,
}

impl Default for HttpResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpResponseBuilder {
    /// A `HTTP/1.1 200` builder.
    pub fn new() -> Self {
        Self {
            protocol: DEFAULT_PROTOCOL.to_string(),
            status_code: StatusCode::OK.as_u16(),
            reason_phrase: None,
            headers: Vec::new(),
            entity: None,
        }
    }

    pub fn protocol<S: Into<String>>(mut self, protocol: S) -> Self {
        self.protocol = protocol.into();
        self
    }

    pub fn status_code(mut self, status_code: u16) -> Self {
        self.status_code = status_code;
        self
    }

    pub fn reason_phrase<S: Into<String>>(mut self, reason_phrase: S) -> Self {
        self.reason_phrase = Some(reason_phrase.into());
        self
    }

    /// Builds the response. Without an explicit reason phrase the canonical
    /// one of the status code is used, or an empty phrase for unknown codes.
    pub fn build(self) -> HttpResponse {
        let reason_phrase =
            self.reason_phrase.unwrap_or_else(|| default_reason_phrase(self.status_code).to_string());

        HttpResponse {
            protocol: self.protocol,
            status_code: self.status_code,
            reason_phrase,
            headers: self.headers,
            entity: self.entity,
        }
    }
}

fn default_reason_phrase(status_code: u16) -> &'static str {
    StatusCode::from_u16(status_code).ok().and_then(|status| status.canonical_reason()).unwrap_or_default()
}

impl MessageBuilder for HttpResponseBuilder {
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

    #[test]
    fn test_defaults() {
        let response = HttpResponse::builder().build();
        assert_eq!(response.protocol(), "HTTP/1.1");
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.reason_phrase(), "OK");
        assert!(response.entity().is_none());
    }

    #[test]
    fn test_reason_phrase() {
        let response = HttpResponse::builder().status_code(404).build();
        assert_eq!(response.reason_phrase(), "Not Found");

        let response = HttpResponse::builder().status_code(299).build();
        assert_eq!(response.reason_phrase(), "");

        let response = HttpResponse::builder().status_code(200).reason_phrase("Fine").build();
        assert_eq!(response.reason_phrase(), "Fine");
    }

    #[test]
    fn test_classification() {
        for code in [200, 201, 204, 299] {
            assert!(HttpResponse::builder().status_code(code).build().is_successful(), "{code}");
        }
        for code in [199, 300, 404, 500] {
            assert!(!HttpResponse::builder().status_code(code).build().is_successful(), "{code}");
        }
        for code in [300, 301, 302, 303, 307, 308] {
            assert!(HttpResponse::builder().status_code(code).build().is_redirect(), "{code}");
        }
        for code in [200, 304, 305, 306, 309, 400] {
            assert!(!HttpResponse::builder().status_code(code).build().is_redirect(), "{code}");
        }
    }

    #[test]
    fn test_new_builder_does_not_touch_original() {
        let original = HttpResponse::builder().status_code(201).header("Location", "/a").build();
        let derived = original.new_builder().header("Location", "/b").build();

        assert_eq!(original.headers().len(), 1);
        assert_eq!(derived.headers().len(), 2);
        assert_eq!(derived.status_code(), 201);
        assert_eq!(derived.reason_phrase(), "Created");
    }

    #[test]
    fn test_new_builder_recomputes_default_reason() {
        let ok = HttpResponse::builder().build();
        let not_found = ok.new_builder().status_code(404).build();
        assert_eq!(not_found.reason_phrase(), "Not Found");
        assert_eq!(ok.reason_phrase(), "OK");

        let custom = HttpResponse::builder().reason_phrase("All Good").build();
        let reopened = custom.new_builder().status_code(404).build();
        assert_eq!(reopened.reason_phrase(), "All Good");
    }

    #[test]
    fn test_from_http_response() {
        let response = Response::builder()
            .status(StatusCode::MOVED_PERMANENTLY)
            .header(http::header::LOCATION, "https://example.com/")
            .header(http::header::CONTENT_LENGTH, "0")
            .body(())
            .unwrap();

        let response = HttpResponse::try_from(response).unwrap();
        assert_eq!(response.protocol(), "HTTP/1.1");
        assert_eq!(response.status_code(), 301);
        assert_eq!(response.reason_phrase(), "Moved Permanently");
        assert!(response.is_redirect());
        assert_eq!(response.header_value("Location"), Some("https://example.com/"));
        assert_eq!(response.content_length(), Some(0));
    }
}
