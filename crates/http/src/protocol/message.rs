use std::sync::Arc;

use http::{HeaderMap, HeaderName, HeaderValue};

use crate::entity::Entity;
use crate::protocol::{HttpError, HttpHeader};

/// Read access shared by every built message: requests, responses and
/// multipart parts.
///
/// Headers keep their insertion order and may repeat. Lookups by name are
/// case-insensitive.
pub trait HttpMessage {
    /// All headers, in insertion order.
    fn headers(&self) -> &[HttpHeader];

    /// The entity, shared with every message derived from this one.
    fn entity(&self) -> Option<&Arc<Entity>>;

    /// Returns the first header named `name`.
    fn header(&self, name: &str) -> Option<&HttpHeader> {
        self.headers().iter().find(|header| header.is(name))
    }

    /// Returns the value of the first header named `name`.
    fn header_value(&self, name: &str) -> Option<&str> {
        self.header(name).map(HttpHeader::value)
    }

    /// Returns every header named `name`, in insertion order.
    fn headers_named(&self, name: &str) -> Vec<&HttpHeader> {
        self.headers().iter().filter(|header| header.is(name)).collect()
    }

    /// Parses the `Content-Length` header, `None` if it is absent or not a
    /// number.
    fn content_length(&self) -> Option<u64> {
        self.header_value(http::header::CONTENT_LENGTH.as_str())?.trim().parse().ok()
    }

    /// Groups the headers by name into an [`http::HeaderMap`].
    ///
    /// # Errors
    ///
    /// [`HttpError::InvalidMessage`] if a name or value is not valid in an
    /// HTTP/1.1 header.
    fn to_header_map(&self) -> Result<HeaderMap, HttpError> {
        let mut map = HeaderMap::with_capacity(self.headers().len());
        for header in self.headers() {
            let name = HeaderName::from_bytes(header.name().as_bytes()).map_err(HttpError::invalid_message)?;
            let value = HeaderValue::from_str(header.value()).map_err(HttpError::invalid_message)?;
            map.append(name, value);
        }
        Ok(map)
    }
}

/// Write access shared by every message builder.
///
/// Builders are plain accumulators: headers are appended, duplicates are
/// kept, and the entity slot holds at most one entity.
pub trait MessageBuilder: Sized {
    fn headers_mut(&mut self) -> &mut Vec<HttpHeader>;

    fn entity_mut(&mut self) -> &mut Option<Arc<Entity>>;

    fn header<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.headers_mut().push(HttpHeader::new(name, value));
        self
    }

    fn headers<I>(mut self, headers: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<HttpHeader>,
    {
        self.headers_mut().extend(headers.into_iter().map(Into::into));
        self
    }

    /// Sets the entity, replacing any previous one. Passing an
    /// `Arc<Entity>` shares it without copying.
    fn entity<E: Into<Arc<Entity>>>(mut self, entity: E) -> Self {
        *self.entity_mut() = Some(entity.into());
        self
    }
}
