//! HTTP message model.
//!
//! This module provides the immutable message types a transport consumes
//! when framing a request or interpreting a response:
//!
//! - **Headers**: [`HttpHeader`], an ordered `name: value` pair
//!   with case-insensitive name matching
//! - **Messages**: the [`HttpMessage`] read trait and the
//!   [`MessageBuilder`] accumulator trait shared by every message kind
//! - **Requests**: [`HttpRequest`] with its [`HttpMethod`]
//! - **Responses**: [`HttpResponse`] with status line fields
//! - **Errors**: [`HttpError`] and the errors it wraps
//!
//! # Lifecycle
//!
//! Messages are only created through builders. `build()` consumes the builder,
//! and `new_builder()` on a built message starts a fresh builder from a copy
//! of its headers and a shared reference to its entity:
//!
//! ```
//! use micro_http_entity::protocol::{HttpMessage, HttpRequest, MessageBuilder};
//!
//! let request = HttpRequest::builder().url("http://example.com/").header("Accept", "*/*").build().unwrap();
//! let derived = request.new_builder().header("Accept", "text/html").build().unwrap();
//!
//! assert_eq!(request.headers().len(), 1);
//! assert_eq!(derived.headers().len(), 2);
//! ```

mod header;
pub use header::HttpHeader;

mod message;
pub use message::HttpMessage;
pub use message::MessageBuilder;

mod method;
pub use method::HttpMethod;

mod request;
pub use request::HttpRequest;
pub use request::HttpRequestBuilder;

mod response;
pub use response::HttpResponse;
pub use response::HttpResponseBuilder;

mod error;
pub use error::EntityError;
pub use error::HttpError;
pub use error::MediaTypeError;
pub use error::UriError;
