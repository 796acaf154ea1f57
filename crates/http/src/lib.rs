//! Transport-independent HTTP message model
//!
//! This crate provides the immutable building blocks an HTTP client hands to
//! its transport: requests, responses, headers, media types and the entities
//! carried as message bodies. It performs no network I/O itself; the only
//! blocking calls are the ones reading or writing an entity's content, and
//! those happen only when the caller asks for them.
//!
//! # Features
//!
//! - RFC 2045 style media type parsing with canonical parameter order
//! - Builders for requests, responses and multipart parts that never alias
//!   the messages they produced
//! - In-memory, file, stream and caller-defined entities
//! - `application/x-www-form-urlencoded` and `multipart/form-data` bodies
//! - Pluggable randomness for multipart boundaries
//!
//! # Example
//!
//! ```
//! use micro_http_entity::{Entity, HttpMessage, HttpMethod, HttpRequest, MessageBuilder, MultipartBody};
//!
//! let body = MultipartBody::builder()
//!     .boundary("BOUNDARY")
//!     .add_text("f", "hi", None)
//!     .build()
//!     .unwrap();
//!
//! let request = HttpRequest::builder()
//!     .method(HttpMethod::Post)
//!     .url("https://example.com/upload")
//!     .entity(Entity::from(body))
//!     .build()
//!     .unwrap();
//!
//! let entity = request.entity().unwrap();
//! assert_eq!(entity.content_type().to_string(), "multipart/form-data; boundary=BOUNDARY");
//! assert_eq!(
//!     entity.to_bytes().unwrap(),
//!     "--BOUNDARY\r\n\
//!      Content-Disposition: form-data; name=\"f\"\r\n\
//!      Content-Type: text/plain\r\n\
//!      Content-Transfer-Encoding: 8bit\r\n\
//!      \r\n\
//!      hi\r\n\
//!      --BOUNDARY--\r\n"
//! );
//! ```
//!
//! # Architecture
//!
//! - [`media_type`]: [`MediaType`] parsing, construction and guessing
//! - [`charset`]: charset lookup and text encoding
//! - [`entity`]: [`Entity`] and the form and multipart bodies
//! - [`protocol`]: headers, messages, requests, responses and errors
//! - [`uri`]: scheme checks for URI handlers
//!
//! # Error Handling
//!
//! - [`MediaTypeError`]: malformed media types and unknown charsets, raised
//!   when the value is parsed or constructed
//! - [`EntityError`]: I/O failures and consumed streams, raised when content
//!   is read or written
//! - [`UriError`]: missing or unsupported schemes
//! - [`HttpError`]: wraps the above for builders and message conversions
//!
//! # Limitations
//!
//! - Multipart boundaries are not checked against part content
//! - Only `form-data` multipart bodies are produced

pub mod charset;
pub mod entity;
pub mod media_type;
pub mod protocol;
pub mod uri;

mod utils;
pub(crate) use utils::ensure;

pub use entity::ContentLength;
pub use entity::Entity;
pub use entity::EntitySource;
pub use entity::FormBody;
pub use entity::MultipartBody;
pub use entity::Part;
pub use entity::TransferEncoding;
pub use media_type::MediaType;
pub use protocol::EntityError;
pub use protocol::HttpError;
pub use protocol::HttpHeader;
pub use protocol::HttpMessage;
pub use protocol::HttpMethod;
pub use protocol::HttpRequest;
pub use protocol::HttpResponse;
pub use protocol::MediaTypeError;
pub use protocol::MessageBuilder;
pub use protocol::UriError;
pub use uri::SchemeSet;
pub use uri::UriHandler;
