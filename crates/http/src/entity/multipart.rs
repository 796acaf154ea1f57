//! `multipart/form-data` bodies.
//!
//! The wire layout written by [`MultipartBody::write_to`] is, for every part
//! in order:
//!
//! ```text
//! --<boundary>\r\n
//! <header name>: <header value>\r\n      (one line per part header)
//! \r\n
//! <part content>\r\n
//! ```
//!
//! followed by the closing delimiter `--<boundary>--\r\n`.
//!
//! The boundary is not checked against the part contents. A caller that can
//! not rule out a collision should supply its own boundary.

use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use encoding_rs::Encoding;
use rand::Rng;
use tracing::trace;

use crate::entity::{ContentLength, Entity, Part};
use crate::media_type::MediaType;
use crate::protocol::{EntityError, HttpError, HttpMessage, MessageBuilder};

const DASHES: &[u8] = b"--";

const CRLF: &[u8] = b"\r\n";

const HEADER_SEPARATOR: &[u8] = b": ";

const BOUNDARY_CHARS: &[u8; 64] = b"-_1234567890abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const MIN_BOUNDARY_LEN: usize = 30;

const MAX_BOUNDARY_LEN: usize = 40;

/// Generates a boundary of 30 to 40 characters drawn from `-_0-9a-zA-Z`.
///
/// This only makes collisions unlikely, it does not make them impossible.
pub fn generate_boundary<R: Rng>(rng: &mut R) -> String {
    let len = rng.random_range(MIN_BOUNDARY_LEN..=MAX_BOUNDARY_LEN);
    (0..len).map(|_| char::from(BOUNDARY_CHARS[rng.random_range(0..BOUNDARY_CHARS.len())])).collect()
}

#[derive(Debug, Clone)]
pub struct MultipartBody {
    charset: Option<&'static Encoding>,
    boundary: String,
    parts: Vec<Part>,
    content_type: MediaType,
}

impl MultipartBody {
    /// A builder with a boundary generated from the thread local rng.
    pub fn builder() -> MultipartBuilder {
        MultipartBuilder::new()
    }

    #[inline]
    pub fn charset(&self) -> Option<&'static Encoding> {
        self.charset
    }

    #[inline]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    #[inline]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// `multipart/form-data; boundary=<boundary>`, with a `charset`
    /// parameter when one was configured.
    #[inline]
    pub fn content_type(&self) -> &MediaType {
        &self.content_type
    }

    /// Reopens the body with the same charset, boundary and parts.
    pub fn new_builder(&self) -> MultipartBuilder {
        MultipartBuilder {
            charset: self.charset,
            boundary: self.boundary.clone(),
            parts: self.parts.clone(),
            error: None,
        }
    }

    /// The exact encoded length, known only if every part knows its own.
    pub fn content_length(&self) -> ContentLength {
        let boundary_len = self.boundary.len() as u64;
        let delimiter_len = DASHES.len() as u64 + boundary_len;
        let crlf_len = CRLF.len() as u64;

        let mut total = delimiter_len + DASHES.len() as u64 + crlf_len;
        for part in &self.parts {
            let ContentLength::Length(content_len) = part.part_entity().content_length() else {
                return ContentLength::Unknown;
            };
            let headers_len: u64 = part
                .headers()
                .iter()
                .map(|header| (header.name().len() + HEADER_SEPARATOR.len() + header.value().len()) as u64 + crlf_len)
                .sum();
            total += delimiter_len + crlf_len + headers_len + crlf_len + content_len + crlf_len;
        }
        ContentLength::Length(total)
    }

    pub fn write_to(&self, sink: &mut dyn Write) -> Result<(), EntityError> {
        trace!(boundary = %self.boundary, parts = self.parts.len(), "start writing multipart body");
        let boundary = self.boundary.as_bytes();

        for part in &self.parts {
            sink.write_all(DASHES)?;
            sink.write_all(boundary)?;
            sink.write_all(CRLF)?;

            for header in part.headers() {
                sink.write_all(header.name().as_bytes())?;
                sink.write_all(HEADER_SEPARATOR)?;
                sink.write_all(header.value().as_bytes())?;
                sink.write_all(CRLF)?;
            }
            sink.write_all(CRLF)?;

            part.part_entity().write_to(sink)?;
            sink.write_all(CRLF)?;
        }

        sink.write_all(DASHES)?;
        sink.write_all(boundary)?;
        sink.write_all(DASHES)?;
        sink.write_all(CRLF)?;

        trace!(boundary = %self.boundary, "finish writing multipart body");
        Ok(())
    }
}

/// Accumulates parts for a [`MultipartBody`].
///
/// The convenience `add_*` methods build their part on the spot; the first
/// failure is kept and returned by [`build`](Self::build), so calls can be
/// chained.
#[derive(Debug)]
pub struct MultipartBuilder {
    charset: Option<&'static Encoding>,
    boundary: String,
    parts: Vec<Part>,
    error: Option<HttpError>,
}

impl Default for MultipartBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartBuilder {
    pub fn new() -> Self {
        Self::with_rng(&mut rand::rng())
    }

    /// A builder whose boundary is drawn from `rng`.
    pub fn with_rng<R: Rng>(rng: &mut R) -> Self {
        Self { charset: None, boundary: generate_boundary(rng), parts: Vec::new(), error: None }
    }

    /// Adds a `charset` parameter to the content type, rendered with the
    /// encoding's WHATWG name. [`charset::US_ASCII`](crate::charset::US_ASCII)
    /// and [`charset::ISO_8859_1`](crate::charset::ISO_8859_1) both render as
    /// `windows-1252`.
    pub fn charset(mut self, charset: &'static Encoding) -> Self {
        self.charset = Some(charset);
        self
    }

    pub fn boundary<S: Into<String>>(mut self, boundary: S) -> Self {
        self.boundary = boundary.into();
        self
    }

    pub fn add_part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    pub fn add_entity<N, E>(self, name: N, entity: E) -> Self
    where
        N: Into<String>,
        E: Into<Arc<Entity>>,
    {
        let part = Part::builder().name(name).entity(entity).build();
        self.push(part)
    }

    pub fn add_bytes<N, B>(self, name: N, data: B, content_type: Option<MediaType>) -> Self
    where
        N: Into<String>,
        B: Into<Bytes>,
    {
        self.add_entity(name, Entity::bytes_part(data, content_type, None))
    }

    pub fn add_text<N: Into<String>>(self, name: N, text: &str, content_type: Option<MediaType>) -> Self {
        match Entity::text_part(text, content_type, None) {
            Ok(entity) => self.add_entity(name, entity),
            Err(e) => self.push(Err(e.into())),
        }
    }

    pub fn add_file<N, P>(self, name: N, path: P, content_type: Option<MediaType>) -> Self
    where
        N: Into<String>,
        P: Into<PathBuf>,
    {
        self.add_entity(name, Entity::file_part(path, content_type))
    }

    pub fn add_stream<N, R>(self, name: N, reader: R, length: ContentLength) -> Self
    where
        N: Into<String>,
        R: Read + Send + 'static,
    {
        self.add_entity(name, Entity::stream_part(reader, length, None, None))
    }

    /// Adds one part per `(name, entity)` pair, in iteration order.
    pub fn extend<I, N>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = (N, Entity)>,
        N: Into<String>,
    {
        fields.into_iter().fold(self, |builder, (name, entity)| builder.add_entity(name, entity))
    }

    fn push(mut self, part: Result<Part, HttpError>) -> Self {
        match part {
            Ok(part) => self.parts.push(part),
            Err(e) => {
                if self.error.is_none() {
                    self.error = Some(e);
                }
            }
        }
        self
    }

    /// # Errors
    ///
    /// - the first error of an `add_*` call
    /// - [`HttpError::MediaTypeError`] if the boundary is not a valid
    ///   parameter value
    pub fn build(self) -> Result<MultipartBody, HttpError> {
        if let Some(e) = self.error {
            return Err(e);
        }

        let mut parameters = vec![("boundary", self.boundary.clone())];
        if let Some(charset) = self.charset {
            parameters.push(("charset", charset.name().to_string()));
        }
        let content_type = MediaType::with_parameters("multipart", "form-data", parameters)?;

        Ok(MultipartBody { charset: self.charset, boundary: self.boundary, parts: self.parts, content_type })
    }
}
