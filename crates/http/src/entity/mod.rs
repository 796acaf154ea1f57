//! Message entities: the payload a request or response carries.
//!
//! An [`Entity`] reports its media type, charset and length, and produces its
//! bytes either by pull ([`Entity::content`]) or by push
//! ([`Entity::write_to`]). A transport is expected to call exactly one of
//! them per request attempt.
//!
//! The set of entity kinds is closed:
//!
//! - raw bytes and text, held in memory as [`Bytes`]
//! - files, opened on every read and closed when the read is over
//! - streams, which can be read only once
//! - [`FormBody`] (`application/x-www-form-urlencoded`)
//! - [`MultipartBody`] (`multipart/form-data`)
//! - anything else, through the [`EntitySource`] trait
//!
//! Entities created with the `*_part` constructors additionally carry a
//! filename and a `Content-Transfer-Encoding`, which [`Part`] uses to
//! synthesize its headers.

mod form;
mod multipart;
mod part;

pub use form::FormBody;
pub use form::FormBuilder;
pub use multipart::MultipartBody;
pub use multipart::MultipartBuilder;
pub use multipart::generate_boundary;
pub use part::Part;
pub use part::PartBuilder;

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use bytes::{Buf, BufMut, Bytes, BytesMut};
use encoding_rs::Encoding;
use tracing::{debug, warn};

use crate::charset;
use crate::media_type::MediaType;
use crate::protocol::{EntityError, MediaTypeError};

/// The length of an entity's content.
///
/// Transports frame entities of unknown length with chunked encoding.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ContentLength {
    /// Content with known length in bytes
    Length(u64),
    /// Content whose length is only known once it has been read
    Unknown,
}

impl ContentLength {
    #[inline]
    pub fn is_known(&self) -> bool {
        matches!(self, ContentLength::Length(_))
    }

    #[inline]
    pub fn length(&self) -> Option<u64> {
        match self {
            ContentLength::Length(n) => Some(*n),
            ContentLength::Unknown => None,
        }
    }

    /// The length as a signed number, `-1` when unknown.
    pub fn as_sentinel(&self) -> i64 {
        match self {
            ContentLength::Length(n) => i64::try_from(*n).unwrap_or(-1),
            ContentLength::Unknown => -1,
        }
    }
}

/// Values of the `Content-Transfer-Encoding` header of a multipart part.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum TransferEncoding {
    #[default]
    SevenBit,
    EightBit,
    Binary,
    Base64,
}

impl TransferEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferEncoding::SevenBit => "7bit",
            TransferEncoding::EightBit => "8bit",
            TransferEncoding::Binary => "binary",
            TransferEncoding::Base64 => "base64",
        }
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content supplied by the caller through callbacks.
///
/// Only [`content`](EntitySource::content) is required; the default
/// [`write_to`](EntitySource::write_to) copies it into the sink.
pub trait EntitySource: fmt::Debug + Send + Sync {
    fn content_length(&self) -> ContentLength {
        ContentLength::Unknown
    }

    fn content(&self) -> io::Result<Box<dyn Read + Send>>;

    fn write_to(&self, sink: &mut dyn Write) -> io::Result<()> {
        let mut content = self.content()?;
        io::copy(&mut content, sink)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PartInfo {
    filename: Option<String>,
    transfer_encoding: TransferEncoding,
}

#[derive(Debug)]
pub struct Entity {
    content_type: MediaType,
    kind: Kind,
    part: Option<PartInfo>,
}

#[derive(Debug)]
enum Kind {
    Bytes(Bytes),
    Text(Bytes),
    File(PathBuf),
    Stream(StreamSource),
    Custom(Box<dyn EntitySource>),
    Form(FormBody),
    Multipart(MultipartBody),
}

/// A reader that is handed out once.
struct StreamSource {
    reader: Mutex<Option<Box<dyn Read + Send>>>,
    length: ContentLength,
}

impl StreamSource {
    fn new<R: Read + Send + 'static>(reader: R, length: ContentLength) -> Self {
        Self { reader: Mutex::new(Some(Box::new(reader))), length }
    }

    fn take(&self) -> Result<Box<dyn Read + Send>, EntityError> {
        let mut guard = self.reader.lock().unwrap_or_else(PoisonError::into_inner);
        guard.take().ok_or_else(|| {
            warn!("stream entity has already been consumed");
            EntityError::Consumed
        })
    }
}

impl fmt::Debug for StreamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let consumed = self.reader.lock().unwrap_or_else(PoisonError::into_inner).is_none();
        f.debug_struct("StreamSource").field("length", &self.length).field("consumed", &consumed).finish()
    }
}

impl Entity {
    fn new(content_type: MediaType, kind: Kind) -> Self {
        Self { content_type, kind, part: None }
    }

    fn with_part(mut self, filename: Option<&str>, transfer_encoding: TransferEncoding) -> Self {
        self.part = Some(PartInfo { filename: filename.map(str::to_string), transfer_encoding });
        self
    }

    pub fn bytes<B: Into<Bytes>>(content_type: MediaType, data: B) -> Self {
        Self::new(content_type, Kind::Bytes(data.into()))
    }

    /// Encodes `text` with the charset of `content_type`, UTF-8 if it names
    /// none.
    ///
    /// # Errors
    ///
    /// - [`MediaTypeError::UnsupportedCharset`] if the charset is unknown
    /// - [`MediaTypeError::Unencodable`] if the text cannot be written in it
    pub fn text(content_type: MediaType, text: &str) -> Result<Self, MediaTypeError> {
        let data = charset::encode(text, content_type.charset_or(charset::UTF_8)?)?;
        Ok(Self::new(content_type, Kind::Text(data)))
    }

    /// The file is opened each time the content is read, and closed once the
    /// read completes or fails.
    pub fn file<P: Into<PathBuf>>(content_type: MediaType, path: P) -> Self {
        Self::new(content_type, Kind::File(path.into()))
    }

    /// An entity over a live reader.
    ///
    /// The content can be read once: a second call to
    /// [`content`](Self::content) or [`write_to`](Self::write_to) fails with
    /// [`EntityError::Consumed`].
    pub fn stream<R: Read + Send + 'static>(content_type: MediaType, reader: R, length: ContentLength) -> Self {
        Self::new(content_type, Kind::Stream(StreamSource::new(reader, length)))
    }

    pub fn custom<S: EntitySource + 'static>(content_type: MediaType, source: S) -> Self {
        Self::new(content_type, Kind::Custom(Box::new(source)))
    }

    /// Binary part content. Without `content_type` the type is guessed from
    /// `filename`, falling back to `application/octet-stream`.
    pub fn bytes_part<B: Into<Bytes>>(data: B, content_type: Option<MediaType>, filename: Option<&str>) -> Self {
        Self::bytes(part_content_type(content_type, filename), data).with_part(filename, TransferEncoding::Binary)
    }

    /// Text part content, `text/plain` unless `content_type` says otherwise.
    /// The text is encoded with the charset of the content type, US-ASCII if
    /// it names none. Text outside that charset needs an explicit
    /// `charset=utf-8`.
    ///
    /// # Errors
    ///
    /// Same as [`text`](Self::text).
    pub fn text_part(
        text: &str,
        content_type: Option<MediaType>,
        filename: Option<&str>,
    ) -> Result<Self, MediaTypeError> {
        let content_type = content_type.unwrap_or_else(MediaType::text_plain);
        let data = charset::encode(text, content_type.charset_or(charset::US_ASCII)?)?;
        Ok(Self::new(content_type, Kind::Text(data)).with_part(filename, TransferEncoding::EightBit))
    }

    /// File part content, named after the file.
    pub fn file_part<P: Into<PathBuf>>(path: P, content_type: Option<MediaType>) -> Self {
        let path = path.into();
        let filename = path.file_name().and_then(|name| name.to_str()).map(str::to_string);
        let content_type = part_content_type(content_type, filename.as_deref());
        Self::file(content_type, path).with_part(filename.as_deref(), TransferEncoding::Binary)
    }

    pub fn stream_part<R: Read + Send + 'static>(
        reader: R,
        length: ContentLength,
        content_type: Option<MediaType>,
        filename: Option<&str>,
    ) -> Self {
        Self::stream(part_content_type(content_type, filename), reader, length)
            .with_part(filename, TransferEncoding::Binary)
    }

    #[inline]
    pub fn content_type(&self) -> &MediaType {
        &self.content_type
    }

    /// The charset of the content.
    ///
    /// For multipart bodies this is the configured charset. Otherwise it is
    /// the `charset` parameter of the content type, defaulting to ISO-8859-1
    /// for part content and US-ASCII for everything else. `None` when the
    /// parameter names an unknown charset.
    pub fn charset(&self) -> Option<&'static Encoding> {
        if let Kind::Multipart(body) = &self.kind {
            return body.charset();
        }
        let default = if self.part.is_some() { charset::ISO_8859_1 } else { charset::US_ASCII };
        self.content_type.charset_or(default).ok()
    }

    pub fn content_length(&self) -> ContentLength {
        match &self.kind {
            Kind::Bytes(data) | Kind::Text(data) => ContentLength::Length(data.len() as u64),
            Kind::File(path) => match fs::metadata(path) {
                Ok(metadata) => ContentLength::Length(metadata.len()),
                Err(_) => ContentLength::Unknown,
            },
            Kind::Stream(stream) => stream.length,
            Kind::Custom(source) => source.content_length(),
            Kind::Form(form) => match form.encode() {
                Ok(encoded) => ContentLength::Length(encoded.len() as u64),
                Err(_) => ContentLength::Unknown,
            },
            Kind::Multipart(body) => body.content_length(),
        }
    }

    /// The filename of part content.
    pub fn filename(&self) -> Option<&str> {
        self.part.as_ref().and_then(|part| part.filename.as_deref())
    }

    /// The transfer encoding of part content, `None` for entities that were
    /// not created as part content.
    pub fn transfer_encoding(&self) -> Option<TransferEncoding> {
        self.part.as_ref().map(|part| part.transfer_encoding)
    }

    /// `false` for stream entities, whose content can only be read once.
    pub fn is_repeatable(&self) -> bool {
        !matches!(self.kind, Kind::Stream(_))
    }

    pub fn as_form(&self) -> Option<&FormBody> {
        match &self.kind {
            Kind::Form(form) => Some(form),
            _ => None,
        }
    }

    pub fn as_multipart(&self) -> Option<&MultipartBody> {
        match &self.kind {
            Kind::Multipart(body) => Some(body),
            _ => None,
        }
    }

    /// Returns a reader over the content.
    ///
    /// # Errors
    ///
    /// - [`EntityError::Io`] if a file cannot be opened
    /// - [`EntityError::Consumed`] if a stream entity was already read
    pub fn content(&self) -> Result<Box<dyn Read + Send>, EntityError> {
        match &self.kind {
            Kind::Bytes(data) | Kind::Text(data) => Ok(Box::new(data.clone().reader())),
            Kind::File(path) => Ok(Box::new(BufReader::new(open(path)?))),
            Kind::Stream(stream) => stream.take(),
            Kind::Custom(source) => Ok(source.content()?),
            Kind::Form(form) => Ok(Box::new(Bytes::from(form.encode()?).reader())),
            Kind::Multipart(_) => Ok(Box::new(self.to_bytes()?.reader())),
        }
    }

    /// Writes the content into `sink`.
    ///
    /// I/O errors are returned unchanged; whatever was written before the
    /// failure stays in the sink.
    pub fn write_to(&self, sink: &mut dyn Write) -> Result<(), EntityError> {
        match &self.kind {
            Kind::Bytes(data) | Kind::Text(data) => sink.write_all(data)?,
            Kind::File(path) => {
                let mut file = open(path)?;
                io::copy(&mut file, sink)?;
            }
            Kind::Stream(stream) => {
                let mut reader = stream.take()?;
                io::copy(&mut reader, sink)?;
            }
            Kind::Custom(source) => source.write_to(sink)?,
            Kind::Form(form) => sink.write_all(form.encode()?.as_bytes())?,
            Kind::Multipart(body) => body.write_to(sink)?,
        }
        Ok(())
    }

    /// Collects the whole content in memory.
    pub fn to_bytes(&self) -> Result<Bytes, EntityError> {
        match &self.kind {
            Kind::Bytes(data) | Kind::Text(data) => Ok(data.clone()),
            _ => {
                let capacity = self.content_length().length().map_or(0, |n| usize::try_from(n).unwrap_or(0));
                let mut writer = BytesMut::with_capacity(capacity).writer();
                self.write_to(&mut writer)?;
                Ok(writer.into_inner().freeze())
            }
        }
    }
}

impl From<FormBody> for Entity {
    fn from(form: FormBody) -> Self {
        Self::new(MediaType::form_urlencoded(), Kind::Form(form))
    }
}

impl From<MultipartBody> for Entity {
    fn from(body: MultipartBody) -> Self {
        Self::new(body.content_type().clone(), Kind::Multipart(body))
    }
}

fn open(path: &Path) -> Result<File, EntityError> {
    File::open(path).map_err(|e| {
        debug!(path = %path.display(), cause = %e, "failed to open entity file");
        EntityError::io(e)
    })
}

fn part_content_type(content_type: Option<MediaType>, filename: Option<&str>) -> MediaType {
    if let Some(content_type) = content_type {
        return content_type;
    }
    match filename.and_then(MediaType::guess) {
        Some(guessed) => guessed,
        None => {
            debug!(filename, "no media type for part content, using application/octet-stream");
            MediaType::octet_stream()
        }
    }
}
