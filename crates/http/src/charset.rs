//! Charset resolution backed by `encoding_rs`.
//!
//! Charsets are plain `&'static Encoding` values. There is no process wide
//! default: callers pass the fallback they want, usually one of the statics
//! below.
//!
//! Labels are resolved with the WHATWG rules, so `US-ASCII` and `ISO-8859-1`
//! both resolve to `windows-1252`, which is a superset of either. The two
//! statics below are therefore the same value: text encoded "as US-ASCII"
//! may contain bytes above 0x7f (`é` becomes `0xe9`), and the name rendered
//! into a header is `windows-1252`.
//!
//! Only charsets `encoding_rs` can encode into are accepted by [`encode`].
//! UTF-16 and the `replacement` encoding can be decoded but not encoded.

use bytes::Bytes;
use encoding_rs::Encoding;
use tracing::debug;

use crate::ensure;
use crate::protocol::MediaTypeError;

/// The fallback charset of [`MediaType::charset`](crate::MediaType::charset).
///
/// An alias of `windows-1252`.
pub static US_ASCII: &Encoding = &encoding_rs::WINDOWS_1252_INIT;

/// An alias of `windows-1252`.
pub static ISO_8859_1: &Encoding = &encoding_rs::WINDOWS_1252_INIT;

pub static UTF_8: &Encoding = &encoding_rs::UTF_8_INIT;

/// Resolves a charset label such as `utf-8` or `"ISO-8859-1"`.
///
/// Surrounding whitespace and double quotes are ignored.
pub fn for_label(label: &str) -> Result<&'static Encoding, MediaTypeError> {
    let trimmed = label.trim().trim_matches('"');
    Encoding::for_label(trimmed.as_bytes()).ok_or_else(|| MediaTypeError::unsupported_charset(label))
}

/// Encodes `text` with `charset`.
///
/// # Errors
///
/// [`MediaTypeError::Unencodable`] if `charset` has no encoder of its own, or
/// `text` holds a character `charset` cannot represent.
pub(crate) fn encode(text: &str, charset: &'static Encoding) -> Result<Bytes, MediaTypeError> {
    ensure!(charset.output_encoding() == charset, MediaTypeError::unencodable(charset.name()));

    let (bytes, _, had_errors) = charset.encode(text);
    if had_errors {
        debug!(charset = charset.name(), "text has characters the charset cannot represent");
        return Err(MediaTypeError::unencodable(charset.name()));
    }
    Ok(Bytes::from(bytes.into_owned()))
}
