//! Media types as described by RFC 2046.
//!
//! A [`MediaType`] is an immutable `type/subtype` pair with an ordered set of
//! parameters. Values are validated when they are created, either by
//! [`MediaType::parse`] or by [`MediaType::with_parameters`], so every
//! instance renders to a string that parses back to an equal value.
//!
//! # Canonical form
//!
//! - `type` and `subtype` are lowercased
//! - parameter names keep their case, except `charset` which is always
//!   rendered as `charset`
//! - parameters are sorted by name, compared case-insensitively; names that
//!   only differ in case share one slot and the last value wins
//! - parameter values are kept verbatim, quoted strings keep their quotes
//!
//! # Example
//!
//! ```
//! use micro_http_entity::MediaType;
//!
//! let media_type = MediaType::parse("Text/Plain; b=2; a=\"x y\"").unwrap().unwrap();
//! assert_eq!(media_type.to_string(), "text/plain; a=\"x y\"; b=2");
//! assert_eq!(media_type.parameter("a"), Some("x y"));
//! ```

mod guess;
mod parser;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use encoding_rs::Encoding;

use crate::charset;
use crate::ensure;
use crate::protocol::MediaTypeError;

use parser::{is_quoted, is_token};

const CHARSET: &str = "charset";

const WILDCARD: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType {
    type_: String,
    subtype: String,
    /// sorted by [`compare_names`], names are unique ignoring case
    parameters: Vec<(String, String)>,
}

impl MediaType {
    /// Parses a media type string such as `text/html; charset=utf-8`.
    ///
    /// Returns `Ok(None)` when `input` does not start with `type/subtype` at
    /// all, and [`MediaTypeError::Malformed`] when it does but one of the
    /// `; name=value` segments is malformed. A segment without a
    /// `name=value` pair (a bare `;`) is skipped.
    pub fn parse(input: &str) -> Result<Option<Self>, MediaTypeError> {
        let Some(raw) = parser::scan(input)? else {
            return Ok(None);
        };
        Self::with_parameters(raw.type_, raw.subtype, raw.parameters).map(Some)
    }

    /// Creates `type/subtype` without parameters.
    pub fn new(type_: &str, subtype: &str) -> Result<Self, MediaTypeError> {
        Self::with_parameters(type_, subtype, std::iter::empty::<(String, String)>())
    }

    /// Creates `type/*`.
    pub fn of_type(type_: &str) -> Result<Self, MediaTypeError> {
        Self::new(type_, WILDCARD)
    }

    /// Creates a media type from its parts, validating every piece and
    /// sorting the parameters into canonical order.
    ///
    /// # Errors
    ///
    /// - [`MediaTypeError::MissingType`] if `type_` is empty
    /// - [`MediaTypeError::Malformed`] if the type, the subtype or a parameter
    ///   name is not a token, or a parameter value is neither a token nor a
    ///   quoted string
    pub fn with_parameters<I, K, V>(type_: &str, subtype: &str, parameters: I) -> Result<Self, MediaTypeError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        ensure!(!type_.is_empty(), MediaTypeError::MissingType);
        ensure!(is_token(type_), MediaTypeError::malformed(type_));
        ensure!(is_token(subtype), MediaTypeError::malformed(subtype));

        let mut sorted: Vec<(String, String)> = Vec::new();
        for (name, value) in parameters {
            let (name, value) = (name.into(), value.into());
            ensure!(is_token(&name), MediaTypeError::malformed(name));
            ensure!(is_token(&value) || is_quoted(&value), MediaTypeError::malformed(value));
            insert_parameter(&mut sorted, name, value);
        }

        Ok(Self { type_: type_.to_ascii_lowercase(), subtype: subtype.to_ascii_lowercase(), parameters: sorted })
    }

    /// Guesses the media type of a file name, path or URL from its extension.
    ///
    /// Returns `None` when the extension is missing or unknown.
    pub fn guess(path: &str) -> Option<Self> {
        guess::guess(path)
    }

    /// Like [`guess`](Self::guess), falling back to `default`.
    pub fn guess_or(path: &str, default: Self) -> Self {
        guess::guess(path).unwrap_or(default)
    }

    /// `application/octet-stream`
    pub fn octet_stream() -> Self {
        Self::known("application", "octet-stream")
    }

    /// `text/plain`
    pub fn text_plain() -> Self {
        Self::known("text", "plain")
    }

    /// `application/x-www-form-urlencoded`
    pub fn form_urlencoded() -> Self {
        Self::known("application", "x-www-form-urlencoded")
    }

    fn known(type_: &str, subtype: &str) -> Self {
        Self { type_: type_.to_string(), subtype: subtype.to_string(), parameters: Vec::new() }
    }

    #[inline]
    pub fn type_(&self) -> &str {
        &self.type_
    }

    #[inline]
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// Iterates the parameters in canonical order, values as written
    /// (quoted strings keep their quotes).
    pub fn parameters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parameters.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.find_parameter(name).is_some()
    }

    /// Returns the value of a parameter, with surrounding quotes removed.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.find_parameter(name).map(|value| {
            if is_quoted(value) { &value[1..value.len() - 1] } else { value }
        })
    }

    pub fn parameter_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.parameter(name).unwrap_or(default)
    }

    fn find_parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .binary_search_by(|(key, _)| compare_names(key, name))
            .ok()
            .map(|index| self.parameters[index].1.as_str())
    }

    /// Returns the `charset` parameter, or [`charset::US_ASCII`] when it is
    /// absent.
    pub fn charset(&self) -> Result<&'static Encoding, MediaTypeError> {
        self.charset_or(charset::US_ASCII)
    }

    /// Returns the `charset` parameter, or `default` when it is absent.
    ///
    /// # Errors
    ///
    /// [`MediaTypeError::UnsupportedCharset`] if the parameter names an
    /// unknown charset.
    pub fn charset_or(&self, default: &'static Encoding) -> Result<&'static Encoding, MediaTypeError> {
        match self.parameter(CHARSET) {
            Some(label) => charset::for_label(label),
            None => Ok(default),
        }
    }

    /// `true` if the type is `*`.
    pub fn is_wildcard_type(&self) -> bool {
        self.type_ == WILDCARD
    }

    /// `true` if the subtype is `*` or starts with it, as in `*+xml`.
    pub fn is_wildcard_subtype(&self) -> bool {
        self.subtype.starts_with(WILDCARD)
    }
}

/// Case-insensitive ordering of parameter names.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.bytes().map(|c| c.to_ascii_lowercase()).cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
}

fn insert_parameter(parameters: &mut Vec<(String, String)>, name: String, value: String) {
    let name = if name.eq_ignore_ascii_case(CHARSET) { CHARSET.to_string() } else { name };
    match parameters.binary_search_by(|(key, _)| compare_names(key, &name)) {
        Ok(index) => parameters[index].1 = value,
        Err(index) => parameters.insert(index, (name, value)),
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)?;
        for (name, value) in &self.parameters {
            write!(f, "; {name}={value}")?;
        }
        Ok(())
    }
}

impl FromStr for MediaType {
    type Err = MediaTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)?.ok_or_else(|| MediaTypeError::malformed(s))
    }
}

impl TryFrom<&mime::Mime> for MediaType {
    type Error = MediaTypeError;

    fn try_from(mime: &mime::Mime) -> Result<Self, Self::Error> {
        mime.as_ref().parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_string() {
        assert_eq!(MediaType::new("application", "octet-stream").unwrap().to_string(), "application/octet-stream");
        assert_eq!(MediaType::octet_stream(), MediaType::new("application", "octet-stream").unwrap());
        assert_eq!(MediaType::of_type("image").unwrap().to_string(), "image/*");
    }

    #[test]
    fn test_parse_lowercases_type() {
        let media_type = MediaType::parse("Text/HTML; Level=1").unwrap().unwrap();
        assert_eq!(media_type.type_(), "text");
        assert_eq!(media_type.subtype(), "html");
        assert_eq!(media_type.to_string(), "text/html; Level=1");
    }

    #[test]
    fn test_canonical_order() {
        let media_type = MediaType::parse("text/plain; b=2; a=1").unwrap().unwrap();
        assert_eq!(media_type.to_string(), "text/plain; a=1; b=2");

        let media_type = MediaType::parse("text/plain; charset=utf-8; B=2; a=1").unwrap().unwrap();
        assert_eq!(media_type.to_string(), "text/plain; a=1; B=2; charset=utf-8");
    }

    #[test]
    fn test_charset_name_is_canonical() {
        let media_type = MediaType::parse("text/plain; CharSet=UTF-8").unwrap().unwrap();
        assert_eq!(media_type.to_string(), "text/plain; charset=UTF-8");
        assert!(media_type.has_parameter("CHARSET"));

        let media_type = MediaType::parse("text/plain; Charset=a; charset=utf-8").unwrap().unwrap();
        assert_eq!(media_type.to_string(), "text/plain; charset=utf-8");
    }

    #[test]
    fn test_round_trip() {
        let inputs = [
            "text/plain",
            "text/plain; charset=utf-8",
            "multipart/form-data; boundary=abc-_123",
            "application/vnd.api+json; q=\"a b; c\"; version=2",
            "*/*",
            "application/*+xml",
        ];
        for input in inputs {
            let media_type = MediaType::parse(input).unwrap().unwrap();
            let reparsed = MediaType::parse(&media_type.to_string()).unwrap().unwrap();
            assert_eq!(media_type, reparsed, "round trip of {input}");
        }
    }

    #[test]
    fn test_quoted_parameter() {
        let media_type = MediaType::parse("text/plain; name=\"x y\"").unwrap().unwrap();
        assert_eq!(media_type.parameter("name"), Some("x y"));
        assert_eq!(media_type.parameter("NAME"), Some("x y"));
        assert_eq!(media_type.parameters().collect::<Vec<_>>(), vec![("name", "\"x y\"")]);
        assert_eq!(media_type.parameter("missing"), None);
        assert_eq!(media_type.parameter_or("missing", "fallback"), "fallback");
    }

    #[test]
    fn test_malformed() {
        assert_eq!(
            MediaType::parse("text/plain; bad"),
            Err(MediaTypeError::Malformed { input: "text/plain; bad".to_string() })
        );
        assert!(MediaType::parse("text/plain;").unwrap().is_some());
        assert_eq!(MediaType::parse("plain text"), Ok(None));
        assert!("plain text".parse::<MediaType>().is_err());
    }

    #[test]
    fn test_construct_validation() {
        assert_eq!(MediaType::new("", "plain"), Err(MediaTypeError::MissingType));
        assert!(MediaType::new("te xt", "plain").is_err());
        assert!(MediaType::new("text", "pl/ain").is_err());
        assert!(MediaType::with_parameters("text", "plain", [("a b", "1")]).is_err());
        assert!(MediaType::with_parameters("text", "plain", [("a", "x y")]).is_err());

        let media_type = MediaType::with_parameters("text", "plain", [("z", "1"), ("a", "\"x y\"")]).unwrap();
        assert_eq!(media_type.to_string(), "text/plain; a=\"x y\"; z=1");
    }

    #[test]
    fn test_charset() {
        let media_type = MediaType::parse("text/plain; charset=\"utf-8\"").unwrap().unwrap();
        assert_eq!(media_type.charset().unwrap(), charset::UTF_8);

        let media_type = MediaType::text_plain();
        assert_eq!(media_type.charset().unwrap(), charset::US_ASCII);
        assert_eq!(media_type.charset_or(charset::UTF_8).unwrap(), charset::UTF_8);

        let media_type = MediaType::parse("text/plain; charset=bogus").unwrap().unwrap();
        assert!(matches!(media_type.charset(), Err(MediaTypeError::UnsupportedCharset { .. })));
    }

    #[test]
    fn test_wildcards() {
        let any = MediaType::parse("*/*").unwrap().unwrap();
        assert!(any.is_wildcard_type());
        assert!(any.is_wildcard_subtype());

        let xml = MediaType::parse("application/*+xml").unwrap().unwrap();
        assert!(!xml.is_wildcard_type());
        assert!(xml.is_wildcard_subtype());

        assert!(!MediaType::text_plain().is_wildcard_subtype());
    }

    #[test]
    fn test_from_mime() {
        let media_type = MediaType::try_from(&mime::TEXT_PLAIN_UTF_8).unwrap();
        assert_eq!(media_type.to_string(), "text/plain; charset=utf-8");
        assert_eq!(MediaType::try_from(&mime::APPLICATION_OCTET_STREAM).unwrap(), MediaType::octet_stream());
    }
}
