use std::fmt;

use crate::ensure;
use crate::protocol::HttpError;

/// A single `name: value` header line.
///
/// Names keep the case they were written with; every lookup in this crate
/// compares them case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HttpHeader {
    name: String,
    value: String,
}

impl HttpHeader {
    pub fn new<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Self { name: name.into(), value: value.into() }
    }

    /// Parses a raw header line such as `Content-Type: text/plain`.
    ///
    /// Name and value are trimmed. Fails when the line has no colon, or the
    /// colon is its first or last character.
    pub fn parse(line: &str) -> Result<Self, HttpError> {
        let colon = line.find(':').ok_or_else(|| HttpError::invalid_message(format!("malformed header: {line}")))?;
        ensure!(colon > 0 && colon < line.len() - 1, HttpError::invalid_message(format!("malformed header: {line}")));
        Ok(Self::new(line[..colon].trim(), line[colon + 1..].trim()))
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Case-insensitive name check.
    #[inline]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl<N: Into<String>, V: Into<String>> From<(N, V)> for HttpHeader {
    fn from((name, value): (N, V)) -> Self {
        Self::new(name, value)
    }
}

impl fmt::Display for HttpHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let header = HttpHeader::parse("Content-Type:  text/plain ").unwrap();
        assert_eq!(header.name(), "Content-Type");
        assert_eq!(header.value(), "text/plain");

        let header = HttpHeader::parse("Host: 127.0.0.1:8080").unwrap();
        assert_eq!(header.value(), "127.0.0.1:8080");
    }

    #[test]
    fn test_parse_malformed() {
        assert!(HttpHeader::parse("no colon").is_err());
        assert!(HttpHeader::parse(": value").is_err());
        assert!(HttpHeader::parse("Name:").is_err());
    }

    #[test]
    fn test_display_and_is() {
        let header = HttpHeader::from(("X-Trace", "abc"));
        assert_eq!(header.to_string(), "X-Trace: abc");
        assert!(header.is("x-trace"));
        assert!(!header.is("x-trace-id"));
    }
}
