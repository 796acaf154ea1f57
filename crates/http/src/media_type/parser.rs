//! Scanner for the `type/subtype *(";" [name "=" (token / quoted-string)])`
//! grammar.

use crate::ensure;
use crate::protocol::MediaTypeError;

const TOKEN_SPECIALS: &[u8] = b"-!#$%&'*+.^_`{|}~";

#[inline]
pub(crate) fn is_token_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || TOKEN_SPECIALS.contains(&b)
}

#[inline]
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Length of the token at the start of `bytes`, zero when there is none.
#[inline]
fn token_len(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| is_token_char(**b)).count()
}

/// Length of the quoted string at the start of `bytes`, quotes included.
fn quoted_len(bytes: &[u8]) -> Option<usize> {
    if bytes.first() != Some(&b'"') {
        return None;
    }
    bytes[1..].iter().position(|b| *b == b'"').map(|end| end + 2)
}

pub(crate) fn is_token(str: &str) -> bool {
    !str.is_empty() && token_len(str.as_bytes()) == str.len()
}

pub(crate) fn is_quoted(str: &str) -> bool {
    quoted_len(str.as_bytes()) == Some(str.len())
}

/// The raw pieces of a media type string, before canonicalization.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct RawMediaType<'a> {
    pub(crate) type_: &'a str,
    pub(crate) subtype: &'a str,
    pub(crate) parameters: Vec<(&'a str, &'a str)>,
}

/// Splits `input` into type, subtype and parameters.
///
/// Returns `Ok(None)` when `input` does not even start with `type/subtype`,
/// and an error when it does but a parameter segment is malformed.
pub(crate) fn scan(input: &str) -> Result<Option<RawMediaType<'_>>, MediaTypeError> {
    let bytes = input.as_bytes();

    let type_len = token_len(bytes);
    if type_len == 0 || bytes.get(type_len) != Some(&b'/') {
        return Ok(None);
    }
    let subtype_start = type_len + 1;
    let subtype_len = token_len(&bytes[subtype_start..]);
    if subtype_len == 0 {
        return Ok(None);
    }

    let mut pos = subtype_start + subtype_len;
    let mut parameters = Vec::new();

    while pos < bytes.len() {
        ensure!(bytes[pos] == b';', MediaTypeError::malformed(input));
        pos += 1;
        while pos < bytes.len() && is_space(bytes[pos]) {
            pos += 1;
        }

        // the `name=value` pair is optional, a bare `;` is skipped
        let name_len = token_len(&bytes[pos..]);
        if name_len == 0 || bytes.get(pos + name_len) != Some(&b'=') {
            continue;
        }

        let value_start = pos + name_len + 1;
        let value_len = match token_len(&bytes[value_start..]) {
            0 => quoted_len(&bytes[value_start..]).ok_or_else(|| MediaTypeError::malformed(input))?,
            n => n,
        };

        parameters.push((&input[pos..pos + name_len], &input[value_start..value_start + value_len]));
        pos = value_start + value_len;
    }

    Ok(Some(RawMediaType {
        type_: &input[..type_len],
        subtype: &input[subtype_start..subtype_start + subtype_len],
        parameters,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token() {
        assert!(is_token("text"));
        assert!(is_token("vnd.api+json"));
        assert!(is_token("*"));
        assert!(!is_token(""));
        assert!(!is_token("a b"));
        assert!(!is_token("a/b"));
        assert!(!is_token("\"a\""));
    }

    #[test]
    fn test_quoted() {
        assert!(is_quoted("\"x y\""));
        assert!(is_quoted("\"\""));
        assert!(!is_quoted("\"x"));
        assert!(!is_quoted("\"x\"y\""));
        assert!(!is_quoted("x"));
    }

    #[test]
    fn test_scan_type_only() {
        let raw = scan("text/plain").unwrap().unwrap();
        assert_eq!(raw.type_, "text");
        assert_eq!(raw.subtype, "plain");
        assert!(raw.parameters.is_empty());
    }

    #[test]
    fn test_scan_parameters() {
        let raw = scan("text/html;charset=utf-8; name=\"a; b\";\tq=1").unwrap().unwrap();
        assert_eq!(raw.parameters, vec![("charset", "utf-8"), ("name", "\"a; b\""), ("q", "1")]);
    }

    #[test]
    fn test_scan_not_a_media_type() {
        assert_eq!(scan(""), Ok(None));
        assert_eq!(scan("text"), Ok(None));
        assert_eq!(scan("text/"), Ok(None));
        assert_eq!(scan(" text/plain"), Ok(None));
        assert_eq!(scan("/plain"), Ok(None));
    }

    #[test]
    fn test_scan_empty_segments() {
        let raw = scan("text/plain;").unwrap().unwrap();
        assert!(raw.parameters.is_empty());

        let raw = scan("text/plain; ;a=1").unwrap().unwrap();
        assert_eq!(raw.parameters, vec![("a", "1")]);
    }

    #[test]
    fn test_scan_malformed() {
        assert!(scan("text/plain; bad").is_err());
        assert!(scan("text/plain x").is_err());
        assert!(scan("text/plain; a=").is_err());
        assert!(scan("text/plain; a=\"open").is_err());
        assert!(scan("text/plain; a=1 ").is_err());
    }
}
