//! Scheme checks for components that only handle some kinds of URIs.

use std::collections::BTreeSet;

use tracing::debug;

use crate::protocol::UriError;

/// A fixed set of URI schemes, compared case-insensitively.
///
/// Schemes are stored lowercased and iterate in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemeSet {
    schemes: BTreeSet<String>,
}

impl SchemeSet {
    pub fn new<I, S>(schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self { schemes: schemes.into_iter().map(|scheme| scheme.as_ref().to_ascii_lowercase()).collect() }
    }

    pub fn contains(&self, scheme: &str) -> bool {
        self.schemes.contains(&scheme.to_ascii_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.schemes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for SchemeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Something that accepts URIs of a fixed set of schemes.
pub trait UriHandler {
    fn supported_schemes(&self) -> &SchemeSet;

    fn is_scheme_supported(&self, scheme: &str) -> bool {
        self.supported_schemes().contains(scheme)
    }

    /// # Errors
    ///
    /// - [`UriError::MissingScheme`] if `uri` has no `scheme:` prefix
    /// - [`UriError::UnsupportedScheme`] if the scheme is not in
    ///   [`supported_schemes`](Self::supported_schemes)
    fn ensure_supported(&self, uri: &str) -> Result<(), UriError> {
        let scheme = scheme_of(uri).ok_or_else(|| UriError::missing_scheme(uri))?;
        if self.is_scheme_supported(scheme) {
            Ok(())
        } else {
            debug!(scheme, uri, "rejecting uri with unsupported scheme");
            Err(UriError::unsupported_scheme(scheme))
        }
    }
}

/// The scheme of `uri` as defined by RFC 3986: a letter followed by letters,
/// digits, `+`, `-` or `.`, terminated by `:`.
fn scheme_of(uri: &str) -> Option<&str> {
    let (scheme, _) = uri.split_once(':')?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if first.is_ascii_alphabetic() && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some(scheme)
    } else {
        None
    }
}
