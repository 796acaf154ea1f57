use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("media type error: {source}")]
    MediaTypeError {
        #[from]
        source: MediaTypeError,
    },

    #[error("entity error: {source}")]
    EntityError {
        #[from]
        source: EntityError,
    },

    #[error("uri error: {source}")]
    UriError {
        #[from]
        source: UriError,
    },

    #[error("invalid message: {reason}")]
    InvalidMessage { reason: String },
}

impl HttpError {
    pub fn invalid_message<S: ToString>(str: S) -> Self {
        Self::InvalidMessage { reason: str.to_string() }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaTypeError {
    #[error("malformed media type: {input}")]
    Malformed { input: String },

    #[error("media type is required")]
    MissingType,

    #[error("unsupported charset: {charset}")]
    UnsupportedCharset { charset: String },

    /// The text holds characters the charset cannot represent, or the
    /// charset can only be decoded.
    #[error("text cannot be encoded as {charset}")]
    Unencodable { charset: String },
}

impl MediaTypeError {
    pub fn malformed<S: ToString>(str: S) -> Self {
        Self::Malformed { input: str.to_string() }
    }

    pub fn unsupported_charset<S: ToString>(str: S) -> Self {
        Self::UnsupportedCharset { charset: str.to_string() }
    }

    pub fn unencodable<S: ToString>(str: S) -> Self {
        Self::Unencodable { charset: str.to_string() }
    }
}

#[derive(Error, Debug)]
pub enum EntityError {
    /// A stream-backed entity was asked for its content a second time.
    #[error("entity content has already been consumed")]
    Consumed,

    #[error("failed to encode entity: {reason}")]
    Encode { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl EntityError {
    pub fn encode<S: ToString>(str: S) -> Self {
        Self::Encode { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UriError {
    #[error("unsupported scheme: {scheme}")]
    UnsupportedScheme { scheme: String },

    #[error("uri has no scheme: {uri}")]
    MissingScheme { uri: String },
}

impl UriError {
    pub fn unsupported_scheme<S: ToString>(str: S) -> Self {
        Self::UnsupportedScheme { scheme: str.to_string() }
    }

    pub fn missing_scheme<S: ToString>(str: S) -> Self {
        Self::MissingScheme { uri: str.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let error: HttpError = MediaTypeError::malformed("text/plain; bad").into();
        assert!(matches!(error, HttpError::MediaTypeError { .. }));
        assert_eq!(error.to_string(), "media type error: malformed media type: text/plain; bad");

        let error: HttpError = EntityError::Consumed.into();
        assert!(matches!(error, HttpError::EntityError { source: EntityError::Consumed }));

        let error: EntityError = io::Error::from(io::ErrorKind::NotFound).into();
        assert!(matches!(error, EntityError::Io { .. }));
    }
}
