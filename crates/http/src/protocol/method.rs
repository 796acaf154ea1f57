use std::fmt;
use std::str::FromStr;

use crate::protocol::HttpError;

/// The request methods understood by this crate, including the WebDAV
/// extensions.
///
/// Each method carries three static policies a transport uses to frame the
/// request: whether it invalidates cached responses, whether it requires a
/// body and whether it permits one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Patch,
    Move,
    Options,
    Report,
    Propfind,
    Proppatch,
    Mkcol,
    Lock,
    Unlock,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 14] = [
        Self::Get,
        Self::Head,
        Self::Post,
        Self::Put,
        Self::Delete,
        Self::Patch,
        Self::Move,
        Self::Options,
        Self::Report,
        Self::Propfind,
        Self::Proppatch,
        Self::Mkcol,
        Self::Lock,
        Self::Unlock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Move => "MOVE",
            Self::Options => "OPTIONS",
            Self::Report => "REPORT",
            Self::Propfind => "PROPFIND",
            Self::Proppatch => "PROPPATCH",
            Self::Mkcol => "MKCOL",
            Self::Lock => "LOCK",
            Self::Unlock => "UNLOCK",
        }
    }

    #[inline]
    pub fn invalidates_cache(&self) -> bool {
        matches!(self, Self::Post | Self::Patch | Self::Put | Self::Delete | Self::Move)
    }

    #[inline]
    pub fn requires_request_body(&self) -> bool {
        matches!(self, Self::Post | Self::Patch | Self::Put | Self::Proppatch | Self::Report)
    }

    #[inline]
    pub fn permits_request_body(&self) -> bool {
        self.requires_request_body()
            || matches!(self, Self::Delete | Self::Options | Self::Propfind | Self::Mkcol | Self::Lock)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = HttpError;

    /// Method names are case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| HttpError::invalid_message(format!("unsupported http method: {s}")))
    }
}

impl TryFrom<&http::Method> for HttpMethod {
    type Error = HttpError;

    fn try_from(method: &http::Method) -> Result<Self, Self::Error> {
        method.as_str().parse()
    }
}

impl TryFrom<HttpMethod> for http::Method {
    type Error = http::method::InvalidMethod;

    fn try_from(method: HttpMethod) -> Result<Self, Self::Error> {
        match method {
            HttpMethod::Get => Ok(http::Method::GET),
            HttpMethod::Head => Ok(http::Method::HEAD),
            HttpMethod::Post => Ok(http::Method::POST),
            HttpMethod::Put => Ok(http::Method::PUT),
            HttpMethod::Delete => Ok(http::Method::DELETE),
            HttpMethod::Patch => Ok(http::Method::PATCH),
            HttpMethod::Options => Ok(http::Method::OPTIONS),
            extension => http::Method::from_bytes(extension.as_str().as_bytes()),
        }
    }
}
