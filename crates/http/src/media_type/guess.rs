use std::path::Path;

use tracing::trace;

use super::MediaType;

/// Looks up the extension of a file name, path or URL in the `mime_guess`
/// table. The query string and fragment of a URL are ignored.
pub(crate) fn guess(path: &str) -> Option<MediaType> {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let extension = Path::new(path).extension()?.to_str()?;

    let mime = mime_guess::from_ext(extension).first()?;
    match MediaType::try_from(&mime) {
        Ok(media_type) => Some(media_type),
        Err(e) => {
            trace!(extension, cause = %e, "guessed mime type is not a valid media type");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_file_name() {
        assert_eq!(guess("logo.png").unwrap().to_string(), "image/png");
        assert_eq!(guess("notes.txt").unwrap().to_string(), "text/plain");
        assert_eq!(guess("/var/data/report.json").unwrap().to_string(), "application/json");
    }

    #[test]
    fn test_guess_url() {
        assert_eq!(guess("file:///tmp/logo.png").unwrap().to_string(), "image/png");
        assert_eq!(guess("https://example.com/a/logo.PNG?size=2#top").unwrap().to_string(), "image/png");
    }

    #[test]
    fn test_guess_unknown() {
        assert_eq!(guess("README"), None);
        assert_eq!(guess("archive.no-such-extension"), None);
        assert_eq!(guess(""), None);
    }

    #[test]
    fn test_guess_or() {
        assert_eq!(MediaType::guess_or("blob", MediaType::octet_stream()), MediaType::octet_stream());
    }
}
