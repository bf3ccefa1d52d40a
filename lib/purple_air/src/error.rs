#[derive(Debug)]
pub enum Error {
    Http(chipp_http::Error),
    UrlParse(chipp_http::UrlParseError),
    Json(serde_json::Error),
    Timeout(tokio::time::error::Elapsed),
}

impl From<chipp_http::Error> for Error {
    fn from(err: chipp_http::Error) -> Self {
        Self::Http(err)
    }
}

impl From<chipp_http::UrlParseError> for Error {
    fn from(err: chipp_http::UrlParseError) -> Self {
        Self::UrlParse(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<tokio::time::error::Elapsed> for Error {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        Self::Timeout(err)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "HTTP error: {err}"),
            Self::UrlParse(err) => write!(f, "URL parse error: {err}"),
            Self::Json(err) => write!(f, "JSON error: {err}"),
            Self::Timeout(err) => write!(f, "Timeout: {err}"),
        }
    }
}

impl std::error::Error for Error {}
