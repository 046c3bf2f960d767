use std::{fmt, io};

#[derive(Debug)]
pub enum MasstError {
    InvalidArgument(String),
    Io(io::Error),
    Json(serde_json::Error),
    Http(reqwest::Error),
    Parse(String),
}

pub type Result<T> = std::result::Result<T, MasstError>;

impl MasstError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        MasstError::InvalidArgument(msg.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, MasstError::InvalidArgument(_))
    }
}

impl fmt::Display for MasstError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MasstError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            MasstError::Io(e) => write!(f, "io error: {e}"),
            MasstError::Json(e) => write!(f, "json error: {e}"),
            MasstError::Http(e) => write!(f, "http error: {e}"),
            MasstError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for MasstError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MasstError::Io(e) => Some(e),
            MasstError::Json(e) => Some(e),
            MasstError::Http(e) => Some(e),
            MasstError::InvalidArgument(_) | MasstError::Parse(_) => None,
        }
    }
}

impl From<io::Error> for MasstError {
    fn from(e: io::Error) -> Self {
        MasstError::Io(e)
    }
}

impl From<serde_json::Error> for MasstError {
    fn from(e: serde_json::Error) -> Self {
        MasstError::Json(e)
    }
}

impl From<reqwest::Error> for MasstError {
    fn from(e: reqwest::Error) -> Self {
        MasstError::Http(e)
    }
}
