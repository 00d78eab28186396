use thiserror::Error;

/// Failure of a request against the remote provider.
///
/// Cloneable so it can be stored in cache entries and carried across the task channel;
/// underlying `reqwest`/`serde_json` errors are flattened to their messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("HTTP error {status} from {url}")]
    Http { url: String, status: u16 },

    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("Invalid page number: {0}")]
    InvalidPage(u32),

    #[error("{} of {total} related fetches failed: {cause}", failed.len())]
    PartialFetch { failed: Vec<String>, total: usize, cause: Box<FetchError> },
}

impl FetchError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

#[derive(Error, Debug)]
pub enum FinderError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Reqwest error: {0}")]
    Reqwest(Box<reqwest::Error>),

    #[error("FinderError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for FinderError {
    fn from(error: std::io::Error) -> Self {
        FinderError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for FinderError {
    fn from(error: reqwest::Error) -> Self {
        FinderError::Reqwest(Box::new(error))
    }
}
