/// Errors that can occur while fetching or reading Letterboxd pages.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Page not found: {url}")]
    NotFound { url: String },

    #[error("Server error (HTTP {status}) for {url}")]
    ServerError { status: u16, url: String },

    #[error("Unexpected page markup: {0}")]
    Markup(String),
}

impl ScrapeError {
    pub fn markup(msg: impl Into<String>) -> Self {
        Self::Markup(msg.into())
    }

    /// The page (or the element we wanted on it) does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Markup(_))
    }

    /// A failure that may go away on a later attempt: transport errors,
    /// server-side errors and throttling. A request that could not even be
    /// built (bad URL) is permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => !e.is_builder(),
            Self::ServerError { status, .. } => *status >= 500 || *status == 429,
            Self::NotFound { .. } | Self::Markup(_) => false,
        }
    }
}
