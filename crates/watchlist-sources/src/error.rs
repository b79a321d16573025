use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// The API answered but flagged the request as failed (`Response: "False"`)
    #[error("API error: {0}")]
    Api(String),

    #[error("No API key configured")]
    MissingApiKey,
}

impl SourceError {
    /// True when the remote side reported a failure in the payload rather
    /// than the request itself failing
    pub fn is_api_failure(&self) -> bool {
        matches!(self, SourceError::Api(_))
    }
}
