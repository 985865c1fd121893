use autolab_core::error::CoreError;

/// Errors from the job API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, body read).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The runner returned a non-2xx status code.
    #[error("Job API error ({status}): {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response body for the operator.
        body: String,
    },

    /// A 2xx response whose body is not the expected JSON shape.
    #[error("Unexpected response from job API: {message}: {body}")]
    Protocol {
        /// Parser diagnostic.
        message: String,
        /// Raw response body.
        body: String,
    },

    /// The job uuid cannot be used as a path segment.
    #[error("Invalid job uuid: {0:?}")]
    InvalidJobUuid(String),

    /// The configured API URL could not be parsed.
    #[error("Invalid job API URL {url:?}: {message}")]
    InvalidUrl { url: String, message: String },
}

impl ApiError {
    /// HTTP status code, if the server answered with one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Protocol { .. } | Self::InvalidJobUuid(_) | Self::InvalidUrl { .. } => None,
        }
    }
}

/// Why a submission did not start a job.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The form values were rejected before any request was sent.
    #[error(transparent)]
    Invalid(#[from] CoreError),

    /// The request was sent and failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}
