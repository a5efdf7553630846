#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no layout registered under key: {key}")]
    UnknownLayout { key: String },

    #[error("graph contains an edge with a missing endpoint: {from} -> {to}")]
    MissingEndpoint { from: String, to: String },

    #[error("graph contains duplicate node id: {id}")]
    DuplicateNode { id: String },

    #[error("invalid layout options: {message}")]
    InvalidOptions { message: String },

    #[error("frame source ended before the transition finished (progress {progress})")]
    FramesExhausted { progress: f64 },

    #[error("transition superseded by a newer one (progress {progress})")]
    TransitionCancelled { progress: f64 },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
