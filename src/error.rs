use roomconsole::{ConsoleError, Failure};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Console(#[from] ConsoleError),

    #[error("{0}")]
    Failed(#[from] Failure),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no console URL given (use --url or ROOMCTL_URL)")]
    MissingUrl,

    #[error("{0} requires --room")]
    MissingRoom(&'static str),

    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("{0} changed on the server; rerun with --on-conflict reload or overwrite")]
    Conflict(String),

    #[error("validation failed")]
    Invalid,

    #[error("interrupted")]
    Cancelled,
}
