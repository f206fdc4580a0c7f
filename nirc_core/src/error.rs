#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed message: {0:?}")]
    MalformedMessage(String),

    #[error("malformed prefix: {0:?}")]
    MalformedPrefix(String),

    #[error("{0}: only the last argument can contain spaces")]
    MisplacedTrailing(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
