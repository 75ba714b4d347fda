use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  #[error("shape mismatch: expected {expected} values, got {actual}")]
  ShapeMismatch { expected: usize, actual: usize }
}

impl Error {
  pub(crate) fn invalid<S: Into<String>>(msg: S) -> Self {
    Error::InvalidArgument(msg.into())
  }
}

pub type Result<T> = std::result::Result<T, Error>;
