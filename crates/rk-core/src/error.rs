use thiserror::Error;

pub type RkResult<T> = Result<T, RkError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RkError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}
