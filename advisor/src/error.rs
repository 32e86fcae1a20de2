use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdvisorError {
    #[error("Invalid card: {0:?}. Expected one of 2-10, J, Q, K, A")]
    InvalidCard(String),

    #[error("No drawable cards left in the shoe")]
    EmptyShoe,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, AdvisorError>;
