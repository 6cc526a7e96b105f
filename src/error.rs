use thiserror::Error;

#[derive(Error, Debug)]
pub enum CfnError {
    #[error("failed to load AWS configuration: {0}")]
    Configuration(String),

    #[error("failed to list stacks: {0:#}")]
    ListFailure(anyhow::Error),

    #[error("invalid property filter {token:?}: {reason}")]
    InvalidFilterSyntax { token: String, reason: &'static str },

    #[error("No stacks to search")]
    NoStacksToSearch,

    #[error("No stacks found")]
    NoStacksFound,
}
