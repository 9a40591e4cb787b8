use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid commitment level: {0}")]
    InvalidCommitment(String),

    #[error("Program id is missing or incorrect: {0}")]
    MissingProgramId(String),
}
