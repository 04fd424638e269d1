use thiserror::Error;

/// Hard failures of the engine. Ordinary non-primality is never an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PowError {
    #[error("chain length must be at least 1, got {0}")]
    InvalidChainLength(u32),

    #[error("unknown chain type tag: {0}")]
    UnknownChainType(String),

    #[error("not a decimal integer: {0:?}")]
    InvalidNumber(String),
}
