use bridge_traits::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccessError {
    #[error("Permission bridge unavailable: {0}")]
    BridgeUnavailable(String),

    #[error("Permission check failed: {0}")]
    CheckFailed(#[from] BridgeError),
}

pub type Result<T> = std::result::Result<T, AccessError>;
