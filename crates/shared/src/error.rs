use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const INVALID_PRODUCT_ALERT: &str = "Product data is invalid. Please try again.";
pub const MISSING_SHIPPING_ALERT: &str = "Please fill out the required shipping information.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    CorruptState,
    Storage,
}

#[derive(Debug, Error)]
pub enum CartError {
    #[error("invalid product: {reason}")]
    InvalidProduct { reason: String },
    #[error("shipping information is incomplete")]
    MissingShippingInfo,
    #[error("persisted cart is not valid JSON: {0}")]
    CorruptCart(#[from] serde_json::Error),
    #[error("cart storage failed: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl CartError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidProduct { .. } | Self::MissingShippingInfo => ErrorCode::Validation,
            Self::CorruptCart(_) => ErrorCode::CorruptState,
            Self::Storage(_) => ErrorCode::Storage,
        }
    }

    /// Text of the blocking alert shown to the shopper, if this error is one
    /// the shopper can act on.
    pub fn alert_message(&self) -> Option<&'static str> {
        match self {
            Self::InvalidProduct { .. } => Some(INVALID_PRODUCT_ALERT),
            Self::MissingShippingInfo => Some(MISSING_SHIPPING_ALERT),
            Self::CorruptCart(_) | Self::Storage(_) => None,
        }
    }
}
