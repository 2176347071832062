//! Exit codes for the CLI.
//!
//! A non-2xx answer from the service is still a completed call, so it gets
//! its own code distinct from local failures.

use crate::error::ClientError;
use reqwest::StatusCode;

/// Success - the service answered 2xx.
pub const SUCCESS: u8 = 0;

/// The service answered with a non-2xx status.
pub const HTTP_STATUS: u8 = 1;

/// Usage error - missing credentials or bad configuration.
pub const USAGE: u8 = 2;

/// Network error - the request never got an answer.
pub const NETWORK: u8 = 4;

/// Internal error - anything else.
pub const INTERNAL: u8 = 7;

pub fn from_status(status: StatusCode) -> u8 {
    if status.is_success() {
        SUCCESS
    } else {
        HTTP_STATUS
    }
}

/// Convert an anyhow::Error to an appropriate exit code.
pub fn from_error(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<ClientError>() {
        Some(ClientError::Network(_)) => NETWORK,
        Some(
            ClientError::MissingCredentials
            | ClientError::PhotoRead { .. }
            | ClientError::ConfigRead(_)
            | ClientError::ConfigParse(_),
        ) => USAGE,
        _ => INTERNAL,
    }
}
