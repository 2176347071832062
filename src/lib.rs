//! PetFriends API client
//!
//! A thin, stateless wrapper over the PetFriends pet-management REST API.
//! Every call yields the HTTP status plus the parsed body; error statuses are
//! results to assert on, not failures.

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod error;
pub mod exit_codes;
pub mod output;
pub mod types;
pub mod ua;

pub use client::ApiClient;
pub use error::ClientError;
pub use types::{ApiKey, ApiResponse, Pet, PetFilter, PetList, ResponseBody};
