//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod error;
pub mod health;
pub mod password_reset;
pub mod properties;
pub mod session;
pub mod session_config;
pub mod state;
pub mod suggestions;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
