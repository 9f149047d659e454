//! Port for handing one-time codes to the account holder.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{EmailAddress, OtpCode};

use super::define_port_error;

define_port_error! {
    /// Errors raised by OTP delivery adapters.
    pub enum OtpDeliveryError {
        /// The delivery channel rejected or dropped the message.
        Unavailable { message: String } => "otp delivery failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OtpDelivery: Send + Sync {
    /// Send `code` to `recipient`.
    async fn deliver(
        &self,
        recipient: &EmailAddress,
        code: &OtpCode,
        expires_at: DateTime<Utc>,
    ) -> Result<(), OtpDeliveryError>;
}
