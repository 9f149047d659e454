//! Development stand-in for an email gateway.
//!
//! Writes the code to the tracing pipeline at `debug` level under the
//! `propertyhub::otp` target instead of sending mail. Deployments that need
//! real delivery plug in another `OtpDelivery` adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::domain::ports::{OtpDelivery, OtpDeliveryError};
use crate::domain::{EmailAddress, OtpCode};

/// Emits one-time codes as log events.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogOnlyOtpDelivery;

#[async_trait]
impl OtpDelivery for LogOnlyOtpDelivery {
    async fn deliver(
        &self,
        recipient: &EmailAddress,
        code: &OtpCode,
        expires_at: DateTime<Utc>,
    ) -> Result<(), OtpDeliveryError> {
        info!(target: "propertyhub::otp", %recipient, %expires_at, "one-time code issued");
        debug!(target: "propertyhub::otp", %recipient, code = code.expose(), "one-time code");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn delivery_always_succeeds() {
        let recipient = EmailAddress::new("ada@example.com").expect("valid email");
        let code = OtpCode::parse("246810").expect("valid code");

        LogOnlyOtpDelivery
            .deliver(&recipient, &code, Utc::now())
            .await
            .expect("logged");
    }
}
