use async_trait::async_trait;

use crate::error::Result;
use crate::models::identity::Identity;

/// Delivery channel for one-time codes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OtpSender: Send + Sync {
    async fn send(&self, identity: &Identity, code: &str) -> Result<()>;
}

/// Log target carrying the codes themselves.
pub const DELIVERY_TARGET: &str = "otp_delivery";

/// Writes codes to the log instead of sending an SMS. Codes appear at
/// `debug` level under [`DELIVERY_TARGET`], which the default log filter
/// enables.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOtpSender;

#[async_trait]
impl OtpSender for LogOtpSender {
    async fn send(&self, identity: &Identity, code: &str) -> Result<()> {
        tracing::info!(identity_id = %identity.id, phone = %mask_phone(&identity.phone), "one-time code issued");
        tracing::debug!(target: DELIVERY_TARGET, identity_id = %identity.id, code, "one-time code");
        Ok(())
    }
}

fn mask_phone(phone: &str) -> String {
    let digits = phone.chars().count();
    phone
        .chars()
        .enumerate()
        .map(|(idx, c)| if idx + 4 < digits && c.is_ascii_digit() { '*' } else { c })
        .collect()
}
