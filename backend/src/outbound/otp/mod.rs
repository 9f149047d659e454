//! One-time code delivery adapters.

mod log_only_delivery;

pub use log_only_delivery::LogOnlyOtpDelivery;
