//! Outbound adapters implementing driven domain ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM
//! - **security**: Argon2id password hashing
//! - **otp**: one-time code delivery
//! - **identity**: federated ID token verification
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business rules.

pub mod identity;
pub mod otp;
pub mod persistence;
pub mod security;
