//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations translate between Diesel row structs and
//! domain types and carry no business rules. Row structs (`models.rs`) and
//! table definitions (`schema.rs`) stay private to this module. All
//! repositories share one [`DbPool`] and map driver failures onto their port
//! error enums.
//!
//! # Example
//!
//! ```no_run
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! use propertyhub::outbound::persistence::{DbPool, DieselPropertyRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/propertyhub")).await?;
//! let properties = DieselPropertyRepository::new(pool);
//! # let _ = properties;
//! # Ok(())
//! # }
//! ```

mod diesel_account_repository;
mod diesel_error_mapping;
mod diesel_password_reset_repository;
mod diesel_property_repository;
mod diesel_suggestion_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_password_reset_repository::DieselPasswordResetRepository;
pub use diesel_property_repository::DieselPropertyRepository;
pub use diesel_suggestion_repository::DieselSuggestionRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
