//! Port for read-only property lookups.

use async_trait::async_trait;

use crate::domain::{AccountId, PropertyFile, PropertyFileKind, PropertyId, PropertySummary};

use super::define_port_error;

define_port_error! {
    /// Errors raised by property repository adapters.
    pub enum PropertyRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "property repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "property repository query failed: {message}",
    }
}

/// Outcome of a file blob lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyFileLookup {
    /// No property has the requested id.
    PropertyMissing,
    /// The property exists but has no blob of that kind.
    FileMissing,
    Found(PropertyFile),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Every property, ordered by id.
    async fn list_all(&self) -> Result<Vec<PropertySummary>, PropertyRepositoryError>;

    async fn find_by_id(
        &self,
        id: PropertyId,
    ) -> Result<Option<PropertySummary>, PropertyRepositoryError>;

    /// Load one document blob.
    async fn find_file(
        &self,
        id: PropertyId,
        kind: PropertyFileKind,
    ) -> Result<PropertyFileLookup, PropertyRepositoryError>;

    /// Properties assigned to a consumer user.
    async fn list_for_user(
        &self,
        user_id: AccountId,
    ) -> Result<Vec<PropertySummary>, PropertyRepositoryError>;

    /// Properties owned by a developer.
    async fn list_for_developer(
        &self,
        developer_id: AccountId,
    ) -> Result<Vec<PropertySummary>, PropertyRepositoryError>;
}
