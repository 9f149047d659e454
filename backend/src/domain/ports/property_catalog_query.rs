//! Driving port for browsing properties and downloading their documents.

use async_trait::async_trait;

use crate::domain::{
    AccountId, Error, PropertyFile, PropertyFileKind, PropertyId, PropertySummary,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PropertyCatalogQuery: Send + Sync {
    async fn list_all(&self) -> Result<Vec<PropertySummary>, Error>;

    /// `not_found` when no property has `id`.
    async fn get_by_id(&self, id: PropertyId) -> Result<PropertySummary, Error>;

    /// `not_found` when the property or the requested blob is missing.
    async fn get_file(&self, id: PropertyId, kind: PropertyFileKind)
    -> Result<PropertyFile, Error>;

    /// Assigned properties; empty when the user has none.
    async fn list_for_user(&self, user_id: AccountId) -> Result<Vec<PropertySummary>, Error>;

    async fn list_for_developer(
        &self,
        developer_id: AccountId,
    ) -> Result<Vec<PropertySummary>, Error>;
}
