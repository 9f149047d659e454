//! Read-only property catalog service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    PropertyCatalogQuery, PropertyFileLookup, PropertyRepository, PropertyRepositoryError,
};
use crate::domain::{
    AccountId, Error, PropertyFile, PropertyFileKind, PropertyId, PropertySummary,
};

/// Property catalog implementing [`PropertyCatalogQuery`].
#[derive(Clone)]
pub struct PropertyCatalogService<R> {
    properties: Arc<R>,
}

impl<R> PropertyCatalogService<R> {
    pub fn new(properties: Arc<R>) -> Self {
        Self { properties }
    }
}

pub(crate) fn map_property_error(error: PropertyRepositoryError) -> Error {
    match error {
        PropertyRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("property repository unavailable: {message}"))
        }
        PropertyRepositoryError::Query { message } => {
            Error::internal(format!("property repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R> PropertyCatalogQuery for PropertyCatalogService<R>
where
    R: PropertyRepository,
{
    async fn list_all(&self) -> Result<Vec<PropertySummary>, Error> {
        self.properties.list_all().await.map_err(map_property_error)
    }

    async fn get_by_id(&self, id: PropertyId) -> Result<PropertySummary, Error> {
        self.properties
            .find_by_id(id)
            .await
            .map_err(map_property_error)?
            .ok_or_else(|| Error::not_found(format!("property {id} not found")))
    }

    async fn get_file(
        &self,
        id: PropertyId,
        kind: PropertyFileKind,
    ) -> Result<PropertyFile, Error> {
        match self
            .properties
            .find_file(id, kind)
            .await
            .map_err(map_property_error)?
        {
            PropertyFileLookup::Found(file) => Ok(file),
            PropertyFileLookup::PropertyMissing => {
                Err(Error::not_found(format!("property {id} not found")))
            }
            PropertyFileLookup::FileMissing => Err(Error::not_found(format!(
                "property {id} has no {kind}"
            ))),
        }
    }

    async fn list_for_user(&self, user_id: AccountId) -> Result<Vec<PropertySummary>, Error> {
        self.properties
            .list_for_user(user_id)
            .await
            .map_err(map_property_error)
    }

    async fn list_for_developer(
        &self,
        developer_id: AccountId,
    ) -> Result<Vec<PropertySummary>, Error> {
        self.properties
            .list_for_developer(developer_id)
            .await
            .map_err(map_property_error)
    }
}
