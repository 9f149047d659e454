//! PostgreSQL-backed `PropertyRepository`.
//!
//! Listing queries never load the brochure or floor plan blobs; they select
//! `IS NOT NULL` flags instead. Blobs are fetched one at a time by
//! [`PropertyRepository::find_file`].

use async_trait::async_trait;
use diesel::dsl::IsNotNull;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PropertyFileLookup, PropertyRepository, PropertyRepositoryError};
use crate::domain::{
    AccountId, PropertyFile, PropertyFileKind, PropertyId, PropertySummary,
};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::PropertySummaryRow;
use super::pool::{DbPool, PoolError};
use super::schema::{properties, user_properties};

type SummaryColumns = (
    properties::id,
    properties::developer_id,
    properties::name,
    properties::apartment_type,
    properties::carpet_area,
    properties::development_stage,
    properties::image_url,
    IsNotNull<properties::brochure>,
    IsNotNull<properties::floor_plan>,
);

fn summary_columns() -> SummaryColumns {
    (
        properties::id,
        properties::developer_id,
        properties::name,
        properties::apartment_type,
        properties::carpet_area,
        properties::development_stage,
        properties::image_url,
        properties::brochure.is_not_null(),
        properties::floor_plan.is_not_null(),
    )
}

/// Diesel-backed implementation of the `PropertyRepository` port.
#[derive(Clone)]
pub struct DieselPropertyRepository {
    pool: DbPool,
}

impl DieselPropertyRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PropertyRepositoryError {
    PropertyRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> PropertyRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => PropertyRepositoryError::connection(message),
        DieselFailure::UniqueViolation { .. } => {
            PropertyRepositoryError::query("unique constraint violated")
        }
        DieselFailure::Query(message) => PropertyRepositoryError::query(message),
    }
}

fn row_to_summary(row: PropertySummaryRow) -> Result<PropertySummary, PropertyRepositoryError> {
    let id = PropertyId::new(row.id)
        .map_err(|err| PropertyRepositoryError::query(format!("stored property id: {err}")))?;
    let developer_id = AccountId::new(row.developer_id).map_err(|err| {
        PropertyRepositoryError::query(format!("stored developer id for property {id}: {err}"))
    })?;

    Ok(PropertySummary {
        id,
        name: row.name,
        apartment_type: row.apartment_type,
        carpet_area: row.carpet_area,
        development_stage: row.development_stage,
        image_url: row.image_url,
        developer_id,
        has_brochure: row.has_brochure,
        has_floor_plan: row.has_floor_plan,
    })
}

fn rows_to_summaries(
    rows: Vec<PropertySummaryRow>,
) -> Result<Vec<PropertySummary>, PropertyRepositoryError> {
    rows.into_iter().map(row_to_summary).collect()
}

/// Fallback used when a blob was stored without a filename.
fn default_filename(id: PropertyId, kind: PropertyFileKind) -> String {
    format!("property-{id}-{kind}.pdf")
}

fn to_lookup(
    id: PropertyId,
    kind: PropertyFileKind,
    row: Option<(Option<String>, Option<Vec<u8>>)>,
) -> PropertyFileLookup {
    match row {
        None => PropertyFileLookup::PropertyMissing,
        Some((_, None)) => PropertyFileLookup::FileMissing,
        Some((filename, Some(bytes))) => PropertyFileLookup::Found(PropertyFile {
            filename: filename.unwrap_or_else(|| default_filename(id, kind)),
            bytes,
        }),
    }
}

#[async_trait]
impl PropertyRepository for DieselPropertyRepository {
    async fn list_all(&self) -> Result<Vec<PropertySummary>, PropertyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PropertySummaryRow> = properties::table
            .select(summary_columns())
            .order(properties::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_summaries(rows)
    }

    async fn find_by_id(
        &self,
        id: PropertyId,
    ) -> Result<Option<PropertySummary>, PropertyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<PropertySummaryRow> = properties::table
            .find(id.get())
            .select(summary_columns())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_summary).transpose()
    }

    async fn find_file(
        &self,
        id: PropertyId,
        kind: PropertyFileKind,
    ) -> Result<PropertyFileLookup, PropertyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let query = properties::table.find(id.get());
        let row: Option<(Option<String>, Option<Vec<u8>>)> = match kind {
            PropertyFileKind::Brochure => {
                query
                    .select((properties::brochure_filename, properties::brochure))
                    .first(&mut conn)
                    .await
            }
            PropertyFileKind::FloorPlan => {
                query
                    .select((properties::floor_plan_filename, properties::floor_plan))
                    .first(&mut conn)
                    .await
            }
        }
        .optional()
        .map_err(map_diesel_error)?;

        Ok(to_lookup(id, kind, row))
    }

    async fn list_for_user(
        &self,
        user_id: AccountId,
    ) -> Result<Vec<PropertySummary>, PropertyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PropertySummaryRow> = user_properties::table
            .inner_join(properties::table)
            .filter(user_properties::user_id.eq(user_id.get()))
            .select(summary_columns())
            .order(properties::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_summaries(rows)
    }

    async fn list_for_developer(
        &self,
        developer_id: AccountId,
    ) -> Result<Vec<PropertySummary>, PropertyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PropertySummaryRow> = properties::table
            .filter(properties::developer_id.eq(developer_id.get()))
            .select(summary_columns())
            .order(properties::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_summaries(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn property_id() -> PropertyId {
        PropertyId::new(12).expect("valid id")
    }

    #[rstest]
    fn missing_row_means_missing_property() {
        assert_eq!(
            to_lookup(property_id(), PropertyFileKind::Brochure, None),
            PropertyFileLookup::PropertyMissing
        );
    }

    #[rstest]
    fn null_blob_means_missing_file() {
        assert_eq!(
            to_lookup(
                property_id(),
                PropertyFileKind::FloorPlan,
                Some((Some("plan.pdf".to_owned()), None))
            ),
            PropertyFileLookup::FileMissing
        );
    }

    #[rstest]
    fn blob_without_filename_gets_a_default() {
        let lookup = to_lookup(
            property_id(),
            PropertyFileKind::FloorPlan,
            Some((None, Some(vec![1, 2, 3]))),
        );
        let PropertyFileLookup::Found(file) = lookup else {
            panic!("expected a file");
        };
        assert_eq!(file.filename, "property-12-floor-plan.pdf");
        assert_eq!(file.bytes, vec![1, 2, 3]);
    }

    #[rstest]
    fn summary_rows_reject_non_positive_ids() {
        let row = PropertySummaryRow {
            id: 0,
            developer_id: 1,
            name: "Orchid Residency".to_owned(),
            apartment_type: "3BHK".to_owned(),
            carpet_area: 1200,
            development_stage: "Handover".to_owned(),
            image_url: None,
            has_brochure: true,
            has_floor_plan: false,
        };
        assert!(matches!(
            row_to_summary(row),
            Err(PropertyRepositoryError::Query { .. })
        ));
    }
}
