//! Property catalogue HTTP handlers.
//!
//! ```text
//! GET /api/v1/properties
//! GET /api/v1/properties/{id}
//! GET /api/v1/properties/{id}/files/{brochure|floor-plan}
//! GET /api/v1/users/{id}/properties
//! GET /api/v1/developers/{id}/properties
//! ```

use actix_web::http::header::{self, ContentDisposition};
use actix_web::{HttpResponse, get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AccountId, Error, PropertyFileKind, PropertyId, PropertySummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, unknown_file_kind_error};

const PROPERTY_ID: FieldName = FieldName::new("propertyId");
const USER_ID: FieldName = FieldName::new("userId");
const DEVELOPER_ID: FieldName = FieldName::new("developerId");

/// Catalogue entry; document payloads are fetched separately.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyResponse {
    #[schema(example = 4)]
    pub id: i32,
    #[schema(example = "Lakeview Residency")]
    pub name: String,
    #[schema(example = "2BHK")]
    pub apartment_type: String,
    /// Carpet area in square feet.
    #[schema(example = 950)]
    pub carpet_area: i32,
    #[schema(example = "foundation")]
    pub development_stage: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub developer_id: i32,
    pub has_brochure: bool,
    pub has_floor_plan: bool,
}

impl From<PropertySummary> for PropertyResponse {
    fn from(value: PropertySummary) -> Self {
        Self {
            id: value.id.get(),
            name: value.name,
            apartment_type: value.apartment_type,
            carpet_area: value.carpet_area,
            development_stage: value.development_stage,
            image_url: value.image_url,
            developer_id: value.developer_id.get(),
            has_brochure: value.has_brochure,
            has_floor_plan: value.has_floor_plan,
        }
    }
}

fn to_responses(properties: Vec<PropertySummary>) -> Vec<PropertyResponse> {
    properties.into_iter().map(PropertyResponse::from).collect()
}

fn content_type_for(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// List every property in the catalogue.
#[utoipa::path(
    get,
    path = "/api/v1/properties",
    responses(
        (status = 200, description = "Properties", body = [PropertyResponse]),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["properties"],
    operation_id = "listProperties",
    security([])
)]
#[get("/properties")]
pub async fn list_properties(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<PropertyResponse>>> {
    let properties = state.catalog.list_all().await?;
    Ok(web::Json(to_responses(properties)))
}

/// Fetch one property.
#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}",
    params(("id" = i32, Path, description = "Property identifier")),
    responses(
        (status = 200, description = "Property", body = PropertyResponse),
        (status = 400, description = "Identifier is not a positive integer", body = Error),
        (status = 404, description = "Property not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["properties"],
    operation_id = "getProperty",
    security([])
)]
#[get("/properties/{id}")]
pub async fn get_property(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PropertyResponse>> {
    let id = parse_id(&path, PROPERTY_ID, PropertyId::parse)?;
    let property = state.catalog.get_by_id(id).await?;
    Ok(web::Json(PropertyResponse::from(property)))
}

/// Download a brochure or floor plan.
#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}/files/{kind}",
    params(
        ("id" = i32, Path, description = "Property identifier"),
        ("kind" = String, Path, description = "`brochure` or `floor-plan`")
    ),
    responses(
        (status = 200, description = "Document bytes", content_type = "application/octet-stream"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Property or document not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["properties"],
    operation_id = "getPropertyFile",
    security([])
)]
#[get("/properties/{id}/files/{kind}")]
pub async fn get_property_file(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (raw_id, raw_kind) = path.into_inner();
    let id = parse_id(&raw_id, PROPERTY_ID, PropertyId::parse)?;
    let kind = raw_kind
        .parse::<PropertyFileKind>()
        .map_err(unknown_file_kind_error)?;
    let file = state.catalog.get_file(id, kind).await?;

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content_type_for(&file.filename)))
        .insert_header(ContentDisposition::attachment(file.filename))
        .body(file.bytes))
}

/// Properties assigned to a consumer user. Only that user may list them.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/properties",
    params(("id" = i32, Path, description = "Consumer user identifier")),
    responses(
        (status = 200, description = "Assigned properties", body = [PropertyResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["properties"],
    operation_id = "listUserProperties"
)]
#[get("/users/{id}/properties")]
pub async fn list_user_properties(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<PropertyResponse>>> {
    let user_id = parse_id(&path, USER_ID, AccountId::parse)?;
    ensure_same_account(session.require_consumer()?, user_id)?;
    let properties = state.catalog.list_for_user(user_id).await?;
    Ok(web::Json(to_responses(properties)))
}

/// Properties owned by a developer. Only that developer may list them.
#[utoipa::path(
    get,
    path = "/api/v1/developers/{id}/properties",
    params(("id" = i32, Path, description = "Developer identifier")),
    responses(
        (status = 200, description = "Owned properties", body = [PropertyResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["properties"],
    operation_id = "listDeveloperProperties"
)]
#[get("/developers/{id}/properties")]
pub async fn list_developer_properties(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<PropertyResponse>>> {
    let developer_id = parse_id(&path, DEVELOPER_ID, AccountId::parse)?;
    ensure_same_account(session.require_developer()?, developer_id)?;
    let properties = state.catalog.list_for_developer(developer_id).await?;
    Ok(web::Json(to_responses(properties)))
}

fn ensure_same_account(session_id: AccountId, requested: AccountId) -> Result<(), Error> {
    if session_id == requested {
        Ok(())
    } else {
        Err(Error::forbidden("cannot list properties of another account"))
    }
}
