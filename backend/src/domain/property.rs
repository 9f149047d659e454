//! Property catalogue read models.

use std::fmt;
use std::str::FromStr;

use super::{AccountId, PropertyId};

/// Catalogue projection of a property; file payloads are reported as flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySummary {
    pub id: PropertyId,
    pub name: String,
    pub apartment_type: String,
    /// Carpet area in square feet.
    pub carpet_area: i32,
    pub development_stage: String,
    pub image_url: Option<String>,
    pub developer_id: AccountId,
    pub has_brochure: bool,
    pub has_floor_plan: bool,
}

/// Downloadable document attached to a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyFileKind {
    Brochure,
    FloorPlan,
}

impl PropertyFileKind {
    /// Path segment naming the document.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Brochure => "brochure",
            Self::FloorPlan => "floor-plan",
        }
    }
}

impl fmt::Display for PropertyFileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a file kind segment is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown property file kind '{0}'; expected brochure or floor-plan")]
pub struct UnknownFileKind(pub String);

impl FromStr for PropertyFileKind {
    type Err = UnknownFileKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brochure" => Ok(Self::Brochure),
            "floor-plan" | "floorPlan" | "floor_plan" => Ok(Self::FloorPlan),
            other => Err(UnknownFileKind(other.to_owned())),
        }
    }
}

/// Opaque document payload with its original filename.
#[derive(Clone, PartialEq, Eq)]
pub struct PropertyFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for PropertyFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyFile")
            .field("filename", &self.filename)
            .field("len", &self.bytes.len())
            .finish()
    }
}
