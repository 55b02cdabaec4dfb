//! Static reference data (`/resources/*`), fetched with GET

use crate::shared::wire::RecordId;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceListResponse {
    #[serde(default)]
    pub data: Vec<ResourceEntry>,
}

/// A university, faculty or department
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResourceEntry {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
}
