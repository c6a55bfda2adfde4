//! Supporting document models.

use serde::{Deserialize, Serialize};

use crate::asset::AssetRef;
use crate::posting::ItemId;

/// A row in `application_documents` linking an application to an uploaded
/// file. Fetched with `document_id` expanded, so the asset arrives as a
/// file object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportingDocument {
    pub id: ItemId,

    pub application_id: ItemId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<AssetRef>,
}
