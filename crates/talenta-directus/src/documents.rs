//! Supporting documents and file upload.

use talenta_models::{ItemId, SupportingDocument};

use crate::client::{DirectusClient, FileAsset};
use crate::error::DirectusResult;
use crate::query::{Filter, Query};

const COLLECTION: &str = "application_documents";

/// Repository for per-application supporting documents.
#[derive(Clone)]
pub struct DocumentRepository {
    client: DirectusClient,
}

impl DocumentRepository {
    pub fn new(client: DirectusClient) -> Self {
        Self { client }
    }

    /// Documents attached to one application, with the file expanded.
    pub async fn for_application(
        &self,
        application_id: &ItemId,
    ) -> DirectusResult<Vec<SupportingDocument>> {
        let query = Query::new()
            .filter(Filter::eq("application_id", application_id.as_str()))
            .fields("*,document_id.*");
        self.client.get_items(COLLECTION, &query).await
    }

    /// Upload a file and get back its asset descriptor.
    pub async fn upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> DirectusResult<FileAsset> {
        self.client.upload_file(file_name, bytes, content_type).await
    }

    /// Public fetch URL for an uploaded asset.
    pub fn asset_url(&self, id: &str) -> String {
        self.client.asset_url(id)
    }
}
