//! Typed repository for the `hrd_notifications` collection.
//!
//! Write-only from the dashboard side; rows are created when a new
//! application lands and read by a separate notification center.

use talenta_models::NewNotification;
use tracing::debug;

use crate::client::DirectusClient;
use crate::error::DirectusResult;

const COLLECTION: &str = "hrd_notifications";

/// Repository for HR notifications.
#[derive(Clone)]
pub struct NotificationRepository {
    client: DirectusClient,
}

impl NotificationRepository {
    pub fn new(client: DirectusClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, notification: &NewNotification) -> DirectusResult<()> {
        let _: serde_json::Value = self.client.create_item(COLLECTION, notification).await?;
        debug!(
            kind = %notification.notification_type,
            job = %notification.job_id,
            "Created notification"
        );
        Ok(())
    }
}
