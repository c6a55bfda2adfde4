//! HR notification models.
//!
//! Notifications are write-only from the dashboard's perspective: created
//! as a side effect of a new application, never read back here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::posting::ItemId;

/// Notification type written for a new application.
pub const NOTIFICATION_NEW_APPLICATION: &str = "new_application";

/// Payload for creating a row in `hrd_notifications`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    #[serde(rename = "type")]
    pub notification_type: String,

    pub message: String,

    pub job_id: String,

    pub applicant_id: String,

    pub redirect_url: String,

    pub is_read: bool,

    pub created_at: DateTime<Utc>,
}

impl NewNotification {
    /// Notification for a freshly created application.
    pub fn new_application(
        applicant_id: &ItemId,
        job_id: &ItemId,
        applicant_name: &str,
        job_title: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            notification_type: NOTIFICATION_NEW_APPLICATION.to_string(),
            message: format!(
                "Pelamar baru \"{}\" telah mendaftar untuk posisi \"{}\"",
                applicant_name, job_title
            ),
            job_id: job_id.to_string(),
            applicant_id: applicant_id.to_string(),
            redirect_url: format!("/recruitment/applications?jobId={}", job_id),
            is_read: false,
            created_at: now,
        }
    }
}
