//! Typed repository for the `job_applications` collection.

use std::collections::HashMap;

use chrono::Duration;
use serde::Deserialize;
use tracing::{info, warn};

use talenta_models::{
    Applicant, ApplicationStatus, ItemId, NewApplicant, NewNotification, SharedClock,
};

use crate::cache::TtlCache;
use crate::client::DirectusClient;
use crate::error::DirectusResult;
use crate::notifications::NotificationRepository;
use crate::query::{Filter, Query};

const COLLECTION: &str = "job_applications";

/// Cache key for per-posting applicant counts.
pub const APPLICANT_COUNTS_KEY: &str = "applicant_counts";

/// Fields fetched for list/report views.
const LIST_FIELDS: &str = "id,fullName,email,appliedJobId,applicationStatus,date_created,howDidYouHear";

/// Whether the best-effort notification write went through.
#[derive(Debug)]
pub enum NotificationOutcome {
    Delivered,
    Failed(crate::error::DirectusError),
}

impl NotificationOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, NotificationOutcome::Delivered)
    }
}

/// Result of creating an application: the primary write always succeeded,
/// the notification side effect may not have.
#[derive(Debug)]
pub struct CreatedApplicant {
    pub applicant: Applicant,
    pub notification: NotificationOutcome,
}

/// Repository for job applications.
pub struct ApplicantRepository {
    client: DirectusClient,
    clock: SharedClock,
    notifications: NotificationRepository,
    counts_cache: TtlCache<HashMap<String, u64>>,
    counts_ttl: Duration,
}

impl ApplicantRepository {
    pub fn new(client: DirectusClient, clock: SharedClock) -> Self {
        let notifications = NotificationRepository::new(client.clone());
        let counts_cache = TtlCache::new(clock.clone());
        Self {
            client,
            clock,
            notifications,
            counts_cache,
            // Counts change more often than postings do
            counts_ttl: Duration::minutes(2),
        }
    }

    /// Base URL of the remote instance, for asset normalization.
    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Applicants for one posting, newest first.
    pub async fn list_by_job(&self, job_id: &ItemId) -> DirectusResult<Vec<Applicant>> {
        let query = Query::new()
            .filter(Filter::eq("appliedJobId", job_id.as_str()))
            .sort("-date_created");
        self.client.get_items(COLLECTION, &query).await
    }

    /// Every applicant with list-view fields only.
    pub async fn list_all(&self) -> DirectusResult<Vec<Applicant>> {
        let query = Query::new()
            .fields(LIST_FIELDS)
            .sort("-date_created")
            .limit(-1);
        self.client.get_items(COLLECTION, &query).await
    }

    pub async fn get(&self, id: &ItemId) -> DirectusResult<Option<Applicant>> {
        self.client
            .get_item(COLLECTION, id.as_str(), &Query::new())
            .await
    }

    /// Applicant counts grouped by posting id. Cached.
    ///
    /// Only the foreign key is fetched; the aggregation happens here, so a
    /// posting list can be annotated without pulling full applications.
    pub async fn counts_by_job(&self) -> DirectusResult<HashMap<String, u64>> {
        self.counts_cache
            .get_or_fetch(APPLICANT_COUNTS_KEY, self.counts_ttl, || async move {
                let query = Query::new().fields("appliedJobId").limit(-1);
                let rows: Vec<CountRow> = self.client.get_items(COLLECTION, &query).await?;

                let mut counts: HashMap<String, u64> = HashMap::new();
                for row in rows {
                    if let Some(job_id) = row.applied_job_id {
                        *counts.entry(job_id.0).or_insert(0) += 1;
                    }
                }
                Ok(counts)
            })
            .await
    }

    /// Set the review status. Invalidates the counts cache; creates no
    /// notification; only applicant creation does that.
    pub async fn update_status(
        &self,
        id: &ItemId,
        status: ApplicationStatus,
    ) -> DirectusResult<Applicant> {
        self.counts_cache.invalidate(APPLICANT_COUNTS_KEY);

        let patch = StatusPatch { application_status: status };
        let updated = self
            .client
            .update_item(COLLECTION, id.as_str(), &patch)
            .await?;
        info!(id = %id, status = %status, "Updated applicant status");
        Ok(updated)
    }

    /// Create an application, then write the HR notification.
    ///
    /// The notification is best-effort by contract: a failure there must
    /// not fail the application that was already created, so it is caught
    /// here and reported in the outcome instead of propagated.
    pub async fn create(
        &self,
        applicant: &NewApplicant,
        job_title: &str,
    ) -> DirectusResult<CreatedApplicant> {
        self.counts_cache.invalidate(APPLICANT_COUNTS_KEY);

        let created: Applicant = self.client.create_item(COLLECTION, applicant).await?;
        info!(id = %created.id, job = %created.applied_job_id, "Created application");

        let notification = NewNotification::new_application(
            &created.id,
            &created.applied_job_id,
            &created.full_name,
            job_title,
            self.clock.now(),
        );

        let outcome = match self.notifications.create(&notification).await {
            Ok(()) => NotificationOutcome::Delivered,
            Err(e) => {
                warn!(error = %e, applicant = %created.id, "Notification write failed");
                NotificationOutcome::Failed(e)
            }
        };

        Ok(CreatedApplicant {
            applicant: created,
            notification: outcome,
        })
    }

    /// Delete an application. Invalidates the counts cache.
    pub async fn delete(&self, id: &ItemId) -> DirectusResult<()> {
        self.counts_cache.invalidate(APPLICANT_COUNTS_KEY);
        self.client.delete_item(COLLECTION, id.as_str()).await
    }

    /// Rewrite the asset fields of an applicant to fetchable URLs.
    pub fn normalize_assets(&self, applicant: &mut Applicant) {
        applicant.normalize_assets(self.client.base_url());
    }
}

/// Projection used by the counts aggregation.
#[derive(Debug, Deserialize)]
struct CountRow {
    #[serde(rename = "appliedJobId", default)]
    applied_job_id: Option<ItemId>,
}

#[derive(serde::Serialize)]
struct StatusPatch {
    #[serde(rename = "applicationStatus")]
    application_status: ApplicationStatus,
}
