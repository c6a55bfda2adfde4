//! Typed repository for the `job_postings` collection.

use chrono::{Duration, SecondsFormat};
use futures::future::try_join_all;
use serde::Deserialize;
use tracing::{info, warn};

use talenta_models::{
    ItemId, JobPosting, JobPostingPatch, NewJobPosting, PostingStatus, SharedClock,
};

use crate::cache::TtlCache;
use crate::client::DirectusClient;
use crate::error::DirectusResult;
use crate::query::{Filter, Query};

const COLLECTION: &str = "job_postings";

/// Cache key for the full postings list.
pub const ALL_POSTINGS_KEY: &str = "all_job_postings";

/// Repository for job postings.
///
/// The full list is cached for a short window; every write drops that
/// entry so the next read re-fetches. The active/inactive queries push
/// their filter down to the remote API and are never cached, because the
/// remote store does not expire postings on its own.
pub struct JobPostingRepository {
    client: DirectusClient,
    clock: SharedClock,
    cache: TtlCache<Vec<JobPosting>>,
    cache_ttl: Duration,
}

impl JobPostingRepository {
    pub fn new(client: DirectusClient, clock: SharedClock) -> Self {
        let cache = TtlCache::new(clock.clone());
        Self {
            client,
            clock,
            cache,
            // 3 minutes, matching how quickly the dashboard list may go stale
            cache_ttl: Duration::minutes(3),
        }
    }

    fn now_iso(&self) -> String {
        self.clock.now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// All postings, newest first, with applications joined in. Cached.
    pub async fn list_all(&self) -> DirectusResult<Vec<JobPosting>> {
        // ts defeats intermediary HTTP caches; ours is the only cache layer
        let ts = self.clock.now().timestamp_millis().to_string();
        self.cache
            .get_or_fetch(ALL_POSTINGS_KEY, self.cache_ttl, || async move {
                let query = Query::new()
                    .sort("-date_created")
                    .fields("*,applications.id")
                    .param("ts", ts);
                self.client.get_items(COLLECTION, &query).await
            })
            .await
    }

    /// Postings that are active for display: status `active` or missing,
    /// AND deadline strictly in the future.
    pub async fn list_active(&self) -> DirectusResult<Vec<JobPosting>> {
        let query = Query::new()
            .filter(Filter::and(vec![
                Filter::or(vec![
                    Filter::eq("status", PostingStatus::Active.as_str()),
                    Filter::null("status"),
                ]),
                Filter::gt("deadline", self.now_iso()),
            ]))
            .sort("-date_created")
            .fields("*,applications.id");
        self.client.get_items(COLLECTION, &query).await
    }

    /// Postings that are inactive for display: explicitly `inactive`, or
    /// at/past their deadline.
    pub async fn list_inactive(&self) -> DirectusResult<Vec<JobPosting>> {
        let query = Query::new()
            .filter(Filter::or(vec![
                Filter::eq("status", PostingStatus::Inactive.as_str()),
                Filter::lte("deadline", self.now_iso()),
            ]))
            .sort("-date_created")
            .fields("*,applications.id");
        self.client.get_items(COLLECTION, &query).await
    }

    /// Id and title only, for dropdown filters.
    pub async fn list_titles(&self) -> DirectusResult<Vec<PostingTitle>> {
        let query = Query::new().fields("id,title").sort("-date_created");
        self.client.get_items(COLLECTION, &query).await
    }

    pub async fn get(&self, id: &ItemId) -> DirectusResult<Option<JobPosting>> {
        let query = Query::new().fields("*,applications.id");
        self.client.get_item(COLLECTION, id.as_str(), &query).await
    }

    /// Title of one posting; `None` when it does not exist.
    pub async fn get_title(&self, id: &ItemId) -> DirectusResult<Option<String>> {
        let query = Query::new().fields("id,title");
        let posting: Option<PostingTitle> =
            self.client.get_item(COLLECTION, id.as_str(), &query).await?;
        Ok(posting.map(|p| p.title))
    }

    pub async fn create(&self, posting: &NewJobPosting) -> DirectusResult<JobPosting> {
        self.cache.invalidate(ALL_POSTINGS_KEY);
        let created: JobPosting = self.client.create_item(COLLECTION, posting).await?;
        info!(id = %created.id, title = %created.title, "Created job posting");
        Ok(created)
    }

    pub async fn update(&self, id: &ItemId, patch: &JobPostingPatch) -> DirectusResult<JobPosting> {
        self.cache.invalidate(ALL_POSTINGS_KEY);
        self.client.update_item(COLLECTION, id.as_str(), patch).await
    }

    /// Flip a posting between active and inactive.
    pub async fn set_status(
        &self,
        id: &ItemId,
        status: PostingStatus,
    ) -> DirectusResult<JobPosting> {
        let patch = JobPostingPatch {
            status: Some(status),
            ..JobPostingPatch::default()
        };
        self.update(id, &patch).await
    }

    pub async fn delete(&self, id: &ItemId) -> DirectusResult<()> {
        self.cache.invalidate(ALL_POSTINGS_KEY);
        self.client.delete_item(COLLECTION, id.as_str()).await
    }

    /// Patch every active-or-null posting whose deadline has passed to
    /// `inactive`, so stored status catches up with the display predicate.
    ///
    /// Best-effort by contract: this runs ahead of list screens and must
    /// never break them, so any failure is logged and reported as zero.
    pub async fn deactivate_expired(&self) -> u64 {
        match self.try_deactivate_expired().await {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "Failed to deactivate expired postings");
                0
            }
        }
    }

    async fn try_deactivate_expired(&self) -> DirectusResult<u64> {
        let query = Query::new()
            .filter(Filter::and(vec![
                Filter::lte("deadline", self.now_iso()),
                Filter::or(vec![
                    Filter::eq("status", PostingStatus::Active.as_str()),
                    Filter::null("status"),
                ]),
            ]))
            .fields("id,title,deadline,status");

        let expired: Vec<PostingTitle> = self.client.get_items(COLLECTION, &query).await?;
        if expired.is_empty() {
            return Ok(0);
        }

        info!(count = expired.len(), "Deactivating expired job postings");
        self.cache.invalidate(ALL_POSTINGS_KEY);

        let patch = JobPostingPatch {
            status: Some(PostingStatus::Inactive),
            ..JobPostingPatch::default()
        };
        let patch = &patch;
        try_join_all(expired.iter().map(|job| async move {
            self.client
                .update_item::<JobPosting, _>(COLLECTION, job.id.as_str(), patch)
                .await
        }))
        .await?;

        Ok(expired.len() as u64)
    }
}

/// Projected posting row (`fields=id,title,...`).
#[derive(Debug, Clone, serde::Serialize, Deserialize)]
pub struct PostingTitle {
    pub id: ItemId,
    pub title: String,
}
