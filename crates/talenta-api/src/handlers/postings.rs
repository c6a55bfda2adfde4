//! Job posting screen handlers: the list screen and its form actions,
//! plus the add/edit screens.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use validator::Validate;

use talenta_models::{
    join_requirements, ItemId, JobPosting, JobPostingPatch, NewJobPosting, PostingStatus,
};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// A posting annotated with its derived applicant count.
#[derive(Debug, Serialize)]
pub struct PostingWithCount {
    #[serde(flatten)]
    pub posting: JobPosting,
    pub applicant_count: u64,
}

/// Join counts onto postings; postings without applications count zero.
pub fn annotate_with_counts(
    postings: Vec<JobPosting>,
    counts: &HashMap<String, u64>,
) -> Vec<PostingWithCount> {
    postings
        .into_iter()
        .map(|posting| {
            let applicant_count = counts.get(posting.id.as_str()).copied().unwrap_or(0);
            PostingWithCount {
                posting,
                applicant_count,
            }
        })
        .collect()
}

// ============================================================================
// List screen
// ============================================================================

/// Data bag for the postings list screen.
#[derive(Serialize)]
pub struct ListScreen {
    pub job_postings: Vec<PostingWithCount>,
    pub active_job_postings: Vec<PostingWithCount>,
    pub inactive_job_postings: Vec<PostingWithCount>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ListScreen {
    fn failure(message: String) -> Self {
        Self {
            job_postings: Vec::new(),
            active_job_postings: Vec::new(),
            inactive_job_postings: Vec::new(),
            status: "error".to_string(),
            error: Some(message),
        }
    }
}

/// Postings list with active/inactive split and applicant counts.
///
/// Expected failures land in the `error` field; this handler never errors
/// out, matching what the screen can render.
pub async fn list_screen(State(state): State<AppState>) -> Json<ListScreen> {
    // Catch stored statuses up with passed deadlines first (best-effort,
    // reports zero on failure)
    state.postings.deactivate_expired().await;

    // Disjoint cache keys, so the two fetches run concurrently
    let (postings, counts) = tokio::join!(
        state.postings.list_all(),
        state.applicants.counts_by_job()
    );

    let (postings, counts) = match (postings, counts) {
        (Ok(p), Ok(c)) => (p, c),
        (Err(e), _) | (_, Err(e)) => {
            warn!(error = %e, "Failed to load postings list");
            return Json(ListScreen::failure(e.to_string()));
        }
    };

    let now = state.clock.now();
    let annotated = annotate_with_counts(postings, &counts);

    // The split is recomputed per request; stored status alone is not
    // enough because the remote store never expires postings
    let active: Vec<PostingWithCount> = annotated
        .iter()
        .filter(|p| p.posting.is_active_for_display(now))
        .map(|p| PostingWithCount {
            posting: p.posting.clone(),
            applicant_count: p.applicant_count,
        })
        .collect();
    let inactive: Vec<PostingWithCount> = annotated
        .iter()
        .filter(|p| p.posting.is_inactive_for_display(now))
        .map(|p| PostingWithCount {
            posting: p.posting.clone(),
            applicant_count: p.applicant_count,
        })
        .collect();

    Json(ListScreen {
        job_postings: annotated,
        active_job_postings: active,
        inactive_job_postings: inactive,
        status: "success".to_string(),
        error: None,
    })
}

// ============================================================================
// Create / update / toggle / delete actions
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PostingForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub employment_type: String,
    #[serde(default)]
    pub min_education: String,
    #[serde(default)]
    pub experience: String,
}

impl PostingForm {
    fn fields(&self) -> [(&'static str, &str); 10] {
        [
            ("title", &self.title),
            ("department", &self.department),
            ("description", &self.description),
            ("requirements", &self.requirements),
            ("deadline", &self.deadline),
            ("location", &self.location),
            ("salary", &self.salary),
            ("employment_type", &self.employment_type),
            ("min_education", &self.min_education),
            ("experience", &self.experience),
        ]
    }

    fn require_all(&self) -> ApiResult<()> {
        if self.fields().iter().any(|(_, value)| value.trim().is_empty()) {
            return Err(ApiError::validation("Semua field diperlukan"));
        }
        Ok(())
    }

    fn require_each(&self) -> ApiResult<()> {
        for (name, value) in self.fields() {
            if value.trim().is_empty() {
                return Err(ApiError::validation(format!("{} is required", name)));
            }
        }
        Ok(())
    }
}

/// Deadlines arrive as RFC 3339 or as the bare `datetime-local` /
/// `date` input formats.
fn parse_deadline(raw: &str) -> ApiResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }
    Err(ApiError::validation("Format tanggal tidak valid"))
}

#[derive(Serialize)]
pub struct CreatePostingResponse {
    pub status: String,
    pub message: String,
    pub job: JobPosting,
    pub redirect: String,
}

/// Create a posting. Requirements text is split per line and stored
/// newline-joined; status defaults to an explicit `active`.
pub async fn create_posting(
    State(state): State<AppState>,
    Json(form): Json<PostingForm>,
) -> ApiResult<Json<CreatePostingResponse>> {
    form.require_all()?;

    let posting = NewJobPosting {
        title: form.title.clone(),
        department: form.department.clone(),
        description: form.description.clone(),
        requirements: join_requirements(&form.requirements),
        deadline: parse_deadline(&form.deadline)?,
        date_created: state.clock.now(),
        location: form.location.clone(),
        salary: form.salary.clone(),
        employment_type: form.employment_type.clone(),
        min_education: form.min_education.clone(),
        experience: form.experience.clone(),
        status: PostingStatus::Active,
    };
    posting
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let job = state.postings.create(&posting).await?;

    Ok(Json(CreatePostingResponse {
        status: "success".to_string(),
        message: "Lowongan pekerjaan berhasil dibuat".to_string(),
        job,
        redirect: "/dashboard/list".to_string(),
    }))
}

/// Data bag for the edit screen load.
#[derive(Serialize)]
pub struct EditScreen {
    pub job_posting: Option<JobPosting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Load one posting for editing. A missing posting is a message, not an
/// error response.
pub async fn edit_screen(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<EditScreen> {
    match state.postings.get(&ItemId::from(id)).await {
        Ok(Some(job_posting)) => Json(EditScreen {
            job_posting: Some(job_posting),
            error: None,
        }),
        Ok(None) => Json(EditScreen {
            job_posting: None,
            error: Some("Job posting not found".to_string()),
        }),
        Err(e) => {
            warn!(error = %e, "Failed to load posting for edit");
            Json(EditScreen {
                job_posting: None,
                error: Some(e.to_string()),
            })
        }
    }
}

#[derive(Serialize)]
pub struct UpdatePostingResponse {
    pub status: String,
    pub redirect: String,
}

/// Full-form update from the edit screen; every field is required there.
pub async fn update_posting(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<PostingForm>,
) -> ApiResult<Json<UpdatePostingResponse>> {
    form.require_each()?;

    let patch = JobPostingPatch {
        title: Some(form.title.clone()),
        department: Some(form.department.clone()),
        description: Some(form.description.clone()),
        requirements: Some(form.requirements.clone()),
        deadline: Some(parse_deadline(&form.deadline)?),
        location: Some(form.location.clone()),
        salary: Some(form.salary.clone()),
        employment_type: Some(form.employment_type.clone()),
        min_education: Some(form.min_education.clone()),
        experience: Some(form.experience.clone()),
        status: None,
    };

    state.postings.update(&ItemId::from(id), &patch).await?;

    Ok(Json(UpdatePostingResponse {
        status: "success".to_string(),
        redirect: "/dashboard/list".to_string(),
    }))
}

#[derive(Deserialize)]
pub struct ToggleStatusForm {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub current_status: String,
}

#[derive(Serialize)]
pub struct ActionResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Flip a posting between active and inactive.
pub async fn toggle_posting_status(
    State(state): State<AppState>,
    Json(form): Json<ToggleStatusForm>,
) -> ApiResult<Json<ActionResponse>> {
    if form.id.is_empty() || form.current_status.is_empty() {
        return Err(ApiError::validation(
            "ID lowongan dan status saat ini diperlukan",
        ));
    }

    let current: PostingStatus = form
        .current_status
        .parse()
        .map_err(|e: talenta_models::posting::UnknownPostingStatus| {
            ApiError::validation(e.to_string())
        })?;

    state
        .postings
        .set_status(&ItemId::from(form.id), current.toggled())
        .await?;

    Ok(Json(ActionResponse {
        status: "success".to_string(),
        message: None,
    }))
}

/// Delete a posting.
pub async fn delete_posting(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ActionResponse>> {
    state.postings.delete(&ItemId::from(id)).await?;
    Ok(Json(ActionResponse {
        status: "success".to_string(),
        message: Some("Lowongan pekerjaan berhasil dihapus".to_string()),
    }))
}
