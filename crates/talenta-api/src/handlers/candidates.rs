//! Candidates screens: the all-candidates report and the per-candidate
//! detail with review actions.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

use talenta_directus::postings::PostingTitle;
use talenta_models::{Applicant, ApplicationStatus, ItemId};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Data bag for the candidates report screen.
#[derive(Serialize)]
pub struct CandidatesScreen {
    pub applicants: Vec<Applicant>,
    pub job_postings: Vec<PostingTitle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Every candidate with list-view fields, plus posting titles for the
/// filter dropdown. Both fetches run concurrently.
pub async fn candidates_screen(State(state): State<AppState>) -> Json<CandidatesScreen> {
    let (applicants, job_postings) = tokio::join!(
        state.applicants.list_all(),
        state.postings.list_titles()
    );

    match (applicants, job_postings) {
        (Ok(applicants), Ok(job_postings)) => Json(CandidatesScreen {
            applicants,
            job_postings,
            error: None,
        }),
        (Err(e), _) | (_, Err(e)) => {
            warn!(error = %e, "Failed to load candidates screen");
            Json(CandidatesScreen {
                applicants: Vec::new(),
                job_postings: Vec::new(),
                error: Some(e.to_string()),
            })
        }
    }
}

/// Data bag for the candidate detail screen.
#[derive(Serialize)]
pub struct CandidateDetailScreen {
    pub applicant: Applicant,
    pub job_title: Option<String>,
}

/// One candidate with asset URLs normalized and the applied job's title.
///
/// This screen does expect a not-found condition, so a missing applicant
/// is a 404; the title lookup is cosmetic and never fails the screen.
pub async fn candidate_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CandidateDetailScreen>> {
    if id.trim().is_empty() {
        return Err(ApiError::validation("ID pelamar diperlukan"));
    }

    let mut applicant = state
        .applicants
        .get(&ItemId::from(id))
        .await?
        .ok_or_else(|| ApiError::not_found("Data pelamar tidak ditemukan"))?;

    state.applicants.normalize_assets(&mut applicant);

    let job_title = match state.postings.get_title(&applicant.applied_job_id).await {
        Ok(title) => title,
        Err(e) => {
            warn!(error = %e, "Failed to fetch job title for candidate detail");
            None
        }
    };

    Ok(Json(CandidateDetailScreen {
        applicant,
        job_title,
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusForm {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Serialize)]
pub struct UpdateStatusResponse {
    pub success: bool,
    pub message: String,
    pub updated_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_note: Option<String>,
}

/// Set a candidate's review status.
///
/// Accepts the dashboard review vocabulary as well as raw status names;
/// anything else is rejected before any remote call. This path never
/// writes a notification.
pub async fn update_candidate_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<UpdateStatusForm>,
) -> ApiResult<Json<UpdateStatusResponse>> {
    if form.status.is_empty() {
        return Err(ApiError::validation("Status is required"));
    }

    let status = ApplicationStatus::from_review_input(&form.status)
        .map_err(|e| ApiError::validation(e.to_string()))?;

    state
        .applicants
        .update_status(&ItemId::from(id), status)
        .await?;

    let message = if status == ApplicationStatus::Accepted {
        "Status kandidat berhasil diperbarui menjadi LOLOS! Data karyawan telah otomatis dibuat dalam sistem register."
    } else {
        "Status kandidat berhasil diperbarui"
    };

    Ok(Json(UpdateStatusResponse {
        success: true,
        message: message.to_string(),
        updated_status: status.as_str().to_string(),
        updated_note: form.note,
    }))
}
