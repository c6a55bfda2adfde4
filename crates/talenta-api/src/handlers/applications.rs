//! Applications screen: postings overview, per-posting applicant list and
//! single-applicant detail, driven by query parameters.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

use talenta_models::{Applicant, ItemId, JobPosting, SupportingDocument};

use crate::handlers::postings::{annotate_with_counts, PostingWithCount};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ApplicationsParams {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub applicant_id: Option<String>,
}

/// Data bag for the applications screen.
///
/// `selected_job` and `applicant` stay `null` when absent; only
/// transport-level failures fill `error`.
#[derive(Serialize)]
pub struct ApplicationsScreen {
    pub job_postings: Vec<PostingWithCount>,
    pub selected_job: Option<JobPosting>,
    pub applications: Vec<Applicant>,
    pub applicant: Option<Applicant>,
    pub supporting_documents: Option<Vec<SupportingDocument>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApplicationsScreen {
    fn empty() -> Self {
        Self {
            job_postings: Vec::new(),
            selected_job: None,
            applications: Vec::new(),
            applicant: None,
            supporting_documents: None,
            error: None,
        }
    }

    fn failure(message: String) -> Self {
        Self {
            error: Some(message),
            ..Self::empty()
        }
    }
}

pub async fn applications_screen(
    State(state): State<AppState>,
    Query(params): Query<ApplicationsParams>,
) -> Json<ApplicationsScreen> {
    match load_applications(&state, &params).await {
        Ok(screen) => Json(screen),
        Err(e) => {
            warn!(error = %e, "Failed to load applications screen");
            Json(ApplicationsScreen::failure(e.to_string()))
        }
    }
}

async fn load_applications(
    state: &AppState,
    params: &ApplicationsParams,
) -> Result<ApplicationsScreen, talenta_directus::DirectusError> {
    let Some(job_id) = params.job_id.as_deref().filter(|s| !s.is_empty()) else {
        // Overview: every posting with its applicant count
        let (postings, counts) = tokio::join!(
            state.postings.list_all(),
            state.applicants.counts_by_job()
        );
        let mut screen = ApplicationsScreen::empty();
        screen.job_postings = annotate_with_counts(postings?, &counts?);
        return Ok(screen);
    };

    let job_id = ItemId::from(job_id);
    let (selected_job, applications) = tokio::join!(
        state.postings.get(&job_id),
        state.applicants.list_by_job(&job_id)
    );

    let mut screen = ApplicationsScreen::empty();
    screen.selected_job = selected_job?;
    screen.applications = applications?;

    if let Some(applicant_id) = params.applicant_id.as_deref().filter(|s| !s.is_empty()) {
        let applicant_id = ItemId::from(applicant_id);
        let (applicant, documents) = tokio::join!(
            state.applicants.get(&applicant_id),
            state.documents.for_application(&applicant_id)
        );

        screen.applicant = applicant?.map(|mut a| {
            state.applicants.normalize_assets(&mut a);
            a
        });
        screen.supporting_documents = Some(documents?);
    }

    Ok(screen)
}
