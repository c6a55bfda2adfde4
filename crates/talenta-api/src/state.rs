//! Application state.

use std::sync::Arc;

use talenta_directus::{
    ApplicantRepository, DirectusClient, DocumentRepository, JobPostingRepository,
};
use talenta_models::{SharedClock, SystemClock};

use crate::config::ApiConfig;
use crate::security::{MemoryStore, SessionGuard, SessionStore};

/// Shared application state.
///
/// Repositories are constructed once with their injected client and clock
/// and handed to handlers by reference; nothing here is process-global.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub clock: SharedClock,
    pub postings: Arc<JobPostingRepository>,
    pub applicants: Arc<ApplicantRepository>,
    pub documents: DocumentRepository,
    pub sessions: Arc<SessionGuard>,
}

impl AppState {
    /// Create new application state from the environment.
    pub fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let client = DirectusClient::from_env()?;
        let clock: SharedClock = Arc::new(SystemClock);
        let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::default());
        Ok(Self::with_components(config, client, clock, store))
    }

    /// Assemble state from explicit components (tests inject doubles here).
    pub fn with_components(
        config: ApiConfig,
        client: DirectusClient,
        clock: SharedClock,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        let postings = Arc::new(JobPostingRepository::new(client.clone(), clock.clone()));
        let applicants = Arc::new(ApplicantRepository::new(client.clone(), clock.clone()));
        let documents = DocumentRepository::new(client);
        let sessions = Arc::new(SessionGuard::new(store, clock.clone()));

        Self {
            config,
            clock,
            postings,
            applicants,
            documents,
            sessions,
        }
    }
}
