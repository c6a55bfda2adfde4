//! Directus item-API client.
//!
//! This crate provides:
//! - An authenticated HTTP gateway over the generic `/items` REST surface
//! - A typed query builder for the bracketed filter syntax
//! - A TTL cache with per-key request deduplication
//! - Typed repositories for job postings, applicants, notifications and
//!   supporting documents

pub mod applicants;
pub mod cache;
pub mod client;
pub mod documents;
pub mod error;
pub mod notifications;
pub mod postings;
pub mod query;

mod metrics;


pub use applicants::{ApplicantRepository, CreatedApplicant, NotificationOutcome};
pub use cache::TtlCache;
pub use client::{DirectusClient, DirectusConfig, FileAsset};
pub use documents::DocumentRepository;
pub use error::{DirectusError, DirectusResult};
pub use notifications::NotificationRepository;
pub use postings::JobPostingRepository;
pub use query::{Filter, Query};
