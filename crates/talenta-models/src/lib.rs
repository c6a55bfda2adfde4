//! Shared data models for the Talenta recruitment dashboard.
//!
//! This crate provides Serde-serializable types for:
//! - Job postings and their lifecycle status
//! - Job applications and the review status vocabulary
//! - Remote file/asset references and their URL normalization
//! - HR notifications written on new applications
//! - A clock abstraction so expiry logic is testable

pub mod applicant;
pub mod asset;
pub mod clock;
pub mod dates;
pub mod document;
pub mod notification;
pub mod posting;

// Re-export common types
pub use applicant::{Applicant, ApplicationStatus, NewApplicant, StatusParseError};
pub use asset::AssetRef;
pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use document::SupportingDocument;
pub use notification::{NewNotification, NOTIFICATION_NEW_APPLICATION};
pub use posting::{
    join_requirements, ItemId, JobPosting, JobPostingPatch, NewJobPosting, PostingStatus,
    UnknownPostingStatus,
};
