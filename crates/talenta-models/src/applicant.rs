//! Job application models and the review status vocabulary.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::asset::AssetRef;
use crate::posting::ItemId;

/// Review status of a job application.
///
/// Closed set; anything outside it is rejected rather than passed through,
/// so the remote store never receives an unmapped status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewed,
    Interview,
    Test,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Test => "test",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Parse either a storage status name or the dashboard review
    /// vocabulary (`diproses`, `lolos`, `ditolak`).
    pub fn from_review_input(s: &str) -> Result<Self, StatusParseError> {
        match s.trim().to_lowercase().as_str() {
            "diproses" => Ok(ApplicationStatus::Reviewed),
            "lolos" => Ok(ApplicationStatus::Accepted),
            "ditolak" => Ok(ApplicationStatus::Rejected),
            other => other.parse(),
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "reviewed" => Ok(ApplicationStatus::Reviewed),
            "interview" => Ok(ApplicationStatus::Interview),
            "test" => Ok(ApplicationStatus::Test),
            "accepted" => Ok(ApplicationStatus::Accepted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(StatusParseError(other.to_string())),
        }
    }
}

/// Returned for input outside the closed application-status set.
#[derive(Debug, Clone, Error)]
#[error("unknown application status: {0}")]
pub struct StatusParseError(pub String);

/// A job application as stored in the remote `job_applications` collection.
///
/// The document fields keep the remote camelCase names; asset fields may be
/// a file object or a plain URL string and are normalized before display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Applicant {
    pub id: ItemId,

    #[serde(rename = "fullName")]
    pub full_name: String,

    pub email: String,

    #[serde(rename = "appliedJobId")]
    pub applied_job_id: ItemId,

    #[serde(rename = "applicationStatus", default)]
    pub application_status: ApplicationStatus,

    #[serde(rename = "profilePhoto", default, skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<AssetRef>,

    #[serde(rename = "resumeFileUrl", default, skip_serializing_if = "Option::is_none")]
    pub resume_file_url: Option<AssetRef>,

    #[serde(rename = "transcriptUrl", default, skip_serializing_if = "Option::is_none")]
    pub transcript_url: Option<AssetRef>,

    #[serde(rename = "degreeCertificateUrl", default, skip_serializing_if = "Option::is_none")]
    pub degree_certificate_url: Option<AssetRef>,

    #[serde(rename = "howDidYouHear", default, skip_serializing_if = "Option::is_none")]
    pub how_did_you_hear: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
}

impl Applicant {
    /// Rewrite every asset field to its canonical fetch URL. Idempotent.
    pub fn normalize_assets(&mut self, base_url: &str) {
        for field in [
            &mut self.profile_photo,
            &mut self.resume_file_url,
            &mut self.transcript_url,
            &mut self.degree_certificate_url,
        ] {
            if let Some(asset) = field.take() {
                *field = Some(asset.normalize(base_url));
            }
        }
    }
}

/// Payload for creating a job application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewApplicant {
    #[serde(rename = "fullName")]
    pub full_name: String,

    pub email: String,

    #[serde(rename = "appliedJobId")]
    pub applied_job_id: ItemId,

    #[serde(rename = "applicationStatus", default)]
    pub application_status: ApplicationStatus,

    #[serde(rename = "profilePhoto", skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<AssetRef>,

    #[serde(rename = "resumeFileUrl", skip_serializing_if = "Option::is_none")]
    pub resume_file_url: Option<AssetRef>,

    #[serde(rename = "transcriptUrl", skip_serializing_if = "Option::is_none")]
    pub transcript_url: Option<AssetRef>,

    #[serde(rename = "degreeCertificateUrl", skip_serializing_if = "Option::is_none")]
    pub degree_certificate_url: Option<AssetRef>,

    pub date_created: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_vocabulary_maps_exhaustively() {
        assert_eq!(
            ApplicationStatus::from_review_input("diproses").unwrap(),
            ApplicationStatus::Reviewed
        );
        assert_eq!(
            ApplicationStatus::from_review_input("interview").unwrap(),
            ApplicationStatus::Interview
        );
        assert_eq!(
            ApplicationStatus::from_review_input("LOLOS").unwrap(),
            ApplicationStatus::Accepted
        );
        assert_eq!(
            ApplicationStatus::from_review_input("ditolak").unwrap(),
            ApplicationStatus::Rejected
        );
        // Raw storage names pass through too
        assert_eq!(
            ApplicationStatus::from_review_input("pending").unwrap(),
            ApplicationStatus::Pending
        );
    }

    #[test]
    fn unknown_status_fails_closed() {
        assert!(ApplicationStatus::from_review_input("shortlisted").is_err());
        assert!("".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn applicant_deserializes_remote_field_names() {
        let json = r#"{
            "id": "a1",
            "fullName": "Siti Rahma",
            "email": "siti@example.com",
            "appliedJobId": 3,
            "applicationStatus": "interview",
            "resumeFileUrl": {"id": "f-123"},
            "date_created": "2025-06-01T08:00:00Z"
        }"#;
        let a: Applicant = serde_json::from_str(json).unwrap();
        assert_eq!(a.full_name, "Siti Rahma");
        assert_eq!(a.applied_job_id.as_str(), "3");
        assert_eq!(a.application_status, ApplicationStatus::Interview);
        assert!(matches!(a.resume_file_url, Some(AssetRef::File { .. })));
    }

    #[test]
    fn missing_status_defaults_to_pending() {
        let json = r#"{"id": 1, "fullName": "X", "email": "x@y.z", "appliedJobId": 1}"#;
        let a: Applicant = serde_json::from_str(json).unwrap();
        assert_eq!(a.application_status, ApplicationStatus::Pending);
    }

    #[test]
    fn normalize_assets_is_idempotent() {
        let base = "https://cms.example.com";
        let mut a: Applicant = serde_json::from_str(
            r#"{
                "id": 1,
                "fullName": "X",
                "email": "x@y.z",
                "appliedJobId": 1,
                "profilePhoto": "photo-id-1",
                "resumeFileUrl": {"id": "f-9"},
                "transcriptUrl": "https://drive.example.com/doc/5"
            }"#,
        )
        .unwrap();

        a.normalize_assets(base);
        let once = a.clone();
        a.normalize_assets(base);

        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            serde_json::to_value(&once).unwrap()
        );
        assert_eq!(
            a.profile_photo,
            Some(AssetRef::Url("https://cms.example.com/assets/photo-id-1".into()))
        );
        assert_eq!(
            a.resume_file_url,
            Some(AssetRef::Url("https://cms.example.com/assets/f-9".into()))
        );
        assert_eq!(
            a.transcript_url,
            Some(AssetRef::Url("https://drive.example.com/doc/5".into()))
        );
    }
}
