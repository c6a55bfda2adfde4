//! Job posting models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Identifier of a remote item.
///
/// Directus returns integer primary keys for SQL-backed collections and
/// UUID strings for file-backed ones, so both shapes are accepted and kept
/// as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        string_or_number(deserializer).map(ItemId)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
    })
}

/// Stored lifecycle status of a job posting.
///
/// Legacy records carry no status at all; a missing status is treated as
/// active for filtering (see [`JobPosting::is_active_for_display`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostingStatus {
    Active,
    Inactive,
}

impl PostingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostingStatus::Active => "active",
            PostingStatus::Inactive => "inactive",
        }
    }

    /// Flip between active and inactive.
    pub fn toggled(&self) -> Self {
        match self {
            PostingStatus::Active => PostingStatus::Inactive,
            PostingStatus::Inactive => PostingStatus::Active,
        }
    }
}

impl fmt::Display for PostingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PostingStatus {
    type Err = UnknownPostingStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(PostingStatus::Active),
            "inactive" => Ok(PostingStatus::Inactive),
            other => Err(UnknownPostingStatus(other.to_string())),
        }
    }
}

/// Returned when a posting status string is not part of the closed set.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown posting status: {0}")]
pub struct UnknownPostingStatus(pub String);

/// A job posting as stored in the remote `job_postings` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: ItemId,

    pub title: String,

    pub department: String,

    pub description: String,

    /// Requirement lines joined with `\n` (the storage representation).
    pub requirements: String,

    /// Application deadline.
    pub deadline: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,

    pub location: String,

    #[serde(default)]
    pub salary: String,

    #[serde(default)]
    pub employment_type: String,

    #[serde(default)]
    pub min_education: String,

    #[serde(default)]
    pub experience: String,

    /// Missing on legacy records; `None` counts as active when filtering.
    #[serde(default)]
    pub status: Option<PostingStatus>,
}

impl JobPosting {
    /// Display predicate: active-or-null status AND deadline strictly in
    /// the future. A deadline exactly equal to `now` is not active.
    ///
    /// Recomputed on every read; the remote store does not auto-expire
    /// postings.
    pub fn is_active_for_display(&self, now: DateTime<Utc>) -> bool {
        let status_active = matches!(self.status, Some(PostingStatus::Active) | None);
        status_active && self.deadline > now
    }

    /// Inverse of the display predicate as the dashboard shows it:
    /// explicitly inactive, or past (or at) the deadline.
    pub fn is_inactive_for_display(&self, now: DateTime<Utc>) -> bool {
        matches!(self.status, Some(PostingStatus::Inactive)) || self.deadline <= now
    }

    /// Requirement lines split back out of the stored newline-joined form.
    pub fn requirement_lines(&self) -> Vec<&str> {
        self.requirements
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect()
    }
}

/// Parse requirements from free text into the newline-joined storage form,
/// trimming each line and dropping blanks.
pub fn join_requirements(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Payload for creating a job posting.
///
/// New postings are written with an explicit `active` status even though a
/// missing status also filters as active, so legacy and new records stay
/// distinguishable in the remote store.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewJobPosting {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "department is required"))]
    pub department: String,

    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,

    #[validate(length(min = 1, message = "requirements are required"))]
    pub requirements: String,

    pub deadline: DateTime<Utc>,

    pub date_created: DateTime<Utc>,

    #[validate(length(min = 1, message = "location is required"))]
    pub location: String,

    pub salary: String,

    pub employment_type: String,

    pub min_education: String,

    pub experience: String,

    #[serde(default = "default_status")]
    pub status: PostingStatus,
}

fn default_status() -> PostingStatus {
    PostingStatus::Active
}

/// Partial update for a job posting. Only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobPostingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_education: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PostingStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn posting(status: Option<PostingStatus>, deadline: DateTime<Utc>) -> JobPosting {
        JobPosting {
            id: ItemId::from("1"),
            title: "Backend Engineer".to_string(),
            department: "Engineering".to_string(),
            description: "desc".to_string(),
            requirements: "Rust\nSQL".to_string(),
            deadline,
            date_created: None,
            location: "Jakarta".to_string(),
            salary: String::new(),
            employment_type: String::new(),
            min_education: String::new(),
            experience: String::new(),
            status,
        }
    }

    #[test]
    fn active_predicate_full_truth_table() {
        let now = Utc::now();
        let future = now + Duration::days(7);
        let past = now - Duration::days(7);

        // (status, deadline, expected active)
        let cases = [
            (Some(PostingStatus::Active), future, true),
            (Some(PostingStatus::Active), past, false),
            (None, future, true),
            (None, past, false),
            (Some(PostingStatus::Inactive), future, false),
            (Some(PostingStatus::Inactive), past, false),
        ];

        for (status, deadline, expected) in cases {
            let p = posting(status, deadline);
            assert_eq!(
                p.is_active_for_display(now),
                expected,
                "status={:?} deadline={}",
                status,
                deadline
            );
        }
    }

    #[test]
    fn deadline_exactly_now_is_not_active() {
        let now = Utc::now();
        let p = posting(Some(PostingStatus::Active), now);
        assert!(!p.is_active_for_display(now));
        assert!(p.is_inactive_for_display(now));
    }

    #[test]
    fn null_status_counts_as_active_but_not_inactive() {
        let now = Utc::now();
        let p = posting(None, now + Duration::days(1));
        assert!(p.is_active_for_display(now));
        assert!(!p.is_inactive_for_display(now));
    }

    #[test]
    fn item_id_accepts_numbers_and_strings() {
        let from_num: ItemId = serde_json::from_str("42").unwrap();
        assert_eq!(from_num.as_str(), "42");

        let from_str: ItemId = serde_json::from_str("\"abc-123\"").unwrap();
        assert_eq!(from_str.as_str(), "abc-123");
    }

    #[test]
    fn posting_status_round_trip_and_fail_closed() {
        assert_eq!("active".parse::<PostingStatus>().unwrap(), PostingStatus::Active);
        assert_eq!(PostingStatus::Active.toggled(), PostingStatus::Inactive);
        assert!("open".parse::<PostingStatus>().is_err());
    }

    #[test]
    fn requirements_join_and_split() {
        let joined = join_requirements("  Rust \n\n SQL\n");
        assert_eq!(joined, "Rust\nSQL");

        let p = posting(None, Utc::now());
        assert_eq!(p.requirement_lines(), vec!["Rust", "SQL"]);
    }

    #[test]
    fn missing_status_deserializes_to_none() {
        let json = r#"{
            "id": 7,
            "title": "QA",
            "department": "Engineering",
            "description": "d",
            "requirements": "r",
            "deadline": "2031-01-01T00:00:00Z",
            "location": "Bandung"
        }"#;
        let p: JobPosting = serde_json::from_str(json).unwrap();
        assert!(p.status.is_none());
        assert_eq!(p.id.as_str(), "7");
    }
}
