use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Lowercase, trim and collapse whitespace runs into `-`.
///
/// `"Full Time"`, `"full-time"` and `"Full-time"` all become `"full-time"`.
pub fn normalize_token(value: &str) -> String {
    value
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Employment type of a posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    Internship,
    Contract,
}

impl JobType {
    pub const ALL: [JobType; 4] = [
        JobType::FullTime,
        JobType::PartTime,
        JobType::Internship,
        JobType::Contract,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Internship => "internship",
            JobType::Contract => "contract",
        }
    }

    /// Parse any spelling that normalizes to a known slug
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = normalize_token(value);
        Self::ALL.into_iter().find(|t| t.as_str() == normalized)
    }
}

/// Where the work happens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkMode {
    Remote,
    Hybrid,
    Office,
}

impl WorkMode {
    pub const ALL: [WorkMode; 3] = [WorkMode::Remote, WorkMode::Hybrid, WorkMode::Office];

    pub fn as_str(self) -> &'static str {
        match self {
            WorkMode::Remote => "remote",
            WorkMode::Hybrid => "hybrid",
            WorkMode::Office => "office",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = normalize_token(value);
        Self::ALL.into_iter().find(|m| m.as_str() == normalized)
    }
}

/// Moderation/lifecycle state of a posting. Only `Approved` is visible to candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
    Closed,
    Withdrawn,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Draft => "draft",
            JobStatus::Pending => "pending",
            JobStatus::Approved => "approved",
            JobStatus::Rejected => "rejected",
            JobStatus::Closed => "closed",
            JobStatus::Withdrawn => "withdrawn",
        }
    }
}

/// Discrete experience range used for filtering.
///
/// Distinct from the human readable experience label shown on a listing:
/// `Fresher` here is strict (both bounds zero or unknown), while the label
/// "Fresher" is only used when both bounds are unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExperienceBucket {
    /// `"0"`
    Fresher,
    /// `"0-2"`
    UpToTwo,
    /// `"2-5"`
    TwoToFive,
    /// `"5-10"`
    FiveToTen,
    /// `"10+"`
    TenPlus,
}

impl ExperienceBucket {
    pub const ALL: [ExperienceBucket; 5] = [
        ExperienceBucket::Fresher,
        ExperienceBucket::UpToTwo,
        ExperienceBucket::TwoToFive,
        ExperienceBucket::FiveToTen,
        ExperienceBucket::TenPlus,
    ];

    pub fn token(self) -> &'static str {
        match self {
            ExperienceBucket::Fresher => "0",
            ExperienceBucket::UpToTwo => "0-2",
            ExperienceBucket::TwoToFive => "2-5",
            ExperienceBucket::FiveToTen => "5-10",
            ExperienceBucket::TenPlus => "10+",
        }
    }

    /// Parse one of the literal bucket tokens
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::ALL.into_iter().find(|b| b.token() == token)
    }

    /// Inclusive year range; `None` upper bound means open-ended.
    /// `Fresher` is not a range and is matched separately.
    pub fn range(self) -> (i32, Option<i32>) {
        match self {
            ExperienceBucket::Fresher => (0, Some(0)),
            ExperienceBucket::UpToTwo => (0, Some(2)),
            ExperienceBucket::TwoToFive => (2, Some(5)),
            ExperienceBucket::FiveToTen => (5, Some(10)),
            ExperienceBucket::TenPlus => (10, None),
        }
    }

    /// Whether a posting with the given experience bounds falls in this bucket.
    ///
    /// A posting's range is `[min or 0, max]`; a missing max is open-ended when
    /// a min is present and `0` when both are missing. Ranged buckets keep any
    /// posting whose range overlaps the bucket.
    pub fn accepts(self, min: Option<i32>, max: Option<i32>) -> bool {
        if self == ExperienceBucket::Fresher {
            return matches!(min, None | Some(0)) && matches!(max, None | Some(0));
        }

        let job_lo = min.unwrap_or(0);
        let job_hi = match (min, max) {
            (_, Some(max)) => Some(max),
            (Some(_), None) => None,
            (None, None) => Some(0),
        };

        let (lo, hi) = self.range();
        let starts_in_time = hi.map_or(true, |hi| job_lo <= hi);
        let reaches_bucket = job_hi.map_or(true, |job_hi| job_hi >= lo);
        starts_in_time && reaches_bucket
    }
}

/// A job as served by `GET /jobs` and consumed by the browse page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub job_type: String,
    pub work_mode: String,
    pub city: String,
    pub locality: Option<String>,
    /// `city` plus `, locality` when present
    pub location: String,
    pub min_experience: Option<i32>,
    pub max_experience: Option<i32>,
    pub min_salary: Option<i32>,
    pub max_salary: Option<i32>,
    pub vacancies: i32,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub experience_label: String,
    pub salary_label: Option<String>,
    pub created_at: NaiveDateTime,
    pub expires_at: Option<NaiveDateTime>,
}

/// Distinct values present on approved jobs, used to drive filter pickers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default)]
    pub titles: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_type_spellings_normalize_to_one_value() {
        for spelling in ["Full Time", "full-time", "Full-time", "  FULL   time "] {
            assert_eq!(JobType::parse(spelling), Some(JobType::FullTime), "{spelling}");
        }
        assert_eq!(JobType::parse("Freelance"), None);
        assert_eq!(WorkMode::parse("Remote"), Some(WorkMode::Remote));
    }

    #[test]
    fn fresher_bucket_is_strict() {
        let fresher = ExperienceBucket::Fresher;
        assert!(fresher.accepts(None, None));
        assert!(fresher.accepts(Some(0), None));
        assert!(fresher.accepts(Some(0), Some(0)));
        assert!(!fresher.accepts(Some(0), Some(2)));
        assert!(!fresher.accepts(Some(3), Some(5)));
    }

    #[test]
    fn ranged_buckets_use_overlap() {
        assert!(ExperienceBucket::UpToTwo.accepts(None, None));
        assert!(ExperienceBucket::UpToTwo.accepts(Some(1), Some(3)));
        assert!(!ExperienceBucket::UpToTwo.accepts(Some(3), Some(5)));
        assert!(ExperienceBucket::TwoToFive.accepts(Some(3), None));
        assert!(!ExperienceBucket::TwoToFive.accepts(None, None));
        assert!(ExperienceBucket::TenPlus.accepts(Some(12), None));
        assert!(ExperienceBucket::TenPlus.accepts(Some(4), None));
        assert!(!ExperienceBucket::TenPlus.accepts(Some(4), Some(8)));
    }

    #[test]
    fn bucket_tokens_parse_verbatim() {
        for bucket in ExperienceBucket::ALL {
            assert_eq!(ExperienceBucket::from_token(bucket.token()), Some(bucket));
        }
        assert_eq!(ExperienceBucket::from_token("3-7"), None);
    }
}
