use chrono::NaiveDateTime;
use sqlx::FromRow;

use crate::filters::labels::{experience_label, salary_label};
use crate::model::JobListing;

/// Columns selected for every job read, in `JobRow` field order
pub const JOB_COLUMNS: [&str; 16] = [
    "id",
    "title",
    "company",
    "job_type",
    "work_mode",
    "city",
    "locality",
    "min_experience",
    "max_experience",
    "min_salary",
    "max_salary",
    "vacancies",
    "description",
    "status",
    "created_at",
    "expires_at",
];

/// Database representation of a job posting
#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub job_type: String,
    pub work_mode: String,
    pub city: String,
    pub locality: Option<String>,
    pub min_experience: Option<i32>,
    pub max_experience: Option<i32>,
    pub min_salary: Option<i32>,
    pub max_salary: Option<i32>,
    pub vacancies: i32,
    pub description: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub expires_at: Option<NaiveDateTime>,
}

impl JobRow {
    /// Attach tags and derived labels
    pub fn into_listing(self, tags: Vec<String>) -> JobListing {
        let location = match self.locality.as_deref().map(str::trim) {
            Some(locality) if !locality.is_empty() => format!("{}, {}", self.city, locality),
            _ => self.city.clone(),
        };

        JobListing {
            experience_label: experience_label(self.min_experience, self.max_experience),
            salary_label: salary_label(self.min_salary, self.max_salary),
            id: self.id,
            title: self.title,
            company: self.company,
            job_type: self.job_type,
            work_mode: self.work_mode,
            city: self.city,
            locality: self.locality,
            location,
            min_experience: self.min_experience,
            max_experience: self.max_experience,
            min_salary: self.min_salary,
            max_salary: self.max_salary,
            vacancies: self.vacancies,
            description: self.description,
            tags,
            created_at: self.created_at,
            expires_at: self.expires_at,
        }
    }
}

/// One (job, tag) pair from the tag map
#[derive(Debug, FromRow)]
pub struct JobTagRow {
    pub job_id: i64,
    pub name: String,
}


#[cfg(test)]
mod tests {
    use super::fixtures::job_row;

    #[test]
    fn listing_derives_location_and_labels() {
        let mut row = job_row(1, "Delivery Executive");
        row.locality = Some("Sector 62".to_string());
        row.min_experience = Some(1);
        row.max_experience = Some(3);
        row.min_salary = Some(18000);

        let listing = row.into_listing(vec!["delivery".to_string()]);
        assert_eq!(listing.location, "Noida, Sector 62");
        assert_eq!(listing.experience_label, "1-3 yrs");
        assert_eq!(listing.salary_label.as_deref(), Some("18000+ /Month"));
        assert_eq!(listing.tags, vec!["delivery"]);
    }

    #[test]
    fn blank_locality_is_not_appended() {
        let mut row = job_row(2, "Telecaller");
        row.locality = Some("  ".to_string());
        let listing = row.into_listing(Vec::new());
        assert_eq!(listing.location, "Noida");
        assert_eq!(listing.experience_label, "Fresher");
        assert_eq!(listing.salary_label, None);
    }
}
