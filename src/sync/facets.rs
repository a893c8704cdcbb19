use crate::filters::FilterFragment;
use crate::model::{ExperienceBucket, JobType, WorkMode};

/// Multi-select dimensions that can be toggled value by value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    City,
    Role,
    JobType,
    WorkMode,
}

/// Current selection across every filter dimension.
///
/// Dimensions combine with AND; values inside a multi-select dimension
/// combine with OR. Empty means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterFacetSet {
    /// Free-text query
    pub query: String,
    pub cities: Vec<String>,
    /// Title substrings
    pub roles: Vec<String>,
    pub job_types: Vec<JobType>,
    pub work_modes: Vec<WorkMode>,
    pub experience: Option<ExperienceBucket>,
    /// Minimum monthly salary
    pub min_salary: Option<i64>,
}

impl FilterFacetSet {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrite the dimensions a category controls with its fragment.
    /// Tags are server-side only and the free-text query and salary are untouched.
    pub fn apply_category(&mut self, fragment: &FilterFragment) {
        self.job_types = fragment.job_types.to_vec();
        self.work_modes = fragment.work_modes.to_vec();
        self.experience = fragment.experience;
        self.cities = fragment.cities.iter().map(|c| c.to_string()).collect();
        self.roles = fragment.roles.iter().map(|r| r.to_string()).collect();
    }

    /// Drop the dimensions only a category can set from the URL
    pub fn clear_category_dimensions(&mut self) {
        self.job_types.clear();
        self.work_modes.clear();
    }

    /// Flip one value of a multi-select dimension.
    /// Returns false when the value is not valid for the dimension.
    pub fn toggle(&mut self, facet: Facet, value: &str) -> bool {
        match facet {
            Facet::City => toggle_text(&mut self.cities, value),
            Facet::Role => toggle_text(&mut self.roles, value),
            Facet::JobType => match JobType::parse(value) {
                Some(job_type) => {
                    toggle_value(&mut self.job_types, job_type);
                    true
                }
                None => false,
            },
            Facet::WorkMode => match WorkMode::parse(value) {
                Some(mode) => {
                    toggle_value(&mut self.work_modes, mode);
                    true
                }
                None => false,
            },
        }
    }

    /// Add a city unless an equal one (ignoring case) is already selected
    pub fn add_city(&mut self, city: &str) -> bool {
        add_unique(&mut self.cities, city)
    }

    pub fn add_role(&mut self, role: &str) -> bool {
        add_unique(&mut self.roles, role)
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.trim().to_string();
    }

    pub fn set_experience(&mut self, bucket: Option<ExperienceBucket>) {
        self.experience = bucket;
    }

    pub fn set_min_salary(&mut self, threshold: Option<i64>) {
        self.min_salary = threshold.filter(|t| *t > 0);
    }

    /// Reset every dimension
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn add_unique(values: &mut Vec<String>, value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() || values.iter().any(|v| v.eq_ignore_ascii_case(value)) {
        return false;
    }
    values.push(value.to_string());
    true
}

fn toggle_text(values: &mut Vec<String>, value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return false;
    }
    match values.iter().position(|v| v.eq_ignore_ascii_case(value)) {
        Some(index) => {
            values.remove(index);
        }
        None => values.push(value.to_string()),
    }
    true
}

fn toggle_value<T: PartialEq>(values: &mut Vec<T>, value: T) {
    match values.iter().position(|v| *v == value) {
        Some(index) => {
            values.remove(index);
        }
        None => values.push(value),
    }
}
