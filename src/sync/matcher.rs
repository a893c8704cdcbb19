use crate::model::{JobListing, normalize_token};

use super::facets::FilterFacetSet;

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches_query(job: &JobListing, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    [&job.title, &job.company, &job.location, &job.description]
        .into_iter()
        .chain(job.tags.iter())
        .any(|field| contains_ignore_case(field, query))
}

fn matches_city(job: &JobListing, cities: &[String]) -> bool {
    cities.is_empty()
        || cities.iter().any(|city| {
            job.city.eq_ignore_ascii_case(city)
                || contains_ignore_case(&job.city, city)
                || contains_ignore_case(&job.location, city)
        })
}

fn matches_role(job: &JobListing, roles: &[String]) -> bool {
    roles.is_empty() || roles.iter().any(|role| contains_ignore_case(&job.title, role))
}

/// Permissive: compare the known minimum, else the known maximum; a posting
/// with no salary information is kept under any threshold.
fn matches_salary(job: &JobListing, threshold: Option<i64>) -> bool {
    let Some(threshold) = threshold else {
        return true;
    };
    match job.min_salary.or(job.max_salary) {
        Some(salary) => i64::from(salary) >= threshold,
        None => true,
    }
}

/// Whether `job` satisfies every present dimension of `facets`
pub fn matches(job: &JobListing, facets: &FilterFacetSet) -> bool {
    let job_type = normalize_token(&job.job_type);
    let work_mode = normalize_token(&job.work_mode);

    matches_query(job, &facets.query)
        && matches_city(job, &facets.cities)
        && matches_role(job, &facets.roles)
        && (facets.job_types.is_empty() || facets.job_types.iter().any(|t| t.as_str() == job_type))
        && (facets.work_modes.is_empty() || facets.work_modes.iter().any(|m| m.as_str() == work_mode))
        && facets
            .experience
            .map_or(true, |bucket| bucket.accepts(job.min_experience, job.max_experience))
        && matches_salary(job, facets.min_salary)
}

/// Jobs that satisfy `facets`, in input order
pub fn filter_jobs<'a>(jobs: &'a [JobListing], facets: &FilterFacetSet) -> Vec<&'a JobListing> {
    jobs.iter().filter(|job| matches(job, facets)).collect()
}
