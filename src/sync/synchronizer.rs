use std::collections::HashMap;

use reqwest::Url;
use tracing::debug;

use crate::model::{ExperienceBucket, FilterOptions, JobListing};

use super::facets::{Facet, FilterFacetSet};
use super::matcher::matches;
use super::url::{UrlParams, derive_facets, strip_recognized, with_search};

/// Jobs shown per page on the browse page
pub const PAGE_SIZE: usize = 6;

/// Identifies the navigation an async result belongs to.
/// Results carrying a superseded ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NavigationTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Set by `clear_all`; the next URL derivation is skipped once
    Clearing,
}

/// Owns the browse page filter state and keeps it consistent with the URL,
/// the loaded filter options and the cached job list.
#[derive(Debug)]
pub struct FilterSynchronizer {
    url: Url,
    params: UrlParams,
    facets: FilterFacetSet,
    options: FilterOptions,
    jobs: Vec<JobListing>,
    saved: HashMap<i64, bool>,
    /// Indices into `jobs` that pass `facets`
    filtered: Vec<usize>,
    page: usize,
    phase: Phase,
    generation: u64,
}

impl FilterSynchronizer {
    pub fn new(url: Url) -> Self {
        let params = UrlParams::from_url(&url);
        let mut facets = FilterFacetSet::default();
        let options = FilterOptions::default();
        derive_facets(&mut facets, &params, &options);

        Self {
            url,
            params,
            facets,
            options,
            jobs: Vec::new(),
            saved: HashMap::new(),
            filtered: Vec::new(),
            page: 1,
            phase: Phase::Idle,
            generation: 0,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn facets(&self) -> &FilterFacetSet {
        &self.facets
    }

    pub fn filter_options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Every cached job, saved ones included
    pub fn jobs(&self) -> &[JobListing] {
        &self.jobs
    }

    /// Supersede every outstanding ticket and hand out a fresh one
    pub fn begin_navigation(&mut self) -> NavigationTicket {
        self.generation += 1;
        NavigationTicket(self.generation)
    }

    pub fn is_current(&self, ticket: NavigationTicket) -> bool {
        ticket.0 == self.generation
    }

    /// The address bar changed. Re-derives facets from the new URL and returns
    /// the ticket results for this URL must carry.
    ///
    /// Right after `clear_all` the address bar still reports the pre-clear URL;
    /// that one navigation keeps the stripped URL and derives nothing.
    pub fn navigate(&mut self, url: Url) -> NavigationTicket {
        let ticket = self.begin_navigation();
        if self.phase == Phase::Clearing {
            debug!("Ignoring pre-clear URL {}", url);
            self.phase = Phase::Idle;
        } else {
            self.params = UrlParams::from_url(&url);
            self.url = url;
            self.derive();
        }
        self.refilter();
        ticket
    }

    /// Filter options finished loading; the deferred `q`/`location` matching runs now
    pub fn set_filter_options(&mut self, ticket: NavigationTicket, options: FilterOptions) -> bool {
        if !self.accept(ticket, "filter options") {
            return false;
        }
        self.options = options;
        self.derive();
        self.refilter();
        true
    }

    pub fn set_jobs(&mut self, ticket: NavigationTicket, jobs: Vec<JobListing>) -> bool {
        if !self.accept(ticket, "job list") {
            return false;
        }
        self.jobs = jobs;
        self.refilter();
        true
    }

    /// Merge per-job saved flags. Saved jobs drop out of `visible` but stay cached.
    pub fn set_saved_status(&mut self, ticket: NavigationTicket, statuses: HashMap<i64, bool>) -> bool {
        if !self.accept(ticket, "saved status") {
            return false;
        }
        self.saved.extend(statuses);
        true
    }

    /// Local save/unsave; an unsaved job reappears without a refetch
    pub fn mark_saved(&mut self, job_id: i64, saved: bool) {
        self.saved.insert(job_id, saved);
    }

    pub fn is_saved(&self, job_id: i64) -> bool {
        self.saved.get(&job_id).copied().unwrap_or(false)
    }

    pub fn toggle(&mut self, facet: Facet, value: &str) -> bool {
        let changed = self.facets.toggle(facet, value);
        if changed {
            self.refilter();
        }
        changed
    }

    /// Set the free-text query and mirror it into `search`
    pub fn set_query(&mut self, query: &str) {
        self.facets.set_query(query);
        self.url = with_search(&self.url, &self.facets.query);
        self.params = UrlParams::from_url(&self.url);
        self.refilter();
    }

    pub fn set_experience(&mut self, bucket: Option<ExperienceBucket>) {
        self.facets.set_experience(bucket);
        self.refilter();
    }

    pub fn set_min_salary(&mut self, threshold: Option<i64>) {
        self.facets.set_min_salary(threshold);
        self.refilter();
    }

    /// Reset every facet and strip the recognized params from the URL in one
    /// step. The next derivation, which would still see the old URL, is skipped.
    pub fn clear_all(&mut self) -> &Url {
        self.facets.clear();
        self.url = strip_recognized(&self.url);
        self.params = UrlParams::default();
        self.phase = Phase::Clearing;
        self.refilter();
        &self.url
    }

    /// Filtered jobs minus the ones the viewer already saved
    pub fn visible(&self) -> Vec<&JobListing> {
        self.filtered
            .iter()
            .map(|&index| &self.jobs[index])
            .filter(|job| !self.is_saved(job.id))
            .collect()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.visible().len().div_ceil(PAGE_SIZE).max(1)
    }

    /// Clamped to `1..=page_count`
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.page_count());
    }

    pub fn visible_page(&self) -> Vec<&JobListing> {
        let page = self.page.min(self.page_count());
        self.visible()
            .into_iter()
            .skip((page - 1) * PAGE_SIZE)
            .take(PAGE_SIZE)
            .collect()
    }

    fn accept(&self, ticket: NavigationTicket, what: &str) -> bool {
        if self.is_current(ticket) {
            return true;
        }
        debug!(
            "Discarding stale {} (ticket {}, current {})",
            what, ticket.0, self.generation
        );
        false
    }

    fn derive(&mut self) {
        if self.phase == Phase::Clearing {
            debug!("Skipping URL derivation after clear");
            self.phase = Phase::Idle;
            return;
        }
        derive_facets(&mut self.facets, &self.params, &self.options);
    }

    fn refilter(&mut self) {
        self.filtered = self
            .jobs
            .iter()
            .enumerate()
            .filter(|(_, job)| matches(job, &self.facets))
            .map(|(index, _)| index)
            .collect();
        if !self.jobs.is_empty() {
            self.page = 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::JobType;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn job(id: i64, title: &str, job_type: &str) -> JobListing {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": title,
            "company": "Acme",
            "jobType": job_type,
            "workMode": "office",
            "city": "Noida",
            "locality": null,
            "location": "Noida",
            "minExperience": null,
            "maxExperience": null,
            "minSalary": null,
            "maxSalary": null,
            "vacancies": 1,
            "description": "",
            "tags": [],
            "experienceLabel": "Fresher",
            "salaryLabel": null,
            "createdAt": "2025-01-01T00:00:00",
            "expiresAt": null
        }))
        .unwrap()
    }

    fn titles(list: &[&str]) -> FilterOptions {
        FilterOptions {
            titles: list.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    fn visible_ids(sync: &FilterSynchronizer) -> Vec<i64> {
        sync.visible().iter().map(|j| j.id).collect()
    }

    #[test]
    fn q_resolves_once_titles_arrive() {
        let mut sync = FilterSynchronizer::new(url("https://jobs.example/jobs"));
        let ticket = sync.navigate(url("https://jobs.example/jobs?q=delivery"));
        assert!(sync.facets().roles.is_empty());

        assert!(sync.set_filter_options(ticket, titles(&["Delivery Executive", "Telecaller"])));
        assert_eq!(sync.facets().roles, vec!["Delivery Executive"]);

        sync.set_jobs(
            ticket,
            vec![job(1, "Delivery Executive", "Full Time"), job(2, "Telecaller", "Full Time")],
        );
        assert_eq!(visible_ids(&sync), vec![1]);
    }

    #[test]
    fn category_from_url_narrows_cached_jobs() {
        let mut sync = FilterSynchronizer::new(url("https://jobs.example/jobs"));
        let ticket = sync.navigate(url("https://jobs.example/jobs?category=internship"));
        sync.set_jobs(
            ticket,
            vec![job(1, "Intern", "Internship"), job(2, "Manager", "Full Time")],
        );
        assert_eq!(sync.facets().job_types, vec![JobType::Internship]);
        assert_eq!(visible_ids(&sync), vec![1]);

        // leaving the category drops its job types
        sync.navigate(url("https://jobs.example/jobs"));
        assert!(sync.facets().job_types.is_empty());
        assert_eq!(visible_ids(&sync), vec![1, 2]);
    }

    #[test]
    fn clear_all_is_not_undone_by_the_stale_url() {
        let old = url("https://jobs.example/jobs?category=remote&experience=senior&search=sales&ref=mail");
        let mut sync = FilterSynchronizer::new(url("https://jobs.example/jobs"));
        sync.navigate(old.clone());
        assert!(!sync.facets().is_empty());

        let cleared = sync.clear_all().clone();
        assert_eq!(cleared.as_str(), "https://jobs.example/jobs?ref=mail");
        assert_eq!(sync.phase(), Phase::Clearing);

        // same render cycle still reports the old URL
        sync.navigate(old.clone());
        assert!(sync.facets().is_empty());
        assert_eq!(sync.url(), &cleared);
        assert_eq!(sync.phase(), Phase::Idle);

        // the guard is one-shot
        sync.navigate(old);
        assert!(!sync.facets().is_empty());
    }

    #[test]
    fn options_after_stale_navigation_keep_the_clear() {
        let old = url("https://jobs.example/jobs?category=remote&experience=senior&ref=mail");
        let mut sync = FilterSynchronizer::new(url("https://jobs.example/jobs"));
        sync.navigate(old.clone());
        let cleared = sync.clear_all().clone();

        let ticket = sync.navigate(old);
        assert!(sync.set_filter_options(ticket, titles(&["Driver"])));
        assert!(sync.facets().is_empty());
        assert_eq!(sync.url(), &cleared);

        let ticket = sync.begin_navigation();
        sync.set_jobs(ticket, vec![job(1, "Driver", "Full Time")]);
        assert_eq!(visible_ids(&sync), vec![1]);
    }

    #[test]
    fn clear_guard_also_covers_option_loading() {
        let mut sync = FilterSynchronizer::new(url("https://jobs.example/jobs"));
        let ticket = sync.navigate(url("https://jobs.example/jobs?category=noida"));
        sync.clear_all();
        assert!(sync.set_filter_options(ticket, titles(&["Driver"])));
        assert!(sync.facets().is_empty());
    }

    #[test]
    fn unmatched_q_leaves_no_residue() {
        let mut sync = FilterSynchronizer::new(url("https://jobs.example/jobs"));
        let ticket = sync.navigate(url("https://jobs.example/jobs?q=plumber"));
        sync.set_filter_options(ticket, titles(&["Driver"]));
        assert!(sync.facets().is_empty());

        let ticket = sync.navigate(url("https://jobs.example/jobs?q=driver"));
        sync.set_filter_options(ticket, titles(&["Driver"]));
        sync.set_jobs(ticket, vec![job(1, "Driver", "Full Time"), job(2, "Telecaller", "Full Time")]);
        assert!(sync.facets().query.is_empty());
        assert_eq!(sync.facets().roles, vec!["Driver"]);
        assert_eq!(visible_ids(&sync), vec![1]);
    }

    #[test]
    fn stale_results_are_discarded() {
        let mut sync = FilterSynchronizer::new(url("https://jobs.example/jobs"));
        let first = sync.navigate(url("https://jobs.example/jobs?category=remote"));
        let second = sync.navigate(url("https://jobs.example/jobs?category=noida"));

        assert!(!sync.set_jobs(first, vec![job(1, "Old", "Full Time")]));
        assert!(!sync.set_filter_options(first, titles(&["Old"])));
        assert!(!sync.set_saved_status(first, HashMap::from([(1, true)])));
        assert!(sync.jobs().is_empty());
        assert!(sync.filter_options().titles.is_empty());
        assert!(!sync.is_saved(1));

        assert!(sync.set_jobs(second, vec![job(2, "New", "Full Time")]));
        assert_eq!(visible_ids(&sync), vec![2]);
    }

    #[test]
    fn refilter_resets_page() {
        let mut sync = FilterSynchronizer::new(url("https://jobs.example/jobs"));
        let ticket = sync.begin_navigation();
        let jobs = (1..=14).map(|id| job(id, "Driver", "Full Time")).collect();
        sync.set_jobs(ticket, jobs);

        assert_eq!(sync.page_count(), 3);
        sync.set_page(3);
        assert_eq!(sync.page(), 3);
        assert_eq!(sync.visible_page().len(), 2);
        sync.set_page(9);
        assert_eq!(sync.page(), 3);

        sync.set_min_salary(Some(1000));
        assert_eq!(sync.page(), 1);
        assert_eq!(sync.visible_page().len(), PAGE_SIZE);
    }

    #[test]
    fn saved_jobs_are_hidden_but_cached() {
        let mut sync = FilterSynchronizer::new(url("https://jobs.example/jobs"));
        let ticket = sync.begin_navigation();
        sync.set_jobs(ticket, vec![job(1, "A", "Full Time"), job(2, "B", "Full Time")]);
        sync.set_saved_status(ticket, HashMap::from([(1, true), (2, false)]));

        assert_eq!(visible_ids(&sync), vec![2]);
        assert_eq!(sync.jobs().len(), 2);

        sync.mark_saved(1, false);
        assert_eq!(visible_ids(&sync), vec![1, 2]);
    }

    #[test]
    fn query_is_mirrored_into_search_param() {
        let mut sync = FilterSynchronizer::new(url("https://jobs.example/jobs?category=remote"));
        sync.set_query("data entry");
        assert_eq!(
            sync.url().as_str(),
            "https://jobs.example/jobs?category=remote&search=data+entry"
        );

        // a later option load re-derives from the mirrored URL and keeps the query
        let ticket = sync.begin_navigation();
        sync.set_filter_options(ticket, titles(&["Driver"]));
        assert_eq!(sync.facets().query, "data entry");
    }

    #[test]
    fn toggles_refilter() {
        let mut sync = FilterSynchronizer::new(url("https://jobs.example/jobs"));
        let ticket = sync.begin_navigation();
        sync.set_jobs(ticket, vec![job(1, "A", "Part Time"), job(2, "B", "Full Time")]);

        assert!(sync.toggle(Facet::JobType, "part-time"));
        assert_eq!(visible_ids(&sync), vec![1]);
        assert!(!sync.toggle(Facet::JobType, "gig"));
        sync.set_experience(Some(ExperienceBucket::TwoToFive));
        assert!(visible_ids(&sync).is_empty());
        assert_eq!(sync.page_count(), 1);
        assert!(sync.visible_page().is_empty());
    }
}
