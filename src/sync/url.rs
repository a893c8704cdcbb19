use reqwest::Url;

use crate::filters::expand_category;
use crate::model::{ExperienceBucket, FilterOptions};

use super::facets::FilterFacetSet;

/// Query parameters the browse page understands; anything else is left alone
pub const RECOGNIZED_PARAMS: [&str; 5] = ["category", "q", "search", "location", "experience"];

/// Recognized query parameters of a browse-page URL. Blank values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParams {
    pub category: Option<String>,
    /// Role hint, matched against known titles
    pub q: Option<String>,
    /// Free-text search
    pub search: Option<String>,
    pub location: Option<String>,
    pub experience: Option<String>,
}

impl UrlParams {
    pub fn from_url(url: &Url) -> Self {
        let mut params = UrlParams::default();
        for (key, value) in url.query_pairs() {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let slot = match key.as_ref() {
                "category" => &mut params.category,
                "q" => &mut params.q,
                "search" => &mut params.search,
                "location" => &mut params.location,
                "experience" => &mut params.experience,
                _ => continue,
            };
            // first occurrence wins
            if slot.is_none() {
                *slot = Some(value.to_string());
            }
        }
        params
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Map an `experience` URL token to a bucket.
///
/// `fresher`, `mid` and `senior` are aliases; literal bucket tokens pass
/// through; anything else is ignored.
pub fn experience_from_token(token: &str) -> Option<ExperienceBucket> {
    match token.trim().to_lowercase().as_str() {
        "fresher" => Some(ExperienceBucket::Fresher),
        "mid" => Some(ExperienceBucket::UpToTwo),
        "senior" => Some(ExperienceBucket::TwoToFive),
        other => ExperienceBucket::from_token(other),
    }
}

/// First option that contains `needle` or is contained in it, ignoring case
pub fn match_option<'a>(needle: &str, options: &'a [String]) -> Option<&'a str> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    options
        .iter()
        .map(String::as_str)
        .filter(|option| !option.trim().is_empty())
        .find(|option| {
            let option = option.to_lowercase();
            option.contains(&needle) || needle.contains(&option)
        })
}

/// One URL → state derivation pass.
///
/// Order: category, free-text search, `q` against titles, `location` against
/// cities, experience. `q` and `location` only resolve once their option list
/// is loaded; re-running the pass later never duplicates a value.
pub fn derive_facets(facets: &mut FilterFacetSet, params: &UrlParams, options: &FilterOptions) {
    match expand_category(params.category.as_deref()) {
        Some(fragment) => facets.apply_category(&fragment),
        None => facets.clear_category_dimensions(),
    }

    if let Some(search) = &params.search {
        facets.set_query(search);
    }

    if let Some(q) = &params.q {
        if let Some(title) = match_option(q, &options.titles) {
            facets.add_role(title);
        }
    }

    if let Some(location) = &params.location {
        if let Some(city) = match_option(location, &options.cities) {
            facets.add_city(city);
        }
    }

    if let Some(token) = &params.experience {
        if let Some(bucket) = experience_from_token(token) {
            facets.set_experience(Some(bucket));
        }
    }
}

/// Copy of `url` without any recognized parameter
pub fn strip_recognized(url: &Url) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !RECOGNIZED_PARAMS.contains(&key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut stripped = url.clone();
    if kept.is_empty() {
        stripped.set_query(None);
    } else {
        stripped.query_pairs_mut().clear().extend_pairs(kept);
    }
    stripped
}

/// Mirror the free-text query into `search`, keeping every other parameter
pub fn with_search(url: &Url, query: &str) -> Url {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "search")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    if !query.trim().is_empty() {
        pairs.push(("search".to_string(), query.trim().to_string()));
    }

    let mut mirrored = url.clone();
    if pairs.is_empty() {
        mirrored.set_query(None);
    } else {
        mirrored.query_pairs_mut().clear().extend_pairs(pairs);
    }
    mirrored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::JobType;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn options(titles: &[&str], cities: &[&str]) -> FilterOptions {
        FilterOptions {
            titles: titles.iter().map(|t| t.to_string()).collect(),
            cities: cities.iter().map(|c| c.to_string()).collect(),
            tags: Vec::new(),
        }
    }

    #[test]
    fn parses_recognized_params_and_ignores_others() {
        let params = UrlParams::from_url(&url(
            "https://jobs.example/jobs?category=remote&q=delivery&utm_source=mail&location=&experience=mid",
        ));
        assert_eq!(params.category.as_deref(), Some("remote"));
        assert_eq!(params.q.as_deref(), Some("delivery"));
        assert_eq!(params.location, None);
        assert_eq!(params.experience.as_deref(), Some("mid"));
        assert_eq!(params.search, None);
    }

    #[test]
    fn experience_tokens_map_or_pass_through() {
        assert_eq!(experience_from_token("fresher"), Some(ExperienceBucket::Fresher));
        assert_eq!(experience_from_token("mid"), Some(ExperienceBucket::UpToTwo));
        assert_eq!(experience_from_token("senior"), Some(ExperienceBucket::TwoToFive));
        assert_eq!(experience_from_token("5-10"), Some(ExperienceBucket::FiveToTen));
        assert_eq!(experience_from_token("10+"), Some(ExperienceBucket::TenPlus));
        assert_eq!(experience_from_token("guru"), None);
    }

    #[test]
    fn matching_works_in_both_directions() {
        let titles = vec!["Delivery Executive".to_string(), "Telecaller".to_string()];
        assert_eq!(match_option("delivery", &titles), Some("Delivery Executive"));
        assert_eq!(match_option("senior telecaller hindi", &titles), Some("Telecaller"));
        assert_eq!(match_option("plumber", &titles), None);
        assert_eq!(match_option("", &titles), None);
    }

    #[test]
    fn q_matches_title_and_adds_role() {
        let mut facets = FilterFacetSet::default();
        let params = UrlParams::from_url(&url("https://jobs.example/jobs?q=delivery"));
        derive_facets(&mut facets, &params, &options(&["Delivery Executive"], &[]));
        assert_eq!(facets.roles, vec!["Delivery Executive"]);

        // a second pass does not duplicate
        derive_facets(&mut facets, &params, &options(&["Delivery Executive"], &[]));
        assert_eq!(facets.roles, vec!["Delivery Executive"]);
    }

    #[test]
    fn matching_waits_for_options() {
        let mut facets = FilterFacetSet::default();
        let params = UrlParams::from_url(&url("https://jobs.example/jobs?q=delivery&location=noida"));
        derive_facets(&mut facets, &params, &FilterOptions::default());
        assert!(facets.roles.is_empty());
        assert!(facets.cities.is_empty());
        assert!(facets.query.is_empty());

        derive_facets(&mut facets, &params, &options(&["Delivery Executive"], &["Greater Noida", "Noida"]));
        assert_eq!(facets.roles, vec!["Delivery Executive"]);
        assert_eq!(facets.cities, vec!["Greater Noida"]);
    }

    #[test]
    fn unmatched_q_adds_nothing() {
        let mut facets = FilterFacetSet::default();
        let params = UrlParams::from_url(&url("https://jobs.example/jobs?q=plumber"));
        derive_facets(&mut facets, &params, &options(&["Delivery Executive"], &[]));
        assert!(facets.is_empty());
    }

    #[test]
    fn missing_category_clears_only_category_dimensions() {
        let mut facets = FilterFacetSet {
            job_types: vec![JobType::Internship],
            cities: vec!["Delhi".to_string()],
            ..Default::default()
        };
        let params = UrlParams::from_url(&url("https://jobs.example/jobs?experience=senior"));
        derive_facets(&mut facets, &params, &FilterOptions::default());
        assert!(facets.job_types.is_empty());
        assert_eq!(facets.cities, vec!["Delhi"]);
        assert_eq!(facets.experience, Some(ExperienceBucket::TwoToFive));
    }

    #[test]
    fn strip_keeps_unknown_params() {
        let stripped = strip_recognized(&url(
            "https://jobs.example/jobs?category=noida&ref=home&q=x&search=y&location=z&experience=0",
        ));
        assert_eq!(stripped.as_str(), "https://jobs.example/jobs?ref=home");

        let bare = strip_recognized(&url("https://jobs.example/jobs?category=noida"));
        assert_eq!(bare.as_str(), "https://jobs.example/jobs");
    }

    #[test]
    fn search_is_mirrored_into_url() {
        let mirrored = with_search(&url("https://jobs.example/jobs?category=remote&search=old"), "data entry");
        assert_eq!(
            mirrored.as_str(),
            "https://jobs.example/jobs?category=remote&search=data+entry"
        );
        let cleared = with_search(&mirrored, "");
        assert_eq!(cleared.as_str(), "https://jobs.example/jobs?category=remote");
    }
}
