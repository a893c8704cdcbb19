pub mod facets;
pub mod matcher;
pub mod synchronizer;
pub mod url;

pub use facets::{Facet, FilterFacetSet};
pub use matcher::{filter_jobs, matches};
pub use synchronizer::{FilterSynchronizer, NavigationTicket, PAGE_SIZE, Phase};
pub use url::{UrlParams, derive_facets, experience_from_token, strip_recognized};
