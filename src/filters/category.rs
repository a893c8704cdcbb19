use crate::model::{ExperienceBucket, JobType, WorkMode};

/// Partial facet selection produced by expanding a category.
///
/// Every dimension is independently optional; an empty slice means the
/// dimension is not constrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterFragment {
    pub job_types: &'static [JobType],
    pub work_modes: &'static [WorkMode],
    pub experience: Option<ExperienceBucket>,
    pub cities: &'static [&'static str],
    /// Substrings matched against the job title
    pub roles: &'static [&'static str],
    /// Tag names, compared case-insensitively
    pub tags: &'static [&'static str],
}

impl FilterFragment {
    pub const EMPTY: FilterFragment = FilterFragment {
        job_types: &[],
        work_modes: &[],
        experience: None,
        cities: &[],
        roles: &[],
        tags: &[],
    };

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

/// Named shortcut shown as a tile on the home page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Fresher,
    FullTime,
    PartTime,
    Internship,
    Remote,
    OfficeDataEntry,
    ItJobs,
    Noida,
    Delivery,
    CustomerCareTelecaller,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Fresher,
        Category::FullTime,
        Category::PartTime,
        Category::Internship,
        Category::Remote,
        Category::OfficeDataEntry,
        Category::ItJobs,
        Category::Noida,
        Category::Delivery,
        Category::CustomerCareTelecaller,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Category::Fresher => "fresher",
            Category::FullTime => "full-time",
            Category::PartTime => "part-time",
            Category::Internship => "internship",
            Category::Remote => "remote",
            Category::OfficeDataEntry => "office-data-entry",
            Category::ItJobs => "it-jobs",
            Category::Noida => "noida",
            Category::Delivery => "delivery",
            Category::CustomerCareTelecaller => "customer-care-telecaller",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Fresher => "Fresher Jobs",
            Category::FullTime => "Full-time Jobs",
            Category::PartTime => "Part-time Jobs",
            Category::Internship => "Internship",
            Category::Remote => "Remote Jobs",
            Category::OfficeDataEntry => "Office / Data Entry Jobs",
            Category::ItJobs => "IT Jobs",
            Category::Noida => "Jobs in Noida",
            Category::Delivery => "Delivery Jobs",
            Category::CustomerCareTelecaller => "Customer Care / Telecaller Jobs",
        }
    }

    /// Look up a category by its identifier. Surrounding whitespace and case are ignored.
    pub fn parse(id: &str) -> Option<Self> {
        let id = id.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.id().eq_ignore_ascii_case(id))
    }

    pub fn fragment(self) -> FilterFragment {
        let empty = FilterFragment::EMPTY;
        match self {
            Category::Fresher => FilterFragment {
                experience: Some(ExperienceBucket::Fresher),
                ..empty
            },
            Category::FullTime => FilterFragment {
                job_types: &[JobType::FullTime],
                ..empty
            },
            Category::PartTime => FilterFragment {
                job_types: &[JobType::PartTime],
                ..empty
            },
            Category::Internship => FilterFragment {
                job_types: &[JobType::Internship],
                ..empty
            },
            Category::Remote => FilterFragment {
                work_modes: &[WorkMode::Remote],
                ..empty
            },
            Category::OfficeDataEntry => FilterFragment {
                work_modes: &[WorkMode::Office],
                roles: &["Data Entry", "Back Office"],
                tags: &["data entry"],
                ..empty
            },
            Category::ItJobs => FilterFragment {
                roles: &["Developer", "Engineer", "IT"],
                tags: &["IT", "Software"],
                ..empty
            },
            Category::Noida => FilterFragment {
                cities: &["Noida"],
                ..empty
            },
            Category::Delivery => FilterFragment {
                roles: &["Delivery"],
                tags: &["delivery"],
                ..empty
            },
            Category::CustomerCareTelecaller => FilterFragment {
                roles: &["Customer Care", "Telecaller", "Call Center"],
                tags: &["customer care", "telecaller"],
                ..empty
            },
        }
    }
}

/// Expand a category id into its fixed fragment.
///
/// Absent, empty or unknown ids yield `None`, meaning no category narrowing.
pub fn expand_category(id: Option<&str>) -> Option<FilterFragment> {
    id.and_then(Category::parse).map(Category::fragment)
}
