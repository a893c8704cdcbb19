//! Category shortcuts and the SQL predicates they expand into.

pub mod category;
pub mod labels;
pub mod predicate;

pub use category::{expand_category, Category, FilterFragment};
pub use labels::{experience_label, salary_label};
pub use predicate::{build_conditions, Conditions, Predicate, SqlValue, SqlWriter};
