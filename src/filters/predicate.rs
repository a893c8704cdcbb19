use std::fmt::Write;

use crate::model::{ExperienceBucket, JobType, WorkMode};

use super::category::FilterFragment;

/// A value bound to a `$n` placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Text(String),
    BigInt(i64),
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::BigInt(value)
    }
}

/// Accumulates SQL text and bound values.
///
/// Placeholders are numbered in the order values are bound, so predicates
/// rendered after other clauses keep counting from where those left off.
/// Job columns are qualified with `job_alias`, tag columns with `tag_alias`.
#[derive(Debug)]
pub struct SqlWriter {
    sql: String,
    params: Vec<SqlValue>,
    job_alias: &'static str,
    tag_alias: &'static str,
}

impl SqlWriter {
    pub fn new(job_alias: &'static str, tag_alias: &'static str) -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
            job_alias,
            tag_alias,
        }
    }

    pub fn push(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Write a placeholder for `value`
    pub fn bind(&mut self, value: impl Into<SqlValue>) {
        self.params.push(value.into());
        let _ = write!(self.sql, "${}", self.params.len());
    }

    /// Write `alias.column` for a jobs column
    pub fn job_column(&mut self, column: &str) {
        let _ = write!(self.sql, "{}.{}", self.job_alias, column);
    }

    pub fn tag_column(&mut self, column: &str) {
        let _ = write!(self.sql, "{}.{}", self.tag_alias, column);
    }

    pub fn job_alias(&self) -> &'static str {
        self.job_alias
    }

    pub fn tag_alias(&self) -> &'static str {
        self.tag_alias
    }

    pub fn finish(self) -> (String, Vec<SqlValue>) {
        (self.sql, self.params)
    }
}

/// One WHERE-clause predicate over the jobs table (and its tag join)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Column normalized like the client normalizes it, then `IN (...)`
    NormalizedIn {
        column: &'static str,
        values: Vec<String>,
    },
    /// Plain `column IN (...)`
    In {
        column: &'static str,
        values: Vec<String>,
    },
    /// Case-insensitive substring match on the title, OR-ed
    TitleContainsAny(Vec<String>),
    /// Case-insensitive tag name equality, OR-ed; needs the tag join
    TagNameAny(Vec<String>),
    Experience(ExperienceBucket),
}

impl Predicate {
    /// Values this predicate binds, in placeholder order
    pub fn params(&self) -> Vec<SqlValue> {
        match self {
            Predicate::NormalizedIn { values, .. } | Predicate::In { values, .. } => {
                values.iter().cloned().map(SqlValue::Text).collect()
            }
            Predicate::TitleContainsAny(roles) => roles
                .iter()
                .map(|role| SqlValue::Text(like_pattern(role)))
                .collect(),
            Predicate::TagNameAny(tags) => tags.iter().cloned().map(SqlValue::Text).collect(),
            Predicate::Experience(_) => Vec::new(),
        }
    }

    pub fn render(&self, w: &mut SqlWriter) {
        match self {
            Predicate::NormalizedIn { column, values } => {
                w.push("REGEXP_REPLACE(LOWER(TRIM(");
                w.job_column(column);
                w.push(")), '\\s+', '-', 'g') IN (");
                render_list(w, values);
                w.push(")");
            }
            Predicate::In { column, values } => {
                w.job_column(column);
                w.push(" IN (");
                render_list(w, values);
                w.push(")");
            }
            Predicate::TitleContainsAny(roles) => {
                w.push("(");
                for (i, role) in roles.iter().enumerate() {
                    if i > 0 {
                        w.push(" OR ");
                    }
                    w.job_column("title");
                    w.push(" ILIKE ");
                    w.bind(like_pattern(role));
                }
                w.push(")");
            }
            Predicate::TagNameAny(tags) => {
                w.push("(");
                for (i, tag) in tags.iter().enumerate() {
                    if i > 0 {
                        w.push(" OR ");
                    }
                    w.push("LOWER(");
                    w.tag_column("name");
                    w.push(") = LOWER(");
                    w.bind(tag.as_str());
                    w.push(")");
                }
                w.push(")");
            }
            Predicate::Experience(bucket) => render_experience(w, *bucket),
        }
    }
}

fn render_list(w: &mut SqlWriter, values: &[String]) {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            w.push(", ");
        }
        w.bind(value.as_str());
    }
}

// Bucket bounds are compile-time constants, so they are written as literals.
fn render_experience(w: &mut SqlWriter, bucket: ExperienceBucket) {
    let alias = w.job_alias();
    if bucket == ExperienceBucket::Fresher {
        w.push(&format!(
            "({alias}.min_experience = 0 OR {alias}.min_experience IS NULL) \
             AND ({alias}.max_experience = 0 OR {alias}.max_experience IS NULL)"
        ));
        return;
    }

    let (lo, hi) = bucket.range();
    w.push("(");
    if let Some(hi) = hi {
        w.push(&format!("COALESCE({alias}.min_experience, 0) <= {hi} AND "));
    }
    // Missing max: open-ended when a min exists, zero when both are missing.
    w.push(&format!(
        "COALESCE({alias}.max_experience, \
         CASE WHEN {alias}.min_experience IS NULL THEN 0 END, {lo}) >= {lo})"
    ));
}

/// `%value%` with LIKE metacharacters escaped
pub fn like_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Predicates for a fragment plus whether the tag join is required
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conditions {
    pub conditions: Vec<Predicate>,
    pub needs_tag_join: bool,
}

impl Conditions {
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// All bound values in placeholder order
    pub fn params(&self) -> Vec<SqlValue> {
        self.conditions.iter().flat_map(Predicate::params).collect()
    }

    /// Append ` AND <predicate>` for every condition
    pub fn render_and(&self, w: &mut SqlWriter) {
        for predicate in &self.conditions {
            w.push(" AND ");
            predicate.render(w);
        }
    }
}

/// Translate a fragment into predicates.
///
/// Dimensions are emitted in a fixed order (job types, work modes,
/// experience, cities, roles, tags); empty dimensions emit nothing.
pub fn build_conditions(fragment: &FilterFragment) -> Conditions {
    let mut conditions = Vec::new();

    if !fragment.job_types.is_empty() {
        conditions.push(Predicate::NormalizedIn {
            column: "job_type",
            values: fragment
                .job_types
                .iter()
                .map(|t: &JobType| t.as_str().to_string())
                .collect(),
        });
    }

    if !fragment.work_modes.is_empty() {
        conditions.push(Predicate::NormalizedIn {
            column: "work_mode",
            values: fragment
                .work_modes
                .iter()
                .map(|m: &WorkMode| m.as_str().to_string())
                .collect(),
        });
    }

    if let Some(bucket) = fragment.experience {
        conditions.push(Predicate::Experience(bucket));
    }

    let cities = non_blank(fragment.cities);
    if !cities.is_empty() {
        conditions.push(Predicate::In {
            column: "city",
            values: cities,
        });
    }

    let roles = non_blank(fragment.roles);
    if !roles.is_empty() {
        conditions.push(Predicate::TitleContainsAny(roles));
    }

    let tags = non_blank(fragment.tags);
    let needs_tag_join = !tags.is_empty();
    if needs_tag_join {
        conditions.push(Predicate::TagNameAny(tags));
    }

    Conditions {
        conditions,
        needs_tag_join,
    }
}

fn non_blank(values: &[&str]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}
