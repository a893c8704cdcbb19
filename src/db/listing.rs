//! SQL assembly for the approved-job listing and the per-category counts.

use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::Postgres;

use crate::db::models::JOB_COLUMNS;
use crate::filters::{build_conditions, Category, Conditions, FilterFragment, SqlValue, SqlWriter};
use crate::model::JobStatus;

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

const JOB_ALIAS: &str = "j";
const TAG_ALIAS: &str = "jt";

/// Clamp a caller-supplied limit to `[1, MAX_LIMIT]`, defaulting when absent
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Parse the raw `limit` query value; unparseable text falls back to the default
pub fn parse_limit(raw: Option<&str>) -> i64 {
    let parsed = raw.and_then(|s| s.trim().parse::<i64>().ok());
    clamp_limit(parsed)
}

/// SQL text plus bound values in placeholder order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedQuery {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl RenderedQuery {
    /// Build a `query_as` with every value bound
    pub fn query_as<'q, O>(&'q self) -> QueryAs<'q, Postgres, O, PgArguments>
    where
        O: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow>,
    {
        let mut query = sqlx::query_as::<_, O>(&self.sql);
        for value in &self.params {
            query = match value {
                SqlValue::Text(text) => query.bind(text.as_str()),
                SqlValue::BigInt(n) => query.bind(*n),
            };
        }
        query
    }
}

/// Parameters of `GET /jobs`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub limit: i64,
    pub category: Option<Category>,
    /// Authenticated candidate; jobs they applied to are excluded
    pub viewer: Option<i64>,
}

impl ListingQuery {
    pub fn new(limit: Option<i64>, category: Option<&str>, viewer: Option<i64>) -> Self {
        Self {
            limit: clamp_limit(limit),
            category: category.and_then(Category::parse),
            viewer,
        }
    }

    pub fn conditions(&self) -> Conditions {
        self.category
            .map(|category| build_conditions(&category.fragment()))
            .unwrap_or_default()
    }

    /// Render the listing statement.
    ///
    /// The applications join matches at most one row per job (unique on
    /// `(job_id, user_id)`) and is filtered to misses, so only the tag join can
    /// fan rows out; when it is present the select is `DISTINCT`.
    pub fn render(&self) -> RenderedQuery {
        let conditions = self.conditions();
        let mut w = SqlWriter::new(JOB_ALIAS, TAG_ALIAS);

        w.push(if conditions.needs_tag_join {
            "SELECT DISTINCT "
        } else {
            "SELECT "
        });
        push_job_columns(&mut w);
        w.push(" FROM jobs j");

        if let Some(viewer) = self.viewer {
            w.push(" LEFT JOIN applications a ON a.job_id = j.id AND a.user_id = ");
            w.bind(viewer);
        }
        if conditions.needs_tag_join {
            push_tag_join(&mut w);
        }

        w.push(" WHERE j.status = ");
        w.bind(JobStatus::Approved.as_str());
        if self.viewer.is_some() {
            w.push(" AND a.id IS NULL");
        }
        conditions.render_and(&mut w);

        w.push(" ORDER BY j.created_at DESC, j.id DESC LIMIT ");
        w.bind(self.limit);

        let (sql, params) = w.finish();
        RenderedQuery { sql, params }
    }
}

/// Render the approved-job count for one fragment.
///
/// `COUNT(DISTINCT j.id)` when the tag join is needed, plain `COUNT(*)` otherwise.
pub fn count_query(fragment: &FilterFragment) -> RenderedQuery {
    let conditions = build_conditions(fragment);
    let mut w = SqlWriter::new(JOB_ALIAS, TAG_ALIAS);

    w.push(if conditions.needs_tag_join {
        "SELECT COUNT(DISTINCT j.id) AS job_count FROM jobs j"
    } else {
        "SELECT COUNT(*) AS job_count FROM jobs j"
    });
    if conditions.needs_tag_join {
        push_tag_join(&mut w);
    }

    w.push(" WHERE j.status = ");
    w.bind(JobStatus::Approved.as_str());
    conditions.render_and(&mut w);

    let (sql, params) = w.finish();
    RenderedQuery { sql, params }
}

fn push_job_columns(w: &mut SqlWriter) {
    for (i, column) in JOB_COLUMNS.iter().enumerate() {
        if i > 0 {
            w.push(", ");
        }
        w.job_column(column);
    }
}

fn push_tag_join(w: &mut SqlWriter) {
    w.push(" LEFT JOIN job_tag_map jtm ON jtm.job_id = j.id LEFT JOIN job_tags jt ON jt.id = jtm.tag_id");
}
