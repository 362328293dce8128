//! SQL assembly for the filtered task listing and partial task updates.
//!
//! Every user-supplied value travels as a bind parameter; only column names and
//! sort keywords from closed enums are spliced into the SQL text.

use chrono::NaiveDate;
use sqlx::postgres::PgArguments;
use sqlx::Arguments;

use super::labels::encode_labels;
use super::task::{Pagination, TaskFilter, TaskPatch};
use crate::error::AppError;

pub(crate) const TASK_COLUMNS: &str =
    "id, user_id, title, description, due_date, created_at, status, labels";

/// A value bound to a positional `$n` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// `INTEGER`, e.g. user and task ids.
    Int(i32),
    /// `BIGINT`, used for `LIMIT` and `OFFSET`.
    BigInt(i64),
    /// `TEXT`, including `LIKE` patterns and encoded label lists.
    Text(String),
    /// `DATE`.
    Date(NaiveDate),
}

/// SQL text with its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    /// Statement using `$1..$n` placeholders.
    pub sql: String,
    /// Values for the placeholders, in order.
    pub params: Vec<SqlParam>,
}

impl SqlQuery {
    pub fn arguments(&self) -> PgArguments {
        let mut args = PgArguments::default();
        for param in &self.params {
            match param {
                SqlParam::Int(value) => args.add(*value),
                SqlParam::BigInt(value) => args.add(*value),
                SqlParam::Text(value) => args.add(value.clone()),
                SqlParam::Date(value) => args.add(*value),
            }
        }
        args
    }
}

/// The page query and the matching count query of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskListQuery {
    /// Selects the requested page, ordered if asked to.
    pub rows: SqlQuery,
    /// Counts every matching row; shares the `WHERE` parameters of `rows`.
    pub count: SqlQuery,
}

/// Accumulates conditions (or `SET` assignments) with their parameters.
struct Conditions {
    /// Rendered fragments such as `title LIKE $2`.
    clauses: Vec<String>,
    /// Parameters bound so far; `$n` is `params[n - 1]`.
    params: Vec<SqlParam>,
}

impl Conditions {
    fn new() -> Self {
        Self {
            clauses: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Pushes a parameter and returns its placeholder.
    fn bind(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("${}", self.params.len())
    }

    fn push(&mut self, column: &str, op: &str, param: SqlParam) {
        let placeholder = self.bind(param);
        self.clauses.push(format!("{} {} {}", column, op, placeholder));
    }

    fn sql(&self) -> String {
        self.clauses.join(" AND ")
    }
}

/// Escapes `LIKE` metacharacters so `text` only matches itself under `ESCAPE '\'`.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Builds the listing for `user_id`, narrowed by `filter`, one page at a time.
///
/// The title matches as a literal substring. Labels match when all requested label
/// texts appear, in the given order, in the stored label list.
pub fn build_task_list(
    user_id: i32,
    filter: &TaskFilter,
    pagination: &Pagination,
) -> Result<TaskListQuery, AppError> {
    let mut conditions = Conditions::new();
    conditions.push("user_id", "=", SqlParam::Int(user_id));

    if let Some(title) = &filter.title {
        let placeholder = conditions.bind(SqlParam::Text(format!("%{}%", escape_like(title))));
        conditions
            .clauses
            .push(format!("title LIKE {} ESCAPE '\\'", placeholder));
    }
    if let Some(due_date) = filter.due_date {
        conditions.push("due_date", "=", SqlParam::Date(due_date));
    }
    if !filter.statuses.is_empty() {
        let placeholders = filter
            .statuses
            .iter()
            .map(|status| conditions.bind(SqlParam::Text(status.as_str().to_string())))
            .collect::<Vec<_>>()
            .join(", ");
        conditions
            .clauses
            .push(format!("status IN ({})", placeholders));
    }
    if !filter.labels.is_empty() {
        let pattern = format!("%{}%", filter.labels.join("%"));
        conditions.push("labels", "LIKE", SqlParam::Text(pattern));
    }

    let where_sql = conditions.sql();
    let count = SqlQuery {
        sql: format!("SELECT COUNT(*) FROM tasks WHERE {}", where_sql),
        params: conditions.params.clone(),
    };

    let mut sql = format!("SELECT {} FROM tasks WHERE {}", TASK_COLUMNS, where_sql);
    if let Some(order_by) = filter.order_by {
        let direction = filter.order_direction.unwrap_or_default();
        sql.push_str(&format!(" ORDER BY {} {}", order_by.column(), direction.as_sql()));
    }

    let mut params = conditions.params;
    params.push(SqlParam::BigInt(i64::from(pagination.limit)));
    params.push(SqlParam::BigInt(pagination.offset()?));
    sql.push_str(&format!(" LIMIT ${} OFFSET ${}", params.len() - 1, params.len()));

    Ok(TaskListQuery {
        rows: SqlQuery { sql, params },
        count,
    })
}

/// Builds an `UPDATE` for the fields present in `patch`, scoped to the owner.
/// Returns `None` when the patch carries nothing to change.
pub fn build_task_update(user_id: i32, patch: &TaskPatch) -> Result<Option<SqlQuery>, AppError> {
    let mut sets = Conditions::new();

    if let Some(title) = &patch.title {
        sets.push("title", "=", SqlParam::Text(title.clone()));
    }
    if let Some(description) = &patch.description {
        sets.push("description", "=", SqlParam::Text(description.clone()));
    }
    if let Some(due_date) = patch.due_date {
        sets.push("due_date", "=", SqlParam::Date(due_date));
    }
    if let Some(status) = patch.status {
        sets.push("status", "=", SqlParam::Text(status.as_str().to_string()));
    }
    if let Some(labels) = &patch.labels {
        sets.push("labels", "=", SqlParam::Text(encode_labels(labels)?));
    }

    if sets.clauses.is_empty() {
        return Ok(None);
    }

    let assignments = sets.clauses.join(", ");
    let id = sets.bind(SqlParam::Int(patch.id));
    let owner = sets.bind(SqlParam::Int(user_id));

    Ok(Some(SqlQuery {
        sql: format!(
            "UPDATE tasks SET {} WHERE id = {} AND user_id = {}",
            assignments, id, owner
        ),
        params: sets.params,
    }))
}
