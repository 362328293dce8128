use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use super::labels::{decode_labels, encode_labels};
use super::query::{build_task_list, build_task_update, TASK_COLUMNS};
use crate::error::AppError;
use crate::validation::{rules, BodyRules, ValidationField};

/// Represents the status of a task.
/// Stored as text, constrained by a `CHECK` on the `tasks` table.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Task has not been started.
    Pending,
    /// Task is finished.
    Completed,
    /// Task is being worked on.
    InProgress,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::Completed,
        TaskStatus::InProgress,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
            TaskStatus::InProgress => "in-progress",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown task status: {}", s)))
    }
}

/// A task as returned by the API.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i32,
    /// Owner of the task.
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub status: TaskStatus,
    pub labels: Vec<String>,
}

/// Raw `tasks` row; `status` and `labels` are still in their stored text form.
#[derive(Debug, FromRow)]
pub(crate) struct TaskRow {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub status: String,
    pub labels: String,
}

impl TryFrom<TaskRow> for Task {
    type Error = AppError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let status = row.status.parse().map_err(|_| {
            AppError::InternalServerError(format!("Stored task has unknown status {}", row.status))
        })?;
        Ok(Task {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            due_date: row.due_date,
            created_at: row.created_at,
            status,
            labels: decode_labels(&row.labels)?,
        })
    }
}

/// Body of `POST /tasks`.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub status: TaskStatus,
    pub labels: Vec<String>,
}

impl BodyRules for TaskInput {
    const RULES: &'static [ValidationField] = rules::CREATE_TASK;
}

/// Body of `PUT /tasks`: the task id plus the fields to change.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    pub id: i32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<TaskStatus>,
    pub labels: Option<Vec<String>>,
}

impl BodyRules for TaskPatch {
    const RULES: &'static [ValidationField] = rules::UPDATE_TASK;
}

/// Body of `DELETE /tasks`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct TaskRef {
    pub id: i32,
}

impl BodyRules for TaskRef {
    const RULES: &'static [ValidationField] = rules::DELETE_TASK;
}

/// Columns a listing can be ordered by.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TaskOrderField {
    #[serde(rename = "createdAt")]
    CreatedAt,
    #[serde(rename = "dueDate")]
    DueDate,
}

impl TaskOrderField {
    pub fn column(self) -> &'static str {
        match self {
            TaskOrderField::CreatedAt => "created_at",
            TaskOrderField::DueDate => "due_date",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

/// Optional narrowing criteria for a listing, AND-combined.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    /// Substring of the title.
    pub title: Option<String>,
    /// Label texts that must all appear, in order, in the encoded label list.
    pub labels: Vec<String>,
    /// Accepted statuses; empty means any.
    pub statuses: Vec<TaskStatus>,
    pub due_date: Option<NaiveDate>,
    pub order_by: Option<TaskOrderField>,
    pub order_direction: Option<OrderDirection>,
}

/// Largest page size a listing may ask for.
pub const MAX_PAGE_LIMIT: u32 = 1000;

/// 1-indexed page of `limit` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Validate)]
pub struct Pagination {
    /// Rows per page, at most [`MAX_PAGE_LIMIT`].
    #[validate(range(min = 1, max = 1000))]
    pub limit: u32,
    /// 1-indexed page number.
    #[validate(range(min = 1))]
    pub page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { limit: 10, page: 1 }
    }
}

impl Pagination {
    /// Rows skipped before this page. Fails when the page lies beyond any addressable row.
    pub fn offset(&self) -> Result<i64, AppError> {
        (i64::from(self.page) - 1)
            .checked_mul(i64::from(self.limit))
            .ok_or_else(|| AppError::BadRequest("Page is out of range".into()))
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        let limit = i64::from(self.limit);
        (total + limit - 1) / limit
    }
}

/// Query string of `GET /tasks`. `label` and `status` are comma-separated lists.
#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    pub title: Option<String>,
    pub label: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub order_by: Option<TaskOrderField>,
    pub order_direction: Option<OrderDirection>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

fn split_list(list: Option<&str>) -> impl Iterator<Item = &str> {
    list.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
}

impl TaskQuery {
    /// Splits the query string into a filter and a validated pagination.
    pub fn into_parts(self) -> Result<(TaskFilter, Pagination), AppError> {
        let defaults = Pagination::default();
        let pagination = Pagination {
            limit: self.limit.unwrap_or(defaults.limit),
            page: self.page.unwrap_or(defaults.page),
        };
        pagination.validate()?;
        pagination.offset()?;

        let statuses = split_list(self.status.as_deref())
            .map(TaskStatus::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        let labels = split_list(self.label.as_deref()).map(String::from).collect();

        let filter = TaskFilter {
            title: self.title.filter(|title| !title.is_empty()),
            labels,
            statuses,
            due_date: self.due_date,
            order_by: self.order_by,
            order_direction: self.order_direction,
        };
        Ok((filter, pagination))
    }
}

/// One page of a listing.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskPage {
    pub tasks: Vec<Task>,
    pub total_pages: i64,
}

/// Task counts per status for one user.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskMetrics {
    pub total: i64,
    pub pending: i64,
    pub completed: i64,
    pub in_progress: i64,
}

impl TaskMetrics {
    /// Folds `(status, count)` rows; unknown statuses still count towards `total`.
    pub fn from_counts<'a>(rows: impl IntoIterator<Item = (&'a str, i64)>) -> Self {
        rows.into_iter()
            .fold(TaskMetrics::default(), |mut metrics, (status, count)| {
                metrics.total += count;
                match status.parse() {
                    Ok(TaskStatus::Pending) => metrics.pending = count,
                    Ok(TaskStatus::Completed) => metrics.completed = count,
                    Ok(TaskStatus::InProgress) => metrics.in_progress = count,
                    Err(_) => log::warn!("Ignoring unknown task status in metrics: {}", status),
                }
                metrics
            })
    }
}

impl Task {
    /// Inserts a task owned by `user_id` and returns it as stored.
    pub async fn create(pool: &PgPool, user_id: i32, input: TaskInput) -> Result<Task, AppError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "INSERT INTO tasks (user_id, title, description, due_date, status, labels) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(user_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.due_date)
        .bind(input.status.as_str())
        .bind(encode_labels(&input.labels)?)
        .fetch_one(pool)
        .await?;

        log::info!("User {} created task {}", user_id, row.id);
        row.try_into()
    }

    /// Fetches a task if it exists and is owned by `user_id`.
    pub async fn find_by_id(pool: &PgPool, user_id: i32, task_id: i32) -> Result<Option<Task>, AppError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {} FROM tasks WHERE id = $1 AND user_id = $2",
            TASK_COLUMNS
        ))
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        row.map(Task::try_from).transpose()
    }

    /// Runs the filtered page query and its count query.
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: i32,
        filter: &TaskFilter,
        pagination: &Pagination,
    ) -> Result<TaskPage, AppError> {
        let query = build_task_list(user_id, filter, pagination)?;
        log::debug!("Task listing: {} / {}", query.rows.sql, query.count.sql);

        let rows = sqlx::query_as_with::<_, TaskRow, _>(&query.rows.sql, query.rows.arguments())
            .fetch_all(pool)
            .await?;
        let total: i64 = sqlx::query_scalar_with(&query.count.sql, query.count.arguments())
            .fetch_one(pool)
            .await?;

        let tasks = rows
            .into_iter()
            .map(Task::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TaskPage {
            tasks,
            total_pages: pagination.total_pages(total),
        })
    }

    /// Applies `patch` to a task owned by `user_id`.
    pub async fn update(pool: &PgPool, user_id: i32, patch: &TaskPatch) -> Result<(), AppError> {
        let query = build_task_update(user_id, patch)?
            .ok_or_else(|| AppError::BadRequest("No fields to update".into()))?;

        let result = sqlx::query_with(&query.sql, query.arguments())
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Task not found".into()));
        }
        Ok(())
    }

    /// Deletes a task owned by `user_id`.
    pub async fn delete(pool: &PgPool, user_id: i32, task_id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(task_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Task not found".into()));
        }
        Ok(())
    }

    pub async fn metrics(pool: &PgPool, user_id: i32) -> Result<TaskMetrics, AppError> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) AS count FROM tasks WHERE user_id = $1 GROUP BY status",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(TaskMetrics::from_counts(
            rows.iter().map(|(status, count)| (status.as_str(), *count)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(labels: &str) -> TaskRow {
        TaskRow {
            id: 1,
            user_id: 1,
            title: "Task 1".to_string(),
            description: "Description 1".to_string(),
            due_date: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
            created_at: Utc::now(),
            status: "pending".to_string(),
            labels: labels.to_string(),
        }
    }

    #[test]
    fn test_row_decodes_labels() {
        let task = Task::try_from(row(r#"["label1","Personal"]"#)).unwrap();
        assert_eq!(task.labels, vec!["label1", "Personal"]);
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[test]
    fn test_row_with_corrupt_labels_is_an_error() {
        assert!(Task::try_from(row("label1")).is_err());
    }

    #[test]
    fn test_status_round_trip() {
        for status in TaskStatus::ALL {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
            assert_eq!(
                serde_json::to_value(status).unwrap(),
                serde_json::Value::String(status.to_string())
            );
        }
        assert!("done".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let task = Task::try_from(row(r#"["label1"]"#)).unwrap();
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["userId"], 1);
        assert_eq!(value["dueDate"], "2024-12-01");
        assert!(value["createdAt"].is_string());
    }

    #[test]
    fn test_query_into_parts() {
        let query = TaskQuery {
            label: Some("label1, Personal".to_string()),
            status: Some("pending,in-progress".to_string()),
            order_by: Some(TaskOrderField::DueDate),
            page: Some(2),
            ..Default::default()
        };

        let (filter, pagination) = query.into_parts().unwrap();

        assert_eq!(filter.labels, vec!["label1", "Personal"]);
        assert_eq!(filter.statuses, vec![TaskStatus::Pending, TaskStatus::InProgress]);
        assert_eq!(filter.order_by, Some(TaskOrderField::DueDate));
        assert_eq!(pagination, Pagination { limit: 10, page: 2 });
    }

    #[test]
    fn test_query_rejects_bad_pagination_and_status() {
        let zero_page = TaskQuery {
            page: Some(0),
            ..Default::default()
        };
        assert!(matches!(zero_page.into_parts(), Err(AppError::BadRequest(_))));

        let zero_limit = TaskQuery {
            limit: Some(0),
            ..Default::default()
        };
        assert!(matches!(zero_limit.into_parts(), Err(AppError::BadRequest(_))));

        let bad_status = TaskQuery {
            status: Some("pending,done".to_string()),
            ..Default::default()
        };
        assert!(matches!(bad_status.into_parts(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_query_rejects_oversized_pagination() {
        let huge = TaskQuery {
            page: Some(u32::MAX),
            limit: Some(u32::MAX),
            ..Default::default()
        };
        assert!(matches!(huge.into_parts(), Err(AppError::BadRequest(_))));

        let last_page = TaskQuery {
            page: Some(u32::MAX),
            limit: Some(MAX_PAGE_LIMIT),
            ..Default::default()
        };
        let (_, pagination) = last_page.into_parts().unwrap();
        assert_eq!(
            pagination.offset().unwrap(),
            (i64::from(u32::MAX) - 1) * i64::from(MAX_PAGE_LIMIT)
        );
    }

    #[test]
    fn test_offset_overflow_is_a_bad_request() {
        let pagination = Pagination {
            limit: u32::MAX,
            page: u32::MAX,
        };
        assert!(matches!(pagination.offset(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_pagination_math() {
        let pagination = Pagination { limit: 10, page: 3 };
        assert_eq!(pagination.offset().unwrap(), 20);
        assert_eq!(pagination.total_pages(0), 0);
        assert_eq!(pagination.total_pages(1), 1);
        assert_eq!(pagination.total_pages(10), 1);
        assert_eq!(pagination.total_pages(11), 2);
    }

    #[test]
    fn test_metrics_fold() {
        let metrics = TaskMetrics::from_counts([("pending", 3), ("completed", 5)]);
        assert_eq!(
            metrics,
            TaskMetrics {
                total: 8,
                pending: 3,
                completed: 5,
                in_progress: 0
            }
        );
        assert_eq!(
            serde_json::to_value(&metrics).unwrap()["inProgress"],
            serde_json::json!(0)
        );
    }
}
