use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{Task, TaskInput, TaskPatch, TaskQuery, TaskRef},
    response::{ApiResponse, SuccessKind},
    validation::ValidatedJson,
};
use actix_web::{delete, get, post, put, web, Responder};
use sqlx::PgPool;

/// Retrieves one page of the authenticated user's tasks.
///
/// ## Query Parameters:
/// - `title` (optional): substring of the task title.
/// - `label` (optional): comma-separated labels that must all be present.
/// - `status` (optional): comma-separated statuses, any of which may match.
/// - `dueDate` (optional): exact due date, `YYYY-MM-DD`.
/// - `orderBy` (optional): `createdAt` or `dueDate`; `orderDirection` is `ASC` (default) or `DESC`.
/// - `page`, `limit` (optional): 1-indexed page of `limit` tasks, defaults 1 and 10.
///
/// ## Responses:
/// - `200 OK`: `{ tasks, totalPages }`.
/// - `400 Bad Request`: unknown status, non-positive page or limit, malformed query.
/// - `401 Unauthorized`: missing or invalid token.
#[get("")]
pub async fn get_tasks(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
    query_params: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let (filter, pagination) = query_params.into_inner().into_parts()?;
    let page = Task::find_by_user_id(&pool, user_id.0, &filter, &pagination).await?;

    Ok(ApiResponse::success(SuccessKind::Ok).data(page))
}

/// Counts the authenticated user's tasks per status.
#[get("/metrics")]
pub async fn get_metrics(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let metrics = Task::metrics(&pool, user_id.0).await?;
    Ok(ApiResponse::success(SuccessKind::Ok).data(metrics))
}

/// Retrieves a specific task by its ID.
///
/// Tasks owned by someone else are reported as `404 Not Found`.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let task = Task::find_by_id(&pool, user_id.0, task_id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    Ok(ApiResponse::success(SuccessKind::Ok).data(task))
}

/// Creates a new task for the authenticated user.
///
/// The body is validated and masked before it reaches this handler; the title
/// arrives pascal-cased.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
    task_data: ValidatedJson<TaskInput>,
) -> Result<impl Responder, AppError> {
    let task = Task::create(&pool, user_id.0, task_data.into_inner()).await?;
    Ok(ApiResponse::success(SuccessKind::Created).data(task))
}

/// Updates the fields present in the body of a task the user owns.
#[put("")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
    patch: ValidatedJson<TaskPatch>,
) -> Result<impl Responder, AppError> {
    Task::update(&pool, user_id.0, &patch).await?;
    log::info!("User {} updated task {}", user_id.0, patch.id);

    Ok(ApiResponse::success(SuccessKind::NoContent))
}

/// Deletes a task the user owns.
#[delete("")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
    task: ValidatedJson<TaskRef>,
) -> Result<impl Responder, AppError> {
    Task::delete(&pool, user_id.0, task.id).await?;
    log::info!("User {} deleted task {}", user_id.0, task.id);

    Ok(ApiResponse::success(SuccessKind::NoContent))
}
