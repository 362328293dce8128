pub mod auth;
pub mod health;
pub mod labels;
pub mod tasks;
pub mod users;

use actix_web::{error, web};

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Malformed bodies, query strings and paths become `400` envelopes.
fn extractor_configs(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err: error::PathError, _req| AppError::BadRequest(err.to_string()).into()),
    );
}

pub fn config(cfg: &mut web::ServiceConfig) {
    extractor_configs(cfg);

    cfg.service(health::home)
        .service(health::health)
        .service(
            web::scope("/auth")
                .service(auth::login)
                .service(auth::register),
        )
        .service(
            web::scope("/users")
                .wrap(AuthMiddleware)
                .service(users::get_user),
        )
        .service(
            web::scope("/labels")
                .wrap(AuthMiddleware)
                .service(labels::create_label),
        )
        .service(
            web::scope("/tasks")
                .wrap(AuthMiddleware)
                .service(tasks::get_tasks)
                .service(tasks::get_metrics)
                .service(tasks::get_task)
                .service(tasks::create_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}
