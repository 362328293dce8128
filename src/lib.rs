#![doc = "The `todo_api` library crate."]
#![doc = ""]
#![doc = "Domain models, the request validation engine, the SQL query builder, the response"]
#![doc = "envelope, authentication and routing for the to-do API. The binary (`main.rs`) wires"]
#![doc = "these into an `HttpServer`."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod response;
pub mod routes;
pub mod validation;
