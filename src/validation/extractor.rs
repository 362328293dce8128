use actix_web::{dev::Payload, web, Error as ActixError, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::ops::Deref;

use super::{validate_record, ValidationField};
use crate::error::AppError;

/// Binds a request body type to the rule set it must satisfy.
pub trait BodyRules {
    const RULES: &'static [ValidationField];
}

/// Extracts a JSON body, runs `T::RULES` over it and deserializes the masked record.
///
/// Validation failures are rejected with an `AppError::BadRequest` carrying the message of
/// the first invalid field, before the handler runs. A record that validates but does not
/// fit `T` (e.g. `labels` given as an object) is also a `BadRequest`.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: BodyRules + DeserializeOwned + 'static,
{
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Json::<Map<String, Value>>::from_request(req, payload);
        Box::pin(async move {
            let web::Json(record) = body.await?;
            let record = validate_record(T::RULES, &record).into_record()?;
            let value = serde_json::from_value(Value::Object(record))
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            Ok(ValidatedJson(value))
        })
    }
}
