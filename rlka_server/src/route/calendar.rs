use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};
use rlka_core::{service::CalendarService, Error, ScheduleKey};
use serde::Deserialize;
use tracing::error;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryParams {
    place: Option<String>,
    street: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} ID must be defined")]
    Missing(&'static str),
    #[error("{name} ID must be an integer, got `{value}`")]
    NotAnInteger { name: &'static str, value: String },
}

fn parse_id(name: &'static str, value: Option<&str>) -> Result<u32, ValidationError> {
    let value = value.ok_or(ValidationError::Missing(name))?;
    value
        .trim()
        .parse()
        .map_err(|_| ValidationError::NotAnInteger {
            name,
            value: value.to_string(),
        })
}

impl TryFrom<&QueryParams> for ScheduleKey {
    type Error = ValidationError;

    fn try_from(value: &QueryParams) -> Result<Self, Self::Error> {
        Ok(ScheduleKey::new(
            parse_id("Place", value.place.as_deref())?,
            parse_id("Street", value.street.as_deref())?,
        ))
    }
}

fn error_response(err: Error) -> (StatusCode, String) {
    let status = match err {
        Error::Fetch(_) => StatusCode::BAD_GATEWAY,
        Error::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error!(error = %err, "calendar assembly failed");
    (status, err.to_string())
}

/// Handle calendar requests.
///
/// The `place` and `street` must be given in the query string.
pub async fn handler(
    State(service): State<Arc<CalendarService>>,
    Query(query_params): Query<QueryParams>,
) -> Result<Response, (StatusCode, String)> {
    let key = ScheduleKey::try_from(&query_params)
        .map_err(|err| (StatusCode::BAD_REQUEST, err.to_string()))?;
    let ical = service.get_ical(key).await.map_err(error_response)?;
    let response = ([(CONTENT_TYPE, "text/calendar")], ical).into_response();
    Ok(response)
}
