use axum::{http::StatusCode, Json};
use chrono::NaiveDate;
use serde::Serialize;
use std::num::ParseFloatError;
use thiserror::Error;

/// How a rejected analysis is surfaced next to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("End Date must be later than Start Date.")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Please provide exactly {expected} values to match the number of weeks in the date range.")]
    CountMismatch { expected: usize, provided: usize },

    #[error("Ensure Actual CPA values are numbers, separated by commas. Error details: could not parse {token:?}: {source}")]
    Parse {
        token: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("Ensure Actual CPA values are numbers, separated by commas. Error details: {token:?} is not a finite number")]
    NonFinite { token: String },

    #[error("Ensure Actual CPA values are numbers, separated by commas. Error details: {token:?} is outside the supported range of +/-{limit:e}")]
    OutOfRange { token: String, limit: f64 },

    #[error("The week containing {date} ends past the last supported date.")]
    DateOutOfRange { date: NaiveDate },

    #[error("{field} must be a date in YYYY-MM-DD format (got {value:?}).")]
    InvalidDate { field: &'static str, value: String },

    #[error("Target CPA must be a finite number within the supported range (got {value:?}).")]
    InvalidTarget { value: String },
}

impl AnalysisError {
    pub fn severity(&self) -> Severity {
        match self {
            Self::CountMismatch { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidDateRange { .. } => "invalid_date_range",
            Self::CountMismatch { .. } => "count_mismatch",
            Self::Parse { .. } | Self::NonFinite { .. } | Self::OutOfRange { .. } => "parse_error",
            Self::InvalidDate { .. } | Self::DateOutOfRange { .. } => "invalid_date",
            Self::InvalidTarget { .. } => "invalid_target",
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    kind: &'a str,
    message: &'a str,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            kind: "bad_request",
            message: message.into(),
        }
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = ErrorBody {
            kind: self.kind,
            message: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_mismatch_is_a_warning_naming_expected_count() {
        let err = AnalysisError::CountMismatch {
            expected: 3,
            provided: 4,
        };
        assert_eq!(err.severity(), Severity::Warning);
        assert_eq!(err.kind(), "count_mismatch");
        assert!(err.to_string().contains("exactly 3 values"));
    }

    #[test]
    fn analysis_errors_map_to_unprocessable_entity() {
        let err = AnalysisError::NonFinite {
            token: "nan".to_string(),
        };
        assert_eq!(err.severity(), Severity::Error);

        let app: AppError = err.into();
        assert_eq!(app.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(app.kind, "parse_error");
        assert!(app.message.contains("\"nan\""));
    }
}
