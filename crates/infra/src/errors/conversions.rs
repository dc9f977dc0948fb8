//! Conversions from external infrastructure errors into domain errors.

use r2d2::Error as PoolError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;
use serde_json::Error as JsonError;
use shiftclock_domain::ShiftClockError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ShiftClockError);

impl From<InfraError> for ShiftClockError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ShiftClockError> for InfraError {
    fn from(value: ShiftClockError) -> Self {
        InfraError(value)
    }
}

trait IntoShiftClockError {
    fn into_shiftclock(self) -> ShiftClockError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → ShiftClockError */
/* -------------------------------------------------------------------------- */

impl IntoShiftClockError for SqlError {
    fn into_shiftclock(self) -> ShiftClockError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        ShiftClockError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        ShiftClockError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067) => {
                        ShiftClockError::Database("unique constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 275) => {
                        ShiftClockError::Database("check constraint violation".into())
                    }
                    (ErrorCode::NotADatabase, _) => {
                        ShiftClockError::Database("file is not a database".into())
                    }
                    _ => ShiftClockError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => {
                ShiftClockError::NotFound("no rows returned by query".into())
            }
            RE::FromSqlConversionFailure(_, _, cause) => {
                ShiftClockError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, name, ty) => {
                ShiftClockError::Database(format!("invalid column type for {name}: {ty}"))
            }
            RE::InvalidPath(path) => ShiftClockError::Config(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => ShiftClockError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_shiftclock())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → ShiftClockError */
/* -------------------------------------------------------------------------- */

impl From<PoolError> for InfraError {
    fn from(value: PoolError) -> Self {
        InfraError(ShiftClockError::Database(format!("connection pool: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ShiftClockError */
/* -------------------------------------------------------------------------- */

impl IntoShiftClockError for HttpError {
    fn into_shiftclock(self) -> ShiftClockError {
        if self.is_timeout() {
            return ShiftClockError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return ShiftClockError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return ShiftClockError::Network(format!("malformed HTTP response body: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                404 => ShiftClockError::NotFound(message),
                429 => ShiftClockError::Network(message),
                400..=499 => ShiftClockError::InvalidInput(message),
                _ => ShiftClockError::Network(message),
            };
        }

        ShiftClockError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_shiftclock())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → ShiftClockError */
/* -------------------------------------------------------------------------- */

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(ShiftClockError::Internal(format!("JSON serialization failed: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use rusqlite::ffi::{Error as FfiError, ErrorCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn sqlite_busy_maps_to_database_error() {
        let err = SqlError::SqliteFailure(
            FfiError { code: ErrorCode::DatabaseBusy, extended_code: 5 },
            Some("database is locked".into()),
        );

        let mapped: ShiftClockError = InfraError::from(err).into();
        match mapped {
            ShiftClockError::Database(msg) => assert!(msg.contains("busy")),
            other => panic!("expected database error, got {:?}", other),
        }
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        let mapped: ShiftClockError = InfraError::from(SqlError::QueryReturnedNoRows).into();
        assert!(matches!(mapped, ShiftClockError::NotFound(_)));
    }

    #[test]
    fn json_errors_are_internal() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let mapped: ShiftClockError = InfraError::from(err).into();
        assert!(matches!(mapped, ShiftClockError::Internal(_)));
    }

    #[tokio::test]
    async fn http_status_400_maps_to_invalid_input() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::BAD_REQUEST))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error =
            client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: ShiftClockError = InfraError::from(error).into();
        match mapped {
            ShiftClockError::InvalidInput(msg) => assert!(msg.contains("400")),
            other => panic!("expected invalid input, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn http_status_503_maps_to_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::SERVICE_UNAVAILABLE))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error =
            client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: ShiftClockError = InfraError::from(error).into();
        assert!(matches!(mapped, ShiftClockError::Network(_)));
    }
}
