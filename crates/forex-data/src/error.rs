//! 데이터 모듈 오류 타입.

use forex_core::CoreError;
use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 데이터베이스 연결 오류
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    /// 쿼리 실행 오류
    #[error("Query error: {0}")]
    QueryError(String),

    /// 중복 레코드
    #[error("Duplicate record: {0}")]
    DuplicateError(String),

    /// HTTP 요청 오류 (네트워크, 타임아웃)
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// API가 성공이 아닌 상태 코드를 반환
    #[error("API returned status {status}: {body}")]
    StatusError { status: u16, body: String },

    /// 응답 본문 디코딩 오류
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// 설정 오류
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<sqlx::Error> for DataError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().unwrap_or_default();
                if code == "23505" {
                    // PostgreSQL 고유 제약 조건 위반
                    DataError::DuplicateError(db_err.message().to_string())
                } else {
                    DataError::QueryError(db_err.message().to_string())
                }
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                DataError::ConnectionError(err.to_string())
            }
            _ => DataError::QueryError(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DataError::SerializationError(err.to_string())
        } else {
            DataError::FetchError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::SerializationError(err.to_string())
    }
}

impl From<DataError> for CoreError {
    fn from(err: DataError) -> Self {
        CoreError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = DataError::StatusError {
            status: 403,
            body: "Forbidden".to_string(),
        };
        assert_eq!(err.to_string(), "API returned status 403: Forbidden");
    }

    #[test]
    fn test_into_core_error() {
        let core: CoreError = DataError::QueryError("relation does not exist".into()).into();
        assert!(matches!(core, CoreError::Storage(msg) if msg.contains("relation")));
    }
}
