//! 외환 수집기의 핵심 에러 타입.

use thiserror::Error;

/// 핵심 도메인 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 필수 날짜 필드 파싱 실패
    #[error("잘못된 날짜 '{value}': {reason}")]
    InvalidDate { value: String, reason: String },

    /// 필수 숫자 필드 파싱 실패
    #[error("잘못된 숫자 필드 {field} '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    /// 타이틀 정규식 컴파일 실패
    #[error("잘못된 정규식 패턴: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// 저장소 에러 (삽입/조회 실패)
    #[error("저장소 에러: {0}")]
    Storage(String),
}

impl CoreError {
    /// 날짜 파싱 에러를 생성합니다.
    pub fn invalid_date(value: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidDate {
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

/// 핵심 작업을 위한 Result 타입.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_value() {
        let err = CoreError::invalid_date("2024-13-01", "month out of range");
        assert!(matches!(err, CoreError::InvalidDate { .. }));
        assert!(err.to_string().contains("2024-13-01"));

        let err = CoreError::InvalidNumber {
            field: "cotizacion",
            value: "n/a".into(),
        };
        assert!(err.to_string().contains("cotizacion"));
    }

    #[test]
    fn test_regex_error_converts() {
        let err: CoreError = regex::Regex::new("([A-Z").unwrap_err().into();
        assert!(matches!(err, CoreError::InvalidPattern(_)));
    }
}
