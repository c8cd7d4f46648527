//! 에러 타입 정의.

use forex_core::CoreError;
use forex_data::DataError;
use thiserror::Error;

/// Collector 에러 타입
///
/// 이 에러는 작업 전체를 중단시키는 경우에만 사용됩니다.
/// 레코드/행 단위 실패는 통계에 집계되고 로그로만 남습니다.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// 설정 에러 (필수 환경변수 누락, 잘못된 값)
    #[error("Configuration error: {0}")]
    Config(String),

    /// 데이터 계층 에러 (DB 연결, HTTP 클라이언트 생성)
    #[error(transparent)]
    Data(#[from] DataError),

    /// 저장소 에러 (동기화 기준일 조회 실패 등)
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl CollectorError {
    /// 누락된 환경변수 에러를 생성합니다.
    pub fn missing_var(key: &str) -> Self {
        Self::Config(format!("{} 환경변수가 설정되지 않았습니다", key))
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;
