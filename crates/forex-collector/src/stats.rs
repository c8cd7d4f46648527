//! 수집 통계 구조체.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 적재 작업 통계
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionStats {
    /// 수신한 원본 레코드 수
    pub total: usize,
    /// 삽입 성공
    pub inserted: usize,
    /// 건너뜀 (기준일 이하, 이미 저장됨)
    pub skipped: usize,
    /// 필수 필드 파싱 실패로 버린 레코드
    pub invalid: usize,
    /// 삽입 실패 (제약 조건 위반, DB 에러)
    pub failed: usize,
    /// API 조회 실패로 적재 단계를 건너뜀
    pub fetch_failed: bool,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl CollectionStats {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 조회 실패 통계
    pub fn fetch_failed() -> Self {
        Self {
            fetch_failed: true,
            ..Self::default()
        }
    }

    /// 처리된 레코드 수 (삽입 + 건너뜀 + 무효 + 실패)
    pub fn processed(&self) -> usize {
        self.inserted + self.skipped + self.invalid + self.failed
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        if self.fetch_failed {
            tracing::warn!(operation = operation, "데이터 조회 실패, 적재 건너뜀");
            return;
        }

        tracing::info!(
            operation = operation,
            total = self.total,
            processed = self.processed(),
            inserted = self.inserted,
            skipped = self.skipped,
            invalid = self.invalid,
            failed = self.failed,
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "적재 완료"
        );
    }
}
