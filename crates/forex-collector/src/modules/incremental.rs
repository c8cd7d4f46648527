//! 증분 적재 알고리즘.
//!
//! 모든 적재 작업이 공유합니다. 기준일은 삽입 전에 한 번만 읽고
//! 배치 도중 다시 읽지 않습니다.

use std::time::Instant;

use chrono::NaiveDate;
use forex_core::{ForexTable, QuoteNormalizer, QuoteStore};

use crate::CollectionStats;

/// 테이블의 최대 날짜를 기준일로 읽습니다.
///
/// 조회 실패는 로그만 남기고 "기준일 없음"으로 취급합니다.
pub async fn read_cutoff<S>(store: &S) -> Option<NaiveDate>
where
    S: ForexTable + ?Sized,
{
    match store.last_date().await {
        Ok(Some(last)) => {
            tracing::info!(table = store.table(), last_date = %last, "기준일 조회 완료");
            Some(last)
        }
        Ok(None) => {
            tracing::info!(table = store.table(), "빈 테이블, 모든 레코드 적재");
            None
        }
        Err(e) => {
            tracing::warn!(
                table = store.table(),
                error = %e,
                "기준일 조회 실패, 기준일 없이 진행"
            );
            None
        }
    }
}

/// API 조회 결과를 적재 배치로 변환합니다.
///
/// 조회 실패(네트워크, 상태 코드, 본문 형식)는 로그만 남기고 None을 반환합니다.
/// 호출자는 None이면 DB에 접근하지 않고 종료합니다.
pub fn fetched_batch<T>(source: &str, result: forex_data::Result<Vec<T>>) -> Option<Vec<T>> {
    match result {
        Ok(records) => {
            tracing::info!(source = source, count = records.len(), "API 조회 완료");
            Some(records)
        }
        Err(e) => {
            tracing::error!(source = source, error = %e, "API 조회 실패");
            None
        }
    }
}

/// 원본 레코드 배치를 정규화하고 기준일 이후 레코드만 삽입합니다.
pub async fn load_quotes<N, S>(
    normalizer: &N,
    records: &[N::Raw],
    store: &S,
    cutoff: Option<NaiveDate>,
) -> CollectionStats
where
    N: QuoteNormalizer,
    S: QuoteStore + ?Sized,
{
    let start = Instant::now();
    let mut stats = CollectionStats::new();
    stats.total = records.len();

    for raw in records {
        let quote = match normalizer.normalize(raw) {
            Ok(quote) => quote,
            Err(e) => {
                stats.invalid += 1;
                tracing::warn!(
                    record = %normalizer.describe(raw),
                    error = %e,
                    "레코드 정규화 실패, 건너뜀"
                );
                continue;
            }
        };

        if !quote.is_after(cutoff) {
            stats.skipped += 1;
            tracing::debug!(quote = %quote.label(), "이미 저장된 날짜, 건너뜀");
            continue;
        }

        match store.insert_quote(&quote).await {
            Ok(()) => {
                stats.inserted += 1;
                tracing::debug!(quote = %quote.label(), "삽입 완료");
            }
            Err(e) => {
                stats.failed += 1;
                tracing::error!(
                    instrumento = %quote.instrumento,
                    date = %quote.date,
                    error = %e,
                    "삽입 실패"
                );
            }
        }
    }

    stats.elapsed = start.elapsed();
    stats
}
