//! DB 간 동기화 모듈 (로컬 → 원격 `public.forex`).
//!
//! 대상 테이블의 최대 날짜 이후 행만 원본에서 읽어 컬럼 변환 없이 복사합니다.

use std::time::Instant;

use chrono::NaiveDate;
use forex_core::RowStore;
use forex_data::PgForexStore;

use crate::{CollectionStats, CollectorConfig, Result};

/// 대상 테이블이 비어 있을 때의 기준일 (1900-01-01).
pub fn sync_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// 원본에서 대상으로 새 행을 복사합니다.
///
/// 대상 기준일 조회와 원본 행 조회 실패는 작업 에러입니다.
/// 개별 행 복사 실패는 로그를 남기고 다음 행으로 진행합니다.
/// `dry_run`이면 복사할 행 수만 보고하고 삽입하지 않습니다.
pub async fn sync_rows<S, D>(source: &S, dest: &D, dry_run: bool) -> Result<CollectionStats>
where
    S: RowStore + ?Sized,
    D: RowStore + ?Sized,
{
    let start = Instant::now();
    let mut stats = CollectionStats::new();

    let cutoff = match dest.last_date().await? {
        Some(last) => last,
        None => {
            tracing::info!(table = dest.table(), "대상 테이블이 비어 있음, 전체 복사");
            sync_epoch()
        }
    };

    let rows = source.rows_after(cutoff).await?;
    stats.total = rows.len();

    tracing::info!(
        source = source.table(),
        dest = dest.table(),
        cutoff = %cutoff,
        rows = rows.len(),
        "동기화 대상 조회 완료"
    );

    if dry_run {
        stats.skipped = rows.len();
        for row in &rows {
            tracing::debug!(date = %row.date, instrumento = ?row.instrumento, "dry-run: 복사 예정");
        }
        stats.elapsed = start.elapsed();
        return Ok(stats);
    }

    for row in &rows {
        match dest.insert_row(row).await {
            Ok(()) => stats.inserted += 1,
            Err(e) => {
                stats.failed += 1;
                tracing::error!(
                    date = %row.date,
                    instrumento = ?row.instrumento,
                    error = %e,
                    "행 복사 실패"
                );
            }
        }
    }

    stats.elapsed = start.elapsed();
    Ok(stats)
}

/// 로컬 DB의 새 행을 원격 DB로 동기화합니다.
///
/// 두 연결 풀은 에러 경로를 포함한 모든 경로에서 닫힙니다.
pub async fn sync_forex(config: &CollectorConfig, dry_run: bool) -> Result<CollectionStats> {
    let remote_config = config.require_remote()?;

    tracing::info!(dry_run = dry_run, "DB 동기화 시작");

    let local = config.local_db.connect().await?;
    let remote = match remote_config.connect().await {
        Ok(pool) => pool,
        Err(e) => {
            local.close().await;
            return Err(e.into());
        }
    };

    let source = PgForexStore::new(local.clone());
    let dest = PgForexStore::new(remote.clone());
    let result = sync_rows(&source, &dest, dry_run).await;

    local.close().await;
    remote.close().await;
    result
}
