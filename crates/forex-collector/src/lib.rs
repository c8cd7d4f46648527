//! MAE forex batch collector.
//!
//! 각 작업은 한 번 실행되고 종료됩니다 (fetch → 정규화 → 기준일 비교 → 삽입):
//! - 현재 시세 수집 (`public.forex`)
//! - 레거시 시세 수집 (`public.forex_snapshot`)
//! - 과거 이력 백필 (누락 날짜 구간)
//! - 로컬 → 원격 DB 동기화

pub mod config;
pub mod error;
pub mod modules;
pub mod stats;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{CollectorConfig, EndpointConfig};
pub use error::{CollectorError, Result};
pub use stats::CollectionStats;
