//! MAE 외환 데이터 수집 및 저장.
//!
//! 이 crate는 다음을 제공합니다:
//! - MAE 외환 API 클라이언트 (현재 시세, 과거 이력, 레거시)
//! - API 원본 레코드의 정규화 구현
//! - PostgreSQL 저장소 (`public.forex`, `public.forex_snapshot`)

pub mod error;
pub mod provider;
pub mod storage;

pub use error::{DataError, Result};

// Provider 재내보내기
pub use provider::{
    flatten_days, CurrentQuoteNormalizer, ForexApiRecord, HistoricoDay, HistoricoDetail,
    HistoricoNormalizer, LegacyNormalizer, LegacyNumber, LegacyRecord, LegacyResponse,
    MaeForexClient, MaeHistoricoClient, MaeLegacyClient,
};

// 저장소 재내보내기
pub use storage::postgres::{init_schema, DatabaseConfig, PgForexStore, PgSnapshotStore};
