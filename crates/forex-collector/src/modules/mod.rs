//! 수집 작업 모듈.

pub mod forex_scrape;
pub mod forex_sync;
pub mod historico_backfill;
pub mod incremental;
pub mod legacy_scrape;

pub use forex_scrape::scrape_forex;
pub use forex_sync::{sync_epoch, sync_forex, sync_rows};
pub use historico_backfill::{backfill, backfill_historico, plan_backfill, BackfillPlan};
pub use incremental::{fetched_batch, load_quotes, read_cutoff};
pub use legacy_scrape::scrape_legacy;

use forex_data::init_schema;

use crate::{CollectorConfig, Result};

/// 두 테이블이 없으면 생성합니다.
pub async fn create_schema(config: &CollectorConfig) -> Result<()> {
    let pool = config.local_db.connect().await?;
    let result = init_schema(&pool).await;
    pool.close().await;
    Ok(result?)
}
