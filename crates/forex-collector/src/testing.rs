//! 테스트용 메모리 저장소.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use forex_core::{CoreError, ForexQuote, ForexRow, ForexTable, QuoteStore, RowStore};

use crate::CollectorConfig;

/// `Vec<ForexRow>` 기반 외환 테이블.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<ForexRow>>,
    /// 이 instrumento를 가진 행의 삽입은 실패합니다.
    reject_instrumento: Option<String>,
    /// 최대 날짜 조회가 실패합니다.
    broken_cutoff: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<ForexRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    pub fn rejecting(mut self, instrumento: &str) -> Self {
        self.reject_instrumento = Some(instrumento.to_string());
        self
    }

    pub fn with_broken_cutoff(mut self) -> Self {
        self.broken_cutoff = true;
        self
    }

    pub fn rows(&self) -> Vec<ForexRow> {
        self.rows.lock().unwrap().clone()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows().iter().map(|r| r.date).collect()
    }
}

#[async_trait]
impl ForexTable for MemoryStore {
    fn table(&self) -> &str {
        "memory.forex"
    }

    async fn last_date(&self) -> forex_core::Result<Option<NaiveDate>> {
        if self.broken_cutoff {
            return Err(CoreError::Storage("connection reset".to_string()));
        }
        Ok(self.rows.lock().unwrap().iter().map(|r| r.date).max())
    }
}

#[async_trait]
impl QuoteStore for MemoryStore {
    async fn insert_quote(&self, quote: &ForexQuote) -> forex_core::Result<()> {
        self.insert_row(&ForexRow::from(quote)).await
    }
}

#[async_trait]
impl RowStore for MemoryStore {
    async fn rows_after(&self, cutoff: NaiveDate) -> forex_core::Result<Vec<ForexRow>> {
        let mut rows: Vec<ForexRow> = self
            .rows()
            .into_iter()
            .filter(|r| r.date > cutoff)
            .collect();
        rows.sort_by_key(|r| r.date);
        Ok(rows)
    }

    async fn insert_row(&self, row: &ForexRow) -> forex_core::Result<()> {
        if self.reject_instrumento.is_some() && row.instrumento == self.reject_instrumento {
            return Err(CoreError::Storage(
                "duplicate key value violates constraint".to_string(),
            ));
        }
        self.rows.lock().unwrap().push(row.clone());
        Ok(())
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// 모든 엔드포인트를 `base_url` 아래로 돌린 설정.
///
/// 로컬/원격 DB는 연결이 거부되는 주소를 가리키므로,
/// 작업이 DB에 접근하지 않았다면 `Ok`가 반환됩니다.
pub fn config_for(base_url: &str) -> CollectorConfig {
    let vars: HashMap<String, String> = [
        ("POSTGRES_USER", "forex"),
        ("POSTGRES_HOST", "127.0.0.1"),
        ("POSTGRES_PORT", "1"),
        ("POSTGRES_DB", "mae"),
        ("DB_CONNECT_TIMEOUT_SECS", "1"),
        ("MAE_API_KEY", "test-key"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .chain([
        ("MAE_FOREX_URL".to_string(), format!("{}/forex", base_url)),
        ("MAE_LEGACY_URL".to_string(), format!("{}/legacy", base_url)),
        ("MAE_HISTORICO_URL".to_string(), format!("{}/historico", base_url)),
    ])
    .collect();

    CollectorConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
}
