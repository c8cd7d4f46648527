//! 외환 테이블 저장소 추상화.
//!
//! 수집 작업은 이 trait들만 사용하므로 PostgreSQL 없이도
//! 메모리 구현으로 증분 적재와 동기화 로직을 검증할 수 있습니다.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::types::{ForexQuote, ForexRow};

/// 날짜 컬럼을 가진 외환 테이블.
#[async_trait]
pub trait ForexTable: Send + Sync {
    /// 테이블 이름 (로그용).
    fn table(&self) -> &str;

    /// 저장된 최대 날짜 (`MAX(date)`). 빈 테이블이면 None.
    async fn last_date(&self) -> Result<Option<NaiveDate>>;
}

/// 정규화된 시세를 저장하는 테이블.
#[async_trait]
pub trait QuoteStore: ForexTable {
    /// 시세 한 건을 삽입합니다. 각 삽입은 독립적으로 커밋됩니다.
    async fn insert_quote(&self, quote: &ForexQuote) -> Result<()>;
}

/// 행 단위 복사를 지원하는 테이블 (DB 간 동기화).
#[async_trait]
pub trait RowStore: ForexTable {
    /// `date > cutoff`인 행을 날짜 오름차순으로 조회합니다.
    async fn rows_after(&self, cutoff: NaiveDate) -> Result<Vec<ForexRow>>;

    /// 행 한 건을 변환 없이 삽입합니다.
    async fn insert_row(&self, row: &ForexRow) -> Result<()>;
}
