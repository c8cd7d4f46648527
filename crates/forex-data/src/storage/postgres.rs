//! PostgreSQL 외환 테이블 구현.
//!
//! 각 삽입은 독립적으로 커밋됩니다 (배치 트랜잭션 없음).
//! 한 행의 실패가 이전에 삽입된 행을 되돌리지 않습니다.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use forex_core::{ForexQuote, ForexRow, ForexTable, QuoteStore, RowStore};
use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::FromRow;
use tracing::{debug, info, instrument, warn};

use crate::error::{DataError, Result};

/// 테이블 생성 DDL.
pub const SCHEMA_SQL: &str = include_str!("schema.sql");

const FOREX_TABLE: &str = "public.forex";
const SNAPSHOT_TABLE: &str = "public.forex_snapshot";

const INSERT_FOREX: &str = r#"
    INSERT INTO public.forex (
        date, rueda, instrumento, currency_out, currency_in, settle, settle_date,
        monto, cotizacion, hora,
        descripcion, tipo_emision, codigo_segmento, codigo_plazo, moneda,
        monto_acumulado, precio_ultimo, ultima_tasa, precio_cierre_anterior,
        precio_minimo, precio_maximo, open_interest, variacion
    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
              $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23)
"#;

const INSERT_SNAPSHOT: &str = r#"
    INSERT INTO public.forex_snapshot (
        date, rueda, instrumento, currency_out, currency_in, settle, settle_date,
        monto, cotizacion, hora
    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
"#;

const SELECT_ROWS_AFTER: &str = r#"
    SELECT date, rueda, instrumento, currency_out, currency_in, settle, settle_date,
           monto, cotizacion, hora, descripcion, tipo_emision, codigo_segmento,
           codigo_plazo, moneda, monto_acumulado, precio_ultimo, ultima_tasa,
           precio_cierre_anterior, precio_minimo, precio_maximo, open_interest, variacion
    FROM public.forex
    WHERE date > $1
    ORDER BY date
"#;

/// 데이터베이스 접속 설정.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// 로그용 이름 (예: "local", "gcloud")
    pub label: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: SecretString,
    pub database: String,
    /// 연결 타임아웃 (초)
    pub connect_timeout_secs: u64,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("label", &self.label)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

impl DatabaseConfig {
    /// 기본 연결 타임아웃 (초).
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

    /// 접속 옵션을 생성합니다.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(self.password.expose_secret())
            .database(&self.database)
    }

    /// 단일 연결 풀을 생성합니다.
    ///
    /// 배치 작업은 한 번에 한 쿼리만 실행하므로 연결은 하나면 충분합니다.
    pub async fn connect(&self) -> Result<PgPool> {
        info!(
            target_db = %self.label,
            host = %self.host,
            port = self.port,
            database = %self.database,
            "데이터베이스 연결 중"
        );

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(self.connect_timeout_secs))
            .connect_with(self.connect_options())
            .await
            .map_err(|e| DataError::ConnectionError(format!("{} 데이터베이스: {}", self.label, e)))?;

        info!(target_db = %self.label, "데이터베이스 연결 성공");
        Ok(pool)
    }
}

/// 두 테이블이 없으면 생성합니다.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    info!("forex 테이블 스키마 확인 완료");
    Ok(())
}

async fn max_date(pool: &PgPool, table: &str) -> Result<Option<NaiveDate>> {
    let sql = format!("SELECT MAX(date) FROM {}", table);
    let last: Option<NaiveDate> = sqlx::query_scalar(&sql).fetch_one(pool).await?;
    debug!(table, last_date = ?last, "최대 날짜 조회");
    Ok(last)
}

/// 빈 문자열은 NULL로 저장합니다.
fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// `public.forex` 저장소.
#[derive(Clone)]
pub struct PgForexStore {
    pool: PgPool,
}

impl PgForexStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ForexTable for PgForexStore {
    fn table(&self) -> &str {
        FOREX_TABLE
    }

    async fn last_date(&self) -> forex_core::Result<Option<NaiveDate>> {
        Ok(max_date(&self.pool, FOREX_TABLE).await?)
    }
}

#[async_trait]
impl QuoteStore for PgForexStore {
    async fn insert_quote(&self, quote: &ForexQuote) -> forex_core::Result<()> {
        self.insert_row(&ForexRow::from(quote)).await
    }
}

#[async_trait]
impl RowStore for PgForexStore {
    #[instrument(skip(self))]
    async fn rows_after(&self, cutoff: NaiveDate) -> forex_core::Result<Vec<ForexRow>> {
        let rows = sqlx::query(SELECT_ROWS_AFTER)
            .bind(cutoff)
            .fetch_all(&self.pool)
            .await
            .map_err(DataError::from)?;

        let mut decoded = Vec::with_capacity(rows.len());
        for row in &rows {
            match ForexRow::from_row(row) {
                Ok(r) => decoded.push(r),
                Err(e) => warn!(error = %e, "행 디코딩 실패, 건너뜀"),
            }
        }

        debug!(
            fetched = rows.len(),
            decoded = decoded.len(),
            "기준일 이후 행 조회"
        );
        Ok(decoded)
    }

    async fn insert_row(&self, row: &ForexRow) -> forex_core::Result<()> {
        sqlx::query(INSERT_FOREX)
            .bind(row.date)
            .bind(&row.rueda)
            .bind(&row.instrumento)
            .bind(&row.currency_out)
            .bind(&row.currency_in)
            .bind(row.settle)
            .bind(row.settle_date)
            .bind(row.monto)
            .bind(row.cotizacion)
            .bind(row.hora)
            .bind(&row.descripcion)
            .bind(&row.tipo_emision)
            .bind(&row.codigo_segmento)
            .bind(&row.codigo_plazo)
            .bind(&row.moneda)
            .bind(row.monto_acumulado)
            .bind(row.precio_ultimo)
            .bind(row.ultima_tasa)
            .bind(row.precio_cierre_anterior)
            .bind(row.precio_minimo)
            .bind(row.precio_maximo)
            .bind(row.open_interest)
            .bind(row.variacion)
            .execute(&self.pool)
            .await
            .map_err(DataError::from)?;
        Ok(())
    }
}

/// `public.forex_snapshot` 저장소 (레거시 시세).
#[derive(Clone)]
pub struct PgSnapshotStore {
    pool: PgPool,
}

impl PgSnapshotStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ForexTable for PgSnapshotStore {
    fn table(&self) -> &str {
        SNAPSHOT_TABLE
    }

    async fn last_date(&self) -> forex_core::Result<Option<NaiveDate>> {
        Ok(max_date(&self.pool, SNAPSHOT_TABLE).await?)
    }
}

#[async_trait]
impl QuoteStore for PgSnapshotStore {
    async fn insert_quote(&self, quote: &ForexQuote) -> forex_core::Result<()> {
        sqlx::query(INSERT_SNAPSHOT)
            .bind(quote.date)
            .bind(&quote.rueda)
            .bind(&quote.instrumento)
            .bind(non_empty(&quote.currency_out))
            .bind(non_empty(&quote.currency_in))
            .bind(quote.settle)
            .bind(quote.settle_date)
            .bind(quote.monto)
            .bind(quote.cotizacion)
            .bind(quote.hora)
            .execute(&self.pool)
            .await
            .map_err(DataError::from)?;
        Ok(())
    }
}
