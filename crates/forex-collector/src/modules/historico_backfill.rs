//! 과거 이력 백필 모듈.
//!
//! 마지막 저장일 다음 날부터 오늘까지의 누락 구간을 한 번에 조회해
//! `public.forex`에 적재합니다.

use chrono::NaiveDate;
use forex_core::QuoteStore;
use forex_data::{flatten_days, HistoricoNormalizer, MaeHistoricoClient, PgForexStore};

use super::incremental::{fetched_batch, load_quotes, read_cutoff};
use crate::{CollectionStats, CollectorConfig, Result};

/// 백필 계획
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackfillPlan {
    /// 이미 최신 상태, API 호출 없음
    UpToDate,
    /// 조회할 날짜 구간 (양 끝 포함)
    Range { from: NaiveDate, to: NaiveDate },
}

/// 조회 구간을 계산합니다.
///
/// - 저장된 날짜 없음 → `[today, today]`
/// - `last >= today` → `UpToDate`
/// - 그 외 → `[last + 1일, today]`
pub fn plan_backfill(last: Option<NaiveDate>, today: NaiveDate) -> BackfillPlan {
    match last {
        None => BackfillPlan::Range {
            from: today,
            to: today,
        },
        Some(last) if last >= today => BackfillPlan::UpToDate,
        Some(last) => match last.succ_opt() {
            Some(from) => BackfillPlan::Range { from, to: today },
            None => BackfillPlan::UpToDate,
        },
    }
}

/// 누락 구간을 조회해 저장소에 적재합니다.
pub async fn backfill<S>(client: &MaeHistoricoClient, store: &S, today: NaiveDate) -> CollectionStats
where
    S: QuoteStore + ?Sized,
{
    let cutoff = read_cutoff(store).await;

    let (from, to) = match plan_backfill(cutoff, today) {
        BackfillPlan::UpToDate => {
            tracing::info!(today = %today, "이미 최신 상태, 백필 건너뜀");
            return CollectionStats::new();
        }
        BackfillPlan::Range { from, to } => (from, to),
    };

    tracing::info!(from = %from, to = %to, "백필 구간 조회");

    let Some(days) = fetched_batch("historico", client.fetch_range(from, to).await) else {
        return CollectionStats::fetch_failed();
    };

    let details = flatten_days(days);
    if details.is_empty() {
        tracing::info!(from = %from, to = %to, "새 데이터 없음");
        return CollectionStats::new();
    }

    load_quotes(&HistoricoNormalizer, &details, store, cutoff).await
}

/// 과거 이력 백필 실행.
///
/// `today`가 없으면 설정된 시장 시간대 기준 오늘을 사용합니다.
pub async fn backfill_historico(
    config: &CollectorConfig,
    today: Option<NaiveDate>,
) -> Result<CollectionStats> {
    let client = MaeHistoricoClient::new(&config.endpoints.historico_url)?;
    let today = today.unwrap_or_else(|| config.today());

    tracing::info!(today = %today, timezone = %config.market_timezone, "과거 이력 백필 시작");

    let pool = config.local_db.connect().await?;
    let store = PgForexStore::new(pool.clone());

    let stats = backfill(&client, &store, today).await;

    pool.close().await;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{date, MemoryStore};
    use forex_core::ForexRow;
    use mockito::Matcher;
    use rust_decimal_macros::dec;

    const HISTORICO_BODY: &str = r#"[
        {"fecha": "2024-11-11T00:00:00", "volumen": 300, "details": [
            {"fecha": "2024-11-11T00:00:00", "ticker": "USB$T", "moneda": "T", "segmento": "Minorista",
             "plazo": "000", "fechaLiquidacion": "2024-11-11T00:00:00",
             "volumen": 100, "precioCierre": 1000.5, "monto": 5000, "ultimo": 1001}
        ]},
        {"fecha": "2024-11-12T00:00:00", "volumen": 0, "details": []},
        {"fecha": "2024-11-13T00:00:00", "volumen": 200, "details": [
            {"fecha": "2024-11-13T00:00:00", "ticker": "USB", "moneda": "T", "segmento": "Mayorista",
             "plazo": "001", "fechaLiquidacion": "0001-01-01T00:00:00",
             "volumen": 200, "precioCierre": 1010},
            {"fecha": "garbage", "ticker": "USB", "moneda": "T", "segmento": "Mayorista", "plazo": "002"}
        ]}
    ]"#;

    fn client(server: &mockito::Server) -> MaeHistoricoClient {
        MaeHistoricoClient::new(format!("{}/historico", server.url())).unwrap()
    }

    #[test]
    fn test_plan_missing_range() {
        assert_eq!(
            plan_backfill(Some(date("2024-11-10")), date("2024-11-13")),
            BackfillPlan::Range {
                from: date("2024-11-11"),
                to: date("2024-11-13"),
            }
        );
    }

    #[test]
    fn test_plan_empty_table_fetches_today() {
        assert_eq!(
            plan_backfill(None, date("2024-11-13")),
            BackfillPlan::Range {
                from: date("2024-11-13"),
                to: date("2024-11-13"),
            }
        );
    }

    #[test]
    fn test_plan_up_to_date() {
        assert_eq!(
            plan_backfill(Some(date("2024-11-13")), date("2024-11-13")),
            BackfillPlan::UpToDate
        );
        assert_eq!(
            plan_backfill(Some(date("2024-11-20")), date("2024-11-13")),
            BackfillPlan::UpToDate
        );
    }

    #[test]
    fn test_plan_last_yesterday() {
        assert_eq!(
            plan_backfill(Some(date("2024-11-12")), date("2024-11-13")),
            BackfillPlan::Range {
                from: date("2024-11-13"),
                to: date("2024-11-13"),
            }
        );
    }

    #[tokio::test]
    async fn test_up_to_date_makes_no_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let store = MemoryStore::with_rows(vec![ForexRow::empty(date("2024-11-13"))]);
        let stats = backfill(&client(&server), &store, date("2024-11-13")).await;

        assert_eq!(stats.total, 0);
        assert!(!stats.fetch_failed);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_backfill_requests_missing_range_and_inserts() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/historico")
            .match_query(Matcher::UrlEncoded(
                "oTitulo".into(),
                r#"{"fechaDesde":"2024-11-11","fechaHasta":"2024-11-13"}"#.into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(HISTORICO_BODY)
            .create_async()
            .await;

        let store = MemoryStore::with_rows(vec![ForexRow::empty(date("2024-11-10"))]);
        let stats = backfill(&client(&server), &store, date("2024-11-13")).await;

        mock.assert_async().await;
        assert_eq!(stats.total, 3);
        assert_eq!(stats.inserted, 2);
        assert_eq!(stats.invalid, 1);

        let rows = store.rows();
        assert_eq!(
            store.dates(),
            vec![date("2024-11-10"), date("2024-11-11"), date("2024-11-13")]
        );

        let first = &rows[1];
        assert_eq!(first.rueda.as_deref(), Some("CAM2"));
        assert_eq!(first.currency_out.as_deref(), Some("USB"));
        assert_eq!(first.currency_in.as_deref(), Some("ART"));
        assert_eq!(first.instrumento.as_deref(), Some("USB / ART 000"));
        assert_eq!(first.monto, Some(dec!(100)));
        assert_eq!(first.monto_acumulado, Some(dec!(5000)));
        assert_eq!(first.settle_date, Some(date("2024-11-11")));
        assert!(first.hora.is_none());

        let second = &rows[2];
        assert_eq!(second.rueda.as_deref(), Some("CAM1"));
        assert_eq!(second.settle, Some(1));
        assert!(second.settle_date.is_none());
    }

    #[tokio::test]
    async fn test_server_error_leaves_store_untouched() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/historico")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let store = MemoryStore::new();
        let stats = backfill(&client(&server), &store, date("2024-11-13")).await;

        assert!(stats.fetch_failed);
        assert!(store.rows().is_empty());
    }

    #[tokio::test]
    async fn test_empty_days_is_no_new_data() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/historico")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"fecha": "2024-11-13T00:00:00", "details": []}]"#)
            .create_async()
            .await;

        let store = MemoryStore::new();
        let stats = backfill(&client(&server), &store, date("2024-11-13")).await;

        assert!(!stats.fetch_failed);
        assert_eq!(stats.total, 0);
        assert!(store.rows().is_empty());
    }
}
