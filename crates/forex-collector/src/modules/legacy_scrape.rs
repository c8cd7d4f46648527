//! 레거시 시세 수집 모듈 (`public.forex_snapshot`).

use forex_core::RegexTitleParser;
use forex_data::{LegacyNormalizer, MaeLegacyClient, PgSnapshotStore};

use super::incremental::{fetched_batch, load_quotes, read_cutoff};
use crate::{CollectionStats, CollectorConfig, Result};

/// 레거시 API 시세를 조회해 `public.forex_snapshot`에 적재합니다.
pub async fn scrape_legacy(config: &CollectorConfig) -> Result<CollectionStats> {
    let url = config.require_legacy_url()?;
    let client = MaeLegacyClient::new(url)?;
    let normalizer = LegacyNormalizer::new(RegexTitleParser::new()?);

    tracing::info!("레거시 시세 수집 시작");

    let Some(records) = fetched_batch("legacy", client.fetch_quotes().await) else {
        return Ok(CollectionStats::fetch_failed());
    };

    if records.is_empty() {
        tracing::info!("새 데이터 없음");
        return Ok(CollectionStats::new());
    }

    let pool = config.local_db.connect().await?;
    let store = PgSnapshotStore::new(pool.clone());

    let cutoff = read_cutoff(&store).await;
    let stats = load_quotes(&normalizer, &records, &store, cutoff).await;

    pool.close().await;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{date, config_for, MemoryStore};
    use crate::CollectorError;
    use rust_decimal_macros::dec;

    const BODY: &str = r#"{"data": [
        {"fecha": "2024-11-15T00:00:00", "rueda": "Mayorista", "titulo": "USD / ART 000 241115",
         "monto": "1,250,000.50", "cotizacion": 1020.5, "hora": "15:59:58"},
        {"fecha": "", "rueda": "Minorista", "titulo": "USD / ART 001 241118",
         "monto": 10, "cotizacion": 1021, "hora": ""}
    ]}"#;

    #[tokio::test]
    async fn test_missing_legacy_url_is_fatal() {
        let mut config = config_for("http://127.0.0.1:1");
        config.endpoints.legacy_url = None;

        let result = scrape_legacy(&config).await;
        match result {
            Err(CollectorError::Config(message)) => assert!(message.contains("MAE_LEGACY_URL")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_skips_database() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/legacy")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let stats = scrape_legacy(&config_for(&server.url())).await.unwrap();
        assert!(stats.fetch_failed);
    }

    #[tokio::test]
    async fn test_legacy_records_load_into_store() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/legacy")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(BODY)
            .create_async()
            .await;

        let client = MaeLegacyClient::new(format!("{}/legacy", server.url())).unwrap();
        let records = client.fetch_quotes().await.unwrap();
        let store = MemoryStore::new();
        let normalizer = LegacyNormalizer::new(RegexTitleParser::new().unwrap());

        let stats = load_quotes(&normalizer, &records, &store, None).await;

        assert_eq!(stats.inserted, 1);
        assert_eq!(stats.invalid, 1);

        let rows = store.rows();
        assert_eq!(rows[0].date, date("2024-11-15"));
        assert_eq!(rows[0].rueda.as_deref(), Some("CAM1"));
        assert_eq!(rows[0].currency_out.as_deref(), Some("USD"));
        assert_eq!(rows[0].settle, Some(0));
        assert_eq!(rows[0].monto, Some(dec!(1250000.50)));
        assert!(rows[0].hora.is_some());
        assert!(rows[0].descripcion.is_none());
    }
}
