//! 현재 시세 수집 모듈 (`public.forex`).

use forex_data::{CurrentQuoteNormalizer, MaeForexClient, PgForexStore};
use secrecy::ExposeSecret;

use super::incremental::{fetched_batch, load_quotes, read_cutoff};
use crate::{CollectionStats, CollectorConfig, Result};

/// 현재 시세를 조회해 `public.forex`에 적재합니다.
///
/// 조회 실패나 빈 응답이면 DB에 연결하지 않고 종료합니다.
pub async fn scrape_forex(config: &CollectorConfig) -> Result<CollectionStats> {
    let api_key = config.require_api_key()?;
    let client = MaeForexClient::new(&config.endpoints.forex_url, api_key.expose_secret())?;

    tracing::info!("현재 시세 수집 시작");

    let Some(records) = fetched_batch("forex", client.fetch_quotes().await) else {
        return Ok(CollectionStats::fetch_failed());
    };

    if records.is_empty() {
        tracing::info!("새 데이터 없음");
        return Ok(CollectionStats::new());
    }

    let pool = config.local_db.connect().await?;
    let store = PgForexStore::new(pool.clone());

    let cutoff = read_cutoff(&store).await;
    let stats = load_quotes(&CurrentQuoteNormalizer, &records, &store, cutoff).await;

    pool.close().await;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::config_for;
    use crate::CollectorError;

    #[tokio::test]
    async fn test_missing_api_key_is_fatal() {
        let mut config = config_for("http://127.0.0.1:1");
        config.api_key = None;

        let result = scrape_forex(&config).await;
        assert!(matches!(result, Err(CollectorError::Config(_))));
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_database() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/forex")
            .match_header("x-api-key", "test-key")
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        // 로컬 DB는 연결할 수 없는 주소이므로 연결을 시도하면 에러가 됩니다.
        let config = config_for(&server.url());
        let stats = scrape_forex(&config).await.unwrap();

        assert!(stats.fetch_failed);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_batch_skips_database() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/forex")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let stats = scrape_forex(&config_for(&server.url())).await.unwrap();

        assert!(!stats.fetch_failed);
        assert_eq!(stats.total, 0);
    }

    #[tokio::test]
    async fn test_unreachable_database_is_fatal() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/forex")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"fecha": "2024-11-15T00:00:00", "ticker": "USB", "moneda": "T"}]"#)
            .create_async()
            .await;

        let result = scrape_forex(&config_for(&server.url())).await;
        assert!(matches!(result, Err(CollectorError::Data(_))));
    }
}
