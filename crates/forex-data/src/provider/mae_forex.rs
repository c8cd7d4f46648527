//! MAE 현재 시세 API 클라이언트.
//!
//! 당일 외환 시세를 평탄한 JSON 배열로 반환합니다.
//! `x-api-key` 헤더로 인증합니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use forex_data::provider::MaeForexClient;
//!
//! let client = MaeForexClient::new(MaeForexClient::DEFAULT_URL, api_key)?;
//! let records = client.fetch_quotes().await?;
//! ```

use std::time::Duration;

use forex_core::{ForexQuote, QuoteDetails, QuoteNormalizer};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    build_http_client, ensure_success, lenient_decimal, null_as_default, zero_decimal, RawInstrument,
};
use crate::error::Result;

/// 현재 시세 API 레코드.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForexApiRecord {
    /// 거래일 (예: "2024-11-15T00:00:00")
    #[serde(default, deserialize_with = "null_as_default")]
    pub fecha: String,
    /// 티커 (예: "USB$T", "USMEP")
    #[serde(default, deserialize_with = "null_as_default")]
    pub ticker: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub descripcion: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tipo_emision: String,
    /// 시장 구분 (Minorista, Mayorista)
    #[serde(default, deserialize_with = "null_as_default")]
    pub segmento: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub codigo_segmento: String,
    /// 결제 기간 원문 (예: "000")
    #[serde(default, deserialize_with = "null_as_default")]
    pub plazo: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub codigo_plazo: String,
    /// 통화 코드 ("T": 이체 페소)
    #[serde(default, deserialize_with = "null_as_default")]
    pub moneda: String,
    /// 결제일 ("0001-01-01T00:00:00"은 없음)
    #[serde(default, deserialize_with = "null_as_default")]
    pub fecha_liquidacion: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub volumen_acumulado: Decimal,
    #[serde(default = "zero_decimal", deserialize_with = "lenient_decimal")]
    pub monto_acumulado: Option<Decimal>,
    #[serde(default = "zero_decimal", deserialize_with = "lenient_decimal")]
    pub precio_ultimo: Option<Decimal>,
    #[serde(default = "zero_decimal", deserialize_with = "lenient_decimal")]
    pub ultima_tasa: Option<Decimal>,
    #[serde(default = "zero_decimal", deserialize_with = "lenient_decimal")]
    pub precio_cierre_anterior: Option<Decimal>,
    #[serde(default = "zero_decimal", deserialize_with = "lenient_decimal")]
    pub precio_minimo: Option<Decimal>,
    #[serde(default = "zero_decimal", deserialize_with = "lenient_decimal")]
    pub precio_maximo: Option<Decimal>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub open_interest: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub precio_cierre: Decimal,
    #[serde(default = "zero_decimal", deserialize_with = "lenient_decimal")]
    pub variacion: Option<Decimal>,
}

/// MAE 현재 시세 API 클라이언트.
#[derive(Clone)]
pub struct MaeForexClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl MaeForexClient {
    /// 기본 엔드포인트.
    pub const DEFAULT_URL: &'static str =
        "https://api.mae.com.ar/MarketData/v1/mercado/cotizaciones/forex";

    /// 요청 타임아웃.
    pub const TIMEOUT: Duration = Duration::from_secs(30);

    /// 새 클라이언트를 생성합니다.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_http_client(Self::TIMEOUT)?,
            url: url.into(),
            api_key: api_key.into(),
        })
    }

    /// 현재 시세 목록을 조회합니다.
    pub async fn fetch_quotes(&self) -> Result<Vec<ForexApiRecord>> {
        tracing::debug!(url = %self.url, "MAE 현재 시세 요청");

        let response = self
            .client
            .get(&self.url)
            .header("x-api-key", &self.api_key)
            .send()
            .await?;

        let records: Vec<ForexApiRecord> = ensure_success(response).await?.json().await?;

        tracing::debug!(count = records.len(), "MAE 현재 시세 수신");
        Ok(records)
    }
}

/// 현재 시세 API 레코드 정규화.
///
/// monto ← volumenAcumulado, cotizacion ← precioCierre.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentQuoteNormalizer;

impl QuoteNormalizer for CurrentQuoteNormalizer {
    type Raw = ForexApiRecord;

    fn normalize(&self, raw: &ForexApiRecord) -> forex_core::Result<ForexQuote> {
        let instrument = RawInstrument {
            fecha: &raw.fecha,
            ticker: &raw.ticker,
            moneda: &raw.moneda,
            segmento: &raw.segmento,
            plazo: &raw.plazo,
            fecha_liquidacion: &raw.fecha_liquidacion,
        };

        let details = QuoteDetails {
            descripcion: raw.descripcion.clone(),
            tipo_emision: raw.tipo_emision.clone(),
            codigo_segmento: raw.codigo_segmento.clone(),
            codigo_plazo: raw.codigo_plazo.clone(),
            moneda: raw.moneda.clone(),
            monto_acumulado: raw.monto_acumulado,
            precio_ultimo: raw.precio_ultimo,
            ultima_tasa: raw.ultima_tasa,
            precio_cierre_anterior: raw.precio_cierre_anterior,
            precio_minimo: raw.precio_minimo,
            precio_maximo: raw.precio_maximo,
            open_interest: raw.open_interest,
            variacion: raw.variacion,
        };

        instrument.into_quote(raw.volumen_acumulado, raw.precio_cierre, details)
    }

    fn describe(&self, raw: &ForexApiRecord) -> String {
        format!("ticker={}, fecha={}", raw.ticker, raw.fecha)
    }
}
