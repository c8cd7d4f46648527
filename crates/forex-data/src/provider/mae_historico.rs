//! MAE 외환 과거 이력 API 클라이언트.
//!
//! 날짜 범위를 JSON으로 인코딩한 `oTitulo` 쿼리 파라미터로 전달하면
//! 일자별 그룹(`details` 포함)의 배열을 반환합니다.

use std::time::Duration;

use chrono::NaiveDate;
use forex_core::{ForexQuote, QuoteDetails, QuoteNormalizer, API_DATE_FORMAT};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    build_http_client, ensure_success, lenient_decimal, null_as_default, zero_decimal, RawInstrument,
};
use crate::error::Result;

/// 일자별 그룹.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricoDay {
    #[serde(default, deserialize_with = "null_as_default")]
    pub fecha: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub volumen: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub details: Vec<HistoricoDetail>,
}

/// 일자별 그룹 안의 개별 시세.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricoDetail {
    #[serde(default, deserialize_with = "null_as_default")]
    pub fecha: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ticker: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub descripcion: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub moneda: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub plazo: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub codigo_plazo: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub segmento: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub codigo_segmento: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub volumen: Decimal,
    #[serde(default = "zero_decimal", deserialize_with = "lenient_decimal")]
    pub monto: Option<Decimal>,
    #[serde(default = "zero_decimal", deserialize_with = "lenient_decimal")]
    pub minimo: Option<Decimal>,
    #[serde(default = "zero_decimal", deserialize_with = "lenient_decimal")]
    pub maximo: Option<Decimal>,
    #[serde(default = "zero_decimal", deserialize_with = "lenient_decimal")]
    pub ultimo: Option<Decimal>,
    #[serde(default = "zero_decimal", deserialize_with = "lenient_decimal")]
    pub variacion: Option<Decimal>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tipo_emision: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub precio_cierre: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fecha_liquidacion: String,
    #[serde(default = "zero_decimal", deserialize_with = "lenient_decimal")]
    pub ultima_tasa: Option<Decimal>,
    #[serde(default = "zero_decimal", deserialize_with = "lenient_decimal")]
    pub cierre_anterior: Option<Decimal>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub open_interest: i64,
}

/// 요청 날짜 범위 (`oTitulo` 파라미터).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DateRangeParam {
    fecha_desde: String,
    fecha_hasta: String,
}

/// MAE 과거 이력 API 클라이언트.
#[derive(Clone)]
pub struct MaeHistoricoClient {
    client: reqwest::Client,
    url: String,
}

impl MaeHistoricoClient {
    /// 기본 엔드포인트.
    pub const DEFAULT_URL: &'static str =
        "https://api.marketdata.mae.com.ar/api/mercado/titulo/historicoforex";

    /// 요청 타임아웃 (범위 조회는 응답이 큼).
    pub const TIMEOUT: Duration = Duration::from_secs(60);

    const USER_AGENT: &'static str = "Mozilla/5.0 (compatible; MAEScraper/1.0)";

    /// 새 클라이언트를 생성합니다.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_http_client(Self::TIMEOUT)?,
            url: url.into(),
        })
    }

    /// `oTitulo` 파라미터 값 (예: `{"fechaDesde":"2024-11-11","fechaHasta":"2024-11-13"}`).
    pub fn range_param(from: NaiveDate, to: NaiveDate) -> Result<String> {
        let param = DateRangeParam {
            fecha_desde: from.format(API_DATE_FORMAT).to_string(),
            fecha_hasta: to.format(API_DATE_FORMAT).to_string(),
        };
        Ok(serde_json::to_string(&param)?)
    }

    /// 날짜 범위의 이력을 조회합니다 (양 끝 포함).
    pub async fn fetch_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<HistoricoDay>> {
        let o_titulo = Self::range_param(from, to)?;

        tracing::debug!(url = %self.url, o_titulo = %o_titulo, "MAE 이력 요청");

        let response = self
            .client
            .get(&self.url)
            .query(&[("oTitulo", o_titulo.as_str())])
            .header("Accept", "application/json")
            .header("User-Agent", Self::USER_AGENT)
            .send()
            .await?;

        let days: Vec<HistoricoDay> = ensure_success(response).await?.json().await?;

        tracing::debug!(days = days.len(), "MAE 이력 수신");
        Ok(days)
    }
}

/// 일자별 그룹을 하나의 상세 목록으로 평탄화합니다.
pub fn flatten_days(days: Vec<HistoricoDay>) -> Vec<HistoricoDetail> {
    days.into_iter().flat_map(|day| day.details).collect()
}

/// 과거 이력 레코드 정규화.
///
/// monto ← volumen, cotizacion ← precioCierre, monto_acumulado ← monto.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoricoNormalizer;

impl QuoteNormalizer for HistoricoNormalizer {
    type Raw = HistoricoDetail;

    fn normalize(&self, raw: &HistoricoDetail) -> forex_core::Result<ForexQuote> {
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
            monto_acumulado: raw.monto,
            precio_ultimo: raw.ultimo,
            ultima_tasa: raw.ultima_tasa,
            precio_cierre_anterior: raw.cierre_anterior,
            precio_minimo: raw.minimo,
            precio_maximo: raw.maximo,
            open_interest: raw.open_interest,
            variacion: raw.variacion,
        };

        instrument.into_quote(raw.volumen, raw.precio_cierre, details)
    }

    fn describe(&self, raw: &HistoricoDetail) -> String {
        format!("ticker={}, fecha={}", raw.ticker, raw.fecha)
    }
}
