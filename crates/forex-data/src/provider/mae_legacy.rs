//! MAE 레거시 외환 API 클라이언트.
//!
//! 구 API는 `{"data": [...]}` 형태로 응답하며, 통화쌍/결제 기간/결제일을
//! 하나의 타이틀(`USD / ARS 000 190304`)로 묶어 보냅니다. 숫자는 JSON 숫자
//! 또는 천 단위 구분자가 들어간 문자열로 올 수 있습니다.

use std::time::Duration;

use chrono::NaiveTime;
use forex_core::{
    derive_rueda, parse_trade_date, CoreError, ForexQuote, QuoteNormalizer, RegexTitleParser,
    TitleParser,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{build_http_client, ensure_success, null_as_default};
use crate::error::Result;

/// 레거시 응답 래퍼.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegacyResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<LegacyRecord>,
}

/// 숫자 또는 문자열로 오는 값.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LegacyNumber {
    Number(Decimal),
    Text(String),
}

impl LegacyNumber {
    /// Decimal로 변환합니다. 천 단위 구분자(`,`)는 제거합니다.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().replace(',', "").parse().ok(),
        }
    }

    fn raw(&self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

/// 레거시 시세 레코드.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegacyRecord {
    /// 거래일 ("2019-03-04" 또는 "2019-03-04T00:00:00")
    #[serde(default, deserialize_with = "null_as_default")]
    pub fecha: String,
    /// 세션 코드
    #[serde(default, deserialize_with = "null_as_default")]
    pub rueda: String,
    /// 결합 타이틀 (`CCC / CCC NNN YYMMDD`)
    #[serde(default, deserialize_with = "null_as_default")]
    pub titulo: String,
    #[serde(default)]
    pub monto: Option<LegacyNumber>,
    #[serde(default)]
    pub cotizacion: Option<LegacyNumber>,
    /// 체결 시각 ("15:00:01")
    #[serde(default, deserialize_with = "null_as_default")]
    pub hora: String,
}

/// MAE 레거시 API 클라이언트.
#[derive(Clone)]
pub struct MaeLegacyClient {
    client: reqwest::Client,
    url: String,
}

impl MaeLegacyClient {
    /// 요청 타임아웃.
    pub const TIMEOUT: Duration = Duration::from_secs(30);

    /// 새 클라이언트를 생성합니다.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_http_client(Self::TIMEOUT)?,
            url: url.into(),
        })
    }

    /// 레거시 시세 목록을 조회합니다.
    pub async fn fetch_quotes(&self) -> Result<Vec<LegacyRecord>> {
        tracing::debug!(url = %self.url, "MAE 레거시 시세 요청");

        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let body: LegacyResponse = ensure_success(response).await?.json().await?;

        tracing::debug!(count = body.data.len(), "MAE 레거시 시세 수신");
        Ok(body.data)
    }
}

/// 레거시 레코드 정규화.
///
/// 통화쌍/결제 기간/결제일은 `TitleParser`로 추출하며, 상품명은
/// 정리된 타이틀을 그대로 사용합니다.
#[derive(Debug, Clone)]
pub struct LegacyNormalizer<P = RegexTitleParser> {
    parser: P,
}

impl<P: TitleParser> LegacyNormalizer<P> {
    /// 지정한 타이틀 파서로 정규화기를 생성합니다.
    pub fn new(parser: P) -> Self {
        Self { parser }
    }
}

fn required_number(
    field: &'static str,
    value: &Option<LegacyNumber>,
) -> forex_core::Result<Decimal> {
    value
        .as_ref()
        .and_then(LegacyNumber::to_decimal)
        .ok_or_else(|| CoreError::InvalidNumber {
            field,
            value: value.as_ref().map(LegacyNumber::raw).unwrap_or_default(),
        })
}

fn parse_hora(raw: &str) -> Option<NaiveTime> {
    let value = raw.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

impl<P: TitleParser> QuoteNormalizer for LegacyNormalizer<P> {
    type Raw = LegacyRecord;

    fn normalize(&self, raw: &LegacyRecord) -> forex_core::Result<ForexQuote> {
        let date = parse_trade_date(&raw.fecha)?;
        let monto = required_number("monto", &raw.monto)?;
        let cotizacion = required_number("cotizacion", &raw.cotizacion)?;

        let fields = self.parser.parse_title(&raw.titulo);
        if fields.is_empty() {
            tracing::debug!(titulo = %raw.titulo, "타이틀 패턴 불일치, 통화/결제 필드 비움");
        }

        Ok(ForexQuote {
            date,
            rueda: derive_rueda(&raw.rueda),
            instrumento: raw.titulo.trim().to_string(),
            currency_out: fields.currency_out,
            currency_in: fields.currency_in,
            settle: fields.settle,
            settle_date: fields.settle_date,
            monto,
            cotizacion,
            hora: parse_hora(&raw.hora),
            details: None,
        })
    }

    fn describe(&self, raw: &LegacyRecord) -> String {
        format!("titulo={}, fecha={}", raw.titulo, raw.fecha)
    }
}
