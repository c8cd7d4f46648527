//! 데이터 Provider 모듈.
//!
//! MAE(Mercado Abierto Electrónico) 외환 API에서 시세를 가져오고
//! 원본 레코드를 `ForexQuote`로 정규화합니다.
//!
//! ## 현재 시세 API
//! - `MaeForexClient`: 당일 시세 목록 (API 키 필요)
//!
//! ## 과거 이력 API
//! - `MaeHistoricoClient`: 날짜 범위 조회, 일자별 그룹 응답
//!
//! ## 레거시 API
//! - `MaeLegacyClient`: `{"data": [...]}` 형식, 타이틀 문자열에서 필드 추출

pub mod mae_forex;
pub mod mae_historico;
pub mod mae_legacy;

pub use mae_forex::{CurrentQuoteNormalizer, ForexApiRecord, MaeForexClient};
pub use mae_historico::{
    flatten_days, HistoricoDay, HistoricoDetail, HistoricoNormalizer, MaeHistoricoClient,
};
pub use mae_legacy::{
    LegacyNormalizer, LegacyNumber, LegacyRecord, LegacyResponse, MaeLegacyClient,
};

use std::str::FromStr;
use std::time::Duration;

use forex_core::{
    build_instrumento, derive_currency_in, derive_currency_out, derive_rueda, parse_settle,
    parse_settle_date, parse_trade_date, ForexQuote, QuoteDetails,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use crate::error::{DataError, Result};

/// 타임아웃이 설정된 HTTP 클라이언트를 생성합니다.
pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| DataError::ConfigError(format!("HTTP 클라이언트 생성 실패: {}", e)))
}

/// 성공이 아닌 응답을 상태 코드와 본문을 담은 에러로 변환합니다.
pub(crate) async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(DataError::StatusError { status, body })
}

/// JSON `null`을 기본값으로 역직렬화합니다.
///
/// MAE API는 값이 없는 필드를 생략하거나 `null`로 보냅니다.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 생략된 확장 수치 필드의 기본값 (0).
pub(crate) fn zero_decimal() -> Option<Decimal> {
    Some(Decimal::ZERO)
}

/// 확장 수치 필드를 관대하게 역직렬화합니다.
///
/// `null`은 0, `Decimal`로 표현할 수 없는 값(범위 초과, 숫자가 아닌 문자열)은
/// None이 됩니다. 필드 하나 때문에 응답 배열 전체가 실패하지 않습니다.
pub(crate) fn lenient_decimal<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => zero_decimal(),
        Some(serde_json::Value::Number(n)) => parse_decimal(&n.to_string()),
        Some(serde_json::Value::String(s)) => parse_decimal(s.trim()),
        Some(_) => None,
    })
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// 신규/이력 API 공통 식별 필드 (원문).
pub(crate) struct RawInstrument<'a> {
    pub fecha: &'a str,
    pub ticker: &'a str,
    pub moneda: &'a str,
    pub segmento: &'a str,
    pub plazo: &'a str,
    pub fecha_liquidacion: &'a str,
}

impl RawInstrument<'_> {
    /// 파생 규칙을 적용해 `ForexQuote`를 만듭니다.
    ///
    /// 거래일 파싱 실패만 에러이며, 결제 기간/결제일은 실패 시 None입니다.
    pub fn into_quote(
        self,
        monto: Decimal,
        cotizacion: Decimal,
        details: QuoteDetails,
    ) -> forex_core::Result<ForexQuote> {
        let date = parse_trade_date(self.fecha)?;

        let currency_out = derive_currency_out(self.ticker);
        let currency_in = derive_currency_in(self.moneda);

        Ok(ForexQuote {
            date,
            rueda: derive_rueda(self.segmento),
            instrumento: build_instrumento(&currency_out, &currency_in, self.plazo),
            currency_out,
            currency_in,
            settle: parse_settle(self.plazo),
            settle_date: parse_settle_date(self.fecha_liquidacion),
            monto,
            cotizacion,
            hora: None,
            details: Some(details),
        })
    }
}
