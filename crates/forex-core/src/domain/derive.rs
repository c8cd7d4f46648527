//! 필드 파생 규칙.
//!
//! API 원본 레코드에서 기존 테이블 형식의 필드를 만들어내는
//! 순수 함수들입니다. 상태를 갖지 않습니다.
//!
//! | 필드 | 규칙 |
//! |------|------|
//! | currency_out | 티커 끝의 `$T` 제거 (`USB$T` → `USB`) |
//! | currency_in | `T` → `ART`, 그 외 그대로 |
//! | rueda | `Minorista` → `CAM2`, `Mayorista` → `CAM1`, 그 외 그대로 |
//! | instrumento | `"<out> / <in> <plazo 원문>"` |

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::error::{CoreError, Result};

/// API 날짜/시각 형식 (예: "2024-11-15T00:00:00", "2024-11-15T16:59:59.997").
///
/// 소수 초는 있어도 없어도 됩니다.
pub const API_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// 날짜만 있는 형식 (레거시 API, 요청 파라미터).
pub const API_DATE_FORMAT: &str = "%Y-%m-%d";

/// 결제일이 없음을 나타내는 연도 (`0001-01-01T00:00:00`).
const SETTLEMENT_SENTINEL_YEAR: i32 = 1;

/// 티커에서 매도 통화 코드를 추출합니다.
///
/// `$T`로 끝나는 티커만 접미사를 제거합니다 (`MB$T` → `MB`).
/// `USMEP` 같은 티커는 그대로 반환합니다.
pub fn derive_currency_out(ticker: &str) -> String {
    ticker.strip_suffix("$T").unwrap_or(ticker).to_string()
}

/// moneda 필드를 매수 통화 코드로 변환합니다 (`T`: 이체 페소).
pub fn derive_currency_in(moneda: &str) -> String {
    match moneda {
        "T" => "ART".to_string(),
        other => other.to_string(),
    }
}

/// segmento 필드를 세션 코드로 변환합니다.
pub fn derive_rueda(segmento: &str) -> String {
    match segmento {
        "Minorista" => "CAM2".to_string(),
        "Mayorista" => "CAM1".to_string(),
        other => other.to_string(),
    }
}

/// 기존 형식의 상품명을 만듭니다 (예: "USB / ART 000").
///
/// `plazo`는 파싱 전 원문을 사용합니다. 숫자 `settle`과 별개입니다.
pub fn build_instrumento(currency_out: &str, currency_in: &str, plazo: &str) -> String {
    format!("{} / {} {}", currency_out, currency_in, plazo)
}

/// 필수 거래일 필드를 파싱합니다.
///
/// `YYYY-MM-DDTHH:MM:SS`와 `YYYY-MM-DD`를 모두 허용하며 시각은 버립니다.
pub fn parse_trade_date(raw: &str) -> Result<NaiveDate> {
    let value = raw.trim();
    NaiveDateTime::parse_from_str(value, API_DATETIME_FORMAT)
        .map(|dt| dt.date())
        .or_else(|_| NaiveDate::parse_from_str(value, API_DATE_FORMAT))
        .map_err(|e| CoreError::invalid_date(raw, e))
}

/// 결제 기간(plazo)을 정수로 파싱합니다. 비어 있거나 실패하면 None.
pub fn parse_settle(plazo: &str) -> Option<i32> {
    if plazo.is_empty() {
        return None;
    }
    plazo.parse().ok()
}

/// 결제일(fechaLiquidacion)을 파싱합니다.
///
/// 빈 값, 파싱 실패, 0001-01-01(소수 초 포함 여부와 무관)은 모두 None입니다.
pub fn parse_settle_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(value, API_DATETIME_FORMAT)
        .ok()
        .map(|dt| dt.date())
        .filter(|date| !is_settlement_sentinel(*date))
}

fn is_settlement_sentinel(date: NaiveDate) -> bool {
    date.year() == SETTLEMENT_SENTINEL_YEAR && date.ordinal() == 1
}
