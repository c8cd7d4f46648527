//! 정규화된 외환 시세 레코드.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 정규화된 외환 시세.
///
/// API 응답 요소 하나에서 생성되어 한 번 정규화된 뒤
/// 저장되거나 버려집니다. 갱신/삭제되지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForexQuote {
    /// 거래일
    pub date: NaiveDate,
    /// 세션 코드 (CAM1, CAM2 또는 원본 값)
    pub rueda: String,
    /// 상품 표시명 (예: "USB / ART 000")
    pub instrumento: String,
    /// 매도 통화
    pub currency_out: String,
    /// 매수 통화
    pub currency_in: String,
    /// 결제 기간 (일)
    pub settle: Option<i32>,
    /// 결제일
    pub settle_date: Option<NaiveDate>,
    /// 거래량
    pub monto: Decimal,
    /// 호가
    pub cotizacion: Decimal,
    /// 체결 시각 (레거시 API 전용)
    pub hora: Option<NaiveTime>,
    /// 신규 API 확장 속성 (레거시 시세는 None)
    pub details: Option<QuoteDetails>,
}

/// 신규 API가 제공하는 확장 속성.
///
/// 수치 속성은 `Decimal` 범위를 벗어나면 None (NULL로 저장)입니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteDetails {
    pub descripcion: String,
    pub tipo_emision: String,
    pub codigo_segmento: String,
    pub codigo_plazo: String,
    pub moneda: String,
    pub monto_acumulado: Option<Decimal>,
    pub precio_ultimo: Option<Decimal>,
    pub ultima_tasa: Option<Decimal>,
    pub precio_cierre_anterior: Option<Decimal>,
    pub precio_minimo: Option<Decimal>,
    pub precio_maximo: Option<Decimal>,
    pub open_interest: i64,
    pub variacion: Option<Decimal>,
}

impl ForexQuote {
    /// 로그용 식별 라벨 (예: "USB / ART 000 @ 2024-11-15").
    pub fn label(&self) -> String {
        format!("{} @ {}", self.instrumento, self.date)
    }

    /// 기준일(cutoff)보다 엄격히 이후인지 확인합니다.
    ///
    /// 기준일이 없으면 (빈 테이블) 항상 true입니다.
    pub fn is_after(&self, cutoff: Option<NaiveDate>) -> bool {
        cutoff.map_or(true, |last| self.date > last)
    }
}
