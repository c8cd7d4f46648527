//! 저장 경계 레코드 (`public.forex` 테이블 한 행).

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ForexQuote;

/// `public.forex` 테이블의 23개 컬럼.
///
/// `date`를 제외한 모든 컬럼은 NULL을 허용합니다.
/// DB 간 동기화는 이 값을 변환 없이 그대로 복사합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct ForexRow {
    pub date: NaiveDate,
    pub rueda: Option<String>,
    pub instrumento: Option<String>,
    pub currency_out: Option<String>,
    pub currency_in: Option<String>,
    pub settle: Option<i32>,
    pub settle_date: Option<NaiveDate>,
    pub monto: Option<Decimal>,
    pub cotizacion: Option<Decimal>,
    pub hora: Option<NaiveTime>,
    pub descripcion: Option<String>,
    pub tipo_emision: Option<String>,
    pub codigo_segmento: Option<String>,
    pub codigo_plazo: Option<String>,
    pub moneda: Option<String>,
    pub monto_acumulado: Option<Decimal>,
    pub precio_ultimo: Option<Decimal>,
    pub ultima_tasa: Option<Decimal>,
    pub precio_cierre_anterior: Option<Decimal>,
    pub precio_minimo: Option<Decimal>,
    pub precio_maximo: Option<Decimal>,
    pub open_interest: Option<i64>,
    pub variacion: Option<Decimal>,
}

impl ForexRow {
    /// 날짜만 채운 빈 행.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            rueda: None,
            instrumento: None,
            currency_out: None,
            currency_in: None,
            settle: None,
            settle_date: None,
            monto: None,
            cotizacion: None,
            hora: None,
            descripcion: None,
            tipo_emision: None,
            codigo_segmento: None,
            codigo_plazo: None,
            moneda: None,
            monto_acumulado: None,
            precio_ultimo: None,
            ultima_tasa: None,
            precio_cierre_anterior: None,
            precio_minimo: None,
            precio_maximo: None,
            open_interest: None,
            variacion: None,
        }
    }
}

impl From<&ForexQuote> for ForexRow {
    fn from(quote: &ForexQuote) -> Self {
        let mut row = Self {
            rueda: Some(quote.rueda.clone()),
            instrumento: Some(quote.instrumento.clone()),
            currency_out: Some(quote.currency_out.clone()),
            currency_in: Some(quote.currency_in.clone()),
            settle: quote.settle,
            settle_date: quote.settle_date,
            monto: Some(quote.monto),
            cotizacion: Some(quote.cotizacion),
            hora: quote.hora,
            ..Self::empty(quote.date)
        };

        if let Some(details) = &quote.details {
            row.descripcion = Some(details.descripcion.clone());
            row.tipo_emision = Some(details.tipo_emision.clone());
            row.codigo_segmento = Some(details.codigo_segmento.clone());
            row.codigo_plazo = Some(details.codigo_plazo.clone());
            row.moneda = Some(details.moneda.clone());
            row.monto_acumulado = details.monto_acumulado;
            row.precio_ultimo = details.precio_ultimo;
            row.ultima_tasa = details.ultima_tasa;
            row.precio_cierre_anterior = details.precio_cierre_anterior;
            row.precio_minimo = details.precio_minimo;
            row.precio_maximo = details.precio_maximo;
            row.open_interest = Some(details.open_interest);
            row.variacion = details.variacion;
        }

        row
    }
}
