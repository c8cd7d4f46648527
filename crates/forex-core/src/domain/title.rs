//! 레거시 API 타이틀 파서.
//!
//! 레거시 API는 통화쌍, 결제 기간, 결제일을 하나의 타이틀 문자열
//! (`CCC / CCC NNN YYMMDD`)로 제공합니다. 파싱 전략은 `TitleParser`
//! trait 뒤에 두어 교체할 수 있습니다.

use chrono::NaiveDate;
use regex::Regex;

use crate::error::Result;

/// 레거시 타이틀 패턴: 매도 통화, 매수 통화, 결제 기간, 결제일(YYMMDD).
pub const LEGACY_TITLE_PATTERN: &str =
    r"^\s*([A-Z]{3})\s*/\s*([A-Z]{3})\s+(\d{3})\s+(\d{6})\s*$";

/// 타이틀에서 추출한 상품 필드.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstrumentFields {
    pub currency_out: String,
    pub currency_in: String,
    pub settle: Option<i32>,
    pub settle_date: Option<NaiveDate>,
}

impl InstrumentFields {
    /// 매칭 실패 시의 빈 결과인지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.currency_out.is_empty()
            && self.currency_in.is_empty()
            && self.settle.is_none()
            && self.settle_date.is_none()
    }
}

/// 타이틀 파싱 trait.
///
/// 매칭에 실패해도 에러를 반환하지 않고 빈 `InstrumentFields`를 반환합니다.
pub trait TitleParser: Send + Sync {
    /// 타이틀을 상품 필드로 분해합니다.
    fn parse_title(&self, title: &str) -> InstrumentFields;
}

/// 정규식 기반 타이틀 파서.
#[derive(Debug, Clone)]
pub struct RegexTitleParser {
    pattern: Regex,
}

impl RegexTitleParser {
    /// 기본 레거시 패턴으로 파서를 생성합니다.
    pub fn new() -> Result<Self> {
        Self::with_pattern(LEGACY_TITLE_PATTERN)
    }

    /// 사용자 정의 패턴으로 파서를 생성합니다.
    ///
    /// 패턴은 4개의 캡처 그룹(매도 통화, 매수 통화, 기간, YYMMDD)을 가져야 합니다.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl TitleParser for RegexTitleParser {
    fn parse_title(&self, title: &str) -> InstrumentFields {
        let Some(caps) = self.pattern.captures(title) else {
            return InstrumentFields::default();
        };

        let group = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or_default();

        InstrumentFields {
            currency_out: group(1).to_string(),
            currency_in: group(2).to_string(),
            settle: group(3).parse().ok(),
            settle_date: NaiveDate::parse_from_str(group(4), "%y%m%d").ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_title() {
        let parser = RegexTitleParser::new().unwrap();
        let fields = parser.parse_title("USD / ARS 000 190304");

        assert_eq!(fields.currency_out, "USD");
        assert_eq!(fields.currency_in, "ARS");
        assert_eq!(fields.settle, Some(0));
        assert_eq!(fields.settle_date, NaiveDate::from_ymd_opt(2019, 3, 4));
    }

    #[test]
    fn test_parse_tolerates_spacing() {
        let parser = RegexTitleParser::new().unwrap();
        let fields = parser.parse_title("  EUR/USD 002  241120 ");

        assert_eq!(fields.currency_out, "EUR");
        assert_eq!(fields.currency_in, "USD");
        assert_eq!(fields.settle, Some(2));
        assert_eq!(fields.settle_date, NaiveDate::from_ymd_opt(2024, 11, 20));
    }

    #[test]
    fn test_non_match_yields_empty_fields() {
        let parser = RegexTitleParser::new().unwrap();

        for title in ["", "USD ARS", "USD / ARS 000", "usd / ars 000 190304"] {
            let fields = parser.parse_title(title);
            assert!(fields.is_empty(), "title {:?} should not match", title);
        }
    }

    #[test]
    fn test_invalid_settle_date_keeps_other_fields() {
        let parser = RegexTitleParser::new().unwrap();
        let fields = parser.parse_title("USD / ARS 001 191332");

        assert_eq!(fields.currency_out, "USD");
        assert_eq!(fields.settle, Some(1));
        assert_eq!(fields.settle_date, None);
    }

    #[test]
    fn test_custom_pattern() {
        assert!(matches!(
            RegexTitleParser::with_pattern("([A-Z"),
            Err(crate::CoreError::InvalidPattern(_))
        ));

        let parser =
            RegexTitleParser::with_pattern(r"^([A-Z]{3})-([A-Z]{3})-(\d{3})-(\d{6})$").unwrap();
        let fields = parser.parse_title("USD-ARS-000-190304");
        assert_eq!(fields.currency_in, "ARS");
    }
}
