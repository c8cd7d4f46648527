//! 원본 레코드 정규화 전략.

use crate::error::Result;
use crate::types::ForexQuote;

/// API 원본 레코드를 `ForexQuote`로 정규화하는 전략.
///
/// 신규 API, 과거 이력 API, 레거시 API가 각각 구현하며
/// 증분 적재 알고리즘은 구현체에 관계없이 동일하게 동작합니다.
///
/// 필수 날짜 파싱 실패는 `Err`로 반환하고 (레코드 폐기),
/// 선택 필드 파싱 실패는 `None`으로 채웁니다 (레코드 유지).
pub trait QuoteNormalizer {
    /// 원본 레코드 타입
    type Raw;

    /// 원본 레코드를 정규화합니다.
    fn normalize(&self, raw: &Self::Raw) -> Result<ForexQuote>;

    /// 로그용 원본 레코드 식별자 (티커, 타이틀 등).
    fn describe(&self, raw: &Self::Raw) -> String;
}
