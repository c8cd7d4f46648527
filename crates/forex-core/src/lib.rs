//! # Forex Core
//!
//! MAE 외환(forex) 시세 수집기의 핵심 도메인 모델과 규칙을 제공합니다.
//!
//! 이 크레이트는 수집 작업 전반에서 사용되는 기본 요소를 제공합니다:
//! - 정규화된 시세 레코드 (`ForexQuote`) 및 저장 경계 레코드 (`ForexRow`)
//! - 필드 파생 규칙 (통화 코드, 세션 코드, 상품명)
//! - 레거시 타이틀 파서
//! - 저장소 trait
//! - 로깅 인프라

pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
