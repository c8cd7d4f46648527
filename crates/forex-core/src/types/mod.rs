//! 수집 작업 전반에서 사용되는 공통 레코드 타입.

mod quote;
mod row;

pub use quote::*;
pub use row::*;
