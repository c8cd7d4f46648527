//! 외환 시세 수집을 위한 도메인 규칙.

mod derive;
mod normalize;
mod store;
mod title;

pub use derive::*;
pub use normalize::*;
pub use store::*;
pub use title::*;
