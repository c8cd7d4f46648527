//! PostgreSQL 저장소.
//!
//! - `public.forex`: 현재 시세/과거 이력 (23개 컬럼)
//! - `public.forex_snapshot`: 레거시 시세 (10개 컬럼)

pub mod postgres;
