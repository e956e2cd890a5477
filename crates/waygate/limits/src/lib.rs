//! Waygate creation quotas
//!
//! Quota policy comes from outside (the [`Limit`] and [`LimitProvider`]
//! ports); this crate contributes the evaluation: counting a player's warps
//! live against the registry and deciding whether one more would exceed a
//! limit. Counts are never cached — every check and every [`LimitAssets`]
//! access re-queries the registry, so answers always reflect current state.

#![deny(unsafe_code)]

pub mod evaluator;
pub mod limit;
pub mod value;

// Re-exports
pub use evaluator::{Evaluation, LimitAssets, LimitEnforcer};
pub use limit::{Limit, LimitProvider};
pub use value::LimitValue;
