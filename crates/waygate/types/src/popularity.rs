//! Popularity ordering for warps
//!
//! Listings rank warps by visits decayed over age: a warp's score is
//! `visits / age_in_days^GRAVITY`, so older warps need proportionally more
//! visits to outrank newer ones. Age is always floored at one day; a warp
//! created today scores against a full day, never against zero.
//!
//! Ties fall back to `created_at` (newer first) and then to the name
//! (lexicographic), which makes the ordering total: no two warps with
//! distinct names ever compare equal.

use crate::warp::Warp;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Decay exponent applied to a warp's age in days.
pub const GRAVITY: f64 = 0.8;

/// Popularity score of `warp` as of `now`. Higher is more popular.
pub fn score(warp: &Warp, now: DateTime<Utc>) -> f64 {
    let days = (now - warp.created_at).num_days().max(1) as f64;
    f64::from(warp.visits) / days.powf(GRAVITY)
}

/// Compares two warps by popularity as of `now`, most popular first.
///
/// Callers sorting a listing must pass the same `now` for every comparison;
/// the registry itself never uses this ordering.
pub fn compare(a: &Warp, b: &Warp, now: DateTime<Utc>) -> Ordering {
    score(b, now)
        .total_cmp(&score(a, now))
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.name.cmp(&b.name))
}

/// Sorts a listing in place, most popular first.
pub fn sort_by_popularity(warps: &mut [&Warp], now: DateTime<Utc>) {
    warps.sort_by(|a, b| compare(a, b, now));
}
