//! Quota buckets

use std::fmt;
use waygate_types::{Warp, WarpKind};

/// One countable bucket within a limit
///
/// Each value carries its own membership predicate over warps. `Total`
/// counts every warp; the other two count one visibility kind each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitValue {
    Total,
    Public,
    Private,
}

impl LimitValue {
    /// The order in which values are checked. Evaluation reports the first
    /// exceeded value only, so this order is part of the contract.
    pub const EVALUATION_ORDER: [LimitValue; 3] =
        [LimitValue::Total, LimitValue::Public, LimitValue::Private];

    /// Whether a warp of `kind` counts toward this value.
    pub fn covers_kind(self, kind: WarpKind) -> bool {
        match self {
            LimitValue::Total => true,
            LimitValue::Public => kind == WarpKind::Public,
            LimitValue::Private => kind == WarpKind::Private,
        }
    }

    /// Membership predicate over live warps.
    pub fn covers(self, warp: &Warp) -> bool {
        self.covers_kind(warp.kind)
    }
}

impl fmt::Display for LimitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitValue::Total => write!(f, "total"),
            LimitValue::Public => write!(f, "public"),
            LimitValue::Private => write!(f, "private"),
        }
    }
}
