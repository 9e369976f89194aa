//! Order Status

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::properties::UnknownVariant;

/// Lifecycle state of an order.
///
/// ```text
/// draft ──submit──▶ formed ──approve──▶ completed
///   │                  └─────reject───▶ rejected
///   └──soft delete──▶ deleted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Draft,
    Formed,
    Completed,
    Rejected,
    Deleted,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Draft,
        Self::Formed,
        Self::Completed,
        Self::Rejected,
        Self::Deleted,
    ];

    /// Storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Formed => "formed",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
            Self::Deleted => "deleted",
        }
    }

    /// The only status a transition into `self` may leave. The whole
    /// transition table lives here; `draft` is never entered.
    pub const fn source(self) -> Option<Self> {
        match self {
            Self::Draft => None,
            Self::Formed | Self::Deleted => Some(Self::Draft),
            Self::Completed | Self::Rejected => Some(Self::Formed),
        }
    }

    /// Whether the machine has an edge from `self` to `next`.
    pub fn can_transition_to(self, next: Self) -> bool {
        next.source() == Some(self)
    }

    /// Lines and client details may only change while drafting.
    pub const fn is_mutable(self) -> bool {
        matches!(self, Self::Draft)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "order status",
                value: s.to_string(),
            })
    }
}
