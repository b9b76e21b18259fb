//! Order status and its display treatment.

use serde::{Deserialize, Serialize};

/// Order lifecycle status as reported by the order service.
///
/// Any value the service sends that is not one of the known statuses is
/// collected into [`OrderStatus::Unknown`] rather than failing the page, and
/// so is a missing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    #[default]
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Visual treatment for the status badge.
    ///
    /// Unrecognized statuses share the pending treatment.
    #[must_use]
    pub const fn badge(self) -> StatusBadge {
        match self {
            Self::Pending | Self::Unknown => StatusBadge {
                label: "Pending",
                tone: BadgeTone::Warning,
            },
            Self::Processing => StatusBadge {
                label: "Processing",
                tone: BadgeTone::Info,
            },
            Self::Shipped => StatusBadge {
                label: "Shipped",
                tone: BadgeTone::Accent,
            },
            Self::Delivered => StatusBadge {
                label: "Delivered",
                tone: BadgeTone::Success,
            },
            Self::Cancelled => StatusBadge {
                label: "Cancelled",
                tone: BadgeTone::Danger,
            },
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Shipped => write!(f, "shipped"),
            Self::Delivered => write!(f, "delivered"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Colour family a presentation layer maps onto its own palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    Warning,
    Info,
    Accent,
    Success,
    Danger,
}

/// Badge shown next to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    /// Human-readable status label.
    pub label: &'static str,
    /// Visual tone.
    pub tone: BadgeTone,
}
