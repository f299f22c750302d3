//! Main-axis size resolution for a single line.
//!
//! Two regimes, chosen per line:
//!
//! 1. **Grow**: the line has flexible weight and more room than its preferred
//!    extent. Every box gets its preferred size plus a share of the extra
//!    space proportional to its weight, so the line fills the extent exactly.
//! 2. **Interpolate**: otherwise every box is placed on the same point
//!    between its min and preferred size. Boxes never go below min; if the
//!    line cannot fit at min it overflows.

use smallvec::SmallVec;

use combi_core::{non_negative, SizeMetrics};

/// Per-line size buffer. Most lines hold a handful of boxes.
pub type SizeBuffer = SmallVec<[f64; 8]>;

/// Summed metrics of the boxes on a line.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineTotals {
    pub min: f64,
    pub preferred: f64,
    pub flexible: f64,
    /// Spacing between the boxes
    pub spacing: f64,
}

impl LineTotals {
    pub fn of(items: &[SizeMetrics], spacing: f64) -> Self {
        let mut totals = items.iter().fold(LineTotals::default(), |acc, item| LineTotals {
            min: acc.min + item.min,
            preferred: acc.preferred + item.preferred,
            flexible: acc.flexible + item.flexible,
            spacing: 0.0,
        });
        totals.spacing = spacing * items.len().saturating_sub(1) as f64;
        totals
    }

    /// Main extent of the line with every box at min.
    pub fn min_extent(&self) -> f64 {
        self.min + self.spacing
    }

    /// Main extent of the line with every box at preferred.
    pub fn preferred_extent(&self) -> f64 {
        self.preferred + self.spacing
    }
}

/// How a line's sizes were resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Regime {
    /// Extra space handed out by flexible weight
    Grow { extra: f64 },
    /// Sizes interpolated between min and preferred
    Interpolate { t: f64 },
}

/// Resolved main sizes of one line.
#[derive(Debug, Clone, PartialEq)]
pub struct MainAxisSizes {
    pub sizes: SizeBuffer,
    pub regime: Regime,
}

impl MainAxisSizes {
    /// Sum of the resolved sizes.
    pub fn total(&self) -> f64 {
        self.sizes.iter().sum()
    }
}

/// Resolve the main size of each box on a line.
///
/// `available_main` is the content extent of the container. Negative or NaN
/// extents are treated as zero; an infinite extent (sizing to content) leaves
/// every box at its preferred size.
pub fn resolve_main_sizes(items: &[SizeMetrics], available_main: f64, spacing: f64) -> MainAxisSizes {
    let totals = LineTotals::of(items, spacing);
    let available = if available_main == f64::INFINITY {
        totals.preferred_extent()
    } else {
        non_negative(available_main)
    };

    if available > totals.preferred_extent() && totals.flexible > 0.0 {
        let extra = available - totals.preferred_extent();
        let sizes = items
            .iter()
            .map(|item| item.preferred + extra * (item.flexible / totals.flexible))
            .collect();
        return MainAxisSizes { sizes, regime: Regime::Grow { extra } };
    }

    let range = totals.preferred - totals.min;
    let t = if range > 0.0 {
        ((available - totals.min_extent()) / range).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let sizes = items
        .iter()
        .map(|item| lerp(item.min, item.preferred, t))
        .collect();
    MainAxisSizes { sizes, regime: Regime::Interpolate { t } }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
