//! Fixed quality tiers and per-video availability.

use std::collections::HashSet;

use crate::model::Format;

/// Every tier the interface offers, in display order.
pub const QUALITY_TIERS: [&str; 6] = ["2160p", "1440p", "1080p", "720p", "480p", "audio"];

/// Human-readable label for a tier.
pub fn quality_label(quality: &str) -> &str {
    match quality {
        "audio" => "Audio Only",
        other => other,
    }
}

/// Which tiers the currently loaded video offers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Availability {
    offered: HashSet<String>,
}

impl Availability {
    pub fn is_available(&self, quality: &str) -> bool {
        self.offered.contains(quality)
    }

    /// `(tier, available)` for every displayable tier.
    pub fn tiers(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        QUALITY_TIERS
            .iter()
            .map(move |tier| (*tier, self.is_available(tier)))
    }

    pub fn available_count(&self) -> usize {
        QUALITY_TIERS
            .iter()
            .filter(|tier| self.is_available(tier))
            .count()
    }
}

/// Computes availability from scratch for a freshly loaded format list.
pub fn derive_availability(formats: &[Format]) -> Availability {
    Availability {
        offered: formats.iter().map(|f| f.quality.clone()).collect(),
    }
}
