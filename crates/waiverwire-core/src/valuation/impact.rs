// Add/drop preview: per-category z-score deltas.

use crate::category::{Category, CategoryZScores, PuntSet};

#[derive(Debug, Clone, PartialEq)]
pub struct RosterImpact {
    /// `z_add - z_drop` for every non-punted category, canonical order.
    pub deltas: Vec<(Category, f64)>,
    pub net: f64,
}

impl RosterImpact {
    pub fn delta(&self, cat: Category) -> Option<f64> {
        self.deltas.iter().find(|(c, _)| *c == cat).map(|(_, d)| *d)
    }

    /// Categories the swap improves, largest gain first.
    pub fn gains(&self) -> Vec<(Category, f64)> {
        let mut out: Vec<(Category, f64)> =
            self.deltas.iter().copied().filter(|(_, d)| *d > 0.0).collect();
        out.sort_by(|a, b| b.1.total_cmp(&a.1));
        out
    }

    /// Categories the swap hurts, largest loss first.
    pub fn losses(&self) -> Vec<(Category, f64)> {
        let mut out: Vec<(Category, f64)> =
            self.deltas.iter().copied().filter(|(_, d)| *d < 0.0).collect();
        out.sort_by(|a, b| a.1.total_cmp(&b.1));
        out
    }
}

/// Pure preview of adding one player and dropping another.
pub fn roster_impact(
    add: &CategoryZScores,
    drop: &CategoryZScores,
    punts: &PuntSet,
) -> RosterImpact {
    let deltas: Vec<(Category, f64)> = punts
        .active()
        .map(|c| (c, add.get(c) - drop.get(c)))
        .collect();
    let net = deltas.iter().map(|(_, d)| d).sum();
    RosterImpact { deltas, net }
}
