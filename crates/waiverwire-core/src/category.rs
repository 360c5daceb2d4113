// Nine-category scoring model: category identifiers, per-category z-score
// vectors, and the punt set shared by every stage that sums categories.

use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// One of the nine H2H scoring categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    FgPct,
    FtPct,
    Fg3m,
    Pts,
    Reb,
    Ast,
    Stl,
    Blk,
    Tov,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::FgPct,
        Category::FtPct,
        Category::Fg3m,
        Category::Pts,
        Category::Reb,
        Category::Ast,
        Category::Stl,
        Category::Blk,
        Category::Tov,
    ];

    pub fn index(self) -> usize {
        match self {
            Category::FgPct => 0,
            Category::FtPct => 1,
            Category::Fg3m => 2,
            Category::Pts => 3,
            Category::Reb => 4,
            Category::Ast => 5,
            Category::Stl => 6,
            Category::Blk => 7,
            Category::Tov => 8,
        }
    }

    /// Short display label.
    pub fn label(self) -> &'static str {
        match self {
            Category::FgPct => "FG%",
            Category::FtPct => "FT%",
            Category::Fg3m => "3PM",
            Category::Pts => "PTS",
            Category::Reb => "REB",
            Category::Ast => "AST",
            Category::Stl => "STL",
            Category::Blk => "BLK",
            Category::Tov => "TO",
        }
    }

    /// Parse a category name as it appears in config files or provider data.
    /// Accepts display labels and the common long-form aliases.
    pub fn from_name(name: &str) -> Option<Category> {
        let key = name.trim().to_ascii_uppercase().replace(['_', ' '], "");
        match key.as_str() {
            "FG%" | "FGPCT" | "FG" => Some(Category::FgPct),
            "FT%" | "FTPCT" | "FT" => Some(Category::FtPct),
            "3PM" | "FG3M" | "3PTM" | "3P" => Some(Category::Fg3m),
            "PTS" | "POINTS" => Some(Category::Pts),
            "REB" | "REBOUNDS" => Some(Category::Reb),
            "AST" | "ASSISTS" => Some(Category::Ast),
            "STL" | "STEALS" => Some(Category::Stl),
            "BLK" | "BLOCKS" => Some(Category::Blk),
            "TO" | "TOV" | "TURNOVERS" => Some(Category::Tov),
            _ => None,
        }
    }

    /// Shooting percentages are valued through an attempts-weighted impact
    /// transform instead of the raw rate.
    pub fn is_percentage(self) -> bool {
        matches!(self, Category::FgPct | Category::FtPct)
    }

    pub fn lower_is_better(self) -> bool {
        self == Category::Tov
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Punt set
// ---------------------------------------------------------------------------

/// Categories deliberately ignored by a roster strategy.
///
/// Z_Total, need selection, momentum deltas and roster impact all iterate
/// `PuntSet::active()`, so every stage agrees on which categories count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PuntSet(BTreeSet<Category>);

impl PuntSet {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_categories<I: IntoIterator<Item = Category>>(cats: I) -> Self {
        PuntSet(cats.into_iter().collect())
    }

    pub fn contains(&self, cat: Category) -> bool {
        self.0.contains(&cat)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        self.0.iter().copied()
    }

    /// Non-punted categories in canonical order.
    pub fn active(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL.into_iter().filter(|c| !self.contains(*c))
    }
}

// ---------------------------------------------------------------------------
// Per-category z-scores
// ---------------------------------------------------------------------------

/// Signed z-score per category.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CategoryZScores([f64; 9]);

impl CategoryZScores {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn get(&self, cat: Category) -> f64 {
        self.0[cat.index()]
    }

    pub fn set(&mut self, cat: Category, z: f64) {
        self.0[cat.index()] = z;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Sum over categories not in the punt set.
    pub fn total(&self, punts: &PuntSet) -> f64 {
        punts.active().map(|c| self.get(c)).sum()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_all_order() {
        for (i, cat) in Category::ALL.iter().enumerate() {
            assert_eq!(cat.index(), i);
        }
    }

    #[test]
    fn from_name_accepts_aliases() {
        assert_eq!(Category::from_name("FG%"), Some(Category::FgPct));
        assert_eq!(Category::from_name("fg_pct"), Some(Category::FgPct));
        assert_eq!(Category::from_name("FG3M"), Some(Category::Fg3m));
        assert_eq!(Category::from_name(" to "), Some(Category::Tov));
        assert_eq!(Category::from_name("TOV"), Some(Category::Tov));
        assert_eq!(Category::from_name("Blocks"), Some(Category::Blk));
        assert_eq!(Category::from_name("HR"), None);
    }

    #[test]
    fn only_turnovers_are_inverted() {
        let inverted: Vec<Category> = Category::ALL
            .into_iter()
            .filter(|c| c.lower_is_better())
            .collect();
        assert_eq!(inverted, vec![Category::Tov]);
    }

    #[test]
    fn total_skips_punted_categories() {
        let mut z = CategoryZScores::zero();
        z.set(Category::Pts, 1.5);
        z.set(Category::FtPct, -2.0);
        z.set(Category::Blk, 0.5);

        assert!((z.total(&PuntSet::none()) - 0.0).abs() < 1e-12);

        let punts = PuntSet::from_categories([Category::FtPct]);
        assert!((z.total(&punts) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn active_excludes_punts_in_canonical_order() {
        let punts = PuntSet::from_categories([Category::Tov, Category::FgPct]);
        let active: Vec<Category> = punts.active().collect();
        assert_eq!(active.len(), 7);
        assert_eq!(active[0], Category::FtPct);
        assert_eq!(active[6], Category::Blk);
    }
}
