// League-rule checks that gate a waiver move: the weekly transaction limit
// and injured-list slot eligibility.

use crate::config::IlRules;

// ---------------------------------------------------------------------------
// Transaction limit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionLimitStatus {
    pub used: u32,
    pub limit: u32,
    pub remaining: u32,
    pub at_limit: bool,
    pub message: String,
}

pub fn check_transaction_limit(used: u32, limit: u32) -> TransactionLimitStatus {
    let remaining = limit.saturating_sub(used);
    let at_limit = remaining == 0;
    let message = match remaining {
        0 => format!("Weekly transaction limit reached ({used}/{limit}). Resets Monday."),
        1 => format!("1 transaction remaining this week ({used}/{limit})"),
        n => format!("{n} transactions remaining this week ({used}/{limit})"),
    };
    TransactionLimitStatus {
        used,
        limit,
        remaining,
        at_limit,
        message,
    }
}

// ---------------------------------------------------------------------------
// IL compliance
// ---------------------------------------------------------------------------

/// A rostered player with the lineup slot they occupy and their injury
/// status as the league reports it (empty when healthy).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterSlot {
    pub player: String,
    pub slot: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IlViolation {
    pub player: String,
    pub slot: String,
    /// Reported status, "Healthy" when there is none.
    pub status: String,
    pub eligible: Vec<String>,
}

/// Players in IL or IL+ slots whose status no longer qualifies for the slot.
///
/// The league blocks every add/drop while any of these remain.
pub fn check_il_compliance(roster: &[RosterSlot], rules: &IlRules) -> Vec<IlViolation> {
    roster
        .iter()
        .filter_map(|entry| {
            let eligible = match entry.slot.trim().to_uppercase().as_str() {
                "IL" => &rules.il_eligible,
                "IL+" => &rules.il_plus_eligible,
                _ => return None,
            };
            let status = entry.status.trim().to_uppercase();
            if eligible.iter().any(|s| s.eq_ignore_ascii_case(&status)) {
                return None;
            }
            let mut eligible = eligible.clone();
            eligible.sort();
            Some(IlViolation {
                player: entry.player.clone(),
                slot: entry.slot.trim().to_uppercase(),
                status: if status.is_empty() {
                    "Healthy".to_string()
                } else {
                    status
                },
                eligible,
            })
        })
        .collect()
}
