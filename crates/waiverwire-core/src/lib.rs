// Library root: the waiver-wire scoring engine and its configuration.

pub mod category;
pub mod config;
pub mod faab;
pub mod league;
pub mod names;
pub mod textmatch;
pub mod valuation;
