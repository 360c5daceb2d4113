// Valuation engine: z-scores, availability, injury, schedule, needs,
// momentum, news, final scoring and add/drop impact.

pub mod availability;
pub mod impact;
pub mod injury;
pub mod momentum;
pub mod needs;
pub mod news;
pub mod schedule;
pub mod scoring;
pub mod zscore;
