// Library root: snapshot loading, the scoring run and report rendering,
// exposed so integration tests can drive a run without the binary.

pub mod report;
pub mod run;
pub mod snapshot;
