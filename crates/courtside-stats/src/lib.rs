// Library root: player records, position classification, the positional
// analysis engine, and dashboard helpers.

pub mod analysis;
pub mod dashboard;
pub mod player;
pub mod position;
