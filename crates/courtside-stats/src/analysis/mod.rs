// Positional analysis engine: grouping, domain averages, strength/weakness
// classification, and season-over-season progression.

pub mod averages;
pub mod comparison;
pub mod progression;
pub mod roster;
