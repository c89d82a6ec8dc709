// Coarse position classification (Guard / Forward / Center).
//
// The source dataset labels every player with a granular role ("Pure PG",
// "Stretch 4", ...). Aggregation works on three coarse buckets derived from
// that label through a closed, exact-match table. Roles missing from the
// table are unknown and never defaulted into a bucket.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Coarse basketball position used for all positional aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "G")]
    Guard,
    #[serde(rename = "F")]
    Forward,
    #[serde(rename = "C")]
    Center,
}

/// Granular role labels and the coarse position each maps to.
const ROLE_TABLE: &[(&str, Position)] = &[
    ("Pure PG", Position::Guard),
    ("Scoring PG", Position::Guard),
    ("Combo G", Position::Guard),
    ("Wing G", Position::Guard),
    ("Wing F", Position::Forward),
    ("Stretch 4", Position::Forward),
    ("PF/C", Position::Forward),
    ("C", Position::Center),
];

impl Position {
    /// All positions in display order.
    pub const ALL: [Position; 3] = [Position::Guard, Position::Forward, Position::Center];

    /// Classify a granular role label. Exact match only; unknown roles
    /// return `None` and must be excluded from aggregation by the caller.
    pub fn from_role(role: &str) -> Option<Self> {
        ROLE_TABLE
            .iter()
            .find(|(label, _)| *label == role)
            .map(|(_, pos)| *pos)
    }

    /// Parse the single-letter position code ("G", "F", "C"), case-insensitive.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "G" => Some(Position::Guard),
            "F" => Some(Position::Forward),
            "C" => Some(Position::Center),
            _ => None,
        }
    }

    /// Single-letter code.
    pub fn code(&self) -> &'static str {
        match self {
            Position::Guard => "G",
            Position::Forward => "F",
            Position::Center => "C",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Position::Guard => "Guard",
            Position::Forward => "Forward",
            Position::Center => "Center",
        }
    }

    /// Every granular role that maps to this position.
    pub fn roles(&self) -> impl Iterator<Item = &'static str> + '_ {
        ROLE_TABLE
            .iter()
            .filter(move |(_, pos)| pos == self)
            .map(|(label, _)| *label)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_code(s).ok_or_else(|| format!("unknown position '{s}' (expected G, F or C)"))
    }
}

// ---------------------------------------------------------------------------
// PositionTable
// ---------------------------------------------------------------------------

/// One value per coarse position. Always fully populated, so lookups by
/// position never fail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionTable<T> {
    #[serde(rename = "G")]
    pub guard: T,
    #[serde(rename = "F")]
    pub forward: T,
    #[serde(rename = "C")]
    pub center: T,
}

impl<T> PositionTable<T> {
    /// Build a table by evaluating `f` once per position.
    pub fn from_fn(mut f: impl FnMut(Position) -> T) -> Self {
        PositionTable {
            guard: f(Position::Guard),
            forward: f(Position::Forward),
            center: f(Position::Center),
        }
    }

    pub fn get(&self, position: Position) -> &T {
        match position {
            Position::Guard => &self.guard,
            Position::Forward => &self.forward,
            Position::Center => &self.center,
        }
    }

    pub fn get_mut(&mut self, position: Position) -> &mut T {
        match position {
            Position::Guard => &mut self.guard,
            Position::Forward => &mut self.forward,
            Position::Center => &mut self.center,
        }
    }

    /// Map every entry, keeping the position keys.
    pub fn map<U>(&self, mut f: impl FnMut(Position, &T) -> U) -> PositionTable<U> {
        PositionTable::from_fn(|pos| f(pos, self.get(pos)))
    }

    /// Iterate `(position, value)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &T)> {
        Position::ALL.into_iter().map(move |pos| (pos, self.get(pos)))
    }
}

impl<T> Index<Position> for PositionTable<T> {
    type Output = T;

    fn index(&self, position: Position) -> &T {
        self.get(position)
    }
}

impl<T> IndexMut<Position> for PositionTable<T> {
    fn index_mut(&mut self, position: Position) -> &mut T {
        self.get_mut(position)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
