// Strength / weakness classification against position averages.
//
// Each tracked metric is checked against the player's position average with
// a 10% multiplicative margin in the metric's favorable direction. A metric
// yields at most one finding. Findings keep the fixed rule order (shooting,
// defensive, playmaking, offensive); nothing is sorted by magnitude.

use crate::analysis::averages::{AllPositionAverages, Domain};
use crate::player::{PlayerSeasonRecord, Polarity, StatField};
use crate::position::Position;
use serde::{Deserialize, Serialize};

/// Upper multiplier: beyond `avg * 1.1` in the metric's direction.
pub const SIGNIFICANT_FACTOR: f64 = 1.1;
/// Lower multiplier: beyond `avg * 0.9` in the metric's direction.
pub const NEGLIGIBLE_FACTOR: f64 = 0.9;

// ---------------------------------------------------------------------------
// Threshold rules
// ---------------------------------------------------------------------------

/// Whether `value` is a strength relative to `average`. Boundaries are
/// exclusive.
pub fn is_strength(value: f64, average: f64, polarity: Polarity) -> bool {
    match polarity {
        Polarity::HigherIsBetter => value > average * SIGNIFICANT_FACTOR,
        Polarity::LowerIsBetter => value < average * NEGLIGIBLE_FACTOR,
    }
}

/// Whether `value` is a weakness relative to `average`.
///
/// A value of exactly 0 is treated as missing data and never flagged. The
/// strength check has no such guard, so a 0 on a lower-is-better metric
/// still reads as a strength; that asymmetry is kept on purpose until
/// product decides otherwise.
pub fn is_weakness(value: f64, average: f64, polarity: Polarity) -> bool {
    if value == 0.0 {
        return false;
    }
    match polarity {
        Polarity::HigherIsBetter => value < average * NEGLIGIBLE_FACTOR,
        Polarity::LowerIsBetter => value > average * SIGNIFICANT_FACTOR,
    }
}

// ---------------------------------------------------------------------------
// Findings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FindingPolarity {
    Strength,
    Weakness,
}

/// One classified metric for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonFinding {
    pub metric: StatField,
    pub label: String,
    /// Player's value, formatted for display.
    pub observed: String,
    /// Position average, formatted for display.
    pub reference: String,
    pub polarity: FindingPolarity,
}

/// Strengths and weaknesses for a single player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrengthReport {
    /// `None` when the player's role does not classify; the report is then empty.
    pub position: Option<Position>,
    pub strengths: Vec<ComparisonFinding>,
    pub weaknesses: Vec<ComparisonFinding>,
}

impl StrengthReport {
    pub fn is_empty(&self) -> bool {
        self.strengths.is_empty() && self.weaknesses.is_empty()
    }
}

/// How a metric's value is rendered in a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    /// 0-1 fraction shown as a percentage.
    Fraction,
    /// Already 0-100, shown with a `%` and optional suffix.
    Percent(&'static str),
    /// Plain number with a unit suffix.
    Rating(&'static str),
}

impl Format {
    fn render(&self, value: f64) -> String {
        match *self {
            Format::Fraction => format!("{:.1}%", value * 100.0),
            Format::Percent("") => format!("{value:.1}%"),
            Format::Percent(suffix) => format!("{value:.1}% {suffix}"),
            Format::Rating(unit) => format!("{value:.1} {unit}"),
        }
    }
}

/// A single metric check.
#[derive(Debug, Clone, Copy)]
struct ComparisonRule {
    domain: Domain,
    metric: StatField,
    format: Format,
    strength_label: &'static str,
    weakness_label: &'static str,
}

/// Checked in this order; findings are appended in the same order.
const RULES: &[ComparisonRule] = &[
    ComparisonRule {
        domain: Domain::Shooting,
        metric: StatField::TpPer,
        format: Format::Fraction,
        strength_label: "Strong 3-point shooter",
        weakness_label: "Below-average 3-point shooter",
    },
    ComparisonRule {
        domain: Domain::Shooting,
        metric: StatField::FtPer,
        format: Format::Fraction,
        strength_label: "Strong free throw shooter",
        weakness_label: "Below-average free throw shooter",
    },
    ComparisonRule {
        domain: Domain::Defensive,
        metric: StatField::StlPer,
        format: Format::Percent(""),
        strength_label: "Excellent steal rate",
        weakness_label: "Below-average steal rate",
    },
    ComparisonRule {
        domain: Domain::Defensive,
        metric: StatField::Drtg,
        format: Format::Rating("DRtg"),
        strength_label: "Strong defensive impact",
        weakness_label: "Below-average defensive impact",
    },
    ComparisonRule {
        domain: Domain::Playmaking,
        metric: StatField::AstPer,
        format: Format::Percent("AST"),
        strength_label: "Excellent playmaker",
        weakness_label: "Below-average playmaking",
    },
    ComparisonRule {
        domain: Domain::Playmaking,
        metric: StatField::ToPer,
        format: Format::Percent("TO"),
        strength_label: "Great ball security",
        weakness_label: "High turnover rate",
    },
    ComparisonRule {
        domain: Domain::Offensive,
        metric: StatField::Ortg,
        format: Format::Rating("ORtg"),
        strength_label: "Strong offensive efficiency",
        weakness_label: "Below-average offensive efficiency",
    },
    ComparisonRule {
        domain: Domain::Offensive,
        metric: StatField::Usg,
        format: Format::Percent("USG"),
        strength_label: "High offensive involvement",
        weakness_label: "Limited offensive role",
    },
];

/// Metrics the comparator checks, in check order.
pub fn tracked_metrics() -> impl Iterator<Item = (Domain, StatField)> {
    RULES.iter().map(|r| (r.domain, r.metric))
}

/// Classify a player's tracked metrics as strengths or weaknesses against
/// their position averages.
///
/// An unclassifiable role produces an empty report rather than falling back
/// to some default position.
pub fn classify(player: &PlayerSeasonRecord, averages: &AllPositionAverages) -> StrengthReport {
    let Some(position) = player.position() else {
        tracing::debug!(
            player = %player.player_name,
            role = %player.role,
            "role does not map to a position; skipping comparison"
        );
        return StrengthReport::default();
    };

    let mut report = StrengthReport {
        position: Some(position),
        ..Default::default()
    };

    for rule in RULES {
        let Some(average) = averages.reference(position, rule.domain, rule.metric) else {
            continue;
        };
        let value = rule.metric.value(player);
        let polarity = rule.metric.polarity();

        let finding_polarity = if is_strength(value, average, polarity) {
            FindingPolarity::Strength
        } else if is_weakness(value, average, polarity) {
            FindingPolarity::Weakness
        } else {
            continue;
        };

        let (label, bucket) = match finding_polarity {
            FindingPolarity::Strength => (rule.strength_label, &mut report.strengths),
            FindingPolarity::Weakness => (rule.weakness_label, &mut report.weaknesses),
        };
        bucket.push(ComparisonFinding {
            metric: rule.metric,
            label: label.to_string(),
            observed: rule.format.render(value),
            reference: format!("Position Avg: {}", rule.format.render(average)),
            polarity: finding_polarity,
        });
    }

    report
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
