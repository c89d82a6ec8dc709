// Position-level averages for the four statistical domains.
//
// Every domain is declared once as a list of record fields; a single generic
// reduction computes the per-field arithmetic mean for a bucket of players.
// Empty buckets produce all-zero records so downstream comparison never has
// to deal with a missing average (it will, however, compare against 0).

use crate::analysis::roster::{group, PositionGroups};
use crate::player::{PlayerSeasonRecord, StatField};
use crate::position::{Position, PositionTable};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Domains
// ---------------------------------------------------------------------------

/// The four statistical domains averaged per position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    Shooting,
    Defensive,
    Playmaking,
    Offensive,
}

impl Domain {
    pub const ALL: [Domain; 4] = [
        Domain::Shooting,
        Domain::Defensive,
        Domain::Playmaking,
        Domain::Offensive,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Domain::Shooting => "Shooting",
            Domain::Defensive => "Defensive",
            Domain::Playmaking => "Playmaking",
            Domain::Offensive => "Offensive",
        }
    }

    /// Fields averaged for this domain, in declaration order.
    pub fn fields(&self) -> &'static [StatField] {
        match self {
            Domain::Shooting => ShootingAverages::FIELDS,
            Domain::Defensive => DefensiveAverages::FIELDS,
            Domain::Playmaking => PlaymakingAverages::FIELDS,
            Domain::Offensive => OffensiveAverages::FIELDS,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A fixed-shape average record for one domain.
pub trait DomainAverages: Clone + Default + fmt::Debug {
    const DOMAIN: Domain;
    /// Record fields averaged by this domain, in struct order.
    const FIELDS: &'static [StatField];

    /// Build the record from means listed in `FIELDS` order. Missing
    /// entries are treated as 0.
    fn from_means(means: &[f64]) -> Self;

    /// Averaged value for `field`, or `None` if this domain does not track it.
    fn get(&self, field: StatField) -> Option<f64>;
}

macro_rules! domain_averages {
    (
        $(#[$meta:meta])*
        $name:ident: $domain:expr => { $($member:ident: $stat:ident),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            $(pub $member: f64,)+
        }

        impl DomainAverages for $name {
            const DOMAIN: Domain = $domain;
            const FIELDS: &'static [StatField] = &[$(StatField::$stat),+];

            fn from_means(means: &[f64]) -> Self {
                let mut it = means.iter().copied();
                $name {
                    $($member: it.next().unwrap_or(0.0),)+
                }
            }

            fn get(&self, field: StatField) -> Option<f64> {
                match field {
                    $(StatField::$stat => Some(self.$member),)+
                    _ => None,
                }
            }
        }
    };
}

domain_averages! {
    /// Shooting averages. `efg`/`ts_per` are 0-100, the rest 0-1 fractions.
    ShootingAverages: Domain::Shooting => {
        efg: Efg,
        ts_per: TsPer,
        tp_per: TpPer,
        two_p_per: TwoPPer,
        ft_per: FtPer,
    }
}

domain_averages! {
    /// Defensive averages. `drtg` is lower-is-better.
    DefensiveAverages: Domain::Defensive => {
        stl_per: StlPer,
        blk_per: BlkPer,
        drb_per: DrbPer,
        drtg: Drtg,
        dbpm: Dbpm,
    }
}

domain_averages! {
    /// Playmaking averages. `to_per` is lower-is-better.
    PlaymakingAverages: Domain::Playmaking => {
        ast_per: AstPer,
        to_per: ToPer,
        ast_tov: AstTov,
        usg: Usg,
    }
}

domain_averages! {
    OffensiveAverages: Domain::Offensive => {
        ortg: Ortg,
        usg: Usg,
    }
}

// ---------------------------------------------------------------------------
// Reduction
// ---------------------------------------------------------------------------

/// Arithmetic mean of `field` across `bucket`; 0 for an empty bucket.
pub fn mean_of(bucket: &[&PlayerSeasonRecord], field: StatField) -> f64 {
    if bucket.is_empty() {
        return 0.0;
    }
    let total: f64 = bucket.iter().map(|p| field.value(p)).sum();
    total / bucket.len() as f64
}

/// Average every field of domain `D` across one position bucket.
pub fn average_for<D: DomainAverages>(bucket: &[&PlayerSeasonRecord]) -> D {
    let means: Vec<f64> = D::FIELDS.iter().map(|&f| mean_of(bucket, f)).collect();
    D::from_means(&means)
}

/// One domain's averages for every position, from an existing grouping.
pub fn position_table<D: DomainAverages>(groups: &PositionGroups<'_>) -> PositionTable<D> {
    groups.map(|_, bucket| average_for::<D>(bucket))
}

/// Averages for all four domains at every position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllPositionAverages {
    pub shooting: PositionTable<ShootingAverages>,
    pub defensive: PositionTable<DefensiveAverages>,
    pub playmaking: PositionTable<PlaymakingAverages>,
    pub offensive: PositionTable<OffensiveAverages>,
}

impl AllPositionAverages {
    /// Reduce all four domains from one shared grouping.
    pub fn from_groups(groups: &PositionGroups<'_>) -> Self {
        AllPositionAverages {
            shooting: position_table(groups),
            defensive: position_table(groups),
            playmaking: position_table(groups),
            offensive: position_table(groups),
        }
    }

    /// Position average of `field` within `domain`, if that domain tracks it.
    pub fn reference(&self, position: Position, domain: Domain, field: StatField) -> Option<f64> {
        match domain {
            Domain::Shooting => self.shooting[position].get(field),
            Domain::Defensive => self.defensive[position].get(field),
            Domain::Playmaking => self.playmaking[position].get(field),
            Domain::Offensive => self.offensive[position].get(field),
        }
    }
}

/// Group the roster once and compute every domain's position averages.
pub fn compute_all(players: &[PlayerSeasonRecord]) -> AllPositionAverages {
    let groups = group(players);
    tracing::debug!(
        guards = groups.guard.len(),
        forwards = groups.forward.len(),
        centers = groups.center.len(),
        "computing position averages"
    );
    AllPositionAverages::from_groups(&groups)
}

// ---------------------------------------------------------------------------
// Per-domain comparison
// ---------------------------------------------------------------------------

/// A player's value next to the position average for one field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldComparison {
    pub field: StatField,
    pub player: f64,
    pub average: f64,
    /// `player - average`.
    pub difference: f64,
}

/// A player's domain stats against their position's averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainComparison {
    pub domain: Domain,
    pub position: Position,
    pub fields: Vec<FieldComparison>,
}

/// Compare a player's values for domain `D` with their position's averages.
///
/// Returns `None` when the player's role does not classify.
pub fn compare_domain<D: DomainAverages>(
    player: &PlayerSeasonRecord,
    table: &PositionTable<D>,
) -> Option<DomainComparison> {
    let position = player.position()?;
    let averages = &table[position];
    let fields = D::FIELDS
        .iter()
        .map(|&field| {
            let value = field.value(player);
            let average = averages.get(field).unwrap_or(0.0);
            FieldComparison {
                field,
                player: value,
                average,
                difference: value - average,
            }
        })
        .collect();
    Some(DomainComparison {
        domain: D::DOMAIN,
        position,
        fields,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
