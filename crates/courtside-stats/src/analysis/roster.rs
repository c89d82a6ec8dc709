// Roster grouping by coarse position.

use crate::player::PlayerSeasonRecord;
use crate::position::PositionTable;

/// Players bucketed by coarse position, borrowing from the roster snapshot.
pub type PositionGroups<'a> = PositionTable<Vec<&'a PlayerSeasonRecord>>;

/// Partition a roster into Guard / Forward / Center buckets in one pass.
///
/// Players whose role does not classify are left out of every bucket. All
/// three buckets are always present, and each keeps the roster's relative
/// order.
pub fn group(players: &[PlayerSeasonRecord]) -> PositionGroups<'_> {
    let mut groups = PositionGroups::default();
    for player in players {
        if let Some(pos) = player.position() {
            groups[pos].push(player);
        }
    }
    groups
}
