// Role-to-column table. Slot i of ally_/enemy_ columns holds the champion that
// played the i-th role, in TOP, JUNGLE, MID, ADC, SUP order, on that team.

use super::record::{Role, RoleFilter, Team};

const SLOT_TABLE: [(Role, usize); 5] = [
    (Role::Top, 0),
    (Role::Jungle, 1),
    (Role::Mid, 2),
    (Role::Adc, 3),
    (Role::Sup, 4),
];

pub const SLOT_COUNT: usize = SLOT_TABLE.len();

pub fn slot_index(role: Role) -> usize {
    SLOT_TABLE
        .iter()
        .find(|(r, _)| *r == role)
        .map(|(_, slot)| *slot)
        .unwrap_or_default()
}

/// CSV column holding the given team's champion for a slot, e.g. "enemy_3".
pub fn column_name(team: Team, slot: usize) -> String {
    format!("{}_{}", team.column_prefix(), slot + 1)
}

pub fn all_columns(team: Team) -> Vec<String> {
    (0..SLOT_COUNT).map(|slot| column_name(team, slot)).collect()
}

/// Which counterpart columns an aggregation reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterpartSelector {
    pub team: Team,
    pub role: RoleFilter,
}

impl CounterpartSelector {
    pub fn enemy(role: RoleFilter) -> Self {
        CounterpartSelector {
            team: Team::Enemy,
            role,
        }
    }

    pub fn ally(role: RoleFilter) -> Self {
        CounterpartSelector {
            team: Team::Ally,
            role,
        }
    }

    /// Slots to stack for a subject playing `subject_role`.
    ///
    /// An ally selector naming the subject's own role resolves to nothing, and
    /// an ally `Any` selector leaves out the subject's own slot.
    pub fn resolve(self, subject_role: Option<Role>) -> Vec<usize> {
        match (self.team, self.role) {
            (Team::Enemy, RoleFilter::Only(role)) => vec![slot_index(role)],
            (Team::Enemy, RoleFilter::Any) => (0..SLOT_COUNT).collect(),
            (Team::Ally, RoleFilter::Only(role)) if Some(role) == subject_role => Vec::new(),
            (Team::Ally, RoleFilter::Only(role)) => vec![slot_index(role)],
            (Team::Ally, RoleFilter::Any) => {
                let own = subject_role.map(slot_index);
                (0..SLOT_COUNT).filter(|slot| Some(*slot) != own).collect()
            }
        }
    }
}
