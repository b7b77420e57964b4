use serde::{Deserialize, Serialize};

use super::domain::{Signup, SignupStatus};
use crate::domain::Role;

/// Role counts for a roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RosterComposition {
    pub tanks: u32,
    pub healers: u32,
    pub dps: u32,
}

/// Floor below which a roster cannot function.
pub const MINIMUM_VIABLE: RosterComposition = RosterComposition {
    tanks: 2,
    healers: 3,
    dps: 5,
};

/// Full mythic-size roster used when prompting for missing roles.
pub const STANDARD_TARGET: RosterComposition = RosterComposition {
    tanks: 2,
    healers: 4,
    dps: 14,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleShortfall {
    pub role: Role,
    pub missing: u32,
}

impl RosterComposition {
    /// Count confirmed signups by role.
    pub fn analyze(signups: &[Signup]) -> Self {
        signups
            .iter()
            .filter(|signup| signup.status == SignupStatus::Confirmed)
            .fold(Self::default(), |mut composition, signup| {
                match signup.role {
                    Role::Tank => composition.tanks += 1,
                    Role::Healer => composition.healers += 1,
                    Role::Dps => composition.dps += 1,
                }
                composition
            })
    }

    pub fn count(&self, role: Role) -> u32 {
        match role {
            Role::Tank => self.tanks,
            Role::Healer => self.healers,
            Role::Dps => self.dps,
        }
    }

    pub fn total(&self) -> u32 {
        self.tanks + self.healers + self.dps
    }

    pub fn is_viable(&self) -> bool {
        self.meets(&MINIMUM_VIABLE)
    }

    pub fn meets(&self, target: &RosterComposition) -> bool {
        self.missing_roles(target).is_empty()
    }

    /// Shortfall per role against `target`, in tank/healer/dps order.
    pub fn missing_roles(&self, target: &RosterComposition) -> Vec<RoleShortfall> {
        Role::ordered()
            .into_iter()
            .filter_map(|role| {
                let missing = target.count(role).saturating_sub(self.count(role));
                (missing > 0).then_some(RoleShortfall { role, missing })
            })
            .collect()
    }
}
