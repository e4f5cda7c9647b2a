//! Axis-system harmony.
//!
//! For a root R, each harmonic function (tonic, subdominant, dominant) has a
//! primary and a secondary pitch, and each of those comes paired with its
//! tritone substitute. The offsets below are the axis contract the deck
//! presents; they are not derived from anything else.
//!
//! | Role        | Primary      | Secondary   |
//! |-------------|--------------|-------------|
//! | tonic       | R            | forward(3)  |
//! | subdominant | backward(1)  | forward(2)  |
//! | dominant    | forward(1)   | forward(4)  |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pitch::{tritone_sub, CircleOfFifths, Pitch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Tonic,
    Subdominant,
    Dominant,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Tonic, Role::Subdominant, Role::Dominant];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    Primary,
    Secondary,
}

impl Rank {
    pub const ALL: [Rank; 2] = [Rank::Primary, Rank::Secondary];
}

/// A pitch and its tritone substitute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RolePair {
    pub pitch: Pitch,
    pub substitute: Pitch,
}

impl RolePair {
    pub fn of(pitch: Pitch) -> Self {
        Self {
            pitch,
            substitute: tritone_sub(pitch),
        }
    }
}

impl fmt::Display for RolePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.pitch, self.substitute)
    }
}

/// The harmonic axis around a root. Holds nothing but the root; every pair
/// is recomputed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Axis {
    circle: CircleOfFifths,
}

impl Axis {
    pub fn new(root: Pitch) -> Self {
        Self {
            circle: CircleOfFifths::new(root),
        }
    }

    pub fn root(&self) -> Pitch {
        self.circle.root()
    }

    pub fn pair(&self, role: Role, rank: Rank) -> RolePair {
        let pitch = match (role, rank) {
            (Role::Tonic, Rank::Primary) => self.circle.root(),
            (Role::Tonic, Rank::Secondary) => self.circle.forward(3),
            (Role::Subdominant, Rank::Primary) => self.circle.backward(1),
            (Role::Subdominant, Rank::Secondary) => self.circle.forward(2),
            (Role::Dominant, Rank::Primary) => self.circle.forward(1),
            (Role::Dominant, Rank::Secondary) => self.circle.forward(4),
        };
        RolePair::of(pitch)
    }

    pub fn tonic_primary(&self) -> RolePair {
        self.pair(Role::Tonic, Rank::Primary)
    }

    pub fn tonic_secondary(&self) -> RolePair {
        self.pair(Role::Tonic, Rank::Secondary)
    }

    pub fn subdominant_primary(&self) -> RolePair {
        self.pair(Role::Subdominant, Rank::Primary)
    }

    pub fn subdominant_secondary(&self) -> RolePair {
        self.pair(Role::Subdominant, Rank::Secondary)
    }

    pub fn dominant_primary(&self) -> RolePair {
        self.pair(Role::Dominant, Rank::Primary)
    }

    pub fn dominant_secondary(&self) -> RolePair {
        self.pair(Role::Dominant, Rank::Secondary)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Axis(root={}, tonic_primary={}, tonic_secondary={}, \
             subdominant_primary={}, subdominant_secondary={}, \
             dominant_primary={}, dominant_secondary={})",
            self.root(),
            self.tonic_primary(),
            self.tonic_secondary(),
            self.subdominant_primary(),
            self.subdominant_secondary(),
            self.dominant_primary(),
            self.dominant_secondary(),
        )
    }
}
