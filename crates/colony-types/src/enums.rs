//! Enumeration types shared by every colony crate.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

/// The type of a queued job, without its payload.
///
/// Capability profiles list the kinds an agent may perform; the worker loop
/// matches a job against that list via [`Task::kind`].
///
/// [`Task::kind`]: crate::job::Task::kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum JobKind {
    /// Harvest energy from a source until full.
    MineEnergy,
    /// Carry energy into a structure with free capacity.
    StoreEnergy,
    /// Spend carried energy on the room controller.
    UpgradeController,
    /// Spend carried energy on a construction site.
    BuildStructure,
}

impl JobKind {
    /// Every job kind, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::MineEnergy,
        Self::StoreEnergy,
        Self::UpgradeController,
        Self::BuildStructure,
    ];
}

impl core::fmt::Display for JobKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::MineEnergy => "MineEnergy",
            Self::StoreEnergy => "StoreEnergy",
            Self::UpgradeController => "UpgradeController",
            Self::BuildStructure => "BuildStructure",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Bodies and structures
// ---------------------------------------------------------------------------

/// A single part of a worker's physical build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    /// Harvests, builds, and upgrades.
    Work,
    /// Adds carry capacity.
    Carry,
    /// Allows movement.
    Move,
}

impl BodyPart {
    /// Energy cost to spawn this part.
    pub const fn cost(self) -> u32 {
        match self {
            Self::Work => 100,
            Self::Carry | Self::Move => 50,
        }
    }

    /// Total spawn cost of a body, saturating at `u32::MAX`.
    pub fn body_cost(body: &[Self]) -> u32 {
        body.iter()
            .fold(0_u32, |total, part| total.saturating_add(part.cost()))
    }
}

/// The kind of structure a construction site will become.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    /// Cheap movement infrastructure, seeded along supply routes.
    Road,
    /// Extra energy storage for spawning.
    Extension,
}

// ---------------------------------------------------------------------------
// World action outcomes
// ---------------------------------------------------------------------------

/// Failure codes returned by world actions other than "not in range".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// The acting entity or target does not exist.
    NotFound,
    /// Not enough energy to perform the action.
    NotEnoughEnergy,
    /// The target cannot accept this action.
    InvalidTarget,
    /// The target has no free capacity.
    Full,
    /// Invalid arguments, such as an empty body or an occupied tile.
    InvalidArgs,
    /// The actor lacks the required body part.
    NoBodyPart,
}

impl core::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            Self::NotFound => "not found",
            Self::NotEnoughEnergy => "not enough energy",
            Self::InvalidTarget => "invalid target",
            Self::Full => "full",
            Self::InvalidArgs => "invalid arguments",
            Self::NoBodyPart => "no body part",
        };
        f.write_str(text)
    }
}

/// Result of a single world action.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionOutcome {
    /// The action took effect.
    Ok,
    /// The target is out of range; the actor should move closer.
    NotInRange,
    /// The action failed for another reason.
    Failed(ErrorCode),
}

impl ActionOutcome {
    /// Whether the action took effect.
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl core::fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Ok => f.write_str("ok"),
            Self::NotInRange => f.write_str("not in range"),
            Self::Failed(code) => write!(f, "{code}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_cost_sums_parts() {
        let body = [BodyPart::Work, BodyPart::Carry, BodyPart::Move, BodyPart::Move];
        assert_eq!(BodyPart::body_cost(&body), 250);
        assert_eq!(BodyPart::body_cost(&[]), 0);
    }

    #[test]
    fn outcome_display_is_human_readable() {
        assert_eq!(ActionOutcome::NotInRange.to_string(), "not in range");
        assert_eq!(
            ActionOutcome::Failed(ErrorCode::NotEnoughEnergy).to_string(),
            "not enough energy"
        );
        assert!(ActionOutcome::Ok.is_ok());
        assert!(!ActionOutcome::Failed(ErrorCode::Full).is_ok());
    }
}
