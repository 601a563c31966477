//! Worker capability profiles.
//!
//! A [`Configuration`] names a body layout and the job kinds an agent built
//! from it may take. Agents carry only the profile *name* in memory; the
//! [`ProfileRegistry`] resolves it each tick.

use std::collections::BTreeMap;

use colony_types::{BodyPart, JobKind};
use serde::{Deserialize, Serialize};

use crate::error::ProfileError;

/// Name of the default worker profile.
pub const BASIC_CREEP: &str = "basicCreep";

/// A capability profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Profile name, stored on every agent spawned from it.
    pub name: String,
    /// Body parts, in spawn order.
    pub body: Vec<BodyPart>,
    /// Job kinds the profile may take, in declaration order.
    pub jobs: Vec<JobKind>,
}

impl Configuration {
    /// The general-purpose worker: one of each part plus an extra `Move`,
    /// able to take every job kind.
    pub fn basic_creep() -> Self {
        Self {
            name: BASIC_CREEP.to_owned(),
            body: vec![BodyPart::Work, BodyPart::Carry, BodyPart::Move, BodyPart::Move],
            jobs: JobKind::ALL.to_vec(),
        }
    }

    /// Whether agents of this profile may take jobs of `kind`.
    pub fn allows(&self, kind: JobKind) -> bool {
        self.jobs.contains(&kind)
    }

    /// Energy needed to spawn this body.
    pub fn spawn_cost(&self) -> u32 {
        BodyPart::body_cost(&self.body)
    }
}

/// Capability profiles keyed by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, Configuration>,
}

impl ProfileRegistry {
    /// Build a registry from explicit profiles.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError`] if two profiles share a name, or a profile
    /// has an empty body or no allowed jobs.
    pub fn from_profiles(
        profiles: impl IntoIterator<Item = Configuration>,
    ) -> Result<Self, ProfileError> {
        let mut map = BTreeMap::new();
        for profile in profiles {
            if profile.body.is_empty() {
                return Err(ProfileError::EmptyBody(profile.name));
            }
            if profile.jobs.is_empty() {
                return Err(ProfileError::NoJobs(profile.name));
            }
            if map.contains_key(&profile.name) {
                return Err(ProfileError::DuplicateName(profile.name));
            }
            map.insert(profile.name.clone(), profile);
        }
        Ok(Self { profiles: map })
    }

    /// Look up a profile by name.
    pub fn get(&self, name: &str) -> Option<&Configuration> {
        self.profiles.get(name)
    }

    /// Whether a profile with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    /// Profile names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// Number of registered profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether no profiles are registered.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        let basic = Configuration::basic_creep();
        Self {
            profiles: BTreeMap::from([(basic.name.clone(), basic)]),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_has_only_basic_creep() {
        let registry = ProfileRegistry::default();
        assert_eq!(registry.len(), 1);
        let basic = registry.get(BASIC_CREEP).unwrap();
        assert_eq!(basic.spawn_cost(), 250);
        for kind in JobKind::ALL {
            assert!(basic.allows(kind));
        }
    }

    #[test]
    fn restricted_profile_filters_kinds() {
        let hauler = Configuration {
            name: String::from("hauler"),
            body: vec![BodyPart::Carry, BodyPart::Move],
            jobs: vec![JobKind::StoreEnergy],
        };
        assert!(hauler.allows(JobKind::StoreEnergy));
        assert!(!hauler.allows(JobKind::MineEnergy));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let result = ProfileRegistry::from_profiles([
            Configuration::basic_creep(),
            Configuration::basic_creep(),
        ]);
        assert!(matches!(result, Err(ProfileError::DuplicateName(_))));
    }

    #[test]
    fn empty_body_is_rejected() {
        let mut broken = Configuration::basic_creep();
        broken.body.clear();
        let result = ProfileRegistry::from_profiles([broken]);
        assert!(matches!(result, Err(ProfileError::EmptyBody(_))));
    }
}
