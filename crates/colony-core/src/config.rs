//! Configuration loading and typed config structures for the colony engine.
//!
//! The canonical configuration lives in `colony-config.yaml` at the project
//! root. Every section and field is optional; anything omitted takes the
//! default documented on the field.

use std::path::{Path, PathBuf};

use colony_jobs::{Configuration, PolicyConfig, ProfileError, ProfileRegistry};
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The declared profiles are inconsistent.
    #[error("invalid profile: {source}")]
    Profile {
        /// The underlying registry error.
        #[from]
        source: ProfileError,
    },

    /// The configuration parsed but is not usable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level colony configuration.
///
/// Mirrors the structure of `colony-config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColonyConfig {
    /// Tick loop settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Priorities of seeded and generated jobs.
    #[serde(default)]
    pub priorities: PriorityConfig,

    /// Job policy thresholds.
    #[serde(default)]
    pub policy: PolicySection,

    /// Capability profiles. Defaults to the single `basicCreep` profile.
    #[serde(default = "default_profiles")]
    pub profiles: Vec<Configuration>,

    /// Persistence backend.
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            priorities: PriorityConfig::default(),
            policy: PolicySection::default(),
            profiles: default_profiles(),
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ColonyConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for the store:
    /// - `COLONY_STORE_URL` overrides `store.url`
    /// - `COLONY_STORE_PATH` overrides `store.path`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or a
    /// validation error from [`validate`](Self::validate).
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or a
    /// validation error from [`validate`](Self::validate).
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.store.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration describes a runnable colony.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if no profiles are declared or the
    /// spawn profile is not among them, and [`ConfigError::Profile`] if the
    /// profiles themselves are malformed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.profiles.is_empty() {
            return Err(ConfigError::Invalid(String::from(
                "at least one profile must be declared",
            )));
        }
        let registry = self.profile_registry()?;
        if !registry.contains(&self.engine.spawn_profile) {
            return Err(ConfigError::Invalid(format!(
                "spawn profile {} is not declared",
                self.engine.spawn_profile
            )));
        }
        Ok(())
    }

    /// Build the profile registry from the declared profiles.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Profile`] on duplicate or malformed profiles.
    pub fn profile_registry(&self) -> Result<ProfileRegistry, ConfigError> {
        Ok(ProfileRegistry::from_profiles(self.profiles.iter().cloned())?)
    }

    /// Policy tunables assembled from the `policy` and `priorities` sections.
    pub const fn policy_config(&self) -> PolicyConfig {
        PolicyConfig {
            upgrade_min_population: self.policy.upgrade_min_population,
            upgrade_hold_level: self.policy.upgrade_hold_level,
            upgrade_hold_downgrade_ticks: self.policy.upgrade_hold_downgrade_ticks,
            road_priority: self.priorities.road,
        }
    }
}

/// Tick loop configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Real-time milliseconds between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Stop after this many ticks. 0 runs until shutdown.
    #[serde(default)]
    pub max_ticks: u64,

    /// Profile facilities spawn and bootstrap uses for the first worker.
    #[serde(default = "default_spawn_profile")]
    pub spawn_profile: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            max_ticks: 0,
            spawn_profile: default_spawn_profile(),
        }
    }
}

/// Priorities for every job the engine creates. Higher is more urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PriorityConfig {
    /// Seeded `MineEnergy` job.
    #[serde(default = "default_mine_priority")]
    pub mine_energy: i32,

    /// Seeded `StoreEnergy` job.
    #[serde(default = "default_store_priority")]
    pub store_energy: i32,

    /// Facility spawn candidate.
    #[serde(default = "default_spawn_priority")]
    pub spawn_worker: i32,

    /// Seeded `UpgradeController` job.
    #[serde(default = "default_upgrade_priority")]
    pub upgrade_controller: i32,

    /// Road jobs seeded while delivering energy.
    #[serde(default = "default_road_priority")]
    pub road: i32,

    /// Extension jobs queued by maintenance.
    #[serde(default = "default_extension_priority")]
    pub extension: i32,
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            mine_energy: default_mine_priority(),
            store_energy: default_store_priority(),
            spawn_worker: default_spawn_priority(),
            upgrade_controller: default_upgrade_priority(),
            road: default_road_priority(),
            extension: default_extension_priority(),
        }
    }
}

/// Job policy thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PolicySection {
    /// Population below which nobody upgrades the controller.
    #[serde(default = "default_upgrade_min_population")]
    pub upgrade_min_population: usize,

    /// Controller level at which upgrading pauses.
    #[serde(default = "default_upgrade_hold_level")]
    pub upgrade_hold_level: u8,

    /// Downgrade timer above which the pause applies.
    #[serde(default = "default_upgrade_hold_downgrade_ticks")]
    pub upgrade_hold_downgrade_ticks: u32,
}

impl Default for PolicySection {
    fn default() -> Self {
        Self {
            upgrade_min_population: default_upgrade_min_population(),
            upgrade_hold_level: default_upgrade_hold_level(),
            upgrade_hold_downgrade_ticks: default_upgrade_hold_downgrade_ticks(),
        }
    }
}

/// Which persistence backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// In-process only; state is lost on exit.
    Memory,
    /// A JSON file at `store.path`.
    #[default]
    File,
    /// A `Dragonfly` server at `store.url`.
    Dragonfly,
}

/// Persistence configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// Backend selection.
    #[serde(default)]
    pub backend: StoreBackend,

    /// File path for the `file` backend.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,

    /// Redis URL for the `dragonfly` backend.
    #[serde(default = "default_store_url")]
    pub url: String,
}

impl StoreConfig {
    /// Apply `COLONY_STORE_URL` and `COLONY_STORE_PATH` if set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("COLONY_STORE_URL") {
            self.url = val;
        }
        if let Ok(val) = std::env::var("COLONY_STORE_PATH") {
            self.path = PathBuf::from(val);
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_store_path(),
            url: default_store_url(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_profiles() -> Vec<Configuration> {
    vec![Configuration::basic_creep()]
}

fn default_spawn_profile() -> String {
    colony_jobs::BASIC_CREEP.to_owned()
}

const fn default_tick_interval_ms() -> u64 {
    1000
}

const fn default_mine_priority() -> i32 {
    30
}

const fn default_store_priority() -> i32 {
    40
}

const fn default_spawn_priority() -> i32 {
    50
}

const fn default_upgrade_priority() -> i32 {
    60
}

const fn default_road_priority() -> i32 {
    20
}

const fn default_extension_priority() -> i32 {
    80
}

const fn default_upgrade_min_population() -> usize {
    3
}

const fn default_upgrade_hold_level() -> u8 {
    2
}

const fn default_upgrade_hold_downgrade_ticks() -> u32 {
    5000
}

fn default_store_path() -> PathBuf {
    PathBuf::from("colony-state.json")
}

fn default_store_url() -> String {
    String::from("redis://localhost:6379")
}

fn default_log_level() -> String {
    String::from("info")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use colony_types::{BodyPart, JobKind};

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ColonyConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.engine.tick_interval_ms, 1000);
        assert_eq!(config.engine.max_ticks, 0);
        assert_eq!(config.priorities.mine_energy, 30);
        assert_eq!(config.priorities.store_energy, 40);
        assert_eq!(config.priorities.spawn_worker, 50);
        assert_eq!(config.priorities.upgrade_controller, 60);
        assert_eq!(config.priorities.road, 20);
        assert_eq!(config.priorities.extension, 80);
        assert_eq!(config.policy_config(), PolicyConfig::default());
    }

    #[test]
    fn empty_yaml_uses_defaults() {
        let config = ColonyConfig::parse("{}").unwrap();
        assert_eq!(config.profiles, default_profiles());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.engine.spawn_profile, "basicCreep");
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
engine:
  tick_interval_ms: 0
  max_ticks: 25
  spawn_profile: hauler

priorities:
  mine_energy: 10
  road: 5

policy:
  upgrade_min_population: 4

profiles:
  - name: hauler
    body: [carry, carry, move]
    jobs: [StoreEnergy]
  - name: basicCreep
    body: [work, carry, move, move]
    jobs: [MineEnergy, StoreEnergy, UpgradeController, BuildStructure]

store:
  backend: memory

logging:
  level: debug
";
        let config = ColonyConfig::parse(yaml).unwrap();
        assert_eq!(config.engine.max_ticks, 25);
        assert_eq!(config.engine.spawn_profile, "hauler");
        assert_eq!(config.priorities.mine_energy, 10);
        assert_eq!(config.priorities.store_energy, 40);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.logging.level, "debug");

        let policy = config.policy_config();
        assert_eq!(policy.upgrade_min_population, 4);
        assert_eq!(policy.road_priority, 5);

        let registry = config.profile_registry().unwrap();
        let hauler = registry.get("hauler").unwrap();
        assert_eq!(hauler.body, vec![BodyPart::Carry, BodyPart::Carry, BodyPart::Move]);
        assert!(!hauler.allows(JobKind::MineEnergy));
    }

    #[test]
    fn undeclared_spawn_profile_is_rejected() {
        let yaml = "engine:\n  spawn_profile: ghost\n";
        assert!(matches!(
            ColonyConfig::parse(yaml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn empty_profile_list_is_rejected() {
        assert!(matches!(
            ColonyConfig::parse("profiles: []\n"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn duplicate_profiles_are_rejected() {
        let yaml = r"
profiles:
  - name: basicCreep
    body: [work]
    jobs: [MineEnergy]
  - name: basicCreep
    body: [move]
    jobs: [StoreEnergy]
";
        assert!(matches!(
            ColonyConfig::parse(yaml),
            Err(ConfigError::Profile { .. })
        ));
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(matches!(
            ColonyConfig::parse("engine: [unclosed"),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn from_file_reads_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("colony-config.yaml");
        std::fs::write(&path, "engine:\n  max_ticks: 7\n").unwrap();
        let config = ColonyConfig::from_file(&path).unwrap();
        assert_eq!(config.engine.max_ticks, 7);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ColonyConfig::from_file(&dir.path().join("absent.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
