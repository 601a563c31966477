//! Error types for the `colony-jobs` crate.

/// Errors raised while assembling a [`ProfileRegistry`](crate::ProfileRegistry).
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// Two profiles share a name.
    #[error("duplicate profile name: {0}")]
    DuplicateName(String),

    /// A profile has no body parts and could never be spawned.
    #[error("profile {0} has an empty body")]
    EmptyBody(String),

    /// A profile allows no job kinds.
    #[error("profile {0} allows no job kinds")]
    NoJobs(String),
}
