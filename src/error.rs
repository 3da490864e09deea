use thiserror::Error;

use crate::sim::ParticleId;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by configuration and particle lookups.
///
/// Graph queries never fail: an unreachable path is `None` and an empty
/// subset produces an empty tree.
#[derive(Debug, Error)]
pub enum Error {
    /// Rejected configuration value; the previous configuration stays active.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A particle id that does not index into the current store.
    #[error("unknown particle {0}")]
    UnknownParticle(ParticleId),

    /// Malformed JSON configuration.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_is_informative() {
        let e = Error::InvalidConfig("time_step_multiplier must be >= 1".to_string());
        let msg = e.to_string();
        assert!(msg.contains("invalid configuration"));
        assert!(msg.contains("time_step_multiplier"));
    }

    #[test]
    fn unknown_particle_names_the_id() {
        let e = Error::UnknownParticle(ParticleId(42));
        assert_eq!(e.to_string(), "unknown particle #42");
    }

    #[test]
    fn json_errors_convert() {
        let parse = serde_json::from_str::<u32>("not json").unwrap_err();
        let e: Error = parse.into();
        assert!(matches!(e, Error::Json(_)));
    }
}
