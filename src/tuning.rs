//! Data-driven physics tuning
//!
//! Every constant the simulation reads lives here so a JSON file can
//! override any subset of them. Missing fields fall back to [`crate::consts`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::assets::{IconManifest, MAX_ICONS};
use crate::consts::*;

/// How refresh callbacks are turned into simulation steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacingMode {
    /// One step of one nominal frame per display refresh
    #[default]
    PerRefresh,
    /// Fixed nominal-frame steps driven by elapsed wall time
    FixedStep,
}

/// Errors from loading a tuning file
#[derive(Debug)]
pub enum TuningError {
    /// The JSON could not be parsed
    Parse(serde_json::Error),
    /// A value is out of its allowed range
    Invalid(&'static str),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(e) => write!(f, "Failed to parse tuning: {}", e),
            TuningError::Invalid(msg) => write!(f, "Invalid tuning: {}", msg),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(e) => Some(e),
            TuningError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

/// Physics and layout constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub icon_size: f32,
    pub jiggle_strength: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub wall_randomness: f32,
    pub drain_gravity: f32,
    pub drain_drag: f32,
    pub spawn_spin: f32,
    pub pair_spin_scale: f32,
    pub max_spin_factor: f32,
    pub aspect: f32,
    pub control_space: f32,
    pub pacing: PacingMode,
    /// Icons offered as launch buttons
    pub icons: IconManifest,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            icon_size: ICON_SIZE,
            jiggle_strength: JIGGLE_STRENGTH,
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            wall_randomness: WALL_RANDOMNESS,
            drain_gravity: DRAIN_GRAVITY,
            drain_drag: DRAIN_DRAG,
            spawn_spin: SPAWN_SPIN,
            pair_spin_scale: PAIR_SPIN_SCALE,
            max_spin_factor: MAX_SPIN_FACTOR,
            aspect: ASPECT,
            control_space: CONTROL_SPACE,
            pacing: PacingMode::default(),
            icons: IconManifest::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Sprite collision radius
    #[inline]
    pub fn radius(&self) -> f32 {
        self.icon_size / 2.0
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let values = [
            self.icon_size,
            self.jiggle_strength,
            self.min_speed,
            self.max_speed,
            self.wall_randomness,
            self.drain_gravity,
            self.drain_drag,
            self.spawn_spin,
            self.pair_spin_scale,
            self.max_spin_factor,
            self.aspect,
            self.control_space,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(TuningError::Invalid("all values must be finite"));
        }
        if self.icon_size <= 0.0 {
            return Err(TuningError::Invalid("icon_size must be positive"));
        }
        if self.min_speed < 0.0 || self.min_speed > self.max_speed {
            return Err(TuningError::Invalid("speed range must satisfy 0 <= min_speed <= max_speed"));
        }
        if self.drain_drag <= 0.0 || self.drain_drag > 1.0 {
            return Err(TuningError::Invalid("drain_drag must be in (0, 1]"));
        }
        if self.aspect <= 0.0 {
            return Err(TuningError::Invalid("aspect must be positive"));
        }
        if self.max_spin_factor < 0.0 {
            return Err(TuningError::Invalid("max_spin_factor must not be negative"));
        }
        if self.icons.len() > MAX_ICONS {
            return Err(TuningError::Invalid("too many icons in the manifest"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::IconEntry;

    #[test]
    fn test_defaults_validate() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.radius(), 50.0);
        assert_eq!(tuning.icons.len(), 7);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "max_speed": 5.0, "pacing": "fixed_step" }"#).unwrap();
        assert_eq!(tuning.max_speed, 5.0);
        assert_eq!(tuning.min_speed, MIN_SPEED);
        assert_eq!(tuning.pacing, PacingMode::FixedStep);
    }

    #[test]
    fn test_rejects_inverted_speed_range() {
        let err = Tuning::from_json(r#"{ "min_speed": 4.0, "max_speed": 2.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid(_)));
    }

    #[test]
    fn test_rejects_bad_drag() {
        assert!(Tuning::from_json(r#"{ "drain_drag": 1.5 }"#).is_err());
        assert!(Tuning::from_json(r#"{ "drain_drag": 0.0 }"#).is_err());
    }

    #[test]
    fn test_rejects_oversized_manifest() {
        let entries = (0..=MAX_ICONS)
            .map(|i| IconEntry::new(format!("Icon {}", i), format!("icon-{}.png", i)))
            .collect();
        let tuning = Tuning {
            icons: IconManifest::new(entries),
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(TuningError::Invalid(_))));
    }

    #[test]
    fn test_parse_error() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
        assert!(err.to_string().starts_with("Failed to parse tuning"));
    }
}
