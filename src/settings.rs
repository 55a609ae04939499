//! Runtime simulation settings
//!
//! The user-controlled mode flags, passed explicitly into every step.

use serde::{Deserialize, Serialize};

/// Mode flags and spin intensity
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Suspend all physics (drawing continues)
    pub frozen: bool,
    /// Gravity + drag instead of jiggle
    pub draining: bool,
    /// Magnitude of random spin kicks on collisions
    pub spin_factor: f32,
}

impl Settings {
    pub fn toggle_frozen(&mut self) -> bool {
        self.frozen = !self.frozen;
        self.frozen
    }

    pub fn toggle_draining(&mut self) -> bool {
        self.draining = !self.draining;
        self.draining
    }

    /// Set spin intensity, clamped to `[0, max]`. Non-finite input is ignored.
    /// A `max` that is negative or not a number allows no spin at all.
    /// Returns the value now in effect.
    pub fn set_spin_factor(&mut self, value: f32, max: f32) -> f32 {
        if !value.is_finite() {
            log::warn!("Ignoring non-finite spin factor {}", value);
            return self.spin_factor;
        }
        let max = if max >= 0.0 { max } else { 0.0 };
        self.spin_factor = value.clamp(0.0, max);
        self.spin_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(!settings.frozen);
        assert!(!settings.draining);
        assert_eq!(settings.spin_factor, 0.0);
    }

    #[test]
    fn test_toggles_are_independent() {
        let mut settings = Settings::default();
        assert!(settings.toggle_frozen());
        assert!(settings.toggle_draining());
        assert!(!settings.toggle_frozen());
        assert!(settings.draining);
    }

    #[test]
    fn test_spin_factor_clamped() {
        let mut settings = Settings::default();
        assert_eq!(settings.set_spin_factor(0.05, 0.2), 0.05);
        assert_eq!(settings.set_spin_factor(3.0, 0.2), 0.2);
        assert_eq!(settings.set_spin_factor(-1.0, 0.2), 0.0);
        settings.set_spin_factor(0.1, 0.2);
        assert_eq!(settings.set_spin_factor(f32::NAN, 0.2), 0.1);
    }

    #[test]
    fn test_broken_spin_limit_allows_no_spin() {
        let mut settings = Settings::default();
        assert_eq!(settings.set_spin_factor(0.1, f32::NAN), 0.0);
        assert_eq!(settings.set_spin_factor(0.1, -0.5), 0.0);
        assert_eq!(settings.set_spin_factor(0.1, f32::INFINITY), 0.1);
    }
}
