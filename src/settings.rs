//! Simulation configuration
//!
//! Read on every (re)start. Slider-style values arrive from the host as
//! integers and are validated here before they touch live state.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};
use crate::sim::Rect;

/// Drawn particle radius; the host only offers two sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum PointRadius {
    Small,
    #[default]
    Large,
}

impl PointRadius {
    pub fn as_f64(&self) -> f64 {
        match self {
            PointRadius::Small => 1.0,
            PointRadius::Large => 2.0,
        }
    }

    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(PointRadius::Small),
            2 => Some(PointRadius::Large),
            _ => None,
        }
    }

    /// The other size (2 -> 1, 1 -> 2)
    pub fn toggled(&self) -> Self {
        match self {
            PointRadius::Small => PointRadius::Large,
            PointRadius::Large => PointRadius::Small,
        }
    }
}

impl TryFrom<u8> for PointRadius {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::from_value(value)
            .ok_or_else(|| Error::InvalidConfig(format!("point radius must be 1 or 2, got {value}")))
    }
}

impl From<PointRadius> for u8 {
    fn from(radius: PointRadius) -> Self {
        match radius {
            PointRadius::Small => 1,
            PointRadius::Large => 2,
        }
    }
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Sliders ===
    /// Particles spawned on start
    pub particle_count: usize,
    /// Initial velocity spread per axis (velocities in [-0.5, 0.5) * scale)
    pub speed_scale: f64,
    /// Integration + collision passes per frame
    pub time_step_multiplier: u32,
    /// Radius of every particle
    pub point_radius: PointRadius,

    // === Geometry ===
    /// Whether particles bounce off the confinement box instead of the canvas
    pub confined: bool,
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Side of the square confinement box centered in the canvas
    pub box_size: f64,

    /// RNG seed; None draws a fresh one on every start
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            speed_scale: DEFAULT_SPEED_SCALE,
            time_step_multiplier: DEFAULT_TIME_STEP_MULTIPLIER,
            point_radius: PointRadius::Large,

            confined: true,
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            box_size: BOX_SIZE,

            seed: None,
        }
    }
}

impl SimConfig {
    /// Parse a JSON config; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.time_step_multiplier < 1 {
            return Err(Error::InvalidConfig(
                "time_step_multiplier must be >= 1".into(),
            ));
        }
        if !self.speed_scale.is_finite() {
            return Err(Error::InvalidConfig("speed_scale must be finite".into()));
        }
        for (name, value) in [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("box_size", self.box_size),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be finite and > 0, got {value}"
                )));
            }
        }
        if self.box_size > self.canvas_width.min(self.canvas_height) {
            return Err(Error::InvalidConfig(format!(
                "box_size {} does not fit in a {}x{} canvas",
                self.box_size, self.canvas_width, self.canvas_height
            )));
        }
        Ok(())
    }

    /// Full canvas walls
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.canvas_width, self.canvas_height)
    }

    /// Confinement box, centered in the canvas
    pub fn box_region(&self) -> Rect {
        Rect::centered_square(&self.bounds(), self.box_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.particle_count, 1000);
        assert_eq!(config.point_radius.as_f64(), 2.0);
        assert!(config.confined);
    }

    #[test]
    fn zero_time_multiplier_rejected() {
        let config = SimConfig {
            time_step_multiplier: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("time_step_multiplier"));
    }

    #[test]
    fn oversized_box_rejected() {
        let config = SimConfig {
            box_size: 700.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn point_radius_toggles_and_round_trips() {
        assert_eq!(PointRadius::Large.toggled(), PointRadius::Small);
        assert_eq!(PointRadius::Small.toggled(), PointRadius::Large);
        assert_eq!(PointRadius::from_value(1), Some(PointRadius::Small));
        assert_eq!(PointRadius::from_value(3), None);
        assert_eq!(u8::from(PointRadius::Small), 1);
    }

    #[test]
    fn from_json_fills_defaults() {
        let config = SimConfig::from_json(r#"{ "particle_count": 10, "point_radius": 1 }"#).unwrap();
        assert_eq!(config.particle_count, 10);
        assert_eq!(config.point_radius, PointRadius::Small);
        assert_eq!(config.time_step_multiplier, 1);
        assert_eq!(config.box_size, 200.0);
    }

    #[test]
    fn from_json_rejects_negative_count_and_bad_radius() {
        assert!(matches!(
            SimConfig::from_json(r#"{ "particle_count": -5 }"#),
            Err(Error::Json(_))
        ));
        assert!(SimConfig::from_json(r#"{ "point_radius": 3 }"#).is_err());
        assert!(matches!(
            SimConfig::from_json(r#"{ "time_step_multiplier": 0 }"#),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn box_region_is_centered() {
        let config = SimConfig::default();
        let region = config.box_region();
        assert_eq!(region.min.x, 300.0);
        assert_eq!(region.max.x, 500.0);
        assert_eq!(region.min.y, 200.0);
        assert_eq!(region.max.y, 400.0);
    }
}
