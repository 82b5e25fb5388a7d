//! Caller-supplied options for the backdrop effects.
//!
//! Options arrive as JSON from the page (camelCase keys, every key
//! optional) and are consumed once at activation. Changing them means
//! mounting again with new values; there is no live reconfiguration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::host::Listeners;

/// Pixel radius contributed by one unit of `bendRadius`.
pub const BEND_RADIUS_UNIT: f64 = 80.0;
/// Deflection contributed by one unit of `bendStrength`.
pub const BEND_STRENGTH_UNIT: f64 = 25.0;

/// One of the three horizontal viewport stripes a strand lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Top,
    Middle,
    Bottom,
}

impl Band {
    pub const ALL: [Band; 3] = [Band::Top, Band::Middle, Band::Bottom];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Top => 0,
            Self::Middle => 1,
            Self::Bottom => 2,
        }
    }

    /// Vertical extent `[start, end)` of this band for a viewport `height`
    /// pixels tall. The viewport is split into equal thirds.
    #[must_use]
    pub fn stripe(self, height: f64) -> (f64, f64) {
        let third = height / 3.0;
        let i = self.index() as f64;
        (third * i, third * (i + 1.0))
    }

    /// How strongly page scroll shifts strands of this band. The top band
    /// is the most scroll-sensitive.
    #[must_use]
    pub const fn parallax_factor(self) -> f64 {
        match self {
            Self::Top => 0.15,
            Self::Middle => 0.08,
            Self::Bottom => 0.04,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Middle => "middle",
            Self::Bottom => "bottom",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value given either once for every band or positionally as
/// `[top, middle, bottom]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PerBand<T> {
    Uniform(T),
    Each([T; 3]),
}

impl<T: Copy> PerBand<T> {
    #[must_use]
    pub fn get(&self, band: Band) -> T {
        match self {
            Self::Uniform(value) => *value,
            Self::Each(values) => values[band.index()],
        }
    }
}

/// Options of the floating-lines field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldConfig {
    /// Bands that receive strands, in population order.
    pub enabled_waves: Vec<Band>,
    pub line_count: PerBand<u32>,
    /// Accepted and kept, but not used by any motion computation.
    pub line_distance: PerBand<f64>,
    /// Multiplier on [`BEND_RADIUS_UNIT`].
    pub bend_radius: f64,
    /// Multiplier on [`BEND_STRENGTH_UNIT`]; the sign picks the direction.
    pub bend_strength: f64,
    pub interactive: bool,
    pub parallax: bool,
    /// Global multiplier on horizontal drift.
    pub animation_speed: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            enabled_waves: Band::ALL.to_vec(),
            line_count: PerBand::Each([12, 18, 24]),
            line_distance: PerBand::Each([6.0, 4.0, 2.0]),
            bend_radius: 8.0,
            bend_strength: -0.8,
            interactive: true,
            parallax: true,
            animation_speed: 1.0,
        }
    }
}

impl FieldConfig {
    /// Parse options from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Enabled bands with duplicates removed, first occurrence wins.
    #[must_use]
    pub fn bands(&self) -> Vec<Band> {
        let mut seen = Vec::with_capacity(Band::ALL.len());
        for band in &self.enabled_waves {
            if !seen.contains(band) {
                seen.push(*band);
            }
        }
        seen
    }

    #[must_use]
    pub fn lines_for(&self, band: Band) -> usize {
        self.line_count.get(band) as usize
    }

    /// Strand population after initialization.
    #[must_use]
    pub fn total_lines(&self) -> usize {
        self.bands().into_iter().map(|b| self.lines_for(b)).sum()
    }

    #[must_use]
    pub fn bend_radius_px(&self) -> f64 {
        self.bend_radius * BEND_RADIUS_UNIT
    }

    /// Listener set a mount attaches for these options.
    #[must_use]
    pub fn listeners(&self) -> Listeners {
        let mut set = Listeners::RESIZE;
        if self.interactive {
            set |= Listeners::POINTER;
        }
        if self.parallax {
            set |= Listeners::SCROLL;
        }
        set
    }
}

/// Options of the hyperspace starfield.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StarfieldConfig {
    pub star_count: usize,
    /// Depth units a star travels toward the viewer per frame.
    pub speed: f64,
    /// Projection scale applied to `x / z`.
    pub focal_length: f64,
    /// Far plane; stars respawn here.
    pub depth: f64,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            star_count: 400,
            speed: 2.0,
            focal_length: 300.0,
            depth: 1000.0,
        }
    }
}

impl StarfieldConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_object_yields_defaults() {
        let config = FieldConfig::from_json("{}").expect("empty options parse");
        assert_eq!(config, FieldConfig::default());
        assert_eq!(config.total_lines(), 12 + 18 + 24);
    }

    #[test]
    fn scalar_line_count_applies_to_every_band() {
        let config =
            FieldConfig::from_json(r#"{"lineCount": 10, "enabledWaves": ["middle"]}"#).unwrap();
        assert_eq!(config.bands(), vec![Band::Middle]);
        assert_eq!(config.lines_for(Band::Middle), 10);
        assert_eq!(config.lines_for(Band::Top), 10);
        assert_eq!(config.total_lines(), 10);
    }

    #[test]
    fn positional_line_count_maps_top_middle_bottom() {
        let config = FieldConfig::from_json(r#"{"lineCount": [8, 12, 16]}"#).unwrap();
        assert_eq!(config.lines_for(Band::Top), 8);
        assert_eq!(config.lines_for(Band::Middle), 12);
        assert_eq!(config.lines_for(Band::Bottom), 16);
        assert_eq!(config.total_lines(), 36);
    }

    #[test]
    fn duplicate_bands_collapse() {
        let config =
            FieldConfig::from_json(r#"{"enabledWaves": ["bottom", "top", "bottom"]}"#).unwrap();
        assert_eq!(config.bands(), vec![Band::Bottom, Band::Top]);
    }

    #[test]
    fn line_distance_accepts_both_shapes() {
        let scalar = FieldConfig::from_json(r#"{"lineDistance": 3.5}"#).unwrap();
        assert_eq!(scalar.line_distance.get(Band::Bottom), 3.5);
        let list = FieldConfig::from_json(r#"{"lineDistance": [1, 2, 3]}"#).unwrap();
        assert_eq!(list.line_distance.get(Band::Middle), 2.0);
    }

    #[test]
    fn unknown_band_is_rejected() {
        let err = FieldConfig::from_json(r#"{"enabledWaves": ["left"]}"#).unwrap_err();
        assert!(err.to_string().contains("invalid backdrop options"));
    }

    #[test]
    fn short_line_count_list_is_rejected() {
        assert!(FieldConfig::from_json(r#"{"lineCount": [1, 2]}"#).is_err());
    }

    #[test]
    fn listeners_follow_flags() {
        let mut config = FieldConfig::default();
        assert_eq!(config.listeners(), Listeners::all());

        config.interactive = false;
        assert_eq!(config.listeners(), Listeners::RESIZE | Listeners::SCROLL);

        config.parallax = false;
        assert_eq!(config.listeners(), Listeners::RESIZE);
    }

    #[test]
    fn stripes_split_height_in_thirds() {
        assert_eq!(Band::Top.stripe(900.0), (0.0, 300.0));
        assert_eq!(Band::Middle.stripe(900.0), (300.0, 600.0));
        assert_eq!(Band::Bottom.stripe(900.0), (600.0, 900.0));
    }

    #[test]
    fn bend_radius_scales_by_unit() {
        let config = FieldConfig::default();
        assert_eq!(config.bend_radius_px(), 640.0);
    }

    #[test]
    fn starfield_defaults_match_partial_json() {
        let config = StarfieldConfig::from_json(r#"{"starCount": 50}"#).unwrap();
        assert_eq!(config.star_count, 50);
        assert_eq!(config.speed, 2.0);
        assert_eq!(config.depth, 1000.0);
    }

    #[test]
    fn band_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Band::Middle).unwrap(), "\"middle\"");
        assert_eq!(Band::Bottom.to_string(), "bottom");
    }
}
