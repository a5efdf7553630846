use crate::error::{Error, Result};
use crate::graph::NodeId;
use serde::{Deserialize, Serialize};

/// Options shared by every layout, plus per-algorithm tuning sections.
///
/// Deserializes from the camelCase object the front-end passes around (`{"width": 1024,
/// "centerNode": "n1", "force": {"centerStrength": 0.5}}`). Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct LayoutOptions {
    pub width: f64,
    pub height: f64,
    /// Focus node. Force uses it to enable the extra centering bias, Radial as BFS root.
    /// Integer ids are accepted like in graph payloads.
    #[serde(deserialize_with = "crate::graph::deserialize_optional_id")]
    pub center_node: Option<NodeId>,
    /// Seed for the randomized layouts (Force, Fan). `None` draws from thread-local entropy.
    pub random_seed: Option<u64>,
    pub force: ForceOptions,
    pub radial: RadialOptions,
    pub fan: FanOptions,
    pub sphere: SphereOptions,
    pub spiral: SpiralOptions,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            center_node: None,
            random_seed: None,
            force: ForceOptions::default(),
            radial: RadialOptions::default(),
            fan: FanOptions::default(),
            sphere: SphereOptions::default(),
            spiral: SpiralOptions::default(),
        }
    }
}

impl LayoutOptions {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_center_node(mut self, id: impl Into<NodeId>) -> Self {
        self.center_node = Some(id.into());
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let opts: Self = serde_json::from_str(text).map_err(|e| Error::InvalidOptions {
            message: e.to_string(),
        })?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> Result<()> {
        positive("width", self.width)?;
        positive("height", self.height)?;
        finite("force.chargeStrength", self.force.charge_strength)?;
        non_negative("force.linkDistance", self.force.link_distance)?;
        non_negative("force.collideRadius", self.force.collide_radius)?;
        unit_interval("force.centerStrength", self.force.center_strength)?;
        unit_interval("force.velocityDecay", self.force.velocity_decay)?;
        unit_interval("force.alphaMin", self.force.alpha_min)?;
        non_negative("radial.baseRadiusRatio", self.radial.base_radius_ratio)?;
        finite("radial.levelSpacing", self.radial.level_spacing)?;
        finite("radial.levelDepth", self.radial.level_depth)?;
        non_negative("fan.maxRadiusRatio", self.fan.max_radius_ratio)?;
        unit_interval("fan.minRadiusFactor", self.fan.min_radius_factor)?;
        non_negative("sphere.radiusRatio", self.sphere.radius_ratio)?;
        non_negative("spiral.radiusRatio", self.spiral.radius_ratio)?;
        finite("spiral.heightRatio", self.spiral.height_ratio)?;
        finite("spiral.turns", self.spiral.turns)?;
        Ok(())
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ForceOptions {
    /// Fixed number of simulation ticks; there is no convergence check.
    pub iterations: usize,
    /// Many-body strength; negative values repel.
    pub charge_strength: f64,
    pub link_distance: f64,
    pub collide_radius: f64,
    /// Strength of the additional centering pull applied when `centerNode` is set.
    pub center_strength: f64,
    pub velocity_decay: f64,
    pub alpha_min: f64,
}

impl Default for ForceOptions {
    fn default() -> Self {
        Self {
            iterations: 300,
            charge_strength: -300.0,
            link_distance: 30.0,
            collide_radius: 20.0,
            center_strength: 0.8,
            velocity_decay: 0.4,
            alpha_min: 0.001,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct RadialOptions {
    /// Innermost ring radius as a fraction of the viewport's shorter side.
    pub base_radius_ratio: f64,
    /// Radius added per BFS level.
    pub level_spacing: f64,
    /// z offset added per BFS level.
    pub level_depth: f64,
}

impl Default for RadialOptions {
    fn default() -> Self {
        Self {
            base_radius_ratio: 0.15,
            level_spacing: 80.0,
            level_depth: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct FanOptions {
    pub max_radius_ratio: f64,
    /// Lower bound of the randomized radius, as a fraction of the max radius.
    pub min_radius_factor: f64,
}

impl Default for FanOptions {
    fn default() -> Self {
        Self {
            max_radius_ratio: 0.4,
            min_radius_factor: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct SphereOptions {
    pub radius_ratio: f64,
}

impl Default for SphereOptions {
    fn default() -> Self {
        Self { radius_ratio: 0.3 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct SpiralOptions {
    pub radius_ratio: f64,
    /// Vertical extent as a fraction of the viewport height.
    pub height_ratio: f64,
    pub turns: f64,
}

impl Default for SpiralOptions {
    fn default() -> Self {
        Self {
            radius_ratio: 0.35,
            height_ratio: 0.3,
            turns: 3.0,
        }
    }
}

fn finite(name: &str, v: f64) -> Result<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidOptions {
            message: format!("{name} must be finite, got {v}"),
        })
    }
}

fn positive(name: &str, v: f64) -> Result<()> {
    finite(name, v)?;
    if v > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidOptions {
            message: format!("{name} must be positive, got {v}"),
        })
    }
}

fn non_negative(name: &str, v: f64) -> Result<()> {
    finite(name, v)?;
    if v >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidOptions {
            message: format!("{name} must not be negative, got {v}"),
        })
    }
}

fn unit_interval(name: &str, v: f64) -> Result<()> {
    finite(name, v)?;
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(Error::InvalidOptions {
            message: format!("{name} must be within [0, 1], got {v}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_reference_defaults() {
        let opts = LayoutOptions::from_json("{}").unwrap();
        assert_eq!(opts, LayoutOptions::default());
        assert_eq!(opts.width, 800.0);
        assert_eq!(opts.height, 600.0);
        assert_eq!(opts.force.iterations, 300);
        assert_eq!(opts.force.center_strength, 0.8);
    }

    #[test]
    fn camel_case_keys_and_nested_sections_parse() {
        let opts = LayoutOptions::from_json(
            r#"{"width": 1024, "centerNode": "n1", "randomSeed": 9, "force": {"centerStrength": 0.5}}"#,
        )
        .unwrap();
        assert_eq!(opts.width, 1024.0);
        assert_eq!(opts.height, 600.0);
        assert_eq!(opts.center_node.as_deref(), Some("n1"));
        assert_eq!(opts.random_seed, Some(9));
        assert_eq!(opts.force.center_strength, 0.5);
        assert_eq!(opts.force.iterations, 300);
    }

    #[test]
    fn integer_center_node_reads_as_string_id() {
        let opts = LayoutOptions::from_json(r#"{"centerNode": 7}"#).unwrap();
        assert_eq!(opts.center_node.as_deref(), Some("7"));

        let opts = LayoutOptions::from_json(r#"{"centerNode": null}"#).unwrap();
        assert_eq!(opts.center_node, None);

        let err = LayoutOptions::from_json(r#"{"centerNode": 1.5}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidOptions { .. }), "{err}");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = LayoutOptions::from_json(r#"{"widht": 10}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidOptions { .. }), "{err}");
    }

    #[test]
    fn degenerate_viewport_is_rejected() {
        let err = LayoutOptions::from_json(r#"{"width": 0}"#).unwrap_err();
        assert!(err.to_string().contains("width must be positive"), "{err}");
        assert!(LayoutOptions::new(800.0, f64::NAN).validate().is_err());
    }
}
