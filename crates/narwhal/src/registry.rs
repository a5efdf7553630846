use crate::algo::{Algorithm, LayoutFn};
use crate::error::{Error, Result};
use crate::graph::{Graph, PositionAssignment};
use crate::options::LayoutOptions;
use indexmap::IndexMap;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    #[serde(rename = "2d")]
    TwoD,
    #[serde(rename = "3d")]
    ThreeD,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dimension::TwoD => "2d",
            Dimension::ThreeD => "3d",
        })
    }
}

/// Identity and metadata of a registered layout, plus its entry point.
#[derive(Debug, Clone)]
pub struct LayoutDescriptor {
    pub key: String,
    pub name: String,
    pub description: String,
    pub dimension: Dimension,
    /// Whether switching to this layout should animate from the previous positions.
    pub animate: bool,
    pub layout: LayoutFn,
}

impl LayoutDescriptor {
    pub fn new(key: impl Into<String>, name: impl Into<String>, layout: LayoutFn) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: String::new(),
            dimension: Dimension::TwoD,
            animate: true,
            layout,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn with_animate(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }

    pub fn builtin(algorithm: Algorithm) -> Self {
        let (name, description, dimension) = match algorithm {
            Algorithm::Force => (
                "Force-directed",
                "2D force simulation: repulsion, link springs, centering and collision",
                Dimension::TwoD,
            ),
            Algorithm::Radial => (
                "Radial",
                "Concentric rings by graph distance from a center node",
                Dimension::TwoD,
            ),
            Algorithm::Fan => (
                "Fan",
                "Angular sectors per node category",
                Dimension::TwoD,
            ),
            Algorithm::Sphere => (
                "Sphere",
                "Nodes spread evenly over a sphere surface",
                Dimension::ThreeD,
            ),
            Algorithm::Spiral => (
                "Spiral",
                "Nodes along a widening three-turn helix",
                Dimension::ThreeD,
            ),
        };
        Self::new(algorithm.key(), name, algorithm.entry())
            .with_description(description)
            .with_dimension(dimension)
    }

    /// Runs the layout. Set `NARWHAL_LAYOUT_TIMING=1` to log the elapsed time per call.
    pub fn compute(
        &self,
        graph: &Graph,
        options: &LayoutOptions,
        rng: &mut dyn RngCore,
    ) -> Result<PositionAssignment> {
        let start = timing_enabled().then(std::time::Instant::now);
        let positions = (self.layout)(graph, options, rng)?;
        if let Some(s) = start {
            tracing::info!(
                layout = %self.key,
                nodes = graph.node_count(),
                edges = graph.edge_count(),
                elapsed = ?s.elapsed(),
                "layout computed"
            );
        } else {
            tracing::debug!(
                layout = %self.key,
                nodes = graph.node_count(),
                edges = graph.edge_count(),
                "layout computed"
            );
        }
        Ok(positions)
    }
}

fn timing_enabled() -> bool {
    static ENABLED: std::sync::OnceLock<bool> = std::sync::OnceLock::new();
    *ENABLED.get_or_init(|| match std::env::var("NARWHAL_LAYOUT_TIMING").as_deref() {
        Ok("1") | Ok("true") => true,
        _ => false,
    })
}

/// Key → descriptor map. Owned by whoever drives a view; there is no process-wide instance.
#[derive(Debug, Clone, Default)]
pub struct LayoutRegistry {
    layouts: IndexMap<String, LayoutDescriptor>,
}

impl LayoutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        for algorithm in Algorithm::ALL {
            reg.register(algorithm.key(), LayoutDescriptor::builtin(algorithm));
        }
        reg
    }

    /// Stores `descriptor` under `key`, replacing any previous registration (built-ins
    /// included). The descriptor's own `key` is overwritten to match.
    pub fn register(&mut self, key: impl Into<String>, mut descriptor: LayoutDescriptor) {
        let key = key.into();
        descriptor.key.clone_from(&key);
        if let Some(previous) = self.layouts.insert(key, descriptor) {
            tracing::debug!(layout = %previous.key, "layout re-registered");
        }
    }

    pub fn get(&self, key: &str) -> Result<&LayoutDescriptor> {
        self.layouts.get(key).ok_or_else(|| Error::UnknownLayout {
            key: key.to_string(),
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.layouts.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<LayoutDescriptor> {
        self.layouts.shift_remove(key)
    }

    pub fn clear(&mut self) {
        self.layouts.clear();
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Every registered descriptor exactly once. Callers must not rely on the order.
    pub fn iter(&self) -> impl Iterator<Item = &LayoutDescriptor> + '_ {
        self.layouts.values()
    }
}
