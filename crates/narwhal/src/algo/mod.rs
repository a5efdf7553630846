pub mod fan;
pub mod force;
pub mod radial;
pub mod sphere;
pub mod spiral;

use crate::error::Result;
use crate::graph::{Graph, Position, PositionAssignment};
use crate::options::LayoutOptions;
use rand::RngCore;

/// Entry point shared by every layout algorithm, built-in or custom.
///
/// Algorithms are synchronous and must return exactly one position per input node.
pub type LayoutFn =
    fn(graph: &Graph, options: &LayoutOptions, rng: &mut dyn RngCore) -> Result<PositionAssignment>;

/// The built-in algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Many-body repulsion + link springs + centering + collision.
    Force,
    /// Concentric BFS levels around a center node.
    Radial,
    /// One angular sector per node category.
    Fan,
    /// Fibonacci points on a sphere (3D).
    Sphere,
    /// Widening helix (3D).
    Spiral,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Force,
        Algorithm::Radial,
        Algorithm::Fan,
        Algorithm::Sphere,
        Algorithm::Spiral,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Algorithm::Force => "force",
            Algorithm::Radial => "radial",
            Algorithm::Fan => "fan",
            Algorithm::Sphere => "sphere3d",
            Algorithm::Spiral => "spiral3d",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.key() == key)
    }

    pub fn entry(self) -> LayoutFn {
        match self {
            Algorithm::Force => force::layout,
            Algorithm::Radial => radial::layout,
            Algorithm::Fan => fan::layout,
            Algorithm::Sphere => sphere::layout,
            Algorithm::Spiral => spiral::layout,
        }
    }
}

pub(crate) fn check_inputs(graph: &Graph, opts: &LayoutOptions) -> Result<()> {
    graph.validate()?;
    opts.validate()
}

/// Guard for formulas that divide by `N - 1`: an empty graph yields an empty assignment and a
/// single node sits at the viewport center.
pub(crate) fn single_centered(
    graph: &Graph,
    opts: &LayoutOptions,
) -> Option<PositionAssignment> {
    match graph.nodes.as_slice() {
        [] => Some(PositionAssignment::new()),
        [only] => {
            let (cx, cy) = opts.center();
            let mut out = PositionAssignment::with_capacity(1);
            out.insert(only.id.clone(), Position::new(cx, cy, 0.0));
            Some(out)
        }
        _ => None,
    }
}
