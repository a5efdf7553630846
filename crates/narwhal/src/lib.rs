#![forbid(unsafe_code)]

//! Headless knowledge-graph layout engine.
//!
//! `narwhal` computes a 3D position for every node of a graph with one of several pluggable
//! algorithms (force-directed, radial, fan, sphere, spiral), tracks which algorithm a view has
//! active, and interpolates between two position assignments frame by frame. Rendering is left
//! to the host.

pub mod algo;
pub mod error;
pub mod graph;
pub mod options;
pub mod registry;
pub mod rng;
pub mod session;
pub mod transition;

pub use algo::{Algorithm, LayoutFn};
pub use error::{Error, Result};
pub use graph::{Edge, Graph, Node, NodeAttributes, NodeId, Position, PositionAssignment};
pub use options::{
    FanOptions, ForceOptions, LayoutOptions, RadialOptions, SphereOptions, SpiralOptions,
};
pub use registry::{Dimension, LayoutDescriptor, LayoutRegistry};
pub use rng::XorShift64Star;
pub use session::{DEFAULT_ANIMATION_DURATION, LayoutManager, LayoutSwitch};
pub use transition::{TransitionGeneration, TransitionToken, animate, ease_in_out_cubic};

/// Headless layout entry point for the built-in algorithms.
///
/// Randomized algorithms draw from `options.random_seed` when set, thread-local entropy
/// otherwise. Use the per-algorithm functions under [`algo`] to inject a random source.
pub fn layout(
    graph: &Graph,
    algorithm: Algorithm,
    options: &LayoutOptions,
) -> Result<PositionAssignment> {
    let mut rng = rng::source(options.random_seed);
    (algorithm.entry())(graph, options, &mut *rng)
}
