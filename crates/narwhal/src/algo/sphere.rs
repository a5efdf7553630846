use crate::algo::{check_inputs, single_centered};
use crate::error::Result;
use crate::graph::{Graph, Position, PositionAssignment};
use crate::options::LayoutOptions;
use rand::RngCore;

/// `π(3 - √5)`: consecutive points rotate by this much around the vertical axis.
pub const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Fibonacci-sphere distribution: `y` runs linearly from 1 to -1 while the azimuth advances by
/// the golden angle, which spreads points evenly without clustering at the poles.
pub fn layout(
    graph: &Graph,
    opts: &LayoutOptions,
    _rng: &mut dyn RngCore,
) -> Result<PositionAssignment> {
    check_inputs(graph, opts)?;
    if let Some(trivial) = single_centered(graph, opts) {
        return Ok(trivial);
    }

    let (cx, cy) = opts.center();
    let radius = opts.min_side() * opts.sphere.radius_ratio;
    let last = (graph.nodes.len() - 1) as f64;

    Ok(graph
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| {
            let i = i as f64;
            let y = 1.0 - (i / last) * 2.0;
            let radius_at_y = (1.0 - y * y).max(0.0).sqrt();
            let theta = GOLDEN_ANGLE * i;
            let x = theta.cos() * radius_at_y;
            let z = theta.sin() * radius_at_y;
            (
                n.id.clone(),
                Position::new(cx + x * radius, cy + y * radius, z * radius),
            )
        })
        .collect())
}
