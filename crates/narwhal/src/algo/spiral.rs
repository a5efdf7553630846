use crate::algo::{check_inputs, single_centered};
use crate::error::Result;
use crate::graph::{Graph, Position, PositionAssignment};
use crate::options::LayoutOptions;
use rand::RngCore;

/// Helix that widens as it climbs: progress `t ∈ [0, 1]` drives the angle (`turns` full turns),
/// the radius (0 to max) and the vertical offset (centered on the viewport).
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
    let max_radius = opts.min_side() * opts.spiral.radius_ratio;
    let max_height = opts.height * opts.spiral.height_ratio;
    let sweep = std::f64::consts::TAU * opts.spiral.turns;
    let last = (graph.nodes.len() - 1) as f64;

    Ok(graph
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| {
            let t = i as f64 / last;
            let angle = t * sweep;
            let radius = max_radius * t;
            let height_offset = max_height * (t - 0.5);
            (
                n.id.clone(),
                Position::new(
                    cx + radius * angle.cos(),
                    cy + height_offset,
                    radius * angle.sin(),
                ),
            )
        })
        .collect())
}
