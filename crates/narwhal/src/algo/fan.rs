use crate::algo::check_inputs;
use crate::error::Result;
use crate::graph::{Graph, Position, PositionAssignment};
use crate::options::LayoutOptions;
use indexmap::IndexMap;
use rand::{Rng, RngCore};

/// Angular sectors per node category.
///
/// Each category (see [`crate::graph::Node::category`]) owns `2π / k` of the circle in
/// discovery order; members are spread over the middle half of their sector at a random radius
/// between `minRadiusFactor` and 1 times the max radius.
pub fn layout(
    graph: &Graph,
    opts: &LayoutOptions,
    rng: &mut dyn RngCore,
) -> Result<PositionAssignment> {
    check_inputs(graph, opts)?;

    let mut categories: IndexMap<&str, Vec<usize>> = IndexMap::new();
    for (idx, n) in graph.nodes.iter().enumerate() {
        categories.entry(n.category()).or_default().push(idx);
    }
    tracing::trace!(categories = categories.len(), "fan layout partitioned nodes");

    let (cx, cy) = opts.center();
    let max_radius = opts.min_side() * opts.fan.max_radius_ratio;
    let min_factor = opts.fan.min_radius_factor;

    let mut placed: Vec<Position> = vec![Position::ORIGIN; graph.nodes.len()];
    let sector = std::f64::consts::TAU / categories.len().max(1) as f64;
    for (cat_idx, members) in categories.values().enumerate() {
        let sector_center = cat_idx as f64 * sector;
        let spread = sector / 2.0;
        for (slot, &idx) in members.iter().enumerate() {
            let angle =
                sector_center - spread / 2.0 + (slot as f64 / members.len() as f64) * spread;
            let radius = max_radius * rng.gen_range(min_factor..=1.0);
            placed[idx] = Position::new(
                cx + radius * angle.cos(),
                cy + radius * angle.sin(),
                0.0,
            );
        }
    }

    Ok(graph
        .nodes
        .iter()
        .zip(placed)
        .map(|(n, p)| (n.id.clone(), p))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Node;
    use crate::rng::XorShift64Star;

    fn typed(id: &str, ty: &str) -> Node {
        Node::new(id).with_attribute("entity_type", ty)
    }

    #[test]
    fn categories_get_disjoint_sectors_in_discovery_order() {
        let g = Graph {
            nodes: vec![
                typed("p1", "person"),
                typed("o1", "org"),
                typed("p2", "person"),
                typed("o2", "org"),
            ],
            edges: Vec::new(),
        };
        let opts = LayoutOptions::default();
        let out = layout(&g, &opts, &mut XorShift64Star::new(11)).unwrap();
        let (cx, cy) = opts.center();
        let angle = |id: &str| {
            let p = out[id];
            (p.y - cy).atan2(p.x - cx)
        };

        // person sector is centered on 0, org on π; each spans ±π/4 around its center.
        let quarter = std::f64::consts::FRAC_PI_4;
        assert!((angle("p1") + quarter).abs() < 1e-9, "first member starts the spread");
        for id in ["p1", "p2"] {
            assert!(angle(id).abs() <= quarter + 1e-9, "{id}: {}", angle(id));
        }
        for id in ["o1", "o2"] {
            let off_pi = (angle(id).abs() - std::f64::consts::PI).abs();
            assert!(off_pi <= quarter + 1e-9, "{id}: {}", angle(id));
        }
    }

    #[test]
    fn full_min_radius_factor_pins_every_node_to_the_max_radius() {
        let mut g = Graph::new();
        for i in 0..6 {
            g.add_node(format!("n{i}"));
        }
        let mut opts = LayoutOptions::default();
        opts.fan.min_radius_factor = 1.0;
        let out = layout(&g, &opts, &mut XorShift64Star::new(3)).unwrap();
        let (cx, cy) = opts.center();
        let center = Position::new(cx, cy, 0.0);
        for (id, p) in &out {
            let r = p.distance(&center);
            assert!((r - 240.0).abs() < 1e-9, "{id}: r={r}");
        }
    }

    #[test]
    fn same_seed_reproduces_radii() {
        let mut g = Graph::new();
        for i in 0..5 {
            g.add_node(format!("n{i}"));
        }
        let opts = LayoutOptions::default();
        let a = layout(&g, &opts, &mut XorShift64Star::new(7)).unwrap();
        let b = layout(&g, &opts, &mut XorShift64Star::new(7)).unwrap();
        assert_eq!(a, b);
    }
}
