use crate::algo::check_inputs;
use crate::error::Result;
use crate::graph::{Graph, Position, PositionAssignment};
use crate::options::LayoutOptions;
use indexmap::IndexMap;
use rand::RngCore;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

/// Concentric rings by BFS distance from the center node.
///
/// The center defaults to the first node. A center id that is not part of the graph degrades
/// to a flat layout: every node becomes its own root at level 0.
pub fn layout(
    graph: &Graph,
    opts: &LayoutOptions,
    _rng: &mut dyn RngCore,
) -> Result<PositionAssignment> {
    check_inputs(graph, opts)?;

    let levels = bfs_levels(graph, opts.center_node.as_deref());

    // Level groups keep first-reached order; members keep BFS discovery order.
    let mut groups: IndexMap<usize, Vec<usize>> = IndexMap::new();
    for idx in 0..graph.nodes.len() {
        groups.entry(levels.of(idx)).or_default().push(idx);
    }
    for members in groups.values_mut() {
        members.sort_by_key(|&idx| levels.order[idx]);
    }

    let (cx, cy) = opts.center();
    let base_radius = opts.min_side() * opts.radial.base_radius_ratio;

    let mut placed: Vec<Position> = vec![Position::ORIGIN; graph.nodes.len()];
    for (&level, members) in &groups {
        let radius = base_radius + level as f64 * opts.radial.level_spacing;
        let angle_step = std::f64::consts::TAU / members.len() as f64;
        for (slot, &idx) in members.iter().enumerate() {
            let angle = slot as f64 * angle_step;
            placed[idx] = Position::new(
                cx + radius * angle.cos(),
                cy + radius * angle.sin(),
                level as f64 * opts.radial.level_depth,
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

/// Per-node BFS level plus the order in which each node was reached.
#[derive(Debug, Clone)]
pub(crate) struct Levels {
    level: Vec<usize>,
    order: Vec<usize>,
}

impl Levels {
    pub(crate) fn of(&self, idx: usize) -> usize {
        self.level[idx]
    }
}

pub(crate) fn bfs_levels(graph: &Graph, center: Option<&str>) -> Levels {
    let n = graph.nodes.len();
    let mut id_to_idx: FxHashMap<&str, usize> = FxHashMap::default();
    id_to_idx.reserve(n);
    for (idx, node) in graph.nodes.iter().enumerate() {
        id_to_idx.insert(node.id.as_str(), idx);
    }

    // Undirected: every edge contributes both directions, parallel edges included.
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
    for e in &graph.edges {
        let (Some(&a), Some(&b)) = (
            id_to_idx.get(e.source.as_str()),
            id_to_idx.get(e.target.as_str()),
        ) else {
            continue;
        };
        adjacency[a].push(b);
        adjacency[b].push(a);
    }

    let center = match center {
        Some(id) => match id_to_idx.get(id) {
            Some(&idx) => Some(idx),
            None => {
                tracing::warn!(
                    center = id,
                    "radial layout center node is not in the graph; falling back to a flat ring"
                );
                None
            }
        },
        None => (n > 0).then_some(0),
    };

    let mut level = vec![0usize; n];
    let mut order = vec![usize::MAX; n];
    let mut visited = vec![false; n];
    let mut next_order = 0usize;
    let mut queue: VecDeque<usize> = VecDeque::new();

    match center {
        Some(c) => {
            visited[c] = true;
            order[c] = next_order;
            next_order += 1;
            queue.push_back(c);
        }
        // Flat fallback: every node is a queued root that nothing else can claim.
        None => {
            for idx in 0..n {
                visited[idx] = true;
                order[idx] = next_order;
                next_order += 1;
                queue.push_back(idx);
            }
        }
    }

    while let Some(current) = queue.pop_front() {
        for &neighbor in &adjacency[current] {
            if !visited[neighbor] {
                visited[neighbor] = true;
                level[neighbor] = level[current] + 1;
                order[neighbor] = next_order;
                next_order += 1;
                queue.push_back(neighbor);
            }
        }
    }

    // Components the center cannot reach are rooted at level 0.
    for idx in 0..n {
        if !visited[idx] {
            order[idx] = next_order;
            next_order += 1;
            level[idx] = 0;
        }
    }

    Levels { level, order }
}
