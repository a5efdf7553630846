//! Force-directed placement.
//!
//! A velocity-based simulation in the style of d3-force: many-body repulsion, link springs,
//! viewport centering and collision separation, advanced a fixed number of ticks while
//! `alpha` cools towards `alpha_min`. Pair interactions are evaluated exactly (no quadtree).

use crate::algo::check_inputs;
use crate::error::Result;
use crate::graph::{Graph, Position, PositionAssignment};
use crate::options::{ForceOptions, LayoutOptions};
use nalgebra as na;
use rand::{Rng, RngCore};
use rustc_hash::FxHashMap;

type Vec2 = na::Vector2<f64>;

/// Squared lower bound on the distance used by the many-body force.
const CHARGE_DISTANCE_MIN2: f64 = 1.0;
const CENTER_STRENGTH: f64 = 1.0;
const COLLIDE_STRENGTH: f64 = 1.0;

pub fn layout(
    graph: &Graph,
    opts: &LayoutOptions,
    rng: &mut dyn RngCore,
) -> Result<PositionAssignment> {
    check_inputs(graph, opts)?;

    let mut sim = Simulation::from_graph(graph, opts, rng);
    sim.run(rng);

    let mut positions = PositionAssignment::with_capacity(graph.nodes.len());
    for (n, body) in graph.nodes.iter().zip(&sim.bodies) {
        positions.insert(n.id.clone(), Position::new(body.pos.x, body.pos.y, 0.0));
    }
    Ok(positions)
}

#[derive(Debug, Clone, Copy)]
struct Body {
    pos: Vec2,
    vel: Vec2,
}

#[derive(Debug, Clone, Copy)]
struct Link {
    source: usize,
    target: usize,
    strength: f64,
    /// Share of the correction applied to the target; the source takes the rest.
    bias: f64,
}

struct Simulation {
    bodies: Vec<Body>,
    links: Vec<Link>,
    params: ForceOptions,
    center: Vec2,
    center_bias: Option<f64>,
    alpha: f64,
    alpha_decay: f64,
}

impl Simulation {
    fn from_graph(graph: &Graph, opts: &LayoutOptions, rng: &mut dyn RngCore) -> Self {
        let mut id_to_idx: FxHashMap<&str, usize> = FxHashMap::default();
        id_to_idx.reserve(graph.nodes.len());

        let mut bodies: Vec<Body> = Vec::with_capacity(graph.nodes.len());
        for (idx, n) in graph.nodes.iter().enumerate() {
            let x = rng.r#gen::<f64>() * opts.width;
            let y = rng.r#gen::<f64>() * opts.height;
            bodies.push(Body {
                pos: Vec2::new(x, y),
                vel: Vec2::zeros(),
            });
            id_to_idx.insert(n.id.as_str(), idx);
        }

        // Every parallel edge is its own spring; self-loops carry no length and are skipped.
        let mut pairs: Vec<(usize, usize)> = Vec::with_capacity(graph.edges.len());
        let mut degree = vec![0usize; bodies.len()];
        for e in &graph.edges {
            let (Some(&a), Some(&b)) = (
                id_to_idx.get(e.source.as_str()),
                id_to_idx.get(e.target.as_str()),
            ) else {
                continue;
            };
            if a == b {
                continue;
            }
            degree[a] += 1;
            degree[b] += 1;
            pairs.push((a, b));
        }
        let links = pairs
            .into_iter()
            .map(|(source, target)| {
                let (ds, dt) = (degree[source] as f64, degree[target] as f64);
                Link {
                    source,
                    target,
                    strength: 1.0 / ds.min(dt),
                    bias: ds / (ds + dt),
                }
            })
            .collect();

        let params = opts.force.clone();
        let iterations = params.iterations.max(1) as f64;
        let alpha_decay = 1.0 - params.alpha_min.powf(1.0 / iterations);
        let (cx, cy) = opts.center();

        Self {
            bodies,
            links,
            center: Vec2::new(cx, cy),
            center_bias: opts.center_node.as_ref().map(|_| params.center_strength),
            params,
            alpha: 1.0,
            alpha_decay,
        }
    }

    fn run(&mut self, rng: &mut dyn RngCore) {
        if self.bodies.is_empty() {
            return;
        }
        for _ in 0..self.params.iterations {
            self.tick(rng);
        }
    }

    fn tick(&mut self, rng: &mut dyn RngCore) {
        self.alpha += (0.0 - self.alpha) * self.alpha_decay;

        self.apply_charge(rng);
        self.apply_links(rng);
        self.apply_center(CENTER_STRENGTH);
        self.apply_collide(rng);
        if let Some(strength) = self.center_bias {
            self.apply_center(strength);
        }

        let keep = 1.0 - self.params.velocity_decay;
        for b in &mut self.bodies {
            b.vel *= keep;
            b.pos += b.vel;
        }
    }

    fn apply_charge(&mut self, rng: &mut dyn RngCore) {
        let k = self.params.charge_strength * self.alpha;
        let n = self.bodies.len();
        for i in 0..n {
            let pi = self.bodies[i].pos;
            let mut dv = Vec2::zeros();
            for j in 0..n {
                if i == j {
                    continue;
                }
                let mut d = self.bodies[j].pos - pi;
                let mut l = d.norm_squared();
                if d.x == 0.0 {
                    d.x = jiggle(rng);
                    l += d.x * d.x;
                }
                if d.y == 0.0 {
                    d.y = jiggle(rng);
                    l += d.y * d.y;
                }
                if l < CHARGE_DISTANCE_MIN2 {
                    l = (CHARGE_DISTANCE_MIN2 * l).sqrt();
                }
                if l == 0.0 {
                    continue;
                }
                dv += d * (k / l);
            }
            self.bodies[i].vel += dv;
        }
    }

    fn apply_links(&mut self, rng: &mut dyn RngCore) {
        for link in &self.links {
            let s = self.bodies[link.source];
            let t = self.bodies[link.target];
            let mut d = (t.pos + t.vel) - (s.pos + s.vel);
            if d.x == 0.0 {
                d.x = jiggle(rng);
            }
            if d.y == 0.0 {
                d.y = jiggle(rng);
            }
            let l = d.norm();
            if l == 0.0 {
                continue;
            }
            d *= (l - self.params.link_distance) / l * self.alpha * link.strength;
            self.bodies[link.target].vel -= d * link.bias;
            self.bodies[link.source].vel += d * (1.0 - link.bias);
        }
    }

    /// Translates every body so the mean position moves towards the viewport center.
    fn apply_center(&mut self, strength: f64) {
        let n = self.bodies.len() as f64;
        let sum: Vec2 = self.bodies.iter().map(|b| b.pos).sum();
        let shift = (sum / n - self.center) * strength;
        for b in &mut self.bodies {
            b.pos -= shift;
        }
    }

    fn apply_collide(&mut self, rng: &mut dyn RngCore) {
        let r = self.params.collide_radius;
        if r <= 0.0 {
            return;
        }
        let rr = r + r;
        // Equal radii split every correction evenly.
        let share = (r * r) / (r * r + r * r);
        let n = self.bodies.len();
        for i in 0..n {
            let xi = self.bodies[i].pos + self.bodies[i].vel;
            for j in (i + 1)..n {
                let other = self.bodies[j];
                let mut d = xi - other.pos - other.vel;
                let mut l = d.norm_squared();
                if l >= rr * rr {
                    continue;
                }
                if d.x == 0.0 {
                    d.x = jiggle(rng);
                    l += d.x * d.x;
                }
                if d.y == 0.0 {
                    d.y = jiggle(rng);
                    l += d.y * d.y;
                }
                let len = l.sqrt();
                if len == 0.0 {
                    continue;
                }
                d *= (rr - len) / len * COLLIDE_STRENGTH;
                self.bodies[i].vel += d * share;
                self.bodies[j].vel -= d * (1.0 - share);
            }
        }
    }
}

/// Tiny random offset used to separate coincident bodies.
fn jiggle(rng: &mut dyn RngCore) -> f64 {
    (rng.r#gen::<f64>() - 0.5) * 1e-6
}
