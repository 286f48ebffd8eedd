//! Force-directed layout.
//!
//! A small spring/charge simulation in the d3-force mold: link springs at a
//! fixed rest distance, inverse-square many-body repulsion, exact centering
//! on the canvas midpoint, and pairwise collision resolution, integrated
//! with damped Euler steps under a geometrically decaying "alpha"
//! temperature.
//!
//! Spring strength is independent of edge weight: weight feeds rendered
//! line thickness, not physics. Initial placement is a deterministic
//! phyllotaxis spiral around the center, so identical inputs always produce
//! identical layouts.
//!
//! Each instance owns its position/velocity buffers; dropping one between
//! ticks aborts the simulation with nothing to clean up. A host UI drives
//! [`ForceLayout::tick`] once per frame, or calls [`ForceLayout::run`] to
//! settle in one go — which always terminates: convergence or the iteration
//! cap, whichever comes first.

use std::collections::HashMap;

use serde::Serialize;

use crate::graph::{GraphEdge, GraphNode};

// ─── Parameters ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct LayoutParams {
  /// Canvas size; the layout centers on `(width / 2, height / 2)`.
  pub width:            f64,
  pub height:           f64,
  /// Rest length of every link spring.
  pub link_distance:    f64,
  /// Many-body strength; negative repels.
  pub charge:           f64,
  /// Minimum node-to-node separation radius.
  pub collision_radius: f64,
  /// Per-tick velocity multiplier (1.0 = frictionless).
  pub damping:          f64,
  /// The simulation counts as converged once alpha falls below this.
  pub alpha_min:        f64,
  /// Fraction of the distance to `alpha_target` covered each tick.
  pub alpha_decay:      f64,
  /// Hard bound on [`ForceLayout::run`], converged or not.
  pub max_ticks:        usize,
}

impl Default for LayoutParams {
  fn default() -> Self {
    Self {
      width:            600.0,
      height:           400.0,
      link_distance:    120.0,
      charge:           -400.0,
      collision_radius: 30.0,
      damping:          0.6,
      alpha_min:        0.001,
      // 1 - alpha_min^(1/300): decays to alpha_min in ~300 ticks.
      alpha_decay:      0.0228,
      max_ticks:        300,
    }
  }
}

/// Alpha set-point while a node is being dragged; see [`ForceLayout::pin`].
const DRAG_ALPHA_TARGET: f64 = 0.3;

// ─── Geometry ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vec2 {
  pub x: f64,
  pub y: f64,
}

impl Vec2 {
  fn zero() -> Self { Self { x: 0.0, y: 0.0 } }
}

// ─── Simulation ──────────────────────────────────────────────────────────────

struct Body {
  id:  String,
  pos: Vec2,
  vel: Vec2,
  /// While set, the body is held at this position and the forces act on
  /// everything else around the fixed point.
  pin: Option<Vec2>,
}

pub struct ForceLayout {
  params:       LayoutParams,
  bodies:       Vec<Body>,
  /// Resolved (source, target) index pairs.
  links:        Vec<(usize, usize)>,
  /// Link count per body, for d3-style spring strength and bias.
  degrees:      Vec<usize>,
  alpha:        f64,
  alpha_target: f64,
}

impl ForceLayout {
  pub fn new(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    params: LayoutParams,
  ) -> Self {
    let center_x = params.width / 2.0;
    let center_y = params.height / 2.0;

    // Deterministic phyllotaxis placement around the center.
    let initial_radius = params.collision_radius;
    let initial_angle = std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());
    let bodies: Vec<Body> = nodes
      .iter()
      .enumerate()
      .map(|(i, node)| {
        let radius = initial_radius * (0.5 + i as f64).sqrt();
        let angle = i as f64 * initial_angle;
        Body {
          id:  node.id.clone(),
          pos: Vec2 {
            x: center_x + radius * angle.cos(),
            y: center_y + radius * angle.sin(),
          },
          vel: Vec2::zero(),
          pin: None,
        }
      })
      .collect();

    let index: HashMap<&str, usize> = bodies
      .iter()
      .enumerate()
      .map(|(i, b)| (b.id.as_str(), i))
      .collect();

    // Edges referencing nodes outside the set are dropped; the layout is
    // generic over any node/edge pairing a caller hands it.
    let links: Vec<(usize, usize)> = edges
      .iter()
      .filter_map(|edge| {
        let source = *index.get(edge.source.as_str())?;
        let target = *index.get(edge.target.as_str())?;
        Some((source, target))
      })
      .collect();

    let mut degrees = vec![0usize; bodies.len()];
    for &(source, target) in &links {
      degrees[source] += 1;
      degrees[target] += 1;
    }

    Self {
      params,
      bodies,
      links,
      degrees,
      alpha: 1.0,
      alpha_target: 0.0,
    }
  }

  /// Whether the simulation still has heat in it.
  pub fn active(&self) -> bool {
    self.alpha >= self.params.alpha_min
  }

  /// Advance one tick. Returns `false` without stepping once the
  /// simulation has cooled below `alpha_min`.
  pub fn tick(&mut self) -> bool {
    if !self.active() {
      return false;
    }
    self.step();
    true
  }

  /// Run to convergence or the iteration cap, whichever comes first.
  /// Returns the number of ticks executed.
  pub fn run(&mut self) -> usize {
    if self.bodies.is_empty() {
      return 0;
    }
    let mut ticks = 0;
    while ticks < self.params.max_ticks && self.tick() {
      ticks += 1;
    }
    ticks
  }

  /// Hold a node at `(x, y)` (a drag in progress) and reheat so the rest
  /// of the layout reacts.
  pub fn pin(&mut self, id: &str, x: f64, y: f64) {
    if let Some(body) = self.bodies.iter_mut().find(|b| b.id == id) {
      body.pin = Some(Vec2 { x, y });
      self.alpha_target = DRAG_ALPHA_TARGET;
      self.alpha = self.alpha.max(DRAG_ALPHA_TARGET);
    }
  }

  /// Release a pinned node back into free integration; the simulation
  /// cools back down from wherever the drag left it.
  pub fn release(&mut self, id: &str) {
    if let Some(body) = self.bodies.iter_mut().find(|b| b.id == id) {
      body.pin = None;
      self.alpha_target = 0.0;
    }
  }

  /// Current position of every node.
  pub fn positions(&self) -> HashMap<String, Vec2> {
    self
      .bodies
      .iter()
      .map(|b| (b.id.clone(), b.pos))
      .collect()
  }

  // ── One integration step ──────────────────────────────────────────────

  fn step(&mut self) {
    self.alpha += (self.alpha_target - self.alpha) * self.params.alpha_decay;

    self.apply_links();
    self.apply_charge();
    self.integrate();
    self.resolve_collisions();
    self.recenter();
    self.enforce_pins();
  }

  /// Unit-ish vector between two bodies with a floor on the distance, so
  /// coincident nodes never divide by zero.
  fn separation(&self, a: usize, b: usize) -> (Vec2, f64) {
    let dx = self.bodies[b].pos.x - self.bodies[a].pos.x;
    let dy = self.bodies[b].pos.y - self.bodies[a].pos.y;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist < 1e-6 {
      // Coincident: separate along a fixed axis.
      (Vec2 { x: 1e-6, y: 0.0 }, 1e-6)
    } else {
      (Vec2 { x: dx, y: dy }, dist)
    }
  }

  fn apply_links(&mut self) {
    for link_index in 0..self.links.len() {
      let (a, b) = self.links[link_index];
      let (delta, dist) = self.separation(a, b);

      // d3 defaults: strength 1 / min(degree), bias toward the
      // lighter-connected endpoint. Independent of edge weight.
      let strength =
        1.0 / self.degrees[a].min(self.degrees[b]).max(1) as f64;
      let bias =
        self.degrees[a] as f64 / (self.degrees[a] + self.degrees[b]) as f64;

      let pull = (dist - self.params.link_distance) / dist
        * strength
        * self.alpha;
      self.bodies[b].vel.x -= delta.x * pull * bias;
      self.bodies[b].vel.y -= delta.y * pull * bias;
      self.bodies[a].vel.x += delta.x * pull * (1.0 - bias);
      self.bodies[a].vel.y += delta.y * pull * (1.0 - bias);
    }
  }

  fn apply_charge(&mut self) {
    for a in 0..self.bodies.len() {
      for b in (a + 1)..self.bodies.len() {
        let (delta, dist) = self.separation(a, b);
        let push = self.params.charge * self.alpha / (dist * dist).max(1.0);
        self.bodies[a].vel.x += delta.x * push;
        self.bodies[a].vel.y += delta.y * push;
        self.bodies[b].vel.x -= delta.x * push;
        self.bodies[b].vel.y -= delta.y * push;
      }
    }
  }

  fn integrate(&mut self) {
    let damping = self.params.damping;
    for body in &mut self.bodies {
      body.vel.x *= damping;
      body.vel.y *= damping;
      body.pos.x += body.vel.x;
      body.pos.y += body.vel.y;
    }
  }

  fn resolve_collisions(&mut self) {
    let min_dist = self.params.collision_radius * 2.0;
    for a in 0..self.bodies.len() {
      for b in (a + 1)..self.bodies.len() {
        let (delta, dist) = self.separation(a, b);
        if dist >= min_dist {
          continue;
        }
        let overlap = (min_dist - dist) / dist;
        let (push_a, push_b) = match (self.bodies[a].pin, self.bodies[b].pin)
        {
          // A pinned body does not yield; its partner takes the whole
          // correction.
          (Some(_), Some(_)) => (0.0, 0.0),
          (Some(_), None) => (0.0, 1.0),
          (None, Some(_)) => (1.0, 0.0),
          (None, None) => (0.5, 0.5),
        };
        self.bodies[a].pos.x -= delta.x * overlap * push_a;
        self.bodies[a].pos.y -= delta.y * overlap * push_a;
        self.bodies[b].pos.x += delta.x * overlap * push_b;
        self.bodies[b].pos.y += delta.y * overlap * push_b;
      }
    }
  }

  /// Translate so the layout's centroid sits exactly on the canvas center.
  fn recenter(&mut self) {
    if self.bodies.is_empty() {
      return;
    }
    let n = self.bodies.len() as f64;
    let mean_x: f64 = self.bodies.iter().map(|b| b.pos.x).sum::<f64>() / n;
    let mean_y: f64 = self.bodies.iter().map(|b| b.pos.y).sum::<f64>() / n;
    let shift_x = self.params.width / 2.0 - mean_x;
    let shift_y = self.params.height / 2.0 - mean_y;
    for body in &mut self.bodies {
      body.pos.x += shift_x;
      body.pos.y += shift_y;
    }
  }

  fn enforce_pins(&mut self) {
    for body in &mut self.bodies {
      if let Some(pin) = body.pin {
        body.pos = pin;
        body.vel = Vec2::zero();
      }
    }
  }
}

/// Settle `nodes`/`edges` in one call and return the final positions.
pub fn layout(
  nodes: &[GraphNode],
  edges: &[GraphEdge],
  params: LayoutParams,
) -> HashMap<String, Vec2> {
  let mut simulation = ForceLayout::new(nodes, edges, params);
  simulation.run();
  simulation.positions()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::graph::EdgeDirection;

  fn node(id: &str) -> GraphNode {
    GraphNode {
      id:       id.to_string(),
      label:    id.to_string(),
      group:    None,
      is_focal: false,
    }
  }

  fn edge(source: &str, target: &str) -> GraphEdge {
    GraphEdge {
      source:    source.to_string(),
      target:    target.to_string(),
      weight:    1,
      direction: EdgeDirection::Undirected,
    }
  }

  fn distance(positions: &HashMap<String, Vec2>, a: &str, b: &str) -> f64 {
    let pa = positions[a];
    let pb = positions[b];
    ((pa.x - pb.x).powi(2) + (pa.y - pb.y).powi(2)).sqrt()
  }

  #[test]
  fn run_terminates_within_the_cap() {
    let nodes: Vec<GraphNode> =
      (0..20).map(|i| node(&format!("n{i}"))).collect();
    // Disconnected pairs plus isolated nodes.
    let edges = vec![edge("n0", "n1"), edge("n2", "n3")];

    let mut simulation =
      ForceLayout::new(&nodes, &edges, LayoutParams::default());
    let ticks = simulation.run();
    assert!(ticks <= LayoutParams::default().max_ticks);
    assert!(!simulation.active() || ticks == LayoutParams::default().max_ticks);
  }

  #[test]
  fn empty_graph_is_a_no_op() {
    let mut simulation =
      ForceLayout::new(&[], &[], LayoutParams::default());
    assert_eq!(simulation.run(), 0);
    assert!(simulation.positions().is_empty());
  }

  #[test]
  fn lone_node_settles_at_canvas_center() {
    let positions = layout(&[node("solo")], &[], LayoutParams::default());
    let p = positions["solo"];
    assert!((p.x - 300.0).abs() < 1e-6, "x = {}", p.x);
    assert!((p.y - 200.0).abs() < 1e-6, "y = {}", p.y);
  }

  #[test]
  fn connected_pair_sits_near_the_rest_distance() {
    let nodes = vec![node("a"), node("b")];
    let edges = vec![edge("a", "b")];
    let positions = layout(&nodes, &edges, LayoutParams::default());

    let d = distance(&positions, "a", "b");
    // Repulsion stretches the spring a little past its rest length.
    assert!(d > 90.0 && d < 250.0, "pair distance {d}");
  }

  #[test]
  fn triangle_settles_roughly_equilateral() {
    let nodes = vec![node("a"), node("b"), node("c")];
    let edges = vec![edge("a", "b"), edge("b", "c"), edge("c", "a")];
    let positions = layout(&nodes, &edges, LayoutParams::default());

    let sides = [
      distance(&positions, "a", "b"),
      distance(&positions, "b", "c"),
      distance(&positions, "c", "a"),
    ];
    let max = sides.iter().cloned().fold(f64::MIN, f64::max);
    let min = sides.iter().cloned().fold(f64::MAX, f64::min);
    assert!(min > 0.0);
    assert!(max / min < 1.5, "sides = {sides:?}");
  }

  #[test]
  fn coincident_nodes_do_not_explode() {
    // Phyllotaxis never stacks nodes, but callers can tick a hand-built
    // degenerate state; the separation floor keeps the math finite.
    let nodes = vec![node("a"), node("b")];
    let positions = layout(&nodes, &[], LayoutParams::default());
    for p in positions.values() {
      assert!(p.x.is_finite() && p.y.is_finite());
    }
  }

  #[test]
  fn pinned_node_stays_put_and_release_frees_it() {
    let nodes = vec![node("a"), node("b"), node("c")];
    let edges = vec![edge("a", "b"), edge("b", "c")];
    let mut simulation =
      ForceLayout::new(&nodes, &edges, LayoutParams::default());
    simulation.run();

    simulation.pin("a", 50.0, 50.0);
    assert!(simulation.active(), "pinning reheats the simulation");
    for _ in 0..10 {
      simulation.tick();
    }
    let held = simulation.positions()["a"];
    assert_eq!(held, Vec2 { x: 50.0, y: 50.0 });

    simulation.release("a");
    for _ in 0..20 {
      simulation.tick();
    }
    let freed = simulation.positions()["a"];
    assert!(
      (freed.x - 50.0).abs() > 1e-3 || (freed.y - 50.0).abs() > 1e-3,
      "released node should rejoin the simulation"
    );
  }

  #[test]
  fn identical_inputs_produce_identical_layouts() {
    let nodes = vec![node("a"), node("b"), node("c"), node("d")];
    let edges = vec![edge("a", "b"), edge("c", "d")];
    let first = layout(&nodes, &edges, LayoutParams::default());
    let second = layout(&nodes, &edges, LayoutParams::default());
    for (id, p) in &first {
      assert_eq!(second[id], *p);
    }
  }
}
