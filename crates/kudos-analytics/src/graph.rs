//! Relationship graph derivation.
//!
//! Turns the medal set into a node/edge view model at one of four
//! granularities. Edges are ordered (giver, recipient) pairs with the medal
//! count as weight; weight feeds rendered line thickness, not layout
//! physics.

use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use kudos_core::{medal::Medal, user::User};

/// Minimum repeat count before an edge shows up in the all-employees view.
/// A single recognition between two people is noise at company scale; the
/// global graph only draws pairs that exceed this.
pub const MIN_SHARED_RECOGNITIONS: u32 = 1;

/// Which graph to derive. Employee-centric graphs carry their focal user
/// here, so there is no "employee mode without a focal user" to reject at
/// runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphView {
  /// The focal user and everyone they exchanged recognition with.
  Employee { focal: Uuid },
  /// Every user; only significant edges (see
  /// [`MIN_SHARED_RECOGNITIONS`]).
  All,
  /// Teams as nodes; cross-team recognition only.
  Team,
  /// Areas as nodes; cross-area recognition only.
  Area,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeDirection {
  /// The focal user gave these medals.
  Sent,
  /// The focal user (or a third party in the focal orbit) received them.
  Received,
  /// Aggregate views carry no focal perspective.
  Undirected,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
  /// User id for user nodes, group name for team/area nodes.
  pub id:       String,
  /// First name for user nodes, the group name otherwise.
  pub label:    String,
  /// The team a user node belongs to; `None` on group nodes.
  pub group:    Option<String>,
  pub is_focal: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphEdge {
  pub source:    String,
  pub target:    String,
  /// Number of medals sharing this exact direction.
  pub weight:    u32,
  pub direction: EdgeDirection,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RelationshipGraph {
  pub nodes: Vec<GraphNode>,
  pub edges: Vec<GraphEdge>,
}

/// Derive the relationship graph for `view`.
///
/// Medals whose giver or recipient cannot be resolved against the roster
/// are skipped with a diagnostic; they never abort construction. Self-pairs
/// (giver = recipient) are aggregated like any other ordered pair.
pub fn build_graph(
  view: GraphView,
  medals: &[Medal],
  users: &[User],
) -> RelationshipGraph {
  match view {
    GraphView::Employee { focal } => employee_graph(focal, medals, users),
    GraphView::All => all_graph(medals, users),
    GraphView::Team => grouped_graph(medals, users, |u| &u.team),
    GraphView::Area => grouped_graph(medals, users, |u| &u.area),
  }
}

// ─── Pair aggregation ────────────────────────────────────────────────────────

/// Ordered-pair counter preserving first-encounter order.
struct PairCounts {
  order:  Vec<(String, String)>,
  counts: HashMap<(String, String), u32>,
}

impl PairCounts {
  fn new() -> Self {
    Self { order: Vec::new(), counts: HashMap::new() }
  }

  fn bump(&mut self, source: String, target: String) {
    use std::collections::hash_map::Entry;
    match self.counts.entry((source, target)) {
      Entry::Occupied(mut entry) => *entry.get_mut() += 1,
      Entry::Vacant(entry) => {
        self.order.push(entry.key().clone());
        entry.insert(1);
      }
    }
  }

  fn into_edges(
    self,
    direction: impl Fn(&str, &str) -> EdgeDirection,
  ) -> Vec<GraphEdge> {
    let Self { order, counts } = self;
    order
      .into_iter()
      .map(|key| {
        let weight = counts[&key];
        let (source, target) = key;
        let direction = direction(&source, &target);
        GraphEdge { source, target, weight, direction }
      })
      .collect()
  }
}

fn first_name(name: &str) -> String {
  name.split_whitespace().next().unwrap_or(name).to_string()
}

fn user_node(user: &User, is_focal: bool) -> GraphNode {
  GraphNode {
    id:    user.id.to_string(),
    label: first_name(&user.name),
    group: Some(user.team.clone()),
    is_focal,
  }
}

fn skip_unresolved(medal: &Medal, which: &str, id: Uuid) {
  warn!(medal = %medal.id, %id, "skipping medal: {which} missing from roster");
}

// ─── Employee mode ───────────────────────────────────────────────────────────

fn employee_graph(
  focal: Uuid,
  medals: &[Medal],
  users: &[User],
) -> RelationshipGraph {
  let Some(focal_user) = users.iter().find(|u| u.id == focal) else {
    warn!(%focal, "focal user missing from roster; returning empty graph");
    return RelationshipGraph::default();
  };

  // Connected set: the focal user plus every resolvable counterparty.
  let mut connected: Vec<&User> = vec![focal_user];
  for medal in medals {
    let counterparty = if medal.giver.id == focal {
      Some(medal.recipient.id)
    } else if medal.recipient.id == focal {
      Some(medal.giver.id)
    } else {
      None
    };
    let Some(id) = counterparty else { continue };
    if connected.iter().any(|u| u.id == id) {
      continue;
    }
    match users.iter().find(|u| u.id == id) {
      Some(user) => connected.push(user),
      None => skip_unresolved(medal, "counterparty", id),
    }
  }

  // Every medal between members of the connected set contributes, not just
  // the focal user's own; third-party traffic inside the orbit is part of
  // the picture.
  let mut pairs = PairCounts::new();
  for medal in medals {
    let both_connected = connected.iter().any(|u| u.id == medal.giver.id)
      && connected.iter().any(|u| u.id == medal.recipient.id);
    if both_connected {
      pairs.bump(medal.giver.id.to_string(), medal.recipient.id.to_string());
    }
  }

  let focal_id = focal.to_string();
  let edges = pairs.into_edges(|source, _| {
    if source == focal_id { EdgeDirection::Sent } else { EdgeDirection::Received }
  });

  let nodes = connected
    .iter()
    .map(|user| user_node(user, user.id == focal))
    .collect();

  RelationshipGraph { nodes, edges }
}

// ─── All mode ────────────────────────────────────────────────────────────────

fn all_graph(medals: &[Medal], users: &[User]) -> RelationshipGraph {
  let nodes: Vec<GraphNode> =
    users.iter().map(|user| user_node(user, false)).collect();

  let mut pairs = PairCounts::new();
  for medal in medals {
    if !users.iter().any(|u| u.id == medal.giver.id) {
      skip_unresolved(medal, "giver", medal.giver.id);
      continue;
    }
    if !users.iter().any(|u| u.id == medal.recipient.id) {
      skip_unresolved(medal, "recipient", medal.recipient.id);
      continue;
    }
    pairs.bump(medal.giver.id.to_string(), medal.recipient.id.to_string());
  }

  let mut edges = pairs.into_edges(|_, _| EdgeDirection::Undirected);
  edges.retain(|edge| edge.weight > MIN_SHARED_RECOGNITIONS);

  RelationshipGraph { nodes, edges }
}

// ─── Team / area mode ────────────────────────────────────────────────────────

fn grouped_graph<'a>(
  medals: &[Medal],
  users: &'a [User],
  group_of: impl Fn(&'a User) -> &'a str,
) -> RelationshipGraph {
  // Distinct groups in roster order.
  let mut groups: Vec<&str> = Vec::new();
  for user in users {
    let group = group_of(user);
    if !groups.contains(&group) {
      groups.push(group);
    }
  }

  let nodes = groups
    .iter()
    .map(|group| GraphNode {
      id:       group.to_string(),
      label:    group.to_string(),
      group:    None,
      is_focal: false,
    })
    .collect();

  // Cross-group traffic only; recognition inside a group says nothing
  // about the relationship between groups.
  let mut pairs = PairCounts::new();
  for medal in medals {
    let Some(giver) = users.iter().find(|u| u.id == medal.giver.id) else {
      skip_unresolved(medal, "giver", medal.giver.id);
      continue;
    };
    let Some(recipient) = users.iter().find(|u| u.id == medal.recipient.id)
    else {
      skip_unresolved(medal, "recipient", medal.recipient.id);
      continue;
    };

    let (from, to) = (group_of(giver), group_of(recipient));
    if from != to {
      pairs.bump(from.to_string(), to.to_string());
    }
  }

  RelationshipGraph {
    nodes,
    edges: pairs.into_edges(|_, _| EdgeDirection::Undirected),
  }
}
