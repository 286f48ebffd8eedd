//! Read-model endpoints backed by the analytics engine.
//!
//! Every handler takes one snapshot, derives, and returns; nothing is
//! cached between requests.

use std::collections::HashMap;

use axum::{
  Json,
  extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kudos_analytics::{
  BirthdayEntry, EngagementSummary, GraphEdge, GraphNode, GraphView,
  HighlightEntry, LayoutParams, ValueSegment, Vec2, build_graph,
  engagement_summary, layout, monthly_highlights, received_by,
  received_by_team, split_podium, upcoming_birthdays, value_distribution,
};
use kudos_core::{snapshot::SnapshotProvider, store::RecognitionStore};

use crate::{
  AppState,
  auth::CurrentUser,
  error::{ApiError, store_error},
};

// ─── Birthdays ───────────────────────────────────────────────────────────────

/// `GET /insights/birthdays`
pub async fn birthdays<S>(
  State(state): State<AppState<S>>,
  _viewer: CurrentUser,
) -> Result<Json<Vec<BirthdayEntry>>, ApiError>
where
  S: RecognitionStore + SnapshotProvider + Clone + Send + Sync + 'static,
{
  let snapshot = state.store.snapshot().await.map_err(store_error)?;
  Ok(Json(upcoming_birthdays(&snapshot.users, state.clock.today())))
}

// ─── Highlights ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct HighlightsResponse {
  pub podium: Vec<HighlightEntry>,
  pub rest:   Vec<HighlightEntry>,
}

/// `GET /insights/highlights` — this month's ranking, split for the podium
/// view.
pub async fn highlights<S>(
  State(state): State<AppState<S>>,
  _viewer: CurrentUser,
) -> Result<Json<HighlightsResponse>, ApiError>
where
  S: RecognitionStore + SnapshotProvider + Clone + Send + Sync + 'static,
{
  let snapshot = state.store.snapshot().await.map_err(store_error)?;
  let ranking = monthly_highlights(
    &snapshot.medals,
    &snapshot.users,
    state.clock.today(),
  );
  let (podium, rest) = split_podium(&ranking);
  Ok(Json(HighlightsResponse {
    podium: podium.to_vec(),
    rest:   rest.to_vec(),
  }))
}

// ─── Value DNA ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DnaScope {
  Individual,
  Team,
}

#[derive(Debug, Deserialize)]
pub struct DnaParams {
  pub scope: Option<DnaScope>,
}

#[derive(Debug, Serialize)]
pub struct DnaResponse {
  pub scope:    DnaScope,
  /// Set on team scope only.
  pub team:     Option<String>,
  pub segments: Vec<ValueSegment>,
}

/// `GET /insights/dna?scope=individual|team` — the viewer's (or their
/// team's) value distribution. Defaults to individual scope.
pub async fn dna<S>(
  State(state): State<AppState<S>>,
  CurrentUser(viewer): CurrentUser,
  Query(params): Query<DnaParams>,
) -> Result<Json<DnaResponse>, ApiError>
where
  S: RecognitionStore + SnapshotProvider + Clone + Send + Sync + 'static,
{
  let snapshot = state.store.snapshot().await.map_err(store_error)?;
  let scope = params.scope.unwrap_or(DnaScope::Individual);

  let response = match scope {
    DnaScope::Individual => DnaResponse {
      scope,
      team: None,
      segments: value_distribution(
        received_by(&snapshot.medals, viewer.id),
        &snapshot.values,
      ),
    },
    DnaScope::Team => DnaResponse {
      scope,
      team: Some(viewer.team.clone()),
      segments: value_distribution(
        received_by_team(&snapshot.medals, &snapshot.users, &viewer.team),
        &snapshot.values,
      ),
    },
  };
  Ok(Json(response))
}

// ─── Engagement summary ──────────────────────────────────────────────────────

/// `GET /insights/summary`
pub async fn summary<S>(
  State(state): State<AppState<S>>,
  CurrentUser(viewer): CurrentUser,
) -> Result<Json<EngagementSummary>, ApiError>
where
  S: RecognitionStore + SnapshotProvider + Clone + Send + Sync + 'static,
{
  let snapshot = state.store.snapshot().await.map_err(store_error)?;
  Ok(Json(engagement_summary(
    &snapshot.medals,
    &snapshot.users,
    viewer.id,
  )))
}

// ─── Relationship graph ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GraphParams {
  pub view:   Option<String>,
  /// Focal user for the employee view; defaults to the viewer.
  pub focal:  Option<Uuid>,
  /// When true, also run the force simulation and return positions.
  #[serde(default)]
  pub layout: bool,
}

#[derive(Debug, Serialize)]
pub struct GraphResponse {
  pub nodes:     Vec<GraphNode>,
  pub edges:     Vec<GraphEdge>,
  pub positions: Option<HashMap<String, Vec2>>,
}

/// `GET /insights/graph?view=employee|all|team|area[&focal=...][&layout=true]`
pub async fn graph<S>(
  State(state): State<AppState<S>>,
  CurrentUser(viewer): CurrentUser,
  Query(params): Query<GraphParams>,
) -> Result<Json<GraphResponse>, ApiError>
where
  S: RecognitionStore + SnapshotProvider + Clone + Send + Sync + 'static,
{
  let view = match params.view.as_deref().unwrap_or("employee") {
    "employee" => GraphView::Employee {
      focal: params.focal.unwrap_or(viewer.id),
    },
    "all" => GraphView::All,
    "team" => GraphView::Team,
    "area" => GraphView::Area,
    other => {
      return Err(ApiError::BadRequest(format!("unknown graph view {other:?}")));
    }
  };

  let snapshot = state.store.snapshot().await.map_err(store_error)?;
  let graph = build_graph(view, &snapshot.medals, &snapshot.users);

  let positions = params
    .layout
    .then(|| layout(&graph.nodes, &graph.edges, LayoutParams::default()));

  Ok(Json(GraphResponse {
    nodes: graph.nodes,
    edges: graph.edges,
    positions,
  }))
}
