//! Terminal rendering of the derived views — the same read models the API
//! serves, printed for a quick look without a browser.

use anyhow::Context as _;
use chrono::Utc;

use kudos_analytics::{
  GraphView, LayoutParams, build_graph, engagement_summary, layout,
  monthly_highlights, received_by, received_by_team, split_podium,
  upcoming_birthdays, value_distribution,
};
use kudos_core::{snapshot::SnapshotProvider, user::User};

/// Fetch one snapshot from `provider` and print every derived view,
/// scoping the individual sections to `focal_email` (or the first roster
/// entry).
pub async fn print_report<P>(
  provider: &P,
  focal_email: Option<&str>,
) -> anyhow::Result<()>
where
  P: SnapshotProvider,
{
  let snapshot = provider.snapshot().await?;
  let today = Utc::now().date_naive();

  let focal: &User = match focal_email {
    Some(email) => snapshot
      .users
      .iter()
      .find(|u| u.email == email)
      .with_context(|| format!("no user with email {email:?}"))?,
    None => snapshot.users.first().context("the roster is empty")?,
  };

  println!("kudos report — {} ({})", focal.name, focal.team);
  println!();

  // ── Birthdays ─────────────────────────────────────────────────────────
  println!("Upcoming birthdays");
  let birthdays = upcoming_birthdays(&snapshot.users, today);
  if birthdays.is_empty() {
    println!("  (none on record)");
  }
  for entry in birthdays.iter().take(5) {
    let when = match entry.days_until {
      0 => "today!".to_string(),
      1 => "in 1 day".to_string(),
      n => format!("in {n} days"),
    };
    println!("  {:<20} {}", entry.user.name, when);
  }
  println!();

  // ── Monthly highlights ────────────────────────────────────────────────
  println!("Highlights this month");
  let ranking = monthly_highlights(&snapshot.medals, &snapshot.users, today);
  let (podium, rest) = split_podium(&ranking);
  if ranking.is_empty() {
    println!("  (no recognition given this month)");
  }
  for (rank, entry) in podium.iter().enumerate() {
    println!("  {}. {:<20} {} medals", rank + 1, entry.user.name, entry.count);
  }
  if !rest.is_empty() {
    println!("  … and {} more", rest.len());
  }
  println!();

  // ── Value DNA ─────────────────────────────────────────────────────────
  println!("Value DNA — {}", focal.name);
  let individual = value_distribution(
    received_by(&snapshot.medals, focal.id),
    &snapshot.values,
  );
  print_segments(&individual);

  println!("Value DNA — team {}", focal.team);
  let team = value_distribution(
    received_by_team(&snapshot.medals, &snapshot.users, &focal.team),
    &snapshot.values,
  );
  print_segments(&team);

  // ── Engagement ────────────────────────────────────────────────────────
  let summary =
    engagement_summary(&snapshot.medals, &snapshot.users, focal.id);
  println!("Engagement");
  println!(
    "  {} medals platform-wide, {} sent / {} received by {}, {}% participation",
    summary.total, summary.sent, summary.received, focal.name,
    summary.participation_rate,
  );
  println!();

  // ── Team graph ────────────────────────────────────────────────────────
  println!("Team relationship graph");
  let graph = build_graph(GraphView::Team, &snapshot.medals, &snapshot.users);
  if graph.edges.is_empty() {
    println!("  (no cross-team recognition yet)");
  }
  for edge in &graph.edges {
    println!("  {} -> {} ({}x)", edge.source, edge.target, edge.weight);
  }

  let positions = layout(&graph.nodes, &graph.edges, LayoutParams::default());
  for node in &graph.nodes {
    if let Some(p) = positions.get(&node.id) {
      println!("  {:<16} at ({:>5.0}, {:>5.0})", node.label, p.x, p.y);
    }
  }

  Ok(())
}

fn print_segments(segments: &[kudos_analytics::ValueSegment]) {
  if segments.is_empty() {
    println!("  (no recognition received yet)");
  }
  for segment in segments {
    println!(
      "  {} {:<16} {:>5.1}%  ({})",
      segment.icon, segment.value, segment.percentage, segment.count,
    );
  }
  println!();
}
