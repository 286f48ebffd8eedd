//! [`SqliteStore`] — the SQLite implementation of [`RecognitionStore`].

use std::collections::HashMap;
use std::path::Path;

use chrono::{Duration, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use kudos_core::{
  fixture,
  medal::{Comment, Medal, NewMedal},
  snapshot::{Snapshot, SnapshotProvider},
  store::{Credentials, RecognitionStore, Session},
  user::{NewUser, User, UserUpdate},
  value::Value,
};

use crate::{
  Error, Result,
  encode::{RawComment, RawMedal, RawUser, encode_date, encode_dt, encode_uuid},
  schema::SCHEMA,
};

const USER_COLUMNS: &str =
  "user_id, email, name, department, team, area, avatar, birthday, is_admin";

fn raw_user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    user_id:    row.get(0)?,
    email:      row.get(1)?,
    name:       row.get(2)?,
    department: row.get(3)?,
    team:       row.get(4)?,
    area:       row.get(5)?,
    avatar:     row.get(6)?,
    birthday:   row.get(7)?,
    is_admin:   row.get(8)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A kudos store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path`, run schema initialisation and
  /// seed the corporate values.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    let values = fixture::corporate_values();
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(SCHEMA)?;
        // Every deployment starts with the standard value set; existing
        // rows (possibly edited) win over the fixture.
        for value in &values {
          conn.execute(
            "INSERT OR IGNORE INTO corporate_values
               (name, color, icon, description, example)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
              value.name,
              value.color,
              value.icon,
              value.description,
              value.example,
            ],
          )?;
        }
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Load a prebuilt snapshot into the store, preserving ids and
  /// timestamps. Used by demo seeding; embedded comments are not imported
  /// (the demo fixture carries none).
  ///
  /// Every imported user gets `password_hash` as their stored hash.
  pub async fn import_snapshot(
    &self,
    snapshot: &Snapshot,
    password_hash: Option<String>,
  ) -> Result<()> {
    let users = snapshot.users.clone();
    let medals = snapshot.medals.clone();
    let now_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        for user in &users {
          conn.execute(
            "INSERT INTO users
               (user_id, email, name, department, team, area, avatar,
                birthday, is_admin, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            rusqlite::params![
              encode_uuid(user.id),
              user.email,
              user.name,
              user.department,
              user.team,
              user.area,
              user.avatar,
              user.birthday.map(encode_date),
              user.is_admin,
              password_hash,
              now_str,
            ],
          )?;
        }
        for medal in &medals {
          conn.execute(
            "INSERT INTO medals
               (medal_id, giver_id, recipient_id, value_name, message,
                is_public, likes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
              encode_uuid(medal.id),
              encode_uuid(medal.giver.id),
              encode_uuid(medal.recipient.id),
              medal.value,
              medal.message,
              medal.is_public,
              medal.likes,
              encode_dt(medal.created_at),
            ],
          )?;
        }
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Whether any users exist yet; demo seeding is skipped on a non-empty
  /// store.
  pub async fn is_empty(&self) -> Result<bool> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))?)
      })
      .await?;
    Ok(count == 0)
  }

  async fn medal_exists(&self, medal_id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(medal_id);
    let exists: bool = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM medals WHERE medal_id = ?1",
              rusqlite::params![id_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }
}

// ─── RecognitionStore impl ───────────────────────────────────────────────────

impl RecognitionStore for SqliteStore {
  type Error = Error;

  // ── Roster ────────────────────────────────────────────────────────────────

  async fn list_users(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY name"))?;
        let rows = stmt
          .query_map([], raw_user_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
              rusqlite::params![id_str],
              raw_user_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn credentials(&self, email: &str) -> Result<Option<Credentials>> {
    let email = email.to_owned();

    let raw: Option<(RawUser, Option<String>)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {USER_COLUMNS}, password_hash
                 FROM users WHERE email = ?1"
              ),
              rusqlite::params![email],
              |row| Ok((raw_user_from_row(row)?, row.get(9)?)),
            )
            .optional()?,
        )
      })
      .await?;

    raw
      .map(|(raw_user, password_hash)| {
        Ok(Credentials { user: raw_user.into_user()?, password_hash })
      })
      .transpose()
  }

  async fn search_users(&self, query: &str) -> Result<Vec<User>> {
    let pattern = format!("%{query}%");

    let raws: Vec<RawUser> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {USER_COLUMNS} FROM users
           WHERE name LIKE ?1 OR department LIKE ?1
              OR team LIKE ?1 OR area LIKE ?1
           ORDER BY name"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![pattern], raw_user_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn add_user(&self, input: NewUser) -> Result<User> {
    if self.credentials(&input.email).await?.is_some() {
      return Err(kudos_core::Error::EmailTaken(input.email).into());
    }

    let user = User {
      id:         Uuid::new_v4(),
      name:       input.name,
      email:      input.email,
      department: input.department,
      team:       input.team,
      area:       input.area,
      avatar:     input.avatar,
      birthday:   input.birthday,
      is_admin:   input.is_admin,
    };

    let row = (
      encode_uuid(user.id),
      user.email.clone(),
      user.name.clone(),
      user.department.clone(),
      user.team.clone(),
      user.area.clone(),
      user.avatar.clone(),
      user.birthday.map(encode_date),
      user.is_admin,
      input.password_hash,
      encode_dt(Utc::now()),
    );

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users
             (user_id, email, name, department, team, area, avatar,
              birthday, is_admin, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            row.0, row.1, row.2, row.3, row.4, row.5, row.6, row.7, row.8,
            row.9, row.10,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn update_user(
    &self,
    id: Uuid,
    update: UserUpdate,
  ) -> Result<Option<User>> {
    let Some(mut user) = self.get_user(id).await? else {
      return Ok(None);
    };

    if let Some(name) = update.name {
      user.name = name;
    }
    if let Some(department) = update.department {
      user.department = department;
    }
    if let Some(team) = update.team {
      user.team = team;
    }
    if let Some(area) = update.area {
      user.area = area;
    }
    if let Some(avatar) = update.avatar {
      user.avatar = avatar;
    }
    if let Some(birthday) = update.birthday {
      user.birthday = Some(birthday);
    }
    if let Some(is_admin) = update.is_admin {
      user.is_admin = is_admin;
    }

    let row = (
      user.name.clone(),
      user.department.clone(),
      user.team.clone(),
      user.area.clone(),
      user.avatar.clone(),
      user.birthday.map(encode_date),
      user.is_admin,
      encode_uuid(user.id),
    );

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE users
           SET name = ?1, department = ?2, team = ?3, area = ?4,
               avatar = ?5, birthday = ?6, is_admin = ?7
           WHERE user_id = ?8",
          rusqlite::params![
            row.0, row.1, row.2, row.3, row.4, row.5, row.6, row.7,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(Some(user))
  }

  // ── Values ────────────────────────────────────────────────────────────────

  async fn list_values(&self) -> Result<Vec<Value>> {
    let values: Vec<Value> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT name, color, icon, description, example
           FROM corporate_values ORDER BY name",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(Value {
              name:        row.get(0)?,
              color:       row.get(1)?,
              icon:        row.get(2)?,
              description: row.get(3)?,
              example:     row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(values)
  }

  // ── Medals ────────────────────────────────────────────────────────────────

  async fn list_medals(&self) -> Result<Vec<Medal>> {
    let (medal_rows, comment_rows): (Vec<RawMedal>, Vec<RawComment>) = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT m.medal_id,
                  m.giver_id,     g.name, g.email, g.avatar,
                  m.recipient_id, r.name, r.email, r.avatar,
                  m.value_name, m.message, m.is_public, m.likes,
                  m.created_at
           FROM medals m
           JOIN users g ON g.user_id = m.giver_id
           JOIN users r ON r.user_id = m.recipient_id
           ORDER BY m.created_at DESC",
        )?;
        let medals = stmt
          .query_map([], |row| {
            Ok(RawMedal {
              medal_id:         row.get(0)?,
              giver_id:         row.get(1)?,
              giver_name:       row.get(2)?,
              giver_email:      row.get(3)?,
              giver_avatar:     row.get(4)?,
              recipient_id:     row.get(5)?,
              recipient_name:   row.get(6)?,
              recipient_email:  row.get(7)?,
              recipient_avatar: row.get(8)?,
              value_name:       row.get(9)?,
              message:          row.get(10)?,
              is_public:        row.get(11)?,
              likes:            row.get(12)?,
              created_at:       row.get(13)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
          "SELECT c.comment_id, c.medal_id, u.name, c.message, c.created_at
           FROM medal_comments c
           JOIN users u ON u.user_id = c.user_id
           ORDER BY c.created_at ASC",
        )?;
        let comments = stmt
          .query_map([], |row| {
            Ok(RawComment {
              comment_id:  row.get(0)?,
              medal_id:    row.get(1)?,
              author_name: row.get(2)?,
              message:     row.get(3)?,
              created_at:  row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((medals, comments))
      })
      .await?;

    // Stitch comments onto their medals in one pass.
    let mut by_medal: HashMap<Uuid, Vec<Comment>> = HashMap::new();
    for raw in comment_rows {
      let (medal_id, comment) = raw.into_comment()?;
      by_medal.entry(medal_id).or_default().push(comment);
    }

    medal_rows
      .into_iter()
      .map(|raw| {
        let medal_id = crate::encode::decode_uuid(&raw.medal_id)?;
        raw.into_medal(by_medal.remove(&medal_id).unwrap_or_default())
      })
      .collect()
  }

  async fn give_medal(&self, input: NewMedal) -> Result<Medal> {
    let giver = self
      .get_user(input.giver_id)
      .await?
      .ok_or(kudos_core::Error::UserNotFound(input.giver_id))?;
    let recipient = self
      .get_user(input.recipient_id)
      .await?
      .ok_or(kudos_core::Error::UserNotFound(input.recipient_id))?;

    let medal = Medal {
      id:         Uuid::new_v4(),
      giver:      giver.participant(),
      recipient:  recipient.participant(),
      value:      input.value,
      message:    input.message,
      created_at: Utc::now(),
      is_public:  input.is_public,
      likes:      0,
      comments:   Vec::new(),
    };

    let row = (
      encode_uuid(medal.id),
      encode_uuid(medal.giver.id),
      encode_uuid(medal.recipient.id),
      medal.value.clone(),
      medal.message.clone(),
      medal.is_public,
      encode_dt(medal.created_at),
    );

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO medals
             (medal_id, giver_id, recipient_id, value_name, message,
              is_public, likes, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7)",
          rusqlite::params![
            row.0, row.1, row.2, row.3, row.4, row.5, row.6,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(medal)
  }

  async fn add_comment(
    &self,
    medal_id: Uuid,
    author_id: Uuid,
    message: String,
  ) -> Result<Comment> {
    if !self.medal_exists(medal_id).await? {
      return Err(kudos_core::Error::MedalNotFound(medal_id).into());
    }
    let author = self
      .get_user(author_id)
      .await?
      .ok_or(kudos_core::Error::UserNotFound(author_id))?;

    let comment = Comment {
      id:         Uuid::new_v4(),
      author:     author.name,
      message,
      created_at: Utc::now(),
    };

    let row = (
      encode_uuid(comment.id),
      encode_uuid(medal_id),
      encode_uuid(author_id),
      comment.message.clone(),
      encode_dt(comment.created_at),
    );

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO medal_comments
             (comment_id, medal_id, user_id, message, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![row.0, row.1, row.2, row.3, row.4],
        )?;
        Ok(())
      })
      .await?;

    Ok(comment)
  }

  async fn toggle_like(&self, medal_id: Uuid, user_id: Uuid) -> Result<bool> {
    if !self.medal_exists(medal_id).await? {
      return Err(kudos_core::Error::MedalNotFound(medal_id).into());
    }

    let medal_str = encode_uuid(medal_id);
    let user_str = encode_uuid(user_id);
    let like_str = encode_uuid(Uuid::new_v4());
    let now_str = encode_dt(Utc::now());

    let liked: bool = self
      .conn
      .call(move |conn| {
        let existing: Option<String> = conn
          .query_row(
            "SELECT like_id FROM medal_likes
             WHERE medal_id = ?1 AND user_id = ?2",
            rusqlite::params![medal_str, user_str],
            |r| r.get(0),
          )
          .optional()?;

        match existing {
          Some(like_id) => {
            conn.execute(
              "DELETE FROM medal_likes WHERE like_id = ?1",
              rusqlite::params![like_id],
            )?;
            conn.execute(
              "UPDATE medals SET likes = likes - 1 WHERE medal_id = ?1",
              rusqlite::params![medal_str],
            )?;
            Ok(false)
          }
          None => {
            conn.execute(
              "INSERT INTO medal_likes
                 (like_id, medal_id, user_id, created_at)
               VALUES (?1, ?2, ?3, ?4)",
              rusqlite::params![like_str, medal_str, user_str, now_str],
            )?;
            conn.execute(
              "UPDATE medals SET likes = likes + 1 WHERE medal_id = ?1",
              rusqlite::params![medal_str],
            )?;
            Ok(true)
          }
        }
      })
      .await?;

    Ok(liked)
  }

  // ── Sessions ──────────────────────────────────────────────────────────────

  async fn create_session(
    &self,
    user_id: Uuid,
    ttl: Duration,
  ) -> Result<Session> {
    let session = Session {
      id:         Uuid::new_v4(),
      user_id,
      created_at: Utc::now(),
      expires_at: Utc::now() + ttl,
    };

    let row = (
      encode_uuid(session.id),
      encode_uuid(session.user_id),
      encode_dt(session.created_at),
      encode_dt(session.expires_at),
    );

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (session_id, user_id, created_at, expires_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![row.0, row.1, row.2, row.3],
        )?;
        Ok(())
      })
      .await?;

    Ok(session)
  }

  async fn session_user(&self, session_id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(session_id);
    let now_str = encode_dt(Utc::now());

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT u.user_id, u.email, u.name, u.department, u.team,
                      u.area, u.avatar, u.birthday, u.is_admin
               FROM users u
               JOIN sessions s ON s.user_id = u.user_id
               WHERE s.session_id = ?1 AND s.expires_at > ?2",
              rusqlite::params![id_str, now_str],
              raw_user_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn delete_session(&self, session_id: Uuid) -> Result<()> {
    let id_str = encode_uuid(session_id);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM sessions WHERE session_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── SnapshotProvider impl ───────────────────────────────────────────────────

impl SnapshotProvider for SqliteStore {
  type Error = Error;

  async fn snapshot(&self) -> Result<Snapshot> {
    Ok(Snapshot {
      users:    self.list_users().await?,
      values:   self.list_values().await?,
      medals:   self.list_medals().await?,
      taken_at: Utc::now(),
    })
  }
}
