//! SQL schema for the kudos SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,
    name          TEXT NOT NULL,
    department    TEXT NOT NULL DEFAULT '',
    team          TEXT NOT NULL DEFAULT '',
    area          TEXT NOT NULL DEFAULT '',
    avatar        TEXT NOT NULL DEFAULT '',
    birthday      TEXT,             -- ISO 8601 calendar date or NULL
    is_admin      INTEGER NOT NULL DEFAULT 0,
    password_hash TEXT,             -- argon2 PHC string or NULL
    created_at    TEXT NOT NULL
);

-- 'values' is an SQL keyword; the table carries its full name instead.
CREATE TABLE IF NOT EXISTS corporate_values (
    name        TEXT PRIMARY KEY,
    color       TEXT NOT NULL,
    icon        TEXT NOT NULL,
    description TEXT NOT NULL,
    example     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS medals (
    medal_id     TEXT PRIMARY KEY,
    giver_id     TEXT NOT NULL REFERENCES users(user_id),
    recipient_id TEXT NOT NULL REFERENCES users(user_id),
    -- Intentionally not a foreign key: a medal may outlive its value.
    value_name   TEXT NOT NULL,
    message      TEXT NOT NULL,
    is_public    INTEGER NOT NULL DEFAULT 1,
    likes        INTEGER NOT NULL DEFAULT 0,
    created_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS medal_comments (
    comment_id TEXT PRIMARY KEY,
    medal_id   TEXT NOT NULL REFERENCES medals(medal_id),
    user_id    TEXT NOT NULL REFERENCES users(user_id),
    message    TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS medal_likes (
    like_id    TEXT PRIMARY KEY,
    medal_id   TEXT NOT NULL REFERENCES medals(medal_id),
    user_id    TEXT NOT NULL REFERENCES users(user_id),
    created_at TEXT NOT NULL,
    UNIQUE (medal_id, user_id)
);

CREATE TABLE IF NOT EXISTS sessions (
    session_id TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL REFERENCES users(user_id),
    created_at TEXT NOT NULL,
    expires_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS medals_giver_idx     ON medals(giver_id);
CREATE INDEX IF NOT EXISTS medals_recipient_idx ON medals(recipient_id);
CREATE INDEX IF NOT EXISTS medals_value_idx     ON medals(value_name);
CREATE INDEX IF NOT EXISTS comments_medal_idx   ON medal_comments(medal_id);
CREATE INDEX IF NOT EXISTS likes_medal_idx      ON medal_likes(medal_id);
CREATE INDEX IF NOT EXISTS sessions_user_idx    ON sessions(user_id);

PRAGMA user_version = 1;
";
