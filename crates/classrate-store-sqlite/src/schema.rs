//! SQL schema for the classrate SQLite store.
//!
//! Executed once at connection startup. Gated on `PRAGMA user_version` once a
//! second version exists.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS courses (
    course_id   TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    instructor  TEXT,
    created_at  TEXT NOT NULL   -- RFC 3339 UTC, microseconds; server-assigned
);

-- No CHECK on rating: rows written by other tools may carry 0, which the
-- aggregator treats as unrated.
CREATE TABLE IF NOT EXISTS reviews (
    review_id   TEXT PRIMARY KEY,
    course_id   TEXT NOT NULL REFERENCES courses(course_id) ON DELETE CASCADE,
    body        TEXT NOT NULL,
    rating      INTEGER,
    author_id   TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS profiles (
    id          TEXT PRIMARY KEY,
    email       TEXT NOT NULL UNIQUE,
    is_admin    INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS courses_created_idx  ON courses(created_at);
CREATE INDEX IF NOT EXISTS reviews_course_idx   ON reviews(course_id);
CREATE INDEX IF NOT EXISTS reviews_created_idx  ON reviews(created_at);
CREATE INDEX IF NOT EXISTS profiles_admin_idx   ON profiles(is_admin);

PRAGMA user_version = 1;
";
