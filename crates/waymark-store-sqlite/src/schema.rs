//! SQL schema for the Waymark SQLite store.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS cases (
    case_id     TEXT PRIMARY KEY,
    locale      TEXT NOT NULL DEFAULT 'fr',   -- 'fr' | 'en' | 'ar'
    status      TEXT NOT NULL DEFAULT 'draft', -- 'draft' | 'paid' | 'closed'
    access_code TEXT UNIQUE,                  -- six digits or NULL
    created_at  TEXT NOT NULL,                -- RFC 3339 UTC, fixed width
    updated_at  TEXT NOT NULL
);

-- Replaced wholesale on every save; position keeps presentation order.
CREATE TABLE IF NOT EXISTS answers (
    case_id     TEXT NOT NULL REFERENCES cases(case_id) ON DELETE CASCADE,
    question_id TEXT NOT NULL,
    value       TEXT NOT NULL,
    position    INTEGER NOT NULL,
    PRIMARY KEY (case_id, question_id)
);

-- At most one decision per case; overwritten by re-evaluation.
CREATE TABLE IF NOT EXISTS decisions (
    case_id     TEXT PRIMARY KEY REFERENCES cases(case_id) ON DELETE CASCADE,
    pathway     TEXT NOT NULL,
    citations   TEXT NOT NULL DEFAULT '[]',   -- JSON array of strings
    decided_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS cases_created_idx ON cases(created_at);
CREATE INDEX IF NOT EXISTS cases_status_idx  ON cases(status);

PRAGMA user_version = 1;
";
