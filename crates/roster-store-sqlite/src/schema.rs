//! SQL schema for the Roster SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS contacts (
    contact_id  TEXT PRIMARY KEY,
    owner_id    TEXT NOT NULL,   -- never updated after insert
    name        TEXT NOT NULL,
    address     TEXT NOT NULL DEFAULT '',
    city        TEXT NOT NULL DEFAULT '',
    state       TEXT NOT NULL DEFAULT '',
    zip         TEXT NOT NULL DEFAULT '',
    email       TEXT NOT NULL,
    status      TEXT NOT NULL DEFAULT 'submitted'
                CHECK (status IN ('submitted', 'approved', 'rejected')),
    created_at  TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    updated_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS contacts_owner_idx  ON contacts(owner_id);
CREATE INDEX IF NOT EXISTS contacts_status_idx ON contacts(status);

PRAGMA user_version = 1;
";
