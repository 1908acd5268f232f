//! SQL schema for the ApexHash SQLite document store.
//!
//! Executed once at connection startup. The store never migrates; the
//! `user_version` pragma only records which layout created the file.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Documents are insert-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS documents (
    doc_id        TEXT PRIMARY KEY,
    database_name TEXT NOT NULL,
    collection    TEXT NOT NULL,
    body_json     TEXT NOT NULL,   -- JSON object, without `_id`
    inserted_at   TEXT NOT NULL    -- ISO 8601 UTC; store-assigned
);

CREATE INDEX IF NOT EXISTS documents_collection_idx
    ON documents(database_name, collection);

PRAGMA user_version = 1;
";
