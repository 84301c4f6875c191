/// Create link shares and saved filters.
pub fn migration() -> String {
    r#"
CREATE TABLE link_shares (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    hash TEXT NOT NULL UNIQUE,
    name TEXT,
    project_id INTEGER NOT NULL,
    permission INTEGER NOT NULL CHECK (permission IN (0, 1, 2)),
    shared_by INTEGER NOT NULL,
    expires_at INTEGER,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    FOREIGN KEY (project_id) REFERENCES projects (id) ON DELETE CASCADE,
    FOREIGN KEY (shared_by) REFERENCES users (id)
);

CREATE INDEX idx_link_shares_project ON link_shares(project_id);

CREATE TABLE saved_filters (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT,
    filters TEXT NOT NULL,
    owner_id INTEGER NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    FOREIGN KEY (owner_id) REFERENCES users (id) ON DELETE CASCADE
);
"#
    .to_string()
}
