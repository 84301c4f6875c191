/// Create users and the project forest. Ownership lives on the project row.
pub fn migration() -> String {
    r#"
CREATE TABLE users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT,
    created_at INTEGER NOT NULL
);

CREATE TABLE projects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT,
    identifier TEXT UNIQUE,
    background TEXT,
    parent_project_id INTEGER,
    owner_id INTEGER NOT NULL,
    is_archived INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    FOREIGN KEY (parent_project_id) REFERENCES projects (id) ON DELETE CASCADE,
    FOREIGN KEY (owner_id) REFERENCES users (id)
);

CREATE INDEX idx_projects_parent ON projects(parent_project_id);
CREATE INDEX idx_projects_owner ON projects(owner_id);
"#
    .to_string()
}
