use chrono::Utc;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub done: bool,
    pub project_id: i64,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Task {
    pub fn new(title: String, project_id: i64, created_by: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: 0,
            title,
            description: None,
            done: false,
            project_id,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Labels belong to their creator and become visible to anyone who can
/// read a task they are attached to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Label {
    pub id: i64,
    pub title: String,
    pub hex_color: Option<String>,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Label {
    pub fn new(title: String, created_by: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: 0,
            title,
            hex_color: None,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LabelTask {
    pub id: i64,
    pub task_id: i64,
    pub label_id: i64,
    pub created_at: i64,
}

impl LabelTask {
    pub fn new(task_id: i64, label_id: i64) -> Self {
        Self {
            id: 0,
            task_id,
            label_id,
            created_at: Utc::now().timestamp(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaskComment {
    pub id: i64,
    pub task_id: i64,
    /// User id, or the negated share id when written through a link share
    pub author_id: i64,
    pub comment: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl TaskComment {
    pub fn new(task_id: i64, author_id: i64, comment: String) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: 0,
            task_id,
            author_id,
            comment,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ReactionKind {
    Task,
    Comment,
}

impl ReactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionKind::Task => "task",
            ReactionKind::Comment => "comment",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "task" => Some(ReactionKind::Task),
            "comment" => Some(ReactionKind::Comment),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Reaction {
    pub id: i64,
    pub author_id: i64,
    pub kind: ReactionKind,
    /// Task or comment id, depending on `kind`
    pub entity_id: i64,
    pub value: String,
    pub created_at: i64,
}

impl Reaction {
    pub fn new(author_id: i64, kind: ReactionKind, entity_id: i64, value: String) -> Self {
        Self {
            id: 0,
            author_id,
            kind,
            entity_id,
            value,
            created_at: Utc::now().timestamp(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Webhook {
    pub id: i64,
    pub project_id: i64,
    pub target_url: String,
    pub events: Vec<String>,
    pub secret: Option<String>,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Webhook {
    pub fn new(project_id: i64, target_url: String, events: Vec<String>, created_by: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: 0,
            project_id,
            target_url,
            events,
            secret: None,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}
