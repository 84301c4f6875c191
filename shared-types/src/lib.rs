// Shared models for the taskhub permission core and its API consumers

pub mod content;
pub mod permission;
pub mod project;
pub mod sharing;
pub mod typescript_gen;

pub use typescript_gen::{generate_typescript_definitions, API_TYPE_NAMES};

pub use content::{Label, LabelTask, Reaction, ReactionKind, Task, TaskComment, Webhook};
pub use permission::{InvalidPermission, ParsePermissionError, Permission};
pub use project::{
    saved_filter_id_from_project, saved_filter_project_id, Project, ProjectDuplicate,
    ResolvedPermission, SavedFilter, FAVORITES_PROJECT_ID,
};
pub use sharing::{LinkShare, ProjectUser, Team, TeamMember, TeamProject, User};
