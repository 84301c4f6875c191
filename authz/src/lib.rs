pub mod authorizer;
pub mod config;
pub mod database;
pub mod error;
pub mod guards;
pub mod hierarchy;
pub mod permissions;
pub mod principal;
pub mod sharing;
pub mod storage;

pub use authorizer::Authorizer;
pub use database::Database;
pub use error::{AppError, AppResult};
pub use guards::AccessGuard;
pub use permissions::PermissionResolver;
pub use principal::Principal;
pub use sharing::SharingService;
