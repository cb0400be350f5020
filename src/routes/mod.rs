pub mod achievements;
pub mod admins;
pub mod auth;
pub mod files;
pub mod jobs;
pub mod teachers;

pub use achievements::configure_achievement_routes;
pub use admins::configure_admin_routes;
pub use auth::configure_auth_routes;
pub use files::configure_file_routes;
pub use jobs::configure_job_routes;
pub use teachers::configure_teacher_routes;
