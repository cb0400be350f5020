pub mod entities;
pub mod requests;
pub mod responses;

pub use entities::{Principal, UserRole};
pub use requests::{AdminLoginRequest, TeacherLoginRequest};
