pub mod identity;
pub mod student;

pub use identity::{Profile, RoleAssignment, ADMIN_ROLE};
pub use student::{NewStudent, Student, StudentDraft, StudentStatus, StudentUpdate, ValidStudent};
