//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Methods that take a generic `PgExecutor` run equally against the pool or
//! inside a caller-owned transaction (`&mut *tx`); methods taking
//! `&mut PgConnection` only make sense inside a transaction.

pub mod lesson_repo;
pub mod role_repo;
pub mod student_repo;
pub mod subject_repo;
pub mod teacher_repo;
pub mod user_repo;

pub use lesson_repo::LessonRepo;
pub use role_repo::RoleRepo;
pub use student_repo::StudentRepo;
pub use subject_repo::SubjectRepo;
pub use teacher_repo::TeacherRepo;
pub use user_repo::UserRepo;
