pub mod admin;
pub mod auth;
pub mod lesson;
pub mod student;
pub mod subject;
