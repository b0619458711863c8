//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - An update DTO (all `Option` fields) for patches where the entity supports it

pub mod lesson;
pub mod student;
pub mod subject;
pub mod teacher;
pub mod user;
