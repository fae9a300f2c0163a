//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO for edits

pub mod comment;
pub mod main_post;
pub mod page;
pub mod reply_post;
pub mod revision;
pub mod tag;
pub mod vote;
