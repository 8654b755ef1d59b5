//! Row models and DTOs.
//!
//! Row structs derive `sqlx::FromRow` and mirror the schema exactly.
//! Response projections are separate types with camelCase serialization,
//! matching the wire contract the web and mobile clients consume.

pub mod archive;
pub mod invite_code;
pub mod note;
pub mod reply;
pub mod user;
