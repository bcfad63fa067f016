//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct
//! matching the database row, plus the query-parameter DTOs used by
//! the corresponding handlers.

pub mod collection;
pub mod company;
