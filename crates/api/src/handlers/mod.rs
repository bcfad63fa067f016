//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the repositories in `compass_db` and to the
//! bulk job engine, and map errors via [`AppError`](crate::error::AppError).

pub mod collections;
pub mod companies;
pub mod jobs;
