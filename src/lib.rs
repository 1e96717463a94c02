//! Notint (workspace facade crate).
//!
//! Re-exports the engine crates under one `notint::{core,session,types}`
//! path; the implementation lives in dedicated crates under `crates/`.

pub use notint_core as core;
pub use notint_session as session;
pub use notint_types as types;
