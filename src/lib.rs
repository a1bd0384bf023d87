//! Infinitetris (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof so the binary, integration
//! tests, and benches can use `infinitetris::{core,engine,term,types}`.

pub use infinitetris_core as core;
pub use infinitetris_engine as engine;
pub use infinitetris_term as term;
pub use infinitetris_types as types;
