//! Purpose: Polymorphic JSON codecs for cluster-management REST DTOs, shared by the CLI and tests.
//! Exports: `api` (stable codec surface), `core` (token, scalar, structural, dispatch layers),
//!   `models` (worked DTO families and the type registry).
//! Role: Library backing the `clusterwire` binary; embedders should prefer `api`.
//! Invariants: Decoding is synchronous and holds no shared mutable state.
//! Invariants: Family descriptor tables are `'static` and read-only.
pub mod api;
pub mod core;
pub mod models;
