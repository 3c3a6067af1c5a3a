//! Active rendering systems
//!
//! Stateful runtime systems that turn per-frame requests into render objects.

pub mod text;
