//! Deferred-rendering subsystems.
//!
//! Contains the G-buffer geometry targets, the SSAO + blur passes, and the
//! pipeline orchestrator that owns the forward/deferred toggle.

pub mod gbuffer;
pub mod pipeline;
pub mod ssao;
