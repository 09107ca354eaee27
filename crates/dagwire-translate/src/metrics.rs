//! Tracing hooks for translation passes (feature: `tracing`).
//!
//! Expands to nothing when the feature is off.

use dagwire_core::id::OpId;

#[cfg(feature = "tracing")]
pub(crate) fn pass_started(backend: &str, operators: usize) {
    tracing::debug!(backend, operators, "translation pass started");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn pass_started(_backend: &str, _operators: usize) {}

#[cfg(feature = "tracing")]
pub(crate) fn pass_finished(backend: &str, bound: usize) {
    tracing::debug!(backend, bound, "translation pass finished");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn pass_finished(_backend: &str, _bound: usize) {}

#[cfg(feature = "tracing")]
pub(crate) fn pass_failed(backend: &str, error: &dyn std::error::Error) {
    tracing::warn!(backend, %error, "translation pass aborted");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn pass_failed(_backend: &str, _error: &dyn std::error::Error) {}

#[cfg(feature = "tracing")]
pub(crate) fn bound(op: OpId, name: &str, total: usize) {
    tracing::trace!(op = %op, name, total, "bound operator output");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn bound(_op: OpId, _name: &str, _total: usize) {}
