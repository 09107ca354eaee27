#![forbid(unsafe_code)]
//! dagwire-exec: backends that plug into the translation driver, and the
//! `Engine` that runs a pass and emits a `TranslationManifest`.
//!
//! Two backends share the same registry:
//! - `batch`: bounded in-memory evaluation; output handle is `Dataset`.
//! - `stream`: lowering to a stage graph; output handle is `StreamHandle`.

pub mod batch;
pub mod error;
pub mod expr;
pub mod replay;
pub mod runtime;
pub mod stream;

pub use batch::{BatchEnv, BatchTranslator, Dataset};
pub use error::ExecError;
pub use runtime::{BatchRun, Engine, StreamRun};
pub use stream::{Stage, StreamEnv, StreamHandle, StreamProgram, StreamTranslator};
