//! Whole-program purity analysis for a dynamic, prototype-based scripting
//! language.
//!
//! For every call expression the analysis decides a set of side-effect
//! flags: may the call mutate global state, mutate its receiver, mutate its
//! arguments, throw, or return a value aliasing non-local state. Functions
//! are aggregated by short name (one [`AmbiguatedSummary`] covers every
//! function a name may be bound to anywhere in the program) and effects
//! flow caller-ward over a reverse call graph until a fixed point.
//!
//! The entry point is [`PurityPass`]; the AST, scope table, and reference
//! map come from the `purist-ast` and `purist-resolve` crates.

mod annotate;
mod body;
mod callees;
mod convention;
mod error;
mod externs;
mod flags;
mod graph;
mod lattice;
mod pass;
mod propagate;
mod rvalue;
mod seed;
mod summary;

pub use convention::{CacheCall, CacheConvention, CodingConvention, DefaultConvention};
pub use error::AnalysisError;
pub use flags::SummaryFlags;
pub use graph::{CallKind, CallSiteDescriptor, SummaryGraph};
pub use lattice::{HasBottom, HasTop, Lattice};
pub use pass::{ChangeReporter, PurityPass, RecordingReporter};
pub use propagate::{propagate, propagate_once};
pub use summary::{AmbiguatedSummary, ShortName};
