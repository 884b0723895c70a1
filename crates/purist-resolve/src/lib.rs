//! Upstream resolution passes: scope construction and reference collection.
//!
//! Both run over a sealed [`purist_ast::Program`] before the analysis
//! proper. The [`ScopeTable`] answers "where is this variable declared";
//! the [`ReferenceMap`] enumerates every textual reference to every
//! variable and property name.

mod refs;
mod scope;

pub use refs::ReferenceMap;
pub use scope::{Scope, ScopeInfo, ScopeKind, ScopeTable, Var, VarInfo, VarKind};
