//! Typed arenas with stable integer handles, plus a string intern table.
//!
//! Every long-lived structure in the analysis (AST nodes, scopes, variables)
//! lives in an [`Arena`] and is addressed through a copyable newtype handle
//! declared with the [`identifier!`] macro. Handles are plain indices, so
//! cross-references between structures never involve ownership.

mod arena;
mod intern;

pub use arena::{Arena, GetInfo, Id, Identifier};
pub use intern::{InternKey, InternTable};
