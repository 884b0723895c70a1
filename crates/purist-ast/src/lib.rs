//! Normalized AST for a dynamic, prototype-based scripting language.
//!
//! A single node type carries a [`Token`] discriminator; nodes live in an
//! arena and are addressed by the copyable [`Node`] handle. The crate also
//! owns the declarative annotations attached to nodes (JSDoc-style purity
//! annotations, declared types), the [`SideEffects`] bitmask written onto
//! invocation nodes by the analysis, the syntactic predicate toolbox in
//! [`node_util`], and a pre/post traversal.

mod build;
mod effects;
mod jsdoc;
mod node;
pub mod node_util;
mod ty;
mod visit;

pub use build::{AstBuilder, Program};
pub use effects::SideEffects;
pub use jsdoc::JsDocInfo;
pub use node::{Ast, BinaryOp, DeclKind, Node, NodeInfo, Symbol, Token};
pub use ty::Ty;
pub use visit::{Visitor, traverse};
