use petgraph::graph::NodeIndex;
use purist_ast::{Ast, Node, Token, node_util};
use smallvec::SmallVec;

use crate::convention::CodingConvention;
use crate::error::AnalysisError;
use crate::graph::SummaryGraph;
use crate::summary::ShortName;

/// Unwrap a callee expression into its callable leaves: function literals
/// and named references. `None` means the expression has an unsupported
/// shape and the call site must be treated as calling anything.
pub(crate) fn collect_callable_leaves(ast: &Ast, expr: Node) -> Option<SmallVec<[Node; 2]>> {
    let mut out = SmallVec::new();
    if collect_into(ast, expr, &mut out) {
        Some(out)
    } else {
        None
    }
}

fn collect_into(ast: &Ast, expr: Node, out: &mut SmallVec<[Node; 2]>) -> bool {
    match ast.token(expr) {
        Token::Function | Token::Name => {
            out.push(expr);
            true
        }
        Token::GetProp => {
            // For `f.call(..)` / `f.apply(..)` the property access is only
            // the dispatch vehicle; the real callee is the object side.
            let is_reflective_target = matches!(ast.name(expr), Some("call") | Some("apply"))
                && ast.parent(expr).is_some_and(|parent| {
                    ast.token(parent) == Token::Call && ast.child(parent, 0) == Some(expr)
                });
            if is_reflective_target {
                match ast.child(expr, 0) {
                    Some(object) => collect_into(ast, object, out),
                    None => false,
                }
            } else {
                out.push(expr);
                true
            }
        }
        Token::Or | Token::And => ast
            .children(expr)
            .iter()
            .all(|&branch| collect_into(ast, branch, out)),
        Token::Hook => {
            let (Some(then), Some(otherwise)) = (ast.child(expr, 1), ast.child(expr, 2)) else {
                return false;
            };
            collect_into(ast, then, out) && collect_into(ast, otherwise, out)
        }
        _ => false,
    }
}

/// The short name a reference node is counted under.
pub(crate) fn name_for_reference(ast: &Ast, node: Node) -> Result<ShortName, AnalysisError> {
    match ast.token(node) {
        Token::Name => ShortName::for_var(ast.name(node).unwrap_or_default()),
        Token::GetProp | Token::StringKey => ShortName::for_prop(ast.name(node).unwrap_or_default()),
        _ => Err(AnalysisError::UnexpectedReference(node)),
    }
}

/// Resolve an invocation's callee to the summaries it may dispatch to.
///
/// `Ok(None)` means the callee could not be resolved and the call must be
/// treated pessimistically. A recognized memoization-cache call resolves to
/// the summaries of its inner functions instead of the cache helper itself.
pub(crate) fn summaries_for_callee<C: CodingConvention>(
    ast: &Ast,
    graph: &SummaryGraph,
    convention: &C,
    invocation: Node,
) -> Result<Option<SmallVec<[NodeIndex; 4]>>, AnalysisError> {
    let leaves = match convention.describe_cached_call(ast, invocation) {
        Some(cache) => {
            let mut leaves = match collect_callable_leaves(ast, cache.value_fn) {
                Some(leaves) => leaves,
                None => return Ok(None),
            };
            if let Some(key_fn) = cache.key_fn {
                match collect_callable_leaves(ast, key_fn) {
                    Some(more) => leaves.extend(more),
                    None => return Ok(None),
                }
            }
            leaves
        }
        None => {
            let Some(callee) = ast.child(invocation, 0) else {
                return Ok(None);
            };
            match collect_callable_leaves(ast, callee) {
                Some(leaves) => leaves,
                None => return Ok(None),
            }
        }
    };

    let mut out = SmallVec::new();
    for leaf in leaves {
        if node_util::is_function_expression(ast, leaf) {
            let summaries = graph.summaries_of_function(leaf);
            if summaries.is_empty() {
                // An anonymous function nothing ever named; there is no
                // summary to consult.
                return Ok(None);
            }
            out.extend_from_slice(summaries);
        } else {
            let name = name_for_reference(ast, leaf)?;
            match graph.summary_for_name(&name) {
                Some(idx) => out.push(idx),
                None => return Ok(None),
            }
        }
    }
    Ok(Some(out))
}
