use purist_ast::{Ast, Node, Token, Visitor, node_util, traverse};
use smallvec::SmallVec;

use crate::flags::SummaryFlags;
use crate::graph::SummaryGraph;

/// Seed summaries for the declared external environment.
///
/// Every function literal in the externs tree contributes the effects its
/// declaration promises, or pessimistic defaults where it promises nothing.
pub(crate) fn analyze_externs(ast: &Ast, externs: Node, graph: &mut SummaryGraph) {
    let mut functions = FunctionCollector::default();
    traverse(ast, externs, &mut functions);

    for fn_node in functions.out {
        let summaries: SmallVec<[_; 2]> =
            SmallVec::from_slice(graph.summaries_of_function(fn_node));
        if summaries.is_empty() {
            continue;
        }
        let flags = extern_flags(ast, fn_node);
        for summary in summaries {
            graph.add_flags(summary, flags);
        }
    }
}

#[derive(Default)]
struct FunctionCollector {
    out: Vec<Node>,
}

impl Visitor for FunctionCollector {
    fn enter(&mut self, ast: &Ast, node: Node) {
        if ast.token(node) == Token::Function {
            self.out.push(node);
        }
    }
}

fn extern_flags(ast: &Ast, fn_node: Node) -> SummaryFlags {
    let mut flags = SummaryFlags::empty();

    // A return type that can overlap the root object type may alias
    // non-local state; no declared type means the same.
    match ast.declared_return(fn_node) {
        Some(ty) if !ty.may_be_object() => {}
        _ => {
            flags.insert(SummaryFlags::ESCAPED_RETURN);
        }
    }

    match node_util::get_best_jsdoc_info(ast, fn_node) {
        None => {
            // Undocumented extern: assume the worst about state and throws.
            flags.insert(SummaryFlags::MUTATES_GLOBAL_STATE.union(SummaryFlags::THROWS));
        }
        Some(doc) => {
            if doc.modifies_this {
                flags.insert(SummaryFlags::MUTATES_THIS);
            } else if doc.modifies_arguments {
                flags.insert(SummaryFlags::MUTATES_ARGUMENTS);
            } else if !doc.throws.is_empty() {
                flags.insert(SummaryFlags::THROWS);
            } else if doc.no_side_effects {
                // Promised pure.
            } else {
                flags.insert(SummaryFlags::MUTATES_GLOBAL_STATE);
            }
        }
    }
    flags
}
