use purist_ast::{Ast, Node, SideEffects, Token, node_util};

use crate::callees::summaries_for_callee;
use crate::convention::CodingConvention;
use crate::error::AnalysisError;
use crate::flags::SummaryFlags;
use crate::graph::SummaryGraph;
use crate::pass::ChangeReporter;

/// Write the final flag set onto every collected invocation node.
pub(crate) fn annotate<C: CodingConvention, R: ChangeReporter>(
    ast: &mut Ast,
    graph: &SummaryGraph,
    convention: &C,
    calls: &[Node],
    reporter: &mut R,
) -> Result<(), AnalysisError> {
    for &call in calls {
        let flags = flags_for_call(ast, graph, convention, call)?;
        if ast.side_effects(call) != flags {
            ast.set_side_effects(call, flags);
            reporter.report_change_to_enclosing_scope(call);
        }
    }
    Ok(())
}

fn flags_for_call<C: CodingConvention>(
    ast: &Ast,
    graph: &SummaryGraph,
    convention: &C,
    call: Node,
) -> Result<SideEffects, AnalysisError> {
    let mut flags = SideEffects::none();

    match summaries_for_callee(ast, graph, convention, call)? {
        None => {
            flags.insert(SideEffects::MUTATES_GLOBAL_STATE);
            flags.insert(SideEffects::THROWS);
            flags.insert(SideEffects::RETURN_TAINTED);
        }
        Some(summaries) => {
            let token = ast.token(call);
            let via_call_apply = node_util::is_invocation_via_call_or_apply(ast, call);
            for idx in summaries {
                let summary = graph.summary(idx);
                if summary.mutates_global_state() {
                    flags.insert(SideEffects::MUTATES_GLOBAL_STATE);
                }
                if summary.throws() {
                    flags.insert(SideEffects::THROWS);
                }
                if summary.flags().contains(SummaryFlags::MUTATES_ARGUMENTS) {
                    flags.insert(SideEffects::MUTATES_ARGUMENTS);
                }
                if summary.mutates_this() && token != Token::New {
                    if via_call_apply {
                        // The receiver is passed as an argument here.
                        flags.insert(SideEffects::MUTATES_ARGUMENTS);
                    } else {
                        flags.insert(SideEffects::MUTATES_THIS);
                    }
                }
                if summary.escaped_return() {
                    flags.insert(SideEffects::RETURN_TAINTED);
                }
            }
        }
    }

    // Intrinsic overrides: calls the runtime declares pure keep only their
    // return taint.
    match ast.token(call) {
        Token::Call if !node_util::function_call_has_side_effects(ast, call) => {
            flags.clear_side_effects();
        }
        Token::New if !node_util::constructor_call_has_side_effects(ast, call) => {
            flags.clear_side_effects();
        }
        _ => {}
    }
    Ok(flags)
}
