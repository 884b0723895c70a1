use purist_ast::{Ast, node_util};
use purist_resolve::ReferenceMap;

use crate::callees::collect_callable_leaves;
use crate::error::AnalysisError;
use crate::graph::SummaryGraph;
use crate::rvalue::is_rvalue;
use crate::summary::ShortName;

/// Property names too dynamic to ever analyze: a reference through one of
/// these can dispatch nearly anywhere, so their summaries are pinned to
/// all-flags before any definition is inspected.
pub(crate) const DYNAMIC_DISPATCH_PROPS: [&str; 3] = ["call", "apply", "constructor"];

/// Populate the summary store from the reference map: one summary per short
/// name, plus the function-literal → summary associations discovered from
/// definition sites.
pub(crate) fn seed(
    ast: &Ast,
    refs: &ReferenceMap,
    graph: &mut SummaryGraph,
) -> Result<(), AnalysisError> {
    let mut named: Vec<(ShortName, &[purist_ast::Node])> = Vec::new();
    for (name, nodes) in refs.name_references() {
        named.push((ShortName::for_var(name)?, nodes));
    }
    for (name, nodes) in refs.prop_references() {
        named.push((ShortName::for_prop(name)?, nodes));
    }

    for (name, _) in &named {
        graph.ensure_summary(name);
    }
    for prop in DYNAMIC_DISPATCH_PROPS {
        let name = ShortName::for_prop(prop)?;
        let idx = graph.ensure_summary(&name);
        graph.set_all_flags(idx);
    }

    for (name, nodes) in named {
        if is_dynamic_dispatch(&name) {
            continue;
        }
        let summary = graph.ensure_summary(&name);
        for &reference in nodes {
            if is_rvalue(ast, reference) {
                continue;
            }
            // A write: the bound value is a potential function definition.
            let Some(rhs) = node_util::get_rvalue_of_lvalue(ast, reference) else {
                graph.set_all_flags(summary);
                break;
            };
            let Some(leaves) = collect_callable_leaves(ast, rhs) else {
                graph.set_all_flags(summary);
                break;
            };
            if leaves
                .iter()
                .any(|&leaf| !node_util::is_function_expression(ast, leaf))
            {
                // The name may be bound to something that is not a function
                // literal we can see through.
                graph.set_all_flags(summary);
                break;
            }
            for leaf in leaves {
                graph.associate(leaf, summary);
            }
        }
    }
    Ok(())
}

fn is_dynamic_dispatch(name: &ShortName) -> bool {
    name.is_property() && DYNAMIC_DISPATCH_PROPS.contains(&&name.as_str()[1..])
}
