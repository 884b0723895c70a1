use petgraph::graph::NodeIndex;

use crate::flags::SummaryFlags;
use crate::graph::{CallKind, CallSiteDescriptor, SummaryGraph};

/// One monotone sweep over every edge; returns whether any summary changed.
///
/// Exposed separately so the fixed point can be observed step by step.
pub fn propagate_once(graph: &mut SummaryGraph) -> bool {
    let edges = graph.edge_list();
    sweep(graph, &edges)
}

/// Run the propagation to its fixed point.
///
/// Terminates because the flag lattice is finite and [`sweep`] only ever
/// sets bits. Sweep order does not affect the result, only how many sweeps
/// are needed.
pub fn propagate(graph: &mut SummaryGraph) {
    let edges = graph.edge_list();
    while sweep(graph, &edges) {}
}

fn sweep(graph: &mut SummaryGraph, edges: &[(NodeIndex, NodeIndex, CallSiteDescriptor)]) -> bool {
    let mut changed = false;
    for &(callee, caller, descriptor) in edges {
        let callee_flags = graph.summary(callee).flags();
        let mut add = SummaryFlags::empty();

        if callee_flags.contains(SummaryFlags::MUTATES_GLOBAL_STATE) {
            add.insert(SummaryFlags::MUTATES_GLOBAL_STATE);
        }
        if callee_flags.contains(SummaryFlags::THROWS) {
            add.insert(SummaryFlags::THROWS);
        }
        if callee_flags.contains(SummaryFlags::MUTATES_ARGUMENTS)
            && !descriptor.all_args_unescaped_local
        {
            // Arguments escaped at this site: the mutation touches something
            // the caller cannot contain.
            add.insert(SummaryFlags::MUTATES_GLOBAL_STATE);
        }
        if callee_flags.contains(SummaryFlags::MUTATES_THIS) {
            if descriptor.callee_this_equals_caller_this {
                add.insert(SummaryFlags::MUTATES_THIS);
            } else if descriptor.call_kind != CallKind::New {
                // Constructor calls isolate `this`; every other rebinding
                // mutates state the caller does not own.
                add.insert(SummaryFlags::MUTATES_GLOBAL_STATE);
            }
        }
        // ESCAPED_RETURN stays with its direct producer.

        changed |= graph.add_flags(caller, add);
    }
    changed
}
