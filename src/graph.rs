use indexmap::IndexMap;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use purist_ast::Node;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::flags::SummaryFlags;
use crate::summary::{AmbiguatedSummary, ShortName};

/// Syntactic form of an invocation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CallKind {
    Call,
    New,
    TaggedTemplate,
}

/// Immutable record of how side-effects flow from callee to caller at one
/// call site.
#[derive(Clone, Copy, Debug)]
pub struct CallSiteDescriptor {
    /// Every argument at this site is provably a fresh local value.
    pub all_args_unescaped_local: bool,
    /// The receiver bound by this call is syntactically the caller's own
    /// `this`. Never true for a `call`/`apply` invocation.
    pub callee_this_equals_caller_this: bool,
    pub call_kind: CallKind,
}

/// Summary store and reverse call graph in one structure.
///
/// One [`AmbiguatedSummary`] node per distinct short name; edges point
/// callee → caller so that changes to a callee are pushed to its dependents
/// during the fixed point. Handles are petgraph's stable `NodeIndex`es.
#[derive(Debug, Default)]
pub struct SummaryGraph {
    graph: DiGraph<AmbiguatedSummary, CallSiteDescriptor>,
    by_name: IndexMap<ShortName, NodeIndex>,
    by_function: FxHashMap<Node, SmallVec<[NodeIndex; 2]>>,
}

impl SummaryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// The summary node for `name`, creating an empty one if needed.
    pub fn ensure_summary(&mut self, name: &ShortName) -> NodeIndex {
        if let Some(&idx) = self.by_name.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(AmbiguatedSummary::new(name.clone()));
        self.graph[idx].set_graph_id(idx);
        self.by_name.insert(name.clone(), idx);
        idx
    }

    pub fn summary_for_name(&self, name: &ShortName) -> Option<NodeIndex> {
        self.by_name.get(name).copied()
    }

    pub fn summary(&self, idx: NodeIndex) -> &AmbiguatedSummary {
        &self.graph[idx]
    }

    /// Monotone flag update; returns whether anything changed.
    pub fn add_flags(&mut self, idx: NodeIndex, flags: SummaryFlags) -> bool {
        self.graph[idx].add_flags(flags)
    }

    pub fn set_all_flags(&mut self, idx: NodeIndex) {
        self.graph[idx].add_flags(SummaryFlags::all());
    }

    /// Record that a function literal contributes to `summary`.
    pub fn associate(&mut self, fn_node: Node, summary: NodeIndex) {
        let entries = self.by_function.entry(fn_node).or_default();
        if !entries.contains(&summary) {
            entries.push(summary);
        }
    }

    /// Every summary the given function literal contributes to.
    pub fn summaries_of_function(&self, fn_node: Node) -> &[NodeIndex] {
        self.by_function
            .get(&fn_node)
            .map_or(&[], |entries| entries.as_slice())
    }

    /// Add a callee → caller edge carrying the call-site descriptor.
    pub fn connect(
        &mut self,
        callee: NodeIndex,
        caller: NodeIndex,
        descriptor: CallSiteDescriptor,
    ) -> EdgeIndex {
        self.graph.add_edge(callee, caller, descriptor)
    }

    /// Snapshot of every edge as `(callee, caller, descriptor)`.
    pub fn edge_list(&self) -> Vec<(NodeIndex, NodeIndex, CallSiteDescriptor)> {
        self.graph
            .edge_references()
            .map(|e| (e.source(), e.target(), *e.weight()))
            .collect()
    }

    /// All summaries in creation order.
    pub fn summaries(&self) -> impl Iterator<Item = (&ShortName, &AmbiguatedSummary)> {
        self.by_name
            .iter()
            .map(|(name, &idx)| (name, &self.graph[idx]))
    }

    pub fn summary_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summaries_are_unique_per_name() {
        let mut graph = SummaryGraph::new();
        let name = ShortName::for_var("f").unwrap();
        let a = graph.ensure_summary(&name);
        let b = graph.ensure_summary(&name);
        assert_eq!(a, b);
        assert_eq!(graph.summary_count(), 1);
        assert_eq!(graph.summary(a).graph_id(), a);
    }

    #[test]
    fn association_deduplicates() {
        let mut b = purist_ast::AstBuilder::new();
        let params = b.param_list(&[]);
        let body = b.block(&[]);
        let fn_node = b.function("f", params, body);

        let mut graph = SummaryGraph::new();
        let name = ShortName::for_var("f").unwrap();
        let idx = graph.ensure_summary(&name);
        graph.associate(fn_node, idx);
        graph.associate(fn_node, idx);
        assert_eq!(graph.summaries_of_function(fn_node), &[idx]);
    }
}
