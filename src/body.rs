use petgraph::graph::NodeIndex;
use purist_ast::{Ast, Node, Token, node_util};
use purist_resolve::{ScopeTable, Var};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::callees::summaries_for_callee;
use crate::convention::CodingConvention;
use crate::error::AnalysisError;
use crate::flags::SummaryFlags;
use crate::graph::{CallKind, CallSiteDescriptor, SummaryGraph};

/// Walks every function body, attributing local side-effects to the
/// enclosing function's summaries and recording one graph edge per resolved
/// call site. Returns every invocation node found, for later annotation.
pub(crate) struct BodyAnalyzer<'a, C: CodingConvention> {
    ast: &'a Ast,
    scopes: &'a ScopeTable,
    graph: &'a mut SummaryGraph,
    convention: &'a C,
    all_calls: Vec<Node>,
    enclosing: Vec<Node>,
    /// Locals that may hold a non-local value, per function.
    blacklisted: FxHashMap<Node, FxHashSet<Var>>,
    /// Locals whose properties were written, per function.
    tainted: FxHashMap<Node, FxHashSet<Var>>,
}

impl<'a, C: CodingConvention> BodyAnalyzer<'a, C> {
    pub(crate) fn new(
        ast: &'a Ast,
        scopes: &'a ScopeTable,
        graph: &'a mut SummaryGraph,
        convention: &'a C,
    ) -> Self {
        Self {
            ast,
            scopes,
            graph,
            convention,
            all_calls: Vec::new(),
            enclosing: Vec::new(),
            blacklisted: FxHashMap::default(),
            tainted: FxHashMap::default(),
        }
    }

    pub(crate) fn analyze(mut self, root: Node) -> Result<Vec<Node>, AnalysisError> {
        self.visit(root)?;
        debug_assert!(self.enclosing.is_empty());
        Ok(self.all_calls)
    }

    fn visit(&mut self, node: Node) -> Result<(), AnalysisError> {
        let is_function = self.ast.token(node) == Token::Function;
        if is_function {
            self.enclosing.push(node);
        }
        for i in 0..self.ast.children(node).len() {
            let child = self.ast.children(node)[i];
            self.visit(child)?;
        }
        if is_function {
            self.enclosing.pop();
            self.resolve_scope_exit(node);
            return Ok(());
        }
        self.record(node)
    }

    fn enclosing_summaries(&self) -> SmallVec<[NodeIndex; 2]> {
        match self.enclosing.last() {
            Some(&fn_node) => SmallVec::from_slice(self.graph.summaries_of_function(fn_node)),
            None => SmallVec::new(),
        }
    }

    fn add_to_enclosing(&mut self, flags: SummaryFlags) {
        for summary in self.enclosing_summaries() {
            self.graph.add_flags(summary, flags);
        }
    }

    fn record(&mut self, node: Node) -> Result<(), AnalysisError> {
        let ast = self.ast;
        match ast.token(node) {
            Token::Call | Token::New | Token::TaggedTemplate => self.record_invocation(node)?,
            Token::Assign => {
                let rhs_local = ast
                    .child(node, 1)
                    .is_some_and(|value| node_util::evaluates_to_local_value(ast, value));
                if let Some(target) = ast.child(node, 0) {
                    self.visit_lhs_targets(target, rhs_local);
                }
            }
            Token::CompoundAssign(_) | Token::Inc | Token::Dec | Token::Delete => {
                // The stored value is a primitive result (or, for `delete`,
                // nothing); the write itself is what matters.
                if let Some(target) = ast.child(node, 0) {
                    self.visit_lhs_targets(target, true);
                }
            }
            Token::ForIn => {
                // The iteration variable is always a string.
                if let Some(target) = ast.child(node, 0) {
                    self.visit_lhs_targets(target, true);
                }
            }
            Token::ForOf => {
                // Iterable contents are never ours.
                if let Some(target) = ast.child(node, 0) {
                    self.visit_lhs_targets(target, false);
                }
                self.check_iteration(node);
            }
            Token::ForAwaitOf => {
                if let Some(target) = ast.child(node, 0) {
                    self.visit_lhs_targets(target, false);
                }
                self.check_iteration(node);
                self.control_loss();
            }
            Token::Throw => self.add_to_enclosing(SummaryFlags::THROWS),
            Token::Return => {
                if let Some(value) = ast.child(node, 0)
                    && !node_util::evaluates_to_local_value(ast, value)
                {
                    self.add_to_enclosing(SummaryFlags::ESCAPED_RETURN);
                }
            }
            Token::Yield { .. } => {
                self.check_iteration(node);
                self.control_loss();
            }
            Token::Await => self.control_loss(),
            Token::Spread | Token::Rest => self.check_iteration(node),
            Token::Name => {
                // A declared name whose initializer is not provably local
                // may be bound to outside state.
                if node_util::is_name_declaration(ast, node)
                    && let Some(init) = ast.child(node, 0)
                    && !node_util::evaluates_to_local_value(ast, init)
                {
                    self.blacklist_declared(node);
                }
            }
            token => {
                if node_util::token_has_side_effects(token) {
                    return Err(AnalysisError::UnhandledToken(token));
                }
            }
        }
        Ok(())
    }

    fn record_invocation(&mut self, node: Node) -> Result<(), AnalysisError> {
        self.all_calls.push(node);
        let callees = summaries_for_callee(self.ast, self.graph, self.convention, node)?;
        let callers = self.enclosing_summaries();
        match callees {
            None => {
                // Calling the unknown: assume it touches globals and throws.
                self.add_to_enclosing(
                    SummaryFlags::MUTATES_GLOBAL_STATE.union(SummaryFlags::THROWS),
                );
            }
            Some(callees) => {
                if callers.is_empty() {
                    return Ok(());
                }
                let descriptor = compute_descriptor(self.ast, node);
                for &callee in &callees {
                    for &caller in &callers {
                        self.graph.connect(callee, caller, descriptor);
                    }
                }
            }
        }
        Ok(())
    }

    fn visit_lhs_targets(&mut self, target: Node, rhs_local: bool) {
        if self.enclosing.last().is_none() {
            // Script-level effects have no summary to land in.
            return;
        }
        for lhs in node_util::find_lhs_nodes_in(self.ast, target) {
            if node_util::is_get(self.ast, lhs) {
                self.visit_property_write(lhs);
            } else {
                self.visit_name_write(lhs, rhs_local);
            }
        }
    }

    /// A write to `obj.p` / `obj[k]`: own receiver, a same-scope local, or
    /// somewhere beyond reach.
    fn visit_property_write(&mut self, lhs: Node) {
        let Some(object) = self.ast.child(lhs, 0) else {
            return;
        };
        match self.ast.token(object) {
            Token::This => self.add_to_enclosing(SummaryFlags::MUTATES_THIS),
            Token::Name => {
                let var = self.resolve_same_container(object, lhs);
                match var {
                    Some(var) => self.taint(var),
                    None => self.add_to_enclosing(SummaryFlags::MUTATES_GLOBAL_STATE),
                }
            }
            // A multi-hop receiver cannot be tracked.
            _ => self.add_to_enclosing(SummaryFlags::MUTATES_GLOBAL_STATE),
        }
    }

    /// A write to a bare name: either a same-scope local (possibly
    /// blacklisting it) or global state.
    fn visit_name_write(&mut self, lhs: Node, rhs_local: bool) {
        match self.resolve_same_container(lhs, lhs) {
            Some(var) => {
                if !rhs_local {
                    self.blacklist(var);
                }
            }
            None => self.add_to_enclosing(SummaryFlags::MUTATES_GLOBAL_STATE),
        }
    }

    /// Resolve a name to a variable declared in the same container scope as
    /// the use site.
    fn resolve_same_container(&self, name_node: Node, site: Node) -> Option<Var> {
        let name = self.ast.name(name_node)?;
        let scope = self.scopes.enclosing_scope(self.ast, site)?;
        let var = self.scopes.lookup(scope, name)?;
        self.scopes
            .has_same_container_scope(var, scope)
            .then_some(var)
    }

    fn taint(&mut self, var: Var) {
        if let Some(&fn_node) = self.enclosing.last() {
            self.tainted.entry(fn_node).or_default().insert(var);
        }
    }

    fn blacklist(&mut self, var: Var) {
        if let Some(&fn_node) = self.enclosing.last() {
            self.blacklisted.entry(fn_node).or_default().insert(var);
        }
    }

    fn blacklist_declared(&mut self, name_node: Node) {
        if let Some(var) = self.resolve_same_container(name_node, name_node) {
            self.blacklist(var);
        }
    }

    /// Iterating an unknown iterable runs an unknown `next()`, possibly on
    /// a parameter.
    fn check_iteration(&mut self, node: Node) {
        if node_util::iterates_impure_iterable(self.ast, node) {
            self.add_to_enclosing(
                SummaryFlags::THROWS
                    .union(SummaryFlags::MUTATES_GLOBAL_STATE)
                    .union(SummaryFlags::MUTATES_ARGUMENTS),
            );
        }
    }

    /// A suspension point may surface a rejection or thrown value.
    fn control_loss(&mut self) {
        self.add_to_enclosing(SummaryFlags::THROWS);
    }

    /// Deferred local resolution at function exit: decide what the taints
    /// and blacklists accumulated for this function amount to.
    fn resolve_scope_exit(&mut self, fn_node: Node) {
        let blacklisted = self.blacklisted.remove(&fn_node).unwrap_or_default();
        let tainted = self.tainted.remove(&fn_node).unwrap_or_default();

        let summaries: SmallVec<[_; 2]> =
            SmallVec::from_slice(self.graph.summaries_of_function(fn_node));
        if summaries.is_empty() {
            return;
        }
        let Some(scope) = self.scopes.function_scope(fn_node) else {
            return;
        };

        let mut taints_arguments = false;
        let mut taints_global = false;
        for var in self.scopes.vars_of_container(scope) {
            let param = self.scopes.is_param(var);
            if param && !blacklisted.contains(&var) && tainted.contains(&var) {
                taints_arguments = true;
                continue;
            }
            // Parameters and catch values can come from other scopes; a
            // tainted variable whose binding may alias outside state has
            // mutated outside state.
            let local = !param && !self.scopes.is_catch(var);
            if (!local || blacklisted.contains(&var)) && tainted.contains(&var) {
                taints_global = true;
                break;
            }
        }

        for summary in summaries {
            if self.graph.summary(summary).mutates_global_state() {
                continue;
            }
            if taints_arguments {
                self.graph.add_flags(summary, SummaryFlags::MUTATES_ARGUMENTS);
            }
            if taints_global {
                self.graph
                    .add_flags(summary, SummaryFlags::MUTATES_GLOBAL_STATE);
            }
        }
    }
}

/// How side-effects flow through one call site.
pub(crate) fn compute_descriptor(ast: &Ast, invocation: Node) -> CallSiteDescriptor {
    let call_kind = match ast.token(invocation) {
        Token::New => CallKind::New,
        Token::TaggedTemplate => CallKind::TaggedTemplate,
        _ => CallKind::Call,
    };
    let via_call_apply = node_util::is_invocation_via_call_or_apply(ast, invocation);
    let receiver = if via_call_apply {
        // The receiver is rebound to the first argument.
        ast.child(invocation, 1)
    } else {
        ast.child(invocation, 0).and_then(|callee| {
            if node_util::is_get(ast, callee) {
                ast.child(callee, 0)
            } else {
                None
            }
        })
    };
    let callee_this_equals_caller_this = !via_call_apply
        && receiver.is_some_and(|r| ast.token(r) == Token::This);
    // Argument locality is judged uniformly over the syntactic argument
    // list; a receiver rebound through `call`/`apply` gets no special
    // treatment because local bindings are not tracked.
    CallSiteDescriptor {
        all_args_unescaped_local: node_util::all_args_unescaped_local(ast, invocation),
        callee_this_equals_caller_this,
        call_kind,
    }
}
