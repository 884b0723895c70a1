use indexmap::IndexMap;
use purist_arena::Arena;
use purist_ast::{Ast, Node, Token, node_util};
use rustc_hash::FxHashMap;

purist_arena::identifier! {
    /// Handle to a scope.
    struct Scope
}

purist_arena::identifier! {
    /// Handle to a declared variable.
    struct Var
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ScopeKind {
    Script,
    Function,
    Catch,
}

#[derive(Clone, Debug)]
pub struct ScopeInfo {
    pub kind: ScopeKind,
    pub parent: Option<Scope>,
    /// The `Script`, `Function`, or `Catch` node that opens this scope.
    pub node: Node,
    pub(crate) vars: IndexMap<String, Var>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum VarKind {
    Param,
    CatchParam,
    Local,
    FunctionName,
}

#[derive(Clone, Debug)]
pub struct VarInfo {
    pub name: String,
    pub scope: Scope,
    pub kind: VarKind,
    /// The declaring `Name` node.
    pub node: Node,
}

/// Variable resolution table for one script tree.
///
/// Scopes are opened by `Script`, `Function`, and `Catch` nodes. Declarations
/// hoist to the nearest *container* scope (script or function); only catch
/// parameters stay in their catch scope.
#[derive(Debug, Default)]
pub struct ScopeTable {
    scopes: Arena<Scope, ScopeInfo>,
    vars: Arena<Var, VarInfo>,
    by_node: FxHashMap<Node, Scope>,
}

impl ScopeTable {
    pub fn build(ast: &Ast, root: Node) -> Self {
        let mut table = Self::default();
        let script = table.new_scope(ScopeKind::Script, None, root);
        table.walk(ast, root, script);
        table
    }

    fn new_scope(&mut self, kind: ScopeKind, parent: Option<Scope>, node: Node) -> Scope {
        let scope = self.scopes.alloc(ScopeInfo {
            kind,
            parent,
            node,
            vars: IndexMap::new(),
        });
        self.by_node.insert(node, scope);
        scope
    }

    fn declare(&mut self, scope: Scope, name: &str, kind: VarKind, node: Node) -> Var {
        if let Some(&existing) = self.scopes[scope].vars.get(name) {
            return existing;
        }
        let var = self.vars.alloc(VarInfo {
            name: name.to_string(),
            scope,
            kind,
            node,
        });
        self.scopes[scope].vars.insert(name.to_string(), var);
        var
    }

    fn declare_targets(&mut self, ast: &Ast, scope: Scope, target: Node, kind: VarKind) {
        for lhs in node_util::find_lhs_nodes_in(ast, target) {
            if ast.token(lhs) == Token::Name
                && let Some(name) = ast.name(lhs)
            {
                self.declare(scope, name, kind, lhs);
            }
        }
    }

    fn walk(&mut self, ast: &Ast, node: Node, scope: Scope) {
        match ast.token(node) {
            Token::Function => {
                let fn_scope = self.new_scope(ScopeKind::Function, Some(scope), node);
                if let Some(name_node) = ast.child(node, 0)
                    && ast.token(name_node) == Token::Name
                    && let Some(name) = ast.name(name_node)
                {
                    // Statement-position functions bind in the enclosing
                    // scope; a named function expression binds only inside
                    // itself.
                    let statement = ast
                        .parent(node)
                        .is_some_and(|p| matches!(ast.token(p), Token::Block | Token::Script));
                    let target = if statement {
                        self.container_of(scope)
                    } else {
                        fn_scope
                    };
                    self.declare(target, name, VarKind::FunctionName, name_node);
                }
                if let Some(params) = ast.child(node, 1) {
                    for &param in ast.children(params) {
                        self.declare_targets(ast, fn_scope, param, VarKind::Param);
                    }
                }
                if let Some(body) = ast.child(node, 2) {
                    self.walk(ast, body, fn_scope);
                }
            }
            Token::Catch => {
                let catch_scope = self.new_scope(ScopeKind::Catch, Some(scope), node);
                if let Some(param) = ast.child(node, 0) {
                    self.declare_targets(ast, catch_scope, param, VarKind::CatchParam);
                }
                if let Some(block) = ast.child(node, 1) {
                    self.walk(ast, block, catch_scope);
                }
            }
            Token::VarDecl(_) => {
                let container = self.container_of(scope);
                for i in 0..ast.children(node).len() {
                    let name_node = ast.children(node)[i];
                    self.declare_targets(ast, container, name_node, VarKind::Local);
                    if let Some(init) = ast.child(name_node, 0) {
                        self.walk(ast, init, scope);
                    }
                }
            }
            _ => {
                for i in 0..ast.children(node).len() {
                    let child = ast.children(node)[i];
                    self.walk(ast, child, scope);
                }
            }
        }
    }

    // -- Queries -------------------------------------------------------------

    /// The innermost scope enclosing `node`.
    pub fn enclosing_scope(&self, ast: &Ast, node: Node) -> Option<Scope> {
        let mut current = Some(node);
        while let Some(n) = current {
            if let Some(&scope) = self.by_node.get(&n) {
                return Some(scope);
            }
            current = ast.parent(n);
        }
        None
    }

    /// Resolve `name` through the scope chain.
    pub fn lookup(&self, scope: Scope, name: &str) -> Option<Var> {
        let mut current = Some(scope);
        while let Some(s) = current {
            if let Some(&var) = self.scopes[s].vars.get(name) {
                return Some(var);
            }
            current = self.scopes[s].parent;
        }
        None
    }

    pub fn var(&self, var: Var) -> &VarInfo {
        &self.vars[var]
    }

    pub fn is_param(&self, var: Var) -> bool {
        self.vars[var].kind == VarKind::Param
    }

    pub fn is_catch(&self, var: Var) -> bool {
        self.vars[var].kind == VarKind::CatchParam
    }

    /// The nearest non-catch scope at or above `scope`.
    pub fn container_of(&self, scope: Scope) -> Scope {
        let mut current = scope;
        while self.scopes[current].kind == ScopeKind::Catch {
            match self.scopes[current].parent {
                Some(parent) => current = parent,
                None => break,
            }
        }
        current
    }

    /// Is `var` declared in the same container scope that `scope` sits in?
    pub fn has_same_container_scope(&self, var: Var, scope: Scope) -> bool {
        self.container_of(self.vars[var].scope) == self.container_of(scope)
    }

    /// The scope opened by a function node, if any.
    pub fn function_scope(&self, fn_node: Node) -> Option<Scope> {
        self.by_node.get(&fn_node).copied()
    }

    /// Every variable whose container is `container`, in declaration order.
    /// Includes catch parameters of catch scopes nested under it.
    pub fn vars_of_container(&self, container: Scope) -> Vec<Var> {
        let mut out = Vec::new();
        for (scope, info) in self.scopes.iter() {
            if self.container_of(scope) == container {
                out.extend(info.vars.values().copied());
            }
        }
        out
    }
}
