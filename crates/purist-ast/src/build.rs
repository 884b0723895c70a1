use crate::node::NodeInfo;
use crate::{Ast, BinaryOp, DeclKind, JsDocInfo, Node, Token, Ty};

/// A parsed program: one tree holding the externs root and the script root.
#[derive(Clone, Debug)]
pub struct Program {
    pub ast: Ast,
    pub externs: Node,
    pub root: Node,
}

/// Programmatic AST construction.
///
/// Nodes are built bottom-up; attaching a child fixes its parent link, so a
/// node must appear in exactly one child list. [`finish`](Self::finish)
/// seals the tree and marks everything under the externs root.
#[derive(Debug, Default)]
pub struct AstBuilder {
    ast: Ast,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, token: Token, children: Vec<Node>) -> Node {
        let node = self.ast.nodes.alloc(NodeInfo::new(token));
        for &child in &children {
            debug_assert!(
                self.ast.nodes[child].parent.is_none(),
                "node attached twice: {child:?}"
            );
            self.ast.nodes[child].parent = Some(node);
        }
        self.ast.nodes[node].children = children;
        node
    }

    fn push_named(&mut self, token: Token, name: &str, children: Vec<Node>) -> Node {
        let sym = self.ast.names.intern(name.to_string());
        let node = self.push(token, children);
        self.ast.nodes[node].name = Some(sym);
        node
    }

    // -- Leaves -------------------------------------------------------------

    pub fn name(&mut self, name: &str) -> Node {
        self.push_named(Token::Name, name, vec![])
    }

    /// A declared name carrying its initializer, for use under a declaration.
    pub fn declared_name(&mut self, name: &str, init: Node) -> Node {
        self.push_named(Token::Name, name, vec![init])
    }

    pub fn this(&mut self) -> Node {
        self.push(Token::This, vec![])
    }

    pub fn number(&mut self) -> Node {
        self.push(Token::Number, vec![])
    }

    pub fn str_lit(&mut self, value: &str) -> Node {
        self.push_named(Token::Str, value, vec![])
    }

    pub fn bool_lit(&mut self) -> Node {
        self.push(Token::Bool, vec![])
    }

    pub fn null(&mut self) -> Node {
        self.push(Token::Null, vec![])
    }

    pub fn empty(&mut self) -> Node {
        self.push(Token::Empty, vec![])
    }

    // -- Literals and patterns ---------------------------------------------

    pub fn array_lit(&mut self, elements: &[Node]) -> Node {
        self.push(Token::ArrayLit, elements.to_vec())
    }

    pub fn object_lit(&mut self, members: &[Node]) -> Node {
        self.push(Token::ObjectLit, members.to_vec())
    }

    pub fn string_key(&mut self, key: &str, value: Node) -> Node {
        self.push_named(Token::StringKey, key, vec![value])
    }

    pub fn computed_prop(&mut self, key: Node, value: Node) -> Node {
        self.push(Token::ComputedProp, vec![key, value])
    }

    pub fn template_lit(&mut self, parts: &[Node]) -> Node {
        self.push(Token::TemplateLit, parts.to_vec())
    }

    pub fn object_pattern(&mut self, members: &[Node]) -> Node {
        self.push(Token::ObjectPattern, members.to_vec())
    }

    pub fn array_pattern(&mut self, elements: &[Node]) -> Node {
        self.push(Token::ArrayPattern, elements.to_vec())
    }

    // -- Accesses and invocations ------------------------------------------

    pub fn get_prop(&mut self, object: Node, prop: &str) -> Node {
        self.push_named(Token::GetProp, prop, vec![object])
    }

    pub fn get_elem(&mut self, object: Node, key: Node) -> Node {
        self.push(Token::GetElem, vec![object, key])
    }

    pub fn call(&mut self, callee: Node, args: &[Node]) -> Node {
        let mut children = vec![callee];
        children.extend_from_slice(args);
        self.push(Token::Call, children)
    }

    pub fn new_expr(&mut self, ctor: Node, args: &[Node]) -> Node {
        let mut children = vec![ctor];
        children.extend_from_slice(args);
        self.push(Token::New, children)
    }

    pub fn tagged_template(&mut self, callee: Node, template: Node) -> Node {
        self.push(Token::TaggedTemplate, vec![callee, template])
    }

    // -- Operators ----------------------------------------------------------

    pub fn assign(&mut self, target: Node, value: Node) -> Node {
        self.push(Token::Assign, vec![target, value])
    }

    pub fn compound_assign(&mut self, op: BinaryOp, target: Node, value: Node) -> Node {
        self.push(Token::CompoundAssign(op), vec![target, value])
    }

    pub fn inc(&mut self, target: Node) -> Node {
        self.push(Token::Inc, vec![target])
    }

    pub fn dec(&mut self, target: Node) -> Node {
        self.push(Token::Dec, vec![target])
    }

    pub fn delete(&mut self, target: Node) -> Node {
        self.push(Token::Delete, vec![target])
    }

    pub fn not(&mut self, operand: Node) -> Node {
        self.push(Token::Not, vec![operand])
    }

    pub fn type_of(&mut self, operand: Node) -> Node {
        self.push(Token::TypeOf, vec![operand])
    }

    pub fn neg(&mut self, operand: Node) -> Node {
        self.push(Token::Neg, vec![operand])
    }

    pub fn bin(&mut self, op: BinaryOp, lhs: Node, rhs: Node) -> Node {
        self.push(Token::BinOp(op), vec![lhs, rhs])
    }

    pub fn and(&mut self, lhs: Node, rhs: Node) -> Node {
        self.push(Token::And, vec![lhs, rhs])
    }

    pub fn or(&mut self, lhs: Node, rhs: Node) -> Node {
        self.push(Token::Or, vec![lhs, rhs])
    }

    pub fn hook(&mut self, cond: Node, then: Node, otherwise: Node) -> Node {
        self.push(Token::Hook, vec![cond, then, otherwise])
    }

    // -- Control and effects -----------------------------------------------

    pub fn return_(&mut self, value: Option<Node>) -> Node {
        self.push(Token::Return, value.into_iter().collect())
    }

    pub fn throw(&mut self, value: Node) -> Node {
        self.push(Token::Throw, vec![value])
    }

    pub fn yield_(&mut self, value: Option<Node>) -> Node {
        self.push(Token::Yield { delegate: false }, value.into_iter().collect())
    }

    pub fn yield_all(&mut self, value: Node) -> Node {
        self.push(Token::Yield { delegate: true }, vec![value])
    }

    pub fn await_(&mut self, value: Node) -> Node {
        self.push(Token::Await, vec![value])
    }

    pub fn spread(&mut self, value: Node) -> Node {
        self.push(Token::Spread, vec![value])
    }

    pub fn rest(&mut self, target: Node) -> Node {
        self.push(Token::Rest, vec![target])
    }

    // -- Statements ---------------------------------------------------------

    pub fn expr_result(&mut self, expr: Node) -> Node {
        self.push(Token::ExprResult, vec![expr])
    }

    pub fn var_decl(&mut self, kind: DeclKind, names: &[Node]) -> Node {
        self.push(Token::VarDecl(kind), names.to_vec())
    }

    pub fn block(&mut self, statements: &[Node]) -> Node {
        self.push(Token::Block, statements.to_vec())
    }

    pub fn param_list(&mut self, params: &[Node]) -> Node {
        self.push(Token::ParamList, params.to_vec())
    }

    /// A function literal. Pass an empty `name` for an anonymous function.
    pub fn function(&mut self, name: &str, params: Node, body: Node) -> Node {
        let name_node = if name.is_empty() {
            self.empty()
        } else {
            self.name(name)
        };
        self.push(Token::Function, vec![name_node, params, body])
    }

    pub fn if_(&mut self, cond: Node, then: Node, otherwise: Option<Node>) -> Node {
        let mut children = vec![cond, then];
        children.extend(otherwise);
        self.push(Token::If, children)
    }

    pub fn while_(&mut self, cond: Node, body: Node) -> Node {
        self.push(Token::While, vec![cond, body])
    }

    pub fn switch(&mut self, discriminant: Node, cases: &[Node]) -> Node {
        let mut children = vec![discriminant];
        children.extend_from_slice(cases);
        self.push(Token::Switch, children)
    }

    pub fn case(&mut self, expr: Node, body: Node) -> Node {
        self.push(Token::Case, vec![expr, body])
    }

    pub fn default_case(&mut self, body: Node) -> Node {
        self.push(Token::DefaultCase, vec![body])
    }

    pub fn for_in(&mut self, lhs: Node, object: Node, body: Node) -> Node {
        self.push(Token::ForIn, vec![lhs, object, body])
    }

    pub fn for_of(&mut self, lhs: Node, iterable: Node, body: Node) -> Node {
        self.push(Token::ForOf, vec![lhs, iterable, body])
    }

    pub fn for_await_of(&mut self, lhs: Node, iterable: Node, body: Node) -> Node {
        self.push(Token::ForAwaitOf, vec![lhs, iterable, body])
    }

    pub fn try_(&mut self, block: Node, catch: Option<Node>, finally: Option<Node>) -> Node {
        let catch = catch.unwrap_or_else(|| self.empty());
        let finally = finally.unwrap_or_else(|| self.empty());
        self.push(Token::Try, vec![block, catch, finally])
    }

    pub fn catch(&mut self, param: Node, block: Node) -> Node {
        self.push(Token::Catch, vec![param, block])
    }

    pub fn class(&mut self, name: &str, heritage: Option<Node>, body: Node) -> Node {
        let name_node = if name.is_empty() {
            self.empty()
        } else {
            self.name(name)
        };
        let heritage = heritage.unwrap_or_else(|| self.empty());
        self.push(Token::Class, vec![name_node, heritage, body])
    }

    pub fn break_(&mut self) -> Node {
        self.push(Token::Break, vec![])
    }

    pub fn script(&mut self, statements: &[Node]) -> Node {
        self.push(Token::Script, statements.to_vec())
    }

    // -- Annotations ---------------------------------------------------------

    pub fn set_jsdoc(&mut self, node: Node, jsdoc: JsDocInfo) {
        self.ast.nodes[node].jsdoc = Some(jsdoc);
    }

    pub fn set_declared_return(&mut self, node: Node, ty: Ty) {
        self.ast.nodes[node].declared_return = Some(ty);
    }

    // -- Sealing -------------------------------------------------------------

    /// Seal the tree into a [`Program`], marking the externs subtree.
    pub fn finish(mut self, externs: Node, root: Node) -> Program {
        let mut stack = vec![externs];
        while let Some(node) = stack.pop() {
            self.ast.nodes[node].from_externs = true;
            stack.extend_from_slice(&self.ast.nodes[node].children);
        }
        Program {
            ast: self.ast,
            externs,
            root,
        }
    }

    /// Seal a program with an empty externs tree.
    pub fn finish_script(mut self, root: Node) -> Program {
        let externs = self.script(&[]);
        self.finish(externs, root)
    }
}
