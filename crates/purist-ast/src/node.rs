use purist_arena::{Arena, GetInfo, InternTable};

use crate::{JsDocInfo, SideEffects, Ty};

purist_arena::identifier! {
    /// Handle to an AST node.
    struct Node
}

/// Interned name payload (identifiers, property names, string literals).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Symbol(usize);

impl From<usize> for Symbol {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl From<Symbol> for usize {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

impl purist_arena::InternKey for Symbol {}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum DeclKind {
    Var,
    Let,
    Const,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,
    Eq,
    Ne,
    StrictEq,
    StrictNe,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    InstanceOf,
}

impl BinaryOp {
    /// Comparison-like operators, whose operands are unambiguous reads.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::Ne
                | BinaryOp::StrictEq
                | BinaryOp::StrictNe
                | BinaryOp::Lt
                | BinaryOp::Le
                | BinaryOp::Gt
                | BinaryOp::Ge
                | BinaryOp::In
                | BinaryOp::InstanceOf
        )
    }
}

/// Node discriminator.
///
/// Child conventions (all positional):
/// - `Function`: `[name | Empty, ParamList, Block]`
/// - `VarDecl`: `Name` children; a declared `Name` holds its initializer as
///   its only child
/// - `Call` / `New`: `[callee, args..]`; `TaggedTemplate`: `[callee, TemplateLit]`
/// - `GetProp`: `[object]` with the property name as payload;
///   `GetElem`: `[object, key]`
/// - `Assign` / `CompoundAssign`: `[target, value]`
/// - `Hook`: `[cond, then, else]`; `If`: `[cond, then]` or `[cond, then, else]`
/// - `ForIn` / `ForOf` / `ForAwaitOf`: `[lhs, expr, Block]`
/// - `Try`: `[Block, Catch | Empty, Block | Empty]`; `Catch`: `[param, Block]`
/// - `Class`: `[name | Empty, heritage | Empty, Block]`
/// - `ObjectLit`: `StringKey`/`ComputedProp`/`Spread` children; a `StringKey`
///   holds its value as its only child
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Token {
    Script,
    Function,
    ParamList,
    Block,
    Empty,

    ExprResult,
    VarDecl(DeclKind),
    If,
    While,
    Switch,
    Case,
    DefaultCase,
    Try,
    Catch,
    Return,
    Throw,
    Break,
    Continue,
    ForIn,
    ForOf,
    ForAwaitOf,
    Class,

    Name,
    This,
    Number,
    Str,
    Bool,
    Null,
    ArrayLit,
    ObjectLit,
    StringKey,
    ComputedProp,
    ObjectPattern,
    ArrayPattern,
    TemplateLit,

    GetProp,
    GetElem,
    Call,
    New,
    TaggedTemplate,

    Assign,
    CompoundAssign(BinaryOp),
    Inc,
    Dec,
    Delete,
    Not,
    TypeOf,
    Neg,
    BinOp(BinaryOp),
    And,
    Or,
    Hook,

    Yield { delegate: bool },
    Await,
    Spread,
    Rest,
}

#[derive(Clone, Debug)]
pub struct NodeInfo {
    pub(crate) token: Token,
    pub(crate) parent: Option<Node>,
    pub(crate) children: Vec<Node>,
    pub(crate) name: Option<Symbol>,
    pub(crate) jsdoc: Option<JsDocInfo>,
    pub(crate) declared_return: Option<Ty>,
    pub(crate) from_externs: bool,
    pub(crate) side_effects: Option<SideEffects>,
}

impl NodeInfo {
    pub(crate) fn new(token: Token) -> Self {
        Self {
            token,
            parent: None,
            children: Vec::new(),
            name: None,
            jsdoc: None,
            declared_return: None,
            from_externs: false,
            side_effects: None,
        }
    }

    pub fn token(&self) -> Token {
        self.token
    }
}

/// The program tree. Nodes are allocated through [`crate::AstBuilder`] and
/// immutable afterwards, except for the [`SideEffects`] annotation slot on
/// invocation nodes.
#[derive(Clone, Debug, Default)]
pub struct Ast {
    pub(crate) nodes: Arena<Node, NodeInfo>,
    pub(crate) names: InternTable<String, Symbol>,
}

impl Ast {
    pub fn token(&self, node: Node) -> Token {
        self.nodes[node].token
    }

    pub fn parent(&self, node: Node) -> Option<Node> {
        self.nodes[node].parent
    }

    pub fn children(&self, node: Node) -> &[Node] {
        &self.nodes[node].children
    }

    pub fn child(&self, node: Node, index: usize) -> Option<Node> {
        self.nodes[node].children.get(index).copied()
    }

    /// String payload of a `Name`, `GetProp`, `StringKey`, or `Str` node.
    pub fn name(&self, node: Node) -> Option<&str> {
        self.nodes[node]
            .name
            .and_then(|sym| self.names.resolve(sym))
            .map(String::as_str)
    }

    pub fn jsdoc(&self, node: Node) -> Option<&JsDocInfo> {
        self.nodes[node].jsdoc.as_ref()
    }

    pub fn declared_return(&self, node: Node) -> Option<Ty> {
        self.nodes[node].declared_return
    }

    pub fn from_externs(&self, node: Node) -> bool {
        self.nodes[node].from_externs
    }

    /// Side-effect annotation of an invocation node. An invocation that has
    /// never been analyzed is assumed to do everything.
    pub fn side_effects(&self, node: Node) -> SideEffects {
        self.nodes[node]
            .side_effects
            .unwrap_or_else(SideEffects::worst_case)
    }

    pub fn set_side_effects(&mut self, node: Node, effects: SideEffects) {
        self.nodes[node].side_effects = Some(effects);
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Index of `child` in its parent's child list.
    pub fn child_index(&self, child: Node) -> Option<usize> {
        let parent = self.parent(child)?;
        self.children(parent).iter().position(|&c| c == child)
    }
}

impl GetInfo<Ast> for Node {
    type Info = NodeInfo;

    fn get_info<'a>(&self, context: &'a Ast) -> Option<&'a NodeInfo> {
        context.nodes.get(*self)
    }

    fn get_info_mut<'a>(&self, context: &'a mut Ast) -> Option<&'a mut NodeInfo> {
        context.nodes.get_mut(*self)
    }
}
