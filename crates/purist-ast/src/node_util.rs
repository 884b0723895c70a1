//! Syntactic predicates over the AST.
//!
//! The locality predicates here ([`evaluates_to_local_value`],
//! [`all_args_unescaped_local`]) are deliberately imprecise: they do not
//! track local variables, so a bare name is never provably local. Callers
//! must treat `false` as "unknown", never as "definitely non-local".

use smallvec::SmallVec;

use crate::{Ast, JsDocInfo, Node, Token};

/// Built-in globals whose call form produces a value without side effects.
const BUILTIN_FUNCTIONS_WITHOUT_SIDE_EFFECTS: &[&str] =
    &["Object", "Array", "String", "Number", "Boolean", "RegExp", "Error"];

/// Built-in constructors that allocate without observable side effects.
const BUILTIN_CONSTRUCTORS_WITHOUT_SIDE_EFFECTS: &[&str] =
    &["Object", "Array", "Error", "RegExp", "Map", "Set"];

/// Instance methods that only read their receiver.
const OBJECT_METHODS_WITHOUT_SIDE_EFFECTS: &[&str] = &["toString", "valueOf", "hasOwnProperty"];

const MATH_METHODS_WITHOUT_SIDE_EFFECTS: &[&str] = &[
    "abs", "ceil", "floor", "max", "min", "pow", "random", "round", "sign", "sqrt", "trunc",
];

pub fn is_invocation(ast: &Ast, node: Node) -> bool {
    matches!(
        ast.token(node),
        Token::Call | Token::New | Token::TaggedTemplate
    )
}

pub fn is_function_expression(ast: &Ast, node: Node) -> bool {
    ast.token(node) == Token::Function
}

/// A `Name` declared by a `var`/`let`/`const` statement.
pub fn is_name_declaration(ast: &Ast, node: Node) -> bool {
    ast.token(node) == Token::Name
        && ast
            .parent(node)
            .is_some_and(|p| matches!(ast.token(p), Token::VarDecl(_)))
}

pub fn is_compound_assignment(ast: &Ast, node: Node) -> bool {
    matches!(ast.token(node), Token::CompoundAssign(_))
}

pub fn is_get(ast: &Ast, node: Node) -> bool {
    matches!(ast.token(node), Token::GetProp | Token::GetElem)
}

/// Is `node` a call of the form `f.call(..)` or `f.apply(..)`?
pub fn is_invocation_via_call_or_apply(ast: &Ast, node: Node) -> bool {
    if ast.token(node) != Token::Call {
        return false;
    }
    let Some(callee) = ast.child(node, 0) else {
        return false;
    };
    ast.token(callee) == Token::GetProp
        && matches!(ast.name(callee), Some("call") | Some("apply"))
}

/// Does evaluating `node` produce a fresh, unescaped value?
///
/// True for primitives and fresh literals/allocations. Bare names and
/// property reads are never provably local.
pub fn evaluates_to_local_value(ast: &Ast, node: Node) -> bool {
    match ast.token(node) {
        Token::Number | Token::Str | Token::Bool | Token::Null | Token::Empty => true,
        Token::ArrayLit | Token::ObjectLit | Token::Function | Token::TemplateLit | Token::New => {
            true
        }
        Token::Not
        | Token::TypeOf
        | Token::Neg
        | Token::Inc
        | Token::Dec
        | Token::Delete
        | Token::BinOp(_)
        | Token::CompoundAssign(_) => true,
        Token::Assign => ast
            .child(node, 1)
            .is_some_and(|value| evaluates_to_local_value(ast, value)),
        Token::And | Token::Or => ast
            .children(node)
            .iter()
            .all(|&child| evaluates_to_local_value(ast, child)),
        Token::Hook => {
            ast.child(node, 1)
                .is_some_and(|c| evaluates_to_local_value(ast, c))
                && ast
                    .child(node, 2)
                    .is_some_and(|c| evaluates_to_local_value(ast, c))
        }
        _ => false,
    }
}

/// Does every argument of the invocation produce a fresh, unescaped value?
pub fn all_args_unescaped_local(ast: &Ast, invocation: Node) -> bool {
    let args: &[Node] = match ast.token(invocation) {
        Token::Call | Token::New => &ast.children(invocation)[1..],
        Token::TaggedTemplate => match ast.child(invocation, 1) {
            Some(template) => ast.children(template),
            None => &[],
        },
        _ => return false,
    };
    args.iter()
        .all(|&arg| evaluates_to_local_value(ast, arg))
}

/// Every name or property target assigned by `target`, which may be a bare
/// name, a property access, a declaration, or a destructuring pattern.
pub fn find_lhs_nodes_in(ast: &Ast, target: Node) -> SmallVec<[Node; 4]> {
    let mut out = SmallVec::new();
    collect_lhs(ast, target, &mut out);
    out
}

fn collect_lhs(ast: &Ast, node: Node, out: &mut SmallVec<[Node; 4]>) {
    match ast.token(node) {
        Token::Name | Token::GetProp | Token::GetElem => out.push(node),
        Token::VarDecl(_) | Token::ArrayPattern => {
            for &child in ast.children(node) {
                collect_lhs(ast, child, out);
            }
        }
        Token::ObjectPattern => {
            for &member in ast.children(node) {
                match ast.token(member) {
                    Token::StringKey | Token::Rest => {
                        if let Some(inner) = ast.child(member, 0) {
                            collect_lhs(ast, inner, out);
                        }
                    }
                    Token::ComputedProp => {
                        if let Some(inner) = ast.child(member, 1) {
                            collect_lhs(ast, inner, out);
                        }
                    }
                    _ => {}
                }
            }
        }
        Token::Rest => {
            if let Some(inner) = ast.child(node, 0) {
                collect_lhs(ast, inner, out);
            }
        }
        _ => {}
    }
}

/// The value expression bound to a reference in L-value position, if there
/// is one that can be inspected.
pub fn get_rvalue_of_lvalue(ast: &Ast, node: Node) -> Option<Node> {
    if ast.token(node) == Token::StringKey {
        return ast.child(node, 0);
    }
    let parent = ast.parent(node)?;
    match ast.token(parent) {
        Token::Assign if ast.child(parent, 0) == Some(node) => ast.child(parent, 1),
        Token::VarDecl(_) => ast.child(node, 0),
        Token::Function | Token::Class if ast.child(parent, 0) == Some(node) => Some(parent),
        _ => None,
    }
}

/// Does `node` trigger iteration over a value that is not provably a pure
/// iterable?
///
/// Unknown iterables may run arbitrary code from `next()`, so anything but
/// a literal array, string, or template counts as impure.
pub fn iterates_impure_iterable(ast: &Ast, node: Node) -> bool {
    let iterable = match ast.token(node) {
        Token::Spread => ast.child(node, 0),
        Token::Yield { delegate } => {
            if !delegate {
                return false;
            }
            ast.child(node, 0)
        }
        Token::ForOf | Token::ForAwaitOf => ast.child(node, 1),
        Token::Rest => {
            // Rest in a parameter list does not iterate anything; rest in a
            // destructuring pattern drains the remainder of an unknown
            // iterable.
            return ast
                .parent(node)
                .is_some_and(|p| ast.token(p) != Token::ParamList);
        }
        _ => return false,
    };
    let Some(iterable) = iterable else {
        return true;
    };
    match ast.token(iterable) {
        Token::Str | Token::TemplateLit => false,
        Token::ArrayLit => ast
            .children(iterable)
            .iter()
            .any(|&el| ast.token(el) == Token::Spread && iterates_impure_iterable(ast, el)),
        _ => true,
    }
}

/// Intrinsic table: does this specific call have side effects regardless of
/// what the analysis knows about its callee?
pub fn function_call_has_side_effects(ast: &Ast, call: Node) -> bool {
    if ast.token(call) != Token::Call {
        return true;
    }
    let Some(callee) = ast.child(call, 0) else {
        return true;
    };
    match ast.token(callee) {
        Token::Name => match ast.name(callee) {
            Some(name) => !BUILTIN_FUNCTIONS_WITHOUT_SIDE_EFFECTS.contains(&name),
            None => true,
        },
        Token::GetProp => {
            let Some(prop) = ast.name(callee) else {
                return true;
            };
            if OBJECT_METHODS_WITHOUT_SIDE_EFFECTS.contains(&prop) {
                return false;
            }
            let receiver_is_math = ast
                .child(callee, 0)
                .is_some_and(|obj| ast.token(obj) == Token::Name && ast.name(obj) == Some("Math"));
            !(receiver_is_math && MATH_METHODS_WITHOUT_SIDE_EFFECTS.contains(&prop))
        }
        _ => true,
    }
}

/// Intrinsic table for `new` expressions.
pub fn constructor_call_has_side_effects(ast: &Ast, node: Node) -> bool {
    if ast.token(node) != Token::New {
        return true;
    }
    let Some(ctor) = ast.child(node, 0) else {
        return true;
    };
    match (ast.token(ctor), ast.name(ctor)) {
        (Token::Name, Some(name)) => !BUILTIN_CONSTRUCTORS_WITHOUT_SIDE_EFFECTS.contains(&name),
        _ => true,
    }
}

/// The documentation attached to a declaration, looking through the name
/// and assignment wrappers a declaration may be nested in.
pub fn get_best_jsdoc_info<'a>(ast: &'a Ast, node: Node) -> Option<&'a JsDocInfo> {
    let mut current = node;
    loop {
        if let Some(doc) = ast.jsdoc(current) {
            return Some(doc);
        }
        let parent = ast.parent(current)?;
        match ast.token(parent) {
            Token::Name
            | Token::StringKey
            | Token::Assign
            | Token::VarDecl(_)
            | Token::ExprResult => current = parent,
            _ => return None,
        }
    }
}

/// Tokens whose evaluation can mutate state, throw, or suspend. The body
/// analyzer must have an explicit case for every token this accepts.
pub fn token_has_side_effects(token: Token) -> bool {
    matches!(
        token,
        Token::Assign
            | Token::CompoundAssign(_)
            | Token::Inc
            | Token::Dec
            | Token::Delete
            | Token::Call
            | Token::New
            | Token::TaggedTemplate
            | Token::Throw
            | Token::Yield { .. }
            | Token::Await
            | Token::ForIn
            | Token::ForOf
            | Token::ForAwaitOf
            | Token::Spread
            | Token::Rest
    )
}
