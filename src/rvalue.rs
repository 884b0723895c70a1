use purist_ast::{Ast, Node, Token};

/// Is `node` unambiguously read at its use site?
///
/// A conservative whitelist of syntactic contexts that can only observe a
/// value. Everything else, including contexts added by future grammar,
/// is treated as a write, so a miss here can only pessimize a summary,
/// never launder one.
pub(crate) fn is_rvalue(ast: &Ast, node: Node) -> bool {
    let Some(parent) = ast.parent(node) else {
        return false;
    };
    let first = ast.child(parent, 0) == Some(node);
    match ast.token(parent) {
        // Operand of an invocation, callee included.
        Token::Call | Token::New | Token::TaggedTemplate => true,
        Token::And | Token::Or | Token::Not | Token::TypeOf => true,
        Token::BinOp(op) => op.is_comparison(),
        Token::ArrayLit => true,
        // The object side of a property access is read; the key of a
        // computed access is not whitelisted.
        Token::GetProp | Token::GetElem => first,
        Token::Return | Token::Yield { .. } => true,
        // Object-literal value position, but not a destructuring pattern.
        Token::StringKey => ast
            .parent(parent)
            .is_some_and(|grandparent| ast.token(grandparent) == Token::ObjectLit),
        Token::Assign | Token::CompoundAssign(_) => !first,
        // Initializer of a declared name.
        Token::Name => {
            ast.parent(parent)
                .is_some_and(|grandparent| matches!(ast.token(grandparent), Token::VarDecl(_)))
        }
        // `extends` target.
        Token::Class => ast.child(parent, 1) == Some(node),
        Token::Switch | Token::Case | Token::While | Token::If => first,
        // A bare expression statement reads its operand, except in externs
        // where a bare declaration is a stub for a name with no value.
        Token::ExprResult => !ast.from_externs(node),
        _ => false,
    }
}
