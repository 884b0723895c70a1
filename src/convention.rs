use purist_ast::{Ast, Node, Token};

/// A recognized memoization-cache invocation: a value-producing function and
/// an optional key-producing function, both effectively invoked by the call.
#[derive(Clone, Copy, Debug)]
pub struct CacheCall {
    pub value_fn: Node,
    pub key_fn: Option<Node>,
}

/// Library-idiom queries the analysis delegates to the embedding compiler.
pub trait CodingConvention {
    /// If `invocation` is a recognized memoization-cache call, describe it.
    fn describe_cached_call(&self, ast: &Ast, invocation: Node) -> Option<CacheCall>;
}

/// Recognizes nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultConvention;

impl CodingConvention for DefaultConvention {
    fn describe_cached_call(&self, _ast: &Ast, _invocation: Node) -> Option<CacheCall> {
        None
    }
}

/// Recognizes the `<obj>.cache(container, key, valueFn[, keyFn])` idiom.
#[derive(Clone, Copy, Debug, Default)]
pub struct CacheConvention;

impl CodingConvention for CacheConvention {
    fn describe_cached_call(&self, ast: &Ast, invocation: Node) -> Option<CacheCall> {
        if ast.token(invocation) != Token::Call {
            return None;
        }
        let callee = ast.child(invocation, 0)?;
        if ast.token(callee) != Token::GetProp || ast.name(callee) != Some("cache") {
            return None;
        }
        let arg_count = ast.children(invocation).len() - 1;
        if !(3..=4).contains(&arg_count) {
            return None;
        }
        Some(CacheCall {
            value_fn: ast.child(invocation, 3)?,
            key_fn: ast.child(invocation, 4),
        })
    }
}
