use crate::{Ast, Node};

/// Pre/post traversal hooks.
pub trait Visitor {
    fn enter(&mut self, _ast: &Ast, _node: Node) {}
    fn exit(&mut self, _ast: &Ast, _node: Node) {}
}

/// Depth-first walk: `enter` before children, `exit` after.
pub fn traverse<V: Visitor>(ast: &Ast, root: Node, visitor: &mut V) {
    visitor.enter(ast, root);
    for i in 0..ast.children(root).len() {
        let child = ast.children(root)[i];
        traverse(ast, child, visitor);
    }
    visitor.exit(ast, root);
}
