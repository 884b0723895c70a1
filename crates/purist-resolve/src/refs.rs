use indexmap::IndexMap;
use purist_ast::{Ast, Node, Token, Visitor, traverse};

/// Every textual reference to every variable and property name, in source
/// order.
///
/// Variable references are `Name` nodes; property references are `GetProp`
/// nodes and literal `StringKey`s. Computed accesses (`o[expr]`) have no
/// static name and are not recorded.
#[derive(Debug, Default)]
pub struct ReferenceMap {
    names: IndexMap<String, Vec<Node>>,
    props: IndexMap<String, Vec<Node>>,
}

struct Collector<'a> {
    map: &'a mut ReferenceMap,
}

impl Visitor for Collector<'_> {
    fn enter(&mut self, ast: &Ast, node: Node) {
        match ast.token(node) {
            Token::Name => {
                if let Some(name) = ast.name(node) {
                    self.map
                        .names
                        .entry(name.to_string())
                        .or_default()
                        .push(node);
                }
            }
            Token::GetProp | Token::StringKey => {
                if let Some(name) = ast.name(node) {
                    self.map
                        .props
                        .entry(name.to_string())
                        .or_default()
                        .push(node);
                }
            }
            _ => {}
        }
    }
}

impl ReferenceMap {
    /// Collect references under the given roots (externs first, then the
    /// script, by convention).
    pub fn collect(ast: &Ast, roots: &[Node]) -> Self {
        let mut map = Self::default();
        for &root in roots {
            traverse(ast, root, &mut Collector { map: &mut map });
        }
        map
    }

    pub fn name_references(&self) -> impl Iterator<Item = (&str, &[Node])> {
        self.names.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn prop_references(&self) -> impl Iterator<Item = (&str, &[Node])> {
        self.props.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}
