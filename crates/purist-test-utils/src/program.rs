//! Program fixtures and a one-call analysis harness.

use purist::{PurityPass, ShortName, SummaryFlags};
use purist_ast::{AstBuilder, Node, Program};

/// Run a default-configured pass over `program`, panicking on wiring errors.
pub fn analyze(program: &mut Program) -> PurityPass {
    let mut pass = PurityPass::with_defaults();
    pass.process(program).expect("analysis failed");
    pass
}

/// Fixed-point flags of the summary for a variable name.
pub fn var_flags(pass: &PurityPass, name: &str) -> SummaryFlags {
    pass.summary_flags(&ShortName::for_var(name).unwrap())
        .unwrap_or_else(|| panic!("no summary for variable `{name}`"))
}

/// Fixed-point flags of the summary for a property name.
pub fn prop_flags(pass: &PurityPass, name: &str) -> SummaryFlags {
    pass.summary_flags(&ShortName::for_prop(name).unwrap())
        .unwrap_or_else(|| panic!("no summary for property `.{name}`"))
}

/// `function <name>(<params>) { <body> }` in statement position.
pub fn function_decl(
    b: &mut AstBuilder,
    name: &str,
    params: &[&str],
    body: &[Node],
) -> Node {
    let param_nodes: Vec<Node> = params.iter().map(|p| b.name(p)).collect();
    let param_list = b.param_list(&param_nodes);
    let block = b.block(body);
    b.function(name, param_list, block)
}
