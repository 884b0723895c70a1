//! End-to-end analysis tests: small programs in, per-call flag sets out.

use purist::{
    AnalysisError, CacheConvention, CallKind, CallSiteDescriptor, Lattice, PurityPass,
    RecordingReporter, ShortName, SummaryFlags, SummaryGraph, propagate_once,
};
use purist_ast::{AstBuilder, DeclKind, JsDocInfo, SideEffects, Ty};
use purist_test_utils::{analyze, function_decl, prop_flags, var_flags};

fn pure_flags() -> SideEffects {
    SideEffects::none()
}

#[test]
fn calling_an_empty_function_is_pure() {
    // function f(){}  f()
    let mut b = AstBuilder::new();
    let f = function_decl(&mut b, "f", &[], &[]);
    let f_ref = b.name("f");
    let call = b.call(f_ref, &[]);
    let stmt = b.expr_result(call);
    let root = b.script(&[f, stmt]);
    let mut program = b.finish_script(root);

    let pass = analyze(&mut program);
    assert_eq!(program.ast.side_effects(call), pure_flags());
    assert!(program.ast.side_effects(call).is_pure());
    assert!(var_flags(&pass, "f").is_empty());
}

#[test]
fn mutating_a_module_level_name_is_a_global_mutation() {
    // var n = 0;  function f(){ n++; }  f()
    let mut b = AstBuilder::new();
    let zero = b.number();
    let n_decl_name = b.declared_name("n", zero);
    let n_decl = b.var_decl(DeclKind::Var, &[n_decl_name]);
    let n_ref = b.name("n");
    let inc = b.inc(n_ref);
    let inc_stmt = b.expr_result(inc);
    let f = function_decl(&mut b, "f", &[], &[inc_stmt]);
    let f_ref = b.name("f");
    let call = b.call(f_ref, &[]);
    let stmt = b.expr_result(call);
    let root = b.script(&[n_decl, f, stmt]);
    let mut program = b.finish_script(root);

    let pass = analyze(&mut program);
    assert_eq!(
        program.ast.side_effects(call),
        SideEffects::MUTATES_GLOBAL_STATE
    );
    assert_eq!(var_flags(&pass, "f"), SummaryFlags::MUTATES_GLOBAL_STATE);
}

#[test]
fn throwing_marks_the_call() {
    // function f(){ throw 1; }  f()
    let mut b = AstBuilder::new();
    let one = b.number();
    let throw = b.throw(one);
    let f = function_decl(&mut b, "f", &[], &[throw]);
    let f_ref = b.name("f");
    let call = b.call(f_ref, &[]);
    let stmt = b.expr_result(call);
    let root = b.script(&[f, stmt]);
    let mut program = b.finish_script(root);

    let pass = analyze(&mut program);
    assert_eq!(program.ast.side_effects(call), SideEffects::THROWS);
    assert_eq!(var_flags(&pass, "f"), SummaryFlags::THROWS);
}

#[test]
fn argument_mutation_stays_contained_for_fresh_arguments() {
    // function f(o){ o.x = 1; }  function h(){ f({}); }
    let mut b = AstBuilder::new();
    let o_ref = b.name("o");
    let target = b.get_prop(o_ref, "x");
    let one = b.number();
    let assign = b.assign(target, one);
    let assign_stmt = b.expr_result(assign);
    let f = function_decl(&mut b, "f", &["o"], &[assign_stmt]);

    let f_ref = b.name("f");
    let fresh = b.object_lit(&[]);
    let call = b.call(f_ref, &[fresh]);
    let call_stmt = b.expr_result(call);
    let h = function_decl(&mut b, "h", &[], &[call_stmt]);
    let root = b.script(&[f, h]);
    let mut program = b.finish_script(root);

    let pass = analyze(&mut program);
    // The call itself mutates its argument, but the fresh literal cannot
    // alias anything the caller does not own.
    assert_eq!(
        program.ast.side_effects(call),
        SideEffects::MUTATES_ARGUMENTS
    );
    assert_eq!(var_flags(&pass, "f"), SummaryFlags::MUTATES_ARGUMENTS);
    assert!(var_flags(&pass, "h").is_empty());
}

#[test]
fn argument_mutation_escapes_through_shared_arguments() {
    // function f(o){ o.x = 1; }  var g = {};  function h(){ f(g); }  h()
    let mut b = AstBuilder::new();
    let o_ref = b.name("o");
    let target = b.get_prop(o_ref, "x");
    let one = b.number();
    let assign = b.assign(target, one);
    let assign_stmt = b.expr_result(assign);
    let f = function_decl(&mut b, "f", &["o"], &[assign_stmt]);

    let g_init = b.object_lit(&[]);
    let g_decl_name = b.declared_name("g", g_init);
    let g_decl = b.var_decl(DeclKind::Var, &[g_decl_name]);

    let f_ref = b.name("f");
    let g_ref = b.name("g");
    let inner_call = b.call(f_ref, &[g_ref]);
    let inner_stmt = b.expr_result(inner_call);
    let h = function_decl(&mut b, "h", &[], &[inner_stmt]);

    let h_ref = b.name("h");
    let outer_call = b.call(h_ref, &[]);
    let outer_stmt = b.expr_result(outer_call);
    let root = b.script(&[f, g_decl, h, outer_stmt]);
    let mut program = b.finish_script(root);

    let pass = analyze(&mut program);
    assert_eq!(
        program.ast.side_effects(inner_call),
        SideEffects::MUTATES_ARGUMENTS
    );
    // The argument escapes containment, so the enclosing function acquires
    // a global mutation.
    assert_eq!(var_flags(&pass, "h"), SummaryFlags::MUTATES_GLOBAL_STATE);
    assert_eq!(
        program.ast.side_effects(outer_call),
        SideEffects::MUTATES_GLOBAL_STATE
    );
}

#[test]
fn constructors_isolate_their_receiver() {
    // function Ctor(){ this.x = 1; }  function h(){ new Ctor(); }
    let mut b = AstBuilder::new();
    let this = b.this();
    let target = b.get_prop(this, "x");
    let one = b.number();
    let assign = b.assign(target, one);
    let assign_stmt = b.expr_result(assign);
    let ctor = function_decl(&mut b, "Ctor", &[], &[assign_stmt]);

    let ctor_ref = b.name("Ctor");
    let new_expr = b.new_expr(ctor_ref, &[]);
    let new_stmt = b.expr_result(new_expr);
    let h = function_decl(&mut b, "h", &[], &[new_stmt]);
    let root = b.script(&[ctor, h]);
    let mut program = b.finish_script(root);

    let pass = analyze(&mut program);
    assert_eq!(var_flags(&pass, "Ctor"), SummaryFlags::MUTATES_THIS);
    assert_eq!(program.ast.side_effects(new_expr), pure_flags());
    assert!(var_flags(&pass, "h").is_empty());
}

#[test]
fn a_name_bound_to_either_of_two_literals_unions_their_effects() {
    // var h = cond ? function(){ throw 1; } : function(){};  h()
    let mut b = AstBuilder::new();
    let cond = b.name("cond");
    let one = b.number();
    let throw = b.throw(one);
    let p1 = b.param_list(&[]);
    let b1 = b.block(&[throw]);
    let thrower = b.function("", p1, b1);
    let p2 = b.param_list(&[]);
    let b2 = b.block(&[]);
    let quiet = b.function("", p2, b2);
    let hook = b.hook(cond, thrower, quiet);
    let h_decl_name = b.declared_name("h", hook);
    let h_decl = b.var_decl(DeclKind::Var, &[h_decl_name]);
    let h_ref = b.name("h");
    let call = b.call(h_ref, &[]);
    let stmt = b.expr_result(call);
    let root = b.script(&[h_decl, stmt]);
    let mut program = b.finish_script(root);

    let pass = analyze(&mut program);
    assert_eq!(var_flags(&pass, "h"), SummaryFlags::THROWS);
    assert_eq!(program.ast.side_effects(call), SideEffects::THROWS);
}

#[test]
fn a_name_aliasing_other_names_is_soundly_pessimized() {
    // function f(){}  function g(){}  var h = cond ? f : g;  h()
    let mut b = AstBuilder::new();
    let f = function_decl(&mut b, "f", &[], &[]);
    let g = function_decl(&mut b, "g", &[], &[]);
    let cond = b.name("cond");
    let f_ref = b.name("f");
    let g_ref = b.name("g");
    let hook = b.hook(cond, f_ref, g_ref);
    let h_decl_name = b.declared_name("h", hook);
    let h_decl = b.var_decl(DeclKind::Var, &[h_decl_name]);
    let h_ref = b.name("h");
    let call = b.call(h_ref, &[]);
    let stmt = b.expr_result(call);
    let root = b.script(&[f, g, h_decl, stmt]);
    let mut program = b.finish_script(root);

    let pass = analyze(&mut program);
    // The call reports the union of everything `h` may be bound to; names
    // at a definition site cannot be seen through, so that union is the
    // pessimized summary.
    let union = var_flags(&pass, "f")
        .join(&var_flags(&pass, "g"))
        .join(&var_flags(&pass, "h"));
    assert_eq!(var_flags(&pass, "h"), union);
    assert_eq!(program.ast.side_effects(call), SideEffects::worst_case());
}

#[test]
fn property_summaries_aggregate_every_definition() {
    // var x = {};  x.m = function(){ counter++; };  y.m = function(){};
    // function h(){ z.m(); }
    let mut b = AstBuilder::new();
    let x_init = b.object_lit(&[]);
    let x_decl_name = b.declared_name("x", x_init);
    let x_decl = b.var_decl(DeclKind::Var, &[x_decl_name]);

    let counter = b.name("counter");
    let inc = b.inc(counter);
    let inc_stmt = b.expr_result(inc);
    let p1 = b.param_list(&[]);
    let b1 = b.block(&[inc_stmt]);
    let impure = b.function("", p1, b1);
    let x_ref = b.name("x");
    let x_m = b.get_prop(x_ref, "m");
    let assign1 = b.assign(x_m, impure);
    let stmt1 = b.expr_result(assign1);

    let p2 = b.param_list(&[]);
    let b2 = b.block(&[]);
    let pure = b.function("", p2, b2);
    let y_ref = b.name("y");
    let y_m = b.get_prop(y_ref, "m");
    let assign2 = b.assign(y_m, pure);
    let stmt2 = b.expr_result(assign2);

    let z_ref = b.name("z");
    let z_m = b.get_prop(z_ref, "m");
    let call = b.call(z_m, &[]);
    let call_stmt = b.expr_result(call);
    let h = function_decl(&mut b, "h", &[], &[call_stmt]);

    let root = b.script(&[x_decl, stmt1, stmt2, h]);
    let mut program = b.finish_script(root);

    let pass = analyze(&mut program);
    // Any `.m` may be the impure one.
    assert_eq!(prop_flags(&pass, "m"), SummaryFlags::MUTATES_GLOBAL_STATE);
    assert_eq!(
        program.ast.side_effects(call),
        SideEffects::MUTATES_GLOBAL_STATE
    );
    assert_eq!(var_flags(&pass, "h"), SummaryFlags::MUTATES_GLOBAL_STATE);
}

#[test]
fn dynamic_dispatch_names_are_always_fully_pessimized() {
    let mut b = AstBuilder::new();
    let f = function_decl(&mut b, "f", &[], &[]);
    let root = b.script(&[f]);
    let mut program = b.finish_script(root);

    let pass = analyze(&mut program);
    for name in ["call", "apply", "constructor"] {
        assert_eq!(prop_flags(&pass, name), SummaryFlags::all());
    }
}

#[test]
fn reflective_invocation_rewrites_receiver_mutation_to_arguments() {
    // function f(){ this.x = 1; }  function g(){ f.call(obj); }
    let mut b = AstBuilder::new();
    let this = b.this();
    let target = b.get_prop(this, "x");
    let one = b.number();
    let assign = b.assign(target, one);
    let assign_stmt = b.expr_result(assign);
    let f = function_decl(&mut b, "f", &[], &[assign_stmt]);

    let f_ref = b.name("f");
    let callee = b.get_prop(f_ref, "call");
    let obj = b.name("obj");
    let call = b.call(callee, &[obj]);
    let call_stmt = b.expr_result(call);
    let g = function_decl(&mut b, "g", &[], &[call_stmt]);
    let root = b.script(&[f, g]);
    let mut program = b.finish_script(root);

    let pass = analyze(&mut program);
    let flags = program.ast.side_effects(call);
    assert!(flags.contains(SideEffects::MUTATES_ARGUMENTS));
    assert!(!flags.contains(SideEffects::MUTATES_THIS));
    // The rebound receiver is an arbitrary value, so the caller mutates
    // state it does not own.
    assert_eq!(var_flags(&pass, "g"), SummaryFlags::MUTATES_GLOBAL_STATE);
}

#[test]
fn method_calls_on_the_own_receiver_keep_receiver_mutation() {
    // `.m` is defined with a receiver mutation, then invoked on `this`:
    // x.m = function(){ this.x = 1; };  function f(){ this.m(); }
    let mut b = AstBuilder::new();
    let this1 = b.this();
    let target = b.get_prop(this1, "x");
    let one = b.number();
    let assign = b.assign(target, one);
    let assign_stmt = b.expr_result(assign);
    let p = b.param_list(&[]);
    let blk = b.block(&[assign_stmt]);
    let method = b.function("", p, blk);
    let x_ref = b.name("x");
    let x_m = b.get_prop(x_ref, "m");
    let def = b.assign(x_m, method);
    let def_stmt = b.expr_result(def);

    let this2 = b.this();
    let this_m = b.get_prop(this2, "m");
    let call = b.call(this_m, &[]);
    let call_stmt = b.expr_result(call);
    let f = function_decl(&mut b, "f", &[], &[call_stmt]);
    let root = b.script(&[def_stmt, f]);
    let mut program = b.finish_script(root);

    let pass = analyze(&mut program);
    assert_eq!(prop_flags(&pass, "m"), SummaryFlags::MUTATES_THIS);
    assert_eq!(var_flags(&pass, "f"), SummaryFlags::MUTATES_THIS);
    assert_eq!(program.ast.side_effects(call), SideEffects::MUTATES_THIS);
}

#[test]
fn tainted_locals_resolve_at_scope_exit() {
    // function f(o){ var t = o; t.x = 1; }  (t may alias outside state)
    let mut b = AstBuilder::new();
    let o_ref = b.name("o");
    let t_decl_name = b.declared_name("t", o_ref);
    let t_decl = b.var_decl(DeclKind::Var, &[t_decl_name]);
    let t_ref = b.name("t");
    let target = b.get_prop(t_ref, "x");
    let one = b.number();
    let assign = b.assign(target, one);
    let assign_stmt = b.expr_result(assign);
    let f = function_decl(&mut b, "f", &["o"], &[t_decl, assign_stmt]);
    let root = b.script(&[f]);
    let mut program = b.finish_script(root);

    let pass = analyze(&mut program);
    assert_eq!(var_flags(&pass, "f"), SummaryFlags::MUTATES_GLOBAL_STATE);
}

#[test]
fn fresh_locals_contain_their_property_writes() {
    // function f(o){ var t = {}; t.x = o; }  (writes into a fresh object)
    let mut b = AstBuilder::new();
    let fresh = b.object_lit(&[]);
    let t_decl_name = b.declared_name("t", fresh);
    let t_decl = b.var_decl(DeclKind::Var, &[t_decl_name]);
    let t_ref = b.name("t");
    let target = b.get_prop(t_ref, "x");
    let o_ref = b.name("o");
    let assign = b.assign(target, o_ref);
    let assign_stmt = b.expr_result(assign);
    let f = function_decl(&mut b, "f", &["o"], &[t_decl, assign_stmt]);
    let root = b.script(&[f]);
    let mut program = b.finish_script(root);

    let pass = analyze(&mut program);
    assert!(var_flags(&pass, "f").is_empty());
}

#[test]
fn tainted_catch_values_are_global_mutations() {
    // function f(){ try {} catch (e) { e.x = 1; } }
    let mut b = AstBuilder::new();
    let try_block = b.block(&[]);
    let e_param = b.name("e");
    let e_ref = b.name("e");
    let target = b.get_prop(e_ref, "x");
    let one = b.number();
    let assign = b.assign(target, one);
    let assign_stmt = b.expr_result(assign);
    let catch_block = b.block(&[assign_stmt]);
    let catch = b.catch(e_param, catch_block);
    let try_ = b.try_(try_block, Some(catch), None);
    let f = function_decl(&mut b, "f", &[], &[try_]);
    let root = b.script(&[f]);
    let mut program = b.finish_script(root);

    let pass = analyze(&mut program);
    assert_eq!(var_flags(&pass, "f"), SummaryFlags::MUTATES_GLOBAL_STATE);
}

#[test]
fn iterating_an_unknown_iterable_is_fully_suspect() {
    // function f(p){ for (const x of p) {} }
    let mut b = AstBuilder::new();
    let x_decl_name = b.name("x");
    let lhs = b.var_decl(DeclKind::Const, &[x_decl_name]);
    let p_ref = b.name("p");
    let body = b.block(&[]);
    let for_of = b.for_of(lhs, p_ref, body);
    let f = function_decl(&mut b, "f", &["p"], &[for_of]);
    let root = b.script(&[f]);
    let mut program = b.finish_script(root);

    let pass = analyze(&mut program);
    assert_eq!(
        var_flags(&pass, "f"),
        SummaryFlags::THROWS
            .union(SummaryFlags::MUTATES_GLOBAL_STATE)
            .union(SummaryFlags::MUTATES_ARGUMENTS)
    );
}

#[test]
fn suspension_points_may_surface_exceptions() {
    // function a(){ await p; }  function s(){ yield; }
    let mut b = AstBuilder::new();
    let p_ref = b.name("p");
    let awaited = b.await_(p_ref);
    let await_stmt = b.expr_result(awaited);
    let a = function_decl(&mut b, "a", &[], &[await_stmt]);

    let yielded = b.yield_(None);
    let yield_stmt = b.expr_result(yielded);
    let s = function_decl(&mut b, "s", &[], &[yield_stmt]);
    let root = b.script(&[a, s]);
    let mut program = b.finish_script(root);

    let pass = analyze(&mut program);
    assert_eq!(var_flags(&pass, "a"), SummaryFlags::THROWS);
    assert_eq!(var_flags(&pass, "s"), SummaryFlags::THROWS);
}

#[test]
fn escaping_returns_taint_the_call_but_not_the_caller() {
    // function f(){ return shared; }  function h(){ f(); }
    let mut b = AstBuilder::new();
    let shared = b.name("shared");
    let ret = b.return_(Some(shared));
    let f = function_decl(&mut b, "f", &[], &[ret]);
    let f_ref = b.name("f");
    let call = b.call(f_ref, &[]);
    let call_stmt = b.expr_result(call);
    let h = function_decl(&mut b, "h", &[], &[call_stmt]);
    let root = b.script(&[f, h]);
    let mut program = b.finish_script(root);

    let pass = analyze(&mut program);
    assert_eq!(var_flags(&pass, "f"), SummaryFlags::ESCAPED_RETURN);
    assert_eq!(program.ast.side_effects(call), SideEffects::RETURN_TAINTED);
    // Return escape is a property of the direct producer only.
    assert!(var_flags(&pass, "h").is_empty());
}

#[test]
fn unresolvable_callees_pessimize_the_call_and_its_caller() {
    // function h(){ table[i](); }
    let mut b = AstBuilder::new();
    let table = b.name("table");
    let i = b.name("i");
    let elem = b.get_elem(table, i);
    let call = b.call(elem, &[]);
    let call_stmt = b.expr_result(call);
    let h = function_decl(&mut b, "h", &[], &[call_stmt]);
    let root = b.script(&[h]);
    let mut program = b.finish_script(root);

    let pass = analyze(&mut program);
    let mut expected = SideEffects::MUTATES_GLOBAL_STATE;
    expected.insert(SideEffects::THROWS);
    expected.insert(SideEffects::RETURN_TAINTED);
    assert_eq!(program.ast.side_effects(call), expected);
    assert_eq!(
        var_flags(&pass, "h"),
        SummaryFlags::MUTATES_GLOBAL_STATE.union(SummaryFlags::THROWS)
    );
}

#[test]
fn intrinsically_pure_builtins_override_the_aggregated_verdict() {
    // evil.abs = function(){ counter++; };  (pollutes the `.abs` summary)
    // function h(){ Math.abs(n); new Error(msg); }
    let mut b = AstBuilder::new();
    let counter = b.name("counter");
    let inc = b.inc(counter);
    let inc_stmt = b.expr_result(inc);
    let p = b.param_list(&[]);
    let blk = b.block(&[inc_stmt]);
    let evil_fn = b.function("", p, blk);
    let evil = b.name("evil");
    let evil_abs = b.get_prop(evil, "abs");
    let pollute = b.assign(evil_abs, evil_fn);
    let pollute_stmt = b.expr_result(pollute);

    let math = b.name("Math");
    let abs = b.get_prop(math, "abs");
    let n = b.name("n");
    let abs_call = b.call(abs, &[n]);
    let abs_stmt = b.expr_result(abs_call);
    let error = b.name("Error");
    let msg = b.name("msg");
    let new_error = b.new_expr(error, &[msg]);
    let new_stmt = b.expr_result(new_error);
    let h = function_decl(&mut b, "h", &[], &[abs_stmt, new_stmt]);
    let root = b.script(&[pollute_stmt, h]);
    let mut program = b.finish_script(root);

    let pass = analyze(&mut program);
    // Name aggregation alone would blame `Math.abs` for the polluted `.abs`
    // summary; the intrinsic table clears the side-effect bits and keeps
    // only return taint.
    assert_eq!(prop_flags(&pass, "abs"), SummaryFlags::MUTATES_GLOBAL_STATE);
    assert!(!program.ast.side_effects(abs_call).has_side_effects());
    assert!(!program.ast.side_effects(new_error).has_side_effects());
}

#[test]
fn extern_annotations_flow_into_call_sites() {
    // externs: /** @nosideeffects */ function pureExt(){} : number
    //          function wildExt(){}
    // script:  function h(){ pureExt(); }  function k(){ wildExt(); }
    let mut b = AstBuilder::new();
    let pure_ext = function_decl(&mut b, "pureExt", &[], &[]);
    b.set_jsdoc(pure_ext, JsDocInfo::new().no_side_effects());
    b.set_declared_return(pure_ext, Ty::Number);
    let wild_ext = function_decl(&mut b, "wildExt", &[], &[]);
    let externs = b.script(&[pure_ext, wild_ext]);

    let pure_ref = b.name("pureExt");
    let pure_call = b.call(pure_ref, &[]);
    let pure_stmt = b.expr_result(pure_call);
    let h = function_decl(&mut b, "h", &[], &[pure_stmt]);

    let wild_ref = b.name("wildExt");
    let wild_call = b.call(wild_ref, &[]);
    let wild_stmt = b.expr_result(wild_call);
    let k = function_decl(&mut b, "k", &[], &[wild_stmt]);

    let root = b.script(&[h, k]);
    let mut program = b.finish(externs, root);

    let pass = analyze(&mut program);
    assert!(program.ast.side_effects(pure_call).is_pure());
    assert!(var_flags(&pass, "h").is_empty());

    let wild = program.ast.side_effects(wild_call);
    assert!(wild.contains(SideEffects::MUTATES_GLOBAL_STATE));
    assert!(wild.contains(SideEffects::THROWS));
    assert!(wild.contains(SideEffects::RETURN_TAINTED));
    assert_eq!(
        var_flags(&pass, "k"),
        SummaryFlags::MUTATES_GLOBAL_STATE.union(SummaryFlags::THROWS)
    );
}

#[test]
fn extern_property_stubs_are_pessimized() {
    // externs: host.feature;  script: function h(){ w.feature(); }
    let mut b = AstBuilder::new();
    let host = b.name("host");
    let stub = b.get_prop(host, "feature");
    let stub_stmt = b.expr_result(stub);
    let externs = b.script(&[stub_stmt]);

    let w = b.name("w");
    let callee = b.get_prop(w, "feature");
    let call = b.call(callee, &[]);
    let call_stmt = b.expr_result(call);
    let h = function_decl(&mut b, "h", &[], &[call_stmt]);
    let root = b.script(&[h]);
    let mut program = b.finish(externs, root);

    let pass = analyze(&mut program);
    assert_eq!(prop_flags(&pass, "feature"), SummaryFlags::all());
    assert!(program.ast.side_effects(call).has_side_effects());
}

#[test]
fn memoization_cache_calls_resolve_to_their_inner_functions() {
    // function valueFn(){ throw 1; }  function h(){ memo.cache(c, k, valueFn); }
    let mut b = AstBuilder::new();
    let one = b.number();
    let throw = b.throw(one);
    let value_fn = function_decl(&mut b, "valueFn", &[], &[throw]);

    let memo = b.name("memo");
    let cache = b.get_prop(memo, "cache");
    let container = b.name("c");
    let key = b.str_lit("k");
    let value_ref = b.name("valueFn");
    let call = b.call(cache, &[container, key, value_ref]);
    let call_stmt = b.expr_result(call);
    let h = function_decl(&mut b, "h", &[], &[call_stmt]);
    let root = b.script(&[value_fn, h]);
    let mut program = b.finish_script(root);

    let mut pass = PurityPass::builder()
        .convention(CacheConvention)
        .reporter(RecordingReporter::default())
        .build();
    pass.process(&mut program).expect("analysis failed");

    assert_eq!(program.ast.side_effects(call), SideEffects::THROWS);
    let h_flags = pass
        .summary_flags(&ShortName::for_var("h").unwrap())
        .unwrap();
    assert_eq!(h_flags, SummaryFlags::THROWS);
}

// ---- Analysis-wide properties ---------------------------------------------

#[test]
fn summary_flags_satisfy_the_lattice_laws() {
    let elements = vec![
        SummaryFlags::empty(),
        SummaryFlags::THROWS,
        SummaryFlags::MUTATES_GLOBAL_STATE,
        SummaryFlags::MUTATES_THIS,
        SummaryFlags::MUTATES_ARGUMENTS,
        SummaryFlags::ESCAPED_RETURN,
        SummaryFlags::THROWS.union(SummaryFlags::MUTATES_GLOBAL_STATE),
        SummaryFlags::MUTATES_THIS.union(SummaryFlags::ESCAPED_RETURN),
        SummaryFlags::all(),
    ];
    purist_test_utils::lattice::assert_finite_lattice_laws(&elements);
}

#[test]
fn propagation_is_monotone_sweep_by_sweep() {
    let mut graph = SummaryGraph::new();
    let names: Vec<_> = ["a", "b", "c", "d"]
        .iter()
        .map(|n| graph.ensure_summary(&ShortName::for_var(n).unwrap()))
        .collect();
    let descriptor = |local, this_eq, kind| CallSiteDescriptor {
        all_args_unescaped_local: local,
        callee_this_equals_caller_this: this_eq,
        call_kind: kind,
    };
    graph.connect(names[0], names[1], descriptor(false, false, CallKind::Call));
    graph.connect(names[1], names[2], descriptor(true, true, CallKind::Call));
    graph.connect(names[2], names[3], descriptor(true, false, CallKind::New));
    graph.connect(names[3], names[0], descriptor(false, false, CallKind::Call));
    graph.add_flags(
        names[0],
        SummaryFlags::MUTATES_ARGUMENTS.union(SummaryFlags::MUTATES_THIS),
    );
    graph.add_flags(names[2], SummaryFlags::THROWS);

    let mut previous: Vec<SummaryFlags> =
        graph.summaries().map(|(_, s)| s.flags()).collect();
    loop {
        let changed = propagate_once(&mut graph);
        let next: Vec<SummaryFlags> = graph.summaries().map(|(_, s)| s.flags()).collect();
        for (before, after) in previous.iter().zip(&next) {
            assert!(
                before.is_subseteq(after),
                "flags regressed: {before:?} -> {after:?}"
            );
        }
        previous = next;
        if !changed {
            break;
        }
    }
}

#[test]
fn reanalysis_of_an_annotated_program_changes_nothing() {
    let build = || {
        let mut b = AstBuilder::new();
        let counter = b.name("counter");
        let inc = b.inc(counter);
        let inc_stmt = b.expr_result(inc);
        let noisy = function_decl(&mut b, "noisy", &[], &[inc_stmt]);
        let quiet = function_decl(&mut b, "quiet", &[], &[]);
        let noisy_ref = b.name("noisy");
        let noisy_call = b.call(noisy_ref, &[]);
        let noisy_stmt = b.expr_result(noisy_call);
        let quiet_ref = b.name("quiet");
        let quiet_call = b.call(quiet_ref, &[]);
        let quiet_stmt = b.expr_result(quiet_call);
        let root = b.script(&[noisy, quiet, noisy_stmt, quiet_stmt]);
        b.finish_script(root)
    };

    // Fresh instances over identical programs agree call for call.
    let mut first_program = build();
    let first = analyze(&mut first_program);
    let mut second_program = build();
    let second = analyze(&mut second_program);
    let first_flags: Vec<SideEffects> = first
        .calls()
        .iter()
        .map(|&call| first_program.ast.side_effects(call))
        .collect();
    let second_flags: Vec<SideEffects> = second
        .calls()
        .iter()
        .map(|&call| second_program.ast.side_effects(call))
        .collect();
    assert_eq!(first_flags, second_flags);
    assert!(!first.reporter().changed.is_empty());

    // A fresh instance over the already-annotated tree reports no changes:
    // re-running can never flip a verdict.
    let rerun = analyze(&mut first_program);
    assert!(rerun.reporter().changed.is_empty());
    let rerun_flags: Vec<SideEffects> = rerun
        .calls()
        .iter()
        .map(|&call| first_program.ast.side_effects(call))
        .collect();
    assert_eq!(first_flags, rerun_flags);
}

#[test]
fn a_pass_instance_is_single_shot() {
    let mut b = AstBuilder::new();
    let f = function_decl(&mut b, "f", &[], &[]);
    let root = b.script(&[f]);
    let mut program = b.finish_script(root);

    let mut pass = PurityPass::with_defaults();
    pass.process(&mut program).expect("first run");
    assert!(matches!(
        pass.process(&mut program),
        Err(AnalysisError::AlreadyProcessed)
    ));
}

#[test]
fn every_observed_effect_reaches_the_aggregated_summary() {
    // Two functions share the name `.m` through different objects; every
    // syntactic effect of either body must show up in the one summary.
    let mut b = AstBuilder::new();
    let this = b.this();
    let t1 = b.get_prop(this, "x");
    let one = b.number();
    let assign1 = b.assign(t1, one);
    let s1 = b.expr_result(assign1);
    let p1 = b.param_list(&[]);
    let blk1 = b.block(&[s1]);
    let m1 = b.function("", p1, blk1);
    let a_ref = b.name("a");
    let a_m = b.get_prop(a_ref, "m");
    let def1 = b.assign(a_m, m1);
    let def1_stmt = b.expr_result(def1);

    let two = b.number();
    let throw = b.throw(two);
    let p2 = b.param_list(&[]);
    let blk2 = b.block(&[throw]);
    let m2 = b.function("", p2, blk2);
    let b_ref = b.name("b");
    let b_m = b.get_prop(b_ref, "m");
    let def2 = b.assign(b_m, m2);
    let def2_stmt = b.expr_result(def2);

    let root = b.script(&[def1_stmt, def2_stmt]);
    let mut program = b.finish_script(root);

    let pass = analyze(&mut program);
    let flags = prop_flags(&pass, "m");
    assert!(flags.contains(SummaryFlags::MUTATES_THIS));
    assert!(flags.contains(SummaryFlags::THROWS));
}

