//! Snapshot the exact shape the optimizer produces.

use conduit::pretty::print_program;
use conduit::{optimize_program, ConduitDatabaseImpl, SourceFile};
use salsa::Database;

fn optimized(text: &str) -> String {
    ConduitDatabaseImpl::default().attach(|db| {
        let source = SourceFile::new(db, "test.cdt".into(), text.to_owned());
        print_program(db, optimize_program(db, source))
    })
}

#[test]
fn named_stages_become_nested_calls() {
    let printed = optimized(
        "@fast_pipes\nfn main() { pipe(3, double, inc, double) }",
    );
    insta::assert_snapshot!(printed, @r###"
    fn main_fast_pipes() {
        double(inc(double(3)))
    }
    "###);
}

#[test]
fn single_use_lambda_is_substituted_directly() {
    let printed = optimized("@fast_pipes\nfn main() { pipe(5, fn(x) x + 1) }");
    insta::assert_snapshot!(printed, @r###"
    fn main_fast_pipes() {
        5 + 1
    }
    "###);
}

#[test]
fn multi_use_lambda_gets_an_assignment_expression() {
    let printed = optimized("@fast_pipes\nfn main() { pipe(5, fn(x) x + x + 1) }");
    insta::assert_snapshot!(printed, @r###"
    fn main_fast_pipes() {
        ((__pipe_tmp0 := 5) + __pipe_tmp0) + 1
    }
    "###);
}

#[test]
fn other_decorators_and_functions_are_preserved() {
    let printed = optimized(
        "fn double(x) { x * 2 }\n\
         @traced\n@fast_pipes\nfn main() { pipe(2, double) }",
    );
    insta::assert_snapshot!(printed, @r###"
    fn double(x) {
        x * 2
    }

    @traced
    fn main_fast_pipes() {
        double(2)
    }
    "###);
}

#[test]
fn nested_pipes_compose_inside_out() {
    let printed = optimized(
        "@fast_pipes\nfn main() { pipe(1, fn(x) x + pipe(2, double)) }",
    );
    insta::assert_snapshot!(printed, @r###"
    fn main_fast_pipes() {
        1 + double(2)
    }
    "###);
}
