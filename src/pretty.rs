//! Deterministic surface-syntax printer.
//!
//! Used by the `show` subcommand and by snapshot tests to inspect what the
//! optimizer produced. Assignment expressions, which the parser never
//! produces, print as `(name := value)`.

use conduit_ast::{
    BinaryOperator, Block, Expr, FunctionDefinition, ItemKind, Program, Spanned, Statement,
};
use std::fmt::Write;

pub fn print_program<'db>(db: &'db dyn salsa::Database, program: Program<'db>) -> String {
    let mut out = String::new();
    for (i, item) in program.items(db).iter().enumerate() {
        let def = match item.kind(db) {
            ItemKind::Function(def) => *def,
            _ => continue,
        };
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&print_function(db, def));
    }
    out
}

pub fn print_function<'db>(db: &'db dyn salsa::Database, def: FunctionDefinition<'db>) -> String {
    let mut out = String::new();
    for decorator in def.decorators(db) {
        let _ = writeln!(out, "@{decorator}");
    }
    let _ = writeln!(
        out,
        "fn {}({}) {{",
        def.name(db),
        def.parameters(db).join(", ")
    );
    write_block(&mut out, def.body(db));
    out.push_str("}\n");
    out
}

fn write_block(out: &mut String, block: &Block) {
    for statement in &block.statements {
        match statement {
            Statement::Let(let_stmt) => {
                let _ = writeln!(out, "    let {} = {};", let_stmt.name, print_expr(&let_stmt.value));
            }
            Statement::Expression(expr) => {
                let _ = writeln!(out, "    {}", print_expr(expr));
            }
        }
    }
}

pub fn print_expr((expr, _): &Spanned<Expr>) -> String {
    match expr {
        Expr::Number(n) => n.to_string(),
        Expr::Bool(b) => b.to_string(),
        Expr::String(s) => format!("{s:?}"),
        Expr::Name(name) => name.clone(),
        Expr::List(items) => {
            let items: Vec<_> = items.iter().map(print_expr).collect();
            format!("[{}]", items.join(", "))
        }
        Expr::Binary(binary) => format!(
            "{} {} {}",
            print_operand(&binary.left),
            operator_token(binary.operator),
            print_operand(&binary.right),
        ),
        Expr::Call(call) => {
            let arguments: Vec<_> = call.arguments.iter().map(print_expr).collect();
            format!("{}({})", print_callee(&call.callee), arguments.join(", "))
        }
        Expr::Lambda(lambda) => {
            format!("fn({}) {}", lambda.parameters.join(", "), print_expr(&lambda.body))
        }
        Expr::Spread(inner) => format!("...{}", print_expr(inner)),
        Expr::Bind(bind) => format!("({} := {})", bind.name, print_expr(&bind.value)),
    }
}

/// Binary operands are parenthesized whenever they are binary themselves, so
/// the printed grouping always matches the tree.
fn print_operand(operand: &Spanned<Expr>) -> String {
    match &operand.0 {
        Expr::Binary(_) => format!("({})", print_expr(operand)),
        _ => print_expr(operand),
    }
}

fn print_callee(callee: &Spanned<Expr>) -> String {
    match &callee.0 {
        Expr::Name(_) | Expr::Call(_) => print_expr(callee),
        _ => format!("({})", print_expr(callee)),
    }
}

fn operator_token(operator: BinaryOperator) -> &'static str {
    use BinaryOperator::*;
    match operator {
        Add => "+",
        Subtract => "-",
        Multiply => "*",
        Divide => "/",
        Equal => "==",
        NotEqual => "!=",
        LessThan => "<",
        GreaterThan => ">",
        LessEqual => "<=",
        GreaterEqual => ">=",
    }
}
