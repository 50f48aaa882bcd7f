use owo_colors::OwoColorize;

use lumen_syntax::error::{Error, ErrorKind};

/// Prints `err` for the source line `source`, which sits at `lineno` in its
/// input (1 for `-e` and the REPL).
pub fn render_error(err: &Error, source: &str, lineno: usize) {
    eprintln!("{}: {}", err.kind.describe().red().bold(), err.msg.red());
    point_at(err, source, lineno);
    provide_error_suggestions(err);
}

/// Recovered problems: lexical skips and call faults turned into `Error` values.
pub fn render_warning(err: &Error, source: &str, lineno: usize) {
    eprintln!("{}: {}", err.kind.describe().yellow().bold(), err.msg.yellow());
    point_at(err, source, lineno);
}

fn point_at(err: &Error, source: &str, lineno: usize) {
    let (Some(line), Some(col)) = (err.line, err.col) else {
        return;
    };
    let shown = lineno + line - 1;
    eprintln!("  --> line {}, column {}", shown, col);
    if let Some(src_line) = source.lines().nth(line - 1) {
        let gutter = format!("{:3} | ", shown);
        eprintln!("{}{}", gutter.bright_black(), src_line);
        let marker = format!("{}^", " ".repeat(gutter.len() + col.saturating_sub(1)));
        eprintln!("{}", marker.red());
    }
}

pub fn provide_error_suggestions(err: &Error) {
    match err.kind {
        ErrorKind::UndefinedVariable => {
            eprintln!("{}", "Help: assign a value before reading it.".yellow());
            eprintln!("    {}", "Example: width = 640".bright_black());
        }
        ErrorKind::UnknownFunction => {
            eprintln!("{}", "Help: check the function name for typos.".yellow());
            eprintln!(
                "    {}",
                "Built-ins: max, min, abs, round, len, str, int, float, gen_vector, gen_matrix, print".bright_black()
            );
            eprintln!(
                "    {}",
                "Math: sqrt, sin, cos, tan, exp, log, floor, ceil, hypot, pow".bright_black()
            );
        }
        ErrorKind::NotCallable => {
            eprintln!("{}", "Help: this name holds a value, not a function.".yellow());
        }
        ErrorKind::CallFailure => {
            eprintln!("{}", "Help: the function rejected its arguments.".yellow());
            eprintln!(
                "    {}",
                "Run with --sentinel-errors to keep going with an Error value".bright_black()
            );
        }
        ErrorKind::Type if err.msg.contains("error") => {
            eprintln!("{}", "Help: an earlier call failed and left an Error value behind.".yellow());
        }
        ErrorKind::Type if err.msg.starts_with("Cannot add") => {
            eprintln!("{}", "Help: '+' works on two numbers, two strings or two lists.".yellow());
        }
        ErrorKind::DivisionByZero => {
            eprintln!("{}", "Help: check the divisor before dividing.".yellow());
        }
        ErrorKind::Syntax if err.msg.contains("'('") || err.msg.contains("')'") => {
            eprintln!("{}", "Help: check that parentheses are balanced.".yellow());
        }
        ErrorKind::Syntax if err.msg.contains("'='") => {
            eprintln!("{}", "Help: use '==' for comparison, '=' for assignment.".yellow());
        }
        ErrorKind::Syntax if err.msg.contains("'->'") => {
            eprintln!("{}", "Help: a flow must be assigned: out = src -> f() -> g()".yellow());
        }
        _ => {}
    }
}
