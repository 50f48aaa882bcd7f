use std::io::{self, Write};

use owo_colors::OwoColorize;

use crate::{run_line, RunOptions};
use lumen_interpreter::Interpreter;

pub fn start_repl(interp: &mut Interpreter, opts: RunOptions) {
    println!("{}", "Lumen REPL. Type :help for help, exit to quit.".bold().green());

    loop {
        print!("{}", "lumen> ".cyan());
        let _ = io::stdout().flush();

        let mut line = String::new();
        let n = match io::stdin().read_line(&mut line) {
            Ok(n) => n,
            Err(e) => {
                log::error!("failed to read input: {}", e);
                break;
            }
        };
        if n == 0 {
            // EOF
            println!("\nGoodbye.");
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match trimmed {
            "exit" | ":quit" | ":q" => {
                println!("Goodbye.");
                break;
            }
            "symbols" | ":vars" => {
                print_symbols(interp);
                continue;
            }
            ":help" | ":h" => {
                print_help();
                continue;
            }
            ":reset" => {
                interp.reset();
                println!("{}", "State reset.".yellow());
                continue;
            }
            cmd if cmd.starts_with(':') => {
                println!("{}", "Unknown command. Type :help.".red());
                continue;
            }
            _ => {}
        }

        run_line(interp, trimmed, 1, opts);
    }
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  {}  {}", "exit".yellow(), "Leave the REPL (also :quit)");
    println!("  {}  {}", "symbols".yellow(), "List the symbol table (also :vars)");
    println!("  {}  {}", ":reset".yellow(), "Forget every binding except e and pi");
    println!("  {}  {}", ":help".yellow(), "Show this help");
    println!("Anything else is evaluated as one line, e.g. 'x = 2 ^ 8' or 'if (x > 100): 1 else: 0'.");
}

fn print_symbols(interp: &Interpreter) {
    let symbols = interp.symbols().snapshot();
    if symbols.is_empty() {
        println!("{}", "<no symbols>".dimmed());
        return;
    }
    for (name, shown) in symbols {
        println!("{} = {}", name.yellow(), shown.bright_blue());
    }
}
