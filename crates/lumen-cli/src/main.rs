mod common;
mod logger;
mod repl;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use owo_colors::OwoColorize;

use common::{render_error, render_warning};
use lumen_interpreter::{CallFaults, Conditionals, Config, Interpreter};

#[derive(Parser, Debug)]
#[command(name = "lumen", version, about = "Evaluate Lumen expressions")]
struct Cli {
    /// Evaluate a single line and exit
    #[arg(short = 'e', long = "eval", value_name = "LINE", conflicts_with = "file")]
    eval: Option<String>,

    /// Source file, evaluated one line at a time. Starts the REPL when omitted.
    file: Option<PathBuf>,

    /// Evaluate only the taken branch of conditionals; short-circuit && and ||
    #[arg(long = "lazy", default_value_t = false)]
    lazy: bool,

    /// Turn failed calls into Error values instead of aborting the line
    #[arg(long = "sentinel-errors", default_value_t = false)]
    sentinel_errors: bool,

    /// Print each parsed tree before evaluating it
    #[arg(long = "dump-ast", default_value_t = false)]
    dump_ast: bool,

    /// off, error, warn, info, debug or trace (default: $LUMEN_LOG, else warn)
    #[arg(long = "log-level", value_name = "LEVEL", value_parser = parse_level)]
    log_level: Option<LevelFilter>,
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse::<LevelFilter>().map_err(|e| e.to_string())
}

impl Cli {
    fn config(&self) -> Config {
        let mut cfg = Config::from_env();
        if self.lazy {
            cfg = cfg.conditionals(Conditionals::Lazy);
        }
        if self.sentinel_errors {
            cfg = cfg.call_faults(CallFaults::Sentinel);
        }
        cfg
    }
}

/// Options that shape how each line is run and reported.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub dump_ast: bool,
}

/// Parses and evaluates `src`, printing the result. Returns false when the
/// line failed.
pub fn run_line(interp: &mut Interpreter, src: &str, lineno: usize, opts: RunOptions) -> bool {
    let parsed = interp.parse(src);
    for diag in interp.diagnostics() {
        render_warning(diag, src, lineno);
    }
    let ast = match parsed {
        Ok(ast) => ast,
        Err(e) => {
            render_error(&e, src, lineno);
            return false;
        }
    };
    if opts.dump_ast {
        print!("{}", ast);
    }
    match interp.evaluate(&ast) {
        Ok(val) => {
            // parse diagnostics were already shown; these come from the walk
            for diag in interp.diagnostics().iter().filter(|d| d.kind.is_call_fault()) {
                render_warning(diag, src, lineno);
            }
            println!("{}", val);
            true
        }
        Err(e) => {
            render_error(&e, src, lineno);
            false
        }
    }
}

fn run_file(interp: &mut Interpreter, path: &PathBuf, opts: RunOptions) -> ExitCode {
    if !path.exists() {
        eprintln!(
            "{}: {}",
            "error".red().bold(),
            format!("File not found: {}", path.display()).red()
        );
        return ExitCode::FAILURE;
    }
    let src = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!(
                "{}: {}",
                "error".red().bold(),
                format!("Failed to read {}: {}", path.display(), e).red()
            );
            return ExitCode::FAILURE;
        }
    };
    log::info!("running {}", path.display());

    let mut failed = 0usize;
    for (i, line) in src.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if !run_line(interp, line, i + 1, opts) {
            failed += 1;
        }
    }
    if failed > 0 {
        log::info!("{} line(s) failed", failed);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logger::init(logger::resolve_level(cli.log_level)) {
        eprintln!("{}: {}", "warning".yellow().bold(), e);
    }

    let mut interp = Interpreter::new().with_config(cli.config());
    log::debug!("config: {:?}", interp.config());
    let opts = RunOptions { dump_ast: cli.dump_ast };

    if let Some(line) = &cli.eval {
        return if run_line(&mut interp, line, 1, opts) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }
    match &cli.file {
        Some(path) => run_file(&mut interp, path, opts),
        None => {
            repl::start_repl(&mut interp, opts);
            ExitCode::SUCCESS
        }
    }
}
