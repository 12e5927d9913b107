// fxparse: shading description front end

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use crossterm::style::Stylize;

use fxparse::parser::diagnostics::caret_line;
use fxparse::{DiagnosticSink, ErrorKind, ParseError, ParserConfig, ShaderParser};

/// Parse shading description files and report the first error in each
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Input files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Do not prepend the built-in prelude
    #[arg(long)]
    no_prelude: bool,

    /// Print the parsed module instead of a summary
    #[arg(long)]
    dump: bool,

    /// Report line numbers relative to the input file, not the prelude
    #[arg(long)]
    user_lines: bool,
}

/// Prints diagnostics to stderr with terminal colors.
struct TerminalSink {
    user_lines: bool,
}

impl DiagnosticSink for TerminalSink {
    fn on_error(
        &mut self,
        kind: ErrorKind,
        file: &str,
        line: usize,
        column: usize,
        line_text: &str,
        message: &str,
    ) {
        eprintln!(
            "{} {} {}: {}",
            format!("{}({}-{}):", file, line, column).bold(),
            "error:".red().bold(),
            kind,
            message.trim_end()
        );
        eprintln!("{}", line_text);
        eprintln!("{}", caret_line(line_text, column).green().bold());
    }

    fn report(&mut self, error: &ParseError) {
        let line = if self.user_lines {
            error.user_line().unwrap_or(error.location.line)
        } else {
            error.location.line
        };
        self.on_error(
            error.kind,
            &error.file,
            line,
            error.location.column,
            &error.line_text,
            &error.message,
        );
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = ParserConfig {
        include_prelude: !cli.no_prelude,
        ..ParserConfig::default()
    };
    let mut sink = TerminalSink {
        user_lines: cli.user_lines,
    };

    let mut failed = 0usize;
    for input in &cli.inputs {
        let name = input.display().to_string();
        let source = match fs::read_to_string(input) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("{} failed to read {}: {}", "error:".red().bold(), name, e);
                failed += 1;
                continue;
            }
        };

        let mut parser = ShaderParser::with_config(config.clone());
        if parser.parse(&name, &source, Some(&mut sink)).is_err() {
            failed += 1;
            continue;
        }
        let module = parser.into_module();

        if cli.dump {
            print!("{}", module.dump());
        } else {
            println!(
                "{}: {} struct(s), {} function(s), {} variable(s)",
                name,
                module.user_structs().count(),
                module.file().functions.len(),
                module.file().variables.len()
            );
        }
    }

    if failed > 0 {
        eprintln!("{} of {} file(s) failed to parse", failed, cli.inputs.len());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
