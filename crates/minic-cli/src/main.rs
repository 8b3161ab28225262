mod common;

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;

use minic_service::server::{ServerConfig, DEFAULT_ADDR};
use minic_service::AnalysisResult;
use minic_syntax::error::{error, Error, Result};

#[derive(Parser, Debug)]
#[command(name = "minic", version, about = "Analyze minic source: tokens, symbols, syntax and scope errors")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a readable report for a source file; exits 1 if anything was flagged
    Check {
        /// Source file to analyze
        path: PathBuf,
    },
    /// Print the JSON analysis report for a file, or stdin when omitted or '-'
    Json {
        path: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Serve POST /api/analyze over HTTP
    Serve {
        /// Listen address; falls back to $MINIC_ADDR, then 127.0.0.1:3000
        #[arg(short, long)]
        addr: Option<String>,

        /// Do not log requests
        #[arg(short, long, default_value_t = false)]
        quiet: bool,
    },
}

fn render_error(kind: &str, source: &str, line: usize, col: Option<usize>, msg: &str) {
    eprintln!("{}: {}", kind.red().bold(), msg.red());
    match col {
        Some(col) => eprintln!("  --> line {}, column {}", line, col),
        None => eprintln!("  --> line {}", line),
    }
    if let Some(src_line) = source.lines().nth(line.saturating_sub(1)) {
        let line_num_str = format!("{:3} | ", line);
        eprintln!("     |");
        eprintln!("{}{}", line_num_str.bright_black(), src_line);
        if let Some(col) = col {
            let mut marker = String::new();
            marker.push_str(&" ".repeat(line_num_str.len()));
            if col > 1 {
                marker.push_str(&" ".repeat(col - 1));
            }
            marker.push('^');
            eprintln!("{}{}", marker.red(), " error here".red());
        }
        eprintln!("     |");
    }
    common::provide_error_suggestions(msg);
}

fn normalize_path(p: &Path) -> PathBuf {
    if p.exists() {
        return p.to_path_buf();
    }
    #[cfg(windows)]
    {
        let alt = p.to_string_lossy().replace('/', std::path::MAIN_SEPARATOR_STR);
        let altpb = PathBuf::from(&alt);
        if altpb.exists() {
            return altpb;
        }
    }
    p.to_path_buf()
}

fn read_source(path: Option<&Path>) -> Result<String> {
    match path {
        None => read_stdin(),
        Some(p) if p.as_os_str() == "-" => read_stdin(),
        Some(p) => {
            let path_buf = normalize_path(p);
            if !path_buf.exists() {
                return error(format!("File not found: {}", p.display()));
            }
            fs::read_to_string(&path_buf)
                .map_err(|e| Error::new(format!("Failed to read {}: {}", path_buf.display(), e)))
        }
    }
}

fn read_stdin() -> Result<String> {
    let mut src = String::new();
    std::io::stdin()
        .read_to_string(&mut src)
        .map_err(|e| Error::new(format!("Failed to read stdin: {}", e)))?;
    Ok(src)
}

fn report(path: &Path, source: &str, result: &AnalysisResult) {
    println!(
        "{} {}: {} tokens, {} symbols",
        "Analyzed".green().bold(),
        path.display(),
        result.tokens.len(),
        result.symbol_table.len()
    );
    if !result.symbol_table.is_empty() {
        println!("{}", "Symbol table:".bold());
        println!("  {:<6} {:<16} {:<6} {}", "line", "name", "type", "scope");
        for sym in &result.symbol_table {
            println!("  {:<6} {:<16} {:<6} {}", sym.line, sym.name, sym.ty.name(), sym.scope);
        }
    }

    for e in &result.lexical_errors {
        render_error("Lex error", source, e.line, Some(e.col), &e.message);
    }
    for e in &result.syntax_errors {
        render_error("Syntax error", source, e.line, None, &e.message);
    }
    for e in &result.semantic_errors {
        render_error("Semantic error", source, e.line, None, &e.message);
    }

    if result.has_errors() {
        println!("{}", format!("{} problem(s) found", result.diagnostic_count()).red().bold());
    } else {
        println!("{}", "No problems found".green());
    }
}

fn serve_addr(flag: Option<String>) -> String {
    // explicit flag wins, then MINIC_ADDR, then the default
    if let Some(addr) = flag {
        return addr;
    }
    if let Ok(addr) = std::env::var("MINIC_ADDR") {
        if !addr.trim().is_empty() {
            return addr;
        }
    }
    DEFAULT_ADDR.to_string()
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Check { path } => {
            let source = read_source(Some(&path))?;
            let result = minic_service::analyze(&source);
            report(&path, &source, &result);
            Ok(if result.has_errors() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Command::Json { path, pretty } => {
            let source = read_source(path.as_deref())?;
            let response = minic_service::analyze(&source).to_response();
            let text = if pretty {
                serde_json::to_string_pretty(&response)?
            } else {
                serde_json::to_string(&response)?
            };
            println!("{}", text);
            Ok(ExitCode::SUCCESS)
        }
        Command::Serve { addr, quiet } => {
            let config = ServerConfig {
                addr: serve_addr(addr),
                quiet,
            };
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(minic_service::server::serve(config))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e.msg.red());
            common::provide_error_suggestions(&e.msg);
            ExitCode::FAILURE
        }
    }
}
