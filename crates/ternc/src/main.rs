// ===================================================================
// FILE: main.rs
//
// DESC: Command-line driver for the TERN compiler.
// ===================================================================

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use ternc::{compile_with, hex_dump, CompileError, CompileOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Token stream with byte offsets
    Tokens,
    /// Debug dump of the syntax tree
    Ast,
    /// Graphviz rendering of the syntax tree
    Dot,
    /// IR, one instruction per line
    Ir,
    /// IR as a JSON array
    IrJson,
    /// Machine code as hex
    Hex,
    /// Decoded listing of the machine code
    Asm,
    /// Raw machine code on stdout
    Bin,
}

#[derive(Debug, Parser)]
#[command(version, about = "Compile TERN source to 32-bit x86 machine code")]
struct Cli {
    /// Source file
    input: PathBuf,

    /// Write the raw machine code to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// What to print on stdout
    #[arg(long, value_enum, default_value_t = Emit::Hex)]
    emit: Emit,

    /// Raise log verbosity; repeat for more. RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Lower and generate code even if semantic analysis reported errors
    #[arg(long)]
    keep_going: bool,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "error",
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let source = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;

    // Front-end views stop before analysis so they work on broken programs too.
    match cli.emit {
        Emit::Tokens => {
            for spanned in tern_parser::tokenize(&source)? {
                println!("{}..{}: {:?}", spanned.start, spanned.end, spanned.token);
            }
            return Ok(());
        }
        Emit::Ast => {
            println!("{:#?}", tern_parser::parse_program(&source)?);
            return Ok(());
        }
        Emit::Dot => {
            print!("{}", tern_ast::to_dot(&tern_parser::parse_program(&source)?));
            return Ok(());
        }
        _ => {}
    }

    let options = CompileOptions {
        keep_going: cli.keep_going,
    };
    let compilation = match compile_with(&source, options) {
        Ok(compilation) => compilation,
        Err(CompileError::Semantic(diagnostics)) => {
            report(&cli.input, &diagnostics);
            anyhow::bail!("aborting due to {} semantic error(s)", diagnostics.len());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("compiling {}", cli.input.display()));
        }
    };
    report(&cli.input, compilation.diagnostics());

    if let Some(path) = &cli.output {
        std::fs::write(path, &compilation.code)
            .with_context(|| format!("writing {}", path.display()))?;
        eprintln!(
            "{} {} ({} bytes)",
            "wrote".green().bold(),
            path.display(),
            compilation.code.len()
        );
    }

    match cli.emit {
        Emit::Ir => {
            for instruction in &compilation.ir {
                println!("{}", instruction);
            }
        }
        Emit::IrJson => {
            println!("{}", serde_json::to_string_pretty(&compilation.ir)?);
        }
        Emit::Hex => {
            if !compilation.code.is_empty() {
                println!("{}", hex_dump(&compilation.code));
            }
        }
        Emit::Asm => {
            for line in tern_codegen_x86::disassemble(&compilation.code) {
                println!("{}", line);
            }
        }
        Emit::Bin => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&compilation.code)
                .context("writing machine code to stdout")?;
            stdout.flush()?;
        }
        Emit::Tokens | Emit::Ast | Emit::Dot => {}
    }
    Ok(())
}

fn report(input: &std::path::Path, diagnostics: &[tern_sema::Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!(
            "{}: {}: {}",
            "error".red().bold(),
            input.display().to_string().bold(),
            diagnostic
        );
    }
}
