//! come-drv - CLI driver for the `come` compiler.
//!
//! Thin orchestration layer over `come-lex` / `come-par` / `come-gen`:
//! resolves the input path, lexes and parses the entry module and its
//! imports, runs codegen, and (for `build`) shells out to a host C
//! compiler. No incremental caching or import-graph analysis — each
//! `import` is resolved to `<name>.co` next to the entry file, recursively,
//! with no memoization.

use std::path::{Path, PathBuf};
use std::process::Command;

use clap::{Parser as ClapParser, Subcommand};
use come_util::DriverError;

/// Resolved configuration for one invocation of `come`.
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub emit_line_directives: bool,
    pub verbose: bool,
}

#[derive(ClapParser, Debug)]
#[command(name = "come", about = "Compiler for the source language, targeting portable C")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate C and invoke the host C compiler to produce an executable.
    Build {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long)]
        verbose: bool,
        #[arg(long, default_value_t = true)]
        line_directives: bool,
    },
    /// Generate C only, without invoking a host C compiler.
    Genc {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long)]
        verbose: bool,
        #[arg(long, default_value_t = true)]
        line_directives: bool,
    },
}

/// Resolves `<input>` per spec §6: a `.co` file as-is, `.` meaning
/// `./main.co`, any other directory meaning `<dir>/main.co`.
pub fn resolve_input(input: &Path) -> Result<PathBuf, DriverError> {
    if input.is_dir() {
        let candidate = input.join("main.co");
        return if candidate.is_file() {
            Ok(candidate)
        } else {
            Err(DriverError::NoMainInDirectory(input.to_path_buf()))
        };
    }
    if !input.exists() {
        return Err(DriverError::InputNotFound(input.to_path_buf()));
    }
    if input.extension().and_then(|e| e.to_str()) != Some("co") {
        return Err(DriverError::BadExtension(input.to_path_buf()));
    }
    Ok(input.to_path_buf())
}

fn read_source(path: &Path) -> Result<String, DriverError> {
    std::fs::read_to_string(path).map_err(|source| DriverError::ReadSource {
        path: path.to_path_buf(),
        source,
    })
}

/// Lexes, parses, and checks one `.co` file for diagnostics, returning its
/// AST. Shared between the entry module and every recursively resolved
/// import (spec §6's minimal, uncached import resolution).
fn parse_module(path: &Path, verbose: bool) -> Result<come_par::Node, DriverError> {
    if verbose {
        tracing::debug!(path = %path.display(), "lexing");
    }
    let source = read_source(path)?;
    let tokens = come_lex::lex(&source);
    if verbose {
        tracing::debug!(path = %path.display(), "parsing");
    }
    let (program, handler) = come_par::parse(tokens);
    if handler.has_errors() {
        let mut stderr = std::io::stderr();
        let _ = handler.emit_to(&mut stderr);
        return Err(DriverError::CompilationFailed(handler.diagnostics().len()));
    }
    Ok(program)
}

/// Recursively resolves every module reachable from `entry` via `import`
/// directives, each against `<name>.co` next to the entry file (spec §6).
/// No cycle or diamond-import caching — a module imported twice is parsed
/// and emitted twice, which is acceptable for the single-binary `come`
/// CLI this drives and out of scope for the incremental build driver spec
/// §1 excludes.
fn resolve_import_chain(entry_path: &Path, program: &come_par::Node, verbose: bool) -> Result<Vec<(PathBuf, come_par::Node)>, DriverError> {
    use come_par::NodeKind;

    let dir = entry_path.parent().unwrap_or_else(|| Path::new("."));
    let mut modules = Vec::new();
    for child in &program.children {
        if child.kind != NodeKind::Import {
            continue;
        }
        let import_path = dir.join(format!("{}.co", child.text));
        if !import_path.is_file() {
            return Err(DriverError::ImportNotFound(child.text.clone()));
        }
        let imported_program = parse_module(&import_path, verbose)?;
        let mut nested = resolve_import_chain(&import_path, &imported_program, verbose)?;
        modules.append(&mut nested);
        modules.push((import_path, imported_program));
    }
    Ok(modules)
}

/// Generates C text for the entry module and every module it (recursively)
/// imports, writing each to a sibling `.c` file next to its source.
fn generate_c_files(config: &Config) -> Result<Vec<PathBuf>, DriverError> {
    let entry_path = resolve_input(&config.input)?;
    let entry_program = parse_module(&entry_path, config.verbose)?;
    let imported = resolve_import_chain(&entry_path, &entry_program, config.verbose)?;

    let mut outputs = Vec::new();
    for (source_path, program) in imported.into_iter().chain(std::iter::once((entry_path.clone(), entry_program))) {
        let is_entry = source_path == entry_path;
        let c_path = if is_entry {
            config
                .output
                .clone()
                .unwrap_or_else(|| source_path.with_extension("c"))
        } else {
            source_path.with_extension("c")
        };
        if config.verbose {
            tracing::debug!(source = %source_path.display(), output = %c_path.display(), "generating C");
        }
        come_gen::generate_to_file(&program, &c_path, &source_path, config.emit_line_directives)?;
        outputs.push(c_path);
    }
    Ok(outputs)
}

/// `come genc`: produce C file(s) only.
pub fn genc(config: &Config) -> Result<(), DriverError> {
    generate_c_files(config)?;
    Ok(())
}

/// `come build`: produce C file(s), then shell out to the host C compiler
/// (`$CC`, falling back to `cc`) to link an executable. The runtime
/// library's own implementation is out of scope (spec §1) — `build`
/// assumes it is discoverable via the host toolchain's normal library
/// search path.
pub fn build(config: &Config) -> Result<(), DriverError> {
    let c_files = generate_c_files(config)?;
    let compiler = std::env::var("CC").unwrap_or_else(|_| "cc".to_string());
    let output = config
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from("a.out"));

    if config.verbose {
        tracing::debug!(compiler = %compiler, output = %output.display(), "invoking host C compiler");
    }

    let status = Command::new(&compiler)
        .args(&c_files)
        .arg("-o")
        .arg(&output)
        .status()
        .map_err(|source| DriverError::ToolchainSpawn {
            compiler: compiler.clone(),
            source,
        })?;

    if !status.success() {
        return Err(DriverError::ToolchainFailed {
            compiler,
            status: status.code().unwrap_or(-1),
        });
    }
    Ok(())
}

/// CLI entry point, mirroring the teacher's `faxc_drv::main`:
/// `anyhow::Result` at the outermost boundary, everything beneath it
/// typed with `thiserror`.
pub fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.command {
        Commands::Build {
            input,
            output,
            verbose,
            line_directives,
        }
        | Commands::Genc {
            input,
            output,
            verbose,
            line_directives,
        } => Config {
            input: input.clone(),
            output: output.clone(),
            emit_line_directives: *line_directives,
            verbose: *verbose,
        },
    };

    if config.verbose {
        tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();
    }

    match cli.command {
        Commands::Build { .. } => build(&config)?,
        Commands::Genc { .. } => genc(&config)?,
    }

    Ok(())
}
