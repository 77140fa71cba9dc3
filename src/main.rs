use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use pretender::diagnostics::{render_diagnostic, render_error, Severity};
use pretender::manifest::{load_manifest, Manifest};
use pretender::{generate_with_manifest, Generation, SourceFile};

#[derive(Parser)]
#[command(name = "pretenderc", version, about = "The Pretender source generator")]
struct Cli {
    /// Path to a pretend.toml manifest
    #[arg(long, global = true)]
    manifest: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze source files and write the generated units
    Generate {
        /// Source files to analyze
        files: Vec<PathBuf>,
        /// Output directory for generated units
        #[arg(short, long, default_value = "generated")]
        output: PathBuf,
    },
    /// Analyze source files and report diagnostics without emitting
    Check {
        /// Source files to analyze
        files: Vec<PathBuf>,
        /// Print diagnostics as JSON records
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let manifest = match &cli.manifest {
        Some(path) => match load_manifest(path) {
            Ok(manifest) => manifest,
            Err(err) => {
                render_error("", "", &err);
                return ExitCode::FAILURE;
            }
        },
        None => Manifest::default(),
    };

    match cli.command {
        Commands::Generate { files, output } => run_generate(&files, &output, &manifest),
        Commands::Check { files, json } => run_check(&files, json, &manifest),
    }
}

fn read_sources(files: &[PathBuf]) -> Result<Vec<SourceFile>, ExitCode> {
    if files.is_empty() {
        eprintln!("error: no input files");
        return Err(ExitCode::FAILURE);
    }
    let mut sources = Vec::with_capacity(files.len());
    for file in files {
        match std::fs::read_to_string(file) {
            Ok(text) => sources.push(SourceFile::new(file.display().to_string(), text)),
            Err(err) => {
                eprintln!("error: failed to read '{}': {err}", file.display());
                return Err(ExitCode::FAILURE);
            }
        }
    }
    Ok(sources)
}

fn run_pipeline(sources: &[SourceFile], manifest: &Manifest) -> Result<Generation, ExitCode> {
    match generate_with_manifest(sources, manifest) {
        Ok(generation) => Ok(generation),
        Err(err) => {
            let (source, path) = err_context(sources, &err);
            render_error(source, path, &err);
            Err(ExitCode::FAILURE)
        }
    }
}

fn err_context<'s>(
    sources: &'s [SourceFile],
    err: &pretender::diagnostics::GenError,
) -> (&'s str, &'s str) {
    if let pretender::diagnostics::GenError::Syntax { span, .. } = err {
        if let Some(file) = sources.get(span.file_id as usize) {
            return (&file.text, &file.path);
        }
    }
    ("", "")
}

fn print_diagnostics(sources: &[SourceFile], generation: &Generation) {
    for diag in &generation.diagnostics {
        match diag.span.and_then(|s| sources.get(s.file_id as usize)) {
            Some(file) => render_diagnostic(&file.text, &file.path, diag),
            None => render_diagnostic("", "", diag),
        }
    }
}

fn run_generate(files: &[PathBuf], output: &Path, manifest: &Manifest) -> ExitCode {
    let sources = match read_sources(files) {
        Ok(sources) => sources,
        Err(code) => return code,
    };
    let generation = match run_pipeline(&sources, manifest) {
        Ok(generation) => generation,
        Err(code) => return code,
    };

    print_diagnostics(&sources, &generation);

    if let Err(err) = std::fs::create_dir_all(output) {
        eprintln!("error: failed to create '{}': {err}", output.display());
        return ExitCode::FAILURE;
    }
    for unit in &generation.units {
        let path = output.join(&unit.hint_name);
        if let Err(err) = std::fs::write(&path, &unit.source) {
            eprintln!("error: failed to write '{}': {err}", path.display());
            return ExitCode::FAILURE;
        }
    }

    if generation.has_errors() {
        ExitCode::FAILURE
    } else {
        println!("generated {} unit(s) into {}", generation.units.len(), output.display());
        ExitCode::SUCCESS
    }
}

fn run_check(files: &[PathBuf], json: bool, manifest: &Manifest) -> ExitCode {
    let sources = match read_sources(files) {
        Ok(sources) => sources,
        Err(code) => return code,
    };
    let generation = match run_pipeline(&sources, manifest) {
        Ok(generation) => generation,
        Err(code) => return code,
    };

    if json {
        match serde_json::to_string_pretty(&generation.diagnostics) {
            Ok(rendered) => println!("{rendered}"),
            Err(err) => {
                eprintln!("error: failed to serialize diagnostics: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_diagnostics(&sources, &generation);
        let errors =
            generation.diagnostics.iter().filter(|d| d.severity == Severity::Error).count();
        println!(
            "checked {} file(s): {} unit(s) would be generated, {} error(s)",
            sources.len(),
            generation.units.len(),
            errors
        );
    }

    if generation.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
