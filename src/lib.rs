pub mod span;
pub mod line_index;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod visit;
pub mod prelude;
pub mod semantics;
pub mod scan;
pub mod classify;
pub mod args;
pub mod emit;
pub mod aggregate;
pub mod manifest;
pub mod runtime;

use aggregate::GeneratedUnit;
use diagnostics::{codes, Diagnostic, GenError};
use manifest::Manifest;
use parser::ast::Program;

/// One input source file. The file's index in the input slice is its
/// `file_id`, threaded through every span.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self { path: path.into(), text: text.into() }
    }
}

/// Result of one generation run: the emitted units plus every collected
/// diagnostic. Diagnostics never abort the run; a hard `GenError` does.
#[derive(Debug)]
pub struct Generation {
    pub units: Vec<GeneratedUnit>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Generation {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == diagnostics::Severity::Error)
    }
}

/// Run the full pipeline with default configuration
/// (lex → parse → prelude → bind → scan → classify → emit → aggregate).
pub fn generate(sources: &[SourceFile]) -> Result<Generation, GenError> {
    generate_with_manifest(sources, &Manifest::default())
}

pub fn generate_with_manifest(
    sources: &[SourceFile],
    manifest: &Manifest,
) -> Result<Generation, GenError> {
    // Host capability gate: without interception there is nothing to key the
    // wrappers to. One global diagnostic, no emission at all.
    if !manifest.supports_interception() {
        return Ok(Generation {
            units: Vec::new(),
            diagnostics: vec![Diagnostic::global(
                codes::LANGUAGE_VERSION,
                format!(
                    "language version {} does not support interception (requires {} or later); no code will be generated",
                    manifest.language_version,
                    manifest::MIN_INTERCEPTION_VERSION
                ),
            )],
        });
    }

    let mut program = Program::default();
    for (id, file) in sources.iter().enumerate() {
        let tokens = lexer::lex(&file.text, id as u32)?;
        let mut parser = parser::Parser::new(&tokens, &file.text, id as u32);
        let parsed = parser.parse_program()?;
        program.usings.extend(parsed.usings);
        program.types.extend(parsed.types);
    }
    prelude::inject_prelude(&mut program)?;

    let model = semantics::bind(&program)?;
    let candidates = scan::scan(&program);
    let classified = classify::classify(&candidates, &model, sources);
    let units = aggregate::aggregate(&classified, &manifest.namespace);

    Ok(Generation { units, diagnostics: classified.diagnostics })
}
