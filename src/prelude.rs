use crate::diagnostics::GenError;
use crate::parser::ast::{Program, TypeDecl};
use crate::span::Spanned;
use std::sync::OnceLock;

const PRELUDE_SOURCE: &str = include_str!("prelude.pretend");

/// Spans inside the prelude carry this file id so they can never collide
/// with (or be rendered against) user files.
pub const PRELUDE_FILE_ID: u32 = u32::MAX;

/// Framework namespace the classifier checks declaring types against.
pub const FRAMEWORK_NAMESPACE: &str = "Pretender";
pub const PRETEND_FACTORY_TYPE: &str = "Pretender.Pretend";

static PRELUDE: OnceLock<Vec<Spanned<TypeDecl>>> = OnceLock::new();

fn get_prelude() -> &'static [Spanned<TypeDecl>] {
    PRELUDE.get_or_init(|| {
        let tokens = crate::lexer::lex(PRELUDE_SOURCE, PRELUDE_FILE_ID).expect("prelude must lex");
        let mut parser = crate::parser::Parser::new(&tokens, PRELUDE_SOURCE, PRELUDE_FILE_ID);
        let program = parser.parse_program().expect("prelude must parse");
        program.types
    })
}

/// Inject the framework declarations into a parsed program.
/// Rejects user declarations that would collide with a framework type.
pub fn inject_prelude(program: &mut Program) -> Result<(), GenError> {
    let prelude = get_prelude();

    for p in prelude {
        for t in &program.types {
            if t.node.full_name() == p.node.full_name()
                && t.node.generic_params.len() == p.node.generic_params.len()
            {
                return Err(GenError::syntax(
                    format!(
                        "cannot define type '{}': conflicts with a framework type",
                        t.node.full_name()
                    ),
                    t.node.name.span,
                ));
            }
        }
    }

    program.types.extend(prelude.iter().cloned());
    Ok(())
}
