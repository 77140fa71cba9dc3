//! Emission: synthesize one host-language compilation unit per proxy type.

pub mod format;
pub mod writer;

mod proxy;
mod wrappers;

use crate::classify::{CreateInvocation, PretendEntrypoint, SetupInvocation, VerifyInvocation};
use crate::semantics::types::SemType;
use writer::SourceWriter;

/// Default value expression for a returning member with no attached
/// behavior: completed tasks for the task kinds, the type's zero value
/// otherwise.
pub(crate) fn default_value_expr(ret: &SemType) -> String {
    if let SemType::Named { key, args } = ret {
        match (key.full_name.as_str(), args.len()) {
            ("System.Task", 0) => return "Pretender.CompletedTask.Instance".to_string(),
            ("System.Task", 1) => {
                return format!("Pretender.CompletedTask.Of<{}>()", args[0].display_name());
            }
            ("System.ValueTask", 0) => {
                return "Pretender.CompletedValueTask.Instance".to_string();
            }
            ("System.ValueTask", 1) => {
                return format!("Pretender.CompletedValueTask.Of<{}>()", args[0].display_name());
            }
            _ => {}
        }
    }
    "default".to_string()
}

/// Emit the complete unit for one proxy type: the proxy, the recorder when
/// capture-and-replay is in play, and the factory/setup/verify wrapper
/// classes.
pub fn emit_unit(
    entry: &PretendEntrypoint,
    proxy_name: &str,
    namespace: &str,
    setups: &[&SetupInvocation],
    verifies: &[&VerifyInvocation],
    creates: &[&CreateInvocation],
) -> String {
    let mut w = SourceWriter::new();
    w.line("// <auto-generated/>");
    w.line("// Pretender source generator output. Do not edit.");
    w.open(format!("namespace {namespace}"));

    proxy::emit_proxy(&mut w, entry, proxy_name);

    if entry.needs_recorder {
        w.blank();
        proxy::emit_recorder(&mut w, entry, proxy_name);
    }

    w.blank();
    wrappers::emit_factories(&mut w, entry, proxy_name, creates);

    if !setups.is_empty() {
        w.blank();
        wrappers::emit_setups(&mut w, entry, proxy_name, setups);
    }
    if !verifies.is_empty() {
        w.blank();
        wrappers::emit_verifications(&mut w, entry, proxy_name, verifies);
    }

    w.close();
    w.finish()
}
