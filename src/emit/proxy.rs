//! Proxy and recorder type synthesis.
//!
//! The proxy implements (or, for class targets, extends) the target type and
//! routes every member through one dispatch call carrying the member's
//! interned ordinal and the argument array. The recorder is the throwaway
//! stand-in used by capture-and-replay: it notifies the ambient listener and
//! returns defaults instead of dispatching.

use crate::classify::{DispatchKind, DispatchSlot, ParamSlot, PretendEntrypoint};
use crate::parser::ast::ParamMode;
use super::default_value_expr;
use super::writer::SourceWriter;

pub fn emit_proxy(w: &mut SourceWriter, entry: &PretendEntrypoint, proxy_name: &str) {
    let target = entry.target.display_name();
    w.open(format!("class {proxy_name} : {target}"));
    w.line(format!("readonly Pretender.Pretend<{target}> _pretend;"));
    w.blank();
    w.open(format!("public {proxy_name}(Pretender.Pretend<{target}> pretend)"));
    w.line("_pretend = pretend;");
    w.close();

    let mut slots = entry.slots.iter().peekable();
    while let Some(slot) = slots.next() {
        w.blank();
        match slot.kind {
            DispatchKind::Method => emit_method(w, entry, slot),
            DispatchKind::Getter => {
                let setter = slots
                    .peek()
                    .filter(|s| s.kind == DispatchKind::Setter && s.member_name == slot.member_name)
                    .copied();
                if setter.is_some() {
                    slots.next();
                }
                emit_property(w, entry, Some(slot), setter);
            }
            DispatchKind::Setter => emit_property(w, entry, None, Some(slot)),
        }
    }
    w.close();
}

fn override_prefix(entry: &PretendEntrypoint) -> &'static str {
    if entry.target_is_class {
        "override "
    } else {
        ""
    }
}

fn param_list(params: &[ParamSlot]) -> String {
    params
        .iter()
        .map(|p| {
            let mode = match p.mode {
                ParamMode::Value => "",
                ParamMode::Ref => "ref ",
                ParamMode::Out => "out ",
            };
            format!("{mode}{} {}", p.ty.display_name(), p.name)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn argument_array(params: &[ParamSlot]) -> String {
    if params.is_empty() {
        return "new object[0]".to_string();
    }
    let slots = params
        .iter()
        .map(|p| match p.mode {
            // An `out` argument has no inbound value.
            ParamMode::Out => "null".to_string(),
            _ => p.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("new object[] {{ {slots} }}")
}

fn emit_dispatch_body(w: &mut SourceWriter, slot: &DispatchSlot) {
    w.line(format!(
        "var call = new Pretender.CallInfo({}, {});",
        slot.ordinal,
        argument_array(&slot.params)
    ));
    w.line("_pretend.Handle(call);");
    // ref/out parameters are copied back from the same argument array.
    for (i, p) in slot.params.iter().enumerate() {
        if p.mode != ParamMode::Value {
            w.line(format!("{} = ({})call.Arguments[{i}];", p.name, p.ty.display_name()));
        }
    }
    if slot.ret != crate::semantics::types::SemType::Void {
        let ret = slot.ret.display_name();
        w.open("if (call.ReturnValue == null)");
        w.line(format!("return {};", default_value_expr(&slot.ret)));
        w.close();
        w.line(format!("return ({ret})call.ReturnValue;"));
    }
}

fn emit_method(w: &mut SourceWriter, entry: &PretendEntrypoint, slot: &DispatchSlot) {
    w.open(format!(
        "public {}{} {}({})",
        override_prefix(entry),
        slot.ret.display_name(),
        slot.member_name,
        param_list(&slot.params)
    ));
    emit_dispatch_body(w, slot);
    w.close();
}

fn emit_property(
    w: &mut SourceWriter,
    entry: &PretendEntrypoint,
    getter: Option<&DispatchSlot>,
    setter: Option<&DispatchSlot>,
) {
    let slot = getter.or(setter).expect("property needs an accessor");
    let ty = match slot.kind {
        DispatchKind::Getter => slot.ret.display_name(),
        _ => slot.params[0].ty.display_name(),
    };
    w.open(format!("public {}{ty} {}", override_prefix(entry), slot.member_name));
    if let Some(getter) = getter {
        w.open("get");
        emit_dispatch_body(w, getter);
        w.close();
    }
    if let Some(setter) = setter {
        w.open("set");
        emit_dispatch_body(w, setter);
        w.close();
    }
    w.close();
}

pub fn emit_recorder(w: &mut SourceWriter, entry: &PretendEntrypoint, proxy_name: &str) {
    let target = entry.target.display_name();
    let prefix = override_prefix(entry);
    w.open(format!("class {proxy_name}Recorder : {target}"));
    let mut slots = entry.slots.iter().peekable();
    let mut first = true;
    while let Some(slot) = slots.next() {
        if !first {
            w.blank();
        }
        first = false;
        match slot.kind {
            DispatchKind::Method => {
                w.open(format!(
                    "public {prefix}{} {}({})",
                    slot.ret.display_name(),
                    slot.member_name,
                    param_list(&slot.params)
                ));
                emit_recorder_body(w, slot);
                w.close();
            }
            DispatchKind::Getter => {
                let setter = slots
                    .peek()
                    .filter(|s| s.kind == DispatchKind::Setter && s.member_name == slot.member_name)
                    .copied();
                if setter.is_some() {
                    slots.next();
                }
                let ty = slot.ret.display_name();
                w.open(format!("public {prefix}{ty} {}", slot.member_name));
                w.open("get");
                emit_recorder_body(w, slot);
                w.close();
                if let Some(setter) = setter {
                    w.open("set");
                    emit_recorder_body(w, setter);
                    w.close();
                }
                w.close();
            }
            DispatchKind::Setter => {
                let ty = slot.params[0].ty.display_name();
                w.open(format!("public {prefix}{ty} {}", slot.member_name));
                w.open("set");
                emit_recorder_body(w, slot);
                w.close();
                w.close();
            }
        }
    }
    w.close();
}

fn emit_recorder_body(w: &mut SourceWriter, slot: &DispatchSlot) {
    w.line(format!(
        "Pretender.Listener.Notify(new Pretender.CallInfo({}, {}));",
        slot.ordinal,
        argument_array(&slot.params)
    ));
    for p in &slot.params {
        if p.mode == ParamMode::Out {
            w.line(format!("{} = default;", p.name));
        }
    }
    if slot.ret != crate::semantics::types::SemType::Void {
        w.line("return default;");
    }
}
