//! Call-site wrapper emission.
//!
//! One wrapper per setup/verify call site and one shared factory pair per
//! proxy type, each attributed with the exact source location the host
//! compiler substitutes it at. A wrapper receives the original call's
//! arguments, so captured lambdas and count expressions flow through
//! unchanged.

use crate::args::{MatcherCtorArg, MatcherStrategy, SetupArgumentSpec};
use crate::classify::{
    CountPolicy, CreateInvocation, InterceptsLocationInfo, PretendEntrypoint, SetupInvocation,
    VerifyInvocation,
};
use crate::semantics::types::SemType;
use super::format::{format_literal, quote_string};
use super::writer::SourceWriter;

fn emit_location_attrs(w: &mut SourceWriter, locations: &[InterceptsLocationInfo]) {
    for loc in locations {
        w.line(format!(
            "[InterceptsLocation({}, {}, {})]",
            quote_string(&loc.path),
            loc.line,
            loc.column
        ));
    }
}

pub fn emit_factories(
    w: &mut SourceWriter,
    entry: &PretendEntrypoint,
    proxy_name: &str,
    creates: &[&CreateInvocation],
) {
    let target = entry.target.display_name();
    w.open(format!("static class {proxy_name}Factories"));

    emit_location_attrs(w, &entry.locations);
    w.open(format!("static Pretender.Pretend<{target}> That()"));
    w.line(format!("return new Pretender.Pretend<{target}>();"));
    w.close();

    if !creates.is_empty() {
        // Any number of Create call sites against one target share a single
        // wrapper; the attribute list carries every location.
        let locations: Vec<InterceptsLocationInfo> = {
            let mut all: Vec<InterceptsLocationInfo> =
                creates.iter().map(|c| c.location.clone()).collect();
            all.sort();
            all.dedup();
            all
        };
        w.blank();
        emit_location_attrs(w, &locations);
        w.open(format!("static {target} Create(Pretender.Pretend<{target}> pretend)"));
        w.line(format!("return new {proxy_name}(pretend);"));
        w.close();
    }

    w.close();
}

pub fn emit_setups(
    w: &mut SourceWriter,
    entry: &PretendEntrypoint,
    proxy_name: &str,
    setups: &[&SetupInvocation],
) {
    let target = entry.target.display_name();
    w.open(format!("static class {proxy_name}Setups"));
    for (i, setup) in setups.iter().enumerate() {
        if i > 0 {
            w.blank();
        }
        emit_location_attrs(w, std::slice::from_ref(&setup.location));
        w.open(format!(
            "static Pretender.Setup<{target}> Setup{i}(Pretender.Pretend<{target}> pretend, System.Action<{target}> setup)"
        ));
        w.line(format!(
            "return pretend.GetOrCreateSetup({}, {}, {}, setup);",
            setup.slot_ordinal,
            quote_string(&setup.setup_key),
            matcher_argument(&setup.specs, i),
        ));
        w.close();
        emit_matcher_support(w, entry, proxy_name, &target, &setup.specs, i);
    }
    w.close();
}

pub fn emit_verifications(
    w: &mut SourceWriter,
    entry: &PretendEntrypoint,
    proxy_name: &str,
    verifies: &[&VerifyInvocation],
) {
    let target = entry.target.display_name();
    w.open(format!("static class {proxy_name}Verifications"));
    for (i, verify) in verifies.iter().enumerate() {
        let setup = &verify.setup;
        if i > 0 {
            w.blank();
        }
        emit_location_attrs(w, std::slice::from_ref(&setup.location));
        let count_param = match verify.count {
            CountPolicy::Exactly => ", int count",
            CountPolicy::AtLeastOnce => "",
        };
        w.open(format!(
            "static void Verify{i}(Pretender.Pretend<{target}> pretend, System.Action<{target}> setup{count_param})"
        ));
        w.line(format!(
            "var compiled = pretend.GetOrCreateSetup({}, {}, {}, setup);",
            setup.slot_ordinal,
            quote_string(&setup.setup_key),
            matcher_argument(&setup.specs, i),
        ));
        let policy = match verify.count {
            CountPolicy::Exactly => "Pretender.CallCount.Exactly(count)",
            CountPolicy::AtLeastOnce => "Pretender.CallCount.AtLeastOnce()",
        };
        w.line(format!("compiled.Verify({policy});"));
        w.close();
        emit_matcher_support(w, entry, proxy_name, &target, &setup.specs, i);
    }
    w.close();
}

/// The matcher argument passed to `GetOrCreateSetup`: the universal no-op
/// matcher for parameterless members, otherwise the synthesized per-site
/// matcher function closed over the original setup lambda.
fn matcher_argument(specs: &[SetupArgumentSpec], index: usize) -> String {
    if specs.is_empty() {
        "Pretender.NoOpMatcher.Matches".to_string()
    } else {
        format!("call => Matcher{index}(call, setup)")
    }
}

/// Emit the per-site matcher function and any shared matcher instances.
fn emit_matcher_support(
    w: &mut SourceWriter,
    entry: &PretendEntrypoint,
    proxy_name: &str,
    target: &str,
    specs: &[SetupArgumentSpec],
    index: usize,
) {
    if specs.is_empty() {
        return;
    }

    // Zero-argument matchers are instantiated once and shared.
    for spec in specs {
        if let SetupArgumentSpec::Matcher {
            ordinal,
            matcher_type,
            strategy: MatcherStrategy::Shared,
            ..
        } = spec
        {
            w.blank();
            w.line(format!(
                "static readonly {matcher_type} s_matcher{index}_{ordinal} = new {matcher_type}();"
            ));
        }
    }

    let needs_replay = specs.iter().any(|s| s.needs_replay());
    w.blank();
    w.open(format!(
        "static bool Matcher{index}(Pretender.CallInfo call, System.Action<{target}> setup)"
    ));
    if needs_replay {
        // Replay the original lambda against a recording proxy inside a
        // listener session; the session is guard-scoped in the runtime, so
        // the listener pops even if the replay throws.
        w.line(format!(
            "var recorded = Pretender.Listener.Record(() => setup(new {proxy_name}Recorder()));"
        ));
        debug_assert!(entry.needs_recorder);
    }
    for spec in specs {
        emit_spec_check(w, spec, index);
    }
    w.line("return true;");
    w.close();
}

fn emit_spec_check(w: &mut SourceWriter, spec: &SetupArgumentSpec, index: usize) {
    match spec {
        SetupArgumentSpec::Literal { ordinal, param_ty, value } => {
            let lit = format_literal(value);
            // Null needs no unboxing cast; everything else compares unboxed.
            let cast = match value {
                crate::args::LiteralValue::Null => String::new(),
                _ => cast_for(param_ty),
            };
            w.open(format!("if ({cast}call.Arguments[{ordinal}] != {lit})"));
            w.line("return false;");
            w.close();
        }
        SetupArgumentSpec::Matcher { ordinal, matcher_type, strategy, .. } => match strategy {
            MatcherStrategy::Shared => {
                w.open(format!(
                    "if (!s_matcher{index}_{ordinal}.Matches(call.Arguments[{ordinal}]))"
                ));
                w.line("return false;");
                w.close();
            }
            MatcherStrategy::Inline { ctor_args } => {
                let args = ctor_args
                    .iter()
                    .map(|a| match a {
                        MatcherCtorArg::Literal(v) => format_literal(v),
                        MatcherCtorArg::StaticLambda { text } => text.clone(),
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                w.open(format!(
                    "if (!new {matcher_type}({args}).Matches(call.Arguments[{ordinal}]))"
                ));
                w.line("return false;");
                w.close();
            }
            MatcherStrategy::Replay => {
                w.open(format!(
                    "if (!recorded.MatcherAt({ordinal}).Matches(call.Arguments[{ordinal}]))"
                ));
                w.line("return false;");
                w.close();
            }
        },
        SetupArgumentSpec::LocalReference { ordinal, .. }
        | SetupArgumentSpec::FieldReference { ordinal, .. } => {
            w.open(format!(
                "if (!Pretender.Values.Equal(call.Arguments[{ordinal}], recorded.Arguments[{ordinal}]))"
            ));
            w.line("return false;");
            w.close();
        }
    }
}

fn cast_for(ty: &SemType) -> String {
    match ty {
        SemType::Unknown | SemType::Null | SemType::Object => String::new(),
        other => format!("({})", other.display_name()),
    }
}
