//! Semantic classification: bind syntactic candidates to the framework's
//! entrypoints, reject false positives, and build the immutable invocation
//! records the emitter consumes.
//!
//! Rejection of a candidate that simply does not bind to the framework is a
//! silent non-match. Everything else that goes wrong here becomes a
//! per-candidate diagnostic; one bad call site never blocks the rest.

use std::collections::BTreeSet;

use crate::args::{self, SetupArgumentSpec};
use crate::diagnostics::{codes, Diagnostic};
use crate::line_index::LineIndex;
use crate::parser::ast::{Expr, LambdaBody, ParamMode, TypeKind};
use crate::prelude::PRETEND_FACTORY_TYPE;
use crate::scan::{Candidate, CandidateKind};
use crate::semantics::env::{Binding, MemberKind, ResolvedCall, SemanticModel, TypeInfo};
use crate::semantics::types::{SemType, TypeKey};
use crate::span::{Span, Spanned};
use crate::SourceFile;

/// Exact source position of a call's member-access token, 1-based. This is
/// the key the host compiler validates when substituting the generated
/// wrapper for the original call.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct InterceptsLocationInfo {
    pub path: String,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchKind {
    Method,
    Getter,
    Setter,
}

/// One dispatchable member of a proxied type, identified by its interned
/// ordinal. Generated code and the runtime index members by ordinal; nothing
/// is looked up by name at runtime.
#[derive(Debug, Clone)]
pub struct DispatchSlot {
    pub ordinal: usize,
    /// Accessor-qualified name: `Foo`, `get_Name`, `set_Name`.
    pub name: String,
    /// The declared member name.
    pub member_name: String,
    pub kind: DispatchKind,
    pub params: Vec<ParamSlot>,
    pub ret: SemType,
}

#[derive(Debug, Clone)]
pub struct ParamSlot {
    pub name: String,
    pub mode: ParamMode,
    pub ty: SemType,
}

/// One proxied target type. Identity is the target type (with its type
/// arguments), never the call site, so any number of construction sites
/// share one proxy.
#[derive(Debug, Clone)]
pub struct PretendEntrypoint {
    pub target: SemType,
    pub key: TypeKey,
    pub locations: Vec<InterceptsLocationInfo>,
    /// First construction site, used to anchor member-shape diagnostics.
    pub site_span: Span,
    pub slots: Vec<DispatchSlot>,
    /// Class targets are proxied by inheritance and need `override` members;
    /// interface targets implement.
    pub target_is_class: bool,
    /// Set when any setup/verify against this target matches by replay.
    pub needs_recorder: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountPolicy {
    /// `Verify(lambda, n)`: the wrapper takes the count as a parameter.
    Exactly,
    /// `Verify(lambda)`: at least one matching call.
    AtLeastOnce,
}

#[derive(Debug, Clone)]
pub struct SetupInvocation {
    pub target: SemType,
    pub slot_ordinal: usize,
    pub specs: Vec<SetupArgumentSpec>,
    pub location: InterceptsLocationInfo,
    /// Interned identity of (member ordinal, argument specs); a verify call
    /// reconstructing the same specs produces the same key and therefore
    /// retrieves the same compiled setup.
    pub setup_key: String,
    pub is_set: bool,
}

#[derive(Debug, Clone)]
pub struct VerifyInvocation {
    pub setup: SetupInvocation,
    pub count: CountPolicy,
}

#[derive(Debug, Clone)]
pub struct CreateInvocation {
    pub target: SemType,
    pub location: InterceptsLocationInfo,
}

#[derive(Debug, Default)]
pub struct Classified {
    pub entrypoints: Vec<PretendEntrypoint>,
    pub setups: Vec<SetupInvocation>,
    pub verifies: Vec<VerifyInvocation>,
    pub creates: Vec<CreateInvocation>,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn classify(
    candidates: &[Candidate<'_>],
    model: &SemanticModel,
    sources: &[SourceFile],
) -> Classified {
    let line_indexes: Vec<LineIndex> =
        sources.iter().map(|f| LineIndex::new(&f.text)).collect();
    let mut cx = Classifier {
        model,
        sources,
        line_indexes,
        out: Classified::default(),
        rejected: BTreeSet::new(),
    };
    for candidate in candidates {
        cx.classify_candidate(candidate);
    }
    cx.finish()
}

struct Classifier<'m> {
    model: &'m SemanticModel,
    sources: &'m [SourceFile],
    line_indexes: Vec<LineIndex>,
    out: Classified,
    /// Targets rejected with a diagnostic; later call sites against them are
    /// dropped without further noise.
    rejected: BTreeSet<String>,
}

impl<'m> Classifier<'m> {
    fn finish(mut self) -> Classified {
        for entry in &mut self.out.entrypoints {
            let target = &entry.target;
            let replay_in_setups = self
                .out
                .setups
                .iter()
                .filter(|s| &s.target == target)
                .any(|s| s.specs.iter().any(|spec| spec.needs_replay()));
            let replay_in_verifies = self
                .out
                .verifies
                .iter()
                .filter(|v| &v.setup.target == target)
                .any(|v| v.setup.specs.iter().any(|spec| spec.needs_replay()));
            entry.needs_recorder = replay_in_setups || replay_in_verifies;
        }
        self.out
    }

    fn location(&self, name_span: Span) -> Option<InterceptsLocationInfo> {
        let file = self.sources.get(name_span.file_id as usize)?;
        let index = self.line_indexes.get(name_span.file_id as usize)?;
        let pos = index.line_col(name_span.start);
        Some(InterceptsLocationInfo { path: file.path.clone(), line: pos.line, column: pos.column })
    }

    fn classify_candidate(&mut self, candidate: &Candidate<'_>) {
        match candidate.kind {
            CandidateKind::Construction => self.classify_construction(candidate),
            CandidateKind::Setup => self.classify_setup(candidate),
            CandidateKind::Verify => self.classify_verify(candidate),
            CandidateKind::Create => self.classify_create(candidate),
        }
    }

    /// The framework factory: static `Pretender.Pretend.That<T>()`.
    fn factory_call(&self, span: Span) -> Option<&'m ResolvedCall> {
        let call = self.model.calls.get(&span)?;
        (call.declaring.full_name == PRETEND_FACTORY_TYPE
            && call.declaring.arity == 0
            && call.is_static)
            .then_some(call)
    }

    /// An instance call on the framework's configured handle
    /// `Pretender.Pretend<T>`; returns the resolved call and the target type.
    fn handle_call(&self, span: Span) -> Option<(&'m ResolvedCall, SemType)> {
        let call = self.model.calls.get(&span)?;
        if call.declaring.full_name != PRETEND_FACTORY_TYPE || call.declaring.arity != 1 {
            return None;
        }
        let target = call.receiver_args.first()?.clone();
        Some((call, target))
    }

    fn classify_construction(&mut self, candidate: &Candidate<'_>) {
        let Some(call) = self.factory_call(candidate.invoke.span) else { return };
        let Some(target) = call.type_args.first().cloned() else { return };
        let Some(location) = self.location(candidate.name_span) else { return };

        let key = match &target {
            SemType::Named { key, .. } => key.clone(),
            other => {
                self.reject_target(
                    other.clone(),
                    format!("type '{other}' cannot be pretended: only interfaces and extensible classes can be proxied"),
                    candidate.name_span,
                );
                return;
            }
        };
        if self.rejected.contains(&target.display_name()) {
            return;
        }

        let Some(id) = self.model.table.by_key(&key) else {
            self.reject_target(
                target.clone(),
                format!("unknown type '{}'", target.display_name()),
                candidate.name_span,
            );
            return;
        };
        let info = self.model.table.get(id).clone();
        if info.kind == TypeKind::Class && (info.is_sealed || info.is_static) {
            let adjective = if info.is_sealed { "sealed" } else { "static" };
            self.reject_target(
                target.clone(),
                format!(
                    "{adjective} type '{}' cannot be pretended: proxying requires an interface or an inheritable class",
                    target.display_name()
                ),
                candidate.name_span,
            );
            return;
        }

        if let Some(existing) = self.out.entrypoints.iter_mut().find(|e| e.target == target) {
            if !existing.locations.contains(&location) {
                existing.locations.push(location);
            }
            return;
        }

        let slots = self.build_slots(&info, &target, candidate.name_span);
        self.out.entrypoints.push(PretendEntrypoint {
            target,
            key,
            locations: vec![location],
            site_span: candidate.name_span,
            slots,
            target_is_class: info.kind == TypeKind::Class,
            needs_recorder: false,
        });
    }

    fn reject_target(&mut self, target: SemType, message: String, span: Span) {
        if self.rejected.insert(target.display_name()) {
            self.out.diagnostics.push(Diagnostic::error(codes::SEALED_TARGET, message, span));
        }
    }

    /// Intern the dispatch table for a target: one slot per method, one per
    /// property accessor, in declaration order. Fields are an unsupported
    /// member kind and surface as diagnostics, never as silent skips.
    fn build_slots(&mut self, info: &TypeInfo, target: &SemType, site_span: Span) -> Vec<DispatchSlot> {
        let args = match target {
            SemType::Named { args, .. } => args.clone(),
            _ => Vec::new(),
        };
        let subst: std::collections::HashMap<String, SemType> =
            info.generic_params.iter().cloned().zip(args).collect();

        let mut slots = Vec::new();
        let mut ordinal = 0;
        for member in &info.members {
            let proxyable = info.kind == TypeKind::Interface || member.is_virtual || member.is_abstract;
            match &member.kind {
                MemberKind::Method { params, ret, generic_params } => {
                    if !generic_params.is_empty() {
                        self.out.diagnostics.push(Diagnostic::error(
                            codes::UNSUPPORTED_MEMBER,
                            format!(
                                "generic method '{}' on '{}' cannot be proxied",
                                member.name,
                                target.display_name()
                            ),
                            site_span,
                        ));
                        continue;
                    }
                    if !proxyable {
                        self.out.diagnostics.push(Diagnostic::warning(
                            codes::UNSUPPORTED_MEMBER,
                            format!(
                                "non-virtual member '{}' on '{}' will not be proxied",
                                member.name,
                                target.display_name()
                            ),
                            site_span,
                        ));
                        continue;
                    }
                    slots.push(DispatchSlot {
                        ordinal,
                        name: member.name.clone(),
                        member_name: member.name.clone(),
                        kind: DispatchKind::Method,
                        params: params
                            .iter()
                            .map(|p| ParamSlot {
                                name: p.name.clone(),
                                mode: p.mode,
                                ty: p.ty.substitute(&subst),
                            })
                            .collect(),
                        ret: ret.substitute(&subst),
                    });
                    ordinal += 1;
                }
                MemberKind::Property { ty, has_getter, has_setter } => {
                    if !proxyable {
                        self.out.diagnostics.push(Diagnostic::warning(
                            codes::UNSUPPORTED_MEMBER,
                            format!(
                                "non-virtual member '{}' on '{}' will not be proxied",
                                member.name,
                                target.display_name()
                            ),
                            site_span,
                        ));
                        continue;
                    }
                    let ty = ty.substitute(&subst);
                    if *has_getter {
                        slots.push(DispatchSlot {
                            ordinal,
                            name: format!("get_{}", member.name),
                            member_name: member.name.clone(),
                            kind: DispatchKind::Getter,
                            params: Vec::new(),
                            ret: ty.clone(),
                        });
                        ordinal += 1;
                    }
                    if *has_setter {
                        slots.push(DispatchSlot {
                            ordinal,
                            name: format!("set_{}", member.name),
                            member_name: member.name.clone(),
                            kind: DispatchKind::Setter,
                            params: vec![ParamSlot {
                                name: "value".to_string(),
                                mode: ParamMode::Value,
                                ty: ty.clone(),
                            }],
                            ret: SemType::Void,
                        });
                        ordinal += 1;
                    }
                }
                MemberKind::Field { .. } => {
                    self.out.diagnostics.push(Diagnostic::error(
                        codes::UNSUPPORTED_MEMBER,
                        format!(
                            "field '{}' on '{}' is an unsupported member kind",
                            member.name,
                            target.display_name()
                        ),
                        site_span,
                    ));
                }
            }
        }
        slots
    }

    fn entrypoint_for(&self, target: &SemType) -> Option<&PretendEntrypoint> {
        self.out.entrypoints.iter().find(|e| &e.target == target)
    }

    /// Decompose a setup/verify lambda into the configured slot and its
    /// argument expressions. Returns None (after pushing a diagnostic) when
    /// the lambda is not a direct member use of its parameter.
    fn bind_setup_lambda(
        &mut self,
        target: &SemType,
        lambda: &Spanned<Expr>,
        is_set: bool,
    ) -> Option<(usize, Vec<SetupArgumentSpec>)> {
        let Expr::Lambda { body, .. } = &lambda.node else {
            self.invalid_lambda("setup expression must be a lambda", lambda.span);
            return None;
        };
        let LambdaBody::Expr(body) = body else {
            self.invalid_lambda(
                "setup lambda must be a single member use of its parameter",
                lambda.span,
            );
            return None;
        };
        let lambda_depth = *self.model.lambda_depths.get(&lambda.span).unwrap_or(&1);
        let entry = self.entrypoint_for(target)?.clone();

        if is_set {
            // `p => p.Name = value`
            let Expr::Assign { target: assign_target, value } = &body.node else {
                self.invalid_lambda("a property-setter setup must assign through its parameter", body.span);
                return None;
            };
            let access = self.model.accesses.get(&assign_target.span);
            let Some(access) = access else {
                self.invalid_lambda("assignment target does not resolve to a member of the pretended type", assign_target.span);
                return None;
            };
            if access.declaring != entry.key {
                return None;
            }
            let slot = entry
                .slots
                .iter()
                .find(|s| s.kind == DispatchKind::Setter && s.member_name == access.member);
            let Some(slot) = slot else {
                self.invalid_lambda(
                    format!("property '{}' has no settable accessor", access.member),
                    assign_target.span,
                );
                return None;
            };
            let param_tys = vec![slot.params[0].ty.clone()];
            match args::build_specs(
                self.model,
                self.sources,
                lambda_depth,
                std::slice::from_ref(value.as_ref()),
                &param_tys,
            ) {
                Ok(specs) => return Some((slot.ordinal, specs)),
                Err(diag) => {
                    self.out.diagnostics.push(diag);
                    return None;
                }
            }
        }

        match &body.node {
            // `p => p.Foo(args...)`
            Expr::Invoke { callee, args: call_args, .. } => {
                let Expr::Member { object, name } = &callee.node else {
                    self.invalid_lambda("setup lambda must call a member of its parameter", body.span);
                    return None;
                };
                if !self.is_lambda_param(object, lambda_depth) {
                    self.invalid_lambda("setup lambda must call a member of its parameter", body.span);
                    return None;
                }
                let Some(call) = self.model.calls.get(&body.span) else {
                    self.invalid_lambda(
                        format!("'{}' does not resolve to a member of the pretended type", name.node),
                        body.span,
                    );
                    return None;
                };
                if call.declaring != entry.key {
                    return None;
                }
                let slot = entry
                    .slots
                    .iter()
                    .find(|s| s.kind == DispatchKind::Method && s.member_name == name.node);
                let Some(slot) = slot else {
                    // Member exists but was not proxyable; already diagnosed
                    // at slot-building time.
                    return None;
                };
                let param_tys: Vec<SemType> = slot.params.iter().map(|p| p.ty.clone()).collect();
                match args::build_specs(self.model, self.sources, lambda_depth, call_args, &param_tys) {
                    Ok(specs) => Some((slot.ordinal, specs)),
                    Err(diag) => {
                        self.out.diagnostics.push(diag);
                        None
                    }
                }
            }
            // `p => p.Name`: property getter, universal matcher.
            Expr::Member { object, name } => {
                if !self.is_lambda_param(object, lambda_depth) {
                    self.invalid_lambda("setup lambda must access a member of its parameter", body.span);
                    return None;
                }
                let Some(access) = self.model.accesses.get(&body.span) else {
                    self.invalid_lambda(
                        format!("'{}' does not resolve to a member of the pretended type", name.node),
                        body.span,
                    );
                    return None;
                };
                if access.declaring != entry.key {
                    return None;
                }
                let slot = entry
                    .slots
                    .iter()
                    .find(|s| s.kind == DispatchKind::Getter && s.member_name == access.member)?;
                Some((slot.ordinal, Vec::new()))
            }
            _ => {
                self.invalid_lambda(
                    "setup lambda must be a direct member use of its parameter",
                    body.span,
                );
                None
            }
        }
    }

    fn is_lambda_param(&self, object: &Spanned<Expr>, lambda_depth: usize) -> bool {
        matches!(object.node, Expr::Ident(_))
            && matches!(
                self.model.binding_of(object.span),
                Binding::Param { depth, .. } if *depth == lambda_depth
            )
    }

    fn invalid_lambda(&mut self, message: impl Into<String>, span: Span) {
        self.out.diagnostics.push(Diagnostic::error(codes::INVALID_SETUP_LAMBDA, message, span));
    }

    fn setup_key(slot: &DispatchSlot, specs: &[SetupArgumentSpec]) -> String {
        if specs.is_empty() {
            return format!("{}:{}|noop", slot.ordinal, slot.name);
        }
        let fps: Vec<String> = specs.iter().map(|s| s.fingerprint()).collect();
        format!("{}:{}|{}", slot.ordinal, slot.name, fps.join("|"))
    }

    fn classify_setup(&mut self, candidate: &Candidate<'_>) {
        let Some((_, target)) = self.handle_call(candidate.invoke.span) else { return };
        if self.rejected.contains(&target.display_name()) {
            return;
        }
        if self.entrypoint_for(&target).is_none() {
            return;
        }
        let Expr::Invoke { args, .. } = &candidate.invoke.node else { return };
        let Some(location) = self.location(candidate.name_span) else { return };
        let Some((ordinal, specs)) = self.bind_setup_lambda(&target, &args[0], candidate.is_set)
        else {
            return;
        };
        let entry = self.entrypoint_for(&target).expect("checked above");
        let slot = &entry.slots[slot_index(entry, ordinal)];
        let setup_key = Self::setup_key(slot, &specs);
        self.out.setups.push(SetupInvocation {
            target,
            slot_ordinal: ordinal,
            specs,
            location,
            setup_key,
            is_set: candidate.is_set,
        });
    }

    fn classify_verify(&mut self, candidate: &Candidate<'_>) {
        let Some((_, target)) = self.handle_call(candidate.invoke.span) else { return };
        if self.rejected.contains(&target.display_name()) {
            return;
        }
        if self.entrypoint_for(&target).is_none() {
            return;
        }
        let Expr::Invoke { args, .. } = &candidate.invoke.node else { return };
        let Some(location) = self.location(candidate.name_span) else { return };
        let Some((ordinal, specs)) = self.bind_setup_lambda(&target, &args[0], candidate.is_set)
        else {
            return;
        };
        let entry = self.entrypoint_for(&target).expect("checked above");
        let slot = &entry.slots[slot_index(entry, ordinal)];
        let setup_key = Self::setup_key(slot, &specs);
        let count = if args.len() == 2 { CountPolicy::Exactly } else { CountPolicy::AtLeastOnce };
        self.out.verifies.push(VerifyInvocation {
            setup: SetupInvocation {
                target,
                slot_ordinal: ordinal,
                specs,
                location,
                setup_key,
                is_set: candidate.is_set,
            },
            count,
        });
    }

    fn classify_create(&mut self, candidate: &Candidate<'_>) {
        let Some((call, target)) = self.handle_call(candidate.invoke.span) else { return };
        if call.member != "Create" {
            return;
        }
        if self.rejected.contains(&target.display_name()) {
            return;
        }
        if self.entrypoint_for(&target).is_none() {
            return;
        }
        let Some(location) = self.location(candidate.name_span) else { return };
        self.out.creates.push(CreateInvocation { target, location });
    }
}

fn slot_index(entry: &PretendEntrypoint, ordinal: usize) -> usize {
    entry
        .slots
        .iter()
        .position(|s| s.ordinal == ordinal)
        .expect("ordinal issued from this entrypoint's slots")
}
