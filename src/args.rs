//! Argument spec building: decide, per argument of a setup/verify lambda,
//! how the generated matcher will compare it against a live call.
//!
//! Four strategies, in order of preference: embed a literal and emit an
//! inequality check; synthesize a matcher inline when its construction is
//! provably compile-time safe; compare against values captured from the
//! enclosing scope via capture-and-replay; and, for shapes none of those
//! cover, an unsupported-argument diagnostic rather than best-effort codegen.

use crate::diagnostics::{codes, Diagnostic};
use crate::parser::ast::{Expr, LambdaBody, UnaryOp};
use crate::semantics::env::{Binding, SemanticModel};
use crate::semantics::types::SemType;
use crate::span::{Span, Spanned};
use crate::visit::{walk_expr, Visitor};
use crate::SourceFile;

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Int(i64),
    Long(i64),
    Float(f32),
    Double(f64),
    Decimal(String),
    Str(String),
    Char(char),
    Bool(bool),
    Null,
}

/// One positional argument's matching strategy. Ordinals are stable and match
/// the resolved member's parameter order.
#[derive(Debug, Clone)]
pub enum SetupArgumentSpec {
    Literal {
        ordinal: usize,
        param_ty: SemType,
        value: LiteralValue,
    },
    Matcher {
        ordinal: usize,
        param_ty: SemType,
        /// Fully-qualified matcher type from the factory's `[Matcher(...)]` tag.
        matcher_type: String,
        strategy: MatcherStrategy,
    },
    LocalReference {
        ordinal: usize,
        param_ty: SemType,
        name: String,
    },
    FieldReference {
        ordinal: usize,
        param_ty: SemType,
        name: String,
    },
}

#[derive(Debug, Clone)]
pub enum MatcherStrategy {
    /// No constructor-relevant arguments: instantiate the matcher once and
    /// share the instance across calls.
    Shared,
    /// Every constructor argument is compile-time safe: synthesize the
    /// construction inline at the call site.
    Inline { ctor_args: Vec<MatcherCtorArg> },
    /// Construction captures enclosing state; fall back to replaying the
    /// original lambda against a recording proxy and using the matcher it
    /// registers at this position.
    Replay,
}

#[derive(Debug, Clone)]
pub enum MatcherCtorArg {
    Literal(LiteralValue),
    /// A lambda proven to reference nothing outside itself, carried as source
    /// text and re-emitted verbatim.
    StaticLambda { text: String },
}

impl SetupArgumentSpec {
    pub fn ordinal(&self) -> usize {
        match self {
            SetupArgumentSpec::Literal { ordinal, .. }
            | SetupArgumentSpec::Matcher { ordinal, .. }
            | SetupArgumentSpec::LocalReference { ordinal, .. }
            | SetupArgumentSpec::FieldReference { ordinal, .. } => *ordinal,
        }
    }

    /// Whether matching this argument requires a recording session.
    pub fn needs_replay(&self) -> bool {
        match self {
            SetupArgumentSpec::LocalReference { .. } | SetupArgumentSpec::FieldReference { .. } => true,
            SetupArgumentSpec::Matcher { strategy: MatcherStrategy::Replay, .. } => true,
            _ => false,
        }
    }

    /// Stable identity token for this spec, used in compiled-setup keys so a
    /// verify call reconstructing the same spec finds the existing setup.
    pub fn fingerprint(&self) -> String {
        match self {
            SetupArgumentSpec::Literal { value, .. } => {
                format!("lit:{}", crate::emit::format::format_literal(value))
            }
            SetupArgumentSpec::Matcher { matcher_type, strategy, .. } => match strategy {
                MatcherStrategy::Shared => format!("match:{matcher_type}"),
                MatcherStrategy::Inline { ctor_args } => {
                    let args = ctor_args
                        .iter()
                        .map(|a| match a {
                            MatcherCtorArg::Literal(v) => crate::emit::format::format_literal(v),
                            MatcherCtorArg::StaticLambda { text } => text.clone(),
                        })
                        .collect::<Vec<_>>()
                        .join(",");
                    format!("match:{matcher_type}({args})")
                }
                MatcherStrategy::Replay => format!("match:{matcher_type}:replay"),
            },
            SetupArgumentSpec::LocalReference { name, .. } => format!("cap:local:{name}"),
            SetupArgumentSpec::FieldReference { name, .. } => format!("cap:field:{name}"),
        }
    }
}

/// Classify every argument of a resolved member invocation inside a setup
/// lambda. `lambda_depth` is the setup lambda's own nesting depth; bindings
/// declared shallower than it are true captures.
pub fn build_specs(
    model: &SemanticModel,
    sources: &[SourceFile],
    lambda_depth: usize,
    call_args: &[Spanned<Expr>],
    param_tys: &[SemType],
) -> Result<Vec<SetupArgumentSpec>, Diagnostic> {
    let mut specs = Vec::with_capacity(call_args.len());
    for (ordinal, arg) in call_args.iter().enumerate() {
        let param_ty = param_tys.get(ordinal).cloned().unwrap_or(SemType::Unknown);
        specs.push(classify_arg(model, sources, lambda_depth, arg, ordinal, param_ty)?);
    }
    Ok(specs)
}

fn classify_arg(
    model: &SemanticModel,
    sources: &[SourceFile],
    lambda_depth: usize,
    arg: &Spanned<Expr>,
    ordinal: usize,
    param_ty: SemType,
) -> Result<SetupArgumentSpec, Diagnostic> {
    if let Some(value) = literal_of(arg) {
        return Ok(SetupArgumentSpec::Literal { ordinal, param_ty, value });
    }

    match &arg.node {
        Expr::Invoke { args: ctor_args, .. } => {
            let resolved = model.calls.get(&arg.span);
            let matcher_type = resolved.and_then(|call| {
                let member = &model.table.get(call.declaring_id).members[call.member_index];
                member.matcher_type.clone().map(|m| (call, m))
            });
            let Some((call, matcher_name)) = matcher_type else {
                return Err(unsupported_argument(
                    "argument is a call to a method that is not a matcher factory",
                    arg.span,
                ));
            };

            // Multi-parameter generic matchers are an open area: reject with
            // a diagnostic instead of guessing at codegen.
            if call.type_args.len() > 1 {
                return Err(unsupported_argument(
                    "matcher factories with multiple type parameters are not supported",
                    arg.span,
                ));
            }
            let (matcher_fq, matcher_arity) = resolve_matcher_type(model, &matcher_name);
            if matcher_arity >= 2 {
                return Err(unsupported_argument(
                    format!("matcher type '{matcher_fq}' has multiple type parameters"),
                    arg.span,
                ));
            }

            let strategy = matcher_strategy(model, sources, ctor_args)?;
            Ok(SetupArgumentSpec::Matcher { ordinal, param_ty, matcher_type: matcher_fq, strategy })
        }
        Expr::Ident(name) => match model.binding_of(arg.span) {
            Binding::Local { depth, .. } if *depth < lambda_depth => {
                Ok(SetupArgumentSpec::LocalReference { ordinal, param_ty, name: name.clone() })
            }
            Binding::Param { depth, .. } if *depth < lambda_depth => {
                // A parameter of the enclosing method is a capture like any
                // other local.
                Ok(SetupArgumentSpec::LocalReference { ordinal, param_ty, name: name.clone() })
            }
            Binding::Field { .. } => {
                Ok(SetupArgumentSpec::FieldReference { ordinal, param_ty, name: name.clone() })
            }
            _ => Err(unsupported_argument(
                format!("cannot classify argument '{name}'"),
                arg.span,
            )),
        },
        Expr::Member { object, name } => {
            // `this.field` reads are field references; anything deeper is not
            // a supported shape.
            if matches!(object.node, Expr::This) {
                if model.accesses.contains_key(&arg.span) {
                    return Ok(SetupArgumentSpec::FieldReference {
                        ordinal,
                        param_ty,
                        name: name.node.clone(),
                    });
                }
            }
            Err(unsupported_argument("unsupported argument shape", arg.span))
        }
        _ => Err(unsupported_argument("unsupported argument shape", arg.span)),
    }
}

/// Resolve the `[Matcher(...)]` attribute argument to a fully-qualified type
/// name and its declared arity. The attribute text may be short or qualified;
/// an unregistered name is carried through verbatim at arity 0.
fn resolve_matcher_type(model: &SemanticModel, written: &str) -> (String, usize) {
    let path: Vec<String> = written.split('.').map(String::from).collect();
    for arity in 0..=3 {
        if let Some(id) = model.table.lookup(&path, arity, Some(crate::prelude::FRAMEWORK_NAMESPACE)) {
            let info = model.table.get(id);
            return (info.key.full_name.clone(), info.key.arity);
        }
    }
    (written.to_string(), 0)
}

fn matcher_strategy(
    model: &SemanticModel,
    sources: &[SourceFile],
    ctor_args: &[Spanned<Expr>],
) -> Result<MatcherStrategy, Diagnostic> {
    if ctor_args.is_empty() {
        return Ok(MatcherStrategy::Shared);
    }
    let mut lowered = Vec::with_capacity(ctor_args.len());
    for arg in ctor_args {
        if let Some(value) = literal_of(arg) {
            lowered.push(MatcherCtorArg::Literal(value));
            continue;
        }
        if let Expr::Lambda { .. } = &arg.node {
            let depth = *model.lambda_depths.get(&arg.span).unwrap_or(&usize::MAX);
            match lambda_safety(model, arg, depth)? {
                true => {
                    let text = slice_source(sources, arg.span);
                    lowered.push(MatcherCtorArg::StaticLambda { text });
                }
                false => return Ok(MatcherStrategy::Replay),
            }
            continue;
        }
        // A non-literal, non-lambda constructor argument (a captured value,
        // a nested call) cannot be lifted; replay handles it.
        return Ok(MatcherStrategy::Replay);
    }
    Ok(MatcherStrategy::Inline { ctor_args: lowered })
}

/// Decide whether a matcher lambda references only its own parameters,
/// interior locals, and static members. Captures force replay; calls to
/// user helper methods are an explicit unsupported construct.
fn lambda_safety(
    model: &SemanticModel,
    lambda: &Spanned<Expr>,
    lambda_depth: usize,
) -> Result<bool, Diagnostic> {
    struct SafetyWalker<'m> {
        model: &'m SemanticModel,
        lambda_depth: usize,
        safe: bool,
        helper_call: Option<Span>,
    }

    impl<'m, 'ast> Visitor<'ast> for SafetyWalker<'m> {
        fn visit_expr(&mut self, expr: &'ast Spanned<Expr>) {
            match &expr.node {
                Expr::Ident(_) => match self.model.binding_of(expr.span) {
                    Binding::Local { depth, .. } | Binding::Param { depth, .. } => {
                        if *depth < self.lambda_depth {
                            self.safe = false;
                        }
                    }
                    Binding::StaticType { .. } => {}
                    Binding::Field { .. } | Binding::Unknown => {
                        self.safe = false;
                    }
                },
                Expr::This => {
                    self.safe = false;
                }
                Expr::Invoke { .. } => {
                    if let Some(call) = self.model.calls.get(&expr.span) {
                        if call.is_static {
                            self.helper_call.get_or_insert(expr.span);
                        }
                    } else {
                        self.safe = false;
                    }
                }
                _ => {}
            }
            walk_expr(self, expr);
        }
    }

    let mut walker =
        SafetyWalker { model, lambda_depth, safe: lambda_depth != usize::MAX, helper_call: None };
    match &lambda.node {
        Expr::Lambda { body, .. } => match body {
            LambdaBody::Expr(e) => walker.visit_expr(e),
            LambdaBody::Block(b) => walker.visit_block(b),
        },
        _ => return Ok(false),
    }
    if let Some(span) = walker.helper_call {
        return Err(unsupported_argument(
            "matcher predicates may not call user-defined helper methods",
            span,
        ));
    }
    Ok(walker.safe)
}

fn literal_of(expr: &Spanned<Expr>) -> Option<LiteralValue> {
    match &expr.node {
        Expr::Int(n) => Some(LiteralValue::Int(*n)),
        Expr::Long(n) => Some(LiteralValue::Long(*n)),
        Expr::Float(v) => Some(LiteralValue::Float(*v)),
        Expr::Double(v) => Some(LiteralValue::Double(*v)),
        Expr::Decimal(s) => Some(LiteralValue::Decimal(s.clone())),
        Expr::Str(s) => Some(LiteralValue::Str(s.clone())),
        Expr::Char(c) => Some(LiteralValue::Char(*c)),
        Expr::Bool(b) => Some(LiteralValue::Bool(*b)),
        Expr::Null => Some(LiteralValue::Null),
        Expr::Unary { op: UnaryOp::Neg, operand } => match literal_of(operand)? {
            LiteralValue::Int(n) => Some(LiteralValue::Int(-n)),
            LiteralValue::Long(n) => Some(LiteralValue::Long(-n)),
            LiteralValue::Float(v) => Some(LiteralValue::Float(-v)),
            LiteralValue::Double(v) => Some(LiteralValue::Double(-v)),
            LiteralValue::Decimal(s) => Some(LiteralValue::Decimal(format!("-{s}"))),
            _ => None,
        },
        _ => None,
    }
}

fn slice_source(sources: &[SourceFile], span: Span) -> String {
    sources
        .get(span.file_id as usize)
        .map(|f| f.text[span.start..span.end].to_string())
        .unwrap_or_default()
}

fn unsupported_argument(msg: impl Into<String>, span: Span) -> Diagnostic {
    Diagnostic::error(codes::UNSUPPORTED_ARGUMENT, msg, span)
}
