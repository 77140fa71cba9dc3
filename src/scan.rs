//! Candidate scanning: the purely syntactic first stage.
//!
//! The host's incremental model reruns cheap predicates far more often than
//! the expensive semantic transform, so nothing here may touch the semantic
//! model. The predicates match on member-access name, generic-argument arity
//! and argument-list cardinality only. False positives are expected and
//! filtered by the classifier; false negatives are not allowed.

use crate::parser::ast::{Expr, Program};
use crate::span::{Span, Spanned};
use crate::visit::{walk_expr, Visitor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    /// `Pretend.That<T>()`
    Construction,
    /// `.Setup(...)` / `.SetupSet(...)`
    Setup,
    /// `.Verify(...)` / `.VerifySet(...)`
    Verify,
    /// `.Create()`
    Create,
}

#[derive(Debug)]
pub struct Candidate<'a> {
    pub kind: CandidateKind,
    pub invoke: &'a Spanned<Expr>,
    /// Span of the member-access name token, the interception anchor.
    pub name_span: Span,
    /// True for the property-setter variants (`SetupSet`, `VerifySet`).
    pub is_set: bool,
}

/// `Pretend.That<T>()`: named `That`, exactly one type argument, no value
/// arguments.
pub fn is_construction_candidate(expr: &Expr) -> bool {
    let Expr::Invoke { callee, generic_args, args } = expr else { return false };
    Expr::invoke_name(callee) == Some("That") && generic_args.len() == 1 && args.is_empty()
}

/// `.Setup(lambda)` / `.SetupSet(lambda)`: one argument, no type arguments.
pub fn is_setup_candidate(expr: &Expr) -> bool {
    let Expr::Invoke { callee, generic_args, args } = expr else { return false };
    matches!(Expr::invoke_name(callee), Some("Setup" | "SetupSet"))
        && generic_args.is_empty()
        && args.len() == 1
}

/// `.Verify(lambda)` / `.Verify(lambda, count)` and the `VerifySet` variants.
pub fn is_verify_candidate(expr: &Expr) -> bool {
    let Expr::Invoke { callee, generic_args, args } = expr else { return false };
    matches!(Expr::invoke_name(callee), Some("Verify" | "VerifySet"))
        && generic_args.is_empty()
        && (1..=2).contains(&args.len())
}

/// `.Create()`: no arguments of either kind.
pub fn is_create_candidate(expr: &Expr) -> bool {
    let Expr::Invoke { callee, generic_args, args } = expr else { return false };
    Expr::invoke_name(callee) == Some("Create") && generic_args.is_empty() && args.is_empty()
}

struct Scanner<'a> {
    candidates: Vec<Candidate<'a>>,
}

impl<'a> Scanner<'a> {
    fn consider(&mut self, expr: &'a Spanned<Expr>) {
        let Expr::Invoke { callee, .. } = &expr.node else { return };
        let kind = if is_construction_candidate(&expr.node) {
            CandidateKind::Construction
        } else if is_setup_candidate(&expr.node) {
            CandidateKind::Setup
        } else if is_verify_candidate(&expr.node) {
            CandidateKind::Verify
        } else if is_create_candidate(&expr.node) {
            CandidateKind::Create
        } else {
            return;
        };
        let is_set = matches!(Expr::invoke_name(callee), Some("SetupSet" | "VerifySet"));
        self.candidates.push(Candidate {
            kind,
            invoke: expr,
            name_span: Expr::invoke_name_span(callee),
            is_set,
        });
    }
}

impl<'a> Visitor<'a> for Scanner<'a> {
    fn visit_expr(&mut self, expr: &'a Spanned<Expr>) {
        self.consider(expr);
        walk_expr(self, expr);
    }
}

/// Collect every syntactic candidate in traversal order.
pub fn scan(program: &Program) -> Vec<Candidate<'_>> {
    let mut scanner = Scanner { candidates: Vec::new() };
    scanner.visit_program(program);
    scanner.candidates
}
