//! Argument matchers.
//!
//! `Matcher` is an explicit capability: both built-in and user-declared
//! matchers implement the trait, and generated code only ever talks to the
//! trait surface.

use super::value::{CallInfo, Value};

/// Decides whether one runtime argument satisfies a setup's expectation.
pub trait Matcher: Send + Sync {
    fn matches(&self, value: &Value) -> bool;
}

/// Matches any argument value.
pub struct AnyMatcher;

impl Matcher for AnyMatcher {
    fn matches(&self, _value: &Value) -> bool {
        true
    }
}

/// Matches by equality against a captured value. Capture-and-replay compares
/// recorded arguments through this.
pub struct EqualsMatcher(pub Value);

impl Matcher for EqualsMatcher {
    fn matches(&self, value: &Value) -> bool {
        &self.0 == value
    }
}

/// Matches through a user predicate.
pub struct PredicateMatcher {
    predicate: Box<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl PredicateMatcher {
    pub fn new(predicate: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self { predicate: Box::new(predicate) }
    }
}

impl Matcher for PredicateMatcher {
    fn matches(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }
}

/// The universal call-level matcher used for parameterless members: every
/// call to the member matches.
pub struct NoOpMatcher;

impl NoOpMatcher {
    pub fn matches(_call: &CallInfo) -> bool {
        true
    }
}
