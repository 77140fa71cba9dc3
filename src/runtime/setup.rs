//! Setup storage and call dispatch.
//!
//! Setups are evaluated in registration order and the first match wins.
//! A call matching no setup falls through silently: no-op for void members,
//! the policy default for returning members. Duplicate behavior attachment
//! and verification mismatches panic; both are test-failure conditions, not
//! recoverable states.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::value::{default_value, CallInfo, MethodId, ReturnKind, Value};

type CallMatcher = Box<dyn Fn(&CallInfo) -> bool + Send + Sync>;
type CallbackFn = Box<dyn Fn(&mut CallInfo) + Send + Sync>;

pub enum Behavior {
    Returns(Value),
    Throws(String),
    Callback(CallbackFn),
}

/// One configured expectation: member identity, a matcher, at most one
/// behavior, and the observed call count.
pub struct CompiledSetup {
    method: MethodId,
    key: String,
    matcher: CallMatcher,
    behavior: Mutex<Option<Arc<Behavior>>>,
    calls: AtomicUsize,
}

impl CompiledSetup {
    fn new(method: MethodId, key: String, matcher: CallMatcher) -> Self {
        Self { method, key, matcher, behavior: Mutex::new(None), calls: AtomicUsize::new(0) }
    }

    pub fn method(&self) -> MethodId {
        self.method
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn matches(&self, call: &CallInfo) -> bool {
        call.method == self.method && (self.matcher)(call)
    }

    pub fn returns(&self, value: Value) {
        self.attach(Behavior::Returns(value));
    }

    pub fn throws(&self, message: impl Into<String>) {
        self.attach(Behavior::Throws(message.into()));
    }

    pub fn callback(&self, callback: impl Fn(&mut CallInfo) + Send + Sync + 'static) {
        self.attach(Behavior::Callback(Box::new(callback)));
    }

    fn attach(&self, behavior: Behavior) {
        let mut slot = self.behavior.lock().expect("behavior lock poisoned");
        if slot.is_some() {
            panic!("setup '{}' already has a behavior attached", self.key);
        }
        *slot = Some(Arc::new(behavior));
    }

    fn current_behavior(&self) -> Option<Arc<Behavior>> {
        self.behavior.lock().expect("behavior lock poisoned").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Count-validation routine. Mismatches are fatal by design.
    pub fn verify(&self, expected: CallCount) {
        let actual = self.call_count();
        if !expected.admits(actual) {
            panic!(
                "verification failed for setup '{}': expected {} matching call(s), observed {}",
                self.key, expected, actual
            );
        }
    }
}

/// Expected-count policy for verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallCount {
    Exactly(usize),
    AtLeast(usize),
    Never,
}

impl CallCount {
    pub fn at_least_once() -> Self {
        CallCount::AtLeast(1)
    }

    fn admits(self, actual: usize) -> bool {
        match self {
            CallCount::Exactly(n) => actual == n,
            CallCount::AtLeast(n) => actual >= n,
            CallCount::Never => actual == 0,
        }
    }
}

impl std::fmt::Display for CallCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallCount::Exactly(n) => write!(f, "exactly {n}"),
            CallCount::AtLeast(n) => write!(f, "at least {n}"),
            CallCount::Never => write!(f, "no"),
        }
    }
}

/// The per-target dispatch handle generated proxies route through.
#[derive(Default)]
pub struct Pretend {
    setups: Mutex<Vec<Arc<CompiledSetup>>>,
}

impl Pretend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieve the compiled setup for (member, key), creating it on first
    /// use. A verify wrapper reconstructing the same key gets the existing
    /// setup, never a fresh one.
    pub fn get_or_create_setup(
        &self,
        method: MethodId,
        key: &str,
        matcher: impl Fn(&CallInfo) -> bool + Send + Sync + 'static,
    ) -> Arc<CompiledSetup> {
        let mut setups = self.setups.lock().expect("setup store lock poisoned");
        if let Some(existing) = setups.iter().find(|s| s.method == method && s.key == key) {
            return Arc::clone(existing);
        }
        let setup = Arc::new(CompiledSetup::new(method, key.to_string(), Box::new(matcher)));
        setups.push(Arc::clone(&setup));
        setup
    }

    pub fn setup_count(&self) -> usize {
        self.setups.lock().expect("setup store lock poisoned").len()
    }

    /// Dispatch one call: first matching setup in registration order wins;
    /// a non-match falls through to the policy default.
    pub fn handle(&self, call: &mut CallInfo, ret: ReturnKind) {
        let setups: Vec<Arc<CompiledSetup>> = {
            let guard = self.setups.lock().expect("setup store lock poisoned");
            guard.clone()
        };
        for setup in setups {
            if !setup.matches(call) {
                continue;
            }
            setup.calls.fetch_add(1, Ordering::SeqCst);
            match setup.current_behavior().as_deref() {
                Some(Behavior::Returns(value)) => call.ret = Some(value.clone()),
                Some(Behavior::Throws(message)) => panic!("{message}"),
                Some(Behavior::Callback(callback)) => {
                    callback(call);
                    if call.ret.is_none() {
                        call.ret = default_value(ret);
                    }
                }
                None => call.ret = default_value(ret),
            }
            return;
        }
        call.ret = default_value(ret);
    }
}
