//! Thread-local matcher listener.
//!
//! Capture-and-replay runs the original setup lambda against a recording
//! proxy. While that replay is in flight, the recorder's dispatched call and
//! any matchers constructed by factories must land somewhere scoped to the
//! replay: a stack, because replays can nest, and thread-local so concurrent
//! test runs cannot cross-contaminate. The stack entry is popped by a guard's
//! `Drop`, which makes the pop unconditional on every exit path, including
//! unwinding out of a throwing replay.

use std::cell::RefCell;
use std::sync::Arc;

use super::matcher::Matcher;
use super::value::{MethodId, Value};

/// What one recording session observed: the single call the setup lambda
/// made, plus every matcher registered while it ran, in argument order.
pub struct RecordedCall {
    pub method: MethodId,
    pub args: Vec<Value>,
    matchers: Vec<Arc<dyn Matcher>>,
}

impl RecordedCall {
    /// The matcher registered for an argument position during recording.
    pub fn matcher_at(&self, ordinal: usize) -> Option<&Arc<dyn Matcher>> {
        self.matchers.get(ordinal)
    }

    pub fn arg(&self, ordinal: usize) -> Option<&Value> {
        self.args.get(ordinal)
    }
}

#[derive(Default)]
struct Frame {
    matchers: Vec<Arc<dyn Matcher>>,
    call: Option<(MethodId, Vec<Value>)>,
}

thread_local! {
    static STACK: RefCell<Vec<Frame>> = RefCell::new(Vec::new());
}

struct FrameGuard;

impl FrameGuard {
    fn push() -> Self {
        STACK.with(|s| s.borrow_mut().push(Frame::default()));
        FrameGuard
    }
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        STACK.with(|s| {
            s.borrow_mut().pop();
        });
    }
}

pub struct Listener;

impl Listener {
    /// Run `replay` inside a fresh recording scope and return what it
    /// recorded. The scope is popped whether or not `replay` unwinds.
    pub fn record<F: FnOnce()>(replay: F) -> Option<RecordedCall> {
        let guard = FrameGuard::push();
        replay();
        let recorded = STACK.with(|s| {
            let mut stack = s.borrow_mut();
            let frame = stack.last_mut().expect("recording frame pushed above");
            frame.call.take().map(|(method, args)| RecordedCall {
                method,
                args,
                matchers: std::mem::take(&mut frame.matchers),
            })
        });
        drop(guard);
        recorded
    }

    /// Called by recorder proxies: report the call the setup lambda made.
    /// The first call wins; a well-formed setup lambda makes exactly one.
    pub fn notify(method: MethodId, args: Vec<Value>) {
        STACK.with(|s| {
            let mut stack = s.borrow_mut();
            if let Some(frame) = stack.last_mut() {
                if frame.call.is_none() {
                    frame.call = Some((method, args));
                }
            }
        });
    }

    /// Called by matcher factories while a recording is in flight.
    pub fn register_matcher(matcher: Arc<dyn Matcher>) {
        STACK.with(|s| {
            let mut stack = s.borrow_mut();
            if let Some(frame) = stack.last_mut() {
                frame.matchers.push(matcher);
            }
        });
    }

    pub fn is_recording() -> bool {
        STACK.with(|s| !s.borrow().is_empty())
    }

    /// Current stack depth; exposed for scope-safety assertions.
    pub fn depth() -> usize {
        STACK.with(|s| s.borrow().len())
    }
}
