//! The runtime library surface generated code is written against: the call
//! record and dispatch handle, argument matchers, setup storage with
//! verification, and the thread-local recording listener used by
//! capture-and-replay. The generator emits host-language references to these
//! entry points; this module is their reference implementation and the place
//! their invariants are tested.

pub mod listener;
pub mod matcher;
pub mod setup;
pub mod value;

pub use listener::{Listener, RecordedCall};
pub use matcher::{AnyMatcher, EqualsMatcher, Matcher, NoOpMatcher, PredicateMatcher};
pub use setup::{Behavior, CallCount, CompiledSetup, Pretend};
pub use value::{default_value, CallInfo, MethodId, PlainKind, ReturnKind, Value};
