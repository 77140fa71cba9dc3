//! Integration tests for the runtime surface the generated code is written
//! against: dispatch, setup storage, verification, and the recording
//! listener, exercised together the way a generated unit drives them.

use std::sync::Arc;

use pretender::runtime::{
    AnyMatcher, CallCount, CallInfo, EqualsMatcher, Listener, Matcher, MethodId, NoOpMatcher,
    PlainKind, Pretend, PredicateMatcher, ReturnKind, Value,
};

const FOO: MethodId = MethodId(0);

fn foo_call(bar: &str, baz: i64) -> CallInfo {
    CallInfo::new(FOO, vec![Value::Str(bar.to_string()), Value::Int(baz)])
}

/// The runtime shape of a generated literal matcher: sequential checks over
/// the argument slots, defaulting to a match.
fn literal_matcher(call: &CallInfo) -> bool {
    if call.args[0] != Value::Str("1".to_string()) {
        return false;
    }
    if call.args[1] != Value::Int(1) {
        return false;
    }
    true
}

#[test]
fn setup_dispatch_and_exact_count_verification() {
    let pretend = Pretend::new();
    let setup = pretend.get_or_create_setup(FOO, "0:Foo|lit:\"1\"|lit:1", literal_matcher);
    setup.returns(Value::Str("Hi".to_string()));

    let mut hit = foo_call("1", 1);
    pretend.handle(&mut hit, ReturnKind::Plain(PlainKind::Str));
    assert_eq!(hit.ret, Some(Value::Str("Hi".to_string())));

    let mut miss = foo_call("2", 1);
    pretend.handle(&mut miss, ReturnKind::Plain(PlainKind::Str));
    assert_eq!(miss.ret, Some(Value::Null));

    let mut hit_again = foo_call("1", 1);
    pretend.handle(&mut hit_again, ReturnKind::Plain(PlainKind::Str));

    // The verify wrapper reconstructs the same key and retrieves the same
    // compiled setup rather than registering a new one.
    let compiled = pretend.get_or_create_setup(FOO, "0:Foo|lit:\"1\"|lit:1", literal_matcher);
    assert_eq!(pretend.setup_count(), 1);
    compiled.verify(CallCount::Exactly(2));
}

#[test]
#[should_panic(expected = "verification failed")]
fn verification_mismatch_is_fatal() {
    let pretend = Pretend::new();
    let setup = pretend.get_or_create_setup(FOO, "k", NoOpMatcher::matches);
    let mut call = foo_call("1", 1);
    pretend.handle(&mut call, ReturnKind::Void);
    setup.verify(CallCount::Exactly(3));
}

#[test]
fn getter_setup_with_noop_matcher_matches_every_call() {
    let pretend = Pretend::new();
    let getter = MethodId(1);
    let setup = pretend.get_or_create_setup(getter, "1:get_Name|noop", NoOpMatcher::matches);
    setup.returns(Value::Str("Hi".to_string()));

    let mut call = CallInfo::new(getter, vec![]);
    pretend.handle(&mut call, ReturnKind::Plain(PlainKind::Str));
    assert_eq!(call.ret, Some(Value::Str("Hi".to_string())));
}

#[test]
fn capture_and_replay_compares_recorded_arguments() {
    let pretend = Pretend::new();
    // The emitted matcher replays the setup lambda against a recording
    // proxy, then compares the live call's slots against the recording.
    let matcher = move |call: &CallInfo| {
        let recorded = Listener::record(|| {
            // What the recorder proxy does when the replayed lambda invokes
            // Foo(expected, 1) with the captured local resolved.
            Listener::notify(FOO, vec![Value::Str("1".to_string()), Value::Int(1)]);
        })
        .expect("setup lambda made one call");
        for (live, rec) in call.args.iter().zip(recorded.args.iter()) {
            if !EqualsMatcher(rec.clone()).matches(live) {
                return false;
            }
        }
        true
    };
    let setup = pretend.get_or_create_setup(FOO, "0:Foo|cap:local:expected|lit:1", matcher);
    setup.returns(Value::Str("Hi".to_string()));

    let mut hit = foo_call("1", 1);
    pretend.handle(&mut hit, ReturnKind::Plain(PlainKind::Str));
    assert_eq!(hit.ret, Some(Value::Str("Hi".to_string())));

    let mut miss = foo_call("other", 1);
    pretend.handle(&mut miss, ReturnKind::Plain(PlainKind::Str));
    assert_eq!(miss.ret, Some(Value::Null));
    assert_eq!(Listener::depth(), 0);
}

#[test]
fn replayed_matchers_are_consulted_positionally() {
    let recorded = Listener::record(|| {
        Listener::register_matcher(Arc::new(PredicateMatcher::new(
            |v| matches!(v, Value::Int(n) if *n > 2),
        )));
        Listener::notify(MethodId(4), vec![Value::Int(0)]);
    })
    .unwrap();
    let matcher = recorded.matcher_at(0).expect("matcher registered during replay");
    assert!(matcher.matches(&Value::Int(3)));
    assert!(!matcher.matches(&Value::Int(1)));
}

#[test]
fn listener_scope_survives_a_throwing_replay() {
    let result = std::panic::catch_unwind(|| {
        Listener::record(|| {
            Listener::register_matcher(Arc::new(AnyMatcher));
            panic!("replay threw");
        });
    });
    assert!(result.is_err());
    // Guaranteed pop on all exit paths: nothing leaked across the unwind.
    assert_eq!(Listener::depth(), 0);
    assert!(!Listener::is_recording());
}

#[test]
fn concurrent_recordings_do_not_cross_contaminate() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let recorded = Listener::record(|| {
                    Listener::notify(MethodId(i), vec![Value::Int(i as i64)]);
                })
                .unwrap();
                assert_eq!(recorded.method, MethodId(i));
                assert_eq!(recorded.args, vec![Value::Int(i as i64)]);
                assert_eq!(Listener::depth(), 0);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn fall_through_defaults_follow_return_policy() {
    let pretend = Pretend::new();

    let mut void_call = CallInfo::new(MethodId(9), vec![]);
    pretend.handle(&mut void_call, ReturnKind::Void);
    assert_eq!(void_call.ret, None);

    let mut task_call = CallInfo::new(MethodId(9), vec![]);
    pretend.handle(&mut task_call, ReturnKind::Task(Some(PlainKind::Str)));
    assert_eq!(task_call.ret, Some(Value::Task(Box::new(Value::Null))));

    let mut value_task_call = CallInfo::new(MethodId(9), vec![]);
    pretend.handle(&mut value_task_call, ReturnKind::ValueTask(Some(PlainKind::Int)));
    assert_eq!(value_task_call.ret, Some(Value::ValueTask(Box::new(Value::Int(0)))));
}
