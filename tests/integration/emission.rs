mod common;

use common::{count_occurrences, run, unit, FOO_FIXTURE};

#[test]
fn property_getter_setup_uses_the_noop_matcher() {
    // A no-argument property getter configured with Returns must dispatch
    // through the call handler and register with the universal always-match
    // matcher.
    let generation = run(
        "namespace Tests
        {
            interface IGreeter
            {
                string Name { get; }
            }

            class T
            {
                void Test()
                {
                    var pretend = Pretend.That<IGreeter>();
                    pretend.Setup(p => p.Name).Returns(\"Hi\");
                }
            }
        }",
    );
    assert!(generation.diagnostics.is_empty());
    let source = unit(&generation, "IGreeterPretend.g.pretend");

    // The proxy getter dispatches through the handler...
    assert!(source.contains("public string Name"));
    assert!(source.contains("var call = new Pretender.CallInfo(0, new object[0]);"));
    assert!(source.contains("_pretend.Handle(call);"));
    // ...and the wrapper registers the universal no-op matcher.
    assert!(source.contains("GetOrCreateSetup(0, \"0:get_Name|noop\", Pretender.NoOpMatcher.Matches, setup)"));
}

#[test]
fn literal_arguments_become_sequential_inequality_checks() {
    // Foo("1", 1) becomes two inequality checks, string then boxed int,
    // falling through to true.
    let generation = run(FOO_FIXTURE);
    assert!(generation.diagnostics.is_empty());
    let source = unit(&generation, "IFooPretend.g.pretend");

    let first = source.find("if ((string)call.Arguments[0] != \"1\")").expect("string check");
    let second = source.find("if ((int)call.Arguments[1] != 1)").expect("int check");
    let fall_through = source.find("return true;").expect("default true");
    assert!(first < second && second < fall_through);
}

#[test]
fn verify_reconstructs_the_same_compiled_setup() {
    // The verify wrapper reuses the setup's interned key, so the
    // runtime returns the existing compiled setup, and validates with an
    // exact-count policy taking the count argument.
    let generation = run(FOO_FIXTURE);
    let source = unit(&generation, "IFooPretend.g.pretend");

    let key = "\"0:Foo|lit:\\\"1\\\"|lit:1\"";
    assert_eq!(count_occurrences(source, key), 2);
    assert!(source.contains(
        "static void Verify0(Pretender.Pretend<Tests.IFoo> pretend, System.Action<Tests.IFoo> setup, int count)"
    ));
    assert!(source.contains("compiled.Verify(Pretender.CallCount.Exactly(count));"));
}

#[test]
fn captured_local_generates_capture_and_replay() {
    // An argument referencing an enclosing-method local cannot be checked
    // statically; the matcher replays the original lambda against a
    // recording proxy inside a listener session and compares positionally.
    let generation = run(
        "namespace Tests
        {
            interface IFoo
            {
                string Foo(string bar, int baz);
            }

            class T
            {
                void Test()
                {
                    var expected = \"1\";
                    var pretend = Pretend.That<IFoo>();
                    pretend.Setup(p => p.Foo(expected, 1));
                }
            }
        }",
    );
    assert!(generation.diagnostics.is_empty());
    let source = unit(&generation, "IFooPretend.g.pretend");

    assert!(source.contains("class IFooPretendRecorder : Tests.IFoo"));
    assert!(source.contains(
        "var recorded = Pretender.Listener.Record(() => setup(new IFooPretendRecorder()));"
    ));
    assert!(source.contains(
        "if (!Pretender.Values.Equal(call.Arguments[0], recorded.Arguments[0]))"
    ));
    // The literal in position 1 still gets its static check.
    assert!(source.contains("if ((int)call.Arguments[1] != 1)"));
    // No static inequality check exists for the captured position.
    assert!(!source.contains("call.Arguments[0] != "));
    // The recorder notifies the listener instead of dispatching.
    assert!(source.contains("Pretender.Listener.Notify(new Pretender.CallInfo(0,"));
}

#[test]
fn field_reference_also_goes_through_replay() {
    let generation = run(
        "namespace Tests
        {
            interface IFoo
            {
                string Foo(string bar, int baz);
            }

            class T
            {
                string expected;

                void Test()
                {
                    var pretend = Pretend.That<IFoo>();
                    pretend.Setup(p => p.Foo(this.expected, 1));
                }
            }
        }",
    );
    assert!(generation.diagnostics.is_empty());
    let source = unit(&generation, "IFooPretend.g.pretend");
    assert!(source.contains("Pretender.Listener.Record"));
    assert!(source.contains("recorded.Arguments[0]"));
}

#[test]
fn any_matcher_is_instantiated_once_and_shared() {
    let generation = run(
        "namespace Tests
        {
            interface IFoo
            {
                string Foo(string bar, int baz);
            }

            class T
            {
                void Test()
                {
                    var pretend = Pretend.That<IFoo>();
                    pretend.Setup(p => p.Foo(\"1\", Arg.Any<int>()));
                }
            }
        }",
    );
    assert!(generation.diagnostics.is_empty());
    let source = unit(&generation, "IFooPretend.g.pretend");
    assert!(source.contains(
        "static readonly Pretender.AnyMatcher s_matcher0_1 = new Pretender.AnyMatcher();"
    ));
    assert!(source.contains("if (!s_matcher0_1.Matches(call.Arguments[1]))"));
    // A shared matcher needs no recording session.
    assert!(!source.contains("Listener.Record"));
}

#[test]
fn safe_predicate_matcher_is_synthesized_inline() {
    let generation = run(
        "namespace Tests
        {
            interface IFoo
            {
                void Take(int value);
            }

            class T
            {
                void Test()
                {
                    var pretend = Pretend.That<IFoo>();
                    pretend.Setup(p => p.Take(Arg.Matches<int>(v => v > 2)));
                }
            }
        }",
    );
    assert!(generation.diagnostics.is_empty());
    let source = unit(&generation, "IFooPretend.g.pretend");
    assert!(source.contains(
        "if (!new Pretender.PredicateMatcher(v => v > 2).Matches(call.Arguments[0]))"
    ));
}

#[test]
fn capturing_predicate_falls_back_to_replay() {
    let generation = run(
        "namespace Tests
        {
            interface IFoo
            {
                void Take(int value);
            }

            class T
            {
                void Test()
                {
                    var threshold = 2;
                    var pretend = Pretend.That<IFoo>();
                    pretend.Setup(p => p.Take(Arg.Matches<int>(v => v > threshold)));
                }
            }
        }",
    );
    assert!(generation.diagnostics.is_empty());
    let source = unit(&generation, "IFooPretend.g.pretend");
    assert!(source.contains("Pretender.Listener.Record"));
    assert!(source.contains("if (!recorded.MatcherAt(0).Matches(call.Arguments[0]))"));
}

#[test]
fn task_returning_members_default_to_completed_tasks() {
    let generation = run(
        "namespace Tests
        {
            interface IAsync
            {
                System.Task Run();
                System.Task<string> Get();
                System.ValueTask<int> Count();
            }

            class T
            {
                void Test()
                {
                    var pretend = Pretend.That<IAsync>();
                    var it = pretend.Create();
                }
            }
        }",
    );
    assert!(generation.diagnostics.is_empty());
    let source = unit(&generation, "IAsyncPretend.g.pretend");
    assert!(source.contains("return Pretender.CompletedTask.Instance;"));
    assert!(source.contains("return Pretender.CompletedTask.Of<string>();"));
    assert!(source.contains("return Pretender.CompletedValueTask.Of<int>();"));
}

#[test]
fn ref_and_out_parameters_are_copied_back() {
    let generation = run(
        "namespace Tests
        {
            interface IParse
            {
                bool TryParse(string text, out int value);
            }

            class T
            {
                void Test()
                {
                    var pretend = Pretend.That<IParse>();
                    var parser = pretend.Create();
                }
            }
        }",
    );
    assert!(generation.diagnostics.is_empty());
    let source = unit(&generation, "IParsePretend.g.pretend");
    assert!(source.contains("public bool TryParse(string text, out int value)"));
    // Inbound array carries null for the out slot; the value is copied back
    // from the same argument array after dispatch.
    assert!(source.contains("new object[] { text, null }"));
    assert!(source.contains("value = (int)call.Arguments[1];"));
}

#[test]
fn create_wrapper_constructs_the_proxy() {
    let generation = run(FOO_FIXTURE);
    let source = unit(&generation, "IFooPretend.g.pretend");
    assert!(source.contains("static Tests.IFoo Create(Pretender.Pretend<Tests.IFoo> pretend)"));
    assert!(source.contains("return new IFooPretend(pretend);"));
    assert!(source.contains("static Pretender.Pretend<Tests.IFoo> That()"));
    assert!(source.contains("return new Pretender.Pretend<Tests.IFoo>();"));
}

#[test]
fn wrappers_carry_exact_interception_locations() {
    let src = "namespace Tests\n{\n    interface IFoo\n    {\n        string Foo(string bar, int baz);\n    }\n\n    class T\n    {\n        void Test()\n        {\n            var pretend = Pretend.That<IFoo>();\n            pretend.Setup(p => p.Foo(\"1\", 1));\n        }\n    }\n}\n";
    let generation = run(src);
    let source = unit(&generation, "IFooPretend.g.pretend");

    // `That` starts at line 12, after `var pretend = Pretend.`; columns are
    // 1-based and point at the member-access name token.
    let that_col = src.lines().nth(11).unwrap().find("That").unwrap() as u32 + 1;
    assert!(source.contains(&format!(
        "[InterceptsLocation(\"tests/fixture.pretend\", 12, {that_col})]"
    )));
    let setup_col = src.lines().nth(12).unwrap().find("Setup").unwrap() as u32 + 1;
    assert!(source.contains(&format!(
        "[InterceptsLocation(\"tests/fixture.pretend\", 13, {setup_col})]"
    )));
}

#[test]
fn class_targets_override_virtual_members() {
    let generation = run(
        "namespace Tests
        {
            class Service
            {
                virtual string Fetch(string key);
            }

            class T
            {
                void Test()
                {
                    var pretend = Pretend.That<Service>();
                    pretend.Setup(p => p.Fetch(\"k\"));
                }
            }
        }",
    );
    assert!(generation.diagnostics.is_empty());
    let source = unit(&generation, "ServicePretend.g.pretend");
    assert!(source.contains("class ServicePretend : Tests.Service"));
    assert!(source.contains("public override string Fetch(string key)"));
}
