mod common;

use common::{run, unit};
use pretender::diagnostics::codes;

#[test]
fn every_literal_kind_round_trips_into_its_check() {
    let generation = run(
        "namespace Tests
        {
            interface IKinds
            {
                void Take(int i, long l, float f, double d, decimal m, string s, char c, bool b);
            }

            class T
            {
                void Test()
                {
                    var pretend = Pretend.That<IKinds>();
                    pretend.Setup(p => p.Take(-42, 7L, 1.5f, 2.25, 10.75m, \"x\", 'y', false));
                }
            }
        }",
    );
    assert!(generation.diagnostics.is_empty());
    let source = unit(&generation, "IKindsPretend.g.pretend");
    assert!(source.contains("(int)call.Arguments[0] != -42"));
    assert!(source.contains("(long)call.Arguments[1] != 7L"));
    assert!(source.contains("(float)call.Arguments[2] != 1.5f"));
    assert!(source.contains("(double)call.Arguments[3] != 2.25"));
    assert!(source.contains("(decimal)call.Arguments[4] != 10.75m"));
    assert!(source.contains("(string)call.Arguments[5] != \"x\""));
    assert!(source.contains("(char)call.Arguments[6] != 'y'"));
    assert!(source.contains("(bool)call.Arguments[7] != false"));
}

#[test]
fn null_literal_compares_without_a_cast() {
    let generation = run(
        "namespace Tests
        {
            interface IFoo
            {
                void Send(string payload);
            }

            class T
            {
                void Test()
                {
                    var pretend = Pretend.That<IFoo>();
                    pretend.Setup(p => p.Send(null));
                }
            }
        }",
    );
    assert!(generation.diagnostics.is_empty());
    let source = unit(&generation, "IFooPretend.g.pretend");
    assert!(source.contains("if (call.Arguments[0] != null)"));
}

#[test]
fn locals_declared_inside_the_matcher_lambda_are_not_captures() {
    // The block-bodied predicate declares `t` internally; referencing it is
    // not a capture, so the matcher still synthesizes inline.
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
                    pretend.Setup(p => p.Take(Arg.Matches<int>(v => { var t = v * 2; return t > 4; })));
                }
            }
        }",
    );
    assert!(generation.diagnostics.is_empty());
    let source = unit(&generation, "IFooPretend.g.pretend");
    assert!(source.contains("new Pretender.PredicateMatcher(v => { var t = v * 2; return t > 4; })"));
    assert!(!source.contains("Listener.Record"));
}

#[test]
fn predicate_calling_a_user_helper_is_unsupported() {
    let generation = run(
        "namespace Tests
        {
            interface IFoo
            {
                void Take(int value);
            }

            class Helpers
            {
                static bool IsBig(int value);
            }

            class T
            {
                void Test()
                {
                    var pretend = Pretend.That<IFoo>();
                    pretend.Setup(p => p.Take(Arg.Matches<int>(v => Helpers.IsBig(v))));
                }
            }
        }",
    );
    let diag = generation
        .diagnostics
        .iter()
        .find(|d| d.code == codes::UNSUPPORTED_ARGUMENT)
        .expect("helper-call diagnostic");
    assert!(diag.message.contains("helper"));
    // The offending site emitted nothing.
    let source = unit(&generation, "IFooPretend.g.pretend");
    assert!(!source.contains("Setup0"));
}

#[test]
fn multi_type_parameter_matcher_factories_are_unsupported() {
    let generation = run(
        "namespace Tests
        {
            class PairMatcher { }

            static class Args
            {
                [Matcher(PairMatcher)]
                static A Pair<A, B>(B other);
            }

            interface IFoo
            {
                void Take(int value);
            }

            class T
            {
                void Test()
                {
                    var pretend = Pretend.That<IFoo>();
                    pretend.Setup(p => p.Take(Args.Pair<int, string>(\"x\")));
                }
            }
        }",
    );
    assert!(generation
        .diagnostics
        .iter()
        .any(|d| d.code == codes::UNSUPPORTED_ARGUMENT
            && d.message.contains("multiple type parameters")));
}

#[test]
fn user_defined_matcher_factories_are_honored() {
    let generation = run(
        "namespace Tests
        {
            class EvenMatcher { }

            static class Args
            {
                [Matcher(EvenMatcher)]
                static int Even();
            }

            interface IFoo
            {
                void Take(int value);
            }

            class T
            {
                void Test()
                {
                    var pretend = Pretend.That<IFoo>();
                    pretend.Setup(p => p.Take(Args.Even()));
                }
            }
        }",
    );
    assert!(generation.diagnostics.is_empty());
    let source = unit(&generation, "IFooPretend.g.pretend");
    assert!(source.contains(
        "static readonly Tests.EvenMatcher s_matcher0_0 = new Tests.EvenMatcher();"
    ));
}

#[test]
fn enclosing_method_parameter_is_a_capture() {
    let generation = run(
        "namespace Tests
        {
            interface IFoo
            {
                void Send(string payload);
            }

            class T
            {
                void Test(string payload)
                {
                    var pretend = Pretend.That<IFoo>();
                    pretend.Setup(p => p.Send(payload));
                }
            }
        }",
    );
    assert!(generation.diagnostics.is_empty());
    let source = unit(&generation, "IFooPretend.g.pretend");
    assert!(source.contains("Pretender.Values.Equal(call.Arguments[0], recorded.Arguments[0])"));
}

#[test]
fn literal_matcher_arguments_synthesize_inline() {
    // A matcher whose constructor arguments are all literals is compile-time
    // safe even without a lambda.
    let generation = run(
        "namespace Tests
        {
            class RangeMatcher { }

            static class Args
            {
                [Matcher(RangeMatcher)]
                static int Between(int low, int high);
            }

            interface IFoo
            {
                void Take(int value);
            }

            class T
            {
                void Test()
                {
                    var pretend = Pretend.That<IFoo>();
                    pretend.Setup(p => p.Take(Args.Between(1, 10)));
                }
            }
        }",
    );
    assert!(generation.diagnostics.is_empty());
    let source = unit(&generation, "IFooPretend.g.pretend");
    assert!(source.contains("if (!new Tests.RangeMatcher(1, 10).Matches(call.Arguments[0]))"));
}
