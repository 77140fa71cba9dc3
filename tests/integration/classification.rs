mod common;

use common::{count_occurrences, run, unit};
use pretender::diagnostics::{codes, Severity};

#[test]
fn sealed_target_produces_one_diagnostic_and_no_proxy() {
    let generation = run(
        "namespace Tests
        {
            sealed class Locked
            {
                virtual string Foo();
            }

            class LockedTests
            {
                void Test()
                {
                    var pretend = Pretend.That<Locked>();
                    var locked = pretend.Create();
                }
            }
        }",
    );
    // Zero emitted proxy code, exactly one diagnostic naming type and site.
    assert!(generation.units.is_empty());
    assert_eq!(generation.diagnostics.len(), 1);
    let diag = &generation.diagnostics[0];
    assert_eq!(diag.code, codes::SEALED_TARGET);
    assert_eq!(diag.severity, Severity::Error);
    assert!(diag.message.contains("Tests.Locked"));
    assert!(diag.span.is_some());
}

#[test]
fn repeated_construction_of_a_sealed_target_reports_once() {
    let generation = run(
        "namespace Tests
        {
            sealed class Locked { }

            class LockedTests
            {
                void Test()
                {
                    var a = Pretend.That<Locked>();
                    var b = Pretend.That<Locked>();
                }
            }
        }",
    );
    assert_eq!(generation.diagnostics.len(), 1);
}

#[test]
fn static_classes_cannot_be_pretended() {
    let generation = run(
        "namespace Tests
        {
            static class Helpers { }

            class T
            {
                void Test()
                {
                    var pretend = Pretend.That<Helpers>();
                }
            }
        }",
    );
    assert!(generation.units.is_empty());
    assert_eq!(generation.diagnostics[0].code, codes::SEALED_TARGET);
}

#[test]
fn field_member_is_an_unsupported_member_kind() {
    let generation = run(
        "namespace Tests
        {
            interface IBag
            {
                int counter;
                string Get();
            }

            class T
            {
                void Test()
                {
                    var pretend = Pretend.That<IBag>();
                    pretend.Setup(p => p.Get());
                }
            }
        }",
    );
    // The field surfaces as a diagnostic; the rest of the type still emits.
    let field_diags: Vec<_> = generation
        .diagnostics
        .iter()
        .filter(|d| d.code == codes::UNSUPPORTED_MEMBER)
        .collect();
    assert_eq!(field_diags.len(), 1);
    assert!(field_diags[0].message.contains("counter"));

    let source = unit(&generation, "IBagPretend.g.pretend");
    assert!(source.contains("public string Get()"));
    assert!(!source.contains("counter"));
}

#[test]
fn one_bad_call_site_does_not_block_the_rest() {
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
                    pretend.Setup(p => p.Foo(1 + 2, 1));
                    pretend.Setup(p => p.Foo(\"ok\", 2));
                }
            }
        }",
    );
    // The computed-expression argument is unsupported...
    assert!(generation.diagnostics.iter().any(|d| d.code == codes::UNSUPPORTED_ARGUMENT));
    // ...but the sibling call site still emitted its wrapper.
    let source = unit(&generation, "IFooPretend.g.pretend");
    assert!(source.contains("Setup0"));
    assert!(source.contains("lit:\\\"ok\\\""));
}

#[test]
fn setup_lambda_must_use_its_own_parameter() {
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
                    pretend.Setup(p => other.Foo(\"1\", 1));
                }
            }
        }",
    );
    assert!(generation
        .diagnostics
        .iter()
        .any(|d| d.code == codes::INVALID_SETUP_LAMBDA));
    let source = unit(&generation, "IFooPretend.g.pretend");
    assert!(!source.contains("Setup0"));
}

#[test]
fn setter_setup_binds_the_setter_slot() {
    let generation = run(
        "namespace Tests
        {
            interface INamed
            {
                string Name { get; set; }
            }

            class T
            {
                void Test()
                {
                    var pretend = Pretend.That<INamed>();
                    pretend.SetupSet(p => p.Name = \"x\");
                }
            }
        }",
    );
    assert!(generation.diagnostics.is_empty());
    let source = unit(&generation, "INamedPretend.g.pretend");
    // Ordinal 0 is the getter, 1 the setter; the setup keys the setter.
    assert!(source.contains("GetOrCreateSetup(1, \"1:set_Name|"));
}

#[test]
fn matching_statement_count_equals_parameter_count() {
    let generation = run(
        "namespace Tests
        {
            interface IWide
            {
                void Take(int a, string b, bool c, double d);
            }

            class T
            {
                void Test()
                {
                    var pretend = Pretend.That<IWide>();
                    pretend.Setup(p => p.Take(1, \"x\", true, 2.5));
                }
            }
        }",
    );
    let source = unit(&generation, "IWidePretend.g.pretend");
    // One inequality check per formal parameter, in declared order.
    assert_eq!(count_occurrences(source, "return false;"), 4);
    let a = source.find("(int)call.Arguments[0] != 1").unwrap();
    let b = source.find("(string)call.Arguments[1] != \"x\"").unwrap();
    let c = source.find("(bool)call.Arguments[2] != true").unwrap();
    let d = source.find("(double)call.Arguments[3] != 2.5").unwrap();
    assert!(a < b && b < c && c < d);
}
