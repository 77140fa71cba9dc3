mod common;

use pretender::lexer::lex;
use pretender::parser::Parser;
use pretender::parser::ast::Program;
use pretender::scan::{scan, CandidateKind};

fn parse(src: &str) -> Program {
    let tokens = lex(src, 0).unwrap();
    Parser::new(&tokens, src, 0).parse_program().unwrap()
}

#[test]
fn scanner_never_misses_a_real_call_site() {
    // False negatives are forbidden: every fluent call shape in this file
    // must surface as a candidate, including ones nested in chains.
    let program = parse(
        "namespace Tests {
            class C {
                void M() {
                    var pretend = Pretend.That<IFoo>();
                    pretend.Setup(p => p.Foo(\"1\", 1)).Returns(\"Hi\");
                    pretend.SetupSet(p => p.Name = \"x\");
                    pretend.Verify(p => p.Foo(\"1\", 1), 2);
                    pretend.VerifySet(p => p.Name = \"x\", 1);
                    var foo = pretend.Create();
                }
            }
        }",
    );
    let kinds: Vec<CandidateKind> = scan(&program).iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            CandidateKind::Construction,
            CandidateKind::Setup,
            CandidateKind::Setup,
            CandidateKind::Verify,
            CandidateKind::Verify,
            CandidateKind::Create,
        ]
    );
}

#[test]
fn scanner_accepts_false_positives_for_the_classifier() {
    // An unrelated builder with the same member names and cardinalities is a
    // legitimate syntactic candidate; the semantic stage drops it.
    let program = parse(
        "class C {
            void M() {
                var x = builder.Setup(cb => cb);
                other.Verify(cb => cb, 3);
            }
        }",
    );
    assert_eq!(scan(&program).len(), 2);

    let generation = common::run(
        "namespace Tests {
            class C {
                void M() {
                    var x = builder.Setup(cb => cb);
                }
            }
        }",
    );
    assert!(generation.units.is_empty());
    assert!(generation.diagnostics.is_empty());
}

#[test]
fn fully_qualified_construction_is_scanned() {
    let program = parse(
        "class C { void M() { var p = Pretender.Pretend.That<Tests.IFoo>(); } }",
    );
    let candidates = scan(&program);
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].kind, CandidateKind::Construction);
}

#[test]
fn shape_mismatches_are_not_candidates() {
    let program = parse(
        "class C {
            void M() {
                Pretend.That<A, B>();
                pretend.Setup();
                pretend.Verify(p => p.Foo(), 1, 2);
                pretend.Create(cfg);
            }
        }",
    );
    assert!(scan(&program).is_empty());
}
