//! Snapshot tests for diagnostic messages.
//!
//! Uses insta to capture the structured records and detect regressions in
//! codes or wording. Run `cargo insta review` to review changes.

mod common;

use insta::assert_snapshot;
use pretender::Generation;

/// Flatten diagnostics to a stable, renderer-independent form.
fn render(generation: &Generation) -> String {
    generation
        .diagnostics
        .iter()
        .map(|d| format!("{} {}", d.code, d.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn sealed_target_message() {
    let generation = common::run(
        "namespace Tests
        {
            sealed class Locked { }

            class T
            {
                void Test()
                {
                    var pretend = Pretend.That<Locked>();
                }
            }
        }",
    );
    assert_snapshot!("sealed_target", render(&generation));
}

#[test]
fn field_member_message() {
    let generation = common::run(
        "namespace Tests
        {
            interface IBag
            {
                int counter;
            }

            class T
            {
                void Test()
                {
                    var pretend = Pretend.That<IBag>();
                }
            }
        }",
    );
    assert_snapshot!("field_member", render(&generation));
}

#[test]
fn language_version_message() {
    let manifest = pretender::manifest::Manifest {
        language_version: 11,
        ..pretender::manifest::Manifest::default()
    };
    let generation = pretender::generate_with_manifest(
        &[pretender::SourceFile::new("tests/fixture.pretend", "class C { }")],
        &manifest,
    )
    .unwrap();
    assert_snapshot!("language_version", render(&generation));
}

#[test]
fn helper_call_message() {
    let generation = common::run(
        "namespace Tests
        {
            class Helpers
            {
                static bool IsBig(int value);
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
                    pretend.Setup(p => p.Take(Arg.Matches<int>(v => Helpers.IsBig(v))));
                }
            }
        }",
    );
    assert_snapshot!("helper_call", render(&generation));
}

#[test]
fn invalid_setup_lambda_message() {
    let generation = common::run(
        "namespace Tests
        {
            interface IFoo
            {
                void Bar();
            }

            class T
            {
                void Test()
                {
                    var pretend = Pretend.That<IFoo>();
                    pretend.Setup(p => 42);
                }
            }
        }",
    );
    assert_snapshot!("invalid_setup_lambda", render(&generation));
}
