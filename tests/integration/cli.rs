//! End-to-end tests of the `pretenderc` binary.

use std::process::Command;

const FIXTURE: &str = "namespace Tests
{
    interface IFoo
    {
        string Foo(string bar, int baz);
    }

    class FooTests
    {
        void Test()
        {
            var pretend = Pretend.That<IFoo>();
            pretend.Setup(p => p.Foo(\"1\", 1));
            var foo = pretend.Create();
        }
    }
}
";

fn pretenderc() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pretenderc"))
}

#[test]
fn generate_writes_one_unit_per_proxy() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("foo_tests.pretend");
    std::fs::write(&input, FIXTURE).unwrap();
    let out = dir.path().join("generated");

    let status = pretenderc()
        .arg("generate")
        .arg(&input)
        .arg("--output")
        .arg(&out)
        .status()
        .unwrap();
    assert!(status.success());

    let unit = out.join("IFooPretend.g.pretend");
    let source = std::fs::read_to_string(&unit).unwrap();
    assert!(source.contains("class IFooPretend : Tests.IFoo"));

    // Idempotence across process runs: regenerating produces identical bytes.
    let status = pretenderc()
        .arg("generate")
        .arg(&input)
        .arg("--output")
        .arg(&out)
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(std::fs::read_to_string(&unit).unwrap(), source);
}

#[test]
fn check_reports_sealed_targets_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("locked_tests.pretend");
    std::fs::write(
        &input,
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
    )
    .unwrap();

    let output = pretenderc().arg("check").arg(&input).arg("--json").output().unwrap();
    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("PRET0001"));
    assert!(stdout.contains("\"severity\": \"error\""));
}

#[test]
fn manifest_language_gate_applies_from_the_cli() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("foo_tests.pretend");
    std::fs::write(&input, FIXTURE).unwrap();
    let manifest = dir.path().join("pretend.toml");
    std::fs::write(&manifest, "[generator]\nlanguage_version = 11\n").unwrap();
    let out = dir.path().join("generated");

    let status = pretenderc()
        .arg("generate")
        .arg(&input)
        .arg("--output")
        .arg(&out)
        .arg("--manifest")
        .arg(&manifest)
        .status()
        .unwrap();
    assert!(!status.success());
    assert!(!out.join("IFooPretend.g.pretend").exists());
}

#[test]
fn syntax_errors_fail_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.pretend");
    std::fs::write(&input, "class C { void M() { var x = 1 } }").unwrap();

    let status = pretenderc().arg("check").arg(&input).status().unwrap();
    assert!(!status.success());
}
