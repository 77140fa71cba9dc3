#![allow(dead_code)]

use pretender::{generate, Generation, SourceFile};

pub const FIXTURE_PATH: &str = "tests/fixture.pretend";

/// Run the full pipeline over one in-memory source file.
pub fn run(src: &str) -> Generation {
    generate(&[SourceFile::new(FIXTURE_PATH, src)]).expect("generation should succeed")
}

/// Run the pipeline over several files.
pub fn run_files(files: &[(&str, &str)]) -> Generation {
    let sources: Vec<SourceFile> =
        files.iter().map(|(path, text)| SourceFile::new(*path, *text)).collect();
    generate(&sources).expect("generation should succeed")
}

/// Fetch one generated unit's source by hint name.
pub fn unit<'g>(generation: &'g Generation, hint_name: &str) -> &'g str {
    generation
        .units
        .iter()
        .find(|u| u.hint_name == hint_name)
        .unwrap_or_else(|| {
            let names: Vec<&str> =
                generation.units.iter().map(|u| u.hint_name.as_str()).collect();
            panic!("no unit named '{hint_name}'; have {names:?}")
        })
        .source
        .as_str()
}

pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    haystack.match_indices(needle).count()
}

/// The canonical two-parameter fixture used across scenario tests.
pub const FOO_FIXTURE: &str = "namespace Tests
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
            pretend.Setup(p => p.Foo(\"1\", 1)).Returns(\"Hi\");
            var foo = pretend.Create();
            pretend.Verify(p => p.Foo(\"1\", 1), 2);
        }
    }
}
";
