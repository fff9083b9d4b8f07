//! Seed files written into folders the fixer creates.

use crate::multi::GeneratedFile;
use structlint_rules::FolderSeed;

pub trait PostCreateHook: Send + Sync {
    fn name(&self) -> &str;

    /// Files to place inside the newly created `folder`.
    fn seed_files(&self, folder: &str, project_type: &str) -> Vec<GeneratedFile>;
}

/// Keeps an otherwise empty folder under version control.
pub struct GitKeepHook;

impl PostCreateHook for GitKeepHook {
    fn name(&self) -> &str {
        "gitkeep"
    }

    fn seed_files(&self, folder: &str, _project_type: &str) -> Vec<GeneratedFile> {
        vec![GeneratedFile::new(folder, ".gitkeep", "")]
    }
}

/// A passing example test in the project's language.
pub struct ExampleTestHook;

impl PostCreateHook for ExampleTestHook {
    fn name(&self) -> &str {
        "example-test"
    }

    fn seed_files(&self, folder: &str, project_type: &str) -> Vec<GeneratedFile> {
        let (name, content) = match project_type {
            "go" => (
                "example_test.go",
                "package tests\n\nimport \"testing\"\n\nfunc TestExample(t *testing.T) {\n\tif 1+1 != 2 {\n\t\tt.Fatal(\"math is broken\")\n\t}\n}\n",
            ),
            "rust" => (
                "example.rs",
                "#[test]\nfn example() {\n    assert_eq!(1 + 1, 2);\n}\n",
            ),
            "nodejs" => (
                "example.test.js",
                "const assert = require(\"node:assert\");\nconst test = require(\"node:test\");\n\ntest(\"example\", () => {\n  assert.strictEqual(1 + 1, 2);\n});\n",
            ),
            "python" => (
                "test_example.py",
                "def test_example():\n    assert 1 + 1 == 2\n",
            ),
            "java" => (
                "ExampleTest.java",
                "import static org.junit.jupiter.api.Assertions.assertEquals;\n\nimport org.junit.jupiter.api.Test;\n\nclass ExampleTest {\n    @Test\n    void example() {\n        assertEquals(2, 1 + 1);\n    }\n}\n",
            ),
            _ => return GitKeepHook.seed_files(folder, project_type),
        };
        vec![GeneratedFile::new(folder, name, content)]
    }
}

pub fn hook_for(seed: FolderSeed) -> Box<dyn PostCreateHook> {
    match seed {
        FolderSeed::GitKeep => Box::new(GitKeepHook),
        FolderSeed::ExampleTest => Box::new(ExampleTestHook),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gitkeep() {
        let files = hook_for(FolderSeed::GitKeep).seed_files("docs/", "rust");
        assert_eq!(files, vec![GeneratedFile::new("docs", ".gitkeep", "")]);
    }

    #[test]
    fn test_example_test_per_language() {
        let hook = hook_for(FolderSeed::ExampleTest);
        assert_eq!(hook.seed_files("tests/", "rust")[0].path, "tests/example.rs");
        assert_eq!(hook.seed_files("tests/", "python")[0].path, "tests/test_example.py");
        assert_eq!(hook.seed_files("tests/", "generic")[0].path, "tests/.gitkeep");
    }
}
