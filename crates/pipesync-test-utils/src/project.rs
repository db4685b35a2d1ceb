//! [`TestProject`] builder for content directory scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Name of the descriptor every [`TestProject`] writes.
pub const DESCRIPTOR_NAME: &str = "Content.mgcb";

/// A temporary content directory with helpers for setup and assertion.
///
/// # Example
///
/// ```rust,no_run
/// use pipesync_test_utils::project::TestProject;
///
/// let project = TestProject::new();
/// project.write_descriptor(pipesync_test_utils::MINIMAL_DESCRIPTOR);
/// project.touch("textures/hero.png");
/// project.assert_descriptor_contains("#begin textures/hero.png");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of the descriptor file.
    pub fn descriptor_path(&self) -> PathBuf {
        self.root().join(DESCRIPTOR_NAME)
    }

    /// Write `content` to `path` (relative to root), creating parent
    /// directories.
    pub fn write(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
        full_path
    }

    /// Create an empty content file.
    pub fn touch(&self, path: &str) -> PathBuf {
        self.write(path, "")
    }

    pub fn write_descriptor(&self, content: &str) -> PathBuf {
        self.write(DESCRIPTOR_NAME, content)
    }

    /// Write `pipesync.json` next to the descriptor.
    pub fn write_config(&self, json: &str) -> PathBuf {
        self.write("pipesync.json", json)
    }

    /// Write a `.csproj` declaring `packages` as `(name, version)` pairs.
    pub fn write_csproj(&self, path: &str, packages: &[(&str, &str)]) -> PathBuf {
        let mut content = String::from(
            "<Project Sdk=\"Microsoft.NET.Sdk\">\n  <ItemGroup>\n",
        );
        for (name, version) in packages {
            content.push_str(&format!(
                "    <PackageReference Include=\"{name}\" Version=\"{version}\" />\n"
            ));
        }
        content.push_str("  </ItemGroup>\n</Project>\n");
        self.write(path, &content)
    }

    /// Current descriptor text.
    pub fn read_descriptor(&self) -> String {
        self.read(DESCRIPTOR_NAME)
    }

    pub fn read(&self, path: &str) -> String {
        let full_path = self.root().join(path);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()))
    }

    /// Assert that the descriptor contains `content`.
    ///
    /// # Panics
    /// Panics if the descriptor cannot be read or does not contain `content`.
    pub fn assert_descriptor_contains(&self, content: &str) {
        let descriptor = self.read_descriptor();
        assert!(
            descriptor.contains(content),
            "Descriptor does not contain expected content.\nExpected: {}\nActual: {}",
            content,
            descriptor
        );
    }

    /// Assert that the descriptor does **not** contain `content`.
    ///
    /// # Panics
    /// Panics if the descriptor cannot be read or contains `content`.
    pub fn assert_descriptor_lacks(&self, content: &str) {
        let descriptor = self.read_descriptor();
        assert!(
            !descriptor.contains(content),
            "Descriptor unexpectedly contains {}.\nActual: {}",
            content,
            descriptor
        );
    }

    /// Number of lines in the descriptor exactly equal to `line`.
    pub fn count_lines(&self, line: &str) -> usize {
        self.read_descriptor().lines().filter(|l| *l == line).count()
    }
}
