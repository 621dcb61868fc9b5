//! Shared test utilities for integration and E2E tests.
//!
//! Add `mod common;` to a test file, then use the prelude:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let fixture = TestFixture::new().with_manifest(manifests::MINIMAL);
//! fixture.command().arg("build").assert().success();
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::manifests;
    pub use super::TestFixture;
}

/// Manifest snippets for testing.
#[allow(dead_code)]
pub mod manifests {
    /// Smallest buildable manifest.
    pub const MINIMAL: &str = "name: Demo\npack_format: 48\n";

    /// A load function and one tag contribution.
    pub const LOAD_AND_TAG: &str = r#"
name: Demo
description: Load and tag
pack_format: 48
load: true
tags:
  - name: logs
    type: block
    values: minecraft:oak_log
"#;

    /// Recipes, a removal, and elixirum tags.
    pub const FULL: &str = r#"
name: Full Pack
description: Everything at once
version: "1.21.4"
load: true
tick: "say tick"
functions:
  - name: helpers/reset
recipes:
  - shapeless:
      output: {id: minecraft:stick, count: 4}
      ingredients: [minecraft:bamboo, minecraft:bamboo]
  - smelting:
      output: minecraft:glass
      input: minecraft:sand
      experience: 0.1
      cookingtime: 200
      category: blocks
  - remove: minecraft:bread
elixirum:
  essences:
    - effect: minecraft:speed
      max_amplifier: 2
      max_duration: 600
      category: enhancing
  heat_sources: [minecraft:magma_block]
  blacklist: [minecraft:apple, minecraft:carrot]
  whitelist: [minecraft:carrot, minecraft:potion]
"#;

    /// Shapeless recipe over the slot limit.
    pub const TOO_MANY_INGREDIENTS: &str = r#"
name: Broken
pack_format: 48
recipes:
  - shapeless:
      output: minecraft:stick
      ingredients: [a, a, a, a, a, a, a, a, a, a]
"#;

    /// Version with no rule in the built-in table.
    pub const UNKNOWN_VERSION: &str = "name: Demo\nversion: \"1.99\"\n";
}

/// A temporary directory with an optional `datapack.yaml`.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a `datapack.yaml` manifest with the given content.
    pub fn with_manifest(self, content: &str) -> Self {
        self.temp_dir
            .child("datapack.yaml")
            .write_str(content)
            .expect("Failed to write manifest");
        self
    }

    /// Add a file with the given path and content.
    #[allow(dead_code)]
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of `relative` inside the fixture.
    #[allow(dead_code)]
    pub fn join(&self, relative: &str) -> PathBuf {
        self.temp_dir.path().join(relative)
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a `packsmith` command running in this fixture's directory.
    #[allow(dead_code)]
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("packsmith");
        cmd.current_dir(self.path())
            .env_remove("PACKSMITH_MANIFEST")
            .env_remove("PACKSMITH_OUTPUT")
            .env_remove("RUST_LOG")
            .arg("--color")
            .arg("never");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_with_manifest() {
        let fixture = TestFixture::new().with_manifest(manifests::MINIMAL);
        assert!(fixture.path().join("datapack.yaml").exists());
    }

    #[test]
    fn test_manifests_are_valid_yaml() {
        for manifest in [
            manifests::MINIMAL,
            manifests::LOAD_AND_TAG,
            manifests::FULL,
            manifests::TOO_MANY_INGREDIENTS,
            manifests::UNKNOWN_VERSION,
        ] {
            serde_yaml::from_str::<serde_yaml::Value>(manifest).expect("Manifest should be valid YAML");
        }
    }
}
