//! Checks that `tests/unit` mirrors `src` and that its harness compiles every file

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const SOURCE_ROOT: &str = "src";
    const UNIT_ROOT: &str = "tests/unit";

    // Files that organize modules rather than hold code under test
    fn is_harness_file(path: &Path) -> bool {
        matches!(
            path.file_name().and_then(|name| name.to_str()),
            Some("main.rs" | "lib.rs" | "mod.rs")
        )
    }

    fn is_rust_file(path: &Path) -> bool {
        path.extension().is_some_and(|extension| extension == "rs")
    }

    /// Every `.rs` file under `root`, relative to it
    fn rust_files(root: &Path) -> io::Result<BTreeSet<PathBuf>> {
        let mut files = BTreeSet::new();
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            for entry in fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.is_dir() {
                    pending.push(path);
                } else if is_rust_file(&path)
                    && let Ok(relative) = path.strip_prefix(root)
                {
                    files.insert(relative.to_path_buf());
                }
            }
        }

        Ok(files)
    }

    fn code_files(root: &Path) -> io::Result<BTreeSet<PathBuf>> {
        let mut files = rust_files(root)?;
        files.retain(|path| !is_harness_file(path));
        Ok(files)
    }

    fn declares(source: &str, module: &str) -> bool {
        let declaration = format!("mod {module};");
        source.lines().any(|line| {
            let line = line.trim();
            line == declaration || line.strip_prefix("pub ") == Some(declaration.as_str())
        })
    }

    /// Files and directories under `root` that no `mod` item reaches
    ///
    /// The root directory declares its children in `main.rs`, every
    /// subdirectory in its own `mod.rs`
    fn undeclared_modules(root: &Path) -> io::Result<Vec<PathBuf>> {
        let mut undeclared = Vec::new();
        let mut pending = vec![(root.to_path_buf(), root.join("main.rs"))];

        while let Some((dir, declarer)) = pending.pop() {
            let source = fs::read_to_string(&declarer).unwrap_or_default();

            for entry in fs::read_dir(&dir)? {
                let path = entry?.path();
                let module = if path.is_dir() {
                    pending.push((path.clone(), path.join("mod.rs")));
                    path.file_name()
                } else if is_rust_file(&path) && !is_harness_file(&path) {
                    path.file_stem()
                } else {
                    None
                };

                if let Some(module) = module.and_then(|name| name.to_str())
                    && !declares(&source, module)
                {
                    undeclared.push(path);
                }
            }
        }

        undeclared.sort();
        Ok(undeclared)
    }

    fn listing(paths: impl IntoIterator<Item = PathBuf>) -> String {
        paths
            .into_iter()
            .map(|path| format!("  - {}", path.display()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    // Tests that each source module has a unit test file at the mirrored path
    // Verified by deleting tests/unit/spatial/grid.rs
    #[test]
    fn test_every_source_file_has_unit_tests() -> io::Result<()> {
        let sources = code_files(Path::new(SOURCE_ROOT))?;
        let tests = code_files(Path::new(UNIT_ROOT))?;

        let missing: Vec<PathBuf> = sources.difference(&tests).cloned().collect();
        assert!(
            missing.is_empty(),
            "source files without tests under {UNIT_ROOT}:\n{}",
            listing(missing)
        );
        Ok(())
    }

    // Tests that no unit test file outlives the module it covers
    // Verified by adding tests/unit/math/stale.rs
    #[test]
    fn test_every_unit_test_has_a_source_file() -> io::Result<()> {
        let sources = code_files(Path::new(SOURCE_ROOT))?;
        let tests = code_files(Path::new(UNIT_ROOT))?;

        let orphaned: Vec<PathBuf> = tests.difference(&sources).cloned().collect();
        assert!(
            orphaned.is_empty(),
            "unit test files without a module under {SOURCE_ROOT}:\n{}",
            listing(orphaned)
        );
        Ok(())
    }

    // Tests that every test file outside the harness roots defines a test
    // Verified by removing the attributes from tests/unit/io/error.rs
    #[test]
    fn test_every_test_file_contains_tests() -> io::Result<()> {
        let root = Path::new("tests");
        let mut empty = Vec::new();

        for relative in code_files(root)? {
            let path = root.join(&relative);
            if !fs::read_to_string(&path)?.contains("#[test]") {
                empty.push(path);
            }
        }

        assert!(
            empty.is_empty(),
            "test files without #[test] functions:\n{}",
            listing(empty)
        );
        Ok(())
    }

    // Tests that the unit harness declares every file it mirrors
    // Verified by dropping `mod naming;` from tests/unit/io/mod.rs
    #[test]
    fn test_unit_harness_declares_every_module() -> io::Result<()> {
        let undeclared = undeclared_modules(Path::new(UNIT_ROOT))?;
        assert!(
            undeclared.is_empty(),
            "unit test modules that the harness never compiles:\n{}",
            listing(undeclared)
        );
        Ok(())
    }

    // Tests that a file or directory missing from its parent declarer is reported
    // Verified by matching module names as substrings of the declarer
    #[test]
    fn test_undeclared_modules_are_reported() -> io::Result<()> {
        let dir = TempDir::new()?;
        let root = dir.path();
        fs::create_dir_all(root.join("analysis"))?;
        fs::create_dir_all(root.join("orphan"))?;
        fs::write(root.join("main.rs"), "mod analysis;\n")?;
        fs::write(root.join("analysis/mod.rs"), "mod weights;\n")?;
        fs::write(root.join("analysis/weights.rs"), "#[test]\nfn t() {}\n")?;
        fs::write(root.join("analysis/weights_extra.rs"), "#[test]\nfn t() {}\n")?;
        fs::write(root.join("orphan/mod.rs"), "mod grid;\n")?;
        fs::write(root.join("orphan/grid.rs"), "#[test]\nfn t() {}\n")?;

        assert_eq!(
            undeclared_modules(root)?,
            vec![root.join("analysis/weights_extra.rs"), root.join("orphan")]
        );

        fs::write(root.join("main.rs"), "mod analysis;\nmod orphan;\n")?;
        fs::write(
            root.join("analysis/mod.rs"),
            "mod weights;\nmod weights_extra;\n",
        )?;
        assert!(undeclared_modules(root)?.is_empty());
        Ok(())
    }
}
