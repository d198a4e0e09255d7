//! Tests for recursive landscape image discovery

#[cfg(test)]
mod tests {
    use moranscape::MoranError;
    use moranscape::io::discovery::collect_images;
    use moranscape::io::naming::NamePattern;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    // Tests recursive walking, marker filtering and lexicographic order
    // Verified by reading only the top-level directory
    #[test]
    fn test_recursive_filtered_sorted() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(&root.join("run2/foodlandscape5sim1.png"));
        touch(&root.join("foodlandscape1sim2.png"));
        touch(&root.join("run1/deep/foodlandscape3sim1.png"));
        touch(&root.join("run1/population.csv"));
        touch(&root.join("notes.txt"));

        let files = collect_images(root, &NamePattern::default(), None).unwrap();

        assert_eq!(
            files,
            vec![
                root.join("foodlandscape1sim2.png"),
                root.join("run1/deep/foodlandscape3sim1.png"),
                root.join("run2/foodlandscape5sim1.png"),
            ]
        );
    }

    // Tests that the limit keeps the first paths after sorting
    // Verified by truncating before sorting
    #[test]
    fn test_limit_applies_after_sorting() {
        let dir = TempDir::new().unwrap();
        for name in ["foodlandscape9sim1.png", "foodlandscape1sim1.png", "foodlandscape5sim1.png"] {
            touch(&dir.path().join(name));
        }

        let files = collect_images(dir.path(), &NamePattern::default(), Some(2)).unwrap();

        assert_eq!(
            files,
            vec![
                dir.path().join("foodlandscape1sim1.png"),
                dir.path().join("foodlandscape5sim1.png"),
            ]
        );
    }

    // Tests that a file target is taken as-is
    // Verified by applying the marker filter to file targets
    #[test]
    fn test_file_target_accepted() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("single.png");
        touch(&file);

        let files = collect_images(&file, &NamePattern::default(), None).unwrap();
        assert_eq!(files, vec![file]);
    }

    // Tests missing targets and a zero limit
    // Verified by returning an empty list for missing targets
    #[test]
    fn test_invalid_targets_and_limits() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent");

        assert!(matches!(
            collect_images(&missing, &NamePattern::default(), None),
            Err(MoranError::FileSystem { .. })
        ));
        assert!(matches!(
            collect_images(dir.path(), &NamePattern::default(), Some(0)),
            Err(MoranError::InvalidParameter { .. })
        ));
    }

    // Tests that an empty directory yields no files
    // Verified by treating empty directories as errors
    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        let files = collect_images(dir.path(), &NamePattern::default(), Some(10)).unwrap();
        assert!(files.is_empty());
    }
}
