use pipesync_fs::{NormalizedPath, discover_files};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn touch(root: &std::path::Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "x").unwrap();
}

#[test]
fn test_discover_files_recurses_and_sorts() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "textures/hero.png");
    touch(temp.path(), "fonts/a.fnt");
    touch(temp.path(), "Content.mgcb");
    touch(temp.path(), "sounds/sfx/jump.wav");

    let root = NormalizedPath::new(temp.path());
    let relative: Vec<String> = discover_files(&root)
        .unwrap()
        .iter()
        .map(|p| p.relative_to(&root).unwrap().as_str().to_string())
        .collect();

    assert_eq!(
        relative,
        vec![
            "Content.mgcb",
            "fonts/a.fnt",
            "sounds/sfx/jump.wav",
            "textures/hero.png",
        ]
    );
}

#[test]
fn test_discover_files_skips_empty_directories() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("empty/deeper")).unwrap();

    let files = discover_files(&NormalizedPath::new(temp.path())).unwrap();
    assert!(files.is_empty());
}

#[test]
fn test_discover_files_missing_root_errors() {
    let result = discover_files(&NormalizedPath::new("/nonexistent/content/root"));
    assert!(result.is_err());
}

#[cfg(unix)]
#[test]
fn test_discover_files_keeps_file_symlinks_but_not_dir_symlinks() {
    let temp = TempDir::new().unwrap();
    let outside = TempDir::new().unwrap();
    touch(outside.path(), "shared/logo.png");
    touch(outside.path(), "single.wav");
    touch(temp.path(), "hero.png");
    std::os::unix::fs::symlink(outside.path().join("shared"), temp.path().join("linked")).unwrap();
    std::os::unix::fs::symlink(outside.path().join("single.wav"), temp.path().join("jump.wav"))
        .unwrap();

    let root = NormalizedPath::new(temp.path());
    let relative: Vec<String> = discover_files(&root)
        .unwrap()
        .iter()
        .map(|p| p.relative_to(&root).unwrap().as_str().to_string())
        .collect();

    assert_eq!(relative, vec!["hero.png", "jump.wav"]);
}
