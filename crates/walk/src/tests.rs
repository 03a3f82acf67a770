use crate::{WalkBuilder, WalkErrorKind};
use std::fs;
use std::path::PathBuf;

fn relative_paths(root: &std::path::Path) -> Vec<PathBuf> {
    WalkBuilder::new(root)
        .build()
        .expect("build walker")
        .map(|entry| entry.expect("walk entry").relative_path().to_path_buf())
        .collect()
}

#[test]
fn yields_sorted_depth_first_order() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::create_dir(temp.path().join("beta")).expect("mkdir");
    fs::write(temp.path().join("beta/inner.txt"), b"x").expect("write");
    fs::write(temp.path().join("alpha.txt"), b"x").expect("write");
    fs::write(temp.path().join("gamma.txt"), b"x").expect("write");

    assert_eq!(
        relative_paths(temp.path()),
        [
            PathBuf::from("alpha.txt"),
            PathBuf::from("beta"),
            PathBuf::from("beta/inner.txt"),
            PathBuf::from("gamma.txt"),
        ]
    );
}

#[test]
fn order_is_stable_across_runs() {
    let temp = tempfile::tempdir().expect("tempdir");
    for name in ["3.txt", "1.txt", "2.txt"] {
        fs::write(temp.path().join(name), b"x").expect("write");
    }
    assert_eq!(relative_paths(temp.path()), relative_paths(temp.path()));
}

#[test]
fn include_root_emits_the_root_entry_first() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(temp.path().join("file"), b"x").expect("write");

    let mut walker = WalkBuilder::new(temp.path())
        .include_root(true)
        .build()
        .expect("build walker");

    let root = walker.next().expect("root entry").expect("ok");
    assert!(root.is_root());
    assert!(root.relative_path().as_os_str().is_empty());
    assert_eq!(root.depth(), 0);

    let child = walker.next().expect("child entry").expect("ok");
    assert!(!child.is_root());
    assert_eq!(child.relative_path(), std::path::Path::new("file"));
    assert_eq!(child.depth(), 1);
}

#[test]
fn missing_root_fails_at_build_time() {
    let temp = tempfile::tempdir().expect("tempdir");
    let error = WalkBuilder::new(temp.path().join("absent"))
        .build()
        .expect_err("missing root must fail");
    assert!(matches!(error.kind(), WalkErrorKind::RootMetadata { .. }));
    assert!(error.path().ends_with("absent"));
}

#[test]
fn non_directory_root_yields_nothing_without_include_root() {
    let temp = tempfile::tempdir().expect("tempdir");
    let file = temp.path().join("plain.txt");
    fs::write(&file, b"x").expect("write");

    let entries = relative_paths(&file);
    assert!(entries.is_empty());

    let mut walker = WalkBuilder::new(&file)
        .include_root(true)
        .build()
        .expect("build walker");
    let root = walker.next().expect("root entry").expect("ok");
    assert!(root.is_file());
    assert!(walker.next().is_none());
}

#[cfg(unix)]
#[test]
fn symlinks_are_yielded_but_never_followed() {
    let temp = tempfile::tempdir().expect("tempdir");
    let target = temp.path().join("target");
    fs::create_dir(&target).expect("mkdir");
    fs::write(target.join("deep.txt"), b"x").expect("write");
    std::os::unix::fs::symlink(&target, temp.path().join("link")).expect("symlink");

    let paths = relative_paths(temp.path());
    assert!(paths.contains(&PathBuf::from("link")));
    assert!(!paths.contains(&PathBuf::from("link/deep.txt")));
}
