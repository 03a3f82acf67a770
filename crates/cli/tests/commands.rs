//! In-process exercises of the command-line surface.

use std::fs;

fn run(args: &[&str]) -> (u8, String, String) {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let mut full = vec!["mdsum"];
    full.extend_from_slice(args);
    let code = cli::run(full, &mut stdout, &mut stderr);
    (
        code,
        String::from_utf8(stdout).expect("stdout is UTF-8"),
        String::from_utf8(stderr).expect("stderr is UTF-8"),
    )
}

#[test]
fn string_subcommand_prints_the_digest() {
    let (code, stdout, stderr) = run(&["string", "abc"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "900150983cd24fb0d6963f7d28e17f72");
    assert!(stderr.is_empty());
}

#[test]
fn empty_string_hashes_to_the_empty_digest() {
    let (code, stdout, _) = run(&["string", ""]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "d41d8cd98f00b204e9800998ecf8427e");
}

#[test]
fn file_subcommand_matches_string_subcommand() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("input.txt");
    fs::write(&path, b"abc").expect("write");

    let (code, stdout, _) = run(&["file", path.to_str().expect("utf-8 path")]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "900150983cd24fb0d6963f7d28e17f72");
}

#[test]
fn missing_file_fails_with_a_diagnostic() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent");

    let (code, stdout, stderr) = run(&["file", path.to_str().expect("utf-8 path")]);
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.starts_with("mdsum: "));
}

#[test]
fn tree_subcommand_is_deterministic_and_writes_a_manifest() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("a.txt"), b"alpha").expect("write");
    fs::write(dir.path().join("b.txt"), b"bravo").expect("write");
    let root = dir.path().to_str().expect("utf-8 path");

    let (code, first, _) = run(&["tree", root]);
    assert_eq!(code, 0);
    let (_, second, _) = run(&["tree", root]);
    assert_eq!(first, second);

    let (code, stdout, _) = run(&["tree", root, "--manifest"]);
    assert_eq!(code, 0);
    // The aggregate is printed before the manifest exists, so it matches the
    // plain run.
    assert_eq!(stdout.lines().next(), first.lines().next());
    let manifest_path = dir.path().join("file_hashes.txt");
    assert!(manifest_path.exists());

    let manifest = manifest::Manifest::load(&manifest_path).expect("load manifest");
    assert_eq!(manifest.len(), 2);
}

#[test]
fn tree_manifest_accepts_a_custom_file_name() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("a.txt"), b"alpha").expect("write");
    let root = dir.path().to_str().expect("utf-8 path");

    let (code, stdout, _) = run(&["tree", root, "--manifest", "custom.txt"]);
    assert_eq!(code, 0);
    let custom = dir.path().join("custom.txt");
    assert!(custom.exists());
    assert!(!dir.path().join("file_hashes.txt").exists());
    assert!(stdout.contains("manifest written to"));

    let manifest = manifest::Manifest::load(&custom).expect("load manifest");
    assert_eq!(manifest.len(), 1);
}

#[test]
fn tree_subcommand_rejects_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("plain.txt");
    fs::write(&path, b"x").expect("write");

    let (code, _, stderr) = run(&["tree", path.to_str().expect("utf-8 path")]);
    assert_eq!(code, 1);
    assert!(stderr.contains("not a directory"));
}

#[test]
fn trace_subcommand_walks_every_step_to_the_final_hash() {
    let (code, stdout, _) = run(&["trace", "abc"]);
    assert_eq!(code, 0);
    // One padded block: 64 step records, one fold, one final hash.
    assert_eq!(stdout.matches("Round ").count(), 64);
    assert_eq!(stdout.matches("folded").count(), 1);
    assert!(stdout.contains("Processing block 1 of 1:"));
    assert!(stdout.trim_end().ends_with("Final MD5 hash: 900150983cd24fb0d6963f7d28e17f72"));
}

#[test]
fn trace_covers_two_blocks_for_long_input() {
    let text = "x".repeat(70);
    let (code, stdout, _) = run(&["trace", &text]);
    assert_eq!(code, 0);
    assert_eq!(stdout.matches("Round ").count(), 128);
    assert!(stdout.contains("Processing block 2 of 2:"));
}

#[test]
fn verify_subcommand_distinguishes_match_from_mismatch() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("input.txt");
    fs::write(&path, b"abc").expect("write");
    let path = path.to_str().expect("utf-8 path");

    let (code, stdout, _) = run(&["verify", path, "900150983cd24fb0d6963f7d28e17f72"]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("OK "));

    let (code, stdout, _) = run(&["verify", path, "d41d8cd98f00b204e9800998ecf8427e"]);
    assert_eq!(code, 1);
    assert!(stdout.starts_with("MISMATCH "));

    // Byte-for-byte comparison: an uppercase digest does not match.
    let (code, _, _) = run(&["verify", path, "900150983CD24FB0D6963F7D28E17F72"]);
    assert_eq!(code, 1);
}

#[test]
fn verify_rejects_malformed_digests() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("input.txt");
    fs::write(&path, b"abc").expect("write");

    let (code, _, stderr) = run(&["verify", path.to_str().expect("utf-8 path"), "zz"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("not a 32-character hex digest"));
}

#[test]
fn compare_subcommand_reports_the_three_way_classification() {
    let dir = tempfile::tempdir().expect("tempdir");
    let h1 = "d41d8cd98f00b204e9800998ecf8427e";
    let h2 = "900150983cd24fb0d6963f7d28e17f72";
    let h3 = "0cc175b9c0f1b6a831c399e269772661";

    let reference = dir.path().join("reference.txt");
    fs::write(&reference, format!("header\na: {h1}\nb: {h2}\n")).expect("write");
    let current = dir.path().join("current.txt");
    fs::write(&current, format!("header\na: {h1}\nc: {h3}\n")).expect("write");

    let (code, stdout, _) = run(&[
        "compare",
        reference.to_str().expect("utf-8 path"),
        current.to_str().expect("utf-8 path"),
    ]);
    // "b" is missing, so the comparison is unclean.
    assert_eq!(code, 1);
    assert!(stdout.contains("matched (1):\n  a\n"));
    assert!(stdout.contains("mismatched (0):\n"));
    assert!(stdout.contains("missing (1):\n  b\n"));
}

#[test]
fn compare_of_identical_manifests_is_clean() {
    let dir = tempfile::tempdir().expect("tempdir");
    let h1 = "d41d8cd98f00b204e9800998ecf8427e";
    let path = dir.path().join("hashes.txt");
    fs::write(&path, format!("header\na: {h1}\n")).expect("write");
    let path = path.to_str().expect("utf-8 path");

    let (code, stdout, _) = run(&["compare", path, path]);
    assert_eq!(code, 0);
    assert!(stdout.contains("matched (1):"));
}

#[test]
fn compare_with_missing_manifest_is_a_structured_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let existing = dir.path().join("hashes.txt");
    fs::write(&existing, "header\n").expect("write");

    let (code, _, stderr) = run(&[
        "compare",
        dir.path().join("absent.txt").to_str().expect("utf-8 path"),
        existing.to_str().expect("utf-8 path"),
    ]);
    assert_eq!(code, 1);
    assert!(stderr.contains("failed to access manifest"));
}

#[test]
fn verbose_flag_does_not_disturb_results() {
    let (code, stdout, _) = run(&["-vv", "string", "abc"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "900150983cd24fb0d6963f7d28e17f72");
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    let (code, _, stderr) = run(&["frobnicate"]);
    assert_eq!(code, 2);
    assert!(!stderr.is_empty());
}

#[test]
fn help_prints_to_stdout_and_exits_cleanly() {
    let (code, stdout, stderr) = run(&["--help"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("mdsum"));
    assert!(stderr.is_empty());
}
