//! Command-line tests against the built binary
//!
//! Covers help/version handling, exit codes, the sync/preview/info commands
//! and profile management.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn dirsync(args: &[&str]) -> Output {
	Command::new(env!("CARGO_BIN_EXE_dirsync"))
		.args(args)
		.env("RUST_LOG", "warn")
		.output()
		.expect("failed to run dirsync binary")
}

fn stdout(output: &Output) -> String {
	String::from_utf8_lossy(&output.stdout).to_string()
}

fn path_arg(path: &Path) -> &str {
	path.to_str().unwrap()
}

// ============================================================================
// Help, Version and Argument Errors
// ============================================================================

#[test]
fn test_help_variants_exit_zero() {
	for args in [&["--help"][..], &["-h"][..], &["help"][..]].iter() {
		let output = dirsync(args);
		assert_eq!(output.status.code(), Some(0), "args: {:?}", args);
		assert!(stdout(&output).contains("Usage"), "args: {:?}", args);
	}
}

#[test]
fn test_version_variants_exit_zero() {
	for args in [&["--version"][..], &["-v"][..], &["version"][..]].iter() {
		let output = dirsync(args);
		assert_eq!(output.status.code(), Some(0), "args: {:?}", args);
		assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")), "args: {:?}", args);
	}
}

#[test]
fn test_unknown_argument_exits_one() {
	let output = dirsync(&["--frobnicate"]);
	assert_eq!(output.status.code(), Some(1));

	let output = dirsync(&["teleport"]);
	assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_invalid_mode_exits_one() {
	let src = TempDir::new().unwrap();
	let dst = TempDir::new().unwrap();
	let output = dirsync(&["sync", path_arg(src.path()), path_arg(dst.path()), "--mode", "sideways"]);
	assert_eq!(output.status.code(), Some(1));
}

// ============================================================================
// Sync, Preview and Info
// ============================================================================

#[test]
fn test_sync_command_copies_files() {
	let src = TempDir::new().unwrap();
	let dst = TempDir::new().unwrap();
	fs::write(src.path().join("hello.txt"), b"hello").unwrap();

	let output = dirsync(&["sync", path_arg(src.path()), path_arg(dst.path())]);
	assert_eq!(output.status.code(), Some(0));
	assert!(stdout(&output).contains("1/1"));
	assert_eq!(fs::read(dst.path().join("hello.txt")).unwrap(), b"hello");
}

#[test]
fn test_sync_missing_source_exits_one() {
	let dir = TempDir::new().unwrap();
	let missing = dir.path().join("missing");
	let output = dirsync(&["sync", path_arg(&missing), path_arg(&dir.path().join("dst"))]);
	assert_eq!(output.status.code(), Some(1));
	assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

#[test]
fn test_preview_command_lists_actions_without_copying() {
	let src = TempDir::new().unwrap();
	let dst = TempDir::new().unwrap();
	fs::write(src.path().join("a.txt"), b"a").unwrap();
	fs::write(dst.path().join("b.txt"), b"b").unwrap();

	let output = dirsync(&[
		"preview",
		path_arg(src.path()),
		path_arg(dst.path()),
		"--mode",
		"two-way",
	]);
	assert_eq!(output.status.code(), Some(0));
	let text = stdout(&output);
	assert!(text.contains("COPY → a.txt"));
	assert!(text.contains("COPY ← b.txt"));
	assert!(text.contains("Total: 2"));
	assert!(!dst.path().join("a.txt").exists());
	assert!(!src.path().join("b.txt").exists());
}

#[test]
fn test_info_command() {
	let dir = TempDir::new().unwrap();
	fs::write(dir.path().join("one"), vec![0u8; 1024]).unwrap();
	fs::create_dir(dir.path().join("sub")).unwrap();
	fs::write(dir.path().join("sub/two"), vec![0u8; 512]).unwrap();

	let output = dirsync(&["info", path_arg(dir.path())]);
	assert_eq!(output.status.code(), Some(0));
	let text = stdout(&output);
	assert!(text.contains("2 files"));
	assert!(text.contains("1.50 KB"));

	let output = dirsync(&["info", path_arg(&dir.path().join("nope"))]);
	assert_eq!(output.status.code(), Some(1));
}

// ============================================================================
// Profiles
// ============================================================================

#[test]
fn test_profile_save_list_use_delete() {
	let home = TempDir::new().unwrap();
	let src = TempDir::new().unwrap();
	let dst = TempDir::new().unwrap();
	fs::write(src.path().join("keep.txt"), b"k").unwrap();
	fs::write(src.path().join("skip.log"), b"s").unwrap();
	let store = home.path().join("profiles.json");
	let store_arg = path_arg(&store);

	let output = dirsync(&[
		"--profiles",
		store_arg,
		"profile",
		"save",
		"docs",
		path_arg(src.path()),
		path_arg(dst.path()),
		"--filter",
		"!*.log",
	]);
	assert_eq!(output.status.code(), Some(0));
	assert!(store.exists());

	let output = dirsync(&["--profiles", store_arg, "profile", "list"]);
	let text = stdout(&output);
	assert!(text.contains("default"));
	assert!(text.contains("docs"));
	assert!(text.contains("[!*.log]"));

	let output = dirsync(&["--profiles", store_arg, "--profile", "docs", "sync"]);
	assert_eq!(output.status.code(), Some(0));
	assert!(dst.path().join("keep.txt").exists());
	assert!(!dst.path().join("skip.log").exists());

	let output = dirsync(&["--profiles", store_arg, "profile", "delete", "docs"]);
	assert_eq!(output.status.code(), Some(0));
	let output = dirsync(&["--profiles", store_arg, "profile", "delete", "default"]);
	assert_eq!(output.status.code(), Some(1));
	assert!(String::from_utf8_lossy(&output.stderr).contains("at least one profile"));
}

#[test]
fn test_unknown_profile_exits_one() {
	let home = TempDir::new().unwrap();
	let store = home.path().join("profiles.json");
	let output = dirsync(&["--profiles", path_arg(&store), "--profile", "ghost", "sync"]);
	assert_eq!(output.status.code(), Some(1));
	assert!(String::from_utf8_lossy(&output.stderr).contains("Profile not found"));
}
