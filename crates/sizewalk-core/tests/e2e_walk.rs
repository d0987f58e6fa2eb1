/// End-to-end walk tests.
///
/// These run the real `build_tree` against temporary directories: real
/// rayon units, real `read_dir`/`metadata` calls, the real completion join
/// and notifier. Every wait is bounded by a deadline so a deadlock fails the
/// test instead of hanging the suite.
use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};
use sizewalk_core::scanner::NOTIFY_CHANNEL_CAPACITY;
use sizewalk_core::{build_tree, build_tree_with, Node, NodeErrorKind, RootError, ScanOptions};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

const DEADLINE: Duration = Duration::from_secs(30);

fn write_bytes(path: &Path, n: usize) {
    let mut f = fs::File::create(path).unwrap();
    f.write_all(&vec![0u8; n]).unwrap();
}

/// Consume ticks until the channel closes. Returns the number of ticks seen.
fn wait_for_close(rx: &Receiver<()>) -> usize {
    let deadline = Instant::now() + DEADLINE;
    let mut ticks = 0;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        assert!(!remaining.is_zero(), "walk did not finish within 30 seconds");
        match rx.recv_timeout(remaining) {
            Ok(()) => ticks += 1,
            Err(RecvTimeoutError::Disconnected) => return ticks,
            Err(RecvTimeoutError::Timeout) => panic!("walk did not finish within 30 seconds"),
        }
    }
}

fn walk(root: &Path) -> Arc<Node> {
    let handle = build_tree(root).expect("valid root");
    wait_for_close(&handle.updates);
    handle.root
}

fn child(node: &Node, name: &str) -> Arc<Node> {
    node.children()
        .into_iter()
        .find(|c| c.name() == name)
        .unwrap_or_else(|| panic!("{} has no child {name}", node.path().display()))
}

/// Every directory's size must equal the sum of its children's sizes.
fn assert_sizes_exact(node: &Node) {
    if !node.is_dir() {
        return;
    }
    let children = node.children();
    let sum: u64 = children.iter().map(|c| c.size()).sum();
    assert_eq!(
        node.size(),
        sum,
        "size of {} does not match its children",
        node.path().display()
    );
    for c in &children {
        assert_sizes_exact(c);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// root/{fileA:10, fileB:20, sub/{fileC:5}}
#[test]
fn walk_small_tree_is_exact() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    write_bytes(&tmp.path().join("fileA"), 10);
    write_bytes(&tmp.path().join("fileB"), 20);
    fs::create_dir(tmp.path().join("sub")).unwrap();
    write_bytes(&tmp.path().join("sub").join("fileC"), 5);

    let root = walk(tmp.path());

    assert_eq!(root.size(), 35);
    assert_eq!(root.child_count(), 3);
    let sub = child(&root, "sub");
    assert!(sub.is_dir());
    assert_eq!(sub.size(), 5);
    assert_eq!(child(&root, "fileA").size(), 10);
    assert_eq!(child(&root, "fileB").size(), 20);
    let file_c = child(&sub, "fileC");
    assert_eq!(file_c.size(), 5);
    assert!(!file_c.is_dir());

    for node in [&root, &sub, &file_c] {
        assert!(node.error().is_none(), "{} has an error", node.path().display());
    }
    assert!(Arc::ptr_eq(&file_c.parent().unwrap(), &sub));
    assert!(Arc::ptr_eq(&sub.parent().unwrap(), &root));
    assert!(root.is_root());
}

/// A lopsided tree of varying depth and width settles to exact sizes at
/// every level.
#[test]
fn walk_irregular_tree_sizes_are_exact() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let mut expected_total = 0u64;
    for a in 0..6 {
        let level1 = tmp.path().join(format!("a{a}"));
        fs::create_dir(&level1).unwrap();
        for b in 0..a {
            let level2 = level1.join(format!("b{b}"));
            fs::create_dir(&level2).unwrap();
            for f in 0..(a + b) {
                let len = 1 + a * 100 + b * 10 + f;
                write_bytes(&level2.join(format!("f{f}")), len);
                expected_total += len as u64;
            }
        }
        write_bytes(&level1.join("top"), a * 7);
        expected_total += (a * 7) as u64;
    }
    // Empty directories contribute nothing but still appear.
    fs::create_dir_all(tmp.path().join("empty/deeper/deepest")).unwrap();

    let root = walk(tmp.path());

    assert_eq!(root.size(), expected_total);
    assert_sizes_exact(&root);
    let deepest = child(&child(&child(&root, "empty"), "deeper"), "deepest");
    assert_eq!(deepest.size(), 0);
    assert_eq!(deepest.child_count(), 0);
}

/// 10 000 one-byte files across nested directories: no update may be lost.
#[test]
fn walk_fan_out_stress_loses_no_bytes() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    for outer in 0..10 {
        for inner in 0..10 {
            let dir = tmp.path().join(format!("o{outer}")).join(format!("i{inner}"));
            fs::create_dir_all(&dir).unwrap();
            for f in 0..100 {
                write_bytes(&dir.join(format!("{f}")), 1);
            }
        }
    }

    let root = walk(tmp.path());

    assert_eq!(root.size(), 10_000);
    for outer in root.children() {
        assert_eq!(outer.size(), 1_000);
    }
}

/// `build_tree` hands back the root before the walk is done: name, path and
/// kind are available immediately.
#[test]
fn walk_returns_root_immediately() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    for i in 0..200 {
        let dir = tmp.path().join(format!("d{i}"));
        fs::create_dir(&dir).unwrap();
        write_bytes(&dir.join("x"), 3);
    }

    let handle = build_tree(tmp.path()).expect("valid root");
    let root = &handle.root;
    assert!(root.is_dir());
    assert!(root.is_root());
    assert!(root.path().is_absolute());
    assert_eq!(
        root.name(),
        tmp.path().file_name().unwrap().to_string_lossy()
    );
    // Partial sizes are lower bounds.
    assert!(root.size() <= 600);

    wait_for_close(&handle.updates);
    assert_eq!(root.size(), 600);
    assert_eq!(root.child_count(), 200);
}

/// A consumer that never reads must not stall the walk.
#[test]
fn walk_completes_without_a_reader() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    for i in 0..500 {
        let dir = tmp.path().join(format!("d{i}"));
        fs::create_dir(&dir).unwrap();
        write_bytes(&dir.join("x"), 2);
    }

    let handle = build_tree(tmp.path()).expect("valid root");
    assert_eq!(handle.updates.capacity(), Some(NOTIFY_CHANNEL_CAPACITY));

    let deadline = Instant::now() + DEADLINE;
    while handle.root.size() < 1_000 {
        assert!(Instant::now() < deadline, "walk stalled without a reader");
        std::thread::sleep(Duration::from_millis(5));
    }
    // 501 units pinged, but at most one tick is ever buffered.
    assert!(handle.updates.len() <= 1);
    wait_for_close(&handle.updates);
}

/// The channel delivers at least one tick for a readable root, then closes
/// and stays closed.
#[test]
fn walk_closes_channel_once() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    write_bytes(&tmp.path().join("a"), 1);

    let handle = build_tree(tmp.path()).expect("valid root");
    let ticks = wait_for_close(&handle.updates);

    assert!(ticks >= 1, "expected at least one progress tick");
    assert_eq!(handle.updates.try_recv(), Err(TryRecvError::Disconnected));
    assert_eq!(handle.updates.try_recv(), Err(TryRecvError::Disconnected));
}

/// The walk owns the only sender: completion disconnects every receiver
/// clone the consumer holds, and nothing the consumer keeps alive can hold
/// the channel open.
#[test]
fn walk_disconnects_every_receiver_clone() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    write_bytes(&tmp.path().join("a"), 6);
    fs::create_dir(tmp.path().join("sub")).unwrap();

    let handle = build_tree(tmp.path()).expect("valid root");
    let kept = handle.updates.clone();
    wait_for_close(&handle.updates);

    assert_eq!(handle.root.size(), 6);
    assert_eq!(kept.try_recv(), Err(TryRecvError::Disconnected));
}

/// A one-thread scheduler still completes deep trees: units never wait on
/// each other.
#[test]
fn walk_deep_tree_on_single_thread() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let mut dir = tmp.path().to_path_buf();
    for depth in 0..100 {
        dir = dir.join(format!("{depth}"));
        fs::create_dir(&dir).unwrap();
        write_bytes(&dir.join("f"), 1);
    }

    let handle = build_tree_with(tmp.path(), &ScanOptions { threads: 1 }).expect("valid root");
    wait_for_close(&handle.updates);

    assert_eq!(handle.root.size(), 100);
    assert_sizes_exact(&handle.root);
}

#[test]
fn walk_of_empty_directory() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let root = walk(tmp.path());
    assert_eq!(root.size(), 0);
    assert_eq!(root.child_count(), 0);
    assert!(root.error().is_none());
}

/// `..` and `.` in the requested root are resolved away.
#[test]
fn walk_root_path_is_normalised() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    fs::create_dir(tmp.path().join("sub")).unwrap();
    write_bytes(&tmp.path().join("a"), 4);

    let requested = tmp.path().join("sub").join("..").join(".");
    let root = walk(&requested);

    assert_eq!(root.path(), tmp.path());
    assert_eq!(root.size(), 4);
}

// ── Root errors ──────────────────────────────────────────────────────────────

#[test]
fn missing_root_fails_synchronously() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let err = build_tree(tmp.path().join("nope")).unwrap_err();

    assert!(matches!(err, RootError::NotFound { .. }), "got {err:?}");
}

#[test]
fn file_root_fails_synchronously() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let file = tmp.path().join("plain.txt");
    write_bytes(&file, 1);

    let err = build_tree(&file).unwrap_err();
    assert!(matches!(err, RootError::NotADirectory { .. }), "got {err:?}");
    assert!(err.to_string().contains("is not a directory"));
}

// ── Node-local errors ────────────────────────────────────────────────────────

/// root/{badDir (unreadable), goodFile:10}
#[cfg(unix)]
#[test]
fn unreadable_directory_is_isolated() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().expect("failed to create temp dir");
    let bad = tmp.path().join("badDir");
    fs::create_dir(&bad).unwrap();
    write_bytes(&bad.join("hidden"), 1_000);
    write_bytes(&tmp.path().join("goodFile"), 10);
    fs::set_permissions(&bad, fs::Permissions::from_mode(0o000)).unwrap();

    if fs::read_dir(&bad).is_ok() {
        // Running with privileges that ignore permissions; nothing to test.
        fs::set_permissions(&bad, fs::Permissions::from_mode(0o755)).unwrap();
        eprintln!("skipping: permissions are not enforced for this user");
        return;
    }

    let root = walk(tmp.path());
    fs::set_permissions(&bad, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(root.size(), 10);
    assert!(root.error().is_none());

    let bad_node = child(&root, "badDir");
    let error = bad_node.error().expect("badDir must carry an error");
    assert_eq!(error.kind(), NodeErrorKind::Listing);
    assert_eq!(bad_node.child_count(), 0);
    assert_eq!(bad_node.size(), 0);

    let good = child(&root, "goodFile");
    assert!(good.error().is_none());
    assert_eq!(good.size(), 10);
}

/// Symlinks are measured as links; a link to a directory is not descended.
#[cfg(unix)]
#[test]
fn symlinked_directory_is_not_followed() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let real = tmp.path().join("real");
    fs::create_dir(&real).unwrap();
    write_bytes(&real.join("big"), 4_096);
    std::os::unix::fs::symlink(&real, tmp.path().join("link")).unwrap();

    let root = walk(tmp.path());

    let link = child(&root, "link");
    assert!(!link.is_dir());
    assert_eq!(link.child_count(), 0);
    let link_len = fs::symlink_metadata(tmp.path().join("link")).unwrap().len();
    assert_eq!(link.size(), link_len);
    assert_eq!(root.size(), 4_096 + link_len);
}
