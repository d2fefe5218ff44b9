//! End-to-end uninstall behavior on a temporary home directory.
mod common;

use common::{Tree, backup_names, make_context, run_install, run_uninstall, setup_source};
use sshconf_cli::plan::Method;
use sshconf_cli::tasks;

#[test]
fn uninstall_reverses_copy_install() {
    let home = tempfile::tempdir().expect("tempdir");
    let repo = tempfile::tempdir().expect("tempdir");
    setup_source(repo.path(), &["10-defaults.conf", "30-hosts.conf"]);

    run_install(home.path(), repo.path(), Method::Copy);
    run_uninstall(home.path());

    let tree = Tree::of(home.path());
    assert!(!tree.config.exists());
    assert!(!tree.config_d.exists());
    assert!(!tree.sockets.exists());
    assert!(!tree.ssh_dir.join(".dotfiles_manifest").exists());
}

#[test]
fn uninstall_reverses_symlink_install_keeping_source() {
    let home = tempfile::tempdir().expect("tempdir");
    let repo = tempfile::tempdir().expect("tempdir");
    setup_source(repo.path(), &["10-defaults.conf"]);

    run_install(home.path(), repo.path(), Method::Symlink);
    run_uninstall(home.path());

    let tree = Tree::of(home.path());
    assert!(tree.config.symlink_metadata().is_err(), "link must be gone");
    assert!(
        repo.path().join("config").is_file(),
        "uninstall removes links, never the files behind them"
    );
    assert!(repo.path().join("config.d/10-defaults.conf").is_file());
}

#[test]
fn uninstall_backs_up_before_removing() {
    let home = tempfile::tempdir().expect("tempdir");
    let repo = tempfile::tempdir().expect("tempdir");
    setup_source(repo.path(), &["10-defaults.conf"]);

    run_install(home.path(), repo.path(), Method::Copy);
    run_uninstall(home.path());

    let tree = Tree::of(home.path());
    let backups = backup_names(&tree.ssh_dir);
    assert_eq!(backups.len(), 2, "config and config.d backups");
}

#[test]
fn uninstall_preserves_untracked_user_files() {
    let home = tempfile::tempdir().expect("tempdir");
    let repo = tempfile::tempdir().expect("tempdir");
    setup_source(repo.path(), &["10-defaults.conf"]);

    run_install(home.path(), repo.path(), Method::Copy);

    let tree = Tree::of(home.path());
    let user_fragment = tree.config_d.join("99-mine.conf");
    let user_key = tree.ssh_dir.join("id_ed25519");
    std::fs::write(&user_fragment, "# mine\n").expect("write");
    std::fs::write(&user_key, "fake key material\n").expect("write");

    run_uninstall(home.path());

    assert!(user_fragment.exists(), "untracked fragments must survive");
    assert!(user_key.exists(), "keys must never be touched");
    assert!(
        tree.config_d.exists(),
        "config.d stays while it still holds user files"
    );
    assert!(tree.ssh_dir.exists());
}

#[test]
fn reinstall_then_uninstall_removes_directories() {
    let home = tempfile::tempdir().expect("tempdir");
    let repo = tempfile::tempdir().expect("tempdir");
    setup_source(repo.path(), &["10-defaults.conf"]);

    run_install(home.path(), repo.path(), Method::Copy);
    let ctx = run_install(home.path(), repo.path(), Method::Copy);

    let manifest = sshconf_cli::manifest::Manifest::load(&ctx.manifest_path()).expect("load");
    let dirs = manifest
        .entries
        .iter()
        .filter(|e| e.kind == sshconf_cli::manifest::EntryKind::Dir)
        .count();
    assert_eq!(dirs, 3, "rewritten manifest must keep directory ownership");

    run_uninstall(home.path());

    let tree = Tree::of(home.path());
    assert!(!tree.config.exists());
    assert!(!tree.config_d.exists(), "config.d left behind after uninstall");
    assert!(!tree.sockets.exists(), "sockets left behind after uninstall");
}

#[test]
fn uninstall_with_corrupt_manifest_falls_back_and_deletes_it() {
    let home = tempfile::tempdir().expect("tempdir");
    let tree = Tree::of(home.path());
    std::fs::create_dir_all(&tree.config_d).expect("mkdir");
    std::fs::write(&tree.config, "Host *\n").expect("write");
    std::fs::write(tree.config_d.join("10-defaults.conf"), "# f\n").expect("write");
    let manifest = tree.ssh_dir.join(".dotfiles_manifest");
    std::fs::write(&manifest, "not a manifest\n").expect("write");

    run_uninstall(home.path());

    assert!(!tree.config.exists());
    assert!(!tree.config_d.join("10-defaults.conf").exists());
    assert!(!manifest.exists(), "stale manifest must not survive uninstall");
}

#[test]
fn uninstall_without_manifest_uses_legacy_removal() {
    let home = tempfile::tempdir().expect("tempdir");
    let tree = Tree::of(home.path());
    std::fs::create_dir_all(&tree.config_d).expect("mkdir");
    std::fs::write(&tree.config, "Host *\n").expect("write");
    std::fs::write(tree.config_d.join("10-defaults.conf"), "# f\n").expect("write");
    std::fs::write(tree.config_d.join("notes.txt"), "keep\n").expect("write");

    run_uninstall(home.path());

    assert!(!tree.config.exists());
    assert!(!tree.config_d.join("10-defaults.conf").exists());
    assert!(tree.config_d.join("notes.txt").exists());
}

#[test]
fn uninstall_on_empty_home_is_a_no_op() {
    let home = tempfile::tempdir().expect("tempdir");
    let ctx = run_uninstall(home.path());

    assert!(!Tree::of(home.path()).ssh_dir.exists());
    assert_eq!(ctx.log.failure_count(), 0);
}

#[test]
fn uninstall_dry_run_removes_nothing() {
    let home = tempfile::tempdir().expect("tempdir");
    let repo = tempfile::tempdir().expect("tempdir");
    setup_source(repo.path(), &["10-defaults.conf"]);

    run_install(home.path(), repo.path(), Method::Copy);

    let ctx = make_context(home.path(), true);
    for task in tasks::all_uninstall_tasks() {
        tasks::execute(task.as_ref(), &ctx);
    }

    let tree = Tree::of(home.path());
    assert_eq!(ctx.log.failure_count(), 0);
    assert!(tree.config.exists());
    assert!(tree.config_d.exists());
    assert!(tree.ssh_dir.join(".dotfiles_manifest").exists());
    assert!(backup_names(&tree.ssh_dir).is_empty());
}

#[test]
fn uninstall_twice_is_safe() {
    let home = tempfile::tempdir().expect("tempdir");
    let repo = tempfile::tempdir().expect("tempdir");
    setup_source(repo.path(), &["10-defaults.conf"]);

    run_install(home.path(), repo.path(), Method::Copy);
    run_uninstall(home.path());
    let ctx = run_uninstall(home.path());

    assert_eq!(ctx.log.failure_count(), 0);
}
