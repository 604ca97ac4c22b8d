//! Behaviour shared by every mirror backend.

#![allow(clippy::unwrap_used)]

use folio_core::config::MirrorConfig;
use folio_core::{Certificate, MirrorStore, Project};
use folio_store::{FileMirror, MemoryMirror, cached, open_mirror};
use tempfile::TempDir;

fn exercise(mirror: &dyn MirrorStore) {
    assert!(cached::read::<Project>(mirror).is_empty());

    let projects = vec![Project::new("a", "Alpha"), Project::new("b", "Beta")];
    cached::write(mirror, &projects).unwrap();
    assert_eq!(cached::read::<Project>(mirror), projects);

    // A later snapshot fully replaces the earlier one.
    let shorter = vec![Project::new("c", "Gamma")];
    cached::write(mirror, &shorter).unwrap();
    assert_eq!(cached::read::<Project>(mirror), shorter);

    // Certificates live under their own key.
    cached::write(mirror, &[Certificate::new("cert.png")]).unwrap();
    assert_eq!(cached::read::<Project>(mirror), shorter);
}

#[test]
fn test_memory_backend() {
    exercise(&MemoryMirror::new());
}

#[test]
fn test_file_backend() {
    let dir = TempDir::new().unwrap();
    exercise(&FileMirror::open(dir.path().join("mirror.json"), 1 << 20).unwrap());
}

#[test]
fn test_open_mirror_selects_file_when_path_set() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("m.json");
    let config = MirrorConfig {
        path: Some(path.clone()),
        capacity_bytes: 1024,
    };
    let mirror = open_mirror(&config).unwrap();
    mirror.set("projects", "[]").unwrap();
    assert!(path.exists());
}

#[test]
fn test_open_mirror_defaults_to_memory() {
    let mirror = open_mirror(&MirrorConfig::default()).unwrap();
    mirror.set("projects", "[]").unwrap();
    assert_eq!(mirror.get("projects").unwrap().as_deref(), Some("[]"));
}
