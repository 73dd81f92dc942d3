//! Whole-tree guarantees of the normalization pass.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use assert_fs::prelude::*;
use walkdir::WalkDir;
use webnorm::{normalize_tree, Config};

fn cfg_for(root: &Path) -> Config {
    Config {
        root: root.to_path_buf(),
        manifest: false,
        ..Config::default()
    }
}

/// Every file content under `root` with its multiplicity.
fn contents(root: &Path) -> BTreeMap<String, usize> {
    let mut map = BTreeMap::new();
    for e in WalkDir::new(root).into_iter().filter_map(Result::ok) {
        if e.file_type().is_file() {
            *map.entry(fs::read_to_string(e.path()).unwrap()).or_insert(0) += 1;
        }
    }
    map
}

fn names_in(dir: &Path) -> Vec<String> {
    let mut v: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    v.sort();
    v
}

fn messy_tree(temp: &assert_fs::TempDir) {
    temp.child("Café Amigos/Foto Um.png").write_str("c1").unwrap();
    temp.child("cafe_amigos/foto_um.png").write_str("c2").unwrap();
    temp.child("cafe_amigos/Sub/Deep  Pic.PNG").write_str("c3").unwrap();
    temp.child("CAFE AMIGOS/sub/deep_pic.png").write_str("c4").unwrap();
    temp.child("A---B   C.png").write_str("c5").unwrap();
    temp.child("a-b c.png").write_str("c6").unwrap();
    temp.child("####.png").write_str("c7").unwrap();
    temp.child("notes.txt").write_str("c8").unwrap();
}

#[test]
fn second_run_changes_nothing() {
    let temp = assert_fs::TempDir::new().unwrap();
    messy_tree(&temp);
    let cfg = cfg_for(temp.path());

    let first = normalize_tree(&cfg).unwrap();
    assert!(first.changes() > 0);
    assert_eq!(first.failures, 0);

    let second = normalize_tree(&cfg).unwrap();
    assert_eq!(second.changes(), 0, "second pass should be a no-op: {second:?}");
    assert_eq!(second.collisions, 0);
}

#[test]
fn no_content_is_lost() {
    let temp = assert_fs::TempDir::new().unwrap();
    messy_tree(&temp);
    let before = contents(temp.path());

    normalize_tree(&cfg_for(temp.path())).unwrap();

    assert_eq!(contents(temp.path()), before);
    assert_eq!(names_in(temp.path()).iter().filter(|n| n.starts_with("cafe_amigos")).count(), 1);
}

#[test]
fn existing_destination_is_never_overwritten() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("photo.png").write_str("original").unwrap();
    temp.child("Photo!.png").write_str("incoming").unwrap();

    normalize_tree(&cfg_for(temp.path())).unwrap();

    assert_eq!(fs::read_to_string(temp.child("photo.png").path()).unwrap(), "original");
    let names = names_in(temp.path());
    assert_eq!(names.len(), 2);
    let alt = names.iter().find(|n| n.as_str() != "photo.png").unwrap();
    assert!(alt.starts_with("photo_") && alt.ends_with(".png"), "alternate name: {alt}");
    assert_eq!(fs::read_to_string(temp.path().join(alt)).unwrap(), "incoming");
}

#[test]
fn case_only_rename_leaves_exactly_one_entry() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("Foo.png").write_str("foo").unwrap();
    temp.child("Album/Bar.png").write_str("bar").unwrap();

    let summary = normalize_tree(&cfg_for(temp.path())).unwrap();

    assert_eq!(names_in(temp.path()), vec!["album", "foo.png"]);
    assert_eq!(names_in(&temp.path().join("album")), vec!["bar.png"]);
    assert_eq!(summary.collisions, 0);
    assert_eq!(fs::read_to_string(temp.child("foo.png").path()).unwrap(), "foo");
}

#[test]
fn two_files_with_same_normal_form_both_survive() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("My Pic.png").write_str("one").unwrap();
    temp.child("my  pic.png").write_str("two").unwrap();

    let summary = normalize_tree(&cfg_for(temp.path())).unwrap();

    let names = names_in(temp.path());
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"my_pic.png".to_string()));
    assert_eq!(summary.collisions, 1);
    let mut got: Vec<String> = names
        .iter()
        .map(|n| fs::read_to_string(temp.path().join(n)).unwrap())
        .collect();
    got.sort();
    assert_eq!(got, vec!["one", "two"]);
}

#[test]
fn colliding_directories_are_merged_recursively() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("Travel/a.png").write_str("incoming a").unwrap();
    temp.child("Travel/Sub/b.png").write_str("b").unwrap();
    temp.child("travel/a.png").write_str("original a").unwrap();

    let summary = normalize_tree(&cfg_for(temp.path())).unwrap();

    assert_eq!(names_in(temp.path()), vec!["travel"]);
    assert_eq!(summary.dirs_merged, 1);
    let travel = temp.path().join("travel");
    assert_eq!(fs::read_to_string(travel.join("a.png")).unwrap(), "original a");
    assert_eq!(fs::read_to_string(travel.join("sub/b.png")).unwrap(), "b");
    let files = names_in(&travel);
    assert_eq!(files.len(), 3, "{files:?}");
    let alt = files
        .iter()
        .find(|n| n.starts_with("a_") && n.ends_with(".png"))
        .unwrap();
    assert_eq!(fs::read_to_string(travel.join(alt)).unwrap(), "incoming a");
}

#[cfg(unix)]
#[test]
fn symlinks_are_left_alone() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("Real Dir/Pic.png").write_str("x").unwrap();
    std::os::unix::fs::symlink(temp.path().join("Real Dir"), temp.path().join("Link Dir")).unwrap();

    normalize_tree(&cfg_for(temp.path())).unwrap();

    assert_eq!(names_in(temp.path()), vec!["Link Dir", "real_dir"]);
    assert!(fs::symlink_metadata(temp.path().join("Link Dir")).unwrap().file_type().is_symlink());
}
