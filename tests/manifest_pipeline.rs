//! Normalization followed by manifest generation, as the binary runs them.

use std::fs;

use assert_fs::prelude::*;
use filetime::{set_file_mtime, FileTime};
use webnorm::{build_manifest, normalize_tree, validate_and_normalize, write_manifest, Config};

#[test]
fn manifest_lists_normalized_urls_newest_first() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("root/Old Pic.png").write_str("o").unwrap();
    temp.child("root/Álbum Novo/New Pic.PNG").write_str("n").unwrap();
    temp.child("root/.hidden/skip.png").write_str("h").unwrap();
    set_file_mtime(
        temp.child("root/Old Pic.png").path(),
        FileTime::from_unix_time(1_000, 0),
    )
    .unwrap();
    set_file_mtime(
        temp.child("root/Álbum Novo/New Pic.PNG").path(),
        FileTime::from_unix_time(2_000, 0),
    )
    .unwrap();

    let mut cfg = Config::new(temp.child("root").path(), "https://cdn.example");
    cfg.output = temp.path().join("figurinhas.json");
    validate_and_normalize(&mut cfg).unwrap();

    normalize_tree(&cfg).unwrap();
    let manifest = build_manifest(&cfg).unwrap();
    write_manifest(&cfg.output, &manifest).unwrap();

    let urls: Vec<&str> = manifest.images.iter().map(|i| i.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://cdn.example/album_novo/new_pic.png",
            "https://cdn.example/old_pic.png",
        ]
    );
    assert_eq!(manifest.images[0].recent, 2_000);

    let text = fs::read_to_string(&cfg.output).unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["images"][1]["title"], "old pic");
    assert!(text.starts_with("{\n    \"lastModified\""));
}

#[test]
fn rewriting_replaces_previous_manifest() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("root/a.png").write_str("a").unwrap();
    let mut cfg = Config::new(temp.child("root").path(), "");
    cfg.output = temp.path().join("m.json");
    fs::write(&cfg.output, "stale").unwrap();

    let manifest = build_manifest(&cfg).unwrap();
    write_manifest(&cfg.output, &manifest).unwrap();

    let text = fs::read_to_string(&cfg.output).unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["images"][0]["url"], "a.png");
}
