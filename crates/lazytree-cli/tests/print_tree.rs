use std::fs;

use assert_cmd::assert::Assert;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::{TempDir, tempdir};

/// Runs `lazytree --latency-ms 0 <args>` with an empty home.
fn lazytree(home: &TempDir, args: &[&str]) -> Assert {
    cargo_bin_cmd!("lazytree")
        .env("LAZYTREE_HOME", home.path())
        .env_remove("LAZYTREE_LOG")
        .env_remove("LAZYTREE_LATENCY_MS")
        .args(["--latency-ms", "0"])
        .args(args)
        .assert()
}

#[test]
fn test_print_shows_roots() {
    let home = tempdir().unwrap();

    lazytree(&home, &["print"])
        .success()
        .stdout("▸ Fruits (pdf)\n▸ Vegetables (png)\n");
}

#[test]
fn test_print_expands_in_order() {
    let home = tempdir().unwrap();

    lazytree(&home, &["print", "--expand", "1", "--expand", "2"])
        .success()
        .stdout(
            "▾ Fruits (pdf)\n\
             \x20 ▾ Apple (doc)\n\
             \x20   • Fuji (doc)\n\
             \x20   • Macintosh (doc)\n\
             \x20 • Orange (pdf)\n\
             \x20 • Banana (pdf)\n\
             ▸ Vegetables (png)\n",
        );
}

#[test]
fn test_print_ignores_ids_not_yet_visible() {
    let home = tempdir().unwrap();

    // Apple is only visible once Fruits is expanded.
    lazytree(&home, &["print", "--expand", "2", "--expand", "99"])
        .success()
        .stdout("▸ Fruits (pdf)\n▸ Vegetables (png)\n");
}

#[test]
fn test_print_json() {
    let home = tempdir().unwrap();

    let output = lazytree(&home, &["print", "--expand", "5", "--json"])
        .success()
        .get_output()
        .stdout
        .clone();
    let nodes: Value = serde_json::from_slice(&output).unwrap();
    let nodes = nodes.as_array().unwrap();

    assert_eq!(nodes.len(), 5);
    assert_eq!(nodes[1]["record"]["name"], "Vegetables");
    assert_eq!(nodes[1]["is_expanded"], true);
    assert_eq!(nodes[4]["record"]["id"], 8);
    assert_eq!(nodes[4]["record"]["type"], "png");
    assert_eq!(nodes[4]["level"], 1);
    assert_eq!(nodes[4]["expandable"], true);
    assert_eq!(nodes[4]["is_loading"], false);
}

#[test]
fn test_sample_round_trips_through_data_flag() {
    let home = tempdir().unwrap();
    let sample = lazytree(&home, &["sample"])
        .success()
        .stdout(predicate::str::contains("[[records]]"))
        .get_output()
        .stdout
        .clone();
    let path = home.path().join("sample.toml");
    fs::write(&path, sample).unwrap();

    let data = path.to_str().unwrap();
    lazytree(&home, &["print", "--data", data, "--expand", "5", "--expand", "8"])
        .success()
        .stdout(
            "▸ Fruits (pdf)\n\
             ▾ Vegetables (png)\n\
             \x20 • Tomato (png)\n\
             \x20 • Potato (jpg)\n\
             \x20 ▾ Onion (png)\n\
             \x20   • Fuji (doc)\n\
             \x20   • White (png)\n\
             \x20   • Purple (png)\n",
        );
}

#[test]
fn test_invalid_hierarchy_file_is_reported() {
    let home = tempdir().unwrap();
    let path = home.path().join("broken.toml");
    fs::write(&path, "roots = [1]\n").unwrap();

    lazytree(&home, &["print", "--data", path.to_str().unwrap()])
        .failure()
        .stderr(predicate::str::contains("Unknown record #1"));
}

#[test]
fn test_missing_hierarchy_file_is_reported() {
    let home = tempdir().unwrap();
    let path = home.path().join("missing.toml");

    lazytree(&home, &["print", "--data", path.to_str().unwrap()])
        .failure()
        .stderr(predicate::str::contains("Failed to read hierarchy"));
}
