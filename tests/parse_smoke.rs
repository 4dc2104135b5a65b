// Integration tests for `lineup parse`: text, JSON and skipped-line
// reporting, all against the sample lineup from util.rs.
use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use serde_json::Value;

mod util;
use util::{FAT_DOG, RIZZLE_KICKS, SUPERGRASS, WET_LEG, lineup, make_festival};

#[test]
fn parse_json_is_sorted_and_complete() {
    let tmp = make_festival();

    let out = lineup(&tmp)
        .args(["parse", "lineup.txt", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let v: Value = serde_json::from_slice(&out).expect("valid json");
    let items = v.as_array().expect("array");
    let ids: Vec<&str> = items.iter().map(|p| p["id"].as_str().unwrap()).collect();

    // Friday by start time, then Saturday
    assert_eq!(ids, vec![SUPERGRASS, FAT_DOG, WET_LEG, RIZZLE_KICKS]);

    let wet_leg = &items[2];
    assert_eq!(wet_leg["artist"], "Wet Leg");
    assert_eq!(wet_leg["stage"], "Pyramid Stage");
    assert_eq!(wet_leg["day"], "Friday 27 June");
    assert_eq!(wet_leg["startTime"], "13:30");
    assert_eq!(wet_leg["endTime"], "14:30");
    assert_eq!(wet_leg["duration"], 60);
    assert_eq!(wet_leg["isPictured"], true);
    assert_eq!(items[0]["isPictured"], false);
}

#[test]
fn parse_text_groups_by_day() {
    let tmp = make_festival();

    lineup(&tmp)
        .args(["parse", "lineup.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Friday 27 June"))
        .stdout(predicate::str::contains("12:00 - 13:00  Supergrass (Pyramid Stage)"))
        .stdout(predicate::str::contains(RIZZLE_KICKS))
        .stderr(predicate::str::contains("4 performances across 2 days on 2 stages"));
}

#[test]
fn show_skipped_reports_noise_and_title() {
    let tmp = make_festival();

    lineup(&tmp)
        .args(["parse", "lineup.txt", "--json", "--show-skipped"])
        .assert()
        .success()
        .stderr(predicate::str::contains("line 1: Glastonbury 2025"))
        .stderr(predicate::str::contains("this line is noise"));
}

#[test]
fn configured_title_line_is_not_reported() {
    let tmp = make_festival();
    tmp.child("lineup.toml")
        .write_str("[parser]\ntitle_line = \"Glastonbury 2025\"\n")
        .expect("write config");

    lineup(&tmp)
        .args(["parse", "lineup.txt", "--json", "--show-skipped"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Glastonbury 2025").not())
        .stderr(predicate::str::contains("this line is noise"));
}

#[test]
fn missing_lineup_file_fails() {
    let tmp = make_festival();

    lineup(&tmp)
        .args(["parse", "nope.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.txt"));
}

#[test]
fn empty_lineup_parses_to_empty_array() {
    let tmp = make_festival();
    tmp.child("empty.txt").write_str("").expect("write");

    lineup(&tmp)
        .args(["parse", "empty.txt", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[]"));
}
