// Integration tests for `lineup browse` and `lineup now`.
use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::Value;

mod util;
use util::{FAT_DOG, SUPERGRASS, lineup, make_festival};

#[test]
fn browse_text_marks_selection_and_clashes() {
    let tmp = make_festival();

    lineup(&tmp)
        .args(["toggle", "lineup.txt", SUPERGRASS])
        .assert()
        .success();
    lineup(&tmp)
        .args(["toggle", "lineup.txt", FAT_DOG, "--on-conflict", "keep-both"])
        .assert()
        .success();

    lineup(&tmp)
        .args(["browse", "lineup.txt", "--day", "fri"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x] 12:00 - 13:00  Supergrass  1h 0m"))
        .stdout(predicate::str::contains("clashes with Fat Dog"))
        .stdout(predicate::str::contains("[ ] 13:30 - 14:30  Wet Leg"))
        .stdout(predicate::str::contains("Saturday").not());
}

#[test]
fn browse_search_is_case_insensitive() {
    let tmp = make_festival();

    lineup(&tmp)
        .args(["browse", "lineup.txt", "-q", "WET"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wet Leg"))
        .stdout(predicate::str::contains("Supergrass").not());
}

#[test]
fn browse_json_groups_day_then_stage() {
    let tmp = make_festival();

    let out = lineup(&tmp)
        .args(["browse", "lineup.txt", "--format", "json", "--stage", "Pyramid Stage"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: Value = serde_json::from_slice(&out).expect("json");

    let friday = &v["days"]["Friday 27 June"]["Pyramid Stage"];
    let artists: Vec<&str> = friday
        .as_array()
        .expect("array")
        .iter()
        .map(|p| p["artist"].as_str().unwrap())
        .collect();
    assert_eq!(artists, vec!["Supergrass", "Wet Leg"]);
    assert!(v["days"]["Friday 27 June"].get("Other Stage").is_none());
    assert_eq!(v["selected"], Value::Array(vec![]));
}

#[test]
fn browse_table_has_header() {
    let tmp = make_festival();

    lineup(&tmp)
        .args(["browse", "lineup.txt", "--format", "table"])
        .assert()
        .success()
        .stdout(predicate::str::contains("artist"))
        .stdout(predicate::str::contains("Rizzle Kicks"));
}

#[test]
fn browse_with_no_matches_says_so() {
    let tmp = make_festival();

    lineup(&tmp)
        .args(["browse", "lineup.txt", "-q", "nobody"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No performances match"));
}

#[test]
fn now_lists_acts_on_stage() {
    let tmp = make_festival();

    lineup(&tmp)
        .args(["now", "lineup.txt", "--day", "friday", "--time", "12:45"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Playing at 12:45"))
        .stdout(predicate::str::contains("Supergrass (Friday 27 June)  until 13:00"))
        .stdout(predicate::str::contains("Fat Dog (Friday 27 June)  until 13:15"));
}

#[test]
fn now_end_time_is_exclusive() {
    let tmp = make_festival();

    lineup(&tmp)
        .args(["now", "lineup.txt", "-d", "friday", "-t", "13:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fat Dog"))
        .stdout(predicate::str::contains("Supergrass").not());
}

#[test]
fn now_between_sets() {
    let tmp = make_festival();

    lineup(&tmp)
        .args(["now", "lineup.txt", "-d", "saturday", "-t", "09:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing is playing on saturday at 09:00."));
}

#[test]
fn now_rejects_bad_time() {
    let tmp = make_festival();

    lineup(&tmp)
        .args(["now", "lineup.txt", "-d", "friday", "-t", "9am"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --time"));
}
