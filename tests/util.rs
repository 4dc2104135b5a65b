//! Shared test utilities for integration tests
//!
//! Provides the sample lineup and a preconfigured command builder
//! used across multiple test files.

#![allow(dead_code)]

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use std::process::Command;

/// Two days, two stages, one clash (Supergrass vs Fat Dog), one noise line
/// and a title line the default parser does not know about.
pub const LINEUP: &str = "\
Glastonbury 2025

Pyramid Stage - Friday 27 June
Supergrass: 12:00 - 13:00
Wet Leg: 13:30 - 14:30 (pictured)

Other Stage - Friday 27 June
Fat Dog: 12:30 - 13:15

this line is noise

Pyramid Stage - Saturday 28 June
Rizzle Kicks: 11:30 - 12:15
";

pub const SUPERGRASS: &str = "pyramid-stage-friday-27-june-supergrass-12:00";
pub const WET_LEG: &str = "pyramid-stage-friday-27-june-wet-leg-13:30";
pub const FAT_DOG: &str = "other-stage-friday-27-june-fat-dog-12:30";
pub const RIZZLE_KICKS: &str = "pyramid-stage-saturday-28-june-rizzle-kicks-11:30";

/// Temp dir holding `lineup.txt`.
pub fn make_festival() -> assert_fs::TempDir
{
    // Initialize the temporary working directory
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    tmp.child("lineup.txt")
        .write_str(LINEUP)
        .expect("write lineup");

    tmp
}

/// `lineup` running inside `tmp`, uncolored, with selections kept in
/// `tmp/selections.json`.
pub fn lineup(tmp: &assert_fs::TempDir) -> Command
{
    let mut cmd = Command::cargo_bin("lineup").expect("bin");
    cmd.current_dir(tmp.path())
        .env_remove("RUST_LOG")
        .arg("--no-color")
        .arg("--selections")
        .arg(tmp.path().join("selections.json"));
    cmd
}

/// Saved selection ids, in file order.
pub fn saved_ids(tmp: &assert_fs::TempDir) -> Vec<String>
{
    let text = std::fs::read_to_string(tmp.path().join("selections.json")).expect("read selections");
    serde_json::from_str(&text).expect("selections json")
}
