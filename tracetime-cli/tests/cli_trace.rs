use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn trace_prints_segment_and_total_lines() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tracetime"));
    cmd.args(["trace", "--segments", "1", "--segment-ms", "50", "--gap-ms", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("segment duration: 00:00:00."))
        .stdout(predicate::str::contains("run record"))
        .stdout(predicate::str::contains("total time: 00:00:00."));
}

#[test]
fn trace_without_record_skips_the_report() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tracetime"));
    cmd.args([
        "trace",
        "--segments",
        "1",
        "--segment-ms",
        "20",
        "--gap-ms",
        "10",
        "--no-record",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("run record").not())
    .stdout(predicate::str::contains("total time: 00:00:00."));
}
