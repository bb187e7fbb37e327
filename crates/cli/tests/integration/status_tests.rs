use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn status_without_archive_suggests_refresh() {
  let env = TestEnv::empty();

  env
    .compgen_cmd()
    .arg("status")
    .assert()
    .success()
    .stdout(predicate::str::contains("No component archive downloaded yet"));
}

#[test]
fn status_lists_available_types() {
  let env = TestEnv::extracted();
  std::fs::write(env.build_root().join("theme-components-master.zip"), "zip").unwrap();

  env
    .compgen_cmd()
    .arg("status")
    .assert()
    .success()
    .stdout(predicate::str::contains("fresh"))
    .stdout(predicate::str::contains("blog"))
    .stdout(predicate::str::contains("portfolio"));
}

#[test]
fn status_json_reports_stale_state() {
  let env = TestEnv::extracted();

  let output = env
    .compgen_cmd()
    .args(["status", "-o", "json"])
    .assert()
    .success()
    .get_output()
    .stdout
    .clone();

  let status: serde_json::Value = serde_json::from_slice(&output).unwrap();
  assert_eq!(status["state"], "stale");
  assert_eq!(status["age_secs"], serde_json::Value::Null);
  assert_eq!(status["types"], serde_json::json!(["blog", "portfolio"]));
}
