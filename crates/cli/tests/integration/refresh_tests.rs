use predicates::prelude::*;

use super::common::{TestEnv, component_archive};

#[test]
fn refresh_fetches_and_builds_every_type() {
  let env = TestEnv::empty();
  let mut server = mockito::Server::new();
  let mock = server
    .mock("GET", "/zip/master")
    .with_status(200)
    .with_body(component_archive())
    .expect(1)
    .create();

  env
    .compgen_cmd()
    .env("COMPGEN_ARCHIVE_URL", format!("{}/zip/master", server.url()))
    .arg("refresh")
    .assert()
    .success()
    .stdout(predicate::str::contains("Refresh complete"));

  mock.assert();
  let root = env.build_root();
  assert!(root.join("theme-components-master.zip").is_file());
  assert!(root.join("blog/templates/index.html").is_file());
  assert!(root.join("portfolio/templates/index.html").is_file());
}

#[test]
fn second_refresh_skips_fresh_archive() {
  let env = TestEnv::empty();
  let mut server = mockito::Server::new();
  let mock = server
    .mock("GET", "/zip/master")
    .with_status(200)
    .with_body(component_archive())
    .expect(1)
    .create();
  let url = format!("{}/zip/master", server.url());

  env.compgen_cmd().env("COMPGEN_ARCHIVE_URL", &url).arg("refresh").assert().success();

  env
    .compgen_cmd()
    .env("COMPGEN_ARCHIVE_URL", &url)
    .arg("refresh")
    .assert()
    .success()
    .stdout(predicate::str::contains("nothing to do"));

  mock.assert();
}

#[test]
fn refresh_json_reports_outcome() {
  let env = TestEnv::empty();
  let mut server = mockito::Server::new();
  let _mock = server
    .mock("GET", "/zip/master")
    .with_status(200)
    .with_body(component_archive())
    .create();

  env
    .compgen_cmd()
    .env("COMPGEN_ARCHIVE_URL", format!("{}/zip/master", server.url()))
    .args(["refresh", "-o", "json"])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"outcome\": \"completed\""));
}

#[test]
fn refresh_with_corrupt_download_fails_cleanly() {
  let env = TestEnv::empty();
  let mut server = mockito::Server::new();
  let _mock = server
    .mock("GET", "/zip/master")
    .with_status(200)
    .with_body("<html>not a zip</html>")
    .create();

  env
    .compgen_cmd()
    .env("COMPGEN_ARCHIVE_URL", format!("{}/zip/master", server.url()))
    .args(["refresh", "--force"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Refresh failed"))
    .stderr(predicate::str::contains("theme-components-master.zip"));

  assert!(!env.build_root().join("theme-components-master.zip").exists());
}

#[test]
fn explicit_missing_config_file_is_an_error() {
  let env = TestEnv::empty();

  env
    .compgen_cmd()
    .args(["--config", "/nonexistent/compgen.toml", "refresh"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to load settings"));
}
