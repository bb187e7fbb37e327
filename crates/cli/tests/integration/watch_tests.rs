use predicates::prelude::*;

use super::common::{TestEnv, component_archive};

#[test]
fn watch_refreshes_once_while_archive_is_fresh() {
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
    .args(["watch", "--interval", "20ms", "--count", "3"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Refresh complete"));

  mock.assert();
  assert!(env.build_root().join("blog/templates/index.html").is_file());
}

#[test]
fn watch_rejects_bad_interval() {
  let env = TestEnv::empty();

  env
    .compgen_cmd()
    .args(["watch", "--interval", "soon"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("--interval"));
}
