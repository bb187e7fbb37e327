use predicates::prelude::*;

use super::common::{COMPONENT_ROOT, TestEnv, component_archive};

#[test]
fn extract_unpacks_next_to_archive() {
  let env = TestEnv::empty();
  let archive = env.build_root().join("download.zip");
  std::fs::write(&archive, component_archive()).unwrap();

  env
    .compgen_cmd()
    .arg("extract")
    .arg(&archive)
    .assert()
    .success()
    .stdout(predicate::str::contains("Extracted"));

  assert!(env.build_root().join(COMPONENT_ROOT).join("style.css").is_file());
}

#[test]
fn extract_non_zip_fails_naming_the_path() {
  let env = TestEnv::empty();
  let bogus = env.build_root().join("bogus.zip");
  std::fs::write(&bogus, "definitely not a zip").unwrap();

  env
    .compgen_cmd()
    .arg("extract")
    .arg(&bogus)
    .assert()
    .failure()
    .stderr(predicate::str::contains("couldn't open the zip"))
    .stderr(predicate::str::contains(bogus.display().to_string()));
}
