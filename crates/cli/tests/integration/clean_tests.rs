use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn clean_single_type() {
  let env = TestEnv::extracted();
  env.compgen_cmd().args(["build", "blog"]).assert().success();

  env
    .compgen_cmd()
    .args(["clean", "blog"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Removed 1 path(s)"));

  assert!(!env.build_root().join("blog").exists());
  assert!(env.build_root().join("theme-components-master").exists());
}

#[test]
fn clean_everything() {
  let env = TestEnv::extracted();
  env.compgen_cmd().args(["build", "blog"]).assert().success();

  env.compgen_cmd().arg("clean").assert().success();

  assert!(!env.build_root().join("blog").exists());
  assert!(!env.build_root().join("theme-components-master").exists());
}

#[test]
fn clean_with_nothing_built() {
  let env = TestEnv::empty();

  env
    .compgen_cmd()
    .args(["clean", "blog"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Nothing to clean"));
}
