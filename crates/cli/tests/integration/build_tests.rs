use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn build_blog_copies_templates() {
  let env = TestEnv::extracted();

  env
    .compgen_cmd()
    .args(["build", "blog"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Built blog"))
    .stdout(predicate::str::contains("sass_replace"));

  let target = env.build_root().join("blog");
  assert_eq!(
    std::fs::read_to_string(target.join("templates/index.html")).unwrap(),
    "<main>index</main>"
  );
  assert!(target.join("style.css").is_file());
  assert!(!target.join("README.md").exists());
  assert!(!target.join("configs").exists());
}

#[test]
fn build_reports_missing_templates() {
  let env = TestEnv::extracted();

  env
    .compgen_cmd()
    .args(["build", "portfolio"])
    .assert()
    .success()
    .stderr(predicate::str::contains("Templates not found"))
    .stdout(predicate::str::contains("gallery.html"));

  assert!(!env.build_root().join("portfolio/templates/gallery.html").exists());
}

#[test]
fn build_json_output_is_valid() {
  let env = TestEnv::extracted();

  let output = env
    .compgen_cmd()
    .args(["build", "blog", "-o", "json"])
    .assert()
    .success()
    .get_output()
    .stdout
    .clone();

  let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
  assert_eq!(report["build_type"], "blog");
  assert_eq!(report["templates_copied"], serde_json::json!(["index.html"]));
  assert_eq!(report["skipped"], serde_json::json!(["sass_replace"]));
}

#[test]
fn build_rejects_path_like_type() {
  let env = TestEnv::extracted();

  env
    .compgen_cmd()
    .args(["build", "../escape"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid build type name"));
}
