//! `seen-tools init` / `config`

mod common;
use common::*;
use predicates::prelude::*;

const ENV_FILE: &str = ".skills-data/idea2mvp/.env";

#[test]
fn init_creates_layout_and_template() {
    let t = Tmp::new();
    t.cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("created config file"));

    for dir in [
        ".skills-data/idea2mvp/data/search-results",
        ".skills-data/idea2mvp/cache",
        ".skills-data/idea2mvp/logs",
    ] {
        assert!(t.abs(dir).is_dir(), "{dir} missing");
    }
    assert!(t.read(ENV_FILE).contains("# GITHUB_TOKEN=your_token_here"));

    t.cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("created config file").not());
}

#[test]
fn init_respects_skill_flag() {
    let t = Tmp::new();
    t.cmd().args(["--skill", "other", "init"]).assert().success();
    assert!(t.exists(".skills-data/other/.env"));
    assert!(!t.exists(".skills-data/idea2mvp"));
}

#[test]
fn config_layers_environment_over_file() {
    let t = Tmp::new();
    t.write(
        ENV_FILE,
        "GITHUB_TOKEN=from-file\nEMAIL_SMTP_HOST='smtp.example.com'\nSKIP_PH_API=false\n",
    );

    t.cmd()
        .env("SKIP_PH_API", "true")
        .env_remove("GITHUB_TOKEN")
        .env_remove("EMAIL_SMTP_HOST")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("GITHUB_TOKEN=******\t(.env)"))
        .stdout(predicate::str::contains("from-file").not())
        .stdout(predicate::str::contains(
            "EMAIL_SMTP_HOST=smtp.example.com\t(.env)",
        ))
        .stdout(predicate::str::contains("SKIP_PH_API=true\t(environment)"));

    // The file itself is never rewritten
    assert!(t.read(ENV_FILE).contains("SKIP_PH_API=false"));
}

#[test]
fn config_creates_missing_template() {
    let t = Tmp::new();
    t.cmd()
        .env_remove("PRODUCTHUNT_TOKEN")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("PRODUCTHUNT_TOKEN (unset)"));
    assert!(t.exists(ENV_FILE));
}

#[cfg(unix)]
#[test]
fn config_tolerates_non_unicode_environment() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let t = Tmp::new();
    t.write(ENV_FILE, "GITHUB_TOKEN=from-file\n");

    t.cmd()
        .env("SEEN_LATIN1_VALUE", OsStr::from_bytes(b"caf\xe9"))
        .env_remove("GITHUB_TOKEN")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("GITHUB_TOKEN=******\t(.env)"));
}
