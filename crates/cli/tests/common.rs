//! Common helpers for seen-tools integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use chrono::{Days, Local, NaiveDate};

pub const DATA_DIR: &str = ".skills-data/idea2mvp/data";
pub const LOG: &str = ".skills-data/idea2mvp/data/seen-tools.jsonl";
pub const LEGACY: &str = ".skills-data/idea2mvp/data/seen-tools.md";

pub struct Tmp {
    pub dir: tempfile::TempDir,
}

impl Tmp {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn abs(&self, rel: &str) -> PathBuf {
        self.path().join(rel)
    }

    pub fn write(&self, rel: &str, data: &str) {
        let p = self.abs(rel);
        if let Some(parent) = p.parent() {
            fs::create_dir_all(parent).ok();
        }
        fs::write(p, data).unwrap();
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.abs(rel)).unwrap()
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.abs(rel).exists()
    }

    /// `seen-tools` running inside this temp project.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("seen-tools").unwrap();
        cmd.current_dir(self.path());
        cmd.env_remove("RUST_LOG");
        cmd
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn days_ago(days: u64) -> String {
    today()
        .checked_sub_days(Days::new(days))
        .unwrap()
        .format("%Y-%m-%d")
        .to_string()
}

pub fn line(date: &str, name: &str, desc: &str) -> String {
    format!("{{\"date\":\"{date}\",\"name\":\"{name}\",\"desc\":\"{desc}\"}}\n")
}
