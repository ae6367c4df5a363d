//! Human-readable output for the `read`, `check` and `config` commands.

use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::NaiveDate;

use seen_common::config::RECOGNIZED_KEYS;
use seen_common::{Settings, Source};

use crate::core::record::{contains_name, Record, DATE_FORMAT};

pub const EMPTY_HISTORY: &str = "(no recommendation history)";

/// Groups records by date, newest first. Within a date, log order is kept.
pub fn group_by_date(records: &[Record]) -> Vec<(NaiveDate, Vec<&Record>)> {
    let mut groups: BTreeMap<NaiveDate, Vec<&Record>> = BTreeMap::new();
    for record in records {
        groups.entry(record.date).or_default().push(record);
    }
    groups.into_iter().rev().collect()
}

pub fn render_listing(records: &[Record], retention_days: u32) -> String {
    if records.is_empty() {
        return format!("{EMPTY_HISTORY}\n");
    }

    let mut out = String::new();
    for (date, group) in group_by_date(records) {
        let _ = writeln!(out, "\n[{}]", date.format(DATE_FORMAT));
        for record in group {
            if record.desc.is_empty() {
                let _ = writeln!(out, "  • {}", record.name);
            } else {
                let _ = writeln!(out, "  • {} — {}", record.name, record.desc);
            }
        }
    }
    let _ = writeln!(
        out,
        "\n{} records (last {} days)",
        records.len(),
        retention_days
    );
    out
}

/// One `seen`/`new` line per queried name.
pub fn render_check(records: &[Record], names: &[String]) -> String {
    let mut out = String::new();
    for name in names {
        let status = if contains_name(records, name) {
            "seen"
        } else {
            "new"
        };
        let _ = writeln!(out, "{status}\t{}", name.trim());
    }
    out
}

/// Recognised settings, one per line. Secrets are masked.
pub fn render_settings(settings: &Settings) -> String {
    let mut out = String::new();
    for key in RECOGNIZED_KEYS {
        let source = match settings.source(key) {
            Some(Source::Outer) => "environment",
            Some(Source::EnvFile) => ".env",
            None => "",
        };
        match settings.get(key) {
            Some(_) if is_secret(key) => {
                let _ = writeln!(out, "{key}=******\t({source})");
            }
            Some(value) => {
                let _ = writeln!(out, "{key}={value}\t({source})");
            }
            None => {
                let _ = writeln!(out, "{key} (unset)");
            }
        }
    }
    out
}

fn is_secret(key: &str) -> bool {
    key.ends_with("_TOKEN") || key.ends_with("_PASSWORD")
}

#[cfg(test)]
mod tests {
    use super::*;
    use seen_common::EnvFile;

    fn record(date: &str, name: &str, desc: &str) -> Record {
        Record {
            date: NaiveDate::parse_from_str(date, DATE_FORMAT).unwrap(),
            name: name.to_string(),
            desc: desc.to_string(),
        }
    }

    #[test]
    fn empty_listing() {
        assert_eq!(render_listing(&[], 90), "(no recommendation history)\n");
    }

    #[test]
    fn newest_date_first_and_desc_optional() {
        let records = vec![
            record("2026-01-01", "Old", "first"),
            record("2026-02-01", "New", ""),
            record("2026-01-01", "Old2", "second"),
        ];
        assert_eq!(
            render_listing(&records, 90),
            "\n[2026-02-01]\n  • New\n\n[2026-01-01]\n  • Old — first\n  • Old2 — second\n\
             \n3 records (last 90 days)\n"
        );
    }

    #[test]
    fn check_marks_seen_names() {
        let records = vec![record("2026-01-01", "Notion", "")];
        let names = vec!["notion".to_string(), "Linear".to_string()];
        assert_eq!(render_check(&records, &names), "seen\tnotion\nnew\tLinear\n");
    }

    #[test]
    fn settings_mask_secrets() {
        let file = EnvFile::parse("GITHUB_TOKEN=ghp_secret\nEMAIL_SMTP_HOST=smtp.example.com\n").unwrap();
        let settings = Settings::layered(&file, [("SKIP_PH_API", "true")]);
        let out = render_settings(&settings);

        assert!(out.contains("GITHUB_TOKEN=******\t(.env)"));
        assert!(!out.contains("ghp_secret"));
        assert!(out.contains("EMAIL_SMTP_HOST=smtp.example.com\t(.env)"));
        assert!(out.contains("SKIP_PH_API=true\t(environment)"));
        assert!(out.contains("PRODUCTHUNT_TOKEN (unset)"));
    }
}
