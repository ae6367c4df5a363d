//! # Skill configuration
//!
//! Settings are resolved from layered sources, highest precedence first:
//! 1. Outer layer (process environment or a caller-supplied map)
//! 2. The skill's `.env` file
//! 3. Built-in defaults
//!
//! Nothing is written back into the process environment; callers receive a
//! [`Settings`] value and read from it.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};

use crate::paths::RuntimePaths;

pub const ENV_TEMPLATE: &str = "\
# idea2mvp configuration
# Platform tokens / API keys and user preferences live here

# Product Hunt Developer Token
# https://www.producthunt.com/v2/oauth/applications -> create app -> Developer Token
# PRODUCTHUNT_TOKEN=your_token_here

# Skip the Product Hunt API search (true falls back to web search)
# SKIP_PH_API=true

# GitHub Token (optional, raises the API rate limit)
# https://github.com/settings/tokens -> Generate new token
# GITHUB_TOKEN=your_token_here

# Skip the Xiaohongshu Playwright browser search
# SKIP_XHS_PLAYWRIGHT=true

# Mail notifications (search reports etc.)
# EMAIL_SMTP_HOST=smtp.qq.com
# EMAIL_SMTP_PORT=465
# EMAIL_SENDER=your_email@qq.com
# EMAIL_PASSWORD=your_auth_code
# EMAIL_RECEIVER=receiver@example.com
";

pub const PRODUCTHUNT_TOKEN: &str = "PRODUCTHUNT_TOKEN";
pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const SKIP_PH_API: &str = "SKIP_PH_API";
pub const SKIP_XHS_PLAYWRIGHT: &str = "SKIP_XHS_PLAYWRIGHT";
pub const EMAIL_SMTP_HOST: &str = "EMAIL_SMTP_HOST";
pub const EMAIL_SMTP_PORT: &str = "EMAIL_SMTP_PORT";
pub const EMAIL_SENDER: &str = "EMAIL_SENDER";
pub const EMAIL_PASSWORD: &str = "EMAIL_PASSWORD";
pub const EMAIL_RECEIVER: &str = "EMAIL_RECEIVER";

/// Keys documented in [`ENV_TEMPLATE`].
pub const RECOGNIZED_KEYS: &[&str] = &[
    PRODUCTHUNT_TOKEN,
    GITHUB_TOKEN,
    SKIP_PH_API,
    SKIP_XHS_PLAYWRIGHT,
    EMAIL_SMTP_HOST,
    EMAIL_SMTP_PORT,
    EMAIL_SENDER,
    EMAIL_PASSWORD,
    EMAIL_RECEIVER,
];

const DEFAULT_SMTP_PORT: u16 = 465;

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    EnvFile,
    Outer,
}

/// Parsed `KEY=VALUE` pairs of a `.env` file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    entries: Vec<(String, String)>,
}

impl EnvFile {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open config file '{}'", path.display()))?;
        Self::from_reader(file)
            .with_context(|| format!("failed to read config file '{}'", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Self::from_reader(text.as_bytes())
    }

    fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut entries = Vec::new();
        for line in BufReader::new(reader).lines() {
            if let Some(entry) = parse_line(&line?) {
                entries.push(entry);
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One `KEY=VALUE` line. Split on the first `=`; the value is kept literally
/// apart from trimming and surrounding quotes. Comments, blanks, lines
/// without `=` and empty keys yield `None`.
fn parse_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let Some((key, value)) = line.split_once('=') else {
        tracing::debug!(line, "skipping config line without '='");
        return None;
    };
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), strip_quotes(value.trim()).to_string()))
}

fn strip_quotes(value: &str) -> &str {
    value.trim_matches(|c| c == '\'' || c == '"')
}

/// Process environment as UTF-8 pairs. Non-Unicode entries are skipped.
pub fn process_env() -> Vec<(String, String)> {
    std::env::vars_os()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (key, _) => {
                tracing::debug!(key = ?key, "skipping non-Unicode environment entry");
                None
            }
        })
        .collect()
}

/// Resolved configuration for one skill.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    values: BTreeMap<String, (String, Source)>,
}

impl Settings {
    /// Merges file-backed defaults with an outer layer. Outer values win.
    pub fn layered<I, K, V>(file: &EnvFile, outer: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut values = BTreeMap::new();
        for (key, value) in file.entries() {
            values.insert(key.clone(), (value.clone(), Source::EnvFile));
        }
        for (key, value) in outer {
            values.insert(key.into(), (value.into(), Source::Outer));
        }
        Self { values }
    }

    /// Loads `<skill-dir>/.env` (creating it from the template when missing)
    /// and layers the process environment on top.
    pub fn load(paths: &RuntimePaths) -> Result<Self> {
        paths.ensure_env_file()?;
        let file = EnvFile::load(&paths.env_file())?;
        Ok(Self::layered(&file, process_env()))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|(value, _)| value.as_str())
            .filter(|value| !value.is_empty())
    }

    pub fn source(&self, key: &str) -> Option<Source> {
        self.values.get(key).map(|(_, source)| *source)
    }

    pub fn flag(&self, key: &str) -> bool {
        matches!(
            self.get(key).map(|v| v.to_ascii_lowercase()).as_deref(),
            Some("true" | "1" | "yes" | "on")
        )
    }

    pub fn producthunt_token(&self) -> Option<&str> {
        self.get(PRODUCTHUNT_TOKEN)
    }

    pub fn github_token(&self) -> Option<&str> {
        self.get(GITHUB_TOKEN)
    }

    pub fn skip_ph_api(&self) -> bool {
        self.flag(SKIP_PH_API)
    }

    pub fn skip_xhs_playwright(&self) -> bool {
        self.flag(SKIP_XHS_PLAYWRIGHT)
    }

    /// Mail settings, present only when every required key is set.
    pub fn email(&self) -> Result<Option<EmailSettings>> {
        let (Some(host), Some(sender), Some(password), Some(receiver)) = (
            self.get(EMAIL_SMTP_HOST),
            self.get(EMAIL_SENDER),
            self.get(EMAIL_PASSWORD),
            self.get(EMAIL_RECEIVER),
        ) else {
            return Ok(None);
        };
        let port = match self.get(EMAIL_SMTP_PORT) {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("{EMAIL_SMTP_PORT} is not a valid port: '{raw}'"))?,
            None => DEFAULT_SMTP_PORT,
        };
        Ok(Some(EmailSettings {
            smtp_host: host.to_string(),
            smtp_port: port,
            sender: sender.to_string(),
            password: password.to_string(),
            receiver: receiver.to_string(),
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub sender: String,
    pub password: String,
    pub receiver: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn parse_skips_comments_blanks_and_junk() {
        let file = EnvFile::parse(
            "# comment\n\nGITHUB_TOKEN=abc\nnot a pair\nSKIP_PH_API = true\n",
        )
        .unwrap();
        assert_eq!(
            file.entries(),
            &[
                ("GITHUB_TOKEN".to_string(), "abc".to_string()),
                ("SKIP_PH_API".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn parse_strips_quotes() {
        let file = EnvFile::parse("A=\"quoted\"\nB='single'\n").unwrap();
        assert_eq!(file.entries()[0].1, "quoted");
        assert_eq!(file.entries()[1].1, "single");
    }

    #[test]
    fn values_are_kept_literally() {
        let file = EnvFile::parse(
            "EMAIL_PASSWORD=ab$cd\n\
             EMAIL_SENDER=Jane Doe <j@x.com>\n\
             GITHUB_TOKEN=abc # note\n\
             MY-KEY=v\n\
             PATHY=C:\\new\n\
             URL=https://x.example/?a=b\n",
        )
        .unwrap();
        assert_eq!(
            file.entries(),
            &[
                ("EMAIL_PASSWORD".to_string(), "ab$cd".to_string()),
                ("EMAIL_SENDER".to_string(), "Jane Doe <j@x.com>".to_string()),
                ("GITHUB_TOKEN".to_string(), "abc # note".to_string()),
                ("MY-KEY".to_string(), "v".to_string()),
                ("PATHY".to_string(), "C:\\new".to_string()),
                ("URL".to_string(), "https://x.example/?a=b".to_string()),
            ]
        );
    }

    #[test]
    fn empty_keys_are_ignored() {
        let file = EnvFile::parse("=value\n  # indented comment\nA=\n").unwrap();
        assert_eq!(file.entries(), &[("A".to_string(), String::new())]);
    }

    #[test]
    fn template_has_no_active_entries() {
        assert!(EnvFile::parse(ENV_TEMPLATE).unwrap().is_empty());
    }

    #[test]
    fn outer_layer_wins_over_file() {
        let file = EnvFile::parse("GITHUB_TOKEN=from-file\nPRODUCTHUNT_TOKEN=ph\n").unwrap();
        let outer = HashMap::from([("GITHUB_TOKEN", "from-env")]);
        let settings = Settings::layered(&file, outer);

        assert_eq!(settings.github_token(), Some("from-env"));
        assert_eq!(settings.source(GITHUB_TOKEN), Some(Source::Outer));
        assert_eq!(settings.producthunt_token(), Some("ph"));
        assert_eq!(settings.source(PRODUCTHUNT_TOKEN), Some(Source::EnvFile));
    }

    #[test]
    fn flags_accept_common_truthy_values() {
        let file = EnvFile::parse("SKIP_PH_API=TRUE\nSKIP_XHS_PLAYWRIGHT=no\n").unwrap();
        let settings = Settings::layered(&file, Vec::<(String, String)>::new());
        assert!(settings.skip_ph_api());
        assert!(!settings.skip_xhs_playwright());
    }

    #[test]
    fn email_requires_all_fields() {
        let partial = EnvFile::parse("EMAIL_SMTP_HOST=smtp.example.com\n").unwrap();
        let settings = Settings::layered(&partial, Vec::<(String, String)>::new());
        assert_eq!(settings.email().unwrap(), None);

        let full = EnvFile::parse(
            "EMAIL_SMTP_HOST=smtp.example.com\nEMAIL_SENDER=a@example.com\n\
             EMAIL_PASSWORD=pw\nEMAIL_RECEIVER=b@example.com\n",
        )
        .unwrap();
        let settings = Settings::layered(&full, Vec::<(String, String)>::new());
        let email = settings.email().unwrap().unwrap();
        assert_eq!(email.smtp_port, 465);
        assert_eq!(email.receiver, "b@example.com");
    }

    #[test]
    fn bad_port_is_an_error() {
        let file = EnvFile::parse(
            "EMAIL_SMTP_HOST=h\nEMAIL_SMTP_PORT=abc\nEMAIL_SENDER=s\n\
             EMAIL_PASSWORD=p\nEMAIL_RECEIVER=r\n",
        )
        .unwrap();
        let settings = Settings::layered(&file, Vec::<(String, String)>::new());
        assert!(settings.email().is_err());
    }
}
