//! `ogmeta validate`: report what the resolver would skip or miss.

use std::path::Path;

use anyhow::{Context, Result};

use crate::host::fixture::{FixtureHost, MalformedRecord};
use crate::log;
use crate::utils::plural_count;

/// Problems found in a site file.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub pages: usize,
    pub malformed: Vec<MalformedRecord>,
    pub missing_home: Option<String>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.malformed.is_empty() && self.missing_home.is_none()
    }

    pub fn problem_count(&self) -> usize {
        self.malformed.len() + usize::from(self.missing_home.is_some())
    }
}

/// Inspect a loaded site.
pub fn inspect(host: &FixtureHost) -> ValidationReport {
    let home = host.home();
    ValidationReport {
        pages: host.page_count(),
        malformed: host.malformed_records(),
        missing_home: (!host.contains(&home.path)).then(|| home.path),
    }
}

/// Load, inspect and print a report; returns whether the site is clean.
pub fn validate_site(path: &Path) -> Result<bool> {
    let host = FixtureHost::from_path(path)
        .with_context(|| format!("failed to load site `{}`", path.display()))?;
    let report = inspect(&host);

    log!("validate"; "checked {}", plural_count(report.pages, "page"));
    for record in &report.malformed {
        log!(
            "warning";
            "{}: annotation #{} has {} and will be skipped",
            record.page,
            record.index,
            record.reason.as_str()
        );
    }
    if let Some(home) = &report.missing_home {
        log!("warning"; "home page `{}` is not defined", home);
    }

    if report.is_clean() {
        log!("validate"; "no problems found");
    } else {
        log!("error"; "found {}", plural_count(report.problem_count(), "problem"));
    }
    Ok(report.is_clean())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::og::SkipReason;

    #[test]
    fn test_clean_site() {
        let host = FixtureHost::parse(
            "[site]\nid = \"s\"\nurl = \"https://x/\"\nhome = \"Main\"\n\
             [[pages]]\nreference = \"Main\"\n",
        )
        .unwrap();
        let report = inspect(&host);
        assert!(report.is_clean());
        assert_eq!(report.pages, 1);
        assert_eq!(report.problem_count(), 0);
    }

    #[test]
    fn test_reports_problems() {
        let host = FixtureHost::parse(
            r#"
[site]
id = "s"
url = "https://x/"
home = "Main"

[[pages]]
reference = "Doc"

[[pages.annotations]]
content = "no property"

[[pages.annotations]]
property = "title"
content = "fine"
"#,
        )
        .unwrap();
        let report = inspect(&host);
        assert!(!report.is_clean());
        assert_eq!(report.problem_count(), 2);
        assert_eq!(report.missing_home.as_deref(), Some("Main"));
        assert_eq!(report.malformed.len(), 1);
        assert_eq!(report.malformed[0].index, 0);
        assert_eq!(report.malformed[0].reason, SkipReason::MissingProperty);
    }

    #[test]
    fn test_validate_site_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_site(&dir.path().join("nope.toml")).is_err());
    }
}
