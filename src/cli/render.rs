//! `ogmeta render`: resolve one page and print its tags.

use anyhow::{Context, Result, bail};

use super::args::{OutputFormat, RenderArgs};
use crate::config::OgConfig;
use crate::host::Identity;
use crate::host::fixture::FixtureHost;
use crate::og::{MetadataResolver, RequestContext, render_meta_tags};
use crate::debug;

/// Resolve the page named in `args` and format the result.
pub fn render_page(args: &RenderArgs, config: &OgConfig) -> Result<String> {
    let host = FixtureHost::from_path(&args.site)
        .with_context(|| format!("failed to load site `{}`", args.site.display()))?;

    if !host.contains(&args.page) {
        bail!(
            "page `{}` does not exist in site `{}`",
            args.page,
            host.site_id()
        );
    }

    let mut ctx = RequestContext::new(host.page_ref(&args.page));
    if let Some(user) = &args.user {
        ctx = ctx.with_identity(Identity::user(user.clone()));
    }
    if let Some(locale) = &args.locale {
        ctx = ctx.with_locale(locale.clone());
    }
    debug!("og"; "resolving {} as {}", ctx.page, ctx.identity);

    let metas = MetadataResolver::new(&host, &host, &host)
        .with_defaults(config.defaults.clone())
        .resolve(&ctx);

    match args.format {
        OutputFormat::Html => Ok(render_meta_tags(&metas)),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&metas)?;
            json.push('\n');
            Ok(json)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    const SITE: &str = r#"
[site]
id = "main"
url = "https://wiki.example.com/"
home = "Main.WebHome"

[[pages]]
reference = "Blog.Hello"
title = "Hello & welcome"
body = "First post."

[[pages]]
reference = "Team.Private"
title = "Private"
viewers = ["alice"]
"#;

    fn site_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SITE.as_bytes()).unwrap();
        file
    }

    fn args(site: &Path, page: &str) -> RenderArgs {
        RenderArgs {
            site: site.to_path_buf(),
            page: page.into(),
            user: None,
            locale: None,
            format: OutputFormat::Html,
        }
    }

    #[test]
    fn test_render_html() {
        let file = site_file();
        let out = render_page(&args(file.path(), "Blog.Hello"), &OgConfig::default()).unwrap();
        assert_eq!(
            out,
            concat!(
                "<meta property=\"og:title\" content=\"Hello &amp; welcome\">\n",
                "<meta property=\"og:type\" content=\"article\">\n",
                "<meta property=\"og:url\" content=\"https://wiki.example.com/view/Blog/Hello\">\n",
                "<meta property=\"og:description\" content=\"First post.\">\n",
            )
        );
    }

    #[test]
    fn test_render_json_uses_config() {
        let file = site_file();
        let mut config = OgConfig::default();
        config.defaults.og_type = "website".into();
        let mut args = args(file.path(), "Blog.Hello");
        args.format = OutputFormat::Json;

        let out = render_page(&args, &config).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["og:type"], serde_json::json!(["website"]));
        assert_eq!(value["og:title"], serde_json::json!(["Hello & welcome"]));
    }

    #[test]
    fn test_render_private_page_as_guest_is_empty() {
        let file = site_file();
        let out = render_page(&args(file.path(), "Team.Private"), &OgConfig::default()).unwrap();
        assert_eq!(out, "");

        let mut args = args(file.path(), "Team.Private");
        args.user = Some("alice".into());
        let out = render_page(&args, &OgConfig::default()).unwrap();
        assert!(out.contains("content=\"Private\""));
    }

    #[test]
    fn test_render_unknown_page_fails() {
        let file = site_file();
        let err = render_page(&args(file.path(), "Nope"), &OgConfig::default()).unwrap_err();
        assert!(err.to_string().contains("`Nope`"));
    }

    #[test]
    fn test_render_missing_site_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("site.toml");
        let err = render_page(&args(&missing, "Blog.Hello"), &OgConfig::default()).unwrap_err();
        assert!(err.to_string().contains("failed to load site"));
    }
}
