//! Static host described by a TOML file.
//!
//! # Example
//!
//! ```toml
//! [site]
//! id = "main"
//! url = "https://wiki.example.com/"
//! home = "Main.WebHome"
//!
//! [[pages]]
//! reference = "Blog.Hello"
//! title = "Hello"
//! body = "Some *Markdown* body."
//! viewers = ["alice"]            # optional, public when absent
//!
//! [[pages.annotations]]
//! property = "site_name"
//! content = "Example Wiki"
//!
//! [[pages.attachments]]
//! filename = "cover.png"         # media type guessed unless `media_type` is set
//!
//! [pages.translations.fr]
//! title = "Bonjour"
//! body = "Un corps *Markdown*."
//! ```
//!
//! URLs follow `<url>/view/<Space>/<Page>` and
//! `<url>/download/<Space>/<Page>/<file>`; the base `url` takes no query
//! or fragment.

use std::{fs, path::Path};

use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use url::Url;

use super::{
    Attachment, Authorizer, HostError, Identity, PageHandle, PageRef, PageSource, SiteDescriptor,
    SiteDirectory,
};
use crate::config::ConfigError;
use crate::og::{PropertyRecord, RecordOutcome, RequestContext, SkipReason, property::classify};

const VIEW_ACTION: &str = "view";
const DOWNLOAD_ACTION: &str = "download";

// ============================================================================
// File format
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SiteFixture {
    pub site: SiteSection,
    #[serde(default)]
    pub pages: Vec<PageFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteSection {
    pub id: String,
    /// Base URL every page and attachment URL is built on.
    pub url: String,
    /// Path of the site's home page.
    pub home: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageFixture {
    pub reference: String,
    #[serde(default)]
    pub title: String,
    /// Markdown source of the page body.
    #[serde(default)]
    pub body: String,
    /// Users allowed to view the page; `None` makes it public.
    #[serde(default)]
    pub viewers: Option<Vec<String>>,
    #[serde(default)]
    pub annotations: Vec<PropertyRecord>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub translations: FxHashMap<String, TranslationFixture>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslationFixture {
    pub title: Option<String>,
    pub body: Option<String>,
}

/// An annotation record the resolver will skip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    pub page: PageRef,
    pub index: usize,
    pub reason: SkipReason,
}

// ============================================================================
// Host
// ============================================================================

/// In-memory host backed by a [`SiteFixture`].
#[derive(Debug, Clone)]
pub struct FixtureHost {
    site: SiteSection,
    base: Url,
    pages: FxHashMap<String, PageFixture>,
}

impl FixtureHost {
    /// Load a fixture file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::parse(&content)
    }

    /// Parse fixture TOML.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let fixture: SiteFixture = toml::from_str(content)?;
        Self::from_fixture(fixture)
    }

    pub fn from_fixture(fixture: SiteFixture) -> Result<Self, ConfigError> {
        let base = parse_base_url(&fixture.site.url)?;

        let mut pages = FxHashMap::default();
        for page in fixture.pages {
            if page.reference.split('.').all(str::is_empty) {
                return Err(ConfigError::Validation("page with an empty reference".into()));
            }
            if let Some(dup) = pages.insert(page.reference.clone(), page) {
                return Err(ConfigError::Validation(format!(
                    "page `{}` is defined twice",
                    dup.reference
                )));
            }
        }

        Ok(Self {
            site: fixture.site,
            base,
            pages,
        })
    }

    pub fn site_id(&self) -> &str {
        &self.site.id
    }

    pub fn home(&self) -> PageRef {
        self.page_ref(&self.site.home)
    }

    /// Reference of `path` on this site.
    pub fn page_ref(&self, path: &str) -> PageRef {
        PageRef::new(self.site.id.clone(), path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.pages.contains_key(path)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page references, sorted.
    pub fn references(&self) -> Vec<PageRef> {
        let mut refs: Vec<_> = self.pages.keys().map(|path| self.page_ref(path)).collect();
        refs.sort();
        refs
    }

    /// Annotation records the resolver would skip, by page then position.
    pub fn malformed_records(&self) -> Vec<MalformedRecord> {
        let mut found: Vec<_> = self
            .pages
            .values()
            .flat_map(|page| {
                page.annotations
                    .iter()
                    .enumerate()
                    .filter_map(move |(index, record)| match classify(record.clone()) {
                        RecordOutcome::Skip(reason) => Some(MalformedRecord {
                            page: self.page_ref(&page.reference),
                            index,
                            reason,
                        }),
                        RecordOutcome::Keep { .. } => None,
                    })
            })
            .collect();
        found.sort_by(|a, b| a.page.cmp(&b.page).then(a.index.cmp(&b.index)));
        found
    }

    fn page(&self, reference: &PageRef) -> Result<&PageFixture, HostError> {
        if reference.site != self.site.id {
            return Err(HostError::NotFound(format!("site `{}`", reference.site)));
        }
        self.pages
            .get(&reference.path)
            .ok_or_else(|| HostError::NotFound(format!("page `{reference}`")))
    }

    fn translation(&self, page: &PageHandle) -> Option<&TranslationFixture> {
        let locale = page.locale.as_ref()?;
        self.page(&page.reference).ok()?.translations.get(locale)
    }

    fn url_for(&self, action: &str, page: &PageRef, filename: Option<&str>) -> String {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(action).extend(page.segments());
            if let Some(filename) = filename {
                segments.push(filename);
            }
        }
        url.to_string()
    }
}

/// The base URL must be absolute http(s) so that segments can be appended.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::Validation(format!("site.url: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation(format!(
            "site.url: scheme '{}' not supported, must be http or https",
            url.scheme()
        )));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(ConfigError::Validation(
            "site.url: URL must have a valid host".into(),
        ));
    }
    // Page and attachment URLs are built by appending path segments.
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::Validation(
            "site.url: query and fragment are not allowed".into(),
        ));
    }
    Ok(url)
}

/// Render Markdown to plain text: inline text kept, markup dropped,
/// one line per block.
pub fn markdown_to_plain(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for event in Parser::new(source) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak => out.push(' '),
            Event::HardBreak => out.push('\n'),
            Event::InlineHtml(html) if is_line_break(&html) => out.push('\n'),
            Event::Start(Tag::Item | Tag::List(_)) => {
                if !out.is_empty() && !out.ends_with(char::is_whitespace) {
                    out.push('\n');
                }
            }
            Event::End(
                TagEnd::Paragraph
                | TagEnd::Heading(_)
                | TagEnd::Item
                | TagEnd::CodeBlock
                | TagEnd::BlockQuote(_),
            ) => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
    out
}

/// `<br>`, `<br/>` or `<br />`, any case.
fn is_line_break(html: &str) -> bool {
    let tag = html.trim().to_ascii_lowercase();
    tag.strip_prefix("<br")
        .map(|rest| rest.trim_start().trim_end_matches('>').trim_end())
        .is_some_and(|rest| matches!(rest, "" | "/"))
}

// ============================================================================
// Collaborator traits
// ============================================================================

impl PageSource for FixtureHost {
    fn current_page(&self, ctx: &RequestContext) -> PageHandle {
        PageHandle::new(ctx.page.clone())
    }

    fn translated_page(
        &self,
        page: &PageHandle,
        ctx: &RequestContext,
    ) -> Result<PageHandle, HostError> {
        let fixture = self.page(&page.reference)?;
        Ok(match &ctx.locale {
            Some(locale) if fixture.translations.contains_key(locale) => {
                PageHandle::new(page.reference.clone()).with_locale(locale.clone())
            }
            _ => PageHandle::new(page.reference.clone()),
        })
    }

    fn annotations(&self, page: &PageHandle, _ctx: &RequestContext) -> Vec<PropertyRecord> {
        self.page(&page.reference)
            .map(|p| p.annotations.clone())
            .unwrap_or_default()
    }

    fn rendered_title(&self, page: &PageHandle, _ctx: &RequestContext) -> String {
        if let Some(title) = self.translation(page).and_then(|t| t.title.clone()) {
            return title;
        }
        match self.page(&page.reference) {
            Ok(p) if !p.title.is_empty() => p.title.clone(),
            // Untitled pages show their name.
            _ => page
                .reference
                .segments()
                .last()
                .unwrap_or_default()
                .to_owned(),
        }
    }

    fn rendered_body(&self, page: &PageHandle, _ctx: &RequestContext) -> Result<String, HostError> {
        let fixture = self.page(&page.reference)?;
        let source = self
            .translation(page)
            .and_then(|t| t.body.as_deref())
            .unwrap_or(&fixture.body);
        Ok(markdown_to_plain(source))
    }

    fn view_url(&self, page: &PageHandle, _ctx: &RequestContext) -> String {
        self.url_for(VIEW_ACTION, &page.reference, None)
    }

    fn attachment_url(&self, page: &PageHandle, filename: &str, _ctx: &RequestContext) -> String {
        self.url_for(DOWNLOAD_ACTION, &page.reference, Some(filename))
    }

    fn attachments(&self, page: &PageHandle, _ctx: &RequestContext) -> Vec<Attachment> {
        self.page(&page.reference)
            .map(|p| p.attachments.clone())
            .unwrap_or_default()
    }
}

impl SiteDirectory for FixtureHost {
    fn descriptor(&self, site_id: &str) -> Result<SiteDescriptor, HostError> {
        if site_id != self.site.id {
            return Err(HostError::NotFound(format!("site `{site_id}`")));
        }
        Ok(SiteDescriptor {
            id: self.site.id.clone(),
            home_page: self.home(),
        })
    }
}

impl Authorizer for FixtureHost {
    fn can_view(&self, identity: &Identity, page: &PageRef) -> bool {
        let Ok(fixture) = self.page(page) else {
            // Missing pages are reported by the lookups that need them.
            return true;
        };
        match (&fixture.viewers, identity.name()) {
            (None, _) => true,
            (Some(viewers), Some(name)) => viewers.iter().any(|v| v == name),
            (Some(_), None) => false,
        }
    }
}
