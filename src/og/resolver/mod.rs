//! OpenGraph metadata resolution for the current page.
//!
//! ```text
//! resolve(ctx)
//!   ├─ marker set?        → {}   (re-entrant call from body rendering)
//!   ├─ cannot view page?  → {}
//!   └─ guard { merge }    → annotations, then defaults for missing keys
//!                           lookup failure → log + {}
//! ```
//!
//! Rendering the body for `og:description` may render macros that ask for
//! the page metadata again. The marker on [`RequestContext`] turns that
//! nested call into a no-op instead of an endless recursion.


use crate::config::DefaultsConfig;
use crate::host::{Authorizer, PageHandle, PageSource, SiteDescriptor, SiteDirectory};
use crate::{debug, log};

use super::abbreviate::describe;
use super::context::RequestContext;
use super::error::ResolveError;
use super::map::MetadataMap;
use super::property::{
    OG_DESCRIPTION, OG_IMAGE, OG_TITLE, OG_TYPE, OG_URL, RecordOutcome, classify,
};

/// Computes the OpenGraph properties of the page a request is about.
pub struct MetadataResolver<'h> {
    pages: &'h dyn PageSource,
    sites: &'h dyn SiteDirectory,
    auth: &'h dyn Authorizer,
    defaults: DefaultsConfig,
}

impl<'h> MetadataResolver<'h> {
    pub fn new(
        pages: &'h dyn PageSource,
        sites: &'h dyn SiteDirectory,
        auth: &'h dyn Authorizer,
    ) -> Self {
        Self {
            pages,
            sites,
            auth,
            defaults: DefaultsConfig::default(),
        }
    }

    /// Use `defaults` instead of the built-in default settings.
    pub fn with_defaults(mut self, defaults: DefaultsConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// Resolve the metadata of the current page.
    ///
    /// Never fails: re-entrant calls, denied access and lookup failures
    /// all yield an empty map. Lookup failures are logged.
    pub fn resolve(&self, ctx: &RequestContext) -> MetadataMap {
        self.try_resolve(ctx).unwrap_or_else(|err| {
            log!("og"; "{}: {}", err, err.cause());
            MetadataMap::new()
        })
    }

    /// Like [`resolve`](Self::resolve), but hands lookup failures back.
    ///
    /// Re-entrant calls and denied access still give `Ok` with an empty map.
    pub fn try_resolve(&self, ctx: &RequestContext) -> Result<MetadataMap, ResolveError> {
        if ctx.is_resolving() {
            return Ok(MetadataMap::new());
        }

        let page = self.pages.current_page(ctx);
        if !self.auth.can_view(&ctx.identity, &page.reference) {
            return Ok(MetadataMap::new());
        }

        let Some(_guard) = ctx.enter_resolution() else {
            return Ok(MetadataMap::new());
        };
        self.merge(&page, ctx)
    }

    fn merge(&self, page: &PageHandle, ctx: &RequestContext) -> Result<MetadataMap, ResolveError> {
        let translated = self.pages.translated_page(page, ctx).map_err(|source| {
            ResolveError::Translation {
                page: page.reference.clone(),
                source,
            }
        })?;
        let site = self.load_site(page, ctx)?;

        let mut metas = MetadataMap::new();
        for (index, record) in self.pages.annotations(page, ctx).into_iter().enumerate() {
            match classify(record) {
                RecordOutcome::Keep { key, content } => metas.append(key, content),
                RecordOutcome::Skip(reason) => {
                    debug!("og"; "skipping annotation #{} of [{}]: {}", index, page.reference, reason.as_str());
                }
            }
        }

        metas.fill(OG_URL, || self.pages.view_url(page, ctx));
        metas.fill(OG_TYPE, || self.defaults.og_type.clone());
        metas.fill(OG_TITLE, || self.pages.rendered_title(&translated, ctx));
        metas.fill_with(OG_DESCRIPTION, || {
            self.pages
                .rendered_body(&translated, ctx)
                .map(|body| vec![describe(&body, self.defaults.description_limit)])
                .map_err(|source| ResolveError::Description {
                    page: translated.clone(),
                    source,
                })
        })?;

        if self.defaults.images && site.home_page != page.reference {
            metas.fill_all(OG_IMAGE, || self.image_urls(page, ctx));
        }

        Ok(metas)
    }

    fn load_site(
        &self,
        page: &PageHandle,
        ctx: &RequestContext,
    ) -> Result<SiteDescriptor, ResolveError> {
        self.sites
            .descriptor(&ctx.site_id)
            .map_err(|source| ResolveError::SiteDescriptor {
                site: ctx.site_id.clone(),
                page: page.reference.clone(),
                source,
            })
    }

    /// Download URLs of every image attachment, in listing order.
    fn image_urls(&self, page: &PageHandle, ctx: &RequestContext) -> Vec<String> {
        self.pages
            .attachments(page, ctx)
            .iter()
            .filter(|attachment| attachment.is_image())
            .map(|image| self.pages.attachment_url(page, &image.filename, ctx))
            .collect()
    }
}
