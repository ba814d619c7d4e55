//! Recording mock host for deterministic resolver tests.
//!
//! Implements every collaborator trait over in-memory fields, records each
//! call it receives, and can be told to fail a given lookup or to call back
//! into the resolver while rendering the body.

use std::cell::RefCell;

use super::{
    Attachment, Authorizer, HostError, Identity, PageHandle, PageRef, PageSource, SiteDescriptor,
    SiteDirectory,
};
use crate::og::{MetadataMap, MetadataResolver, PropertyRecord, RequestContext};

pub const SITE: &str = "xwiki";
pub const VIEW_URL: &str = "http://domain/uri";

/// Which collaborator call should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    Translation(HostError),
    SiteDescriptor(HostError),
    Body(HostError),
}

/// A collaborator call, as recorded by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CurrentPage,
    TranslatedPage,
    Annotations,
    RenderedTitle(Option<String>),
    RenderedBody(Option<String>),
    ViewUrl,
    AttachmentUrl(String),
    Attachments,
    Descriptor(String),
    CanView(Identity),
}

#[derive(Debug)]
pub struct MockHost {
    pub page: PageRef,
    pub home: PageRef,
    pub title: String,
    pub body: String,
    /// Title/body of the variant returned for a request with a locale.
    pub translation: Option<(String, String)>,
    pub annotations: Vec<PropertyRecord>,
    pub attachments: Vec<Attachment>,
    pub viewable: bool,
    pub fail_on: Option<FailOn>,
    /// Resolve the metadata again from inside `rendered_body`.
    pub reenter_on_render: bool,
    calls: RefCell<Vec<Call>>,
    nested: RefCell<Vec<MetadataMap>>,
}

impl Default for MockHost {
    fn default() -> Self {
        Self {
            page: PageRef::new(SITE, "Space.Doc"),
            home: PageRef::new(SITE, "Space.Main"),
            title: "my title".into(),
            // Wrapped in spaces to check that the description is trimmed.
            body: "  my content  ".into(),
            translation: None,
            annotations: Vec::new(),
            attachments: Vec::new(),
            viewable: true,
            fail_on: None,
            reenter_on_render: false,
            calls: RefCell::new(Vec::new()),
            nested: RefCell::new(Vec::new()),
        }
    }
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A request for the mock's page.
    pub fn context(&self) -> RequestContext {
        RequestContext::new(self.page.clone())
    }

    pub fn resolver(&self) -> MetadataResolver<'_> {
        MetadataResolver::new(self, self, self)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Results of the resolutions made from inside `rendered_body`.
    pub fn nested_results(&self) -> Vec<MetadataMap> {
        self.nested.borrow().clone()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl PageSource for MockHost {
    fn current_page(&self, _ctx: &RequestContext) -> PageHandle {
        self.record(Call::CurrentPage);
        PageHandle::new(self.page.clone())
    }

    fn translated_page(
        &self,
        page: &PageHandle,
        ctx: &RequestContext,
    ) -> Result<PageHandle, HostError> {
        self.record(Call::TranslatedPage);
        if let Some(FailOn::Translation(err)) = &self.fail_on {
            return Err(err.clone());
        }
        Ok(match &ctx.locale {
            Some(locale) => page.clone().with_locale(locale.clone()),
            None => page.clone(),
        })
    }

    fn annotations(&self, _page: &PageHandle, _ctx: &RequestContext) -> Vec<PropertyRecord> {
        self.record(Call::Annotations);
        self.annotations.clone()
    }

    fn rendered_title(&self, page: &PageHandle, _ctx: &RequestContext) -> String {
        self.record(Call::RenderedTitle(page.locale.clone()));
        match (&page.locale, &self.translation) {
            (Some(_), Some((title, _))) => title.clone(),
            _ => self.title.clone(),
        }
    }

    fn rendered_body(&self, page: &PageHandle, ctx: &RequestContext) -> Result<String, HostError> {
        self.record(Call::RenderedBody(page.locale.clone()));
        if let Some(FailOn::Body(err)) = &self.fail_on {
            return Err(err.clone());
        }
        if self.reenter_on_render {
            let nested = self.resolver().resolve(ctx);
            self.nested.borrow_mut().push(nested);
        }
        Ok(match (&page.locale, &self.translation) {
            (Some(_), Some((_, body))) => body.clone(),
            _ => self.body.clone(),
        })
    }

    fn view_url(&self, _page: &PageHandle, _ctx: &RequestContext) -> String {
        self.record(Call::ViewUrl);
        VIEW_URL.into()
    }

    fn attachment_url(&self, _page: &PageHandle, filename: &str, _ctx: &RequestContext) -> String {
        self.record(Call::AttachmentUrl(filename.into()));
        format!("http://domain/download/{filename}")
    }

    fn attachments(&self, _page: &PageHandle, _ctx: &RequestContext) -> Vec<Attachment> {
        self.record(Call::Attachments);
        self.attachments.clone()
    }
}

impl SiteDirectory for MockHost {
    fn descriptor(&self, site_id: &str) -> Result<SiteDescriptor, HostError> {
        self.record(Call::Descriptor(site_id.into()));
        if let Some(FailOn::SiteDescriptor(err)) = &self.fail_on {
            return Err(err.clone());
        }
        Ok(SiteDescriptor {
            id: site_id.into(),
            home_page: self.home.clone(),
        })
    }
}

impl Authorizer for MockHost {
    fn can_view(&self, identity: &Identity, _page: &PageRef) -> bool {
        self.record(Call::CanView(identity.clone()));
        self.viewable
    }
}
