//! Host collaborators.
//!
//! The resolver never loads, renders or authorizes anything by itself. A
//! content host hands those services in through three traits:
//!
//! | Trait           | Provides                                              |
//! |-----------------|-------------------------------------------------------|
//! | `PageSource`    | current page, translations, annotations, rendering, URLs, attachments |
//! | `SiteDirectory` | site descriptors (home page lookup)                   |
//! | `Authorizer`    | view permission checks                                |
//!
//! Every page-level call receives the [`RequestContext`] so that a host
//! renderer can call back into the resolver while rendering a body.
//!
//! `fixture` is a TOML-described static host used by the CLI.

pub mod fixture;
#[cfg(test)]
pub mod mock;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::og::RequestContext;
use crate::utils::mime;

// ============================================================================
// Errors
// ============================================================================

/// Failure reported by a host collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The requested page, site or translation does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rendering a title or body failed.
    #[error("rendering failed: {0}")]
    Render(String),

    /// Any other backend lookup failure.
    #[error("lookup failed: {0}")]
    Lookup(String),
}

// ============================================================================
// References and handles
// ============================================================================

/// Identifies a page within a site.
///
/// `path` is the dot-separated page path (`Space.Sub.Page`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PageRef {
    pub site: String,
    pub path: String,
}

impl PageRef {
    pub fn new(site: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            path: path.into(),
        }
    }

    /// Path segments (`Space`, `Sub`, `Page`).
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('.').filter(|s| !s.is_empty())
    }
}

impl fmt::Display for PageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.site, self.path)
    }
}

/// A page as loaded for one request, optionally in a given locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHandle {
    pub reference: PageRef,
    /// `None` for the default-language page.
    pub locale: Option<String>,
}

impl PageHandle {
    pub fn new(reference: PageRef) -> Self {
        Self {
            reference,
            locale: None,
        }
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }
}

impl fmt::Display for PageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.locale {
            Some(locale) => write!(f, "{} ({locale})", self.reference),
            None => write!(f, "{}", self.reference),
        }
    }
}

/// A file attached to a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    /// Declared media type; guessed from the file name when absent.
    #[serde(default)]
    pub media_type: Option<String>,
}

impl Attachment {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            media_type: None,
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn media_type(&self) -> &str {
        self.media_type
            .as_deref()
            .unwrap_or_else(|| mime::from_filename(&self.filename))
    }

    pub fn is_image(&self) -> bool {
        mime::is_image(self.media_type())
    }
}

/// Site-level information the resolver needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteDescriptor {
    pub id: String,
    pub home_page: PageRef,
}

/// Who is asking for the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Identity {
    #[default]
    Guest,
    User(String),
}

impl Identity {
    pub fn user(name: impl Into<String>) -> Self {
        Self::User(name.into())
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Guest => None,
            Self::User(name) => Some(name),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Guest => f.write_str("guest"),
            Self::User(name) => f.write_str(name),
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Page loading, rendering and URL generation.
pub trait PageSource {
    /// The page the request is about.
    fn current_page(&self, ctx: &RequestContext) -> PageHandle;

    /// The variant of `page` matching the request locale.
    fn translated_page(
        &self,
        page: &PageHandle,
        ctx: &RequestContext,
    ) -> Result<PageHandle, HostError>;

    /// OpenGraph annotation records of `page`, in storage order.
    fn annotations(&self, page: &PageHandle, ctx: &RequestContext) -> Vec<crate::og::PropertyRecord>;

    /// Title rendered to plain text.
    fn rendered_title(&self, page: &PageHandle, ctx: &RequestContext) -> String;

    /// Body rendered to plain text.
    fn rendered_body(&self, page: &PageHandle, ctx: &RequestContext) -> Result<String, HostError>;

    /// Absolute URL to view `page`.
    fn view_url(&self, page: &PageHandle, ctx: &RequestContext) -> String;

    /// Absolute URL to download attachment `filename` of `page`.
    fn attachment_url(&self, page: &PageHandle, filename: &str, ctx: &RequestContext) -> String;

    /// Attachments of `page`, in listing order.
    fn attachments(&self, page: &PageHandle, ctx: &RequestContext) -> Vec<Attachment>;
}

/// Site descriptor lookup.
pub trait SiteDirectory {
    fn descriptor(&self, site_id: &str) -> Result<SiteDescriptor, HostError>;
}

/// Access control.
pub trait Authorizer {
    fn can_view(&self, identity: &Identity, page: &PageRef) -> bool;
}
