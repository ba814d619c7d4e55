//! Resolution failures that abort the whole merge.

use thiserror::Error;

use crate::host::{HostError, PageHandle, PageRef};

/// A collaborator failure the resolver cannot work around.
///
/// Malformed annotation records are not errors; they are skipped (see
/// [`RecordOutcome`](super::RecordOutcome)).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("failed to get the translated page for [{page}]")]
    Translation {
        page: PageRef,
        #[source]
        source: HostError,
    },

    #[error("failed to load the site descriptor for site [{site}] (page [{page}])")]
    SiteDescriptor {
        site: String,
        page: PageRef,
        #[source]
        source: HostError,
    },

    #[error("failed to render the content of page [{page}] as plain text")]
    Description {
        page: PageHandle,
        #[source]
        source: HostError,
    },
}

impl ResolveError {
    /// The page the failed resolution was about.
    pub fn page(&self) -> &PageRef {
        match self {
            Self::Translation { page, .. } | Self::SiteDescriptor { page, .. } => page,
            Self::Description { page, .. } => &page.reference,
        }
    }

    /// The collaborator failure behind this error.
    pub fn cause(&self) -> &HostError {
        match self {
            Self::Translation { source, .. }
            | Self::SiteDescriptor { source, .. }
            | Self::Description { source, .. } => source,
        }
    }
}
