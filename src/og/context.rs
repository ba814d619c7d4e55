//! Request-scoped state and the re-entrancy guard.

use std::cell::Cell;

use crate::host::{Identity, PageRef};

/// Everything the resolver knows about the request being served.
///
/// The context is `!Sync`: one resolution per request at a time.
#[derive(Debug)]
pub struct RequestContext {
    pub site_id: String,
    pub identity: Identity,
    /// Requested locale; `None` means the default language.
    pub locale: Option<String>,
    pub page: PageRef,
    /// Set while metadata of this request is being resolved.
    resolving: Cell<bool>,
}

impl RequestContext {
    pub fn new(page: PageRef) -> Self {
        Self {
            site_id: page.site.clone(),
            identity: Identity::Guest,
            locale: None,
            page,
            resolving: Cell::new(false),
        }
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_site(mut self, site_id: impl Into<String>) -> Self {
        self.site_id = site_id.into();
        self
    }

    /// Whether a resolution is already running for this request.
    pub fn is_resolving(&self) -> bool {
        self.resolving.get()
    }

    /// Mark the request as resolving until the returned guard is dropped.
    ///
    /// Returns `None` when the marker is already set.
    pub fn enter_resolution(&self) -> Option<ResolvingGuard<'_>> {
        if self.resolving.replace(true) {
            return None;
        }
        Some(ResolvingGuard {
            flag: &self.resolving,
        })
    }
}

/// Clears the resolving marker on drop, whatever the exit path.
#[must_use = "the marker is cleared as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ResolvingGuard<'a> {
    flag: &'a Cell<bool>,
}

impl Drop for ResolvingGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RequestContext {
        RequestContext::new(PageRef::new("main", "Space.Doc"))
    }

    #[test]
    fn test_new_context_is_idle() {
        let ctx = ctx();
        assert!(!ctx.is_resolving());
        assert_eq!(ctx.site_id, "main");
        assert_eq!(ctx.identity, Identity::Guest);
    }

    #[test]
    fn test_guard_sets_and_clears() {
        let ctx = ctx();
        {
            let _guard = ctx.enter_resolution().unwrap();
            assert!(ctx.is_resolving());
            assert!(ctx.enter_resolution().is_none());
            // The refused attempt must not clear the marker.
            assert!(ctx.is_resolving());
        }
        assert!(!ctx.is_resolving());
    }

    #[test]
    fn test_guard_clears_on_early_return() {
        fn fails(ctx: &RequestContext) -> Result<(), &'static str> {
            let _guard = ctx.enter_resolution().ok_or("busy")?;
            Err("lookup failed")
        }

        let ctx = ctx();
        assert_eq!(fails(&ctx), Err("lookup failed"));
        assert!(!ctx.is_resolving());
    }

    #[test]
    fn test_guard_clears_on_panic() {
        let ctx = ctx();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = ctx.enter_resolution().unwrap();
            panic!("renderer blew up");
        }));
        assert!(result.is_err());
        assert!(!ctx.is_resolving());
    }
}
