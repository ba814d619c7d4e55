//! OpenGraph metadata derivation.
//!
//! | Module       | Purpose                                         |
//! |--------------|-------------------------------------------------|
//! | `property`   | annotation records, `og:` name normalization    |
//! | `map`        | `MetadataMap`, the resolver output              |
//! | `abbreviate` | description trimming and shortening             |
//! | `context`    | request context and re-entrancy guard           |
//! | `error`      | `ResolveError`                                  |
//! | `resolver`   | `MetadataResolver`: annotations + defaults      |
//! | `head`       | `<meta>` tag rendering                          |

pub mod abbreviate;
mod context;
mod error;
pub mod head;
mod map;
pub mod property;
mod resolver;

pub use context::RequestContext;
pub use head::render_meta_tags;
pub use map::MetadataMap;
pub use property::{PropertyRecord, RecordOutcome, SkipReason};
pub use resolver::MetadataResolver;
