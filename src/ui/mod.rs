//! Form and table interaction layer for the admin pages.
//!
//! The server renders plain HTML tagged with `data-*` markers; [`attach`]
//! scans a [`Document`] for those markers once and wires the matching
//! behaviors. Every behavior fails soft: a broken reference leaves the
//! element as plain HTML.

pub mod behaviors;
pub mod config;
pub mod dom;
pub mod events;
pub mod page;
pub mod registry;
pub mod timers;

pub use config::UiConfig;
pub use dom::{Document, El, ElementId, Validity};
pub use events::{handler, Event, EventKind, Handler, Target};
pub use page::Page;
pub use registry::{Attached, Binding, Registry, SkipReason};

/// Binds every standard behavior on the page.
pub fn attach(page: &mut Page) -> Attached {
    Registry::standard().attach(page)
}
