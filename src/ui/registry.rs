//! Marker → behavior factory table, run once per page load.

use super::behaviors::{
    age, auto_submit, phone_mask, sidebar, social_fee, table_filter, toast, validation,
};
use super::dom::ElementId;
use super::events::{EventKind, Handler, ListenerId, Target};
use super::page::Page;
use super::timers::TimerId;
use std::cell::Cell;
use std::rc::Rc;
use thiserror::Error;
use tracing::debug;

/// Why a binding left its element unenhanced. Never surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("`{0}` does not name an element")]
    MissingAttribute(&'static str),
    #[error("referenced element `{0}` not found")]
    MissingTarget(String),
    #[error("no chart canvas in document")]
    MissingCanvas,
    #[error("no chart data supplied")]
    MissingChartData,
    #[error("no chart library available")]
    MissingChartLibrary,
}

pub type Factory = fn(&mut Page, ElementId) -> Result<Binding, SkipReason>;

/// Resolves the element named by the `marker` attribute on `element`,
/// e.g. `data-age-target="#idade"`.
pub fn referenced(
    page: &Page,
    element: ElementId,
    marker: &'static str,
) -> Result<ElementId, SkipReason> {
    let reference = page
        .document()
        .element(element)
        .attr(marker)
        .unwrap_or_default()
        .trim();
    if reference.is_empty() {
        return Err(SkipReason::MissingAttribute(marker));
    }
    page.document()
        .resolve(reference)
        .ok_or_else(|| SkipReason::MissingTarget(reference.to_string()))
}

/// Listeners and timers one behavior attached to one element.
#[derive(Debug)]
pub struct Binding {
    marker: &'static str,
    element: ElementId,
    listeners: Vec<ListenerId>,
    timers: Vec<TimerId>,
    live: Rc<Cell<bool>>,
}

impl Binding {
    pub fn new(marker: &'static str, element: ElementId) -> Self {
        Self {
            marker,
            element,
            listeners: Vec::new(),
            timers: Vec::new(),
            live: Rc::new(Cell::new(true)),
        }
    }

    pub fn marker(&self) -> &'static str {
        self.marker
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn listen(&mut self, page: &mut Page, target: Target, kind: EventKind, handler: Handler) {
        let id = page.add_listener(target, kind, handler);
        self.listeners.push(id);
    }

    pub fn track_timer(&mut self, id: TimerId) {
        self.timers.push(id);
    }

    /// Flag shared with deferred work scheduled outside [`Binding::track_timer`];
    /// it reads `false` once the binding is disposed.
    pub fn liveness(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.live)
    }

    pub fn dispose(self, page: &mut Page) {
        self.live.set(false);
        for id in self.listeners {
            page.remove_listener(id);
        }
        for id in self.timers {
            page.clear_timeout(id);
        }
    }
}

/// Every binding made by one [`Registry::attach`] call.
#[derive(Debug, Default)]
pub struct Attached {
    bindings: Vec<Binding>,
}

impl Attached {
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn dispose(self, page: &mut Page) {
        for binding in self.bindings {
            binding.dispose(page);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<(&'static str, Factory)>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The markers the admin pages render, in attach order.
    pub fn standard() -> Self {
        Self::new()
            .register(toast::MARKER, toast::bind)
            .register(table_filter::MARKER, table_filter::bind)
            .register(auto_submit::MARKER, auto_submit::bind)
            .register(validation::MARKER, validation::bind)
            .register(age::MARKER, age::bind)
            .register(phone_mask::MARKER, phone_mask::bind)
            .register(social_fee::MARKER, social_fee::bind)
            .register(sidebar::MARKER, sidebar::bind)
    }

    pub fn register(mut self, marker: &'static str, factory: Factory) -> Self {
        self.entries.push((marker, factory));
        self
    }

    pub fn markers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(marker, _)| *marker)
    }

    /// Scans the document once per marker and binds every match. Elements
    /// whose binding is skipped stay plain.
    pub fn attach(&self, page: &mut Page) -> Attached {
        let mut attached = Attached::default();
        for (marker, factory) in &self.entries {
            for element in page.document().with_attr(marker) {
                match factory(page, element) {
                    Ok(binding) => attached.bindings.push(binding),
                    Err(reason) => debug!(marker, ?element, %reason, "binding skipped"),
                }
            }
        }
        attached
    }
}
