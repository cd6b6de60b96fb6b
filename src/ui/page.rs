//! Single-threaded page runtime: document, listeners, virtual clock.
//!
//! Handlers receive `&mut Page` and run to completion. Timers only fire
//! inside [`Page::advance_time`]. The interaction helpers (`type_text`,
//! `set_checked`, `click`, ...) mimic what a browser dispatches for the
//! corresponding user gesture.

use super::config::UiConfig;
use super::dom::{Document, ElementId};
use super::events::{Event, EventKind, Handler, ListenerId, ListenerStore, Target};
use super::timers::{TimerId, TimerQueue};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;

const DEFAULT_VIEWPORT_WIDTH: u32 = 1280;

#[derive(Debug)]
pub struct Page {
    document: Document,
    listeners: ListenerStore,
    timers: TimerQueue,
    config: UiConfig,
    today: NaiveDate,
    viewport_width: u32,
    dispatching: HashSet<(Target, EventKind)>,
    submissions: Vec<ElementId>,
}

impl Page {
    pub fn new(document: Document, today: NaiveDate) -> Self {
        Self {
            document,
            listeners: ListenerStore::default(),
            timers: TimerQueue::default(),
            config: UiConfig::default(),
            today,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            dispatching: HashSet::new(),
            submissions: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: UiConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_viewport_width(mut self, width: u32) -> Self {
        self.viewport_width = width;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    pub fn add_listener(&mut self, target: Target, kind: EventKind, handler: Handler) -> ListenerId {
        self.listeners.add(target, kind, handler)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Runs every listener for `(target, kind)`. A dispatch for a pair that is
    /// already being dispatched further up the stack is dropped and reports
    /// `false`.
    pub fn dispatch(&mut self, target: Target, kind: EventKind) -> bool {
        let key = (target, kind);
        if !self.dispatching.insert(key) {
            debug!(%kind, ?target, "dropping re-entrant dispatch");
            return false;
        }

        let event = Event { kind, target };
        for handler in self.listeners.handlers(target, kind) {
            handler(self, &event);
        }

        self.dispatching.remove(&key);
        true
    }

    pub fn dispatch_to(&mut self, element: ElementId, kind: EventKind) -> bool {
        self.dispatch(Target::Element(element), kind)
    }

    pub fn set_timeout<F>(&mut self, delay: Duration, callback: F) -> TimerId
    where
        F: FnOnce(&mut Page) + 'static,
    {
        self.timers.schedule(delay, Box::new(callback))
    }

    pub fn clear_timeout(&mut self, id: TimerId) -> bool {
        self.timers.cancel(id)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    /// Moves the clock forward, firing every timer that comes due, including
    /// timers scheduled by callbacks within the window.
    pub fn advance_time(&mut self, delta: Duration) -> usize {
        let delta_ms = u64::try_from(delta.as_millis()).unwrap_or(u64::MAX);
        let target = self.timers.now_ms().saturating_add(delta_ms);
        let mut ran = 0;
        while let Some(callback) = self.timers.pop_due(target) {
            callback(self);
            ran += 1;
        }
        self.timers.set_now(target);
        ran
    }

    pub fn submit_form(&mut self, form: ElementId) {
        debug!(?form, "form submitted");
        self.submissions.push(form);
    }

    pub fn take_submissions(&mut self) -> Vec<ElementId> {
        std::mem::take(&mut self.submissions)
    }

    /// Replaces the value as typing would and fires `input`. Readonly fields
    /// ignore typing.
    pub fn type_text(&mut self, element: ElementId, text: &str) {
        if self.document.element(element).readonly() {
            return;
        }
        self.document.element_mut(element).set_value(text);
        self.dispatch_to(element, EventKind::Input);
    }

    /// Sets a value the way a picker or select commits it: `input` then `change`.
    pub fn commit_value(&mut self, element: ElementId, value: &str) {
        if self.document.element(element).readonly() {
            return;
        }
        self.document.element_mut(element).set_value(value);
        self.dispatch_to(element, EventKind::Input);
        self.dispatch_to(element, EventKind::Change);
    }

    pub fn set_checked(&mut self, element: ElementId, checked: bool) {
        if self.document.element(element).checked() == checked {
            return;
        }
        self.document.element_mut(element).set_checked(checked);
        self.dispatch_to(element, EventKind::Input);
        self.dispatch_to(element, EventKind::Change);
    }

    pub fn click(&mut self, element: ElementId) {
        self.dispatch_to(element, EventKind::Click);
    }

    pub fn blur(&mut self, element: ElementId) {
        self.dispatch_to(element, EventKind::Blur);
    }

    pub fn resize(&mut self, width: u32) {
        self.viewport_width = width;
        self.dispatch(Target::Window, EventKind::Resize);
    }

    /// Native `checkValidity()`: fires `invalid` on failure and reports the
    /// validity after listeners ran.
    pub fn check_validity(&mut self, element: ElementId) -> bool {
        if self.document.element(element).validity().is_valid() {
            return true;
        }
        self.dispatch_to(element, EventKind::Invalid);
        false
    }
}
