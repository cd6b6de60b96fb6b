//! Flash notifications: shown on load, removed on close or after a delay.

use crate::ui::dom::ElementId;
use crate::ui::events::{handler, EventKind, Target};
use crate::ui::page::Page;
use crate::ui::registry::{Binding, SkipReason};
use std::cell::Cell;
use std::rc::Rc;

pub const MARKER: &str = "data-toast";
pub const CLOSE_MARKER: &str = "data-toast-close";

pub const SHOW_CLASS: &str = "show";
pub const HIDING_CLASS: &str = "hiding";

pub fn bind(page: &mut Page, toast: ElementId) -> Result<Binding, SkipReason> {
    page.document_mut().element_mut(toast).add_class(SHOW_CLASS);

    let retired = Rc::new(Cell::new(false));
    let mut binding = Binding::new(MARKER, toast);

    if let Some(close) = page
        .document()
        .with_attr_in(toast, CLOSE_MARKER)
        .into_iter()
        .next()
    {
        let retired = Rc::clone(&retired);
        binding.listen(
            page,
            Target::Element(close),
            EventKind::Click,
            handler(move |page, _| {
                retire(page, toast, &retired);
            }),
        );
    }

    let live = binding.liveness();
    let exit = page.config().toast_exit();
    let timer = page.set_timeout(page.config().toast_delay(), move |page| {
        if retired.get() {
            return;
        }
        page.document_mut().element_mut(toast).add_class(HIDING_CLASS);
        page.set_timeout(exit, move |page| {
            if live.get() {
                retire(page, toast, &retired);
            }
        });
    });
    binding.track_timer(timer);

    Ok(binding)
}

/// Removes the toast once. Later calls, from either the close control or a
/// timer, do nothing and report `false`.
pub fn retire(page: &mut Page, toast: ElementId, retired: &Cell<bool>) -> bool {
    if retired.replace(true) {
        return false;
    }
    page.document_mut().remove(toast);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::dom::{Document, El};
    use chrono::NaiveDate;
    use std::time::Duration;

    fn page_with_toast(closable: bool) -> (Page, ElementId) {
        let mut doc = Document::new();
        let mut flash = El::new("div").flag(MARKER).text("Aluno cadastrado");
        if closable {
            flash = flash.child(El::new("button").id("close").flag(CLOSE_MARKER));
        }
        let toast = doc.mount(flash);
        let page = Page::new(doc, NaiveDate::from_ymd_opt(2026, 2, 2).unwrap());
        (page, toast)
    }

    #[test]
    fn auto_dismiss_plays_exit_transition_then_removes() {
        let (mut page, toast) = page_with_toast(false);
        let _binding = bind(&mut page, toast).unwrap();
        assert!(page.document().element(toast).has_class(SHOW_CLASS));

        page.advance_time(Duration::from_millis(4199));
        assert!(page.document().is_connected(toast));

        page.advance_time(Duration::from_millis(1));
        assert!(page.document().element(toast).has_class(HIDING_CLASS));
        assert!(page.document().is_connected(toast));

        page.advance_time(Duration::from_millis(220));
        assert!(!page.document().is_connected(toast));
        assert_eq!(page.pending_timers(), 0);
    }

    #[test]
    fn manual_close_removes_immediately_and_timer_is_a_no_op() {
        let (mut page, toast) = page_with_toast(true);
        let _binding = bind(&mut page, toast).unwrap();
        let close = page.document().by_id("close").unwrap();

        page.click(close);
        assert!(!page.document().is_connected(toast));

        page.advance_time(Duration::from_millis(10_000));
        assert!(!page.document().is_connected(toast));
        assert!(!page.document().element(toast).has_class(HIDING_CLASS));
        assert_eq!(page.pending_timers(), 0);
    }

    #[test]
    fn retire_reports_only_the_first_removal() {
        let (mut page, toast) = page_with_toast(false);
        let retired = Cell::new(false);
        assert!(retire(&mut page, toast, &retired));
        assert!(!retire(&mut page, toast, &retired));
    }

    #[test]
    fn close_during_exit_transition_removes_once() {
        let (mut page, toast) = page_with_toast(true);
        let _binding = bind(&mut page, toast).unwrap();
        let close = page.document().by_id("close").unwrap();

        page.advance_time(Duration::from_millis(4250));
        assert!(page.document().element(toast).has_class(HIDING_CLASS));
        assert!(page.document().is_connected(toast));

        page.click(close);
        assert!(!page.document().is_connected(toast));

        page.advance_time(Duration::from_millis(500));
        assert!(!page.document().is_connected(toast));
        assert_eq!(page.pending_timers(), 0);
    }

    #[test]
    fn toasts_are_independent() {
        let mut doc = Document::new();
        let first = doc.mount(
            El::new("div")
                .flag(MARKER)
                .child(El::new("button").id("x1").flag(CLOSE_MARKER)),
        );
        let second = doc.mount(El::new("div").flag(MARKER));
        let mut page = Page::new(doc, NaiveDate::from_ymd_opt(2026, 2, 2).unwrap());
        let _a = bind(&mut page, first).unwrap();
        let _b = bind(&mut page, second).unwrap();

        let close = page.document().by_id("x1").unwrap();
        page.click(close);
        assert!(!page.document().is_connected(first));
        assert!(page.document().is_connected(second));

        page.advance_time(Duration::from_millis(4420));
        assert!(!page.document().is_connected(second));
    }

    #[test]
    fn disposed_binding_leaves_toast_in_place() {
        let (mut page, toast) = page_with_toast(false);
        let binding = bind(&mut page, toast).unwrap();
        binding.dispose(&mut page);
        page.advance_time(Duration::from_millis(5000));
        assert!(page.document().is_connected(toast));
    }
}
