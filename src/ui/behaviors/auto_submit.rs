use crate::ui::dom::ElementId;
use crate::ui::events::{handler, EventKind, Target};
use crate::ui::page::Page;
use crate::ui::registry::{Binding, SkipReason};
use tracing::debug;

pub const MARKER: &str = "data-auto-submit";

pub fn bind(page: &mut Page, control: ElementId) -> Result<Binding, SkipReason> {
    let mut binding = Binding::new(MARKER, control);
    binding.listen(
        page,
        Target::Element(control),
        EventKind::Change,
        handler(move |page, _| {
            match page.document().closest(control, "form") {
                Some(form) => page.submit_form(form),
                None => debug!(?control, "auto-submit control outside any form"),
            }
        }),
    );
    Ok(binding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::dom::{Document, El};
    use chrono::NaiveDate;

    #[test]
    fn change_submits_enclosing_form_once() {
        let mut doc = Document::new();
        let form = doc.mount(
            El::new("form")
                .attr("method", "get")
                .child(El::new("input").id("mes").attr("type", "month").flag(MARKER)),
        );
        let mut page = Page::new(doc, NaiveDate::from_ymd_opt(2026, 6, 1).unwrap());
        let month = page.document().by_id("mes").unwrap();
        let _binding = bind(&mut page, month).unwrap();

        page.type_text(month, "2026-0");
        assert!(page.take_submissions().is_empty());

        page.commit_value(month, "2026-05");
        assert_eq!(page.take_submissions(), vec![form]);
    }

    #[test]
    fn control_without_form_is_ignored() {
        let mut doc = Document::new();
        let select = doc.mount(El::new("select").flag(MARKER));
        let mut page = Page::new(doc, NaiveDate::from_ymd_opt(2026, 6, 1).unwrap());
        let _binding = bind(&mut page, select).unwrap();

        page.commit_value(select, "2");
        assert!(page.take_submissions().is_empty());
    }
}
