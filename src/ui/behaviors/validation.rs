//! Localized messages for native constraint validation.

use crate::ui::dom::ElementId;
use crate::ui::events::{handler, EventKind, Handler, Target};
use crate::ui::page::Page;
use crate::ui::registry::{Binding, SkipReason};
use std::rc::Rc;

pub const MARKER: &str = "data-validate";
pub const REQUIRED_MESSAGE: &str = "data-msg-required";
pub const INVALID_MESSAGE: &str = "data-msg-invalid";

pub fn bind(page: &mut Page, field: ElementId) -> Result<Binding, SkipReason> {
    let mut binding = Binding::new(MARKER, field);
    binding.listen(
        page,
        Target::Element(field),
        EventKind::Invalid,
        handler(move |page, _| {
            let element = page.document().element(field);
            let attr = if element.value().trim().is_empty() {
                REQUIRED_MESSAGE
            } else {
                INVALID_MESSAGE
            };
            let message = element.attr(attr).map(str::to_string);
            if let Some(message) = message {
                page.document_mut()
                    .element_mut(field)
                    .set_custom_validity(message);
            }
        }),
    );

    let clear: Handler = handler(move |page, _| {
        page.document_mut().element_mut(field).set_custom_validity("");
    });
    binding.listen(page, Target::Element(field), EventKind::Input, Rc::clone(&clear));
    binding.listen(page, Target::Element(field), EventKind::Change, clear);
    Ok(binding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::dom::{Document, El};
    use chrono::NaiveDate;

    fn age_field() -> (Page, ElementId) {
        let mut doc = Document::new();
        let field = doc.mount(
            El::new("input")
                .attr("type", "number")
                .attr("min", "4")
                .flag("required")
                .flag(MARKER)
                .attr(REQUIRED_MESSAGE, "Informe a idade.")
                .attr(INVALID_MESSAGE, "Idade inválida."),
        );
        (Page::new(doc, NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()), field)
    }

    #[test]
    fn empty_field_gets_required_message() {
        let (mut page, field) = age_field();
        let _binding = bind(&mut page, field).unwrap();

        assert!(!page.check_validity(field));
        assert_eq!(
            page.document().element(field).validation_message(),
            "Informe a idade."
        );
    }

    #[test]
    fn invalid_value_gets_invalid_message_and_edit_clears_it() {
        let (mut page, field) = age_field();
        let _binding = bind(&mut page, field).unwrap();

        page.type_text(field, "2");
        assert!(!page.check_validity(field));
        assert_eq!(
            page.document().element(field).validation_message(),
            "Idade inválida."
        );

        page.type_text(field, "9");
        assert_eq!(page.document().element(field).custom_validity(), "");
        assert!(page.check_validity(field));
    }

    #[test]
    fn missing_messages_keep_native_text() {
        let mut doc = Document::new();
        let field = doc.mount(El::new("input").flag("required").flag(MARKER));
        let mut page = Page::new(doc, NaiveDate::from_ymd_opt(2026, 6, 1).unwrap());
        let _binding = bind(&mut page, field).unwrap();

        assert!(!page.check_validity(field));
        assert_eq!(
            page.document().element(field).validation_message(),
            "Please fill out this field."
        );
    }
}
