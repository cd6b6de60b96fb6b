//! Social-program checkbox that waives the monthly fee field.

use crate::ui::dom::ElementId;
use crate::ui::events::{handler, EventKind, Target};
use crate::ui::page::Page;
use crate::ui::registry::{referenced, Binding, SkipReason};
use std::cell::RefCell;
use std::rc::Rc;

/// Placed on the checkbox; value references the fee input, e.g. `#valor_mensalidade`.
pub const MARKER: &str = "data-social-target";

pub fn bind(page: &mut Page, checkbox: ElementId) -> Result<Binding, SkipReason> {
    let fee = referenced(page, checkbox, MARKER)?;

    let remembered = Rc::new(RefCell::new(None));
    apply(page, checkbox, fee, &remembered);

    let mut binding = Binding::new(MARKER, checkbox);
    binding.listen(
        page,
        Target::Element(checkbox),
        EventKind::Change,
        handler(move |page, _| apply(page, checkbox, fee, &remembered)),
    );
    Ok(binding)
}

/// Forces or releases the fee, then notifies the field's own listeners with
/// `change` when its value or editability moved.
fn apply(page: &mut Page, checkbox: ElementId, fee: ElementId, remembered: &RefCell<Option<String>>) {
    let waived = page.config().waived_fee.clone();
    let checked = page.document().element(checkbox).checked();

    let changed = {
        let field = page.document_mut().element_mut(fee);
        let before = (field.value().to_string(), field.readonly());
        if checked {
            let current = field.value().trim();
            if !current.is_empty() && current != waived {
                *remembered.borrow_mut() = Some(current.to_string());
            }
            field.set_value(waived);
            field.set_readonly(true);
        } else {
            field.set_readonly(false);
            if field.value() == waived {
                if let Some(previous) = remembered.borrow_mut().take() {
                    field.set_value(previous);
                }
            }
        }
        before != (field.value().to_string(), field.readonly())
    };

    if changed {
        page.dispatch_to(fee, EventKind::Change);
    }
}
