use crate::ui::dom::ElementId;
use crate::ui::events::{handler, EventKind, Target};
use crate::ui::page::Page;
use crate::ui::registry::{Binding, SkipReason};

pub const MARKER: &str = "data-phone-mask";

pub fn bind(page: &mut Page, field: ElementId) -> Result<Binding, SkipReason> {
    let mut binding = Binding::new(MARKER, field);
    binding.listen(
        page,
        Target::Element(field),
        EventKind::Input,
        handler(move |page, _| {
            let current = page.document().element(field).value();
            let masked = mask(current);
            if masked != current {
                page.document_mut().element_mut(field).set_value(masked);
            }
        }),
    );
    Ok(binding)
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '(' | ')' | '+' | '-') || c.is_whitespace()
}

/// Drops every character outside digits, `()+-` and whitespace.
///
/// Whitespace left dangling at the end only because junk after it was
/// stripped is dropped too; a trailing space typed after valid characters
/// survives so the user can keep typing.
pub fn mask(raw: &str) -> String {
    let mut kept = String::with_capacity(raw.len());
    let mut stripped_tail = false;
    for c in raw.chars() {
        if !is_allowed(c) {
            stripped_tail = true;
            continue;
        }
        if !c.is_whitespace() {
            stripped_tail = false;
        }
        kept.push(c);
    }
    if stripped_tail {
        kept.truncate(kept.trim_end().len());
    }
    kept
}
