//! Age field derived from a date-of-birth input.
//!
//! While a parseable birth date is present the target holds the computed
//! age, is readonly and carries [`DERIVED_CLASS`]. Clearing the date, or
//! typing a malformed one, hands the target back to the user untouched.

use crate::ui::dom::ElementId;
use crate::ui::events::{handler, EventKind, Handler, Target};
use crate::ui::page::Page;
use crate::ui::registry::{referenced, Binding, SkipReason};
use chrono::{Datelike, NaiveDate};
use std::rc::Rc;
use tracing::debug;

/// Placed on the date input; value references the age field, e.g. `#idade`.
pub const MARKER: &str = "data-age-target";
pub const DERIVED_CLASS: &str = "derived";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn bind(page: &mut Page, source: ElementId) -> Result<Binding, SkipReason> {
    let target = referenced(page, source, MARKER)?;

    let mut binding = Binding::new(MARKER, source);
    let recompute: Handler = handler(move |page, _| update(page, source, target));
    binding.listen(page, Target::Element(source), EventKind::Change, Rc::clone(&recompute));
    binding.listen(page, Target::Element(source), EventKind::Blur, recompute);

    if !page.document().element(target).value().is_empty() {
        page.dispatch_to(target, EventKind::Change);
    }
    Ok(binding)
}

/// Whole years between `birth` and `today`, one less when this year's
/// birthday has not happened yet. Future dates give negative ages.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

fn update(page: &mut Page, source: ElementId, target: ElementId) {
    let raw = page.document().element(source).value().trim().to_string();
    if raw.is_empty() {
        release(page, target);
        return;
    }
    let birth = match NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
        Ok(birth) => birth,
        Err(err) => {
            debug!(value = %raw, "unparseable birth date: {err}");
            release(page, target);
            return;
        }
    };

    let age = age_on(birth, page.today());
    let shown = if age < 0 { String::new() } else { age.to_string() };
    {
        let element = page.document_mut().element_mut(target);
        element.set_value(shown);
        element.set_readonly(true);
        element.add_class(DERIVED_CLASS);
    }
    page.dispatch_to(target, EventKind::Change);

    let message = if page.config().age_range().contains(&age) {
        String::new()
    } else {
        page.config().age_message()
    };
    page.document_mut()
        .element_mut(target)
        .set_custom_validity(message);
}

fn release(page: &mut Page, target: ElementId) {
    let element = page.document_mut().element_mut(target);
    element.set_readonly(false);
    element.remove_class(DERIVED_CLASS);
    element.set_custom_validity("");
}
