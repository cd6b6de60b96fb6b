use crate::ui::dom::{Document, ElementId};
use crate::ui::events::{handler, EventKind, Target};
use crate::ui::page::Page;
use crate::ui::registry::{referenced, Binding, SkipReason};

/// Value is a reference to the table to filter, e.g. `#alunos-table`.
pub const MARKER: &str = "data-table-search";

pub fn bind(page: &mut Page, input: ElementId) -> Result<Binding, SkipReason> {
    let table = referenced(page, input, MARKER)?;

    let mut binding = Binding::new(MARKER, input);
    binding.listen(
        page,
        Target::Element(input),
        EventKind::Input,
        handler(move |page, _| apply(page, input, table)),
    );
    Ok(binding)
}

/// Case-insensitive substring match of the search term against a row's text.
pub fn row_matches(term: &str, row_text: &str) -> bool {
    row_text.to_lowercase().contains(&term.to_lowercase())
}

fn apply(page: &mut Page, input: ElementId, table: ElementId) {
    let term = page.document().element(input).value().to_lowercase();
    let rows = body_rows(page.document(), table);
    for row in rows {
        let visible = row_matches(&term, &row_text(page.document(), row));
        page.document_mut().element_mut(row).set_hidden(!visible);
    }
}

/// Text of a row with its cells separated by a space, so a term never
/// matches across a cell boundary.
pub fn row_text(doc: &Document, row: ElementId) -> String {
    let cells = doc.children(row);
    if cells.is_empty() {
        return doc.text_content(row);
    }
    cells
        .iter()
        .map(|cell| doc.text_content(*cell))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Data rows: rows inside `tbody` sections, plus rows placed directly in the
/// table. Header and footer sections are never returned.
pub fn body_rows(doc: &Document, table: ElementId) -> Vec<ElementId> {
    let mut rows = Vec::new();
    for section in doc.children(table) {
        match doc.element(*section).tag() {
            "tbody" => rows.extend(
                doc.children(*section)
                    .iter()
                    .copied()
                    .filter(|row| doc.element(*row).tag() == "tr"),
            ),
            "tr" => rows.push(*section),
            _ => {}
        }
    }
    rows
}
