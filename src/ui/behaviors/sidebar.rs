//! Responsive sidebar.
//!
//! At or below the breakpoint the sidebar is an overlay hidden by default
//! and the toggle opens it; above it the sidebar is always shown and the
//! toggle collapses its width. The mode is recomputed on every resize and
//! the body carries exactly one of [`NARROW_CLASS`] / [`WIDE_CLASS`].

use crate::ui::dom::ElementId;
use crate::ui::events::{handler, EventKind, Target};
use crate::ui::page::Page;
use crate::ui::registry::{Binding, SkipReason};

pub const MARKER: &str = "data-sidebar-toggle";
/// Container whose links close the overlay in narrow mode.
pub const CONTAINER_MARKER: &str = "data-sidebar";

pub const NARROW_CLASS: &str = "sidebar-narrow";
pub const WIDE_CLASS: &str = "sidebar-wide";
pub const OPEN_CLASS: &str = "sidebar-open";
pub const COLLAPSED_CLASS: &str = "sidebar-collapsed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarMode {
    Narrow,
    Wide,
}

impl SidebarMode {
    pub fn for_width(width: u32, breakpoint: u32) -> Self {
        if width <= breakpoint {
            SidebarMode::Narrow
        } else {
            SidebarMode::Wide
        }
    }
}

pub fn current_mode(page: &Page) -> SidebarMode {
    SidebarMode::for_width(page.viewport_width(), page.config().narrow_breakpoint)
}

pub fn bind(page: &mut Page, toggle: ElementId) -> Result<Binding, SkipReason> {
    apply_mode(page);

    let mut binding = Binding::new(MARKER, toggle);
    binding.listen(
        page,
        Target::Window,
        EventKind::Resize,
        handler(|page, _| apply_mode(page)),
    );
    binding.listen(
        page,
        Target::Element(toggle),
        EventKind::Click,
        handler(|page, _| {
            let class = match current_mode(page) {
                SidebarMode::Narrow => OPEN_CLASS,
                SidebarMode::Wide => COLLAPSED_CLASS,
            };
            let body = page.document().body();
            page.document_mut().element_mut(body).toggle_class(class);
        }),
    );

    let links: Vec<ElementId> = page
        .document()
        .with_attr(CONTAINER_MARKER)
        .into_iter()
        .flat_map(|container| page.document().with_tag_in(container, "a"))
        .collect();
    for link in links {
        binding.listen(
            page,
            Target::Element(link),
            EventKind::Click,
            handler(|page, _| {
                if current_mode(page) == SidebarMode::Narrow {
                    let body = page.document().body();
                    page.document_mut().element_mut(body).remove_class(OPEN_CLASS);
                }
            }),
        );
    }

    Ok(binding)
}

/// Puts the body in the mode matching the viewport, dropping every class
/// that belongs to the other mode.
pub fn apply_mode(page: &mut Page) {
    let mode = current_mode(page);
    let body = page.document().body();
    let element = page.document_mut().element_mut(body);
    match mode {
        SidebarMode::Narrow => {
            element.remove_class(WIDE_CLASS);
            element.remove_class(COLLAPSED_CLASS);
            element.add_class(NARROW_CLASS);
        }
        SidebarMode::Wide => {
            element.remove_class(NARROW_CLASS);
            element.remove_class(OPEN_CLASS);
            element.add_class(WIDE_CLASS);
        }
    }
}
