//! Best-effort dashboard chart. The series and the charting library are
//! passed in by the host; any missing piece skips rendering.

use crate::models::ChartData;
use crate::ui::dom::ElementId;
use crate::ui::page::Page;
use crate::ui::registry::SkipReason;
use tracing::debug;

pub const MARKER: &str = "data-chart";

/// Rendering sink for a chart series on a canvas element.
pub trait ChartLibrary {
    fn render(&self, canvas: ElementId, data: &ChartData);
}

/// Renders on the first `data-chart` canvas and returns it, or `None` when
/// the canvas, the data or the library is absent.
pub fn render_chart(
    page: &Page,
    data: Option<&ChartData>,
    library: Option<&dyn ChartLibrary>,
) -> Option<ElementId> {
    match try_render(page, data, library) {
        Ok(canvas) => Some(canvas),
        Err(reason) => {
            debug!(%reason, "chart not rendered");
            None
        }
    }
}

fn try_render(
    page: &Page,
    data: Option<&ChartData>,
    library: Option<&dyn ChartLibrary>,
) -> Result<ElementId, SkipReason> {
    let canvas = page
        .document()
        .with_attr(MARKER)
        .into_iter()
        .find(|id| page.document().element(*id).tag() == "canvas")
        .ok_or(SkipReason::MissingCanvas)?;
    let data = data.ok_or(SkipReason::MissingChartData)?;
    let library = library.ok_or(SkipReason::MissingChartLibrary)?;
    library.render(canvas, data);
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChartPoint;
    use crate::ui::dom::{Document, El};
    use chrono::NaiveDate;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<(ElementId, usize)>>,
    }

    impl ChartLibrary for Recorder {
        fn render(&self, canvas: ElementId, data: &ChartData) {
            self.calls.borrow_mut().push((canvas, data.points.len()));
        }
    }

    fn series() -> ChartData {
        let month = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        ChartData {
            points: vec![ChartPoint {
                month,
                month_short: "May".into(),
                present: 12,
                paid: 8,
                present_pct: 100,
                paid_pct: 66,
            }],
        }
    }

    fn dashboard(with_canvas: bool) -> Page {
        let mut doc = Document::new();
        if with_canvas {
            doc.mount(El::new("canvas").id("dashboardChart").flag(MARKER));
        }
        Page::new(doc, NaiveDate::from_ymd_opt(2026, 5, 20).unwrap())
    }

    #[test]
    fn renders_when_everything_is_present() {
        let page = dashboard(true);
        let recorder = Recorder::default();
        let data = series();

        let canvas = render_chart(&page, Some(&data), Some(&recorder)).unwrap();
        assert_eq!(page.document().by_id("dashboardChart"), Some(canvas));
        assert_eq!(*recorder.calls.borrow(), vec![(canvas, 1)]);
    }

    #[test]
    fn any_missing_piece_skips_silently() {
        let recorder = Recorder::default();
        let data = series();

        assert!(render_chart(&dashboard(false), Some(&data), Some(&recorder)).is_none());
        assert!(render_chart(&dashboard(true), None, Some(&recorder)).is_none());
        assert!(render_chart(&dashboard(true), Some(&data), None).is_none());
        assert!(recorder.calls.borrow().is_empty());
    }

    #[test]
    fn skip_reasons_are_specific() {
        let data = series();
        assert_eq!(
            try_render(&dashboard(false), Some(&data), None).unwrap_err(),
            SkipReason::MissingCanvas
        );
        assert_eq!(
            try_render(&dashboard(true), None, None).unwrap_err(),
            SkipReason::MissingChartData
        );
        assert_eq!(
            try_render(&dashboard(true), Some(&data), None).unwrap_err(),
            SkipReason::MissingChartLibrary
        );
    }
}
