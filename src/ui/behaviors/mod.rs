//! One module per page behavior. Each exposes its marker attribute and a
//! `bind` factory for the [`Registry`](super::registry::Registry); the chart
//! integration is invoked explicitly with its data instead.

pub mod age;
pub mod auto_submit;
pub mod chart;
pub mod phone_mask;
pub mod sidebar;
pub mod social_fee;
pub mod table_filter;
pub mod toast;
pub mod validation;
