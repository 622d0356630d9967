//! Calendar logic: pure date arithmetic and the navigation controller.

pub mod controller;
pub mod date_index;

pub use controller::{CalendarController, CalendarViewState, CellMarks, RenderMarkers, RenderModel};
pub use date_index::Cell;
