//! Logging facilities for Horizon Grid.
//!
//! Horizon Grid uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_grid=debug")
//!         .init();
//! }
//! ```
//!
//! Property forwarding and event dispatch log at `trace`. Attaching a column,
//! registering native cells and reconciling deferred state log at `debug`.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_grid_core::signal";
    /// Column adapter target.
    pub const COLUMN: &str = "horizon_grid::column";
    /// Cell binding target.
    pub const CELL: &str = "horizon_grid::cell";
    /// Host grid target.
    pub const GRID: &str = "horizon_grid::grid";
    /// Native tree model target.
    pub const NATIVE: &str = "horizon_grid::native";
    /// Configuration loading target.
    pub const CONFIG: &str = "horizon_grid::config";
    /// Performance span target.
    pub const PERF: &str = "horizon_grid::perf";
}

/// Performance tracing guard.
///
/// Creates a span that is entered on creation and exited when dropped. Use it
/// around operations whose cost is worth seeing in a profiler, such as
/// attaching every column of a grid.
///
/// ```
/// use horizon_grid_core::PerfSpan;
///
/// let _span = PerfSpan::new("attach_columns");
/// // ... work ...
/// ```
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}
