//! Core systems for Horizon Grid.
//!
//! This crate provides the small set of foundations the column adapter layer
//! is built on:
//!
//! - **Signal/Slot System**: Synchronous, type-safe notifications used to model
//!   native toolkit callbacks (header clicks, cell edits, formatting requests)
//! - **Property System**: Change-detecting values backing native widget state
//! - **Logging**: `tracing` targets and a performance span guard
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_grid_core::Signal;
//!
//! let clicked = Signal::<usize>::new();
//!
//! let conn_id = clicked.connect(|column| {
//!     println!("Header {} clicked", column);
//! });
//!
//! clicked.emit(2);
//! clicked.disconnect(conn_id);
//! ```
//!
//! # Property Example
//!
//! ```
//! use horizon_grid_core::{Property, Signal};
//!
//! struct Title {
//!     text: Property<String>,
//!     text_changed: Signal<String>,
//! }
//!
//! impl Title {
//!     fn set_text(&self, text: &str) {
//!         if self.text.set(text.to_string()) {
//!             self.text_changed.emit(text.to_string());
//!         }
//!     }
//! }
//!
//! let title = Title {
//!     text: Property::new(String::new()),
//!     text_changed: Signal::new(),
//! };
//! title.set_text("Name");
//! assert_eq!(title.text.get(), "Name");
//! ```

pub mod logging;
pub mod property;
pub mod signal;

pub use logging::PerfSpan;
pub use property::Property;
pub use signal::{ConnectionId, Signal};
