//! Change-detecting values.
//!
//! Native column and renderer state lives in [`Property`] cells. Writes report
//! whether anything changed, which keeps forwarding code free of its own
//! comparisons.
//!
//! ```
//! use horizon_grid_core::Property;
//!
//! let width = Property::new(-1);
//! assert!(width.set(120));
//! assert!(!width.set(120));
//! assert_eq!(width.get(), 120);
//! ```

use std::fmt;

use parking_lot::RwLock;

/// A shareable value with change detection on write.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone + PartialEq> Property<T> {
    /// Creates a property holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Returns a copy of the value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Stores `value`. Returns `true` if it differs from the previous one.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current == value {
            return false;
        }
        *current = value;
        true
    }
}

impl<T: Clone + PartialEq + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.value.read(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_set_reports_change() {
        let title = Property::new(String::from("Name"));
        assert!(!title.set("Name".into()));
        assert!(title.set("Title".into()));
        assert_eq!(title.get(), "Title");
    }

    #[test]
    fn test_default_and_debug() {
        let width: Property<i32> = Property::default();
        assert_eq!(width.get(), 0);
        assert_eq!(format!("{width:?}"), "0");
    }

    #[test]
    fn test_shared_between_threads() {
        let visible = Arc::new(Property::new(false));
        let writer = visible.clone();
        std::thread::spawn(move || {
            writer.set(true);
        })
        .join()
        .unwrap();
        assert!(visible.get());
    }
}
