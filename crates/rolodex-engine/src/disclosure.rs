//! Incremental disclosure: a growing visible prefix over the filtered
//! result.
//!
//! The controller has no notion of viewports or scroll positions; the host
//! calls [`DisclosureWindow::advance`] from whatever mechanism detects
//! proximity to the end of the list (intersection observer, explicit
//! "load more" control, keyboard navigation).

use rolodex_core::WindowConfig;

/// Visible-prefix state for one result list.
#[derive(Debug, Clone, Copy)]
pub struct DisclosureWindow {
    visible: usize,
    config: WindowConfig,
}

impl DisclosureWindow {
    /// Creates a window at the configured initial size.
    #[must_use]
    pub fn new(config: WindowConfig) -> Self {
        Self {
            visible: config.initial,
            config,
        }
    }

    /// Current visible prefix length (unclamped).
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible
    }

    /// Resets to the initial size. Called when the query, facet filters,
    /// or active segment change; sort changes keep the window.
    pub fn reset(&mut self) {
        self.visible = self.config.initial;
    }

    /// Expands the prefix by one step, clamped to `total`.
    pub fn advance(&mut self, total: usize) {
        if self.visible >= total {
            return;
        }
        self.visible = (self.visible + self.config.step).min(total);
    }

    /// How many of `total` records are currently visible.
    #[must_use]
    pub fn take(&self, total: usize) -> usize {
        self.visible.min(total)
    }

    /// True while the filtered result extends past the visible prefix.
    #[must_use]
    pub fn has_more(&self, total: usize) -> bool {
        self.visible < total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> DisclosureWindow {
        DisclosureWindow::new(WindowConfig::default())
    }

    #[test]
    fn test_expansion_clamps_to_total() {
        let mut window = window();
        assert_eq!(window.take(40), 18);
        assert!(window.has_more(40));

        window.advance(40);
        assert_eq!(window.take(40), 30);

        window.advance(40);
        assert_eq!(window.take(40), 40);
        assert!(!window.has_more(40));

        // Advancing past the end is a no-op.
        window.advance(40);
        assert_eq!(window.take(40), 40);
    }

    #[test]
    fn test_reset_restores_initial_size() {
        let mut window = window();
        window.advance(100);
        window.advance(100);
        assert_eq!(window.visible_count(), 42);

        window.reset();
        assert_eq!(window.visible_count(), 18);
    }

    #[test]
    fn test_short_lists_are_fully_visible() {
        let window = window();
        assert_eq!(window.take(5), 5);
        assert!(!window.has_more(5));
    }
}
