//! Scroll-driven visibility observation for fade-in animation.

use std::collections::HashSet;

use parking_lot::Mutex;

use crate::config::ObserverConfig;

use super::context::{ElementId, PageContext, Viewport};

/// Observes elements until they intersect the viewport, one-shot each.
///
/// The observed area is the viewport with its bottom edge adjusted by the
/// configured root margin; a negative margin means elements become visible
/// only after scrolling a little past the screen edge.
pub struct VisibilityObserver {
    threshold: f64,
    root_margin_bottom: f64,
    observed: Mutex<HashSet<ElementId>>,
}

impl VisibilityObserver {
    /// Create an observer from configuration.
    pub fn new(config: &ObserverConfig) -> Self {
        Self {
            threshold: config.threshold,
            root_margin_bottom: config.root_margin_bottom_px,
            observed: Mutex::new(HashSet::new()),
        }
    }

    /// Start observing an element.
    pub fn observe(&self, id: ElementId) {
        self.observed.lock().insert(id);
    }

    /// Stop observing an element.
    pub fn unobserve(&self, id: ElementId) {
        self.observed.lock().remove(&id);
    }

    /// Number of elements still observed.
    pub fn observed_count(&self) -> usize {
        self.observed.lock().len()
    }

    /// Fraction of an element's height inside the margin-adjusted viewport.
    pub fn intersection_ratio(&self, viewport: &Viewport, top: f64, height: f64) -> f64 {
        if height <= 0.0 {
            return 0.0;
        }

        let visible_top = viewport.scroll_top;
        let visible_bottom = viewport.scroll_top + viewport.height + self.root_margin_bottom;

        let overlap = (top + height).min(visible_bottom) - top.max(visible_top);
        (overlap / height).clamp(0.0, 1.0)
    }

    /// Check every observed element against the current viewport.
    ///
    /// Elements meeting the threshold are removed from observation and
    /// returned; each element can only ever be returned once.
    pub fn sweep(&self, page: &PageContext) -> Vec<ElementId> {
        let viewport = page.viewport();
        let mut observed = self.observed.lock();

        let intersecting: Vec<ElementId> = observed
            .iter()
            .copied()
            .filter(|id| {
                page.with_element(*id, |element| {
                    let ratio =
                        self.intersection_ratio(&viewport, element.region.top, element.region.height);
                    ratio > 0.0 && ratio >= self.threshold
                })
                .unwrap_or(false)
            })
            .collect();

        for id in &intersecting {
            observed.remove(id);
        }
        intersecting
    }
}
