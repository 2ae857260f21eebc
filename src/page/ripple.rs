//! Ripple overlay geometry and lifecycle.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

use crate::timer::Scheduler;

use super::context::{ElementId, PageContext, Region};

/// A square overlay rendered over a button after a pointer press.
///
/// `x` and `y` position the overlay relative to the button's own origin so
/// its center sits under the pointer; they are frequently negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RippleOverlay {
    pub id: Uuid,
    pub size: f64,
    pub x: f64,
    pub y: f64,
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

impl RippleOverlay {
    /// Compute the overlay for a pointer press at page coordinates
    /// `(page_x, page_y)` within `region`.
    ///
    /// The overlay is a square with side `max(width, height)` centered on
    /// the pointer. Non-finite inputs clamp the affected output to 0.
    pub fn at(region: &Region, page_x: f64, page_y: f64) -> Self {
        let size = finite_or_zero(region.width.max(region.height));
        let x = finite_or_zero((page_x - region.left) - size / 2.0);
        let y = finite_or_zero((page_y - region.top) - size / 2.0);

        Self {
            id: Uuid::new_v4(),
            size,
            x,
            y,
        }
    }
}

/// Attach a ripple overlay to a button, replacing any overlay already
/// present, and schedule its removal after `duration`.
///
/// Removal is guarded by overlay identity: a newer ripple is never removed
/// by the stale timer of the one it replaced. Returns the new overlay's id,
/// or `None` when the element does not exist.
pub fn attach_ripple(
    page: &Arc<PageContext>,
    button: ElementId,
    page_x: f64,
    page_y: f64,
    duration: Duration,
    scheduler: &Arc<dyn Scheduler>,
) -> Option<Uuid> {
    let region = page.with_element(button, |element| element.region)?;
    let overlay = RippleOverlay::at(&region, page_x, page_y);
    let overlay_id = overlay.id;

    page.update_element(button, |element| {
        element.ripple = Some(overlay);
    });

    let page = Arc::clone(page);
    scheduler.schedule_after(
        duration,
        Box::new(move || {
            page.update_element(button, |element| {
                if element.ripple.map(|r| r.id) == Some(overlay_id) {
                    element.ripple = None;
                }
            });
        }),
    );

    Some(overlay_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::context::{Element, ElementRole, HostCapabilities, Viewport};
    use crate::timer::TokioScheduler;

    #[test]
    fn test_overlay_centers_on_pointer() {
        let region = Region::new(100.0, 40.0, 10.0, 20.0);
        let overlay = RippleOverlay::at(&region, 60.0, 30.0);

        assert_eq!(overlay.size, 100.0);
        assert_eq!(overlay.x, 0.0);
        assert_eq!(overlay.y, -40.0);
    }

    #[test]
    fn test_non_finite_inputs_clamp_to_zero() {
        let region = Region::new(f64::NAN, f64::NAN, 10.0, 20.0);
        let overlay = RippleOverlay::at(&region, 60.0, 30.0);
        assert_eq!(overlay.size, 0.0);
        assert_eq!(overlay.x, 50.0);
        assert_eq!(overlay.y, 10.0);

        let region = Region::new(100.0, 40.0, f64::INFINITY, 20.0);
        let overlay = RippleOverlay::at(&region, 60.0, 30.0);
        assert_eq!(overlay.size, 100.0);
        assert_eq!(overlay.x, 0.0);
        assert_eq!(overlay.y, -40.0);
    }

    fn button_page() -> (Arc<PageContext>, ElementId) {
        let page = Arc::new(PageContext::new(
            Viewport::new(1280.0, 720.0),
            HostCapabilities::default(),
        ));
        let button = page.insert(Element::new(
            ElementRole::Button,
            Region::new(120.0, 48.0, 100.0, 400.0),
        ));
        (page, button)
    }

    fn current_ripple(page: &PageContext, button: ElementId) -> Option<Uuid> {
        page.with_element(button, |element| element.ripple.map(|r| r.id))
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_ripple_removed_after_duration() {
        let (page, button) = button_page();
        let scheduler: Arc<dyn Scheduler> = Arc::new(TokioScheduler);

        let id = attach_ripple(
            &page,
            button,
            160.0,
            424.0,
            Duration::from_millis(600),
            &scheduler,
        )
        .unwrap();
        assert_eq!(current_ripple(&page, button), Some(id));

        tokio::time::sleep(Duration::from_millis(601)).await;
        assert_eq!(current_ripple(&page, button), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_ripple_replaces_existing() {
        let (page, button) = button_page();
        let scheduler: Arc<dyn Scheduler> = Arc::new(TokioScheduler);
        let duration = Duration::from_millis(600);

        let first = attach_ripple(&page, button, 120.0, 410.0, duration, &scheduler).unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        let second = attach_ripple(&page, button, 180.0, 430.0, duration, &scheduler).unwrap();
        assert_ne!(first, second);
        assert_eq!(current_ripple(&page, button), Some(second));

        // The first ripple's removal timer fires here; the newer overlay
        // must survive it.
        tokio::time::sleep(Duration::from_millis(301)).await;
        assert_eq!(current_ripple(&page, button), Some(second));

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(current_ripple(&page, button), None);
    }
}
