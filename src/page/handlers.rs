//! Behavior handlers.
//!
//! Each handler is an independent, uncoupled unit registered once at
//! [`Page::initialize`](super::Page::initialize), mirroring how the host
//! wires one listener per concern at page readiness. Handlers react to
//! [`PageEvent`]s and mutate element view state; they never talk to each
//! other.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::config::ObserverConfig;
use crate::limit::{Debouncer, Throttler};
use crate::timer::Scheduler;

use super::context::{Element, ElementId, ElementRole, PageContext, Region, ScrollBehavior, ScrollRequest};
use super::events::{Key, PageEvent};
use super::observer::VisibilityObserver;
use super::ripple::attach_ripple;

/// Shadow applied to the header once the page is scrolled.
const HEADER_SHADOW: &str = "0 2px 8px rgba(0, 0, 0, 0.08)";
/// Border color for a focused input.
const FOCUS_BORDER_COLOR: &str = "#0d7377";
/// Focus ring around a focused input.
const FOCUS_RING_SHADOW: &str = "0 0 0 3px rgba(13, 115, 119, 0.1)";
/// Border color for a blurred input.
const RESTING_BORDER_COLOR: &str = "#e5e5e5";
/// Class added to elements once they have scrolled into view.
const FADE_IN_CLASS: &str = "fade-in";
/// Skip link resting position, above the viewport.
const SKIP_LINK_HIDDEN_TOP: &str = "-40px";
/// Skip link position while focused.
const SKIP_LINK_VISIBLE_TOP: &str = "0";
/// Body class for the mobile layout mode.
const MOBILE_LAYOUT_CLASS: &str = "layout-mobile";
/// Body class for the desktop layout mode.
const DESKTOP_LAYOUT_CLASS: &str = "layout-desktop";

/// A page behavior reacting to host events.
pub trait BehaviorHandler: Send + Sync {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    /// React to a dispatched event.
    fn on_event(&self, page: &Arc<PageContext>, event: &PageEvent);
}

/// Scrolls the viewport to the section a navigation link targets,
/// compensating for the fixed header's height.
pub struct SmoothScrollHandler;

impl BehaviorHandler for SmoothScrollHandler {
    fn name(&self) -> &'static str {
        "smooth_scroll"
    }

    fn on_event(&self, page: &Arc<PageContext>, event: &PageEvent) {
        let PageEvent::NavLinkActivated { link } = event else {
            return;
        };

        let target = page
            .with_element(*link, |element| match &element.role {
                ElementRole::NavLink { target } => Some(target.clone()),
                _ => None,
            })
            .flatten();
        let Some(target) = target else { return };

        // A bare hash is consumed without scrolling anywhere.
        if target == "#" {
            trace!("Bare anchor activated");
            return;
        }

        let Some(section) = page.find_section(&target) else {
            debug!(anchor = %target, "No section for anchor");
            return;
        };

        let section_top = page.with_element(section, |element| element.region.top).unwrap_or(0.0);
        let top = section_top - page.header_height();

        page.update_viewport(|viewport| {
            viewport.last_scroll_request = Some(ScrollRequest {
                top,
                behavior: ScrollBehavior::Smooth,
            });
        });
        debug!(anchor = %target, top, "Smooth scroll requested");
    }
}

/// Attaches a ripple overlay to buttons on pointer presses, and activates
/// buttons from the keyboard with Enter or Space.
pub struct RippleHandler {
    duration: Duration,
    scheduler: Arc<dyn Scheduler>,
}

impl RippleHandler {
    /// Create the handler with the configured overlay lifetime.
    pub fn new(duration: Duration, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            duration,
            scheduler,
        }
    }

    fn press(&self, page: &Arc<PageContext>, target: ElementId, page_x: f64, page_y: f64) {
        let is_button = page
            .with_element(target, |element| element.role == ElementRole::Button)
            .unwrap_or(false);
        if !is_button {
            return;
        }

        attach_ripple(page, target, page_x, page_y, self.duration, &self.scheduler);
        trace!(element = %target, page_x, page_y, "Ripple attached");
    }
}

impl BehaviorHandler for RippleHandler {
    fn name(&self) -> &'static str {
        "ripple"
    }

    fn on_event(&self, page: &Arc<PageContext>, event: &PageEvent) {
        match event {
            PageEvent::PointerPressed {
                target,
                page_x,
                page_y,
            } => {
                self.press(page, *target, *page_x, *page_y);
            }
            // Keyboard activation synthesizes a press at the button's center.
            PageEvent::KeyPressed { target, key } if matches!(key, Key::Enter | Key::Space) => {
                if let Some((x, y)) = page.with_element(*target, |element| element.region.center()) {
                    self.press(page, *target, x, y);
                }
            }
            _ => {}
        }
    }
}

/// Adds the fade-in class to cards as they scroll into view, once each.
pub struct FadeInHandler {
    observer: VisibilityObserver,
}

impl FadeInHandler {
    /// Create the handler and start observing every card on the page.
    pub fn new(page: &PageContext, config: &ObserverConfig) -> Self {
        let observer = VisibilityObserver::new(config);
        for id in page.elements_with_role(|role| matches!(role, ElementRole::Card)) {
            observer.observe(id);
        }
        Self { observer }
    }

    /// Number of elements still waiting to fade in.
    pub fn pending_count(&self) -> usize {
        self.observer.observed_count()
    }
}

impl BehaviorHandler for FadeInHandler {
    fn name(&self) -> &'static str {
        "fade_in"
    }

    fn on_event(&self, page: &Arc<PageContext>, event: &PageEvent) {
        if !matches!(
            event,
            PageEvent::Loaded { .. } | PageEvent::Scrolled { .. } | PageEvent::Resized { .. }
        ) {
            return;
        }

        for id in self.observer.sweep(page) {
            page.update_element(id, |element| element.classes.add(FADE_IN_CLASS));
            debug!(element = %id, "Element faded in");
        }
    }
}

/// Casts a shadow under the header while the page is scrolled.
///
/// Scroll events are throttled: within one cool-down window only the first
/// event updates the header.
pub struct StickyHeaderHandler {
    throttler: Throttler<f64>,
    last_scroll_top: Arc<Mutex<f64>>,
}

impl StickyHeaderHandler {
    /// Create the handler for the page's header, if it has one.
    pub fn new(page: Arc<PageContext>, cool_down: Duration, scheduler: Arc<dyn Scheduler>) -> Self {
        let header = page
            .elements_with_role(|role| *role == ElementRole::Header)
            .first()
            .copied();
        let last_scroll_top = Arc::new(Mutex::new(0.0));

        let last = Arc::clone(&last_scroll_top);
        let throttler = Throttler::with_scheduler(
            cool_down,
            move |scroll_top: f64| {
                if let Some(header) = header {
                    page.update_element(header, |element| {
                        if scroll_top > 0.0 {
                            element.style.set("box-shadow", HEADER_SHADOW);
                        } else {
                            element.style.clear("box-shadow");
                        }
                    });
                }
                // Overscroll reports negative offsets; track them as 0.
                *last.lock() = scroll_top.max(0.0);
            },
            scheduler,
        );

        Self {
            throttler,
            last_scroll_top,
        }
    }

    /// The last processed scroll offset, clamped at 0.
    pub fn last_scroll_top(&self) -> f64 {
        *self.last_scroll_top.lock()
    }
}

impl BehaviorHandler for StickyHeaderHandler {
    fn name(&self) -> &'static str {
        "sticky_header"
    }

    fn on_event(&self, _page: &Arc<PageContext>, event: &PageEvent) {
        if let PageEvent::Scrolled { scroll_top } = event {
            self.throttler.invoke(*scroll_top);
        }
    }
}

/// Applies focus styling to inputs and restores the resting style on blur.
pub struct InputFocusHandler;

impl BehaviorHandler for InputFocusHandler {
    fn name(&self) -> &'static str {
        "input_focus"
    }

    fn on_event(&self, page: &Arc<PageContext>, event: &PageEvent) {
        let (target, focused) = match event {
            PageEvent::FocusGained { target } => (*target, true),
            PageEvent::FocusLost { target } => (*target, false),
            _ => return,
        };

        page.update_element(target, |element| {
            if element.role != ElementRole::Input {
                return;
            }
            if focused {
                element.style.set("border-color", FOCUS_BORDER_COLOR);
                element.style.set("box-shadow", FOCUS_RING_SHADOW);
            } else {
                element.style.set("border-color", RESTING_BORDER_COLOR);
                element.style.clear("box-shadow");
            }
        });
    }
}

/// Synthesizes a skip-to-content link as the first body child, hidden above
/// the viewport until it receives keyboard focus.
pub struct SkipLinkHandler {
    link: ElementId,
}

impl SkipLinkHandler {
    /// Insert the skip link into the page and create its handler.
    pub fn new(page: &PageContext) -> Self {
        let mut element = Element::new(
            ElementRole::SkipLink {
                target: "#main-content".to_string(),
            },
            Region::default(),
        )
        .with_label("Skip to main content");

        element.style.set("position", "absolute");
        element.style.set("top", SKIP_LINK_HIDDEN_TOP);
        element.style.set("left", "0");
        element.style.set("background", FOCUS_BORDER_COLOR);
        element.style.set("color", "white");
        element.style.set("padding", "8px");
        element.style.set("text-decoration", "none");
        element.style.set("z-index", "100");

        let link = page.insert_first(element);
        debug!(element = %link, "Skip link inserted");
        Self { link }
    }

    /// The synthesized link's id.
    pub fn link_id(&self) -> ElementId {
        self.link
    }
}

impl BehaviorHandler for SkipLinkHandler {
    fn name(&self) -> &'static str {
        "skip_link"
    }

    fn on_event(&self, page: &Arc<PageContext>, event: &PageEvent) {
        let top = match event {
            PageEvent::FocusGained { target } if *target == self.link => SKIP_LINK_VISIBLE_TOP,
            PageEvent::FocusLost { target } if *target == self.link => SKIP_LINK_HIDDEN_TOP,
            _ => return,
        };
        page.update_element(self.link, |element| element.style.set("top", top));
    }
}

/// Tracks the layout mode against the mobile breakpoint.
///
/// The mode is evaluated once at construction and re-evaluated after
/// resizes settle; resize events are debounced so a drag only triggers one
/// evaluation.
pub struct ResponsiveLayoutHandler {
    debouncer: Debouncer<f64>,
}

fn apply_layout(page: &PageContext, breakpoint: f64, width: f64) {
    let mobile = width <= breakpoint;
    page.update_element(page.body_id(), |body| {
        if mobile {
            body.classes.add(MOBILE_LAYOUT_CLASS);
            body.classes.remove(DESKTOP_LAYOUT_CLASS);
        } else {
            body.classes.add(DESKTOP_LAYOUT_CLASS);
            body.classes.remove(MOBILE_LAYOUT_CLASS);
        }
    });
    debug!(width, mobile, "Layout mode evaluated");
}

impl ResponsiveLayoutHandler {
    /// Create the handler and evaluate the current layout immediately.
    pub fn new(
        page: Arc<PageContext>,
        breakpoint: f64,
        quiet_window: Duration,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        apply_layout(&page, breakpoint, page.viewport().width);

        let debouncer = Debouncer::with_scheduler(
            quiet_window,
            move |width: f64| apply_layout(&page, breakpoint, width),
            scheduler,
        );
        Self { debouncer }
    }
}

impl BehaviorHandler for ResponsiveLayoutHandler {
    fn name(&self) -> &'static str {
        "responsive_layout"
    }

    fn on_event(&self, _page: &Arc<PageContext>, event: &PageEvent) {
        if let PageEvent::Resized { width, .. } = event {
            self.debouncer.invoke(*width);
        }
    }
}
