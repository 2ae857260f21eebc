//! Page engine: modeled context, events, view state, and behaviors.

mod context;
mod events;
mod observer;
mod ripple;
mod state;

pub mod handlers;

pub use context::{
    Element, ElementId, ElementRole, HostCapabilities, PageContext, Region, ScrollBehavior,
    ScrollRequest, Viewport,
};
pub use events::{Key, LoadTiming, PageEvent};
pub use observer::VisibilityObserver;
pub use ripple::{attach_ripple, RippleOverlay};
pub use state::{ClassList, StyleState};

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use crate::config::VeneerConfig;
use crate::timer::Scheduler;

use handlers::{
    BehaviorHandler, FadeInHandler, InputFocusHandler, ResponsiveLayoutHandler, RippleHandler,
    SkipLinkHandler, SmoothScrollHandler, StickyHeaderHandler,
};

/// The behavior engine for one page.
///
/// Holds the modeled page and every registered behavior; events dispatched
/// through it fan out to all behaviors in registration order.
pub struct Page {
    context: Arc<PageContext>,
    handlers: Vec<Box<dyn BehaviorHandler>>,
}

impl Page {
    /// Wire every standard behavior to the page, once.
    ///
    /// This is the single readiness entry point: the host builds its
    /// [`PageContext`], calls `initialize`, and from then on feeds events
    /// through [`dispatch`](Page::dispatch) or [`run`](Page::run).
    pub fn initialize(
        context: Arc<PageContext>,
        config: &VeneerConfig,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        let mut handlers: Vec<Box<dyn BehaviorHandler>> = Vec::new();

        handlers.push(Box::new(SmoothScrollHandler));
        handlers.push(Box::new(RippleHandler::new(
            config.behavior.ripple_duration(),
            Arc::clone(&scheduler),
        )));
        handlers.push(Box::new(FadeInHandler::new(&context, &config.observer)));
        handlers.push(Box::new(StickyHeaderHandler::new(
            Arc::clone(&context),
            config.behavior.scroll_throttle(),
            Arc::clone(&scheduler),
        )));
        handlers.push(Box::new(InputFocusHandler));
        handlers.push(Box::new(SkipLinkHandler::new(&context)));
        if config.diagnostics.enabled {
            handlers.push(Box::new(crate::diagnostics::DiagnosticsHandler));
        }
        handlers.push(Box::new(ResponsiveLayoutHandler::new(
            Arc::clone(&context),
            config.behavior.mobile_breakpoint_px,
            config.behavior.resize_debounce(),
            Arc::clone(&scheduler),
        )));

        if config.diagnostics.enabled {
            crate::diagnostics::report_capabilities(&context);
        }

        info!(handlers = handlers.len(), "Page behaviors initialized");
        Self { context, handlers }
    }

    /// The modeled page.
    pub fn context(&self) -> &Arc<PageContext> {
        &self.context
    }

    /// Number of registered behaviors.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Dispatch one event to every behavior in registration order.
    ///
    /// The host's own viewport state lands before behaviors observe the
    /// event, so a scroll behavior always sees the offset it was told about.
    pub fn dispatch(&self, event: &PageEvent) {
        self.apply_host_state(event);
        for handler in &self.handlers {
            trace!(handler = handler.name(), "Dispatching event");
            handler.on_event(&self.context, event);
        }
    }

    fn apply_host_state(&self, event: &PageEvent) {
        match event {
            PageEvent::Scrolled { scroll_top } => {
                self.context
                    .update_viewport(|viewport| viewport.scroll_top = *scroll_top);
            }
            PageEvent::Resized { width, height } => {
                self.context.update_viewport(|viewport| {
                    viewport.width = *width;
                    viewport.height = *height;
                });
            }
            _ => {}
        }
    }

    /// Drain a host event stream until it closes.
    pub async fn run(&self, mut events: mpsc::Receiver<PageEvent>) {
        while let Some(event) = events.recv().await {
            self.dispatch(&event);
        }
        debug!("Event stream closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TokioScheduler;
    use std::time::Duration;

    fn sample_page() -> Arc<PageContext> {
        let page = Arc::new(PageContext::new(
            Viewport::new(1280.0, 720.0),
            HostCapabilities::default(),
        ));
        page.insert(Element::new(
            ElementRole::Header,
            Region::new(1280.0, 64.0, 0.0, 0.0),
        ));
        page.insert(Element::new(
            ElementRole::Card,
            Region::new(400.0, 200.0, 100.0, 900.0),
        ));
        page
    }

    fn initialize(context: Arc<PageContext>) -> Page {
        Page::initialize(context, &VeneerConfig::default(), Arc::new(TokioScheduler))
    }

    #[tokio::test]
    async fn test_initialize_registers_every_behavior() {
        let page = initialize(sample_page());
        assert_eq!(page.handler_count(), 8);

        // The skip link was synthesized as the first body child.
        let first = page.context().body_children()[0];
        let is_skip_link = page
            .context()
            .with_element(first, |element| {
                matches!(element.role, ElementRole::SkipLink { .. })
            })
            .unwrap();
        assert!(is_skip_link);
    }

    #[tokio::test]
    async fn test_disabled_diagnostics_drops_the_handler() {
        let mut config = VeneerConfig::default();
        config.diagnostics.enabled = false;
        let page = Page::initialize(sample_page(), &config, Arc::new(TokioScheduler));
        assert_eq!(page.handler_count(), 7);
    }

    #[tokio::test]
    async fn test_dispatch_applies_viewport_before_behaviors() {
        let context = sample_page();
        let card = context.elements_with_role(|role| matches!(role, ElementRole::Card))[0];
        let page = initialize(context);

        // The card at 900px fades in on the very event that scrolls to it.
        page.dispatch(&PageEvent::Scrolled { scroll_top: 400.0 });

        let faded = page
            .context()
            .with_element(card, |element| element.classes.contains("fade-in"))
            .unwrap();
        assert!(faded);
        assert_eq!(page.context().viewport().scroll_top, 400.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_drains_the_event_stream() {
        let context = sample_page();
        let page = initialize(context);
        let (tx, rx) = mpsc::channel(16);

        tx.send(PageEvent::Loaded {
            timing: LoadTiming {
                navigation_start_ms: 0,
                load_event_end_ms: 1_240,
            },
        })
        .await
        .unwrap();
        tx.send(PageEvent::Scrolled { scroll_top: 400.0 })
            .await
            .unwrap();
        drop(tx);

        page.run(rx).await;

        assert_eq!(page.context().viewport().scroll_top, 400.0);
        // Allow armed timers (throttle cool-down) to settle.
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
}
