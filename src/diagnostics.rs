//! Load timing and capability diagnostics.

use std::sync::Arc;

use tracing::{info, warn};

use crate::page::handlers::BehaviorHandler;
use crate::page::{PageContext, PageEvent};

/// Class added to the body when the host lacks modern layout support.
pub const FALLBACK_CLASS: &str = "no-modern-css";

/// Report the host's layout capabilities and apply the fallback class when
/// grid or flexbox support is missing.
pub fn report_capabilities(page: &PageContext) {
    let capabilities = page.capabilities();
    info!(
        css_grid = capabilities.css_grid,
        css_flexbox = capabilities.css_flexbox,
        "Host layout capabilities"
    );

    if !capabilities.css_grid || !capabilities.css_flexbox {
        page.update_element(page.body_id(), |body| body.classes.add(FALLBACK_CLASS));
        warn!("Modern layout unsupported, fallback class applied");
    }
}

/// Reports page load timing once the host signals the load is complete.
pub struct DiagnosticsHandler;

impl BehaviorHandler for DiagnosticsHandler {
    fn name(&self) -> &'static str {
        "diagnostics"
    }

    fn on_event(&self, _page: &Arc<PageContext>, event: &PageEvent) {
        if let PageEvent::Loaded { timing } = event {
            info!(page_load_ms = timing.page_load_ms(), "Page load complete");
        }
    }
}
