use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing::{info, Level};

use veneer::config::VeneerConfig;
use veneer::page::{
    Element, ElementId, ElementRole, HostCapabilities, Key, LoadTiming, Page, PageContext,
    PageEvent, Region, Viewport,
};
use veneer::timer::TokioScheduler;

/// Drive the standard page behaviors against a sample marketing page.
#[derive(Parser, Debug)]
#[command(name = "veneer", version, about = "Page interaction behavior engine")]
struct Args {
    /// Path to a YAML configuration file
    #[arg(long)]
    config: Option<String>,

    /// Log with full debug detail
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = if args.verbose { Level::TRACE } else { Level::DEBUG };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    info!("Starting Veneer behavior engine");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => VeneerConfig::from_file(path)?,
        None => VeneerConfig::default(),
    };
    info!(
        scroll_throttle_ms = config.behavior.scroll_throttle_ms,
        resize_debounce_ms = config.behavior.resize_debounce_ms,
        ripple_duration_ms = config.behavior.ripple_duration_ms,
        "Configuration loaded"
    );

    let (context, elements) = sample_marketing_page();
    let page = Page::initialize(Arc::clone(&context), &config, Arc::new(TokioScheduler));
    info!(handlers = page.handler_count(), "Page initialized");

    // Feed a scripted interaction scenario through the engine.
    let (tx, rx) = mpsc::channel(32);
    let feeder = tokio::spawn(drive_scenario(tx, elements));
    page.run(rx).await;
    feeder.await?;

    // Let armed timers (ripple removal, cool-downs) settle before reporting.
    tokio::time::sleep(config.behavior.ripple_duration() + Duration::from_millis(100)).await;

    report_final_state(&context);
    info!("Veneer behavior engine stopped");
    Ok(())
}

/// Interactive elements of the sample page the scenario drives.
struct SampleElements {
    nav_features: ElementId,
    button: ElementId,
    input: ElementId,
}

/// Model a small marketing page: fixed header, anchored sections, a call to
/// action, content cards, and a contact input.
fn sample_marketing_page() -> (Arc<PageContext>, SampleElements) {
    let context = Arc::new(PageContext::new(
        Viewport::new(1280.0, 720.0),
        HostCapabilities::default(),
    ));

    context.insert(Element::new(
        ElementRole::Header,
        Region::new(1280.0, 64.0, 0.0, 0.0),
    ));
    let nav_features = context.insert(Element::new(
        ElementRole::NavLink {
            target: "#features".to_string(),
        },
        Region::new(80.0, 24.0, 400.0, 20.0),
    ));
    context.insert(Element::new(
        ElementRole::Section {
            anchor: "#features".to_string(),
        },
        Region::new(1280.0, 900.0, 0.0, 600.0),
    ));
    let button = context.insert(
        Element::new(ElementRole::Button, Region::new(160.0, 48.0, 560.0, 420.0))
            .with_label("Book a Demo"),
    );
    for row in 0..3 {
        context.insert(Element::new(
            ElementRole::Card,
            Region::new(380.0, 220.0, 80.0, 700.0 + 260.0 * row as f64),
        ));
    }
    let input = context.insert(Element::new(
        ElementRole::Input,
        Region::new(320.0, 40.0, 80.0, 1600.0),
    ));

    (
        context,
        SampleElements {
            nav_features,
            button,
            input,
        },
    )
}

/// The scripted scenario: load, click around, scroll the page, and resize
/// down to a phone.
async fn drive_scenario(tx: mpsc::Sender<PageEvent>, elements: SampleElements) {
    let step = Duration::from_millis(150);

    let events = [
        PageEvent::Loaded {
            timing: LoadTiming {
                navigation_start_ms: 0,
                load_event_end_ms: 1_240,
            },
        },
        PageEvent::NavLinkActivated {
            link: elements.nav_features,
        },
        PageEvent::Scrolled { scroll_top: 180.0 },
        PageEvent::Scrolled { scroll_top: 536.0 },
        PageEvent::PointerPressed {
            target: elements.button,
            page_x: 640.0,
            page_y: 444.0,
        },
        PageEvent::KeyPressed {
            target: elements.button,
            key: Key::Enter,
        },
        PageEvent::Scrolled { scroll_top: 1_100.0 },
        PageEvent::FocusGained {
            target: elements.input,
        },
        PageEvent::FocusLost {
            target: elements.input,
        },
        PageEvent::Resized {
            width: 375.0,
            height: 667.0,
        },
    ];

    for event in events {
        if tx.send(event).await.is_err() {
            return;
        }
        tokio::time::sleep(step).await;
    }
}

/// Log the view state the scenario produced.
fn report_final_state(context: &PageContext) {
    let viewport = context.viewport();
    info!(
        scroll_top = viewport.scroll_top,
        scroll_request = ?viewport.last_scroll_request,
        "Final viewport state"
    );

    let faded = context
        .elements_with_role(|role| matches!(role, ElementRole::Card))
        .into_iter()
        .filter(|id| {
            context
                .with_element(*id, |element| element.classes.contains("fade-in"))
                .unwrap_or(false)
        })
        .count();
    info!(faded_cards = faded, "Fade-in results");

    context.with_element(context.body_id(), |body| {
        let state = serde_json::to_string(body).unwrap_or_default();
        info!(body = %state, "Body view state");
    });
}
