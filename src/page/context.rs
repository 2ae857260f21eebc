//! Modeled host page: elements, viewport, and capability flags.

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use uuid::Uuid;

use super::ripple::RippleOverlay;
use super::state::{ClassList, StyleState};

/// A rectangular region in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Region {
    pub width: f64,
    pub height: f64,
    /// Distance from the left edge of the page
    pub left: f64,
    /// Distance from the top of the page
    pub top: f64,
}

impl Region {
    /// Create a region from its dimensions and page-space origin.
    pub fn new(width: f64, height: f64, left: f64, top: f64) -> Self {
        Self {
            width,
            height,
            left,
            top,
        }
    }

    /// Page coordinates of the region's center.
    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// Unique identifier for a modeled element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ElementId(Uuid);

impl ElementId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a modeled element is, from the behaviors' point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ElementRole {
    /// The fixed page header
    Header,
    /// A navigation link targeting an in-page anchor (`#features`, or a bare `#`)
    NavLink { target: String },
    /// A clickable button that receives ripple feedback
    Button,
    /// A content card observed for fade-in
    Card,
    /// A form input
    Input,
    /// An anchored content section
    Section { anchor: String },
    /// The document body
    Body,
    /// The synthesized skip-to-content link
    SkipLink { target: String },
}

/// A modeled page element with its geometry and view state.
#[derive(Debug, Clone, Serialize)]
pub struct Element {
    pub id: ElementId,
    pub role: ElementRole,
    pub region: Region,
    pub label: Option<String>,
    pub style: StyleState,
    pub classes: ClassList,
    pub ripple: Option<RippleOverlay>,
}

impl Element {
    /// Create an element with the given role and geometry.
    pub fn new(role: ElementRole, region: Region) -> Self {
        Self {
            id: ElementId::new(),
            role,
            region,
            label: None,
            style: StyleState::new(),
            classes: ClassList::new(),
            ripple: None,
        }
    }

    /// Attach a text label.
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }
}

/// How a requested scroll should be animated by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScrollBehavior {
    Smooth,
    Auto,
}

/// A scroll position requested from the host viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollRequest {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

/// Viewport state of the host page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_top: f64,
    /// Most recent scroll position requested by a behavior, if any
    pub last_scroll_request: Option<ScrollRequest>,
}

impl Viewport {
    /// Create a viewport at the top of the page.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scroll_top: 0.0,
            last_scroll_request: None,
        }
    }
}

/// Layout capabilities reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HostCapabilities {
    pub css_grid: bool,
    pub css_flexbox: bool,
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self {
            css_grid: true,
            css_flexbox: true,
        }
    }
}

/// The modeled host page handed to [`Page::initialize`](super::Page::initialize).
///
/// Thread-safe: behaviors running from timer callbacks share it through an
/// `Arc` and mutate element view state in place.
pub struct PageContext {
    elements: DashMap<ElementId, Element>,
    /// Body children in document order
    body_children: Mutex<Vec<ElementId>>,
    viewport: RwLock<Viewport>,
    capabilities: HostCapabilities,
    body: ElementId,
}

impl PageContext {
    /// Create a page with an empty body.
    pub fn new(viewport: Viewport, capabilities: HostCapabilities) -> Self {
        let body = Element::new(ElementRole::Body, Region::default());
        let body_id = body.id;
        let elements = DashMap::new();
        elements.insert(body_id, body);

        Self {
            elements,
            body_children: Mutex::new(Vec::new()),
            viewport: RwLock::new(viewport),
            capabilities,
            body: body_id,
        }
    }

    /// The body element's id.
    pub fn body_id(&self) -> ElementId {
        self.body
    }

    /// Host capability flags.
    pub fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }

    /// Append an element to the body and return its id.
    pub fn insert(&self, element: Element) -> ElementId {
        let id = element.id;
        self.elements.insert(id, element);
        self.body_children.lock().push(id);
        id
    }

    /// Insert an element as the first body child and return its id.
    pub fn insert_first(&self, element: Element) -> ElementId {
        let id = element.id;
        self.elements.insert(id, element);
        self.body_children.lock().insert(0, id);
        id
    }

    /// Body children in document order.
    pub fn body_children(&self) -> Vec<ElementId> {
        self.body_children.lock().clone()
    }

    /// Read an element through a closure.
    pub fn with_element<R>(&self, id: ElementId, f: impl FnOnce(&Element) -> R) -> Option<R> {
        self.elements.get(&id).map(|element| f(&element))
    }

    /// Mutate an element through a closure.
    pub fn update_element<R>(
        &self,
        id: ElementId,
        f: impl FnOnce(&mut Element) -> R,
    ) -> Option<R> {
        self.elements.get_mut(&id).map(|mut element| f(&mut element))
    }

    /// Ids of all elements whose role matches the predicate, in document order
    /// for body children and unordered for the rest.
    pub fn elements_with_role(&self, matches: impl Fn(&ElementRole) -> bool) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|entry| matches(&entry.role))
            .map(|entry| entry.id)
            .collect()
    }

    /// The height of the page header, or 0 when no header exists.
    pub fn header_height(&self) -> f64 {
        self.elements
            .iter()
            .find(|entry| entry.role == ElementRole::Header)
            .map(|entry| entry.region.height)
            .unwrap_or(0.0)
    }

    /// Find the section registered for an anchor.
    pub fn find_section(&self, anchor: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .find(|entry| matches!(&entry.role, ElementRole::Section { anchor: a } if a == anchor))
            .map(|entry| entry.id)
    }

    /// A snapshot of the viewport state.
    pub fn viewport(&self) -> Viewport {
        self.viewport.read().clone()
    }

    /// Mutate the viewport state through a closure.
    pub fn update_viewport<R>(&self, f: impl FnOnce(&mut Viewport) -> R) -> R {
        f(&mut self.viewport.write())
    }
}
