//! Proxy builder turning CSC segment collections into display containers.
//!
//! Each event item gets one [`ElementList`] per view, titled `cscSegments`
//! and coloured after the item. Inside it, every chamber with a known
//! placement gets a `chamber<N>` line set, where `N` counts chambers in id
//! order (skipped chambers still consume their number). Chambers are
//! projected in parallel and appended in id order.
//!
//! Rebuilding an item clears its list and repopulates it; the list handle
//! stays the same across events.

use std::sync::Arc;

use event_types::{DetId, EventStore, InputTag};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::display::{Color, DisplayContext, ElementList, ElementListId, StraightLineSet};
use crate::error::{DisplayError, DisplayResult};
use crate::geometry::GeometryProvider;
use crate::params::ProxyParams;
use crate::projector::SegmentProjector;
use crate::segment::{CscSegment, CscSegmentCollection};

/// Name under which the builder is offered to the display.
pub const PURPOSE: &str = "CSC-segments";

/// Title of every top-level list the builder creates.
pub const LIST_TITLE: &str = "cscSegments";

/// 2-D view a product is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Projection {
    /// Transverse view.
    RhoPhi,
    /// Longitudinal view.
    RhoZ,
}

impl Projection {
    const fn slot(self) -> usize {
        match self {
            Self::RhoPhi => 0,
            Self::RhoZ => 1,
        }
    }
}

/// Default appearance of an event item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayProperties {
    /// Main colour of everything drawn for the item.
    pub color: Color,
}

impl DisplayProperties {
    /// Properties with the given colour.
    #[must_use]
    pub const fn with_color(color: Color) -> Self {
        Self { color }
    }
}

/// One displayed collection together with what is needed to draw it.
pub struct EventItem<'a> {
    name: String,
    properties: DisplayProperties,
    segments: Option<Arc<CscSegmentCollection>>,
    geometry: &'a dyn GeometryProvider,
}

impl std::fmt::Debug for EventItem<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventItem")
            .field("name", &self.name)
            .field("properties", &self.properties)
            .field("segments", &self.segments.as_ref().map(|s| s.len()))
            .finish_non_exhaustive()
    }
}

impl<'a> EventItem<'a> {
    /// Creates an item with no collection attached for the current event.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        properties: DisplayProperties,
        geometry: &'a dyn GeometryProvider,
    ) -> Self {
        Self {
            name: name.into(),
            properties,
            segments: None,
            geometry,
        }
    }

    /// Attaches the current event's segment collection.
    #[must_use]
    pub fn with_segments(mut self, segments: Arc<CscSegmentCollection>) -> Self {
        self.segments = Some(segments);
        self
    }

    /// Attaches the collection named by `tag` in `event`, if present.
    #[must_use]
    pub fn with_event(mut self, event: &EventStore, tag: &InputTag) -> Self {
        self.segments = event.get::<CscSegmentCollection>(tag);
        self
    }

    /// Item name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Default display properties.
    #[must_use]
    pub const fn properties(&self) -> DisplayProperties {
        self.properties
    }

    /// The current event's collection, if one was found.
    #[must_use]
    pub fn segments(&self) -> Option<&CscSegmentCollection> {
        self.segments.as_deref()
    }

    /// Geometry used to place the item's chambers.
    #[must_use]
    pub fn geometry(&self) -> &'a dyn GeometryProvider {
        self.geometry
    }
}

/// Outcome of one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
    /// Every chamber was drawn.
    Complete,
    /// Some chambers were skipped for lack of geometry.
    Partial,
    /// The segment collection was unavailable; nothing was drawn.
    MissingCollection,
}

/// Summary of one build, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// View the product was built for.
    pub projection: Projection,
    /// Overall outcome.
    pub status: BuildStatus,
    /// Chambers that received a line set.
    pub chambers_drawn: usize,
    /// Chambers skipped because no transform was available.
    pub skipped_chambers: Vec<DetId>,
    /// Lines added across all chambers.
    pub lines_drawn: usize,
}

impl BuildReport {
    fn new(projection: Projection) -> Self {
        Self {
            projection,
            status: BuildStatus::Complete,
            chambers_drawn: 0,
            skipped_chambers: Vec::new(),
            lines_drawn: 0,
        }
    }
}

/// Builds `cscSegments` containers for the rho-phi and rho-z views.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use event_types::DetId;
/// use muon_display::{
///     BuildStatus, ChamberTransform, Color, CscSegment, CscSegmentCollection,
///     CscSegmentProxyBuilder, DisplayContext, DisplayProperties, EventItem, GeometryTable, PURPOSE,
/// };
///
/// let chamber = DetId::new(0x2000_0001);
/// let mut geometry = GeometryTable::new();
/// geometry.insert(chamber, ChamberTransform::identity());
///
/// let mut segments = CscSegmentCollection::new();
/// segments.put(chamber, [CscSegment::new([1.0, 2.0, 0.0], [0.0, 0.0, 1.0])]);
///
/// let item = EventItem::new(PURPOSE, DisplayProperties::with_color(Color::RED), &geometry)
///     .with_segments(Arc::new(segments));
///
/// let mut ctx = DisplayContext::new();
/// let mut builder = CscSegmentProxyBuilder::default();
/// let report = builder.build_rho_phi(&item, &mut ctx).unwrap();
/// assert_eq!(report.status, BuildStatus::Complete);
/// assert_eq!(report.lines_drawn, 1);
/// ```
#[derive(Debug, Default)]
pub struct CscSegmentProxyBuilder {
    params: ProxyParams,
    products: [Option<ElementListId>; 2],
}

impl CscSegmentProxyBuilder {
    /// Creates a builder with custom parameters.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::InvalidParams`] for a non-positive or
    /// non-finite segment length, or a zero line width.
    pub fn new(params: ProxyParams) -> DisplayResult<Self> {
        if !params.is_valid() {
            return Err(DisplayError::InvalidParams(format!("{params:?}")));
        }
        Ok(Self {
            params,
            products: [None; 2],
        })
    }

    /// Parameters in use.
    #[must_use]
    pub const fn params(&self) -> &ProxyParams {
        &self.params
    }

    /// Handle of the list built for `projection`, once built.
    #[must_use]
    pub const fn product(&self, projection: Projection) -> Option<ElementListId> {
        self.products[projection.slot()]
    }

    /// Builds or rebuilds the rho-phi product.
    ///
    /// # Errors
    ///
    /// See [`build`](Self::build).
    pub fn build_rho_phi(
        &mut self,
        item: &EventItem<'_>,
        ctx: &mut DisplayContext,
    ) -> DisplayResult<BuildReport> {
        self.build(item, ctx, Projection::RhoPhi)
    }

    /// Builds or rebuilds the rho-z product.
    ///
    /// # Errors
    ///
    /// See [`build`](Self::build).
    pub fn build_rho_z(
        &mut self,
        item: &EventItem<'_>,
        ctx: &mut DisplayContext,
    ) -> DisplayResult<BuildReport> {
        self.build(item, ctx, Projection::RhoZ)
    }

    /// Builds or rebuilds the product for one view.
    ///
    /// A missing collection leaves the list empty and a chamber without
    /// geometry is skipped; both are logged and recorded in the report.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::UnknownElementList`] only if the list vanishes
    /// from `ctx` while being populated, which cannot happen through this
    /// builder's `&mut` access.
    pub fn build(
        &mut self,
        item: &EventItem<'_>,
        ctx: &mut DisplayContext,
        projection: Projection,
    ) -> DisplayResult<BuildReport> {
        let list_id = self.prepare_list(item, ctx, projection);
        let mut report = BuildReport::new(projection);

        let Some(segments) = item.segments() else {
            warn!(item = item.name(), "failed to get CSC segments");
            report.status = BuildStatus::MissingCollection;
            return Ok(report);
        };

        let built = self.build_chambers(item, segments);

        let list = ctx.element_list_mut(list_id)?;
        for chamber in built {
            match chamber {
                Ok(set) => {
                    report.chambers_drawn += 1;
                    report.lines_drawn += set.len();
                    list.add_element(set);
                }
                Err(det_id) => report.skipped_chambers.push(det_id),
            }
        }
        if !report.skipped_chambers.is_empty() {
            report.status = BuildStatus::Partial;
        }

        info!(
            item = item.name(),
            ?projection,
            chambers = report.chambers_drawn,
            skipped = report.skipped_chambers.len(),
            lines = report.lines_drawn,
            "built CSC segment proxies"
        );
        Ok(report)
    }

    /// Reuses the view's list (cleared) or registers a new one.
    fn prepare_list(
        &mut self,
        item: &EventItem<'_>,
        ctx: &mut DisplayContext,
        projection: Projection,
    ) -> ElementListId {
        let slot = &mut self.products[projection.slot()];
        if let Some(id) = *slot {
            if let Ok(list) = ctx.element_list_mut(id) {
                list.destroy_elements();
                return id;
            }
            debug!(item = item.name(), %id, "stale product handle, recreating list");
        }
        let list = ElementList::new(item.name(), LIST_TITLE, item.properties().color);
        let id = ctx.add_element_list(list);
        *slot = Some(id);
        id
    }

    /// Projects each chamber, returning its line set or the id it was
    /// skipped for, in chamber id order.
    fn build_chambers(
        &self,
        item: &EventItem<'_>,
        segments: &CscSegmentCollection,
    ) -> Vec<Result<StraightLineSet, DetId>> {
        let projector = SegmentProjector::new(self.params.segment_length);
        let line_width = self.params.line_width;
        let color = item.properties().color;
        let geometry = item.geometry();

        let chambers: Vec<(usize, DetId, &[CscSegment])> = segments
            .iter()
            .enumerate()
            .map(|(index, (det_id, group))| (index, det_id, group))
            .collect();

        chambers
            .par_iter()
            .map(|&(index, det_id, group)| {
                let Some(transform) = geometry.transform(det_id) else {
                    warn!(
                        det_id = det_id.raw(),
                        "failed to get geometry of CSC chamber"
                    );
                    return Err(det_id);
                };
                let mut set = StraightLineSet::new(format!("chamber{index}"), line_width, color);
                set.lines = projector.project_all(group, transform);
                Ok(set)
            })
            .collect()
    }
}
