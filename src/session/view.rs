//! The interactive graph view.
//!
//! A [`GraphView`] owns everything that outlives a single snapshot: the current
//! scene, the sticky position cache and the refresh bookkeeping. Each applied
//! refresh builds a complete new scene before replacing the old one, so readers
//! never see a half-updated graph.

use crate::consolidate::{ConsolidationReport, Consolidator};
use crate::core::config::Config;
use crate::core::error::{GraphError, GraphResult, SnapshotError};
use crate::core::types::NodeId;
use crate::graph::snapshot::GraphSnapshot;
use crate::graph::structure::AudioGraph;
use crate::layout::bounds::{LayoutBounds, ViewTransform};
use crate::layout::engine::{Layout, LayoutEngine};
use crate::layout::ports::PortGeometry;
use crate::layout::positions::PositionCache;
use crate::session::render::RenderModel;
use crate::session::source::SnapshotSource;
use log::{debug, info, warn};

/// Identifies one refresh cycle. Later tickets compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    /// Sequence number of the ticket.
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// What happened to a completed refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The snapshot replaced the current scene.
    Applied {
        /// Nodes in the new scene.
        nodes: usize,
        /// Links in the new scene.
        links: usize,
    },
    /// A newer refresh was applied first; the snapshot was discarded.
    Stale,
}

/// One consolidated, laid-out snapshot.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Consolidated graph.
    pub graph: AudioGraph,
    /// Node placement.
    pub layout: Layout,
    /// Port anchors and link routes.
    pub geometry: PortGeometry,
    /// What consolidation changed.
    pub report: ConsolidationReport,
}

/// Graph view session.
pub struct GraphView {
    config: Config,
    consolidator: Consolidator,
    engine: LayoutEngine,
    cache: PositionCache,
    scene: Option<Scene>,
    next_ticket: u64,
    applied_ticket: u64,
    last_error: Option<String>,
}

impl Default for GraphView {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl GraphView {
    /// Create an empty view.
    pub fn new(config: Config) -> Self {
        Self {
            engine: LayoutEngine::new(config.layout.clone()),
            consolidator: Consolidator::new(),
            config,
            cache: PositionCache::new(),
            scene: None,
            next_ticket: 0,
            applied_ticket: 0,
            last_error: None,
        }
    }

    /// Use a custom consolidator.
    pub fn with_consolidator(mut self, consolidator: Consolidator) -> Self {
        self.consolidator = consolidator;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Configuration the view was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current scene, `None` until a snapshot has been applied.
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Sticky positions by node name.
    pub fn positions(&self) -> &PositionCache {
        &self.cache
    }

    /// Message of the most recent failed fetch, cleared by the next applied
    /// refresh.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Render model of the current scene.
    pub fn render_model(&self) -> Option<RenderModel> {
        self.scene.as_ref().map(|scene| {
            RenderModel::build(
                &scene.graph,
                &scene.layout,
                &scene.geometry,
                self.engine.config(),
                &scene.report,
            )
        })
    }

    /// Transform fitting the current scene into the configured viewport.
    pub fn fit_transform(&self) -> Option<ViewTransform> {
        let scene = self.scene.as_ref()?;
        let bounds = LayoutBounds::of(&scene.layout)?;
        Some(bounds.fit(self.config.refresh.viewport_width, self.config.refresh.viewport_height))
    }

    // ========================================================================
    // Refresh
    // ========================================================================

    /// Start a refresh cycle.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.next_ticket += 1;
        RefreshTicket(self.next_ticket)
    }

    /// Finish the refresh cycle identified by `ticket`.
    ///
    /// Results of cycles older than the last applied one are discarded. A failed
    /// fetch is returned as an error and leaves the current scene in place.
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<GraphSnapshot, SnapshotError>,
    ) -> Result<RefreshOutcome, SnapshotError> {
        if ticket.0 <= self.applied_ticket {
            debug!(
                "discarding refresh {} (refresh {} already applied)",
                ticket.0, self.applied_ticket
            );
            return Ok(RefreshOutcome::Stale);
        }

        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("graph refresh {} failed, keeping previous graph: {}", ticket.0, e);
                self.last_error = Some(e.to_string());
                return Err(e);
            }
        };

        let scene = self.build_scene(&snapshot);
        let outcome = RefreshOutcome::Applied {
            nodes: scene.graph.node_count(),
            links: scene.graph.link_count(),
        };

        let pruned = self.cache.prune(scene.graph.nodes().map(|n| n.name.as_str()));
        info!(
            "applied refresh {}: {} nodes, {} links ({} merges, {} stale positions dropped)",
            ticket.0,
            scene.graph.node_count(),
            scene.graph.link_count(),
            scene.report.merges.len(),
            pruned
        );

        self.scene = Some(scene);
        self.applied_ticket = ticket.0;
        self.last_error = None;
        Ok(outcome)
    }

    /// Fetch from `source` and apply the result.
    pub fn refresh(&mut self, source: &dyn SnapshotSource) -> Result<RefreshOutcome, SnapshotError> {
        let ticket = self.begin_refresh();
        debug!("refresh {} from {}", ticket.0, source.describe());
        let result = source.fetch();
        self.complete_refresh(ticket, result)
    }

    /// Apply a snapshot that is already at hand.
    pub fn load_snapshot(&mut self, snapshot: GraphSnapshot) -> RefreshOutcome {
        let ticket = self.begin_refresh();
        match self.complete_refresh(ticket, Ok(snapshot)) {
            Ok(outcome) => outcome,
            Err(_) => RefreshOutcome::Stale,
        }
    }

    fn build_scene(&mut self, snapshot: &GraphSnapshot) -> Scene {
        let (graph, report) = self.consolidator.consolidate_with_report(snapshot);
        let layout = self.engine.layout(&graph, &mut self.cache);
        let geometry = PortGeometry::compute(&graph, &layout, self.engine.config());
        Scene {
            graph,
            layout,
            geometry,
            report,
        }
    }

    // ========================================================================
    // Interaction
    // ========================================================================

    /// Forget all sticky positions and lay the current graph out afresh.
    pub fn reset_layout(&mut self) {
        self.cache.clear();
        if let Some(scene) = self.scene.as_mut() {
            scene.layout = self.engine.layout(&scene.graph, &mut self.cache);
            scene.geometry = PortGeometry::compute(&scene.graph, &scene.layout, self.engine.config());
            debug!("layout reset for {} nodes", scene.layout.len());
        }
    }

    /// Move a node by `(dx, dy)` and remember its new position.
    pub fn drag_node(&mut self, id: NodeId, dx: f64, dy: f64) -> GraphResult<()> {
        let scene = self.scene.as_mut().ok_or(GraphError::NoModel)?;
        let name = scene.graph.get_node(id)?.name.clone();
        let moved = scene
            .layout
            .translate(id, dx, dy)
            .ok_or(GraphError::NodeNotFound(id))?;
        self.cache.insert(name, moved.x, moved.y);
        scene
            .geometry
            .reroute_node(&scene.graph, &scene.layout, self.engine.config(), id);
        Ok(())
    }
}
