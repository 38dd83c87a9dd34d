//! Public entry points: `resolve`, `suggest` and `forecast`.
//!
//! Each call reads one [`Snapshot`] from the store, builds whatever it needs from it
//! and returns. Nothing is cached between calls and nothing is written back, so
//! concurrent calls share no mutable state.

use tracing::{debug, info, warn};

use crate::algorithms::{default_policies, run_strategies, AllocationInput, ScoringPolicy};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::graph::PhysicalGraph;
use crate::history::{ScoreAdjuster, StatisticsEngine};
use crate::inventory::{InventoryStore, Snapshot};
use crate::recommend::{ForecastResult, Forecaster, Ranker, RecommendationResult};
use crate::topology::{LogicalEdge, LogicalNode, TopologyMapping};
use crate::window::{days_before, TimeWindow};
use crate::DeviceId;


/// Topology resolver and recommendation engine over an inventory store.
pub struct TopologyEngine<S> {
    store: S,
    config: EngineConfig,
    policies: Vec<Box<dyn ScoringPolicy>>,
}

impl<S: InventoryStore> TopologyEngine<S> {
    /// Engine with the default configuration and strategies.
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: EngineConfig::default(),
            policies: default_policies(),
        }
    }

    /// Engine with a custom configuration.
    pub fn with_config(store: S, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            policies: default_policies(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Up to `num_options` complete mappings of the logical topology for `window`,
    /// best total fit first.
    ///
    /// Infeasible strategies are dropped; an empty list means no strategy could cover
    /// every node. Degenerate windows and empty topologies yield an empty list.
    pub fn resolve(
        &self,
        nodes: &[LogicalNode],
        edges: &[LogicalEdge],
        window: TimeWindow,
        num_options: usize,
    ) -> Result<Vec<TopologyMapping>, EngineError> {
        if window.is_degenerate() || nodes.is_empty() {
            debug!(window = %window, nodes = nodes.len(), "nothing to resolve");
            return Ok(Vec::new());
        }

        let snapshot = Snapshot::fetch(&self.store, None, window)?;
        let mappings = self.resolve_in(&snapshot, nodes, edges, window, num_options);
        info!(mappings = mappings.len(), "resolved topology");
        Ok(mappings)
    }

    /// Resolves the topology, adjusts each mapping with booking history and ranks
    /// the results, best recommendation first.
    pub fn suggest(
        &self,
        nodes: &[LogicalNode],
        edges: &[LogicalEdge],
        window: TimeWindow,
    ) -> Result<Vec<RecommendationResult>, EngineError> {
        if window.is_degenerate() || nodes.is_empty() {
            debug!(window = %window, nodes = nodes.len(), "nothing to suggest");
            return Ok(Vec::new());
        }

        let as_of = self.config.now();
        let history_start = days_before(as_of, u64::from(self.config.stats_lookback_days));
        let range = TimeWindow::open_ended(window.start().min(history_start));
        let snapshot = Snapshot::fetch(&self.store, None, range)?;

        let base = self.resolve_in(&snapshot, nodes, edges, window, self.config.suggest_options);
        let stats = StatisticsEngine::new(&snapshot, as_of);
        let adjuster = ScoreAdjuster::new(
            stats,
            self.config.stats_lookback_days,
            self.config.score_weights,
        );
        let ranker = Ranker::new(
            &snapshot,
            stats,
            self.config.stats_lookback_days,
            self.config.mapping_slot_horizon_days,
            self.config.recommendation_weights,
        );

        let adjusted = base.iter().map(|m| adjuster.adjust_mapping(m, &window));
        let recommendations = ranker.rank(adjusted, window.start());
        info!(
            recommendations = recommendations.len(),
            "ranked topology suggestions"
        );
        Ok(recommendations)
    }

    /// Availability forecast for each known device in `device_ids`, in input order.
    ///
    /// Unknown ids are skipped.
    pub fn forecast(
        &self,
        device_ids: &[DeviceId],
        window: TimeWindow,
        forecast_window_days: u32,
    ) -> Result<Vec<ForecastResult>, EngineError> {
        if window.is_degenerate() || device_ids.is_empty() {
            debug!(window = %window, devices = device_ids.len(), "nothing to forecast");
            return Ok(Vec::new());
        }

        let as_of = self.config.now();
        let analogous_start = days_before(window.start(), 2 * u64::from(forecast_window_days));
        let history_start =
            days_before(as_of, u64::from(self.config.forecast_stats_lookback_days));
        let range = TimeWindow::open_ended(analogous_start.min(history_start));
        let snapshot = Snapshot::fetch(&self.store, Some(device_ids), range)?;

        let forecaster = Forecaster::new(
            StatisticsEngine::new(&snapshot, as_of),
            self.config.forecast_stats_lookback_days,
        );

        let mut results = Vec::with_capacity(device_ids.len());
        for &id in device_ids {
            let Some(device) = snapshot.device(id) else {
                warn!(device_id = id, "unknown device, skipping forecast");
                continue;
            };
            results.push(forecaster.forecast(
                device,
                snapshot.reservations_of(id),
                &window,
                forecast_window_days,
            ));
        }
        info!(forecasts = results.len(), "forecast device availability");
        Ok(results)
    }

    /// [`forecast`](Self::forecast) over the configured forecast horizon.
    pub fn forecast_default(
        &self,
        device_ids: &[DeviceId],
        window: TimeWindow,
    ) -> Result<Vec<ForecastResult>, EngineError> {
        self.forecast(device_ids, window, self.config.forecast_window_days)
    }

    fn resolve_in(
        &self,
        snapshot: &Snapshot,
        nodes: &[LogicalNode],
        edges: &[LogicalEdge],
        window: TimeWindow,
        limit: usize,
    ) -> Vec<TopologyMapping> {
        let graph = PhysicalGraph::build(snapshot, window);
        let pool = graph.available_by_type();
        let input = AllocationInput {
            graph: &graph,
            nodes,
            edges,
            pool: &pool,
            weights: self.config.score_weights,
        };
        run_strategies(&self.policies, &input, limit)
    }
}
