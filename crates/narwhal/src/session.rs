use crate::error::Result;
use crate::graph::{Graph, PositionAssignment};
use crate::options::LayoutOptions;
use crate::registry::{LayoutDescriptor, LayoutRegistry};
use crate::rng;
use crate::transition::{self, TransitionGeneration, TransitionToken};
use futures::Stream;
use std::future::Future;
use std::time::Duration;

/// Default length of a layout-switch transition.
pub const DEFAULT_ANIMATION_DURATION: Duration = Duration::from_millis(1000);

/// Result of [`LayoutManager::switch_layout`]: both endpoints of the transition, since the
/// animator keeps no state of its own.
#[derive(Debug, Clone)]
pub struct LayoutSwitch {
    pub positions: PositionAssignment,
    /// Assignment of the previously active layout on the same graph; empty on the first switch.
    pub previous_positions: PositionAssignment,
    pub descriptor: LayoutDescriptor,
    pub should_animate: bool,
}

/// Layout session for one graph view: a registry, the active layout and its latest output.
#[derive(Debug, Clone)]
pub struct LayoutManager {
    registry: LayoutRegistry,
    current: Option<LayoutDescriptor>,
    positions: PositionAssignment,
    animation_duration: Duration,
    generation: TransitionGeneration,
}

impl Default for LayoutManager {
    fn default() -> Self {
        Self::with_registry(LayoutRegistry::with_builtins())
    }
}

impl LayoutManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: LayoutRegistry) -> Self {
        Self {
            registry,
            current: None,
            positions: PositionAssignment::new(),
            animation_duration: DEFAULT_ANIMATION_DURATION,
            generation: TransitionGeneration::new(),
        }
    }

    pub fn with_animation_duration(mut self, duration: Duration) -> Self {
        self.animation_duration = duration;
        self
    }

    pub fn registry(&self) -> &LayoutRegistry {
        &self.registry
    }

    pub fn register_layout(&mut self, key: impl Into<String>, descriptor: LayoutDescriptor) {
        self.registry.register(key, descriptor);
    }

    pub fn available_layouts(&self) -> impl Iterator<Item = &LayoutDescriptor> + '_ {
        self.registry.iter()
    }

    pub fn current_layout(&self) -> Option<&LayoutDescriptor> {
        self.current.as_ref()
    }

    /// Latest assignment produced by [`LayoutManager::switch_layout`].
    pub fn positions(&self) -> &PositionAssignment {
        &self.positions
    }

    pub fn animation_duration(&self) -> Duration {
        self.animation_duration
    }

    /// Activates the layout registered under `key`.
    ///
    /// The previously active layout is recomputed on `graph` first so the caller gets both
    /// transition endpoints. Session state changes only after both computations succeed; an
    /// unknown key or invalid input leaves it untouched. Transitions started earlier from this
    /// session are cancelled.
    pub fn switch_layout(
        &mut self,
        key: &str,
        graph: &Graph,
        options: &LayoutOptions,
    ) -> Result<LayoutSwitch> {
        let descriptor = self.registry.get(key)?.clone();

        let previous_positions = match &self.current {
            Some(prev) => {
                let mut rng = rng::source(options.random_seed);
                prev.compute(graph, options, &mut *rng)?
            }
            None => PositionAssignment::new(),
        };

        let mut rng = rng::source(options.random_seed);
        let positions = descriptor.compute(graph, options, &mut *rng)?;

        tracing::debug!(
            from = self.current.as_ref().map(|d| d.key.as_str()),
            to = %descriptor.key,
            "layout switched"
        );
        self.generation.cancel_all();
        self.current = Some(descriptor.clone());
        self.positions = positions.clone();

        Ok(LayoutSwitch {
            positions,
            previous_positions,
            should_animate: descriptor.animate,
            descriptor,
        })
    }

    /// Starts a transition that a later transition or layout switch on this session cancels.
    ///
    /// `duration` defaults to the session's animation duration. The returned future does not
    /// borrow the session.
    pub fn animate_transition<'a, S, F>(
        &self,
        from: &'a PositionAssignment,
        to: &'a PositionAssignment,
        duration: Option<Duration>,
        frames: S,
        on_progress: F,
    ) -> impl Future<Output = Result<PositionAssignment>> + use<'a, S, F>
    where
        S: Stream<Item = Duration> + Unpin + 'a,
        F: FnMut(&PositionAssignment, f64) + 'a,
    {
        let token: TransitionToken = self.generation.advance();
        let duration = duration.unwrap_or(self.animation_duration);
        transition::animate_with_token(from, to, duration, frames, on_progress, token)
    }

    /// Drops every registration and the session state; in-flight transitions are cancelled.
    pub fn dispose(&mut self) {
        self.generation.cancel_all();
        self.registry.clear();
        self.current = None;
        self.positions.clear();
    }
}
