use std::collections::{BTreeMap, HashMap, HashSet};

use crate::animation::ease::Ease;
use crate::animation::timeline::{LaneHost, Pending};
use crate::animation::tween::{ElementTask, OpacityRamp, Ticket, TweenRegistry};
use crate::buffer::circular::CircularBuffer;
use crate::config::snapshot::{BundleItems, EngineConfig};
use crate::engine::steps::{Action, Batch, Step};
use crate::engine::toggle::ToggleState;
use crate::foundation::core::{BoxRegion, Point};
use crate::foundation::error::QuadmorphResult;
use crate::graph::graph::ContainerGraph;
use crate::graph::model::{Direction, ElementRole, TeleportRole};
use crate::render::scene::FrameSnapshot;

/// Fixed step used by [`Engine::settle`].
pub const SETTLE_STEP: f64 = 1.0 / 60.0;
const SETTLE_MAX_TICKS: usize = 100_000;

/// Delay fraction before a wrapping duplicate starts fading in.
pub(crate) const WRAP_FADE_IN_DELAY: f64 = 0.3;

/// Invoked once per [`Engine::tick`] with the frame to display.
pub type FrameCallback = Box<dyn FnMut(&FrameSnapshot<'_>)>;

/// Container choreography engine.
///
/// Owns the container graph and drives every animation from [`Engine::tick`].
/// At most one operation batch runs at a time; operations requested while one
/// is in flight are dropped.
pub struct Engine {
    pub(crate) graph: ContainerGraph,
    pub(crate) bundle_items: BTreeMap<String, BundleItems>,
    pub(crate) viewport_box: Option<BoxRegion>,
    pub(crate) hitbox: Option<BoxRegion>,
    pub(crate) default_color: String,
    pub(crate) hover_color: Option<String>,
    pub(crate) cascade_delay: f64,
    pub(crate) visible_start: BTreeMap<String, usize>,

    pub(crate) animate_mode: bool,
    pub(crate) batch: Option<Batch>,
    pub(crate) tweens: TweenRegistry<Action>,
    pub(crate) initialized: HashSet<String>,
    pub(crate) buffers: HashMap<String, CircularBuffer>,
    pub(crate) toggle: ToggleState,
    pub(crate) hovered: Option<String>,
    frame_callback: Option<FrameCallback>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("animate_mode", &self.animate_mode)
            .field("busy", &self.is_busy())
            .field("containers", &self.graph.containers().len())
            .field("elements", &self.graph.elements().len())
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Build an engine in authoring mode from a validated snapshot.
    pub fn from_config(config: EngineConfig) -> QuadmorphResult<Self> {
        config.validate()?;
        let EngineConfig {
            bundles,
            containers,
            viewport_box,
            hitbox,
            default_color,
            hover_color,
            cascade_delay,
            bundle_items,
            visible_start_index,
            exported_at: _,
        } = config;
        Ok(Self {
            graph: ContainerGraph::new(bundles, containers),
            bundle_items,
            viewport_box,
            hitbox,
            default_color,
            hover_color,
            cascade_delay,
            visible_start: visible_start_index,
            animate_mode: false,
            batch: None,
            tweens: TweenRegistry::new(),
            initialized: HashSet::new(),
            buffers: HashMap::new(),
            toggle: ToggleState::default(),
            hovered: None,
            frame_callback: None,
        })
    }

    /// Current state as an exportable snapshot.
    pub fn to_config(&self) -> EngineConfig {
        EngineConfig {
            bundles: self.graph.bundles().to_vec(),
            containers: self.graph.containers().to_vec(),
            viewport_box: self.viewport_box,
            hitbox: self.hitbox,
            default_color: self.default_color.clone(),
            hover_color: self.hover_color.clone(),
            cascade_delay: self.cascade_delay,
            bundle_items: self.bundle_items.clone(),
            visible_start_index: self.visible_start.clone(),
            exported_at: None,
        }
    }

    /// Bundles, containers and elements as they stand.
    pub fn graph(&self) -> &ContainerGraph {
        &self.graph
    }

    /// Whether the engine is in animate mode.
    pub fn is_animate_mode(&self) -> bool {
        self.animate_mode
    }

    /// An operation is running; new operations are dropped until it settles.
    pub fn is_busy(&self) -> bool {
        self.batch.is_some()
    }

    /// The bundle's residents are docked, after an open cascade for button bundles.
    pub fn is_bundle_initialized(&self, bundle_id: &str) -> bool {
        self.initialized.contains(bundle_id)
    }

    /// False while the toggle has hidden everything.
    pub fn elements_visible(&self) -> bool {
        self.toggle.is_on()
    }

    /// Item index in the topmost container of a scrolling-list bundle.
    pub fn visible_start_index(&self, bundle_id: &str) -> Option<usize> {
        self.buffers.get(bundle_id).map(CircularBuffer::start)
    }

    /// Called with a snapshot at the end of every tick.
    pub fn set_frame_callback(&mut self, callback: impl FnMut(&FrameSnapshot<'_>) + 'static) {
        self.frame_callback = Some(Box::new(callback));
    }

    /// Stop calling the frame callback.
    pub fn clear_frame_callback(&mut self) {
        self.frame_callback = None;
    }

    /// Borrowed view the renderer draws from.
    pub fn snapshot(&self) -> FrameSnapshot<'_> {
        FrameSnapshot {
            graph: &self.graph,
            hovered: self.hovered.as_deref(),
            hover_color: self.hover_color.as_deref(),
            viewport: self.viewport_box,
            animate_mode: self.animate_mode,
        }
    }

    /// Derive every bundle's content elements and start animating.
    #[tracing::instrument(skip(self))]
    pub fn enter_mode(&mut self) {
        if self.animate_mode {
            tracing::debug!(reason = "already animating", "enter_mode ignored");
            return;
        }
        self.populate();
        self.animate_mode = true;
        tracing::debug!(
            elements = self.graph.elements().len(),
            scrolling_lists = self.buffers.len(),
            "entered animate mode"
        );
    }

    /// Drop all content elements and in-flight animations.
    #[tracing::instrument(skip(self))]
    pub fn exit_mode(&mut self) {
        if !self.animate_mode {
            return;
        }
        self.batch = None;
        self.tweens.clear();
        self.graph.clear_elements();
        self.initialized.clear();
        self.buffers.clear();
        self.toggle = ToggleState::default();
        self.hovered = None;
        self.animate_mode = false;
    }

    /// Hovered element for the hover font color.
    pub fn set_hovered(&mut self, element_id: Option<&str>) {
        self.hovered = element_id.map(str::to_owned);
    }

    /// Wheel input: up for negative `delta_y`, speed `|delta_y|`. Ignored
    /// outside the hitbox when one is configured.
    pub fn wheel(&mut self, delta_y: f64, pointer: Point) {
        if !self.animate_mode || self.is_busy() || delta_y == 0.0 || !delta_y.is_finite() {
            return;
        }
        if let Some(h) = self.hitbox
            && !h.contains(pointer)
        {
            tracing::trace!(x = pointer.x, y = pointer.y, "wheel outside hitbox");
            return;
        }
        let direction = if delta_y < 0.0 {
            Direction::Up
        } else {
            Direction::Down
        };
        self.scroll(direction, Some(delta_y.abs()));
    }

    /// Pointer press: toggle containers win over button containers.
    pub fn click(&mut self, p: Point) {
        if !self.animate_mode || self.is_busy() {
            return;
        }
        let hit = |role: TeleportRole| {
            self.graph
                .containers()
                .iter()
                .find(|c| c.teleport_role == Some(role) && c.contains(p))
                .map(|c| c.bundle_id.clone())
        };
        let toggle = hit(TeleportRole::Toggle);
        let button = hit(TeleportRole::Button);
        if toggle.is_some() {
            self.activate_toggle();
        } else if let Some(bundle) = button {
            self.activate_button(&bundle);
        }
    }

    /// Open or close a bundle depending on whether it is initialized.
    #[tracing::instrument(skip(self))]
    pub fn activate_button(&mut self, bundle_id: &str) {
        if !self.accepts("activate_button") {
            return;
        }
        if self.is_bundle_initialized(bundle_id) {
            self.close_cascade(bundle_id);
        } else {
            self.open_cascade(bundle_id);
        }
    }

    /// Advance the frame clock by `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        match self.batch.take() {
            Some(mut batch) => {
                batch.timeline.pump(self);
                self.advance_tweens(dt);
                batch.timeline.elapse(dt);
                batch.timeline.pump(self);
                self.finish_or_keep(batch);
            }
            None => self.advance_tweens(dt),
        }
        self.emit_frame();
    }

    /// Tick at a fixed step until idle. Returns `false` if the batch did not settle.
    pub fn settle(&mut self) -> bool {
        for _ in 0..SETTLE_MAX_TICKS {
            if !self.is_busy() && self.tweens.is_idle() {
                return true;
            }
            self.tick(SETTLE_STEP);
        }
        !self.is_busy()
    }

    pub(crate) fn accepts(&self, op: &'static str) -> bool {
        if !self.animate_mode {
            tracing::debug!(op, reason = "not in animate mode", "operation ignored");
            return false;
        }
        if self.is_busy() {
            tracing::debug!(op, reason = "busy", "operation dropped");
            return false;
        }
        true
    }

    /// Start an accepted batch; settles immediately when nothing needs time.
    pub(crate) fn run_batch(&mut self, mut batch: Batch) {
        if batch.is_empty() {
            tracing::debug!(op = batch.label, reason = "nothing to animate", "operation ignored");
            return;
        }
        tracing::debug!(op = batch.label, lanes = batch.timeline.lane_count(), "batch started");
        batch.timeline.pump(self);
        self.finish_or_keep(batch);
    }

    fn finish_or_keep(&mut self, batch: Batch) {
        if !batch.timeline.is_finished() || !self.tweens.is_idle() {
            self.batch = Some(batch);
            return;
        }
        for action in batch.finally {
            self.apply(action);
        }
        tracing::debug!(op = batch.label, "batch settled");
    }

    fn advance_tweens(&mut self, dt: f64) {
        if self.tweens.is_idle() {
            return;
        }
        let step = self.tweens.advance(dt);
        for (id, sample) in step.samples {
            if let Some(points) = sample.points {
                self.graph.set_points(&id, points);
            }
            if let Some(opacity) = sample.opacity {
                self.graph.set_opacity(&id, opacity);
            }
        }
        for action in step.settled {
            self.apply(action);
        }
    }

    fn emit_frame(&mut self) {
        if let Some(mut cb) = self.frame_callback.take() {
            cb(&self.snapshot());
            self.frame_callback = Some(cb);
        }
    }

    pub(crate) fn apply(&mut self, action: Action) {
        match action {
            Action::Dock { element, container } => self.graph.settle(&element, &container),
            Action::Hide { element } => self.graph.set_opacity(&element, 0.0),
            Action::SwapRoles {
                incoming,
                departing,
            } => {
                self.graph.set_role(&departing, ElementRole::Duplicate);
                self.graph.set_role(&incoming, ElementRole::Primary);
            }
            Action::ShiftWindow { bundle, direction } => {
                if let Some(buffer) = self.buffers.get_mut(&bundle) {
                    buffer.step(direction);
                    self.visible_start.insert(bundle, buffer.start());
                }
            }
            Action::Restage { bundle } => self.restage(&bundle),
            Action::Stow { bundle } => self.stow(&bundle),
            Action::MarkInitialized { bundle } => {
                self.initialized.insert(bundle);
            }
            Action::MarkUninitialized { bundle } => {
                self.initialized.remove(&bundle);
            }
        }
    }

    /// Morph task toward `target` that docks the element when it settles.
    fn morph_task(&self, element: &str, target: &str, duration: f64) -> Option<ElementTask<Action>> {
        let from = self.graph.element(element)?.points;
        let to = self.graph.container(target)?.points;
        Some(
            ElementTask::morph(from, to, duration, Ease::InOutQuad).on_settle(Action::Dock {
                element: element.to_owned(),
                container: target.to_owned(),
            }),
        )
    }

    fn install_morph(
        &mut self,
        element: &str,
        target: &str,
        duration: f64,
        fade: Option<OpacityRamp>,
    ) -> Option<Ticket> {
        let mut task = self.morph_task(element, target, duration)?;
        if let Some(ramp) = fade {
            task = task.with_opacity(ramp);
        }
        Some(self.tweens.install(element, task))
    }

    /// Morph that also hides `covered` once it arrives.
    pub(crate) fn install_climb(
        &mut self,
        element: &str,
        target: &str,
        duration: f64,
        covered: Option<String>,
    ) -> Option<Ticket> {
        let mut task = self.morph_task(element, target, duration)?;
        if let Some(covered) = covered {
            task = task.on_settle(Action::Hide { element: covered });
        }
        Some(self.tweens.install(element, task))
    }
}

impl LaneHost<Step> for Engine {
    fn start(&mut self, step: Step) -> Pending {
        match step {
            Step::Wait(t) => Pending::Timer(t),
            Step::SetOpacity { element, opacity } => {
                self.graph.set_opacity(&element, opacity);
                Pending::Done
            }
            Step::Teleport { element, container } => {
                self.tweens.cancel(&element);
                self.graph.teleport(&element, &container);
                Pending::Done
            }
            Step::Morph {
                element,
                target,
                duration,
            } => {
                let already_there = self.graph.element(&element).is_some_and(|e| {
                    e.container_id == target
                        && self.graph.container(&target).is_some_and(|c| c.points == e.points)
                });
                if already_there {
                    return Pending::Done;
                }
                match self.install_morph(&element, &target, duration, None) {
                    Some(t) => Pending::task(t),
                    None => Pending::Done,
                }
            }
            Step::WrapMorph {
                departing,
                exit,
                incoming,
                target,
                duration,
            } => {
                // Hidden elements stay hidden while they wrap.
                let shown = if self.toggle.is_on() { 1.0 } else { 0.0 };
                let leaving = self.graph.element(&departing).map_or(shown, |e| e.opacity);
                let out = self.install_morph(
                    &departing,
                    &exit,
                    duration,
                    Some(OpacityRamp {
                        from: leaving,
                        ..OpacityRamp::fade_out()
                    }),
                );
                let inn = self.install_morph(
                    &incoming,
                    &target,
                    duration,
                    Some(OpacityRamp {
                        to: shown,
                        ..OpacityRamp::fade_in_delayed(WRAP_FADE_IN_DELAY)
                    }),
                );
                Pending::Tasks(out.into_iter().chain(inn).collect())
            }
            Step::Climb {
                bundle,
                from,
                duration,
            } => self.start_climb(&bundle, from, duration),
            Step::FadeOutVisible { bundle, duration } => {
                let visible: Vec<(String, f64)> = self
                    .graph
                    .bundle_elements(&bundle)
                    .filter(|e| !e.is_duplicate() && e.is_visible())
                    .map(|e| (e.id.clone(), e.opacity))
                    .collect();
                let tickets = visible
                    .into_iter()
                    .map(|(id, from)| {
                        let ramp = OpacityRamp {
                            from,
                            to: 0.0,
                            delay: 0.0,
                        };
                        self.tweens.install(id, ElementTask::fade(ramp, duration))
                    })
                    .collect();
                Pending::Tasks(tickets)
            }
            Step::Apply(action) => {
                self.apply(action);
                Pending::Done
            }
        }
    }

    fn is_running(&self, ticket: Ticket) -> bool {
        self.tweens.is_running(ticket)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/orchestrator.rs"]
mod tests;
