#![forbid(unsafe_code)]

//! Unit-value stepper: a `%`/`px` unit toggle and a numeric field with
//! decrement/increment buttons.
//!
//! # Value rules
//!
//! The committed value is never negative, and never above the percent
//! maximum while the unit is [`Unit::Percent`]. Text typed into the field is
//! only interpreted when editing ends (focus lost):
//!
//! | Input (percent)   | Result                         |
//! |-------------------|--------------------------------|
//! | `"12,3"`          | `12.3` (first comma is a dot)  |
//! | `"12a3"`          | `12` (longest numeric prefix)  |
//! | `"a123"`          | previous value                 |
//! | `"-5"`            | `0` (clamped)                  |
//! | `"150"`           | previous value (not clamped)   |
//!
//! Negative input clamps but over-range percent input reverts. Switching
//! from `px` to `%` with a value above the maximum clamps it to the maximum.
//!
//! # Disabled buttons
//!
//! Decrement is disabled at `0`; increment is disabled at the percent
//! maximum under `%`. A disabled button carries a [`Tooltip`] explaining why.

use serde::{Deserialize, Serialize};
use unitkit_core::event::{Event, EventContext, PointerEventKind};
use unitkit_core::geometry::{Rect, Sides, Viewport};
use unitkit_render::{Node, NodeFlags, NodeId, Role, Scene};
use web_time::Duration;

use crate::config::WidgetConfig;
use crate::numeric::{
    decimals_of, format_value, normalize_decimal_separator, parse_leading_float, round_to,
};
use crate::text_field::TextField;
use crate::tooltip::{Tooltip, TooltipState};
use crate::{Component, StatefulWidget};

/// Default tooltip on a disabled decrement button.
pub const MIN_MESSAGE: &str = "Value must greater than 0";
/// Default tooltip on a disabled increment button.
pub const MAX_MESSAGE: &str = "Value must smaller than 100";

const PANEL_WIDTH: f64 = 288.0;
const PADDING: f64 = 16.0;
const ROW_GAP: f64 = 16.0;
const ROW_WIDTH: f64 = 240.0;
const ROW_HEIGHT: f64 = 36.0;
const CONTROL_WIDTH: f64 = 160.0;
const TOGGLE_INSET: f64 = 2.0;
const TOGGLE_GAP: f64 = 2.0;

/// Unit of the stepper's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Bounded by the percent maximum.
    #[default]
    Percent,
    /// Unbounded above.
    Pixel,
}

impl Unit {
    /// Toggle order.
    pub const ALL: [Unit; 2] = [Unit::Percent, Unit::Pixel];

    /// Button label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Percent => "%",
            Self::Pixel => "px",
        }
    }
}

/// Step size and bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepLimits {
    /// Amount added or removed per button press.
    pub step: f64,
    /// Upper bound while the unit is percent.
    pub percent_max: f64,
}

impl Default for StepLimits {
    fn default() -> Self {
        Self {
            step: 0.1,
            percent_max: 100.0,
        }
    }
}

impl StepLimits {
    /// Replace a non-positive or non-finite step or percent maximum with its
    /// default.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let valid = |v: f64| v.is_finite() && v > 0.0;
        let limits = Self {
            step: if valid(self.step) { self.step } else { defaults.step },
            percent_max: if valid(self.percent_max) {
                self.percent_max
            } else {
                defaults.percent_max
            },
        };
        #[cfg(feature = "tracing")]
        if limits != self {
            tracing::warn!(
                step = self.step,
                percent_max = self.percent_max,
                "invalid step limits replaced with defaults"
            );
        }
        limits
    }

    fn upper(&self, unit: Unit) -> f64 {
        match unit {
            Unit::Percent => self.percent_max,
            Unit::Pixel => f64::INFINITY,
        }
    }
}

/// Why an edit was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevertReason {
    /// No numeric prefix.
    NotANumber,
    /// Parsed to an infinity. Only finite values are ever committed, so
    /// `"Infinity"` reverts even under [`Unit::Pixel`], which has no upper
    /// bound.
    NotFinite,
    /// Above the percent maximum.
    AboveMaximum,
}

/// Result of interpreting edited text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommitOutcome {
    /// The parsed value becomes the committed value.
    Accepted(f64),
    /// Negative input; the committed value becomes zero.
    ClampedToZero,
    /// The committed value goes back to its pre-edit snapshot.
    Reverted(RevertReason),
}

/// Interpret edited text for the given unit.
///
/// ```
/// use unitkit_widgets::unit_value::{normalize_input, CommitOutcome, RevertReason, StepLimits, Unit};
///
/// let limits = StepLimits::default();
/// assert_eq!(normalize_input("12,3", Unit::Percent, &limits), CommitOutcome::Accepted(12.3));
/// assert_eq!(normalize_input("-5", Unit::Percent, &limits), CommitOutcome::ClampedToZero);
/// assert_eq!(
///     normalize_input("150", Unit::Percent, &limits),
///     CommitOutcome::Reverted(RevertReason::AboveMaximum)
/// );
/// assert_eq!(normalize_input("150", Unit::Pixel, &limits), CommitOutcome::Accepted(150.0));
/// ```
pub fn normalize_input(text: &str, unit: Unit, limits: &StepLimits) -> CommitOutcome {
    let normalized = normalize_decimal_separator(text);
    let Some(parsed) = parse_leading_float(&normalized) else {
        return CommitOutcome::Reverted(RevertReason::NotANumber);
    };
    if parsed < 0.0 {
        return CommitOutcome::ClampedToZero;
    }
    if !parsed.is_finite() {
        return CommitOutcome::Reverted(RevertReason::NotFinite);
    }
    if parsed > limits.upper(unit) {
        return CommitOutcome::Reverted(RevertReason::AboveMaximum);
    }
    // -0 parses as not-below-zero; store it as plain zero.
    CommitOutcome::Accepted(parsed + 0.0)
}

/// Value, unit, and edit buffer of a stepper.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitValueState {
    unit: Unit,
    committed: f64,
    edit: TextField,
    value_before_edit: f64,
    editing: bool,
    limits: StepLimits,
}

impl Default for UnitValueState {
    fn default() -> Self {
        Self::new(Unit::Percent, 1.0, StepLimits::default())
    }
}

impl UnitValueState {
    /// Create a state; invalid limits fall back to their defaults and the
    /// initial value is forced into range.
    pub fn new(unit: Unit, value: f64, limits: StepLimits) -> Self {
        let limits = limits.sanitized();
        let value = if value.is_finite() {
            value.clamp(0.0, limits.upper(unit))
        } else {
            0.0
        };
        Self {
            unit,
            committed: value,
            edit: TextField::new().with_value(format_value(value)),
            value_before_edit: value,
            editing: false,
            limits,
        }
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// The committed value.
    pub fn value(&self) -> f64 {
        self.committed
    }

    /// Text currently shown in the field.
    pub fn text(&self) -> &str {
        self.edit.value()
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Snapshot taken when the current (or last) edit began.
    pub fn value_before_edit(&self) -> f64 {
        self.value_before_edit
    }

    pub fn limits(&self) -> StepLimits {
        self.limits
    }

    pub fn decrement_disabled(&self) -> bool {
        self.committed <= 0.0
    }

    pub fn increment_disabled(&self) -> bool {
        self.unit == Unit::Percent && self.committed >= self.limits.percent_max
    }

    /// Switch unit, clamping to the percent maximum when switching to `%`.
    ///
    /// Returns whether anything changed.
    pub fn select_unit(&mut self, unit: Unit) -> bool {
        let unit_changed = self.unit != unit;
        self.unit = unit;
        if unit == Unit::Percent && self.committed > self.limits.percent_max {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                from = self.committed,
                to = self.limits.percent_max,
                "value clamped on unit switch"
            );
            self.set_committed(self.limits.percent_max);
            return true;
        }
        unit_changed
    }

    /// Step down, never below zero. Returns whether the value changed.
    pub fn decrement(&mut self) -> bool {
        if self.decrement_disabled() {
            return false;
        }
        let next = round_to(self.committed - self.limits.step, self.step_decimals()).max(0.0);
        self.set_committed(next + 0.0);
        true
    }

    /// Step up, never above the unit's maximum. Returns whether the value
    /// changed.
    pub fn increment(&mut self) -> bool {
        if self.increment_disabled() {
            return false;
        }
        let next = round_to(self.committed + self.limits.step, self.step_decimals())
            .min(self.limits.upper(self.unit));
        self.set_committed(next);
        true
    }

    /// Focus gained: snapshot the value for a possible revert.
    pub fn begin_edit(&mut self) {
        self.value_before_edit = self.committed;
        self.editing = true;
    }

    /// Replace the field text verbatim. Ignored unless editing.
    pub fn edit_text(&mut self, text: impl Into<String>) -> bool {
        if !self.editing {
            return false;
        }
        self.edit.set_value(text);
        true
    }

    /// Apply a key or paste event to the field. Ignored unless editing.
    pub fn edit_event(&mut self, event: &Event) -> bool {
        self.editing && self.edit.handle_event(event)
    }

    /// Focus lost: interpret the text and commit, clamp, or revert.
    ///
    /// Returns `None` when no edit was in progress.
    pub fn commit_edit(&mut self) -> Option<CommitOutcome> {
        if !self.editing {
            return None;
        }
        self.editing = false;
        let outcome = normalize_input(self.edit.value(), self.unit, &self.limits);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            input = self.edit.value(),
            unit = self.unit.label(),
            outcome = ?outcome,
            "value commit"
        );

        match outcome {
            CommitOutcome::Accepted(v) => self.set_committed(v),
            CommitOutcome::ClampedToZero => self.set_committed(0.0),
            CommitOutcome::Reverted(_) => self.set_committed(self.value_before_edit),
        }
        Some(outcome)
    }

    /// Single write path for the committed value; keeps the text in sync.
    fn set_committed(&mut self, value: f64) {
        self.committed = value;
        self.edit.set_value(format_value(value));
    }

    fn step_decimals(&self) -> u32 {
        decimals_of(self.limits.step)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    Unit(Unit),
    Decrement,
    Input,
    Increment,
}

/// Mounted stepper: state plus the tooltips on its step buttons.
#[derive(Debug)]
pub struct UnitValue {
    state: UnitValueState,
    min_tip: TooltipState,
    max_tip: TooltipState,
    min_message: String,
    max_message: String,
    tooltip_delay: Duration,
    tooltip_geometry: (f64, f64),
    parts: Vec<(NodeId, Part)>,
}

impl Default for UnitValue {
    fn default() -> Self {
        Self::from_config(&WidgetConfig::default())
    }
}

impl UnitValue {
    /// Percent unit, value `1`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &WidgetConfig) -> Self {
        let stepper = &config.stepper;
        let limits = StepLimits {
            step: stepper.step,
            percent_max: stepper.percent_max,
        };
        Self {
            state: UnitValueState::new(stepper.initial_unit, stepper.initial_value, limits),
            min_tip: TooltipState::new(),
            max_tip: TooltipState::new(),
            min_message: stepper.min_message.clone(),
            max_message: stepper.max_message.clone(),
            tooltip_delay: config.tooltip.delay(),
            tooltip_geometry: (config.tooltip.height, config.tooltip.gap),
            parts: Vec::new(),
        }
    }

    pub fn state(&self) -> &UnitValueState {
        &self.state
    }

    /// Tooltip configuration of the decrement button for the current state.
    pub fn decrement_tooltip(&self) -> Tooltip {
        self.step_tooltip(&self.min_message, self.state.decrement_disabled())
    }

    /// Tooltip configuration of the increment button for the current state.
    pub fn increment_tooltip(&self) -> Tooltip {
        self.step_tooltip(&self.max_message, self.state.increment_disabled())
    }

    pub fn decrement_tooltip_state(&self) -> &TooltipState {
        &self.min_tip
    }

    pub fn increment_tooltip_state(&self) -> &TooltipState {
        &self.max_tip
    }

    fn step_tooltip(&self, message: &str, disabled: bool) -> Tooltip {
        let (height, gap) = self.tooltip_geometry;
        Tooltip::new(message)
            .enabled(disabled)
            .delay(self.tooltip_delay)
            .geometry(height, gap)
    }

    fn sync_tooltips(&mut self, viewport: Viewport) {
        let min = self.decrement_tooltip();
        let max = self.increment_tooltip();
        self.min_tip.sync(&min, viewport);
        self.max_tip.sync(&max, viewport);
    }

    fn part_of(&self, id: NodeId) -> Option<Part> {
        self.parts
            .iter()
            .find(|(node, _)| *node == id)
            .map(|(_, part)| *part)
    }

    fn handle_part(&mut self, part: Part, event: &Event, ctx: &EventContext) -> bool {
        match (part, event) {
            (Part::Unit(unit), Event::Pointer(p)) if p.kind == PointerEventKind::Click => {
                self.state.select_unit(unit)
            }
            (Part::Decrement, Event::Pointer(p)) => match p.kind {
                PointerEventKind::Click => self.state.decrement(),
                PointerEventKind::Enter => {
                    let tip = self.decrement_tooltip();
                    self.min_tip.pointer_enter(&tip, ctx)
                }
                PointerEventKind::Leave => {
                    let tip = self.decrement_tooltip();
                    self.min_tip.pointer_leave(&tip, ctx)
                }
            },
            (Part::Increment, Event::Pointer(p)) => match p.kind {
                PointerEventKind::Click => self.state.increment(),
                PointerEventKind::Enter => {
                    let tip = self.increment_tooltip();
                    self.max_tip.pointer_enter(&tip, ctx)
                }
                PointerEventKind::Leave => {
                    let tip = self.increment_tooltip();
                    self.max_tip.pointer_leave(&tip, ctx)
                }
            },
            (Part::Input, Event::Focus(true)) => {
                self.state.begin_edit();
                true
            }
            (Part::Input, Event::Focus(false)) => self.state.commit_edit().is_some(),
            (Part::Input, Event::Change(text)) => self.state.edit_text(text.clone()),
            (Part::Input, Event::Key(_) | Event::Paste(_)) => self.state.edit_event(event),
            _ => false,
        }
    }

    fn render_unit_row(&mut self, row: Rect, root: NodeId, scene: &mut Scene) {
        let (title, control) = row.split_right(CONTROL_WIDTH);
        scene.push(Node::new(Role::Label, title).name("Unit").parent(root));
        let group = scene.push(Node::new(Role::Group, control).parent(root));

        let inner = control.inner(Sides::all(TOGGLE_INSET));
        let count = Unit::ALL.len() as f64;
        let width = (inner.width - TOGGLE_GAP * (count - 1.0)) / count;
        for (i, unit) in Unit::ALL.into_iter().enumerate() {
            let x = inner.x + i as f64 * (width + TOGGLE_GAP);
            let id = scene.push(
                Node::new(Role::Button, Rect::new(x, inner.y, width, inner.height))
                    .name(unit.label())
                    .parent(group)
                    .flag_if(NodeFlags::SELECTED, self.state.unit == unit),
            );
            self.parts.push((id, Part::Unit(unit)));
        }
    }

    fn render_value_row(&mut self, row: Rect, root: NodeId, scene: &mut Scene) {
        let (title, control) = row.split_right(CONTROL_WIDTH);
        scene.push(Node::new(Role::Label, title).name("Value").parent(root));
        let group = scene.push(
            Node::new(Role::Group, control)
                .parent(root)
                .flag_if(NodeFlags::FOCUSED, self.state.editing),
        );

        let (dec_rect, rest) = control.split_left(control.height);
        let (input_rect, inc_rect) = rest.split_right(control.height);

        let dec_disabled = self.state.decrement_disabled();
        let dec = scene.push(
            Node::new(Role::Button, dec_rect)
                .name("Decrease value")
                .parent(group)
                .flag_if(NodeFlags::DISABLED, dec_disabled),
        );
        self.parts.push((dec, Part::Decrement));

        let input = scene.push(
            Node::new(Role::TextBox, input_rect)
                .name("Value")
                .value(self.state.text())
                .parent(group)
                .flag_if(NodeFlags::FOCUSED, self.state.editing),
        );
        self.parts.push((input, Part::Input));

        let inc_disabled = self.state.increment_disabled();
        let inc = scene.push(
            Node::new(Role::Button, inc_rect)
                .name("Increase value")
                .parent(group)
                .flag_if(NodeFlags::DISABLED, inc_disabled),
        );
        self.parts.push((inc, Part::Increment));

        // Overlays go last so content ids do not shift when a tooltip shows.
        let tip = self.decrement_tooltip();
        tip.render(dec_rect, scene, &mut self.min_tip);
        let tip = self.increment_tooltip();
        tip.render(inc_rect, scene, &mut self.max_tip);
    }
}

impl Component for UnitValue {
    fn render(&mut self, area: Rect, scene: &mut Scene) {
        self.parts.clear();
        let height = PADDING * 2.0 + ROW_HEIGHT * 2.0 + ROW_GAP;
        let panel = Rect::new(area.x, area.y, PANEL_WIDTH, height);
        let root = scene.push(Node::new(Role::Group, panel).name("Unit value"));

        let content = panel.inner(Sides::all(PADDING));
        let (unit_row, rest) = content.split_top(ROW_HEIGHT);
        let (_, rest) = rest.split_top(ROW_GAP);
        let (value_row, _) = rest.split_top(ROW_HEIGHT);

        self.render_unit_row(Rect::new(unit_row.x, unit_row.y, ROW_WIDTH, ROW_HEIGHT), root, scene);
        self.render_value_row(
            Rect::new(value_row.x, value_row.y, ROW_WIDTH, ROW_HEIGHT),
            root,
            scene,
        );
    }

    fn handle_event(
        &mut self,
        target: Option<NodeId>,
        event: &Event,
        ctx: &EventContext,
    ) -> bool {
        if event.is_viewport_change() {
            let min = self.decrement_tooltip();
            let max = self.increment_tooltip();
            let a = self.min_tip.viewport_changed(&min, ctx.viewport);
            let b = self.max_tip.viewport_changed(&max, ctx.viewport);
            return a || b;
        }
        let Some(part) = target.and_then(|id| self.part_of(id)) else {
            return false;
        };
        let changed = self.handle_part(part, event, ctx);
        self.sync_tooltips(ctx.viewport);
        changed
    }

    fn tick(&mut self, ctx: &EventContext) -> bool {
        let min = self.decrement_tooltip();
        let max = self.increment_tooltip();
        let a = self.min_tip.tick(&min, ctx);
        let b = self.max_tip.tick(&max, ctx);
        a || b
    }

    fn unmount(&mut self) {
        self.min_tip.unmount();
        self.max_tip.unmount();
    }
}
