// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! All cross-event interaction state, in one place.

use alloc::collections::BTreeMap;

use hashbrown::{HashMap, HashSet};
use switchyard_event_state::pointer::{PointerId, PointerTracker};
use switchyard_event_state::throttle::{MotionThrottle, ThrottleGate, ThrottleHandle};
use switchyard_tree::{WeakWidgetPath, WidgetId};

use crate::capture::CaptureManager;
use crate::drag_drop::DragDropController;
use crate::event::CursorIcon;
use crate::focus::FocusManager;
use crate::modal::ModalStack;
use crate::popup::PopupStack;
use crate::settings::InputSettings;
use crate::tooltip::TooltipController;

/// Interaction state owned by an [`Application`](crate::Application).
///
/// Each field belongs to exactly one manager and is only changed through the
/// application's entry points.
#[derive(Debug)]
pub struct InteractionState<P> {
    pub(crate) pointers: PointerTracker,
    pub(crate) capture: CaptureManager,
    pub(crate) focus: FocusManager,
    pub(crate) drag_drop: DragDropController<P>,
    pub(crate) popups: PopupStack,
    pub(crate) modals: ModalStack,
    pub(crate) tooltip: TooltipController,
    pub(crate) throttle: ThrottleGate,
    pub(crate) motion: MotionThrottle,
    pub(crate) press_throttles: BTreeMap<PointerId, ThrottleHandle>,
    pub(crate) under_cursor: WeakWidgetPath,
    pub(crate) click_outside: HashSet<WidgetId>,
    pub(crate) window_focus: HashMap<WidgetId, WeakWidgetPath>,
    pub(crate) external_modals: u32,
    pub(crate) cursor: CursorIcon,
    pub(crate) now: u64,
}

impl<P> InteractionState<P> {
    /// Fresh state configured from `settings`.
    pub fn new(settings: &InputSettings) -> Self {
        Self {
            pointers: PointerTracker::new(),
            capture: CaptureManager::default(),
            focus: FocusManager::default(),
            drag_drop: DragDropController::new(settings.drag_trigger_distance),
            popups: PopupStack::default(),
            modals: ModalStack::default(),
            tooltip: TooltipController::new(settings.tooltip_delay, settings.tooltip_fade_in),
            throttle: ThrottleGate::new(),
            motion: MotionThrottle::new(
                settings.throttle_min_move_distance,
                settings.throttle_velocity_threshold,
                settings.throttle_decay,
            ),
            press_throttles: BTreeMap::new(),
            under_cursor: WeakWidgetPath::new(),
            click_outside: HashSet::new(),
            window_focus: HashMap::new(),
            external_modals: 0,
            cursor: CursorIcon::Default,
            now: 0,
        }
    }

    /// Push new settings into the managers that cache them.
    pub(crate) fn apply_settings(&mut self, settings: &InputSettings) {
        self.drag_drop.set_trigger_distance(settings.drag_trigger_distance);
        self.tooltip.configure(settings.tooltip_delay, settings.tooltip_fade_in);
        self.motion.min_distance = settings.throttle_min_move_distance;
        self.motion.velocity_threshold = settings.throttle_velocity_threshold;
        self.motion.decay = settings.throttle_decay;
    }

    /// Release the press throttle held for `pointer`.
    pub(crate) fn release_press_throttle(&mut self, pointer: PointerId) {
        if let Some(handle) = self.press_throttles.remove(&pointer) {
            self.throttle.release(handle);
        }
    }
}
