use bevy::prelude::*;

/// One step of a press / drag / release gesture, mouse and touch alike.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerSignal {
    Down(Vec2),
    Move(Vec2),
    /// Release carries no position: a lifted finger is no longer tracked.
    Up,
}

impl PointerSignal {
    pub const fn position(&self) -> Option<Vec2> {
        match self {
            Self::Down(position) | Self::Move(position) => Some(*position),
            Self::Up => None,
        }
    }

    #[must_use]
    pub fn map_position(self, f: impl FnOnce(Vec2) -> Option<Vec2>) -> Option<Self> {
        match self {
            Self::Down(position) => f(position).map(Self::Down),
            Self::Move(position) => f(position).map(Self::Move),
            Self::Up => Some(Self::Up),
        }
    }
}

/// The finger a gesture belongs to, kept between frames.
///
/// Hold one per reader, usually as a `Local`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PointerTracker {
    touch: Option<u64>,
}

impl PointerTracker {
    pub const fn touch(&self) -> Option<u64> {
        self.touch
    }
}

/// Samples this frame's pointer activity in screen coordinates.
///
/// Touch wins over the mouse when a finger is involved. A gesture follows the
/// finger that started it; other fingers are ignored until it lifts. Signals
/// come back in gesture order, so a press and release landing in the same
/// frame yield `Down` then `Up`.
pub fn pointer_signals(
    button_input: &ButtonInput<MouseButton>,
    touch_input: &Touches,
    cursor_position: Option<Vec2>,
    tracker: &mut PointerTracker,
) -> Vec<PointerSignal> {
    let mut signals = Vec::new();

    if tracker.touch.is_none() {
        // Several fingers landing together: the lowest id starts the gesture.
        if let Some(touch) = touch_input.iter_just_pressed().min_by_key(|touch| touch.id()) {
            tracker.touch = Some(touch.id());
            signals.push(PointerSignal::Down(touch.position()));
        }
    }

    if let Some(id) = tracker.touch {
        // Released, canceled or lost: the finger is gone either way.
        match touch_input.get_pressed(id) {
            Some(touch) => signals.push(PointerSignal::Move(touch.position())),
            None => {
                tracker.touch = None;
                signals.push(PointerSignal::Up);
            }
        }
        return signals;
    }

    if button_input.just_pressed(MouseButton::Left) {
        if let Some(position) = cursor_position {
            signals.push(PointerSignal::Down(position));
        }
    }
    if button_input.pressed(MouseButton::Left) {
        if let Some(position) = cursor_position {
            signals.push(PointerSignal::Move(position));
        }
    }
    if button_input.just_released(MouseButton::Left) {
        signals.push(PointerSignal::Up);
    }

    signals
}

/// Same as [`pointer_signals`] but projected into world space through `camera`.
/// Signals whose position falls outside the viewport are dropped.
pub fn world_pointer_signals(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    tracker: &mut PointerTracker,
    windows: &Query<&Window>,
    camera: &Query<(&Camera, &GlobalTransform)>,
) -> Vec<PointerSignal> {
    let cursor_position = windows
        .get_single()
        .ok()
        .and_then(Window::cursor_position);
    let signals = pointer_signals(button_input, touch_input, cursor_position, tracker);
    if signals.is_empty() {
        return signals;
    }

    let Ok((camera, camera_transform)) = camera.get_single() else {
        return Vec::new();
    };

    signals
        .into_iter()
        .filter_map(|signal| {
            signal.map_position(|position| {
                camera
                    .viewport_to_world(camera_transform, position)
                    .map(|ray| ray.origin.truncate())
                    .ok()
            })
        })
        .collect()
}
