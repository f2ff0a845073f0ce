use egui::{Context, Event, PointerButton, Pos2, Rect, TouchPhase};

mod router;
pub use router::{Route, route};
pub(crate) use router::uses_secondary;

/// Pointer id used for mouse and pen input. Touches get `touch id + 1`.
pub const MOUSE_POINTER: u64 = 0;

/// Stage of a press → move* → release|cancel gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Press,
    Move,
    Release,
    /// The gesture was interrupted, e.g. a touch was taken over by the OS
    Cancel,
}

/// One pointer sample in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub id: u64,
    pub phase: PointerPhase,
    pub pos: Pos2,
    pub button: PointerButton,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, pos: Pos2) -> Self {
        Self {
            id: MOUSE_POINTER,
            phase,
            pos,
            button: PointerButton::Primary,
        }
    }

    pub fn press(pos: Pos2) -> Self {
        Self::new(PointerPhase::Press, pos)
    }

    pub fn moved(pos: Pos2) -> Self {
        Self::new(PointerPhase::Move, pos)
    }

    pub fn release(pos: Pos2) -> Self {
        Self::new(PointerPhase::Release, pos)
    }

    pub fn cancel(pos: Pos2) -> Self {
        Self::new(PointerPhase::Cancel, pos)
    }

    pub fn with_button(self, button: PointerButton) -> Self {
        Self { button, ..self }
    }

    pub fn with_id(self, id: u64) -> Self {
        Self { id, ..self }
    }
}

/// Tracks the single pointer allowed to drive a gesture.
///
/// While one pointer is down, presses from any other pointer (or another
/// button of the same mouse) are ignored until it is released.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    active: Option<(u64, PointerButton)>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Filters an event. Accepted move/release/cancel events carry the
    /// button of the press that started the gesture.
    pub fn accept(&mut self, event: PointerEvent) -> Option<PointerEvent> {
        match (event.phase, self.active) {
            (PointerPhase::Press, None) => {
                self.active = Some((event.id, event.button));
                Some(event)
            }
            (PointerPhase::Move, Some((id, button))) if id == event.id => {
                Some(event.with_button(button))
            }
            (PointerPhase::Release, Some((id, button))) if id == event.id && button == event.button => {
                self.active = None;
                Some(event)
            }
            (PointerPhase::Cancel, Some((id, button))) if id == event.id => {
                self.active = None;
                Some(event.with_button(button))
            }
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.active = None;
    }
}

/// Converts raw egui input over the canvas widget into [`PointerEvent`]s.
#[derive(Debug, Clone)]
pub struct InputHandler {
    canvas_rect: Rect,
    /// Screen points per canvas unit
    scale: f32,
    last_pos: Option<Pos2>,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            canvas_rect: Rect::NOTHING,
            scale: 1.0,
            last_pos: None,
        }
    }

    /// Where the canvas is drawn this frame and how big one canvas unit is.
    pub fn set_canvas(&mut self, rect: Rect, scale: f32) {
        self.canvas_rect = rect;
        self.scale = scale.max(f32::EPSILON);
    }

    pub fn to_canvas(&self, screen: Pos2) -> Pos2 {
        ((screen - self.canvas_rect.min) / self.scale).to_pos2()
    }

    /// Collects this frame's pointer events. Presses outside the canvas are
    /// dropped; moves and releases are kept so a drag can leave the canvas.
    pub fn process_input(&mut self, ctx: &Context) -> Vec<PointerEvent> {
        let raw = ctx.input(|input| input.events.clone());
        let mut events = Vec::new();
        for event in raw {
            let converted = match event {
                Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    ..
                } => {
                    self.last_pos = Some(pos);
                    if pressed && !self.canvas_rect.contains(pos) {
                        continue;
                    }
                    let phase = if pressed { PointerPhase::Press } else { PointerPhase::Release };
                    PointerEvent::new(phase, self.to_canvas(pos)).with_button(button)
                }
                Event::PointerMoved(pos) => {
                    self.last_pos = Some(pos);
                    PointerEvent::moved(self.to_canvas(pos))
                }
                Event::PointerGone => {
                    let Some(pos) = self.last_pos.take() else {
                        continue;
                    };
                    PointerEvent::cancel(self.to_canvas(pos))
                }
                Event::Touch { id, phase, pos, .. } => {
                    let phase = match phase {
                        TouchPhase::Start if self.canvas_rect.contains(pos) => PointerPhase::Press,
                        TouchPhase::Start => continue,
                        TouchPhase::Move => PointerPhase::Move,
                        TouchPhase::End => PointerPhase::Release,
                        TouchPhase::Cancel => PointerPhase::Cancel,
                    };
                    PointerEvent::new(phase, self.to_canvas(pos)).with_id(id.0 + 1)
                }
                _ => continue,
            };
            events.push(converted);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_pointer_is_ignored_until_release() {
        let mut tracker = PointerTracker::new();
        let p = Pos2::new(1.0, 1.0);
        assert!(tracker.accept(PointerEvent::press(p)).is_some());
        assert!(tracker.accept(PointerEvent::press(p).with_id(7)).is_none());
        assert!(tracker.accept(PointerEvent::moved(p).with_id(7)).is_none());
        assert!(tracker.accept(PointerEvent::release(p).with_id(7)).is_none());
        assert!(tracker.accept(PointerEvent::moved(p)).is_some());
        assert!(tracker.accept(PointerEvent::release(p)).is_some());
        assert!(tracker.accept(PointerEvent::press(p).with_id(7)).is_some());
    }

    #[test]
    fn moves_carry_the_press_button() {
        let mut tracker = PointerTracker::new();
        let p = Pos2::ZERO;
        tracker.accept(PointerEvent::press(p).with_button(PointerButton::Secondary));
        let moved = tracker.accept(PointerEvent::moved(p)).unwrap();
        assert_eq!(moved.button, PointerButton::Secondary);
        // releasing a different button does not end the gesture
        assert!(tracker.accept(PointerEvent::release(p)).is_none());
        assert!(tracker.is_active());
        assert!(tracker.accept(PointerEvent::cancel(p)).is_some());
        assert!(!tracker.is_active());
    }

    #[test]
    fn hover_without_press_is_dropped() {
        let mut tracker = PointerTracker::new();
        assert!(tracker.accept(PointerEvent::moved(Pos2::ZERO)).is_none());
    }

    #[test]
    fn screen_to_canvas_mapping() {
        let mut handler = InputHandler::new();
        handler.set_canvas(Rect::from_min_size(Pos2::new(100.0, 50.0), egui::vec2(160.0, 160.0)), 10.0);
        assert_eq!(handler.to_canvas(Pos2::new(125.0, 75.0)), Pos2::new(2.5, 2.5));
    }
}
