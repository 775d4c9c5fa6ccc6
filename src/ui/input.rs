/// Keyboard state tracker.
///
/// Tracks which keys are currently held down, enabling:
///   - Continuous movement while a key is held
///   - Sprint as a modifier (Shift) or a held key (Tab)
///   - Edge-triggered attack and wait (only fire on initial press)
///
/// Uses crossterm's keyboard enhancement for Release events when available.
/// Falls back to timeout-based release detection on terminals that don't support it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use wildlands::domain::entity::{FrameInput, MoveDir};

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

const LEFT: [KeyCode; 3] = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT: [KeyCode; 3] = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const UP: [KeyCode; 3] = [KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const DOWN: [KeyCode; 3] = [KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Last time a Press/Repeat arrived with Shift down.
    shift_active: Option<Instant>,

    /// Keys that went from "not held" to "held" during the most recent
    /// drain_events() call.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for meta-key handling.
    pub raw_events: Vec<KeyEvent>,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            shift_active: None,
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            honor_release: false,
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call this once per frame, before the simulation step.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            let Ok(Event::Key(key)) = event::read() else { continue };
            self.raw_events.push(key);

            match key.kind {
                KeyEventKind::Release if self.honor_release => {
                    self.last_active.remove(&key.code);
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        self.shift_active = None;
                    }
                }
                // Without confirmed enhancement, rely on timeout expiry.
                KeyEventKind::Release => {}
                _ => {
                    let was_held = self.is_held(key.code);
                    let now = Instant::now();
                    self.last_active.insert(key.code, now);
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        self.shift_active = Some(now);
                    }
                    if !was_held {
                        self.fresh_presses.push(key.code);
                    }
                }
            }
        }

        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
        if self.shift_active.is_some_and(|t| now.duration_since(t) >= HOLD_TIMEOUT) {
            self.shift_active = None;
        }
    }

    /// Is this key currently held down?
    pub fn is_held(&self, code: KeyCode) -> bool {
        self.last_active.get(&code)
            .map(|t| t.elapsed() < HOLD_TIMEOUT)
            .unwrap_or(false)
    }

    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    /// Was this key freshly pressed this frame? (edge trigger)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    /// Held direction. Conflicting keys resolve left, right, up, down.
    pub fn movement(&self) -> Option<MoveDir> {
        if self.any_held(&LEFT) { return Some(MoveDir::Left); }
        if self.any_held(&RIGHT) { return Some(MoveDir::Right); }
        if self.any_held(&UP) { return Some(MoveDir::Up); }
        if self.any_held(&DOWN) { return Some(MoveDir::Down); }
        None
    }

    pub fn sprint(&self) -> bool {
        self.shift_active.is_some() || self.is_held(KeyCode::Tab)
    }

    /// Snapshot this frame's intent for the simulation.
    /// `.` (wait) is simply a frame with no movement and no attack.
    pub fn frame_input(&self) -> FrameInput {
        FrameInput {
            movement: self.movement(),
            sprint: self.sprint(),
            attack: self.any_pressed(&[KeyCode::Char('f'), KeyCode::Char('F')]),
        }
    }
}
