use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::collections::HashMap;
use std::time::Duration;

/// Without key-release reporting a key counts as held for this long after
/// its last press or auto-repeat.
const HOLD_WINDOW: u64 = 300;

/// Logical actions the game reacts to, independent of the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    Fire,
    Confirm,
    Back,
    Quit,
    /// A letter or digit, for name entry
    Type(char),
}

/// Input sampled for one frame: held movement plus the edge-triggered
/// intents that arrived since the previous frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputFrame {
    pub left: bool,
    pub right: bool,
    pub pressed: Vec<Intent>,
}

impl InputFrame {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn contains(&self, intent: Intent) -> bool {
        self.pressed.contains(&intent)
    }
}

/// A physical control. Keys read 0 or 1, pad axes -1..=1 and pad buttons 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Key(KeyCode),
    Axis(u8),
    Button(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    AtLeast,
    AtMost,
}

/// One row of the binding table: `intent` is active while the value of
/// `control` compares true against `threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Binding {
    pub control: Control,
    pub comparison: Comparison,
    pub threshold: f32,
    pub intent: Intent,
}

impl Binding {
    pub const fn key(code: KeyCode, intent: Intent) -> Self {
        Self {
            control: Control::Key(code),
            comparison: Comparison::AtLeast,
            threshold: 1.0,
            intent,
        }
    }

    pub fn matches(&self, value: f32) -> bool {
        match self.comparison {
            Comparison::AtLeast => value >= self.threshold,
            Comparison::AtMost => value <= self.threshold,
        }
    }
}

pub const DEFAULT_BINDINGS: &[Binding] = &[
    Binding::key(KeyCode::Left, Intent::MoveLeft),
    Binding::key(KeyCode::Char('a'), Intent::MoveLeft),
    Binding::key(KeyCode::Right, Intent::MoveRight),
    Binding::key(KeyCode::Char('d'), Intent::MoveRight),
    Binding::key(KeyCode::Char(' '), Intent::Fire),
    Binding::key(KeyCode::Enter, Intent::Confirm),
    Binding::key(KeyCode::Backspace, Intent::Back),
    Binding::key(KeyCode::Esc, Intent::Quit),
    Binding {
        control: Control::Axis(0),
        comparison: Comparison::AtMost,
        threshold: -0.5,
        intent: Intent::MoveLeft,
    },
    Binding {
        control: Control::Axis(0),
        comparison: Comparison::AtLeast,
        threshold: 0.5,
        intent: Intent::MoveRight,
    },
    Binding {
        control: Control::Button(0),
        comparison: Comparison::AtLeast,
        threshold: 1.0,
        intent: Intent::Fire,
    },
    Binding {
        control: Control::Button(1),
        comparison: Comparison::AtLeast,
        threshold: 1.0,
        intent: Intent::Confirm,
    },
    Binding {
        control: Control::Button(2),
        comparison: Comparison::AtLeast,
        threshold: 1.0,
        intent: Intent::Back,
    },
];

/// Polls the terminal and turns raw device state into [`InputFrame`]s
pub struct InputManager {
    bindings: Vec<Binding>,
    /// Held keys and when they were last pressed or repeated
    held_keys: HashMap<KeyCode, u64>,
    /// Latest pad values, fed by whatever drives the pad
    pad: HashMap<Control, f32>,
    /// Pad intents that were active at the previous sample
    pad_active: Vec<Intent>,
    pressed: Vec<Intent>,
    release_events: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(DEFAULT_BINDINGS.to_vec(), true)
    }
}

impl InputManager {
    /// `release_events` says whether the terminal reports key releases;
    /// without them held keys time out instead.
    pub fn new(bindings: Vec<Binding>, release_events: bool) -> Self {
        Self {
            bindings,
            held_keys: HashMap::new(),
            pad: HashMap::new(),
            pad_active: Vec::new(),
            pressed: Vec::new(),
            release_events,
        }
    }

    /// Drains pending terminal events without blocking and samples a frame
    pub fn poll(&mut self, now: u64) -> color_eyre::Result<InputFrame> {
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = event::read()? {
                self.handle_key_event(key_event, now);
            }
        }
        Ok(self.sample(now))
    }

    pub fn handle_key_event(&mut self, key_event: KeyEvent, now: u64) {
        let code = normalize(key_event.code);
        match key_event.kind {
            KeyEventKind::Press => {
                if code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL)
                {
                    self.pressed.push(Intent::Quit);
                    return;
                }
                self.held_keys.insert(code, now);
                let intents: Vec<Intent> = self
                    .bindings
                    .iter()
                    .filter(|b| b.control == Control::Key(code) && b.matches(1.0))
                    .map(|b| b.intent)
                    .collect();
                self.pressed.extend(intents);
                if let KeyCode::Char(c) = key_event.code {
                    if c.is_ascii_alphanumeric() {
                        self.pressed.push(Intent::Type(c));
                    }
                }
            }
            KeyEventKind::Repeat => {
                self.held_keys.insert(code, now);
            }
            KeyEventKind::Release => {
                self.held_keys.remove(&code);
            }
        }
    }

    /// Sets a pad axis, clamped to -1..=1
    pub fn set_axis(&mut self, axis: u8, value: f32) {
        self.pad.insert(Control::Axis(axis), value.clamp(-1.0, 1.0));
    }

    pub fn set_button(&mut self, button: u8, down: bool) {
        self.pad
            .insert(Control::Button(button), if down { 1.0 } else { 0.0 });
    }

    /// Builds the frame for `now` and clears the queued edge intents
    pub fn sample(&mut self, now: u64) -> InputFrame {
        if !self.release_events {
            self.held_keys
                .retain(|_, pressed_at| now.saturating_sub(*pressed_at) <= HOLD_WINDOW);
        }

        let pad_active: Vec<Intent> = self
            .bindings
            .iter()
            .filter(|b| !matches!(b.control, Control::Key(_)) && b.matches(self.value(b.control)))
            .map(|b| b.intent)
            .collect();
        for intent in &pad_active {
            if !self.pad_active.contains(intent) && !self.pressed.contains(intent) {
                self.pressed.push(*intent);
            }
        }
        self.pad_active = pad_active;

        InputFrame {
            left: self.is_active(Intent::MoveLeft),
            right: self.is_active(Intent::MoveRight),
            pressed: std::mem::take(&mut self.pressed),
        }
    }

    fn value(&self, control: Control) -> f32 {
        match control {
            Control::Key(code) => {
                if self.held_keys.contains_key(&code) {
                    1.0
                } else {
                    0.0
                }
            }
            _ => self.pad.get(&control).copied().unwrap_or(0.0),
        }
    }

    fn is_active(&self, intent: Intent) -> bool {
        self.bindings
            .iter()
            .any(|b| b.intent == intent && b.matches(self.value(b.control)))
    }
}

/// Letter keys bind case-insensitively
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}
