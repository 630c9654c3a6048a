use crate::model::InputSnapshot;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Thruster {
    Left,
    Right,
    Up,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Thrust(Thruster),
    Advance,
    Quit,
    /// Leave right away, whatever the phase.
    Close,
}

pub fn map_key(code: KeyCode, mods: KeyModifiers) -> Option<Control> {
    if mods.contains(KeyModifiers::CONTROL) && matches!(code, KeyCode::Char('c') | KeyCode::Char('C')) {
        return Some(Control::Close);
    }
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(Control::Thrust(Thruster::Left))
        }
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(Control::Thrust(Thruster::Right))
        }
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(Control::Thrust(Thruster::Up))
        }
        KeyCode::Char(' ') => Some(Control::Advance),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Control::Quit),
        KeyCode::Esc => Some(Control::Close),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug)]
struct Hold {
    down: bool,
    until: Instant,
}

/// Turns key events into held thrust flags.
///
/// With release reporting the flags follow press/release exactly. Without it
/// (most terminals) a key counts as held until `hold` after its last
/// press or auto-repeat.
#[derive(Clone, Debug)]
pub struct KeyTracker {
    left: Hold,
    right: Hold,
    up: Hold,
    hold: Duration,
    reports_release: bool,
}

impl KeyTracker {
    pub fn new(hold: Duration, reports_release: bool, now: Instant) -> Self {
        let idle = Hold { down: false, until: now };
        Self {
            left: idle,
            right: idle,
            up: idle,
            hold,
            reports_release,
        }
    }

    fn slot(&mut self, t: Thruster) -> &mut Hold {
        match t {
            Thruster::Left => &mut self.left,
            Thruster::Right => &mut self.right,
            Thruster::Up => &mut self.up,
        }
    }

    pub fn press(&mut self, t: Thruster, now: Instant) {
        let until = now + self.hold;
        let slot = self.slot(t);
        slot.down = true;
        slot.until = until;
    }

    pub fn release(&mut self, t: Thruster, now: Instant) {
        let slot = self.slot(t);
        slot.down = false;
        slot.until = now;
    }

    fn held(&self, h: &Hold, now: Instant) -> bool {
        if self.reports_release {
            h.down
        } else {
            now <= h.until
        }
    }

    pub fn snapshot(&self, now: Instant) -> InputSnapshot {
        InputSnapshot {
            thrust_left: self.held(&self.left, now),
            thrust_right: self.held(&self.right, now),
            thrust_up: self.held(&self.up, now),
        }
    }
}

/// What one frame's worth of events amounts to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Edge-triggered controls in arrival order.
    pub controls: Vec<Control>,
}

impl FrameInput {
    pub fn close_requested(&self) -> bool {
        self.controls.contains(&Control::Close)
    }
}

/// Feed one key event to the tracker. Edge controls come back out.
pub fn handle_key(tracker: &mut KeyTracker, key: KeyEvent, now: Instant) -> Option<Control> {
    let control = map_key(key.code, key.modifiers)?;
    match (control, key.kind) {
        (Control::Thrust(t), KeyEventKind::Release) => {
            tracker.release(t, now);
            None
        }
        (Control::Thrust(t), _) => {
            tracker.press(t, now);
            None
        }
        (_, KeyEventKind::Press) => Some(control),
        _ => None,
    }
}

/// Drain pending terminal events without blocking.
pub fn collect_input_nonblocking(tracker: &mut KeyTracker) -> anyhow::Result<FrameInput> {
    let mut out = FrameInput::default();
    while event::poll(Duration::ZERO)? {
        if let Event::Key(k) = event::read()? {
            if let Some(c) = handle_key(tracker, k, Instant::now()) {
                out.controls.push(c);
            }
            if out.controls.len() >= 32 {
                break;
            }
        }
    }
    Ok(out)
}
