use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Canonical movement directions, each a unit step on the grid.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns the `(dx, dy)` unit vector; `y` grows downwards.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Maps a unit vector back to a direction. Anything else is `None`.
    #[must_use]
    pub fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Self::Up),
            (0, 1) => Some(Self::Down),
            (-1, 0) => Some(Self::Left),
            (1, 0) => Some(Self::Right),
            _ => None,
        }
    }
}

/// Player intents queued for the round controller.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Intent {
    Direction(Direction),
    TogglePause,
    Pause,
    Resume,
    Start,
    Restart,
}

/// Everything the terminal front-end can receive from the input device.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum InputEvent {
    Intent(Intent),
    Resize,
    Quit,
}

/// Returns whether a direction change is legal (no immediate 180° turns).
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    next != current.opposite()
}

/// Maps one key press onto an input event.
#[must_use]
pub fn event_for_key(key: KeyEvent) -> Option<InputEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(InputEvent::Quit);
    }

    let intent = match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W') => Intent::Direction(Direction::Up),
        KeyCode::Down | KeyCode::Char('s' | 'S') => Intent::Direction(Direction::Down),
        KeyCode::Left | KeyCode::Char('a' | 'A') => Intent::Direction(Direction::Left),
        KeyCode::Right | KeyCode::Char('d' | 'D') => Intent::Direction(Direction::Right),
        KeyCode::Char(' ') => Intent::TogglePause,
        KeyCode::Enter => Intent::Start,
        KeyCode::Char('r' | 'R') => Intent::Restart,
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => return Some(InputEvent::Quit),
        _ => return None,
    };

    Some(InputEvent::Intent(intent))
}

/// Polls crossterm for keyboard and resize events.
#[derive(Debug, Clone, Copy)]
pub struct InputHandler {
    poll_timeout: Duration,
}

impl InputHandler {
    #[must_use]
    pub fn new(poll_timeout: Duration) -> Self {
        Self { poll_timeout }
    }

    /// Waits up to the poll timeout for one event.
    pub fn poll_input(&mut self) -> io::Result<Option<InputEvent>> {
        if !event::poll(self.poll_timeout)? {
            return Ok(None);
        }

        Ok(match event::read()? {
            Event::Key(key) => event_for_key(key),
            Event::Resize(_, _) => Some(InputEvent::Resize),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

    use super::{direction_change_is_valid, event_for_key, Direction, InputEvent, Intent};

    #[test]
    fn opposite_direction_is_correct() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }

    #[test]
    fn delta_round_trips_through_from_delta() {
        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            let (dx, dy) = direction.delta();
            assert_eq!(Direction::from_delta(dx, dy), Some(direction));
        }

        assert_eq!(Direction::from_delta(1, 1), None);
        assert_eq!(Direction::from_delta(0, 0), None);
        assert_eq!(Direction::from_delta(2, 0), None);
    }

    #[test]
    fn reverse_direction_change_is_invalid() {
        assert!(!direction_change_is_valid(Direction::Up, Direction::Down));
        assert!(!direction_change_is_valid(
            Direction::Left,
            Direction::Right
        ));

        assert!(direction_change_is_valid(Direction::Up, Direction::Left));
        assert!(direction_change_is_valid(Direction::Up, Direction::Up));
    }

    #[test]
    fn arrow_and_wasd_keys_map_to_directions() {
        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);

        assert_eq!(
            event_for_key(press(KeyCode::Up)),
            Some(InputEvent::Intent(Intent::Direction(Direction::Up)))
        );
        assert_eq!(
            event_for_key(press(KeyCode::Char('A'))),
            Some(InputEvent::Intent(Intent::Direction(Direction::Left)))
        );
        assert_eq!(
            event_for_key(press(KeyCode::Char(' '))),
            Some(InputEvent::Intent(Intent::TogglePause))
        );
        assert_eq!(event_for_key(press(KeyCode::Char('q'))), Some(InputEvent::Quit));
        assert_eq!(event_for_key(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn key_release_is_ignored() {
        let mut key = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;

        assert_eq!(event_for_key(key), None);
    }
}
