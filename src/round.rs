use std::collections::VecDeque;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::clock::{FramePoll, SimulationClock};
use crate::config::{GameConfig, MAX_ITEMS, MAX_SPEED, POINTS_PER_SPEED_STEP};
use crate::grid::GridSize;
use crate::input::{Direction, Intent};
use crate::items::{try_spawn, ItemSet};
use crate::snake::{Position, Snake, StepResult};

/// Lifecycle of the single live round.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RoundStatus {
    NotStarted,
    Running,
    Paused,
    GameOver,
}

/// Why a round ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EndCause {
    WallCollision,
    SelfCollision,
    /// The viewport shrank past every snake segment.
    Viewport,
}

/// Complete state of one round. Replaced wholesale on restart.
#[derive(Debug, Clone)]
pub struct RoundState {
    pub snake: Snake,
    pub items: ItemSet,
    pub score: u32,
    pub speed: u32,
    pub tick_count: u64,
    pub end_cause: Option<EndCause>,
}

impl RoundState {
    /// Creates a round with the snake centred on `bounds`, heading right, and
    /// no items yet.
    #[must_use]
    pub fn fresh(config: &GameConfig, bounds: GridSize) -> Self {
        let head = Position {
            x: i32::from(bounds.width / 2),
            y: i32::from(bounds.height / 2),
        };

        Self {
            snake: Snake::new(head, Direction::Right, config.initial_length),
            items: ItemSet::new(),
            score: 0,
            speed: config.base_speed,
            tick_count: 0,
            end_cause: None,
        }
    }

    /// Length shown to the player: the target the body is growing towards.
    #[must_use]
    pub fn length(&self) -> usize {
        self.snake.desired_length()
    }
}

/// Owns the authoritative round and drives it from frame callbacks.
///
/// Input collaborators queue [`Intent`]s with [`RoundController::submit`];
/// they are applied at the start of the next [`RoundController::pump`], never
/// in the middle of a step.
#[derive(Debug)]
pub struct RoundController<R = StdRng> {
    config: GameConfig,
    bounds: GridSize,
    status: RoundStatus,
    state: RoundState,
    clock: SimulationClock,
    frame_armed: bool,
    intents: VecDeque<Intent>,
    rng: R,
}

impl RoundController<StdRng> {
    /// Creates a controller with OS-seeded randomness.
    #[must_use]
    pub fn new(config: GameConfig, bounds: GridSize) -> Self {
        Self::with_rng(config, bounds, StdRng::from_entropy())
    }

    /// Creates a deterministic controller for tests and reproducible rounds.
    #[must_use]
    pub fn with_seed(config: GameConfig, bounds: GridSize, seed: u64) -> Self {
        Self::with_rng(config, bounds, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RoundController<R> {
    #[must_use]
    pub fn with_rng(config: GameConfig, bounds: GridSize, rng: R) -> Self {
        let state = RoundState::fresh(&config, bounds);
        Self {
            config,
            bounds,
            status: RoundStatus::NotStarted,
            state,
            clock: SimulationClock::new(),
            frame_armed: false,
            intents: VecDeque::new(),
            rng,
        }
    }

    #[must_use]
    pub fn status(&self) -> RoundStatus {
        self.status
    }

    #[must_use]
    pub fn state(&self) -> &RoundState {
        &self.state
    }

    /// Returns the round state for in-place edits.
    pub fn state_mut(&mut self) -> &mut RoundState {
        &mut self.state
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.bounds
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Returns true while the next frame callback is scheduled.
    #[must_use]
    pub fn is_frame_armed(&self) -> bool {
        self.frame_armed
    }

    /// Queues an intent for the next [`RoundController::pump`].
    pub fn submit(&mut self, intent: Intent) {
        self.intents.push_back(intent);
    }

    /// Applies queued intents, then runs the frame callback if it is armed.
    pub fn pump(&mut self, now: Duration) -> Option<StepResult> {
        while let Some(intent) = self.intents.pop_front() {
            self.apply_intent(intent);
        }

        if !self.frame_armed {
            return None;
        }
        self.on_frame(now)
    }

    /// One frame callback at timestamp `now`.
    ///
    /// Steps at most once, and re-arms itself only while the round is running.
    pub fn on_frame(&mut self, now: Duration) -> Option<StepResult> {
        if self.status != RoundStatus::Running {
            self.frame_armed = false;
            return None;
        }

        let result = match self.clock.poll(now, self.state.speed) {
            FramePoll::Tick => self.on_tick(),
            FramePoll::Baseline | FramePoll::Waiting => None,
        };

        self.frame_armed = self.status == RoundStatus::Running;
        result
    }

    /// Runs one simulation step plus bookkeeping. `None` unless running.
    pub fn on_tick(&mut self) -> Option<StepResult> {
        if self.status != RoundStatus::Running {
            return None;
        }

        self.state.tick_count += 1;
        let result = self.state.snake.step(self.bounds, &mut self.state.items);
        trace!(tick = self.state.tick_count, ?result, "tick");

        match result {
            StepResult::WallCollision => {
                self.end_round(EndCause::WallCollision);
                return Some(result);
            }
            StepResult::SelfCollision => {
                self.end_round(EndCause::SelfCollision);
                return Some(result);
            }
            StepResult::Collected(item) => self.record_collection(item.value),
            StepResult::Moved => {}
        }

        if self.rng.r#gen::<f64>() < self.config.spawn_chance {
            let _ = try_spawn(
                &mut self.rng,
                self.bounds,
                &self.state.snake,
                &mut self.state.items,
            );
        }

        Some(result)
    }

    /// Buffers a direction given as a unit vector.
    ///
    /// Ignored between rounds, when the vector is not a unit step, or when
    /// it would reverse the active heading.
    pub fn set_direction(&mut self, dx: i32, dy: i32) -> bool {
        match Direction::from_delta(dx, dy) {
            Some(direction) => self.steer(direction),
            None => false,
        }
    }

    /// Starts a fresh round, discarding any previous one.
    pub fn start_round(&mut self) {
        self.state = RoundState::fresh(&self.config, self.bounds);
        for _ in 0..MAX_ITEMS {
            let _ = try_spawn(
                &mut self.rng,
                self.bounds,
                &self.state.snake,
                &mut self.state.items,
            );
        }

        self.status = RoundStatus::Running;
        self.clock.reset();
        self.frame_armed = true;
        info!(
            width = self.bounds.width,
            height = self.bounds.height,
            items = self.state.items.len(),
            "round started"
        );
    }

    /// Starts a fresh round from any status.
    pub fn restart_round(&mut self) {
        self.start_round();
    }

    /// Pauses a running round and stops scheduling frames.
    pub fn pause_round(&mut self) {
        if self.status != RoundStatus::Running {
            return;
        }
        self.status = RoundStatus::Paused;
        self.frame_armed = false;
        self.clock.reset();
        info!(score = self.state.score, "round paused");
    }

    /// Resumes a paused round. Time spent paused is never simulated.
    pub fn resume_round(&mut self) {
        if self.status != RoundStatus::Paused {
            return;
        }
        self.status = RoundStatus::Running;
        self.clock.reset();
        self.frame_armed = true;
        info!("round resumed");
    }

    /// Switches between running and paused.
    pub fn toggle_pause(&mut self) {
        match self.status {
            RoundStatus::Running => self.pause_round(),
            RoundStatus::Paused => self.resume_round(),
            RoundStatus::NotStarted | RoundStatus::GameOver => {}
        }
    }

    /// Applies new grid bounds.
    ///
    /// A round in progress loses every segment and item outside the new grid;
    /// losing the whole snake ends the round.
    pub fn on_viewport_changed(&mut self, cols: u16, rows: u16) {
        let bounds = GridSize::new(cols, rows);
        if bounds == self.bounds {
            return;
        }
        self.bounds = bounds;

        if matches!(self.status, RoundStatus::NotStarted) {
            self.state = RoundState::fresh(&self.config, bounds);
        }

        if !matches!(self.status, RoundStatus::Running | RoundStatus::Paused) {
            debug!(width = bounds.width, height = bounds.height, "viewport changed");
            return;
        }

        let dropped_segments = self.state.snake.retain_within(bounds);
        let dropped_items = self.state.items.retain_within(bounds);
        debug!(
            width = bounds.width,
            height = bounds.height,
            dropped_segments,
            dropped_items,
            "viewport changed during round"
        );

        if self.state.snake.is_empty() {
            self.end_round(EndCause::Viewport);
        }
    }

    fn apply_intent(&mut self, intent: Intent) {
        match intent {
            Intent::Direction(direction) => {
                let _ = self.steer(direction);
            }
            Intent::TogglePause => self.toggle_pause(),
            Intent::Pause => self.pause_round(),
            Intent::Resume => self.resume_round(),
            Intent::Start => {
                if matches!(self.status, RoundStatus::NotStarted | RoundStatus::GameOver) {
                    self.start_round();
                }
            }
            Intent::Restart => self.restart_round(),
        }
    }

    fn steer(&mut self, direction: Direction) -> bool {
        if !matches!(self.status, RoundStatus::Running | RoundStatus::Paused) {
            return false;
        }
        self.state.snake.set_direction(direction)
    }

    fn record_collection(&mut self, value: u32) {
        self.state.score += value;
        debug!(value, score = self.state.score, "item collected");

        // Only an exact multiple counts; jumping over one does not speed up.
        if self.state.score % POINTS_PER_SPEED_STEP == 0 && self.state.speed < MAX_SPEED {
            self.state.speed += 1;
            debug!(speed = self.state.speed, "speed increased");
        }
    }

    fn end_round(&mut self, cause: EndCause) {
        self.status = RoundStatus::GameOver;
        self.state.end_cause = Some(cause);
        self.frame_armed = false;
        info!(
            score = self.state.score,
            length = self.state.length(),
            ?cause,
            "round over"
        );
    }
}
