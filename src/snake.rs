use std::collections::VecDeque;

use crate::grid::GridSize;
use crate::input::{direction_change_is_valid, Direction};
use crate::items::{Item, ItemSet};

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Returns true when the position lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }

    /// Returns the neighbouring cell one step in `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Outcome of one simulation tick.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StepResult {
    Moved,
    Collected(Item),
    WallCollision,
    SelfCollision,
}

impl StepResult {
    /// Returns true for the results that end a round.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::WallCollision | Self::SelfCollision)
    }
}

/// Snake body, heading and growth target.
///
/// Segments are stored oldest first; the head is the back of the deque so a
/// tick is one `push_back` plus trimming from the front.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    pending_direction: Option<Direction>,
    desired_length: usize,
}

impl Snake {
    /// Creates a straight snake of `length` cells ending at `head`, trailing
    /// away from `direction`.
    #[must_use]
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..length)
            .rev()
            .map(|offset| {
                let offset = i32::try_from(offset).unwrap_or(i32::MAX);
                Position {
                    x: head.x - dx * offset,
                    y: head.y - dy * offset,
                }
            })
            .collect::<VecDeque<_>>();

        Self {
            body,
            direction,
            pending_direction: None,
            desired_length: length,
        }
    }

    /// Creates a snake from explicit body segments (oldest first, head last).
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Self {
        let desired_length = segments.len();
        Self {
            body: VecDeque::from(segments),
            direction,
            pending_direction: None,
            desired_length,
        }
    }

    /// Buffers a direction for the next tick.
    ///
    /// A reversal of the active direction is rejected and leaves the buffer
    /// untouched. Otherwise the latest call before a tick wins. Returns whether
    /// the direction was accepted.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if !direction_change_is_valid(self.direction, direction) {
            return false;
        }
        self.pending_direction = Some(direction);
        true
    }

    /// Advances exactly one cell.
    ///
    /// On a collision nothing is mutated except the consumed direction buffer,
    /// so the body stays frozen at its pre-collision cells.
    pub fn step(&mut self, bounds: GridSize, items: &mut ItemSet) -> StepResult {
        if let Some(next) = self.pending_direction.take() {
            self.direction = next;
        }

        let Some(head) = self.head() else {
            return StepResult::WallCollision;
        };

        let next_head = head.step(self.direction);
        if !next_head.is_within_bounds(bounds) {
            return StepResult::WallCollision;
        }

        // The tail cell still counts here even though it may be trimmed below.
        if self.occupies(next_head) {
            return StepResult::SelfCollision;
        }

        self.body.push_back(next_head);

        let result = match items.take_at(next_head) {
            Some(item) => {
                self.desired_length += item.value as usize;
                StepResult::Collected(item)
            }
            None => StepResult::Moved,
        };

        while self.body.len() > self.desired_length {
            let _ = self.body.pop_front();
        }

        result
    }

    /// Drops every segment outside `bounds`. Returns how many were removed.
    pub fn retain_within(&mut self, bounds: GridSize) -> usize {
        let before = self.body.len();
        self.body.retain(|segment| segment.is_within_bounds(bounds));
        before - self.body.len()
    }

    /// Returns the head position, if the snake has any segments left.
    #[must_use]
    pub fn head(&self) -> Option<Position> {
        self.body.back().copied()
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the target length the body converges to.
    #[must_use]
    pub fn desired_length(&self) -> usize {
        self.desired_length
    }

    /// Returns the direction applied on the last tick.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the buffered direction for the next tick.
    #[must_use]
    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    /// Iterates over body segments from oldest to head.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::grid::GridSize;
    use crate::input::Direction;
    use crate::items::{Item, ItemSet};

    use super::{Position, Snake, StepResult};

    const BOUNDS: GridSize = GridSize {
        width: 40,
        height: 20,
    };

    fn segments(snake: &Snake) -> Vec<Position> {
        snake.segments().copied().collect()
    }

    #[test]
    fn new_snake_trails_behind_head() {
        let snake = Snake::new(Position { x: 5, y: 5 }, Direction::Right, 3);

        assert_eq!(
            segments(&snake),
            vec![
                Position { x: 3, y: 5 },
                Position { x: 4, y: 5 },
                Position { x: 5, y: 5 },
            ]
        );
        assert_eq!(snake.head(), Some(Position { x: 5, y: 5 }));
        assert_eq!(snake.desired_length(), 3);
    }

    #[test]
    fn snake_moves_one_cell_per_tick() {
        let mut snake = Snake::new(Position { x: 5, y: 5 }, Direction::Right, 3);
        let mut items = ItemSet::new();

        let result = snake.step(BOUNDS, &mut items);

        assert_eq!(result, StepResult::Moved);
        assert_eq!(snake.head(), Some(Position { x: 6, y: 5 }));
        assert_eq!(snake.len(), 3);
        assert!(!snake.occupies(Position { x: 3, y: 5 }));
    }

    #[test]
    fn reverse_is_rejected_and_keeps_pending_direction() {
        let mut snake = Snake::new(Position { x: 5, y: 5 }, Direction::Up, 1);

        assert!(snake.set_direction(Direction::Left));
        assert!(!snake.set_direction(Direction::Down));
        assert!(!snake.set_direction(Direction::Down));

        assert_eq!(snake.direction(), Direction::Up);
        assert_eq!(snake.pending_direction(), Some(Direction::Left));
    }

    #[test]
    fn reverse_check_uses_active_not_pending_direction() {
        let mut snake = Snake::new(Position { x: 5, y: 5 }, Direction::Right, 3);
        let mut items = ItemSet::new();

        // Left reverses Right even after Up was buffered, so Up still applies.
        assert!(snake.set_direction(Direction::Up));
        assert!(!snake.set_direction(Direction::Left));

        let _ = snake.step(BOUNDS, &mut items);
        assert_eq!(snake.head(), Some(Position { x: 5, y: 4 }));
        assert_eq!(snake.direction(), Direction::Up);
        assert_eq!(snake.pending_direction(), None);
    }

    #[test]
    fn last_buffered_direction_wins() {
        let mut snake = Snake::new(Position { x: 5, y: 5 }, Direction::Right, 1);
        let mut items = ItemSet::new();

        snake.set_direction(Direction::Up);
        snake.set_direction(Direction::Down);
        let _ = snake.step(BOUNDS, &mut items);

        assert_eq!(snake.head(), Some(Position { x: 5, y: 6 }));
    }

    #[test]
    fn wall_collision_freezes_body() {
        let bounds = GridSize {
            width: 4,
            height: 4,
        };
        let mut snake = Snake::new(Position { x: 3, y: 1 }, Direction::Right, 2);
        let mut items = ItemSet::new();
        let before = segments(&snake);

        assert_eq!(snake.step(bounds, &mut items), StepResult::WallCollision);
        assert_eq!(segments(&snake), before);
    }

    #[test]
    fn moving_into_own_body_is_self_collision() {
        let mut snake = Snake::from_segments(
            vec![
                Position { x: 3, y: 2 },
                Position { x: 3, y: 3 },
                Position { x: 2, y: 3 },
                Position { x: 1, y: 3 },
                Position { x: 1, y: 2 },
                Position { x: 2, y: 2 },
            ],
            Direction::Right,
        );
        let mut items = ItemSet::new();

        assert_eq!(snake.step(BOUNDS, &mut items), StepResult::SelfCollision);
        assert_eq!(snake.len(), 6);
    }

    #[test]
    fn moving_into_current_tail_cell_collides() {
        // A 2x2 loop: the next head is the tail cell that would be trimmed.
        let mut snake = Snake::from_segments(
            vec![
                Position { x: 1, y: 1 },
                Position { x: 2, y: 1 },
                Position { x: 2, y: 2 },
                Position { x: 1, y: 2 },
            ],
            Direction::Left,
        );
        snake.set_direction(Direction::Up);
        let mut items = ItemSet::new();

        assert_eq!(snake.step(BOUNDS, &mut items), StepResult::SelfCollision);
    }

    #[test]
    fn collected_item_grows_body_one_cell_per_tick() {
        let mut snake = Snake::new(Position { x: 5, y: 5 }, Direction::Right, 2);
        let mut items = ItemSet::new();
        let item = Item::new(Position { x: 6, y: 5 }, 3);
        assert!(items.place(item));

        assert_eq!(snake.step(BOUNDS, &mut items), StepResult::Collected(item));
        assert!(items.is_empty());
        assert_eq!(snake.desired_length(), 5);

        let mut lengths = vec![snake.len()];
        for _ in 0..4 {
            let _ = snake.step(BOUNDS, &mut items);
            lengths.push(snake.len());
        }

        assert_eq!(lengths, vec![3, 4, 5, 5, 5]);
    }

    #[test]
    fn retain_within_drops_out_of_bounds_segments() {
        let mut snake = Snake::new(Position { x: 6, y: 2 }, Direction::Right, 4);

        let dropped = snake.retain_within(GridSize {
            width: 5,
            height: 5,
        });

        assert_eq!(dropped, 2);
        assert_eq!(snake.head(), Some(Position { x: 4, y: 2 }));
    }

    #[test]
    fn empty_snake_reports_wall_collision() {
        let mut snake = Snake::from_segments(Vec::new(), Direction::Right);
        let mut items = ItemSet::new();

        assert!(snake.is_empty());
        assert_eq!(snake.step(BOUNDS, &mut items), StepResult::WallCollision);
    }
}
