use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::{HashSet, VecDeque};

use super::{
    action::{Direction, Velocity},
    grid::{Grid, Position, SpawnBand},
    state::CollisionType,
};

/// What a single advance did to the body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Head moved into a free cell
    Moved,
    /// Head moved onto the food; the tail was kept
    FoodEaten,
    /// The game is over
    Collision(CollisionType),
}

/// Result of [`BodyEngine::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceResult {
    pub outcome: AdvanceOutcome,
    /// The head cell this tick aimed for. Outside the grid on a wall hit.
    pub head: Position,
    /// Tail cell dropped this tick, if any
    pub trimmed: Option<Position>,
}

impl AdvanceResult {
    pub fn is_terminal(&self) -> bool {
        matches!(self.outcome, AdvanceOutcome::Collision(_))
    }
}

/// Owns the snake's cells, its velocity and its growth.
///
/// Segments are stored tail first, so the head is the back of the deque.
/// A fresh body is a single cell that grows towards `target_length` over
/// the first ticks.
#[derive(Debug, Clone)]
pub struct BodyEngine {
    grid: Grid,
    band: SpawnBand,
    rng: StdRng,
    segments: VecDeque<Position>,
    head: Position,
    initial_length: usize,
    target_length: usize,
    direction: Direction,
    current: Velocity,
    pending: Velocity,
}

impl BodyEngine {
    /// Create a body at a random cell of `band`
    pub fn new(grid: Grid, band: SpawnBand, initial_length: usize, rng: StdRng) -> Self {
        let mut engine = Self::bare(grid, band, initial_length, rng);
        engine.reset();
        engine
    }

    /// Create a body at a fixed start cell
    pub fn at(grid: Grid, initial_length: usize, start: Position) -> Self {
        let band = grid.spawn_band(0, 0);
        let mut engine = Self::bare(grid, band, initial_length, StdRng::seed_from_u64(0));
        engine.reset_at(start);
        engine
    }

    fn bare(grid: Grid, band: SpawnBand, initial_length: usize, rng: StdRng) -> Self {
        Self {
            grid,
            band,
            rng,
            segments: VecDeque::with_capacity(initial_length + 1),
            head: Position::new(0, 0),
            initial_length,
            target_length: initial_length,
            direction: Direction::Up,
            current: Velocity::ZERO,
            pending: Velocity::ZERO,
        }
    }

    /// Forget the current body and spawn a new one in the band
    pub fn reset(&mut self) {
        let start = self.band.sample(&mut self.rng);
        self.reset_at(start);
    }

    pub fn reset_at(&mut self, start: Position) {
        self.segments.clear();
        self.segments.push_back(start);
        self.head = start;
        self.target_length = self.initial_length;
        self.direction = Direction::Up;
        self.current = Velocity::ZERO;
        self.pending = Velocity::ZERO;
    }

    /// Request a new heading for the next tick.
    ///
    /// Returns false and leaves everything untouched when the request would
    /// reverse the velocity already in effect.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        let velocity = direction.velocity();
        if velocity.is_reverse_of(self.current) {
            return false;
        }

        self.pending = velocity;
        self.direction = direction;
        true
    }

    /// Move the head one cell and apply growth, trimming and collisions
    pub fn advance(&mut self, food: Position) -> AdvanceResult {
        if self.pending.is_zero() {
            self.pending = self.direction.velocity();
        }
        self.current = self.pending;

        let head = self.head.offset(self.current);

        // Nothing is mutated for a wall hit
        if !self.grid.contains(head) {
            return AdvanceResult {
                outcome: AdvanceOutcome::Collision(CollisionType::Wall),
                head,
                trimmed: None,
            };
        }

        self.segments.push_back(head);
        self.head = head;

        let ate_food = head == food;
        let mut trimmed = None;
        if ate_food {
            self.target_length += 1;
        } else if self.segments.len() > self.target_length {
            trimmed = self.segments.pop_front();
        }

        let bitten = self.segments.iter().rev().skip(1).any(|&part| part == head);

        let outcome = if bitten {
            AdvanceOutcome::Collision(CollisionType::SelfCollision)
        } else if ate_food {
            AdvanceOutcome::FoodEaten
        } else {
            AdvanceOutcome::Moved
        };

        AdvanceResult {
            outcome,
            head,
            trimmed,
        }
    }

    pub fn head(&self) -> Position {
        self.head
    }

    /// Cells from tail to head
    pub fn segments(&self) -> impl DoubleEndedIterator<Item = Position> + ExactSizeIterator + '_ {
        self.segments.iter().copied()
    }

    pub fn occupied(&self) -> HashSet<Position> {
        self.segments.iter().copied().collect()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.segments.contains(&pos)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if the body is empty (never true after a reset)
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn target_length(&self) -> usize {
        self.target_length
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn current_velocity(&self) -> Velocity {
        self.current
    }

    pub fn pending_velocity(&self) -> Velocity {
        self.pending
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Build a body from explicit cells (tail first) already moving in `direction`
    #[cfg(test)]
    pub(crate) fn with_segments(grid: Grid, cells: &[Position], direction: Direction) -> Self {
        let mut engine = Self::at(grid, cells.len(), cells[0]);
        engine.segments = cells.iter().copied().collect();
        engine.head = cells[cells.len() - 1];
        engine.direction = direction;
        engine.current = direction.velocity();
        engine.pending = direction.velocity();
        engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAR_FOOD: Position = Position { x: 0, y: 0 };

    fn column(x: i32, ys: &[i32]) -> Vec<Position> {
        ys.iter().map(|&y| Position::new(x, y)).collect()
    }

    #[test]
    fn test_fresh_body() {
        let body = BodyEngine::at(Grid::default(), 3, Position::new(15, 7));
        assert_eq!(body.len(), 1);
        assert_eq!(body.head(), Position::new(15, 7));
        assert_eq!(body.target_length(), 3);
        assert_eq!(body.direction(), Direction::Up);
        assert!(body.current_velocity().is_zero());
        assert!(body.pending_velocity().is_zero());
    }

    #[test]
    fn test_random_spawn_in_band() {
        let grid = Grid::default();
        let band = grid.spawn_band(10, 5);
        for seed in 0..50 {
            let body = BodyEngine::new(grid, band.clone(), 3, StdRng::seed_from_u64(seed));
            assert!(band.contains(body.head()));
        }
    }

    #[test]
    fn test_grows_to_target_moving_up() {
        let mut body = BodyEngine::at(Grid::default(), 3, Position::new(15, 7));

        let first = body.advance(FAR_FOOD);
        assert_eq!(first.outcome, AdvanceOutcome::Moved);
        assert_eq!(first.head, Position::new(15, 6));
        assert_eq!(first.trimmed, None);

        body.advance(FAR_FOOD);
        let third = body.advance(FAR_FOOD);

        assert_eq!(third.trimmed, Some(Position::new(15, 7)));
        assert_eq!(body.len(), 3);
        assert_eq!(
            body.segments().collect::<Vec<_>>(),
            column(15, &[6, 5, 4])
        );
    }

    #[test]
    fn test_length_never_exceeds_target() {
        let mut body = BodyEngine::at(Grid::default(), 3, Position::new(15, 7));
        let turns = [Direction::Left, Direction::Down, Direction::Right, Direction::Up];

        for i in 0..12 {
            body.set_direction(turns[(i / 2) % turns.len()]);
            let result = body.advance(FAR_FOOD);
            assert_eq!(result.outcome, AdvanceOutcome::Moved);
            assert!(body.len() <= body.target_length());
            if i >= 2 {
                assert_eq!(body.len(), body.target_length());
            }
        }
    }

    #[test]
    fn test_eating_skips_trim() {
        let mut body = BodyEngine::at(Grid::default(), 3, Position::new(15, 7));
        for _ in 0..3 {
            body.advance(FAR_FOOD);
        }

        let result = body.advance(Position::new(15, 3));

        assert_eq!(result.outcome, AdvanceOutcome::FoodEaten);
        assert_eq!(result.trimmed, None);
        assert_eq!(body.target_length(), 4);
        assert_eq!(body.len(), 4);
        assert_eq!(body.head(), Position::new(15, 3));
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut body = BodyEngine::at(Grid::default(), 3, Position::new(15, 7));
        body.advance(FAR_FOOD);

        assert!(!body.set_direction(Direction::Down));
        assert_eq!(body.direction(), Direction::Up);
        assert_eq!(body.pending_velocity(), Direction::Up.velocity());

        body.advance(FAR_FOOD);
        assert_eq!(body.head(), Position::new(15, 5));
    }

    #[test]
    fn test_reversal_against_current_not_pending() {
        let mut body = BodyEngine::at(Grid::default(), 3, Position::new(15, 7));
        body.advance(FAR_FOOD);

        // Up is in effect; Left then Right between ticks must not sneak a
        // reversal through, but Right is only checked against Up.
        assert!(body.set_direction(Direction::Left));
        assert!(body.set_direction(Direction::Right));
        let result = body.advance(FAR_FOOD);
        assert_eq!(result.head, Position::new(16, 6));
    }

    #[test]
    fn test_any_direction_before_first_tick() {
        let mut body = BodyEngine::at(Grid::default(), 3, Position::new(15, 7));
        assert!(body.set_direction(Direction::Down));
        body.advance(FAR_FOOD);
        assert_eq!(body.head(), Position::new(15, 8));
    }

    #[test]
    fn test_velocity_never_flips_between_ticks() {
        let mut body = BodyEngine::at(Grid::new(30, 30), 3, Position::new(15, 15));
        let script = [
            Direction::Down,
            Direction::Left,
            Direction::Right,
            Direction::Up,
            Direction::Down,
            Direction::Right,
            Direction::Left,
            Direction::Down,
        ];

        let mut previous = Velocity::ZERO;
        for direction in script {
            body.set_direction(direction);
            body.advance(FAR_FOOD);
            assert!(!body.current_velocity().is_reverse_of(previous));
            previous = body.current_velocity();
        }
    }

    #[test]
    fn test_wall_collision_leaves_body_untouched() {
        let cells = column(0, &[2, 1, 0]);
        let mut body = BodyEngine::with_segments(Grid::default(), &cells, Direction::Up);

        let result = body.advance(FAR_FOOD);

        assert_eq!(
            result.outcome,
            AdvanceOutcome::Collision(CollisionType::Wall)
        );
        assert_eq!(result.head, Position::new(0, -1));
        assert!(result.is_terminal());
        assert_eq!(body.segments().collect::<Vec<_>>(), cells);
    }

    #[test]
    fn test_self_collision() {
        // Tail (4,5) .. head (5,6), heading left into a loop
        let cells = vec![
            Position::new(4, 5),
            Position::new(5, 5),
            Position::new(6, 5),
            Position::new(6, 6),
            Position::new(5, 6),
        ];
        let mut body = BodyEngine::with_segments(Grid::default(), &cells, Direction::Left);

        body.set_direction(Direction::Up);
        let result = body.advance(FAR_FOOD);

        assert_eq!(
            result.outcome,
            AdvanceOutcome::Collision(CollisionType::SelfCollision)
        );
        assert_eq!(result.trimmed, Some(Position::new(4, 5)));
    }

    #[test]
    fn test_self_collision_wins_over_food() {
        let cells = vec![
            Position::new(4, 5),
            Position::new(5, 5),
            Position::new(6, 5),
            Position::new(6, 6),
            Position::new(5, 6),
        ];
        let mut body = BodyEngine::with_segments(Grid::default(), &cells, Direction::Left);

        body.set_direction(Direction::Up);
        let result = body.advance(Position::new(5, 5));

        assert_eq!(
            result.outcome,
            AdvanceOutcome::Collision(CollisionType::SelfCollision)
        );
        assert_eq!(result.head, Position::new(5, 5));
        // Eating skipped the trim, so the tail is still in place
        assert_eq!(result.trimmed, None);
        assert_eq!(body.len(), 6);
    }

    #[test]
    fn test_chasing_own_tail_is_safe() {
        // A 2x2 loop: the tail leaves the cell the head enters
        let cells = vec![
            Position::new(5, 5),
            Position::new(6, 5),
            Position::new(6, 6),
            Position::new(5, 6),
        ];
        let mut body = BodyEngine::with_segments(Grid::default(), &cells, Direction::Left);

        body.set_direction(Direction::Up);
        let result = body.advance(FAR_FOOD);

        assert_eq!(result.outcome, AdvanceOutcome::Moved);
        assert_eq!(result.trimmed, Some(Position::new(5, 5)));
        assert_eq!(body.head(), Position::new(5, 5));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut body = BodyEngine::at(Grid::default(), 3, Position::new(15, 7));
        body.set_direction(Direction::Left);
        for _ in 0..3 {
            body.advance(FAR_FOOD);
        }
        body.advance(body.head().offset(Direction::Left.velocity()));
        assert_eq!(body.target_length(), 4);

        body.reset_at(Position::new(12, 6));

        assert_eq!(body.len(), 1);
        assert_eq!(body.target_length(), 3);
        assert_eq!(body.direction(), Direction::Up);
        assert!(body.current_velocity().is_zero());
    }
}
