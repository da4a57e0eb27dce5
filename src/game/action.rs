/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the unit velocity for moving in this direction
    pub fn velocity(&self) -> Velocity {
        match self {
            Direction::Up => Velocity::new(0, -1),
            Direction::Down => Velocity::new(0, 1),
            Direction::Left => Velocity::new(-1, 0),
            Direction::Right => Velocity::new(1, 0),
        }
    }
}

/// Per-tick displacement of the head.
///
/// Only ever holds the zero velocity or a single unit step along one axis;
/// the constructors used by the engine go through [`Direction::velocity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Velocity {
    pub dx: i32,
    pub dy: i32,
}

impl Velocity {
    pub const ZERO: Velocity = Velocity { dx: 0, dy: 0 };

    pub(crate) fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn reversed(&self) -> Self {
        Self::new(-self.dx, -self.dy)
    }

    /// True when `self` is the exact negation of a nonzero `other`
    pub fn is_reverse_of(&self, other: Velocity) -> bool {
        !other.is_zero() && *self == other.reversed()
    }
}

/// A discrete request coming from an input source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Steer towards a direction on the next tick
    Turn(Direction),
    /// Begin a game that has not started yet
    Start,
    /// Pause a running game, or resume a paused one
    TogglePause,
    /// Throw away the current game and begin a fresh one
    Restart,
}

impl From<Direction> for Intent {
    fn from(direction: Direction) -> Self {
        Intent::Turn(direction)
    }
}
