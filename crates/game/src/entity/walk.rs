use super::direction::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stance {
    #[default]
    First,
    Second,
}

impl Stance {
    pub fn number(self) -> u8 {
        match self {
            Stance::First => 1,
            Stance::Second => 2,
        }
    }

    fn toggled(self) -> Self {
        match self {
            Stance::First => Stance::Second,
            Stance::Second => Stance::First,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpriteFrame {
    pub direction: Direction,
    pub stance: Stance,
}

impl SpriteFrame {
    pub fn sprite_name(&self, base: &str) -> String {
        format!("{}_{}_{}.png", base, self.direction.as_str(), self.stance.number())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalkCycle {
    counter: u32,
    frame: SpriteFrame,
}

impl WalkCycle {
    pub fn new(facing: Direction) -> Self {
        Self {
            counter: 0,
            frame: SpriteFrame {
                direction: facing,
                stance: Stance::First,
            },
        }
    }

    /// One tick of the selector. While moving the counter climbs and the
    /// stance flips once it passes `threshold`; when idle the frame snaps to
    /// the first stance of the facing direction.
    pub fn tick(&mut self, moving: bool, facing: Direction, threshold: u32) {
        if moving {
            self.counter += 1;
            self.frame.direction = facing;
            if self.counter > threshold {
                self.frame.stance = self.frame.stance.toggled();
                self.counter = 0;
            }
        } else {
            self.counter = 0;
            self.frame = SpriteFrame {
                direction: facing,
                stance: Stance::First,
            };
        }
    }

    pub fn frame(&self) -> SpriteFrame {
        self.frame
    }
}
