use glam::Vec2;

pub const ARC_TICKS: u32 = 45;
pub const LANDING_TICKS: u32 = 10;
pub const SHELL_OPEN_TICKS: u32 = 25;
pub const SHELL_HOLD_TICKS: u32 = 20;
pub const SHELL_CLOSE_TICKS: u32 = 20;
pub const BOUNCE_TICKS: u32 = 40;
pub const SHAKE_FRAMES: u32 = 4;
pub const SHAKE_FRAME_TICKS: u32 = 10;

const ARC_START: Vec2 = Vec2::new(220.0, 240.0);
const ARC_END: Vec2 = Vec2::new(795.0, 140.0);
const ARC_APEX: f32 = 200.0;
const BOUNCE_HEIGHT: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CapturePhase {
    Arc { position: Vec2 },
    Landing,
    ShellOpen { lid: f32 },
    Shake { bounce: f32, cycle: u32, frame: u32 },
    Outcome { captured: bool },
}

impl CapturePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapturePhase::Arc { .. } => "arc",
            CapturePhase::Landing => "landing",
            CapturePhase::ShellOpen { .. } => "shell open",
            CapturePhase::Shake { .. } => "shake",
            CapturePhase::Outcome { .. } => "outcome",
        }
    }
}

/// Thrown capture device. The whole animation is a pure function of the
/// tick count; the outcome comes from the server.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureAnimation {
    shake_cycles: u32,
    captured: bool,
}

impl CaptureAnimation {
    pub fn new(shake_cycles: u32, captured: bool) -> Self {
        Self {
            shake_cycles,
            captured,
        }
    }

    pub fn captured(&self) -> bool {
        self.captured
    }

    fn shell_ticks() -> u32 {
        SHELL_OPEN_TICKS + SHELL_HOLD_TICKS + SHELL_CLOSE_TICKS
    }

    fn shake_ticks(&self) -> u32 {
        BOUNCE_TICKS + self.shake_cycles * SHAKE_FRAMES * SHAKE_FRAME_TICKS
    }

    pub fn total_ticks(&self) -> u32 {
        ARC_TICKS + LANDING_TICKS + Self::shell_ticks() + self.shake_ticks()
    }

    pub fn phase_at(&self, tick: u32) -> CapturePhase {
        if tick < ARC_TICKS {
            let progress = tick as f32 / ARC_TICKS as f32;
            return CapturePhase::Arc {
                position: arc_position(progress),
            };
        }
        let mut t = tick - ARC_TICKS;

        if t < LANDING_TICKS {
            return CapturePhase::Landing;
        }
        t -= LANDING_TICKS;

        if t < Self::shell_ticks() {
            let lid = if t < SHELL_OPEN_TICKS {
                t as f32 / SHELL_OPEN_TICKS as f32
            } else if t < SHELL_OPEN_TICKS + SHELL_HOLD_TICKS {
                1.0
            } else {
                let closing = t - SHELL_OPEN_TICKS - SHELL_HOLD_TICKS;
                1.0 - closing as f32 / SHELL_CLOSE_TICKS as f32
            };
            return CapturePhase::ShellOpen { lid };
        }
        t -= Self::shell_ticks();

        if t < self.shake_ticks() {
            if t < BOUNCE_TICKS {
                let progress = t as f32 / BOUNCE_TICKS as f32;
                return CapturePhase::Shake {
                    bounce: (progress * std::f32::consts::PI).sin() * BOUNCE_HEIGHT,
                    cycle: 0,
                    frame: 0,
                };
            }
            let shaking = t - BOUNCE_TICKS;
            let frame_index = shaking / SHAKE_FRAME_TICKS;
            return CapturePhase::Shake {
                bounce: 0.0,
                cycle: frame_index / SHAKE_FRAMES + 1,
                frame: frame_index % SHAKE_FRAMES,
            };
        }

        CapturePhase::Outcome {
            captured: self.captured,
        }
    }
}

/// Thrown arc from the player's side to the opponent, `progress` in 0..=1.
pub fn arc_position(progress: f32) -> Vec2 {
    let p = progress.clamp(0.0, 1.0);
    let base = ARC_START + (ARC_END - ARC_START) * p;
    Vec2::new(base.x, base.y - (p * std::f32::consts::PI).sin() * ARC_APEX)
}
