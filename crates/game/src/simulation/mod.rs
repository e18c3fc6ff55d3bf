mod sequence;
mod tick;

pub use sequence::{Sequence, Step};
pub use tick::{
    FixedTimestep, FrameReport, Scheduler, SchedulerConfig, Simulation, DEFAULT_TICK_RATE,
};
