use log::debug;

pub const DEFAULT_TICK_RATE: u32 = 64;

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub tick_rate: u32,
    pub max_frame_gap_ms: f64,
    pub fps_smoothing: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            max_frame_gap_ms: 1000.0,
            fps_smoothing: 0.9,
        }
    }
}

impl SchedulerConfig {
    pub fn tick_interval_ms(&self) -> f64 {
        1000.0 / self.tick_rate.max(1) as f64
    }
}

pub struct FixedTimestep {
    tick_rate: u32,
    dt_ms: f64,
    accumulator: f64,
}

impl FixedTimestep {
    pub fn new(tick_rate: u32) -> Self {
        let tick_rate = tick_rate.max(1);
        Self {
            tick_rate,
            dt_ms: 1000.0 / tick_rate as f64,
            accumulator: 0.0,
        }
    }

    pub fn tick_rate(&self) -> u32 {
        self.tick_rate
    }

    pub fn dt_ms(&self) -> f64 {
        self.dt_ms
    }

    pub fn accumulate(&mut self, delta_ms: f64) {
        self.accumulator += delta_ms.max(0.0);
    }

    pub fn consume_tick(&mut self) -> bool {
        if self.accumulator >= self.dt_ms {
            self.accumulator -= self.dt_ms;
            true
        } else {
            false
        }
    }

    pub fn alpha(&self) -> f64 {
        self.accumulator / self.dt_ms
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

pub trait Simulation {
    fn tick(&mut self, now_ms: f64, dt_ms: f64);
    fn render(&mut self, now_ms: f64);
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameReport {
    pub ticks: u32,
    pub fps: f64,
}

/// Drives a [`Simulation`] from display paint callbacks.
pub struct Scheduler {
    config: SchedulerConfig,
    timestep: FixedTimestep,
    last_frame_ms: Option<f64>,
    fps: f64,
    running: bool,
    total_ticks: u64,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            timestep: FixedTimestep::new(config.tick_rate),
            config,
            last_frame_ms: None,
            fps: 0.0,
            running: false,
            total_ticks: 0,
        }
    }

    pub fn start(&mut self) {
        if !self.running {
            debug!("scheduler started at {} ticks/s", self.timestep.tick_rate());
        }
        self.running = true;
        self.last_frame_ms = None;
        self.timestep.reset();
    }

    pub fn stop(&mut self) {
        if self.running {
            debug!("scheduler stopped after {} ticks", self.total_ticks);
        }
        self.running = false;
        self.last_frame_ms = None;
        self.timestep.reset();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    pub fn tick_interval_ms(&self) -> f64 {
        self.timestep.dt_ms()
    }

    /// One paint callback. The first callback after `start` only sets the
    /// time base; a gap above `max_frame_gap_ms` counts as one tick interval.
    pub fn frame<S: Simulation>(&mut self, now_ms: f64, sim: &mut S) -> FrameReport {
        if !self.running {
            return FrameReport::default();
        }

        let Some(last) = self.last_frame_ms.replace(now_ms) else {
            sim.render(now_ms);
            return FrameReport {
                ticks: 0,
                fps: self.fps,
            };
        };

        let mut delta = now_ms - last;
        if delta > self.config.max_frame_gap_ms {
            debug!("frame gap of {delta:.0}ms clamped");
            delta = self.timestep.dt_ms();
        }
        self.timestep.accumulate(delta);

        let dt = self.timestep.dt_ms();
        let mut ticks = 0;
        while self.timestep.consume_tick() {
            sim.tick(now_ms, dt);
            ticks += 1;
        }
        self.total_ticks += ticks as u64;

        if delta > 0.0 {
            let instant = 1000.0 / delta;
            let k = self.config.fps_smoothing;
            self.fps = k * self.fps + (1.0 - k) * instant;
        }

        sim.render(now_ms);

        FrameReport {
            ticks,
            fps: self.fps,
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        ticks: u32,
        renders: u32,
    }

    impl Simulation for Counter {
        fn tick(&mut self, _now_ms: f64, _dt_ms: f64) {
            self.ticks += 1;
        }

        fn render(&mut self, _now_ms: f64) {
            self.renders += 1;
        }
    }

    #[test]
    fn fixed_timestep_accumulation() {
        let mut ts = FixedTimestep::new(64);
        assert_eq!(ts.dt_ms(), 15.625);

        ts.accumulate(31.25);
        assert!(ts.consume_tick());
        assert!(ts.consume_tick());
        assert!(!ts.consume_tick());
        assert_eq!(ts.alpha(), 0.0);
    }

    #[test]
    fn ticks_at_fixed_rate() {
        let mut scheduler = Scheduler::default();
        let mut sim = Counter::default();
        scheduler.start();

        scheduler.frame(0.0, &mut sim);
        assert_eq!(sim.ticks, 0);
        assert_eq!(sim.renders, 1);

        let mut now = 0.0;
        for _ in 0..64 {
            now += 15.625;
            scheduler.frame(now, &mut sim);
        }
        assert_eq!(sim.ticks, 64);
        assert_eq!(sim.renders, 65);
    }

    #[test]
    fn slow_frames_catch_up() {
        let mut scheduler = Scheduler::default();
        let mut sim = Counter::default();
        scheduler.start();
        scheduler.frame(0.0, &mut sim);
        let report = scheduler.frame(62.5, &mut sim);
        assert_eq!(report.ticks, 4);
    }

    #[test]
    fn large_gap_is_clamped_to_one_tick() {
        let mut scheduler = Scheduler::default();
        let mut sim = Counter::default();
        scheduler.start();
        scheduler.frame(0.0, &mut sim);
        let report = scheduler.frame(5000.0, &mut sim);
        assert!(report.ticks <= 1);
        assert_eq!(sim.ticks, report.ticks);
    }

    #[test]
    fn fps_is_smoothed() {
        let mut scheduler = Scheduler::default();
        let mut sim = Counter::default();
        scheduler.start();
        scheduler.frame(0.0, &mut sim);
        let report = scheduler.frame(10.0, &mut sim);
        assert!((report.fps - 10.0).abs() < 1e-9);
        let report = scheduler.frame(20.0, &mut sim);
        assert!((report.fps - 19.0).abs() < 1e-9);
    }

    #[test]
    fn stopped_scheduler_does_nothing() {
        let mut scheduler = Scheduler::default();
        let mut sim = Counter::default();
        scheduler.frame(0.0, &mut sim);
        scheduler.frame(100.0, &mut sim);
        assert_eq!(sim.renders, 0);

        scheduler.start();
        scheduler.frame(200.0, &mut sim);
        scheduler.stop();
        scheduler.frame(300.0, &mut sim);
        assert_eq!(sim.renders, 1);
        assert_eq!(sim.ticks, 0);
    }
}
