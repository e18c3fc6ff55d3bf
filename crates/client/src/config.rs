use std::net::SocketAddr;

use tallgrass::{BattleTiming, SchedulerConfig, SessionConfig};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server: Option<SocketAddr>,
    pub tick_rate: u32,
    pub frame_interval_ms: u64,
    pub headless: bool,
    pub headless_log_interval_ms: f64,
    pub run_for_secs: Option<f64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: None,
            tick_rate: tallgrass::simulation::DEFAULT_TICK_RATE,
            frame_interval_ms: 16,
            headless: false,
            headless_log_interval_ms: 1000.0,
            run_for_secs: None,
        }
    }
}

impl ClientConfig {
    pub fn scheduler(&self) -> SchedulerConfig {
        SchedulerConfig {
            tick_rate: self.tick_rate,
            ..Default::default()
        }
    }

    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            battle: BattleTiming::with_tick_rate(self.tick_rate),
            ..Default::default()
        }
    }
}
