use super::protocol::ClientIntent;

pub const PING_INTERVAL_MS: f64 = 1000.0;

#[derive(Debug, Clone, Default)]
pub struct NetworkStats {
    pub frames_received: u64,
    pub frames_sent: u64,
    pub bytes_received: u64,
    pub bytes_sent: u64,
    pub latency_ms: Option<f64>,
}

/// Sends a ping every interval and turns the echoed timestamp into a
/// round-trip latency. The first poll after a reset only arms the timer.
#[derive(Debug, Clone)]
pub struct LatencyTracker {
    interval_ms: f64,
    last_ping_ms: Option<f64>,
    latency_ms: Option<f64>,
}

impl LatencyTracker {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_ping_ms: None,
            latency_ms: None,
        }
    }

    pub fn reset(&mut self) {
        self.last_ping_ms = None;
        self.latency_ms = None;
    }

    pub fn poll(&mut self, now_ms: f64) -> Option<ClientIntent> {
        let Some(last) = self.last_ping_ms else {
            self.last_ping_ms = Some(now_ms);
            return None;
        };
        if now_ms - last < self.interval_ms {
            return None;
        }
        self.last_ping_ms = Some(now_ms);
        Some(ClientIntent::Ping {
            timestamp_ms: now_ms.max(0.0) as u64,
        })
    }

    pub fn on_pong(&mut self, timestamp_ms: u64, now_ms: f64) {
        let rtt = now_ms - timestamp_ms as f64;
        if rtt >= 0.0 {
            self.latency_ms = Some(rtt);
        }
    }

    pub fn latency_ms(&self) -> Option<f64> {
        self.latency_ms
    }
}

impl Default for LatencyTracker {
    fn default() -> Self {
        Self::new(PING_INTERVAL_MS)
    }
}
