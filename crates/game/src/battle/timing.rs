#[derive(Debug, Clone)]
pub struct BattleTiming {
    pub tick_ms: f64,
    pub text_hold_ms: f64,
    pub post_tween_pause_ms: f64,
    pub failed_move_ms: f64,
    pub failed_flee_ms: f64,
    pub broke_free_ms: f64,
    pub nothing_happened_ms: f64,
    pub appeared_hold_ms: f64,
    pub tween_step: u32,
    pub tween_interval_ms: f64,
    pub flash_frames: u32,
    pub flash_frame_ticks: u32,
    pub flash_hold_frames: u32,
    pub flash_hold_ticks: u32,
    pub slide_in_ticks: u32,
    pub send_out_text_ticks: u32,
    pub send_out_spawn_ticks: u32,
    pub shake_cycles: u32,
}

impl Default for BattleTiming {
    fn default() -> Self {
        Self {
            tick_ms: 1000.0 / 64.0,
            text_hold_ms: 1000.0,
            post_tween_pause_ms: 1000.0,
            failed_move_ms: 2000.0,
            failed_flee_ms: 3000.0,
            broke_free_ms: 3000.0,
            nothing_happened_ms: 2000.0,
            appeared_hold_ms: 2000.0,
            tween_step: 1,
            tween_interval_ms: 100.0,
            flash_frames: 26,
            flash_frame_ticks: 3,
            flash_hold_frames: 2,
            flash_hold_ticks: 60,
            slide_in_ticks: 150,
            send_out_text_ticks: 120,
            send_out_spawn_ticks: 45,
            shake_cycles: 4,
        }
    }
}

impl BattleTiming {
    pub fn with_tick_rate(tick_rate: u32) -> Self {
        Self {
            tick_ms: 1000.0 / tick_rate.max(1) as f64,
            ..Self::default()
        }
    }

    pub fn ticks(&self, count: u32) -> f64 {
        count as f64 * self.tick_ms
    }

    pub fn flash_ms(&self) -> f64 {
        self.ticks(self.flash_frames * self.flash_frame_ticks + self.flash_hold_frames * self.flash_hold_ticks)
    }
}
