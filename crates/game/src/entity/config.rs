use glam::Vec2;

#[derive(Debug, Clone)]
pub struct WorldConfig {
    pub tile_size: f32,
    pub snapshot_interval_ms: f64,
    pub walk_frame_threshold: u32,
    pub asset_init_delay_ms: f64,
    pub viewport: Vec2,
    pub camera_bias_x: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            // 8px tiles drawn at 4x
            tile_size: 32.0,
            snapshot_interval_ms: 200.0,
            walk_frame_threshold: 7,
            asset_init_delay_ms: 1000.0,
            viewport: Vec2::new(1280.0, 720.0),
            camera_bias_x: 100.0,
        }
    }
}
