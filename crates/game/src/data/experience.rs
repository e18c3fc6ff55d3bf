pub fn experience_for_level(level: u32) -> u64 {
    let level = level.max(1) as u64;
    level * level * level
}

pub fn level_for_experience(experience: u32) -> u32 {
    let xp = experience as u64;
    let mut level = (xp as f64).cbrt() as u64;
    // cbrt may land a hair below an exact cube
    while (level + 1).pow(3) <= xp {
        level += 1;
    }
    while level > 0 && level.pow(3) > xp {
        level -= 1;
    }
    level as u32
}

pub fn experience_to_next_level(level: u32) -> u64 {
    experience_for_level(level + 1) - experience_for_level(level)
}

/// Fraction of the way from the current level to the next, for the
/// experience bar.
pub fn level_progress(experience: u32) -> f32 {
    let level = level_for_experience(experience).max(1);
    let floor = experience_for_level(level);
    let span = experience_to_next_level(level);
    ((experience as u64).saturating_sub(floor) as f64 / span as f64).clamp(0.0, 1.0) as f32
}
