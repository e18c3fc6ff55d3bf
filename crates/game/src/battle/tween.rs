/// Vitality bar moving from `from` to `to` by `step` every `interval_ms`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VitalityTween {
    pub from: u32,
    pub to: u32,
    step: u32,
    interval_ms: f64,
}

impl VitalityTween {
    pub fn new(from: u32, to: u32, step: u32, interval_ms: f64) -> Self {
        Self {
            from,
            to,
            step: step.max(1),
            interval_ms: interval_ms.max(0.0),
        }
    }

    fn distance(&self) -> u32 {
        self.from.abs_diff(self.to)
    }

    pub fn steps(&self) -> u32 {
        self.distance().div_ceil(self.step)
    }

    pub fn duration_ms(&self) -> f64 {
        self.steps() as f64 * self.interval_ms
    }

    pub fn value_at(&self, elapsed_ms: f64) -> u32 {
        if self.interval_ms <= 0.0 {
            return self.to;
        }
        let taken = (elapsed_ms.max(0.0) / self.interval_ms).floor();
        let moved = (taken * self.step as f64).min(self.distance() as f64) as u32;
        if self.to < self.from {
            self.from - moved
        } else {
            self.from + moved
        }
    }

    pub fn is_done(&self, elapsed_ms: f64) -> bool {
        self.value_at(elapsed_ms) == self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forty_to_ten_takes_three_seconds() {
        let tween = VitalityTween::new(40, 10, 1, 100.0);
        assert_eq!(tween.duration_ms(), 3000.0);
        assert_eq!(tween.value_at(3000.0), 10);
        assert_eq!(tween.value_at(2999.0), 11);
        assert_eq!(tween.value_at(50.0), 40);
        assert_eq!(tween.value_at(100.0), 39);

        let mut last = 40;
        for ms in (0..=5000).step_by(25) {
            let v = tween.value_at(ms as f64);
            assert!(v >= 10);
            assert!(v <= last);
            last = v;
        }
        assert_eq!(tween.value_at(10_000.0), 10);
    }

    #[test]
    fn healing_counts_up() {
        let tween = VitalityTween::new(5, 12, 2, 100.0);
        assert_eq!(tween.steps(), 4);
        assert_eq!(tween.value_at(100.0), 7);
        assert_eq!(tween.value_at(400.0), 12);
        assert!(tween.is_done(400.0));
    }

    #[test]
    fn no_change_is_instant() {
        let tween = VitalityTween::new(20, 20, 1, 100.0);
        assert_eq!(tween.duration_ms(), 0.0);
        assert_eq!(tween.value_at(0.0), 20);
    }
}
