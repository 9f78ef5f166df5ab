use std::time::{Duration, Instant};

/// Smoothstep-eased scroll animation between two offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTween {
    from: f32,
    to: f32,
    started: Instant,
    duration: Duration,
}

impl ScrollTween {
    pub fn new(from: f32, to: f32, started: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            started,
            duration: duration.max(Duration::from_millis(1)),
        }
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn is_done(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }

    pub fn sample(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.started);
        let t = (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * smoothstep(t)
    }

    /// Restart from the current sample toward a new target.
    pub fn retarget(&mut self, now: Instant, to: f32, duration: Duration) {
        let current = self.sample(now);
        *self = Self::new(current, to, now, duration);
    }
}

fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eases_between_endpoints() {
        let start = Instant::now();
        let tween = ScrollTween::new(0.0, 1000.0, start, Duration::from_millis(200));
        assert_eq!(tween.sample(start), 0.0);
        assert_eq!(tween.sample(start + Duration::from_millis(100)), 500.0);
        assert_eq!(tween.sample(start + Duration::from_millis(400)), 1000.0);
        assert!(!tween.is_done(start + Duration::from_millis(199)));
        assert!(tween.is_done(start + Duration::from_millis(200)));
    }

    #[test]
    fn retarget_continues_from_current_offset() {
        let start = Instant::now();
        let mut tween = ScrollTween::new(0.0, 1000.0, start, Duration::from_millis(200));
        let midway = start + Duration::from_millis(100);
        tween.retarget(midway, 200.0, Duration::from_millis(200));
        assert_eq!(tween.sample(midway), 500.0);
        assert_eq!(tween.target(), 200.0);
        assert!(!tween.is_done(midway + Duration::from_millis(100)));
    }
}
