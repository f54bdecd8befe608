/// Maps normalized progress in `[0, 1]` to eased progress.
pub trait Easing {
    fn ease(&self, t: f32) -> f32;
}

pub struct Linear;

impl Easing for Linear {
    fn ease(&self, t: f32) -> f32 {
        t
    }
}

/// Quadratic ease-out: fast start, gentle stop.
pub struct Power1Out;

impl Easing for Power1Out {
    fn ease(&self, t: f32) -> f32 {
        1.0 - (1.0 - t) * (1.0 - t)
    }
}

/// Serializable choice of easing curve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Ease {
    Linear,
    #[default]
    Power1Out,
}

impl Ease {
    pub fn easing(self) -> Box<dyn Easing> {
        match self {
            Ease::Linear => Box::new(Linear),
            Ease::Power1Out => Box::new(Power1Out),
        }
    }
}

pub struct Tween {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
    easing: Box<dyn Easing>,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: f32, easing: Box<dyn Easing>) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            easing,
        }
    }

    pub fn progress(&self) -> f32 {
        if self.duration == 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn value(&self) -> f32 {
        let t = self.progress();
        if t >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * self.easing.ease(t)
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Steps the tween by `dt` seconds and returns the new value.
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed += dt.max(0.0);
        self.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn easings_hit_endpoints() {
        let easings: [Box<dyn Easing>; 2] = [Box::new(Linear), Box::new(Power1Out)];
        for easing in easings {
            assert_relative_eq!(easing.ease(0.0), 0.0);
            assert_relative_eq!(easing.ease(1.0), 1.0);
        }
        assert!(Power1Out.ease(0.5) > Linear.ease(0.5));
    }

    #[test]
    fn ease_names_deserialize() {
        let ease: Ease = serde_json::from_str("\"linear\"").unwrap();
        assert_eq!(ease, Ease::Linear);
        let ease: Ease = serde_json::from_str("\"power1Out\"").unwrap();
        assert_eq!(ease, Ease::Power1Out);
        assert_relative_eq!(ease.easing().ease(0.5), 0.75);
    }

    #[test]
    fn linear_tween_interpolates() {
        let mut tween = Tween::new(2.0, 12.0, 1.0, Box::new(Linear));
        assert_relative_eq!(tween.advance(0.25), 4.5);
        assert_relative_eq!(tween.advance(0.25), 7.0);
        assert!(!tween.is_finished());
    }

    #[test]
    fn tween_lands_exactly_on_target() {
        let mut tween = Tween::new(0.3, 10.3, 1.0, Box::new(Power1Out));
        for _ in 0..7 {
            tween.advance(1.0 / 6.0);
        }
        assert!(tween.is_finished());
        assert_eq!(tween.value(), 10.3);
        assert_eq!(tween.advance(5.0), 10.3);
    }

    #[test]
    fn zero_duration_is_immediately_done() {
        let tween = Tween::new(1.0, 5.0, 0.0, Box::new(Linear));
        assert!(tween.is_finished());
        assert_eq!(tween.value(), 5.0);
    }
}
