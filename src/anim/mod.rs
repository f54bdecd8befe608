pub mod clock;
pub mod tween;

pub use clock::{Clock, FrameTiming};
pub use tween::{Ease, Tween};
