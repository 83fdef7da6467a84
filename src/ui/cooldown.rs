/// Time-window trigger suppression
///
/// Every UI control that dispatches an action carries a cooldown: a
/// re-activation within the window is dropped before it reaches the
/// update logic. This is the only backpressure in the app; there is no
/// queue and no cancellation of in-flight calls.

use std::time::{Duration, Instant};

/// Minimum time between activations of the same control
pub const TRIGGER_COOLDOWN: Duration = Duration::from_millis(500);

#[derive(Debug, Default)]
pub struct Cooldown {
    last_fired: Option<Instant>,
}

impl Cooldown {
    /// Returns true when the trigger may dispatch, recording the
    /// activation; false when it falls inside the suppression window.
    pub fn try_fire(&mut self) -> bool {
        self.try_fire_at(Instant::now())
    }

    fn try_fire_at(&mut self, now: Instant) -> bool {
        match self.last_fired {
            Some(last) if now.duration_since(last) < TRIGGER_COOLDOWN => false,
            _ => {
                self.last_fired = Some(now);
                true
            }
        }
    }
}

/// One cooldown per dispatching control
#[derive(Debug, Default)]
pub struct Cooldowns {
    pub pick_image: Cooldown,
    pub take_photo: Cooldown,
    pub pick_reference: Cooldown,
    pub style_select: Cooldown,
    pub custom_submit: Cooldown,
    pub edit_submit: Cooldown,
    pub find_artists: Cooldown,
    pub retry: Cooldown,
}
