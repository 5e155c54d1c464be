//! Timed screen transition machine.
//!
//! Fade runs `Idle -> FadingOut -> FadingIn -> Idle`, ramping the overlay
//! alpha between 0 and 1 at a rate of one full ramp per configured length.
//! Slide runs `Idle -> Sliding -> Idle`, translating the incoming image at
//! constant speed until it is aligned. The navigator ticks the machine from
//! its event pump; completion fires exactly once, when the machine returns
//! to idle, and is what triggers the deferred page load.

use std::time::Duration;

/// Direction the incoming image slides from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SlideDirection {
    #[default]
    Left,
    Right,
    Top,
    Bottom,
}

/// Current phase of the machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransitionPhase {
    #[default]
    Idle,
    FadingOut,
    FadingIn,
    Sliding,
}

/// A running (or idle) screen transition.
#[derive(Clone, Debug, Default)]
pub struct Transition {
    phase: TransitionPhase,
    /// Overlay opacity in `[0, 1]`; meaningful while fading.
    alpha: f32,
    /// Remaining travel of the incoming image, `1.0` = fully offset.
    offset: f32,
    direction: SlideDirection,
    leg: Duration,
    current_image: Option<String>,
    next_image: Option<String>,
}

impl Transition {
    /// An idle machine; ticking it does nothing.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Starts a fade; each leg (out, then in) runs `length_ms`.
    pub fn begin_fade(length_ms: u32) -> Self {
        Self {
            phase: TransitionPhase::FadingOut,
            alpha: 0.0,
            leg: Duration::from_millis(u64::from(length_ms)),
            ..Self::default()
        }
    }

    /// Starts a slide of `next_image` over `current_image`.
    pub fn begin_slide(
        length_ms: u32,
        direction: SlideDirection,
        current_image: Option<String>,
        next_image: Option<String>,
    ) -> Self {
        Self {
            phase: TransitionPhase::Sliding,
            offset: 1.0,
            direction,
            leg: Duration::from_millis(u64::from(length_ms)),
            current_image,
            next_image,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == TransitionPhase::Idle
    }

    pub fn is_running(&self) -> bool {
        !self.is_idle()
    }

    /// Overlay opacity for renderers, in `[0, 1]`.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Remaining travel of the incoming image, in `[0, 1]`.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn direction(&self) -> SlideDirection {
        self.direction
    }

    /// Images involved in a slide: `(outgoing, incoming)`.
    pub fn slide_images(&self) -> (Option<&str>, Option<&str>) {
        (self.current_image.as_deref(), self.next_image.as_deref())
    }

    /// Advances the machine by `dt`.
    ///
    /// Returns `true` exactly once per run, on the tick that brings the
    /// machine back to idle. A zero-length transition completes on its
    /// first tick.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let step = if self.leg.is_zero() {
            1.0
        } else {
            dt.as_secs_f32() / self.leg.as_secs_f32()
        };
        match self.phase {
            TransitionPhase::Idle => false,
            TransitionPhase::FadingOut => {
                self.alpha += step;
                if self.alpha >= 1.0 {
                    self.alpha = 1.0;
                    self.phase = TransitionPhase::FadingIn;
                }
                false
            }
            TransitionPhase::FadingIn => {
                self.alpha -= step;
                if self.alpha <= 0.0 {
                    self.alpha = 0.0;
                    self.phase = TransitionPhase::Idle;
                    true
                } else {
                    false
                }
            }
            TransitionPhase::Sliding => {
                self.offset -= step;
                if self.offset <= 0.0 {
                    self.offset = 0.0;
                    self.phase = TransitionPhase::Idle;
                    true
                } else {
                    false
                }
            }
        }
    }
}
