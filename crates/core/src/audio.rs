//! Audio collaborator contract.

/// Playback surface the navigator drives.
pub trait Audio {
    /// Starts looped background music, or stops playback on `None`.
    /// Re-sending the clip that is already playing must not restart it.
    fn play_music(&mut self, name: Option<&str>);

    /// Fire-and-forget sound effect.
    fn play_sfx(&mut self, name: &str);

    fn stop_music(&mut self);
}

impl<T: Audio + ?Sized> Audio for Box<T> {
    fn play_music(&mut self, name: Option<&str>) {
        (**self).play_music(name);
    }

    fn play_sfx(&mut self, name: &str) {
        (**self).play_sfx(name);
    }

    fn stop_music(&mut self) {
        (**self).stop_music();
    }
}

/// No-op backend for headless hosts and tests.
#[derive(Debug, Default)]
pub struct SilentAudio;

impl Audio for SilentAudio {
    fn play_music(&mut self, _name: Option<&str>) {}

    fn play_sfx(&mut self, _name: &str) {}

    fn stop_music(&mut self) {}
}
