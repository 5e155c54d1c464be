//! `rodio` audio backend.

use std::io::Cursor;
use std::sync::Arc;

use rodio::{Decoder, OutputStream, Sink, Source};
use tracing::warn;

use storybook_engine::{AssetKind, AssetStore, Audio};

/// Audio backend playing through the default output device.
///
/// Background music runs looped on a dedicated sink and is only restarted
/// when the clip name actually changes; sound effects play on detached
/// fire-and-forget sinks. Decode and device failures are warned about and
/// swallowed, never fatal.
pub struct RodioAudio {
    _stream: OutputStream,
    stream_handle: rodio::OutputStreamHandle,
    bgm_sink: Sink,
    current_music: Option<String>,
    assets: Arc<dyn AssetStore + Send + Sync>,
}

impl RodioAudio {
    pub fn new(assets: Arc<dyn AssetStore + Send + Sync>) -> Result<Self, String> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|err| format!("failed to initialize audio output stream: {err}"))?;
        let bgm_sink = Sink::try_new(&stream_handle)
            .map_err(|err| format!("failed to create background music sink: {err}"))?;
        Ok(Self {
            _stream: stream,
            stream_handle,
            bgm_sink,
            current_music: None,
            assets,
        })
    }

    fn decode(&self, name: &str, kind: AssetKind) -> Option<Decoder<Cursor<Vec<u8>>>> {
        let data = match self.assets.load_bytes(name, kind) {
            Ok(data) => data,
            Err(err) => {
                warn!("audio asset error: {err}");
                return None;
            }
        };
        match Decoder::new(Cursor::new(data)) {
            Ok(decoder) => Some(decoder),
            Err(err) => {
                warn!("failed to decode audio '{name}': {err}");
                None
            }
        }
    }
}

/// Whether a music request needs a fresh playback, or the running clip
/// already covers it. A request for the clip that is still audibly playing
/// is a no-op.
fn needs_restart(current: Option<&str>, requested: &str, sink_empty: bool) -> bool {
    current != Some(requested) || sink_empty
}

impl Audio for RodioAudio {
    fn play_music(&mut self, name: Option<&str>) {
        let Some(name) = name else {
            self.stop_music();
            return;
        };
        if !needs_restart(self.current_music.as_deref(), name, self.bgm_sink.empty()) {
            return;
        }
        self.bgm_sink.stop();
        self.current_music = None;

        let Some(decoder) = self.decode(name, AssetKind::Music) else {
            return;
        };
        let source = decoder.convert_samples::<f32>().repeat_infinite();
        self.bgm_sink.append(source);
        self.bgm_sink.play();
        self.current_music = Some(name.to_string());
    }

    fn play_sfx(&mut self, name: &str) {
        let Some(decoder) = self.decode(name, AssetKind::Sfx) else {
            return;
        };
        let sink = match Sink::try_new(&self.stream_handle) {
            Ok(sink) => sink,
            Err(err) => {
                warn!("failed to create sfx sink: {err}");
                return;
            }
        };
        sink.append(decoder.convert_samples::<f32>());
        sink.detach();
    }

    fn stop_music(&mut self) {
        self.bgm_sink.stop();
        self.current_music = None;
    }
}
