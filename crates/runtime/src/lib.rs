mod assets;
mod audio;

pub use assets::DirAssetStore;
pub use audio::RodioAudio;
