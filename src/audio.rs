//! Audio playback
//!
//! The game talks to audio through [`AudioPlayer`]. Playback is
//! fire-and-forget: every failure comes back as an [`AudioError`] that callers
//! log and drop. On the web, clips are `HtmlAudioElement`s; elsewhere the game
//! runs silent with [`NullAudio`].

use std::cell::Cell;
use std::fmt;

use crate::settings::Settings;

/// Named audio clips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clip {
    /// Looping background track
    Music,
    /// Played on every flap
    Flap,
    /// One of the end-of-run cues
    EndOfRun(usize),
}

/// Why a clip could not be played
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// No audio backend
    Unavailable,
    /// The clip was never loaded
    MissingClip(Clip),
    /// The platform refused playback (autoplay policy, decode failure)
    Rejected(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "audio unavailable"),
            Self::MissingClip(clip) => write!(f, "clip {:?} not loaded", clip),
            Self::Rejected(reason) => write!(f, "playback rejected: {}", reason),
        }
    }
}

impl std::error::Error for AudioError {}

/// Audio capability used by the game state machine
pub trait AudioPlayer {
    /// Play a clip from the beginning
    fn play(&mut self, clip: Clip) -> Result<(), AudioError>;
    /// Continue a paused clip from where it stopped
    fn resume(&mut self, clip: Clip) -> Result<(), AudioError>;
    /// Pause, keeping the playback position
    fn pause(&mut self, clip: Clip);
    /// Pause and rewind
    fn stop(&mut self, clip: Clip);
    /// True while the clip is playing; false once it ended, failed, or was stopped
    fn is_active(&self, clip: Clip) -> bool;
    /// Number of end-of-run cues available
    fn end_cue_count(&self) -> usize;
}

/// Silent player. Every request fails with [`AudioError::Unavailable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioPlayer for NullAudio {
    fn play(&mut self, _clip: Clip) -> Result<(), AudioError> {
        Err(AudioError::Unavailable)
    }

    fn resume(&mut self, _clip: Clip) -> Result<(), AudioError> {
        Err(AudioError::Unavailable)
    }

    fn pause(&mut self, _clip: Clip) {}

    fn stop(&mut self, _clip: Clip) {}

    fn is_active(&self, _clip: Clip) -> bool {
        false
    }

    fn end_cue_count(&self) -> usize {
        0
    }
}

/// Per-clip mix levels before user volume is applied
pub fn base_volume(clip: Clip) -> f32 {
    match clip {
        Clip::Music => 0.45,
        Clip::Flap => 0.32,
        Clip::EndOfRun(_) => 0.6,
    }
}

/// Final volume for a clip under the given settings
pub fn mixed_volume(clip: Clip, settings: &Settings) -> f32 {
    if settings.muted {
        return 0.0;
    }
    let channel = match clip {
        Clip::Music => settings.music_volume,
        Clip::Flap | Clip::EndOfRun(_) => settings.sfx_volume,
    };
    (base_volume(clip) * settings.master_volume * channel).clamp(0.0, 1.0)
}

/// Play requests issued for one clip.
///
/// A play request settles asynchronously, and a pause or a newer request can
/// make an older one reject (`AbortError`). Only the rejection of the latest
/// request marks the clip as failed.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
#[derive(Debug, Default)]
struct PlayAttempts {
    current: Cell<u32>,
    failed: Cell<bool>,
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
impl PlayAttempts {
    /// Start a new request and return its ticket
    fn begin(&self) -> u32 {
        let ticket = self.current.get().wrapping_add(1);
        self.current.set(ticket);
        self.failed.set(false);
        ticket
    }

    /// Outstanding requests can no longer mark the clip as failed
    fn cancel(&self) {
        self.current.set(self.current.get().wrapping_add(1));
    }

    fn reject(&self, ticket: u32) {
        if self.current.get() == ticket {
            self.failed.set(true);
        }
    }

    fn failed(&self) -> bool {
        self.failed.get()
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{AudioSources, WebAudio};

#[cfg(target_arch = "wasm32")]
mod web {
    use std::rc::Rc;

    use wasm_bindgen_futures::JsFuture;
    use web_sys::HtmlAudioElement;

    use super::{AudioError, AudioPlayer, Clip, PlayAttempts, mixed_volume};
    use crate::settings::Settings;

    /// Where to load each clip from
    #[derive(Debug, Clone)]
    pub struct AudioSources {
        pub music: String,
        pub flap: String,
        pub end_cues: Vec<String>,
    }

    impl Default for AudioSources {
        fn default() -> Self {
            Self {
                music: "assets/bgmusic.mp3".to_string(),
                flap: "assets/jump.mp3".to_string(),
                end_cues: vec![
                    "assets/crashmusic1.mp3".to_string(),
                    "assets/crashmusic2.mp3".to_string(),
                ],
            }
        }
    }

    /// One loaded clip
    struct Track {
        element: HtmlAudioElement,
        /// Failure of the latest play() promise (blocked, missing file, bad codec)
        attempts: Rc<PlayAttempts>,
    }

    impl Track {
        fn load(src: &str, looping: bool, volume: f32) -> Option<Self> {
            let element = match HtmlAudioElement::new_with_src(src) {
                Ok(el) => el,
                Err(e) => {
                    log::warn!("Could not create audio element for {}: {:?}", src, e);
                    return None;
                }
            };
            element.set_loop(looping);
            element.set_preload("auto");
            element.set_volume(volume as f64);
            Some(Self {
                element,
                attempts: Rc::new(PlayAttempts::default()),
            })
        }

        fn start(&self) -> Result<(), AudioError> {
            self.element.set_current_time(0.0);
            self.resume()
        }

        fn resume(&self) -> Result<(), AudioError> {
            let ticket = self.attempts.begin();
            let promise = self.element.play().map_err(|e| {
                self.attempts.reject(ticket);
                AudioError::Rejected(format!("{:?}", e))
            })?;
            let attempts = self.attempts.clone();
            wasm_bindgen_futures::spawn_local(async move {
                if JsFuture::from(promise).await.is_err() {
                    attempts.reject(ticket);
                }
            });
            Ok(())
        }

        fn pause(&self) {
            self.attempts.cancel();
            let _ = self.element.pause();
        }

        fn stop(&self) {
            self.pause();
            self.element.set_current_time(0.0);
        }

        fn is_active(&self) -> bool {
            !self.attempts.failed() && !self.element.paused() && !self.element.ended()
        }
    }

    /// Browser audio over `HtmlAudioElement`
    pub struct WebAudio {
        music: Option<Track>,
        flap: Option<Track>,
        end_cues: Vec<Track>,
    }

    impl WebAudio {
        pub fn new(sources: &AudioSources, settings: &Settings) -> Self {
            let music = Track::load(&sources.music, true, mixed_volume(Clip::Music, settings));
            let flap = Track::load(&sources.flap, false, mixed_volume(Clip::Flap, settings));
            let end_cues: Vec<Track> = sources
                .end_cues
                .iter()
                .enumerate()
                .filter_map(|(i, src)| {
                    Track::load(src, false, mixed_volume(Clip::EndOfRun(i), settings))
                })
                .collect();
            log::info!("Audio ready ({} end-of-run cues)", end_cues.len());
            Self {
                music,
                flap,
                end_cues,
            }
        }

        fn track(&self, clip: Clip) -> Option<&Track> {
            match clip {
                Clip::Music => self.music.as_ref(),
                Clip::Flap => self.flap.as_ref(),
                Clip::EndOfRun(i) => self.end_cues.get(i),
            }
        }
    }

    impl AudioPlayer for WebAudio {
        fn play(&mut self, clip: Clip) -> Result<(), AudioError> {
            self.track(clip).ok_or(AudioError::MissingClip(clip))?.start()
        }

        fn resume(&mut self, clip: Clip) -> Result<(), AudioError> {
            self.track(clip).ok_or(AudioError::MissingClip(clip))?.resume()
        }

        fn pause(&mut self, clip: Clip) {
            if let Some(track) = self.track(clip) {
                track.pause();
            }
        }

        fn stop(&mut self, clip: Clip) {
            if let Some(track) = self.track(clip) {
                track.stop();
            }
        }

        fn is_active(&self, clip: Clip) -> bool {
            self.track(clip).is_some_and(Track::is_active)
        }

        fn end_cue_count(&self) -> usize {
            self.end_cues.len()
        }
    }
}
