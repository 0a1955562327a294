//! Background audio: autoplay on load completion, gesture fallback when the
//! platform blocks autoplay, and the mute/play toggle.
//!
//! Starting playback is a promise in the browser, so every play request is
//! issued as a [`TaskToken`] that the host settles through
//! [`BackgroundAudio::resolve`].

use crate::task::{TaskKind, TaskSlot, TaskToken};

/// The consumed audio element interface. Starting playback is not part of
/// it: the host performs `play()` when handed a token.
pub trait AudioOutput {
    /// Whether the element is currently paused.
    fn is_paused(&self) -> bool;

    /// Pause playback.
    fn pause(&mut self);
}

/// Why a play request was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayReason {
    /// Attempted automatically when loading completed.
    Autoplay,
    /// Retried on the first pointer interaction after a blocked autoplay.
    Gesture,
    /// Requested from the audio button.
    Toggle,
}

/// Outcome of pressing the audio button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioToggle {
    /// Playback was requested; the host must start it.
    Play(TaskToken),
    /// Playback was paused synchronously.
    Paused,
}

/// Playback state machine for the scene's background track.
#[derive(Debug)]
pub struct BackgroundAudio {
    playback: TaskSlot,
    pending_reason: Option<PlayReason>,
    fallback_armed: bool,
    unlocked: bool,
}

impl Default for BackgroundAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl BackgroundAudio {
    /// Locked audio: nothing plays until loading completes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            playback: TaskSlot::new(TaskKind::AudioPlayback),
            pending_reason: None,
            fallback_armed: false,
            unlocked: false,
        }
    }

    /// Whether the audio button is live (loading has completed).
    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Whether a gesture retry is armed.
    #[must_use]
    pub fn fallback_armed(&self) -> bool {
        self.fallback_armed
    }

    /// Unlock the button and attempt autoplay.
    pub fn autoplay(&mut self) -> TaskToken {
        self.unlocked = true;
        self.request(PlayReason::Autoplay)
    }

    /// First user gesture in the document outside the panel. Consumes the
    /// armed fallback, if any.
    pub fn on_gesture(&mut self) -> Option<TaskToken> {
        if !self.fallback_armed {
            return None;
        }
        self.fallback_armed = false;
        Some(self.request(PlayReason::Gesture))
    }

    /// The audio button. Does nothing until loading has completed.
    ///
    /// An unsettled autoplay or gesture retry counts as not yet playing, so
    /// the press starts playback instead of pausing it. The press also
    /// disarms the gesture fallback.
    pub fn toggle<A: AudioOutput + ?Sized>(
        &mut self,
        output: &mut A,
    ) -> Option<AudioToggle> {
        if !self.unlocked {
            return None;
        }
        let starting = matches!(
            self.pending_reason,
            Some(PlayReason::Autoplay | PlayReason::Gesture)
        );
        if starting || output.is_paused() {
            self.fallback_armed = false;
            Some(AudioToggle::Play(self.request(PlayReason::Toggle)))
        } else {
            self.playback.cancel();
            self.pending_reason = None;
            output.pause();
            Some(AudioToggle::Paused)
        }
    }

    /// Settle a play request. Returns `false` for stale tokens.
    ///
    /// A rejected autoplay arms the one-shot gesture fallback.
    pub fn resolve(
        &mut self,
        token: TaskToken,
        result: Result<(), String>,
    ) -> bool {
        if !self.playback.resolve(token) {
            return false;
        }
        let reason = self.pending_reason.take();
        if let Err(e) = result {
            if reason == Some(PlayReason::Autoplay) {
                log::warn!(
                    "Auto-play failed, will try on user interaction: {e}"
                );
                self.fallback_armed = true;
            } else {
                log::warn!("Audio playback failed: {e}");
            }
        }
        true
    }

    /// Drop any outstanding request and disarm the fallback.
    pub fn reset(&mut self) {
        self.playback.cancel();
        self.pending_reason = None;
        self.fallback_armed = false;
    }

    fn request(&mut self, reason: PlayReason) -> TaskToken {
        self.pending_reason = Some(reason);
        self.playback.issue()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Element {
        paused: bool,
    }

    impl AudioOutput for Element {
        fn is_paused(&self) -> bool {
            self.paused
        }

        fn pause(&mut self) {
            self.paused = true;
        }
    }

    #[test]
    fn toggle_is_inert_before_loading_completes() {
        let mut audio = BackgroundAudio::new();
        let mut el = Element { paused: true };
        assert!(audio.toggle(&mut el).is_none());
    }

    #[test]
    fn blocked_autoplay_arms_single_gesture_retry() {
        let mut audio = BackgroundAudio::new();
        let token = audio.autoplay();
        assert!(audio.resolve(token, Err("NotAllowedError".into())));
        assert!(audio.fallback_armed());

        let retry = audio.on_gesture().unwrap();
        assert!(!audio.fallback_armed());
        assert!(audio.on_gesture().is_none());
        assert!(audio.resolve(retry, Ok(())));
    }

    #[test]
    fn successful_autoplay_leaves_fallback_disarmed() {
        let mut audio = BackgroundAudio::new();
        let token = audio.autoplay();
        assert!(audio.resolve(token, Ok(())));
        assert!(!audio.fallback_armed());
        assert!(audio.on_gesture().is_none());
    }

    #[test]
    fn failed_gesture_retry_does_not_rearm() {
        let mut audio = BackgroundAudio::new();
        let token = audio.autoplay();
        let _ = audio.resolve(token, Err("blocked".into()));
        let retry = audio.on_gesture().unwrap();
        let _ = audio.resolve(retry, Err("still blocked".into()));
        assert!(!audio.fallback_armed());
    }

    #[test]
    fn toggle_pauses_playing_element() {
        let mut audio = BackgroundAudio::new();
        let token = audio.autoplay();
        assert!(audio.resolve(token, Ok(())));
        let mut el = Element { paused: false };
        assert_eq!(audio.toggle(&mut el), Some(AudioToggle::Paused));
        assert!(el.paused);
        assert!(matches!(audio.toggle(&mut el), Some(AudioToggle::Play(_))));
    }

    #[test]
    fn press_during_gesture_retry_keeps_playing() {
        let mut audio = BackgroundAudio::new();
        let token = audio.autoplay();
        let _ = audio.resolve(token, Err("blocked".into()));
        let retry = audio.on_gesture().unwrap();

        let mut el = Element { paused: false };
        let Some(AudioToggle::Play(press)) = audio.toggle(&mut el) else {
            panic!("expected the press to start playback");
        };
        assert!(!el.paused);
        assert!(!audio.resolve(retry, Ok(())));
        assert!(audio.resolve(press, Ok(())));
    }

    #[test]
    fn press_disarms_gesture_fallback() {
        let mut audio = BackgroundAudio::new();
        let token = audio.autoplay();
        let _ = audio.resolve(token, Err("blocked".into()));
        let mut el = Element { paused: true };
        assert!(matches!(audio.toggle(&mut el), Some(AudioToggle::Play(_))));
        assert!(!audio.fallback_armed());
        assert!(audio.on_gesture().is_none());
    }

    #[test]
    fn pause_makes_pending_play_stale() {
        let mut audio = BackgroundAudio::new();
        let autoplay = audio.autoplay();
        assert!(audio.resolve(autoplay, Ok(())));

        let mut el = Element { paused: true };
        let Some(AudioToggle::Play(press)) = audio.toggle(&mut el) else {
            panic!("expected a play request");
        };
        el.paused = false;
        assert_eq!(audio.toggle(&mut el), Some(AudioToggle::Paused));
        assert!(!audio.resolve(press, Err("aborted".into())));
        assert!(!audio.fallback_armed());
    }
}
