//! Background music and the win jingle. Browsers refuse to play audio before the
//! first user interaction, so starting the music is retried on every input until
//! it succeeds.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::HtmlAudioElement;

use crate::config::{MUSIC_SRC, WIN_SOUND_SRC};
use crate::util::{cdebug, cerror, cinfo, cwarn};

pub struct AudioPlayer {
    music: Option<HtmlAudioElement>,
    started: Rc<Cell<bool>>,
    muted: Rc<Cell<bool>>,
}

impl AudioPlayer {
    pub fn new(volume: f64, muted: bool) -> Self {
        let music = match HtmlAudioElement::new_with_src(MUSIC_SRC) {
            Ok(el) => {
                el.set_loop(true);
                el.set_volume(volume);
                el.set_muted(muted);
                cinfo("background music ready");
                Some(el)
            }
            Err(e) => {
                cerror(&format!("audio element creation failed: {e:?}"));
                None
            }
        };
        Self { music, started: Rc::new(Cell::new(false)), muted: Rc::new(Cell::new(muted)) }
    }

    pub fn is_muted(&self) -> bool {
        self.muted.get()
    }

    /// Flips the mute state and returns the new value.
    pub fn toggle_mute(&self) -> bool {
        let muted = !self.muted.get();
        self.muted.set(muted);
        if let Some(music) = &self.music {
            music.set_muted(muted);
        }
        cinfo(&format!("muted: {muted}"));
        muted
    }

    pub fn try_start_music(&self) {
        let Some(music) = self.music.clone() else {
            return;
        };
        if self.started.get() && !music.paused() {
            music.set_muted(self.muted.get());
            return;
        }
        let promise = match music.play() {
            Ok(p) => p,
            Err(e) => {
                cwarn(&format!("music play failed: {e:?}"));
                return;
            }
        };
        let started = self.started.clone();
        let muted = self.muted.clone();
        spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(_) => {
                    cdebug("background music playing");
                    started.set(true);
                    music.set_muted(muted.get());
                }
                Err(e) => cwarn(&format!("music play blocked: {e:?}")),
            }
        });
    }

    pub fn pause_music(&self) {
        if let Some(music) = &self.music
            && !music.paused()
            && let Err(e) = music.pause()
        {
            cwarn(&format!("music pause failed: {e:?}"));
        }
    }

    pub fn play_win_sound(&self) {
        let sound = match HtmlAudioElement::new_with_src(WIN_SOUND_SRC) {
            Ok(s) => s,
            Err(e) => {
                cerror(&format!("win sound creation failed: {e:?}"));
                return;
            }
        };
        match sound.play() {
            Ok(promise) => spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    cerror(&format!("win sound play error: {e:?}"));
                }
            }),
            Err(e) => cerror(&format!("win sound play error: {e:?}")),
        }
    }
}
