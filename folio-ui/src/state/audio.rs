//! Audio Player
//!
//! `<audio>` clips behind the core's single playback slot.

use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

use folio::audio::{AudioError, AudioSlot, Clip, ClipId};

pub struct HtmlClip {
    element: HtmlAudioElement,
    url: String,
}

impl HtmlClip {
    pub fn new(url: &str) -> Result<Self, AudioError> {
        let element = HtmlAudioElement::new_with_src(url)
            .map_err(|e| AudioError::Load(format!("{}: {:?}", url, e)))?;
        Ok(Self {
            element,
            url: url.to_string(),
        })
    }
}

impl Clip for HtmlClip {
    fn start(&mut self) -> Result<(), AudioError> {
        let promise = self
            .element
            .play()
            .map_err(|e| AudioError::Playback(format!("{:?}", e)))?;

        // Autoplay refusals arrive as a rejected promise
        let url = self.url.clone();
        spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                web_sys::console::error_1(&format!("Error playing {}: {:?}", url, e).into());
            }
        });
        Ok(())
    }

    fn stop(&mut self) {
        let _ = self.element.pause();
        self.element.set_current_time(0.0);
    }
}

#[derive(Clone)]
pub struct AudioPlayer {
    slot: Rc<RefCell<AudioSlot<HtmlClip>>>,
    /// Url of the clip that owns the slot
    pub playing: RwSignal<Option<String>>,
}

impl AudioPlayer {
    pub fn new() -> Self {
        Self {
            slot: Rc::new(RefCell::new(AudioSlot::new())),
            playing: create_rw_signal(None),
        }
    }

    /// Stop whatever is playing and start `url`
    pub fn play(&self, url: &str) {
        let clip = match HtmlClip::new(url) {
            Ok(clip) => clip,
            Err(e) => {
                web_sys::console::error_1(&e.to_string().into());
                return;
            }
        };
        let element = clip.element.clone();

        let id = match self.slot.borrow_mut().play(clip) {
            Ok(id) => id,
            Err(e) => {
                web_sys::console::error_1(&e.to_string().into());
                self.playing.set(None);
                return;
            }
        };
        self.playing.set(Some(url.to_string()));
        self.release_on_end(&element, id);
    }

    pub fn stop(&self) {
        self.slot.borrow_mut().stop();
        self.playing.set(None);
    }

    fn release_on_end(&self, element: &HtmlAudioElement, id: ClipId) {
        let player = self.clone();
        let on_ended = Closure::wrap(Box::new(move || {
            if player.slot.borrow_mut().ended(id) {
                player.playing.set(None);
            }
        }) as Box<dyn FnMut()>);
        element.set_onended(Some(on_ended.as_ref().unchecked_ref()));
        on_ended.forget();
    }
}
