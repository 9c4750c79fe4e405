//! Chat Store

use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;

use folio::chat::{ChatBackend, ChatMessage, ChatSession};
use folio::config::Config;

use crate::api::GlooChatBackend;

#[derive(Clone)]
pub struct ChatStore {
    session: Rc<RefCell<ChatSession>>,
    backend: Rc<GlooChatBackend>,
    pub messages: RwSignal<Vec<ChatMessage>>,
    pub typing: RwSignal<bool>,
    pub open: RwSignal<bool>,
}

impl ChatStore {
    pub fn new(config: &Config) -> Self {
        let session = ChatSession::new(&config.chat);
        Self {
            messages: create_rw_signal(session.messages().to_vec()),
            typing: create_rw_signal(false),
            open: create_rw_signal(false),
            session: Rc::new(RefCell::new(session)),
            backend: Rc::new(GlooChatBackend::new(&config.site.base_url)),
        }
    }

    fn sync(&self) {
        let (messages, typing) = {
            let session = self.session.borrow();
            (session.messages().to_vec(), session.is_typing())
        };
        self.messages.set(messages);
        self.typing.set(typing);
    }

    /// Returns false when the input was blank
    pub fn send(&self, input: &str) -> bool {
        let request = self.session.borrow_mut().begin_send(input);
        let Some(request) = request else {
            return false;
        };
        self.sync();

        let store = self.clone();
        spawn_local(async move {
            let result = store.backend.send(&request).await;
            store.session.borrow_mut().finish_send(result);
            store.sync();
        });
        true
    }
}
