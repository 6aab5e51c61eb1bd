//! Side effects the core asks the shell to perform.

mod browser;
mod http;
mod storage;
mod timer;
mod worker;

pub use self::browser::{Browser, BrowserOperation};
pub use self::http::{Endpoint, FormBody, HttpError};
pub use self::storage::{StorageError, StorageKey, StoredText, TextStore};
pub use self::timer::{Timer, TimerId, TimerOperation, TimerOutput};
pub use self::worker::{Worker, WorkerOperation, WorkerOutput};

// Crux's built-in Render capability covers view updates as is.
pub use crux_core::render::Render;
pub use crux_http::Http;
pub use crux_kv::KeyValue;

// Both names are referenced by the code `derive(Effect)` generates.
#[allow(unused_imports)]
use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub browser: Browser<Event>,
    pub timer: Timer<Event>,
    pub key_value: KeyValue<Event>,
    pub http: Http<Event>,
    pub worker: Worker<Event>,
}
