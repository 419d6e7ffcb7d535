use std::sync::{Mutex, PoisonError};

use futures::future;
use tokio::sync::oneshot;
use tracing::debug;

/// Never completes if the element errors out instead of loading.
#[derive(Debug)]
pub struct ScriptLoadSignal {
    load: Option<oneshot::Receiver<()>>,
}

impl ScriptLoadSignal {
    pub fn ready() -> Self {
        Self { load: None }
    }

    pub fn on_load(load: oneshot::Receiver<()>) -> Self {
        Self { load: Some(load) }
    }

    pub async fn loaded(self) {
        if let Some(load) = self.load {
            if load.await.is_err() {
                future::pending::<()>().await;
            }
        }
    }
}

pub trait Document: Send + Sync {
    /// Number of `script[src="..."]` elements with exactly this src.
    fn script_count(&self, src: &str) -> usize;

    fn append_script(&self, src: &str) -> ScriptLoadSignal;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptState {
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug)]
struct ScriptElement {
    src: String,
    state: ScriptState,
    on_load: Option<oneshot::Sender<()>>,
}

#[derive(Debug, Default)]
pub struct InMemoryDocument {
    scripts: Mutex<Vec<ScriptElement>>,
}

impl InMemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// A page that already carries a loaded script tag.
    pub fn with_script(src: &str) -> Self {
        let document = Self::new();
        document.lock().push(ScriptElement {
            src: src.to_string(),
            state: ScriptState::Loaded,
            on_load: None,
        });
        document
    }

    pub fn scripts(&self) -> Vec<(String, ScriptState)> {
        self.lock()
            .iter()
            .map(|s| (s.src.clone(), s.state))
            .collect()
    }

    pub fn fire_load(&self, src: &str) -> usize {
        self.settle(src, ScriptState::Loaded)
    }

    pub fn fire_error(&self, src: &str) -> usize {
        self.settle(src, ScriptState::Failed)
    }

    fn settle(&self, src: &str, state: ScriptState) -> usize {
        let mut fired = 0;
        for script in self
            .lock()
            .iter_mut()
            .filter(|s| s.src == src && s.state == ScriptState::Loading)
        {
            script.state = state;
            if let Some(on_load) = script.on_load.take() {
                if state == ScriptState::Loaded {
                    let _ = on_load.send(());
                }
            }
            fired += 1;
        }
        fired
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ScriptElement>> {
        self.scripts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Document for InMemoryDocument {
    fn script_count(&self, src: &str) -> usize {
        self.lock().iter().filter(|s| s.src == src).count()
    }

    fn append_script(&self, src: &str) -> ScriptLoadSignal {
        debug!("Appending script {}", src);
        let (on_load, load) = oneshot::channel();
        self.lock().push(ScriptElement {
            src: src.to_string(),
            state: ScriptState::Loading,
            on_load: Some(on_load),
        });
        ScriptLoadSignal::on_load(load)
    }
}
