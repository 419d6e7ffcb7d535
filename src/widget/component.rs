use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use tokio::{runtime::Handle, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use super::{
    binder::{AutocompleteBinder, Binding},
    render::{render, RenderedInput},
};
use crate::{
    dom::{
        document::Document,
        input::{InputElement, InputRef},
    },
    services::{
        places::autocomplete::PlacesLibrary,
        script_loader::{script_url, ScriptLoader, GOOGLE_MAPS_HOST},
    },
    types::{
        autocomplete_options::EffectiveConfig,
        widget_props::{PlaceSelectedHandler, WidgetProps},
    },
};

/// What happens to live autocomplete subscriptions when the widget re-binds
/// or unmounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TeardownPolicy {
    #[default]
    Retain,
    Unsubscribe,
}

#[derive(Debug, Clone)]
pub struct WidgetSettings {
    pub script_host: String,
    pub load_timeout: Option<Duration>,
    pub teardown: TeardownPolicy,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            script_host: GOOGLE_MAPS_HOST.to_string(),
            load_timeout: None,
            teardown: TeardownPolicy::Retain,
        }
    }
}

impl WidgetSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads `GOOGLE_MAPS_HOST`, `SCRIPT_LOAD_TIMEOUT_MS` and
    /// `WIDGET_TEARDOWN` (`retain` or `unsubscribe`).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let load_timeout = lookup("SCRIPT_LOAD_TIMEOUT_MS").and_then(|ms| match ms.parse() {
            Ok(ms) => Some(Duration::from_millis(ms)),
            Err(e) => {
                warn!("Ignoring SCRIPT_LOAD_TIMEOUT_MS={}: {}", ms, e);
                None
            }
        });

        let teardown = match lookup("WIDGET_TEARDOWN").as_deref() {
            Some("unsubscribe") => TeardownPolicy::Unsubscribe,
            Some("retain") | None => TeardownPolicy::Retain,
            Some(other) => {
                warn!("Unknown WIDGET_TEARDOWN={}, keeping subscriptions", other);
                TeardownPolicy::Retain
            }
        };

        Self {
            script_host: lookup("GOOGLE_MAPS_HOST").unwrap_or(defaults.script_host),
            load_timeout,
            teardown,
        }
    }
}

#[derive(Debug)]
pub enum EffectHandle {
    Skipped,
    Settled(bool),
    Pending(JoinHandle<bool>),
}

impl EffectHandle {
    pub fn is_pending(&self) -> bool {
        matches!(self, EffectHandle::Pending(_))
    }

    /// Whether the effect produced a binding. Never completes if the script
    /// never loads and no load timeout is set.
    pub async fn settled(self) -> bool {
        match self {
            EffectHandle::Skipped => false,
            EffectHandle::Settled(bound) => bound,
            EffectHandle::Pending(task) => task.await.unwrap_or_else(|e| {
                error!("Autocomplete binding task failed: {}", e);
                false
            }),
        }
    }
}

#[derive(Default)]
struct WidgetState {
    props: Option<Arc<WidgetProps>>,
    bindings: Vec<Binding>,
    effect: Option<CancellationToken>,
}

/// Committing props with an `apiKey` must happen inside a Tokio runtime.
pub struct PlacesWidget {
    input_ref: InputRef,
    binder: AutocompleteBinder,
    loader: ScriptLoader,
    settings: WidgetSettings,
    state: Arc<Mutex<WidgetState>>,
    cancel: CancellationToken,
}

impl PlacesWidget {
    pub fn new(
        document: Arc<dyn Document>,
        places: Arc<dyn PlacesLibrary>,
        settings: WidgetSettings,
    ) -> Self {
        Self {
            input_ref: InputRef::new(),
            binder: AutocompleteBinder::new(places),
            loader: ScriptLoader::new(document).with_load_timeout(settings.load_timeout),
            settings,
            state: Arc::new(Mutex::new(WidgetState::default())),
            cancel: CancellationToken::new(),
        }
    }

    pub fn input_ref(&self) -> &InputRef {
        &self.input_ref
    }

    pub fn settings(&self) -> &WidgetSettings {
        &self.settings
    }

    pub fn render(&self, props: &WidgetProps) -> RenderedInput {
        render(props, &self.input_ref)
    }

    pub fn mount(&mut self, props: Arc<WidgetProps>) -> EffectHandle {
        let rendered = self.render(&props);
        self.input_ref
            .attach(Arc::new(InputElement::new(rendered.attributes)));
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.lock_state().props = None;

        self.commit(props)
    }

    /// Re-render in place. The effect re-runs only for a new props object.
    pub fn update(&mut self, props: Arc<WidgetProps>) -> EffectHandle {
        let rendered = self.render(&props);
        match self.input_ref.current() {
            Some(element) => element.set_attributes(rendered.attributes),
            None => return self.mount(props),
        }

        self.commit(props)
    }

    pub fn unmount(&mut self) {
        self.input_ref.detach();
        self.cancel.cancel();

        if self.settings.teardown == TeardownPolicy::Unsubscribe {
            release_all(&mut self.lock_state().bindings);
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.input_ref.is_live()
    }

    pub fn binding_count(&self) -> usize {
        self.lock_state().bindings.len()
    }

    pub fn with_current_binding<R>(&self, f: impl FnOnce(&Binding) -> R) -> Option<R> {
        self.lock_state().bindings.last().map(f)
    }

    fn commit(&mut self, props: Arc<WidgetProps>) -> EffectHandle {
        let effect = self.cancel.child_token();
        {
            let mut state = self.lock_state();
            if let Some(previous) = &state.props {
                if Arc::ptr_eq(previous, &props) {
                    return EffectHandle::Skipped;
                }
            }
            state.props = Some(props.clone());

            let previous = state.effect.replace(effect.clone());
            if self.settings.teardown == TeardownPolicy::Unsubscribe {
                if let Some(previous) = previous {
                    previous.cancel();
                }
                release_all(&mut state.bindings);
            }
        }

        self.run_effect(&props, effect)
    }

    fn run_effect(&self, props: &WidgetProps, effect: CancellationToken) -> EffectHandle {
        let config = match EffectiveConfig::resolve(props) {
            Ok(config) => config,
            Err(e) => {
                error!("Skipping autocomplete binding: {}", e);
                return EffectHandle::Settled(false);
            }
        };
        let on_place_selected = props.place_selected_handler();

        let Some(api_key) = props.api_key() else {
            return EffectHandle::Settled(bind_into(
                &self.binder,
                &self.input_ref,
                &config,
                on_place_selected,
                &self.state,
                &effect,
            ));
        };

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!("Cannot load the places script outside of a runtime: {}", e);
                return EffectHandle::Settled(false);
            }
        };

        let load = self
            .loader
            .ensure_loaded(&script_url(&self.settings.script_host, api_key));
        let binder = self.binder.clone();
        let input_ref = self.input_ref.clone();
        let state = self.state.clone();
        let teardown = self.settings.teardown;

        EffectHandle::Pending(runtime.spawn(async move {
            let loaded = match teardown {
                TeardownPolicy::Retain => load.wait().await,
                TeardownPolicy::Unsubscribe => tokio::select! {
                    loaded = load.wait() => loaded,
                    _ = effect.cancelled() => {
                        debug!("Effect superseded while loading the places script");
                        return false;
                    }
                },
            };

            if let Err(e) = loaded {
                error!("Skipping autocomplete binding: {}", e);
                return false;
            }

            if effect.is_cancelled() || !input_ref.is_live() {
                warn!("Widget unmounted before the places script loaded, not binding");
                return false;
            }

            bind_into(&binder, &input_ref, &config, on_place_selected, &state, &effect)
        }))
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, WidgetState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn bind_into(
    binder: &AutocompleteBinder,
    input_ref: &InputRef,
    config: &EffectiveConfig,
    on_place_selected: Option<PlaceSelectedHandler>,
    state: &Mutex<WidgetState>,
    effect: &CancellationToken,
) -> bool {
    let Some(binding) = binder.bind(input_ref, config, on_place_selected) else {
        return false;
    };

    // Commit cancels under the same lock, so a superseded effect cannot push.
    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
    if effect.is_cancelled() {
        debug!("Effect superseded while binding, releasing");
        binding.release();
        return false;
    }
    state.bindings.push(binding);
    true
}

fn release_all(bindings: &mut Vec<Binding>) {
    for binding in bindings.drain(..) {
        binding.release();
    }
}
