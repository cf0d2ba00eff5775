//! Simulation clients and the inbox that bridges them into the ECS world.
//!
//! A client never touches the world directly. `dispatch` starts the request
//! and the client deposits the outcome into a [`ResponseInbox`] once it is
//! known; the controller polls the inbox every frame. The same shape works
//! for a native task pool thread, a browser `fetch` future and an in-memory
//! script.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use bevy::prelude::*;

use crate::config::ScenarioConfig;
use crate::error::ScenarioError;
use crate::response::{decode_reply, ScenarioData, SimulationRequest};

#[cfg(not(target_arch = "wasm32"))]
mod http_native;
#[cfg(target_arch = "wasm32")]
mod http_web;

#[cfg(target_arch = "wasm32")]
pub use http_web::query_endpoint;

/// Outcome of one simulation request.
pub type ScenarioOutcome = Result<ScenarioData, ScenarioError>;

/// Shared slot used to hand a finished request back to the ECS world.
#[derive(Resource, Default, Clone)]
pub struct ResponseInbox(Arc<Mutex<Option<ScenarioOutcome>>>);

impl ResponseInbox {
    /// Store an outcome, replacing anything not yet collected.
    pub fn deposit(&self, outcome: ScenarioOutcome) {
        match self.0.lock() {
            Ok(mut guard) => *guard = Some(outcome),
            Err(_) => error!("Response inbox lock poisoned; dropping simulation outcome"),
        }
    }

    /// Take the stored outcome, if any.
    pub fn take(&self) -> Option<ScenarioOutcome> {
        self.0.lock().ok().and_then(|mut guard| guard.take())
    }
}

/// Something that can run the external simulation.
pub trait SimulationClient: Send + Sync + 'static {
    /// Start a request. The outcome must eventually be deposited into `inbox`
    /// exactly once.
    fn dispatch(&self, request: SimulationRequest, inbox: ResponseInbox);

    /// Short description for logs.
    fn describe(&self) -> String;
}

/// The client used by the running app.
#[derive(Resource, Clone)]
pub struct ActiveClient(pub Arc<dyn SimulationClient>);

/// Pick the client described by the runtime configuration.
pub fn client_from_config(config: &ScenarioConfig) -> Arc<dyn SimulationClient> {
    match &config.replay_path {
        Some(path) => Arc::new(ReplayClient::new(path.clone())),
        None => Arc::new(HttpClient::new(config.endpoint.clone())),
    }
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

/// Posts the request as JSON to the simulation endpoint.
#[derive(Debug, Clone)]
pub struct HttpClient {
    endpoint: String,
}

impl HttpClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SimulationClient for HttpClient {
    #[cfg(not(target_arch = "wasm32"))]
    fn dispatch(&self, request: SimulationRequest, inbox: ResponseInbox) {
        let endpoint = self.endpoint.clone();
        bevy::tasks::IoTaskPool::get()
            .spawn(async move {
                inbox.deposit(http_native::post_request(&endpoint, &request));
            })
            .detach();
    }

    #[cfg(target_arch = "wasm32")]
    fn dispatch(&self, request: SimulationRequest, inbox: ResponseInbox) {
        let endpoint = self.endpoint.clone();
        wasm_bindgen_futures::spawn_local(async move {
            inbox.deposit(http_web::post_request(&endpoint, &request).await);
        });
    }

    fn describe(&self) -> String {
        format!("http {}", self.endpoint)
    }
}

// ---------------------------------------------------------------------------
// Replay from disk
// ---------------------------------------------------------------------------

/// Serves a previously saved response file, whatever the request says.
#[derive(Debug, Clone)]
pub struct ReplayClient {
    path: String,
}

impl ReplayClient {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> ScenarioOutcome {
        let body = std::fs::read_to_string(&self.path)?;
        decode_reply(200, &body)
    }
}

impl SimulationClient for ReplayClient {
    fn dispatch(&self, _request: SimulationRequest, inbox: ResponseInbox) {
        inbox.deposit(self.load());
    }

    fn describe(&self) -> String {
        format!("replay {}", self.path)
    }
}

// ---------------------------------------------------------------------------
// Scripted (in-memory) client
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Script {
    outcomes: VecDeque<ScenarioOutcome>,
    requests: Vec<SimulationRequest>,
    held: Option<ResponseInbox>,
}

/// Answers requests from a queue of prepared outcomes. Used by headless tests
/// and demos that must not touch the network.
///
/// In deferred mode the outcome is only delivered on [`ScriptedClient::release`],
/// which keeps the controller in its loading state until then.
#[derive(Clone, Default)]
pub struct ScriptedClient {
    script: Arc<Mutex<Script>>,
    deferred: bool,
}

impl ScriptedClient {
    pub fn new(outcomes: impl IntoIterator<Item = ScenarioOutcome>) -> Self {
        let script = Script {
            outcomes: outcomes.into_iter().collect(),
            ..Default::default()
        };
        Self {
            script: Arc::new(Mutex::new(script)),
            deferred: false,
        }
    }

    /// Hold each outcome until `release` is called.
    pub fn deferred(mut self) -> Self {
        self.deferred = true;
        self
    }

    /// Queue another outcome.
    pub fn push(&self, outcome: ScenarioOutcome) {
        if let Ok(mut script) = self.script.lock() {
            script.outcomes.push_back(outcome);
        }
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<SimulationRequest> {
        self.script
            .lock()
            .map(|script| script.requests.clone())
            .unwrap_or_default()
    }

    /// Deliver the next outcome to a held request. Returns false when no
    /// request is waiting.
    pub fn release(&self) -> bool {
        let Ok(mut script) = self.script.lock() else {
            return false;
        };
        let Some(inbox) = script.held.take() else {
            return false;
        };
        let outcome = next_outcome(&mut script);
        inbox.deposit(outcome);
        true
    }
}

fn next_outcome(script: &mut Script) -> ScenarioOutcome {
    script
        .outcomes
        .pop_front()
        .unwrap_or_else(|| Err(ScenarioError::Transport("no scripted response left".into())))
}

impl SimulationClient for ScriptedClient {
    fn dispatch(&self, request: SimulationRequest, inbox: ResponseInbox) {
        let Ok(mut script) = self.script.lock() else {
            inbox.deposit(Err(ScenarioError::Transport("script lock poisoned".into())));
            return;
        };
        script.requests.push(request);
        if self.deferred {
            script.held = Some(inbox);
        } else {
            let outcome = next_outcome(&mut script);
            inbox.deposit(outcome);
        }
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::{ForestType, Season, SimulationParameters};

    fn request() -> SimulationRequest {
        SimulationRequest {
            season: Season::Summer,
            forest_type: ForestType::Deciduous,
        }
    }

    fn data() -> ScenarioData {
        ScenarioData {
            parameters: SimulationParameters::new(Season::Summer, ForestType::Deciduous),
            temperatures: Default::default(),
            fluxes: Default::default(),
        }
    }

    #[test]
    fn test_inbox_take_empties_slot() {
        let inbox = ResponseInbox::default();
        assert!(inbox.take().is_none());
        inbox.deposit(Ok(data()));
        assert!(inbox.take().is_some());
        assert!(inbox.take().is_none());
    }

    #[test]
    fn test_inbox_clones_share_slot() {
        let inbox = ResponseInbox::default();
        let writer = inbox.clone();
        writer.deposit(Err(ScenarioError::Transport("refused".into())));
        assert!(matches!(inbox.take(), Some(Err(ScenarioError::Transport(_)))));
    }

    #[test]
    fn test_scripted_client_answers_in_order() {
        let client = ScriptedClient::new([
            Ok(data()),
            Err(ScenarioError::Application("boom".into())),
        ]);
        let inbox = ResponseInbox::default();

        client.dispatch(request(), inbox.clone());
        assert!(matches!(inbox.take(), Some(Ok(_))));

        client.dispatch(request(), inbox.clone());
        assert!(matches!(inbox.take(), Some(Err(ScenarioError::Application(_)))));

        client.dispatch(request(), inbox.clone());
        assert!(matches!(inbox.take(), Some(Err(ScenarioError::Transport(_)))));
        assert_eq!(client.requests().len(), 3);
    }

    #[test]
    fn test_deferred_client_holds_until_release() {
        let client = ScriptedClient::new([Ok(data())]).deferred();
        let inbox = ResponseInbox::default();

        assert!(!client.release(), "nothing held yet");
        client.dispatch(request(), inbox.clone());
        assert!(inbox.take().is_none());
        assert!(client.release());
        assert!(matches!(inbox.take(), Some(Ok(_))));
    }

    #[test]
    fn test_replay_client_missing_file_is_io_error() {
        let client = ReplayClient::new("/definitely/not/here/response.json");
        let inbox = ResponseInbox::default();
        client.dispatch(request(), inbox.clone());
        assert!(matches!(inbox.take(), Some(Err(ScenarioError::Io(_)))));
    }

    #[test]
    fn test_client_from_config_prefers_replay() {
        let config = ScenarioConfig {
            replay_path: Some("saved.json".into()),
            ..Default::default()
        };
        assert_eq!(client_from_config(&config).describe(), "replay saved.json");

        let config = ScenarioConfig::default();
        assert!(client_from_config(&config).describe().starts_with("http "));
    }
}
