use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::debug;

use crate::api::{ChatMessage, ModelEntry};
use crate::auth::CredentialStore;
use crate::core::catalog::Catalog;
use crate::core::config::Config;
use crate::core::workspace::{SendError, Tab, Workspace};

/// Which surface currently receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The message input box.
    Input,
    /// The catalog panel (filter text + model rows).
    Models,
}

/// Identifies one in-flight chat dispatch. The id is derived from the wall
/// clock at dispatch time; completions carrying any other id are stale and
/// get dropped.
#[derive(Debug, Clone)]
pub struct PendingDispatch {
    pub id: i64,
}

/// Everything the event loop needs to run one chat round trip on a spawned
/// task. Produced by [`App::send_message`] so the state layer stays free of
/// network calls.
#[derive(Debug, Clone)]
pub struct ChatJob {
    pub dispatch_id: i64,
    pub api_key: String,
    pub targets: Vec<String>,
    pub messages: Vec<ChatMessage>,
}

/// A catalog-load round trip, produced by [`App::submit_credential`].
#[derive(Debug, Clone)]
pub struct CatalogJob {
    pub api_key: String,
}

pub struct App {
    pub workspace: Workspace,
    pub catalog: Catalog,
    pub client: Client,
    pub endpoint: String,
    pub api_key: String,
    pub credentials: CredentialStore,
    pub config: Config,

    pub input: String,
    pub focus: Focus,
    pub filter: String,
    pub catalog_cursor: usize,

    pub settings_open: bool,
    pub settings_input: String,
    pub settings_status: Option<String>,
    pub settings_close_at: Option<Instant>,
    pub catalog_loading: bool,

    pub scroll_offset: u16,
    pub auto_scroll: bool,

    pub pending_dispatch: Option<PendingDispatch>,
    pub notice: Option<String>,
}

impl App {
    /// Build the app and perform the credential bootstrap: a stored
    /// credential pre-fills the settings input and schedules an immediate
    /// catalog load; a missing one opens the settings overlay and waits.
    pub fn new(config: Config, endpoint: String, mut credentials: CredentialStore) -> Self {
        let stored = credentials.load().unwrap_or_default();
        let settings_open = stored.is_none();
        let settings_input = stored.unwrap_or_default();

        Self {
            workspace: Workspace::default(),
            catalog: Catalog::default(),
            client: Client::new(),
            endpoint,
            api_key: String::new(),
            credentials,
            config,
            input: String::new(),
            focus: Focus::Input,
            filter: String::new(),
            catalog_cursor: 0,
            settings_open,
            settings_input,
            settings_status: None,
            settings_close_at: None,
            catalog_loading: false,
            scroll_offset: 0,
            auto_scroll: true,
            pending_dispatch: None,
            notice: None,
        }
    }

    /// True when a stored credential allows loading the catalog without
    /// waiting for user input.
    pub fn wants_startup_catalog_load(&self) -> bool {
        !self.settings_open && !self.settings_input.trim().is_empty()
    }

    /// Validate the settings input and hand back a catalog job, or set an
    /// inline error and return nothing. The credential is NOT persisted here;
    /// that happens only when the load succeeds.
    pub fn submit_credential(&mut self) -> Option<CatalogJob> {
        if self.catalog_loading {
            return None;
        }
        let key = self.settings_input.trim().to_string();
        if key.is_empty() {
            self.settings_status = Some("Please enter an API key".to_string());
            return None;
        }
        self.settings_status = Some("Loading models...".to_string());
        self.catalog_loading = true;
        Some(CatalogJob { api_key: key })
    }

    /// Fold a finished catalog load back in. Success replaces the catalog
    /// wholesale, persists the now-proven credential, and schedules the
    /// settings overlay to close. Failure leaves catalog and stored
    /// credential untouched.
    pub fn on_catalog_loaded(&mut self, api_key: String, result: Result<Vec<ModelEntry>, String>) {
        self.catalog_loading = false;
        match result {
            Ok(models) => {
                self.catalog.replace(models);
                self.api_key = api_key.clone();
                if let Err(e) = self.credentials.store(&api_key) {
                    debug!(error = %e, "failed to persist credential");
                }
                self.settings_status = Some(format!("✓ {} models loaded", self.catalog.len()));
                if self.settings_open {
                    self.settings_close_at = Some(
                        Instant::now()
                            + Duration::from_millis(self.config.settings_autoclose_ms()),
                    );
                }
                self.clamp_catalog_cursor();
            }
            Err(message) => {
                self.settings_status = Some(format!("Error: {message}"));
            }
        }
    }

    pub fn open_settings(&mut self) {
        self.settings_open = true;
        self.settings_close_at = None;
    }

    pub fn close_settings(&mut self) {
        self.settings_open = false;
        self.settings_close_at = None;
    }

    /// Timer hook driven by the event loop: auto-dismiss the settings
    /// overlay once its close deadline passes.
    pub fn tick(&mut self, now: Instant) {
        if let Some(close_at) = self.settings_close_at {
            if now >= close_at {
                self.close_settings();
            }
        }
    }

    /// Prepare a send for the current input. Appends the user turns and
    /// returns the job to run, or surfaces why nothing was sent. Dispatch is
    /// serialized: a second send while one is in flight is refused.
    pub fn send_message(&mut self) -> Option<ChatJob> {
        if self.pending_dispatch.is_some() {
            self.notice = Some("Still waiting for the previous reply".to_string());
            return None;
        }
        let raw = std::mem::take(&mut self.input);
        match self.workspace.begin_dispatch(&raw) {
            Ok(dispatch) => {
                let dispatch_id = chrono::Utc::now().timestamp_millis();
                self.pending_dispatch = Some(PendingDispatch { id: dispatch_id });
                self.auto_scroll = true;
                debug!(dispatch_id, targets = dispatch.targets.len(), "send prepared");
                Some(ChatJob {
                    dispatch_id,
                    api_key: self.api_key.clone(),
                    targets: dispatch.targets,
                    messages: dispatch.messages,
                })
            }
            Err(SendError::EmptyInput) => {
                self.input = raw;
                None
            }
            Err(SendError::NoSelection) => {
                self.input = raw;
                self.notice =
                    Some("Please select at least one model from the right panel".to_string());
                None
            }
        }
    }

    /// Fold a finished dispatch back in, dropping the loading placeholder.
    /// Stale completions (id mismatch after a new chat reset) are ignored.
    pub fn on_chat_complete(
        &mut self,
        dispatch_id: i64,
        result: Result<std::collections::HashMap<String, String>, String>,
    ) {
        let Some(pending) = &self.pending_dispatch else {
            debug!(dispatch_id, "dropping completion with no dispatch in flight");
            return;
        };
        if pending.id != dispatch_id {
            debug!(dispatch_id, pending = pending.id, "dropping stale completion");
            return;
        }
        self.pending_dispatch = None;
        match result {
            Ok(responses) => {
                self.workspace.apply_responses(responses);
                self.auto_scroll = true;
            }
            Err(message) => {
                self.notice = Some(format!("Error: {message}"));
            }
        }
    }

    /// The catalog rows currently visible under the filter.
    pub fn filtered_models(&self) -> Vec<&ModelEntry> {
        self.catalog.filtered(&self.filter)
    }

    pub fn clamp_catalog_cursor(&mut self) {
        let len = self.filtered_models().len();
        if len == 0 {
            self.catalog_cursor = 0;
        } else if self.catalog_cursor >= len {
            self.catalog_cursor = len - 1;
        }
    }

    pub fn toggle_model_under_cursor(&mut self) {
        let id = self
            .filtered_models()
            .get(self.catalog_cursor)
            .map(|m| m.id.clone());
        if let Some(id) = id {
            self.workspace.toggle_model(&id);
            self.auto_scroll = true;
        }
    }

    pub fn catalog_cursor_up(&mut self) {
        let len = self.filtered_models().len();
        if len == 0 {
            return;
        }
        self.catalog_cursor = if self.catalog_cursor == 0 {
            len - 1
        } else {
            self.catalog_cursor - 1
        };
    }

    pub fn catalog_cursor_down(&mut self) {
        let len = self.filtered_models().len();
        if len == 0 {
            return;
        }
        self.catalog_cursor = (self.catalog_cursor + 1) % len;
    }

    /// Reset the conversation surface. Catalog, credential and filter stay.
    pub fn new_chat(&mut self) {
        self.workspace.new_chat();
        self.pending_dispatch = None;
        self.scroll_offset = 0;
        self.auto_scroll = true;
    }

    pub fn active_tab(&self) -> &Tab {
        self.workspace.active_tab()
    }
}
