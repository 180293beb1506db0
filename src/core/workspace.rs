use std::collections::HashMap;

use crate::api::ChatMessage;
use crate::core::message::{Message, Role};

/// A view scope: the aggregate view over every selected model, or one
/// specific model's conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tab {
    All,
    Model(String),
}

/// Why a send was refused before anything was dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    EmptyInput,
    NoSelection,
}

/// A prepared outbound chat turn: the target models and the message list to
/// forward. Built by [`Workspace::begin_dispatch`], which also appends the
/// user turn to each target's history so it renders before the round trip.
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub targets: Vec<String>,
    pub messages: Vec<ChatMessage>,
}

/// The multi-model conversation state: which models are selected, one
/// append-only history per model, and the currently displayed tab.
///
/// Selection order is insertion order and governs tab display order.
/// Deselecting a model keeps its history; only [`Workspace::new_chat`]
/// clears histories, and it clears everything at once.
#[derive(Debug, Default)]
pub struct Workspace {
    selection: Vec<String>,
    conversations: HashMap<String, Vec<Message>>,
    active_tab: Tab,
}

impl Default for Tab {
    fn default() -> Self {
        Tab::All
    }
}

impl Workspace {
    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.iter().any(|m| m == id)
    }

    pub fn active_tab(&self) -> &Tab {
        &self.active_tab
    }

    pub fn conversation(&self, id: &str) -> &[Message] {
        self.conversations.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when no model has any turns yet, i.e. the welcome view applies.
    pub fn is_pristine(&self) -> bool {
        self.conversations.values().all(Vec::is_empty)
    }

    /// Select a model (lazily creating its empty conversation) or deselect
    /// it, keeping whatever history it accumulated.
    pub fn toggle_model(&mut self, id: &str) {
        if self.is_selected(id) {
            self.remove_model(id);
        } else {
            self.selection.push(id.to_string());
            self.conversations.entry(id.to_string()).or_default();
        }
    }

    /// Explicit removal path, same contract as toggling off. If the removed
    /// model's tab was active, fall back to the aggregate tab so the active
    /// tab always resolves to a visible one.
    pub fn remove_model(&mut self, id: &str) {
        self.selection.retain(|m| m != id);
        if matches!(&self.active_tab, Tab::Model(active) if active == id) {
            self.active_tab = Tab::All;
        }
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    /// The tab bar contents: the aggregate tab first, then one tab per
    /// selected model in insertion order.
    pub fn tabs(&self) -> Vec<Tab> {
        let mut tabs = vec![Tab::All];
        tabs.extend(self.selection.iter().cloned().map(Tab::Model));
        tabs
    }

    pub fn cycle_tab(&mut self, forward: bool) {
        let tabs = self.tabs();
        let current = tabs
            .iter()
            .position(|t| t == &self.active_tab)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % tabs.len()
        } else {
            (current + tabs.len() - 1) % tabs.len()
        };
        self.active_tab = tabs[next].clone();
    }

    /// Prepare an outbound turn for the active tab.
    ///
    /// Appends the user turn to every target's history, then builds the
    /// message list to forward: a single target gets its full history so the
    /// model sees multi-turn context; a broadcast sends only the new turn,
    /// since the per-model histories have diverged and no shared transcript
    /// exists to forward.
    pub fn begin_dispatch(&mut self, raw: &str) -> Result<Dispatch, SendError> {
        let content = raw.trim();
        if content.is_empty() {
            return Err(SendError::EmptyInput);
        }
        if self.selection.is_empty() {
            return Err(SendError::NoSelection);
        }

        let targets: Vec<String> = match &self.active_tab {
            Tab::All => self.selection.clone(),
            Tab::Model(id) => vec![id.clone()],
        };

        for target in &targets {
            self.conversations
                .entry(target.clone())
                .or_default()
                .push(Message::user(content));
        }

        let messages = if let [single] = targets.as_slice() {
            self.conversation(single)
                .iter()
                .map(|m| ChatMessage {
                    role: m.role,
                    content: m.content.clone(),
                })
                .collect()
        } else {
            vec![ChatMessage {
                role: Role::User,
                content: content.to_string(),
            }]
        };

        Ok(Dispatch { targets, messages })
    }

    /// Fold a completed dispatch back in: one assistant turn per responding
    /// model, creating a conversation when the service names a model we were
    /// not yet tracking.
    pub fn apply_responses(&mut self, responses: HashMap<String, String>) {
        for (model_id, text) in responses {
            self.conversations
                .entry(model_id)
                .or_default()
                .push(Message::assistant(text));
        }
    }

    /// Clear every conversation and the selection atomically, and reset the
    /// active tab. The catalog and credential are untouched; they live
    /// elsewhere.
    pub fn new_chat(&mut self) {
        self.conversations.clear();
        self.selection.clear();
        self.active_tab = Tab::All;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn respond(workspace: &mut Workspace, pairs: &[(&str, &str)]) {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(m, t)| (m.to_string(), t.to_string()))
            .collect();
        workspace.apply_responses(map);
    }

    #[test]
    fn toggling_twice_restores_selection_and_keeps_history() {
        let mut ws = Workspace::default();
        ws.toggle_model("a/m1");
        ws.begin_dispatch("hello").unwrap();
        respond(&mut ws, &[("a/m1", "hi there")]);

        ws.toggle_model("a/m1");
        assert!(ws.selection().is_empty());
        assert_eq!(ws.conversation("a/m1").len(), 2);

        ws.toggle_model("a/m1");
        assert_eq!(ws.selection(), ["a/m1"]);
        assert_eq!(ws.conversation("a/m1").len(), 2);
    }

    #[test]
    fn broadcast_appends_one_user_turn_per_selected_model() {
        let mut ws = Workspace::default();
        ws.toggle_model("a/m1");
        ws.toggle_model("b/m2");

        ws.begin_dispatch("first").unwrap();
        ws.begin_dispatch("second").unwrap();

        ws.toggle_model("b/m2");
        ws.begin_dispatch("third").unwrap();

        let user_turns = |id: &str| {
            ws.conversation(id)
                .iter()
                .filter(|m| m.role.is_user())
                .count()
        };
        assert_eq!(user_turns("a/m1"), 3);
        assert_eq!(user_turns("b/m2"), 2);
    }

    #[test]
    fn single_target_forwards_full_history() {
        let mut ws = Workspace::default();
        ws.toggle_model("a/m1");
        ws.begin_dispatch("first").unwrap();
        respond(&mut ws, &[("a/m1", "reply one")]);

        ws.switch_tab(Tab::Model("a/m1".into()));
        let dispatch = ws.begin_dispatch("second").unwrap();

        assert_eq!(dispatch.targets, ["a/m1"]);
        assert_eq!(dispatch.messages.len(), 3);
        assert!(dispatch.messages[0].role.is_user());
        assert!(dispatch.messages[1].role.is_assistant());
        assert_eq!(dispatch.messages[2].content, "second");
    }

    #[test]
    fn broadcast_forwards_only_the_new_turn() {
        let mut ws = Workspace::default();
        ws.toggle_model("a/m1");
        ws.toggle_model("b/m2");
        ws.begin_dispatch("first").unwrap();
        respond(&mut ws, &[("a/m1", "r1"), ("b/m2", "r2")]);

        let dispatch = ws.begin_dispatch("second").unwrap();
        assert_eq!(dispatch.targets.len(), 2);
        assert_eq!(dispatch.messages.len(), 1);
        assert_eq!(dispatch.messages[0].content, "second");
    }

    #[test]
    fn empty_and_whitespace_input_is_rejected() {
        let mut ws = Workspace::default();
        ws.toggle_model("a/m1");
        assert_eq!(ws.begin_dispatch("").unwrap_err(), SendError::EmptyInput);
        assert_eq!(
            ws.begin_dispatch("   \n").unwrap_err(),
            SendError::EmptyInput
        );
        assert!(ws.conversation("a/m1").is_empty());
    }

    #[test]
    fn empty_selection_aborts_without_mutation() {
        let mut ws = Workspace::default();
        assert_eq!(
            ws.begin_dispatch("hello").unwrap_err(),
            SendError::NoSelection
        );
        assert!(ws.is_pristine());
    }

    #[test]
    fn failed_dispatch_leaves_user_turn_unanswered() {
        let mut ws = Workspace::default();
        ws.toggle_model("a/m1");
        ws.begin_dispatch("hello").unwrap();
        // The gateway call fails: no responses are ever applied.
        let history = ws.conversation("a/m1");
        assert_eq!(history.len(), 1);
        assert!(history[0].role.is_user());
    }

    #[test]
    fn responses_may_create_untracked_conversations() {
        let mut ws = Workspace::default();
        ws.toggle_model("a/m1");
        ws.begin_dispatch("hello").unwrap();
        respond(&mut ws, &[("c/m3", "surprise")]);
        assert_eq!(ws.conversation("c/m3").len(), 1);
    }

    #[test]
    fn new_chat_clears_everything_and_resets_tab() {
        let mut ws = Workspace::default();
        ws.toggle_model("a/m1");
        ws.begin_dispatch("hello").unwrap();
        ws.switch_tab(Tab::Model("a/m1".into()));

        ws.new_chat();

        assert!(ws.selection().is_empty());
        assert!(ws.is_pristine());
        assert_eq!(ws.active_tab(), &Tab::All);
        assert_eq!(ws.tabs(), vec![Tab::All]);
    }

    #[test]
    fn removing_active_tab_model_falls_back_to_all() {
        let mut ws = Workspace::default();
        ws.toggle_model("a/m1");
        ws.switch_tab(Tab::Model("a/m1".into()));
        ws.remove_model("a/m1");
        assert_eq!(ws.active_tab(), &Tab::All);
    }

    #[test]
    fn tab_cycling_walks_insertion_order() {
        let mut ws = Workspace::default();
        ws.toggle_model("a/m1");
        ws.toggle_model("b/m2");

        ws.cycle_tab(true);
        assert_eq!(ws.active_tab(), &Tab::Model("a/m1".into()));
        ws.cycle_tab(true);
        assert_eq!(ws.active_tab(), &Tab::Model("b/m2".into()));
        ws.cycle_tab(true);
        assert_eq!(ws.active_tab(), &Tab::All);
        ws.cycle_tab(false);
        assert_eq!(ws.active_tab(), &Tab::Model("b/m2".into()));
    }
}
