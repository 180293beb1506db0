use crate::core::app::App;

pub enum CommandResult {
    Continue,
    ProcessAsMessage(String),
}

/// Handle slash commands typed into the input box; anything else passes
/// through as a regular message.
pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();

    match trimmed {
        "/new" => {
            app.new_chat();
            CommandResult::Continue
        }
        "/settings" => {
            app.open_settings();
            CommandResult::Continue
        }
        "/help" => {
            app.notice = Some(
                "Enter send · Tab switch panel · ←/→ switch tab · Ctrl+N new chat · \
                 Ctrl+O settings · Ctrl+C quit · /new /settings /help"
                    .to_string(),
            );
            CommandResult::Continue
        }
        _ if trimmed.starts_with('/') => {
            app.notice = Some(format!("Unknown command: {trimmed} (try /help)"));
            CommandResult::Continue
        }
        _ => CommandResult::ProcessAsMessage(input.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CredentialStore;
    use crate::core::config::Config;

    fn test_app() -> App {
        App::new(
            Config::default(),
            "http://localhost:7860".to_string(),
            CredentialStore::new_with_keyring(false),
        )
    }

    #[test]
    fn new_command_resets_the_workspace() {
        let mut app = test_app();
        app.workspace.toggle_model("a/m1");
        assert!(matches!(
            process_input(&mut app, "/new"),
            CommandResult::Continue
        ));
        assert!(app.workspace.selection().is_empty());
    }

    #[test]
    fn settings_command_opens_the_overlay() {
        let mut app = test_app();
        app.close_settings();
        process_input(&mut app, "/settings");
        assert!(app.settings_open);
    }

    #[test]
    fn unknown_commands_are_reported() {
        let mut app = test_app();
        process_input(&mut app, "/frobnicate");
        assert!(app.notice.as_deref().unwrap().contains("Unknown command"));
    }

    #[test]
    fn plain_text_passes_through() {
        let mut app = test_app();
        match process_input(&mut app, "hello there") {
            CommandResult::ProcessAsMessage(text) => assert_eq!(text, "hello there"),
            CommandResult::Continue => panic!("expected message passthrough"),
        }
    }
}
