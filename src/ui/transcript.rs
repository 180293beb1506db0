//! Pure projection from conversation state to display lines.
//!
//! Nothing in here touches the terminal; the functions map
//! `(active tab, selection, conversations, catalog)` to `ratatui` lines so
//! the projection can be unit-tested without a rendered surface.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::core::catalog::{truncate_label, Catalog, CHIP_LABEL_BUDGET, TAB_LABEL_BUDGET};
use crate::core::message::Message;
use crate::core::workspace::{Tab, Workspace};

/// Build the transcript for the active tab: every selected model's full
/// conversation in selection order on the aggregate tab, or one model's
/// conversation on its own tab. A pending dispatch contributes a transient
/// loading line that is never part of any conversation.
pub fn build_transcript_lines(
    workspace: &Workspace,
    catalog: &Catalog,
    pending: bool,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    match workspace.active_tab() {
        Tab::All => {
            for id in workspace.selection() {
                add_conversation_lines(&mut lines, workspace.conversation(id), catalog, id);
            }
        }
        Tab::Model(id) => {
            add_conversation_lines(&mut lines, workspace.conversation(id), catalog, id);
        }
    }

    if pending {
        lines.push(Line::from(Span::styled(
            "● waiting for replies…",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
        lines.push(Line::from(""));
    }

    lines
}

fn add_conversation_lines(
    lines: &mut Vec<Line<'static>>,
    conversation: &[Message],
    catalog: &Catalog,
    id: &str,
) {
    let label = catalog.short_name(id).to_string();
    for msg in conversation {
        if msg.role.is_user() {
            lines.push(Line::from(vec![
                Span::styled(
                    "You: ",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(msg.content.clone(), Style::default().fg(Color::Cyan)),
            ]));
            lines.push(Line::from(""));
        } else {
            lines.push(Line::from(Span::styled(
                label.clone(),
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.extend(format_assistant_text(&msg.content));
            lines.push(Line::from(""));
        }
    }
}

/// The welcome view shown while no conversation exists.
pub fn welcome_lines() -> Vec<Line<'static>> {
    let suggestion = |text: &str| {
        Line::from(vec![
            Span::styled("  › ", Style::default().fg(Color::DarkGray)),
            Span::styled(text.to_string(), Style::default().fg(Color::DarkGray)),
        ])
    };
    vec![
        Line::from(""),
        Line::from(Span::styled(
            "Ask 'em all",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("Pick models from the right panel, then put the same question to all of them."),
        Line::from(""),
        Line::from("Try:"),
        suggestion("Explain monads like I'm five"),
        suggestion("Write a haiku about terminals"),
        suggestion("What's the fastest way to learn Rust?"),
    ]
}

/// Minimal inline formatter for assistant text: `**bold**` becomes a bold
/// span, `` `code` `` a highlighted span, and newlines become separate lines.
/// Everything else is carried as literal text; spans hold data, not markup,
/// so no input can inject structure.
pub fn format_assistant_text(text: &str) -> Vec<Line<'static>> {
    text.split('\n').map(format_inline).collect()
}

fn format_inline(line: &str) -> Line<'static> {
    let plain = Style::default().fg(Color::White);
    let bold = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let code = Style::default().fg(Color::Yellow);

    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut literal = String::new();
    let mut rest = line;

    while !rest.is_empty() {
        // Bold and code markers only count when their closer exists on the
        // same line; an unmatched marker stays literal.
        if let Some(body) = rest.strip_prefix("**") {
            if let Some(end) = body.find("**") {
                flush(&mut spans, &mut literal, plain);
                spans.push(Span::styled(body[..end].to_string(), bold));
                rest = &body[end + 2..];
                continue;
            }
        }
        if let Some(body) = rest.strip_prefix('`') {
            if let Some(end) = body.find('`') {
                flush(&mut spans, &mut literal, plain);
                spans.push(Span::styled(body[..end].to_string(), code));
                rest = &body[end + 1..];
                continue;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            literal.push(c);
        }
        rest = chars.as_str();
    }
    flush(&mut spans, &mut literal, plain);

    Line::from(spans)
}

fn flush(spans: &mut Vec<Span<'static>>, literal: &mut String, style: Style) {
    if !literal.is_empty() {
        spans.push(Span::styled(std::mem::take(literal), style));
    }
}

/// Tab bar labels in display order: "all" first, then the selected models.
pub fn tab_labels(workspace: &Workspace, catalog: &Catalog) -> Vec<(Tab, String)> {
    workspace
        .tabs()
        .into_iter()
        .map(|tab| {
            let label = match &tab {
                Tab::All => "Ask 'em all".to_string(),
                Tab::Model(id) => truncate_label(catalog.short_name(id), TAB_LABEL_BUDGET),
            };
            (tab, label)
        })
        .collect()
}

/// Chip labels for the selected models, shown above the input box.
pub fn chip_labels(workspace: &Workspace, catalog: &Catalog) -> Vec<String> {
    workspace
        .selection()
        .iter()
        .map(|id| truncate_label(catalog.short_name(id), CHIP_LABEL_BUDGET))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ModelEntry;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::default();
        catalog.replace(vec![
            ModelEntry {
                id: "a/m1".into(),
                name: "Vendor A/Model One".into(),
            },
            ModelEntry {
                id: "b/m2".into(),
                name: "Vendor B/Model Two".into(),
            },
        ]);
        catalog
    }

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn formatter_handles_bold_code_and_newline() {
        let lines = format_assistant_text("**bold** and `code`\nline2");
        assert_eq!(lines.len(), 2);

        let first = &lines[0];
        assert_eq!(line_text(first), "bold and code");
        assert!(first.spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(first.spans[0].content.as_ref(), "bold");
        assert_eq!(first.spans[1].content.as_ref(), " and ");
        assert_eq!(first.spans[2].content.as_ref(), "code");
        assert_eq!(first.spans[2].style.fg, Some(Color::Yellow));

        assert_eq!(line_text(&lines[1]), "line2");
    }

    #[test]
    fn markup_characters_stay_literal_text() {
        let lines = format_assistant_text("<script>alert(1)</script>");
        assert_eq!(lines.len(), 1);
        assert_eq!(line_text(&lines[0]), "<script>alert(1)</script>");
        // A single span, no styling derived from the input.
        assert_eq!(lines[0].spans.len(), 1);
    }

    #[test]
    fn unmatched_markers_stay_literal() {
        let lines = format_assistant_text("2 ** 3 and `tick");
        assert_eq!(line_text(&lines[0]), "2 ** 3 and `tick");
    }

    #[test]
    fn all_tab_concatenates_conversations_in_selection_order() {
        let mut ws = Workspace::default();
        ws.toggle_model("a/m1");
        ws.toggle_model("b/m2");
        ws.begin_dispatch("question").unwrap();
        ws.apply_responses(
            [
                ("a/m1".to_string(), "answer one".to_string()),
                ("b/m2".to_string(), "answer two".to_string()),
            ]
            .into(),
        );

        let lines = build_transcript_lines(&ws, &catalog(), false);
        let text: Vec<String> = lines.iter().map(line_text).collect();
        let pos = |needle: &str| text.iter().position(|l| l.contains(needle)).unwrap();

        assert!(pos("Model One") < pos("answer one"));
        assert!(pos("answer one") < pos("Model Two"));
        assert!(pos("answer two") > pos("Model Two"));
    }

    #[test]
    fn model_tab_shows_only_that_conversation() {
        let mut ws = Workspace::default();
        ws.toggle_model("a/m1");
        ws.toggle_model("b/m2");
        ws.begin_dispatch("question").unwrap();
        ws.switch_tab(Tab::Model("b/m2".into()));

        let lines = build_transcript_lines(&ws, &catalog(), false);
        let text: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(text.iter().filter(|l| l.contains("You: question")).count(), 1);
    }

    #[test]
    fn pending_dispatch_adds_transient_loading_line() {
        let mut ws = Workspace::default();
        ws.toggle_model("a/m1");
        ws.begin_dispatch("question").unwrap();

        let with = build_transcript_lines(&ws, &catalog(), true);
        let without = build_transcript_lines(&ws, &catalog(), false);
        assert_eq!(with.len(), without.len() + 2);
        assert!(line_text(&with[with.len() - 2]).contains("waiting"));
    }

    #[test]
    fn tab_labels_start_with_all_and_truncate() {
        let mut ws = Workspace::default();
        let mut catalog = Catalog::default();
        catalog.replace(vec![ModelEntry {
            id: "x/y".into(),
            name: "vendor/an-extremely-long-model-name".into(),
        }]);
        ws.toggle_model("x/y");

        let labels = tab_labels(&ws, &catalog);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].0, Tab::All);
        assert!(labels[1].1.ends_with('…'));
        assert!(labels[1].1.chars().count() <= TAB_LABEL_BUDGET + 1);
    }

    #[test]
    fn unknown_model_labels_fall_back_to_id_segment() {
        let mut ws = Workspace::default();
        ws.toggle_model("nowhere/mystery");
        let labels = tab_labels(&ws, &Catalog::default());
        assert_eq!(labels[1].1, "mystery");
    }
}
