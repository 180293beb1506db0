use crate::api::ModelEntry;

/// Character budget for rows in the catalog panel.
pub const CATALOG_LABEL_BUDGET: usize = 30;
/// Character budget for tab labels.
pub const TAB_LABEL_BUDGET: usize = 20;
/// Character budget for selected-model chips above the input box.
pub const CHIP_LABEL_BUDGET: usize = 15;

/// The in-memory model catalog, replaced wholesale on each successful
/// listing round trip.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    models: Vec<ModelEntry>,
}

impl Catalog {
    pub fn replace(&mut self, models: Vec<ModelEntry>) {
        self.models = models;
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelEntry> {
        self.models.iter()
    }

    pub fn find(&self, id: &str) -> Option<&ModelEntry> {
        self.models.iter().find(|m| m.id == id)
    }

    /// Case-insensitive substring filtering over both id and display name.
    /// Filtering is a view concern only; it never touches the selection.
    pub fn filtered(&self, filter: &str) -> Vec<&ModelEntry> {
        let needle = filter.to_lowercase();
        if needle.is_empty() {
            return self.models.iter().collect();
        }
        self.models
            .iter()
            .filter(|m| {
                m.id.to_lowercase().contains(&needle) || m.name.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Display label for a model: the trailing `/` segment of its catalog
    /// name, falling back to the trailing segment of the id when the catalog
    /// has no entry for it.
    pub fn short_name<'a>(&'a self, id: &'a str) -> &'a str {
        let name = self.find(id).map(|m| m.name.as_str()).unwrap_or(id);
        trailing_segment(name)
    }
}

pub fn trailing_segment(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Truncate a label to `budget` characters, marking the cut with an ellipsis.
pub fn truncate_label(label: &str, budget: usize) -> String {
    if label.chars().count() > budget {
        let cut: String = label.chars().take(budget).collect();
        format!("{cut}…")
    } else {
        label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> Catalog {
        let mut catalog = Catalog::default();
        catalog.replace(vec![
            ModelEntry {
                id: "a/m1".into(),
                name: "Model One".into(),
            },
            ModelEntry {
                id: "b/m2".into(),
                name: "Model Two".into(),
            },
        ]);
        catalog
    }

    #[test]
    fn filter_matches_name_case_insensitively() {
        let catalog = sample_catalog();
        let hits = catalog.filtered("one");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "a/m1");
    }

    #[test]
    fn filter_matches_id_substring() {
        let catalog = sample_catalog();
        let hits = catalog.filtered("b/");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "b/m2");
    }

    #[test]
    fn empty_filter_returns_everything() {
        let catalog = sample_catalog();
        assert_eq!(catalog.filtered("").len(), 2);
    }

    #[test]
    fn short_name_takes_trailing_segment_of_catalog_name() {
        let mut catalog = Catalog::default();
        catalog.replace(vec![ModelEntry {
            id: "openai/gpt-4o".into(),
            name: "OpenAI/GPT-4o".into(),
        }]);
        assert_eq!(catalog.short_name("openai/gpt-4o"), "GPT-4o");
    }

    #[test]
    fn short_name_falls_back_to_id_segment() {
        let catalog = Catalog::default();
        assert_eq!(catalog.short_name("anthropic/claude-3"), "claude-3");
    }

    #[test]
    fn truncation_appends_ellipsis_past_budget() {
        assert_eq!(truncate_label("short", 20), "short");
        assert_eq!(
            truncate_label("a-very-long-model-label", 10),
            "a-very-lon…"
        );
    }
}
