use crate::languages::QUIZ_LANGUAGES;

pub const PLACEHOLDER_LABEL: &str = "Select language";
pub const NO_MATCHES_LABEL: &str = "No languages found";

/// Searchable single-select dropdown over [`QUIZ_LANGUAGES`].
///
/// Whether the control is disabled belongs to the owning form, so every
/// mutating operation takes it as an argument and does nothing when set.
#[derive(Debug, Default)]
pub struct LanguageSelector {
    open: bool,
    search: String,
    highlighted: usize,
}

impl LanguageSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn toggle(&mut self, disabled: bool) {
        if disabled {
            return;
        }
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Catalog entries containing the trimmed query, case-insensitively, in catalog order.
    pub fn filtered(&self) -> Vec<&'static str> {
        filter_languages(&self.search)
    }

    pub fn push_search(&mut self, c: char) {
        self.search.push(c);
        self.highlighted = 0;
    }

    pub fn pop_search(&mut self) {
        self.search.pop();
        self.highlighted = 0;
    }

    pub fn highlight_next(&mut self) {
        let len = self.filtered().len();
        if self.highlighted + 1 < len {
            self.highlighted += 1;
        }
    }

    pub fn highlight_previous(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }

    /// Hands `lang` to `on_change` and closes the dropdown.
    pub fn select<F>(&mut self, lang: &str, disabled: bool, on_change: F)
    where
        F: FnOnce(&str),
    {
        if disabled {
            return;
        }
        on_change(lang);
        self.open = false;
    }

    /// Selects the highlighted row. An empty result list selects nothing.
    pub fn select_highlighted<F>(&mut self, disabled: bool, on_change: F)
    where
        F: FnOnce(&str),
    {
        let Some(lang) = self.filtered().get(self.highlighted).copied() else {
            return;
        };
        self.select(lang, disabled, on_change);
    }
}

pub fn filter_languages(query: &str) -> Vec<&'static str> {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return QUIZ_LANGUAGES.to_vec();
    }
    QUIZ_LANGUAGES
        .iter()
        .copied()
        .filter(|lang| lang.to_lowercase().contains(&term))
        .collect()
}

pub fn display_label(value: &str) -> &str {
    if value.is_empty() {
        PLACEHOLDER_LABEL
    } else {
        value
    }
}
