//! Per-genre shown/hidden state.

use std::collections::HashMap;

/// Which genres are shown.
///
/// Unknown genres read as visible. Entries survive filter changes and are
/// only dropped by [`VisibilityState::reset`], which the controller calls
/// when a new dataset arrives.
#[derive(Debug, Clone, Default)]
pub struct VisibilityState {
    shown: HashMap<String, bool>,
}

impl VisibilityState {
    /// Create an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add genres not yet tracked as visible. Existing choices are kept.
    pub fn initialize<'a, I>(&mut self, genres: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for genre in genres {
            if !self.shown.contains_key(genre) {
                self.shown.insert(genre.to_string(), true);
            }
        }
    }

    /// Flip a genre. An untracked genre counts as visible, so it becomes hidden.
    ///
    /// Returns the new visibility.
    pub fn toggle(&mut self, genre: &str) -> bool {
        let visible = !self.is_visible(genre);
        self.shown.insert(genre.to_string(), visible);
        visible
    }

    /// Whether a genre is shown.
    #[must_use]
    pub fn is_visible(&self, genre: &str) -> bool {
        self.shown.get(genre).copied().unwrap_or(true)
    }

    /// Forget every entry.
    pub fn reset(&mut self) {
        self.shown.clear();
    }

    /// Number of tracked genres.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shown.len()
    }

    /// Whether no genre is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }

    /// Tracked genres currently hidden, sorted.
    #[must_use]
    pub fn hidden(&self) -> Vec<&str> {
        let mut hidden: Vec<&str> = self
            .shown
            .iter()
            .filter(|(_, visible)| !**visible)
            .map(|(genre, _)| genre.as_str())
            .collect();
        hidden.sort_unstable();
        hidden
    }
}
