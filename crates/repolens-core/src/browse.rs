//! Filtering and pagination over a user's repository list.
//!
//! All derivation is done by pure functions invoked explicitly after each
//! state transition, so the rules are testable without any UI attached.

use crate::models::{Repository, PAGE_SIZE};

/// Distinct primary-language names across the list, in first-appearance order.
pub fn compute_languages(repos: &[Repository]) -> Vec<String> {
    let mut languages: Vec<String> = Vec::new();
    for repo in repos {
        if let Some(lang) = &repo.language {
            if !languages.iter().any(|l| l == lang) {
                languages.push(lang.clone());
            }
        }
    }
    languages
}

/// Apply both filters as case-insensitive "contains" predicates.
///
/// A repository with no primary language matches an empty language filter
/// but never a non-empty one.
pub fn compute_filtered(repos: &[Repository], name: &str, language: &str) -> Vec<Repository> {
    let name = name.to_lowercase();
    let language = language.to_lowercase();

    repos
        .iter()
        .filter(|repo| repo.name.to_lowercase().contains(&name))
        .filter(|repo| match &repo.language {
            Some(lang) => lang.to_lowercase().contains(&language),
            None => language.is_empty(),
        })
        .cloned()
        .collect()
}

/// The `[page*10, page*10+10)` window over the filtered list.
///
/// Slicing past the end yields a shorter or empty page rather than a panic.
pub fn compute_page(filtered: &[Repository], page: usize) -> Vec<Repository> {
    let start = page.saturating_mul(PAGE_SIZE).min(filtered.len());
    let end = (start + PAGE_SIZE).min(filtered.len());
    filtered[start..end].to_vec()
}

pub fn has_next_page(filtered_len: usize, page: usize) -> bool {
    filtered_len > (page + 1) * PAGE_SIZE
}

pub fn has_previous_page(page: usize) -> bool {
    page > 0
}

/// Browsing state for the current user's repositories.
///
/// A single owner for the full list, the active filters and the page
/// cursor. Every transition re-derives the filtered list and the
/// displayed slice through the pure functions above; nothing is cached
/// behind the caller's back.
#[derive(Debug, Clone, Default)]
pub struct BrowseState {
    all: Vec<Repository>,
    filtered: Vec<Repository>,
    displayed: Vec<Repository>,
    languages: Vec<String>,
    name_filter: String,
    language_filter: String,
    page: usize,
    has_next: bool,
    has_previous: bool,
}

impl BrowseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything from the previous fetch cycle.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Show the quick first page before the full list has arrived.
    ///
    /// `has_next` comes from the fetch response here since the full list
    /// length is not known yet.
    pub fn install_first_page(&mut self, repositories: Vec<Repository>, has_next: bool) {
        // Only meaningful while the full list is still in flight
        if !self.all.is_empty() {
            return;
        }
        self.displayed = repositories;
        self.page = 0;
        self.has_next = has_next;
        self.has_previous = false;
    }

    /// Install the complete repository list and re-derive everything.
    pub fn set_repositories(&mut self, repositories: Vec<Repository>) {
        self.all = repositories;
        self.languages = compute_languages(&self.all);
        self.page = 0;
        self.rederive();
    }

    pub fn set_name_filter(&mut self, filter: impl Into<String>) {
        self.name_filter = filter.into();
        self.page = 0;
        self.rederive();
    }

    pub fn set_language_filter(&mut self, filter: impl Into<String>) {
        self.language_filter = filter.into();
        self.page = 0;
        self.rederive();
    }

    /// Move the page cursor by `delta`, clamped to valid pages.
    pub fn change_page(&mut self, delta: isize) {
        let new_page = if delta.is_negative() {
            self.page.saturating_sub(delta.unsigned_abs())
        } else {
            self.page.saturating_add(delta as usize)
        };

        // Never land past the last non-empty page, whatever the delta
        let last_page = if self.filtered.is_empty() {
            0
        } else {
            (self.filtered.len() - 1) / PAGE_SIZE
        };

        self.page = new_page.min(last_page);
        self.rederive_page();
    }

    fn rederive(&mut self) {
        self.filtered = compute_filtered(&self.all, &self.name_filter, &self.language_filter);
        self.rederive_page();
    }

    fn rederive_page(&mut self) {
        self.displayed = compute_page(&self.filtered, self.page);
        self.has_next = has_next_page(self.filtered.len(), self.page);
        self.has_previous = has_previous_page(self.page);
    }

    pub fn displayed(&self) -> &[Repository] {
        &self.displayed
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn total_len(&self) -> usize {
        self.all.len()
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn name_filter(&self) -> &str {
        &self.name_filter
    }

    pub fn language_filter(&self) -> &str {
        &self.language_filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn has_next_page(&self) -> bool {
        self.has_next
    }

    pub fn has_previous_page(&self) -> bool {
        self.has_previous
    }
}
