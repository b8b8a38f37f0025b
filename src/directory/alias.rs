//! Guest alias synthesis
//!
//! Generated aliases are the lowercase first initial, the lowercase last name and a
//! `MMDDHH` timestamp suffix. When that candidate is already taken an increasing
//! integer is appended until a free alias is found.

use chrono::NaiveDateTime;
use std::collections::HashSet;

/// Deterministic-then-disambiguated alias generator
#[derive(Debug, Clone, Copy, Default)]
pub struct AliasGenerator;

impl AliasGenerator {
    /// Create a new alias generator
    pub fn new() -> Self {
        Self
    }

    /// Lowercase first initial followed by the lowercase last name.
    ///
    /// Returns `None` when the first name is empty.
    pub fn base_alias(&self, first_name: &str, last_name: &str) -> Option<String> {
        let initial = first_name.chars().next()?;
        let mut base: String = initial.to_lowercase().collect();
        base.push_str(&last_name.to_lowercase());
        Some(base)
    }

    /// Month, day and hour, two digits each
    pub fn timestamp_suffix(&self, now: NaiveDateTime) -> String {
        now.format("%m%d%H").to_string()
    }

    /// Base alias plus timestamp suffix, before disambiguation
    pub fn candidate(&self, first_name: &str, last_name: &str, now: NaiveDateTime) -> Option<String> {
        self.base_alias(first_name, last_name)
            .map(|base| format!("{}{}", base, self.timestamp_suffix(now)))
    }

    /// Return `candidate` if no existing alias matches it case-insensitively,
    /// otherwise the first of `candidate1`, `candidate2`, ... that is free.
    pub fn disambiguate<'a, I>(&self, candidate: &str, existing: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        let taken: HashSet<String> = existing.into_iter().map(str::to_lowercase).collect();
        if !taken.contains(&candidate.to_lowercase()) {
            return candidate.to_string();
        }

        // `taken` is finite, so this terminates
        (1u64..)
            .map(|counter| format!("{}{}", candidate, counter))
            .find(|alias| !taken.contains(&alias.to_lowercase()))
            .unwrap_or_else(|| candidate.to_string())
    }

    /// Generate a free alias for a guest
    pub fn generate<'a, I>(
        &self,
        first_name: &str,
        last_name: &str,
        now: NaiveDateTime,
        existing: I,
    ) -> Option<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let candidate = self.candidate(first_name, last_name, now)?;
        Some(self.disambiguate(&candidate, existing))
    }
}
