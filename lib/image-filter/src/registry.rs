use crate::{Filter, FilterKind, ImageFilter, ImageFilterError, ImageFilterResult};
use std::str::FromStr;
use strum::VariantArray as _;

/// Fixed label → filter table, built once and never mutated.
#[derive(Debug, Clone)]
pub struct FilterRegistry {
    entries: Vec<(&'static str, ImageFilter)>,
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterRegistry {
    pub fn new() -> Self {
        let entries = FilterKind::VARIANTS
            .iter()
            .map(|kind| (kind.label(), ImageFilter::from(*kind)))
            .collect();

        Self { entries }
    }

    pub fn list(&self) -> &[(&'static str, ImageFilter)] {
        &self.entries
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(label, _)| *label)
    }

    /// Resolve a display label, or failing that a kind tag. Both matches
    /// ignore ASCII case.
    pub fn lookup(&self, name: &str) -> ImageFilterResult<&ImageFilter> {
        let name = name.trim();

        if let Some((_, filter)) = self
            .entries
            .iter()
            .find(|(label, _)| label.eq_ignore_ascii_case(name))
        {
            return Ok(filter);
        }

        FilterKind::from_str(name)
            .ok()
            .and_then(|kind| {
                self.entries
                    .iter()
                    .find(|(_, filter)| filter.kind() == kind)
                    .map(|(_, filter)| filter)
            })
            .ok_or_else(|| ImageFilterError::UnknownFilter(name.to_string()))
    }
}
