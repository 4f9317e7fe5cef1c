// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staging area for an option set that is not attached to a stored
//! collaboration yet, e.g. while a sponsor composes a proposal.
//!
//! This is a client-side helper. The engine never sees a selection; a
//! client toggles catalog entries in and out, shows the running total, and
//! finally submits [`OptionSelection::into_drafts`] with the proposal or
//! an options edit.

use crate::amount::{AmountSummary, LineAmount, compute_total};
use crate::error::DomainError;
use crate::types::{CatalogOption, CatalogOptionId, OptionDraft};
use serde::{Deserialize, Serialize};

/// A working set of option drafts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSelection {
    drafts: Vec<OptionDraft>,
    /// Known catalog prices, kept so a running total can be shown.
    #[serde(default)]
    prices: Vec<(CatalogOptionId, LineAmount)>,
}

impl OptionSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `catalog` if absent or removes it if present.
    ///
    /// Returns `true` if the option is selected afterwards.
    pub fn toggle_catalog_option(&mut self, catalog: &CatalogOption) -> bool {
        if self.contains_catalog(&catalog.id) {
            self.drafts.retain(|d| !is_catalog_draft(d, &catalog.id));
            self.prices.retain(|(id, _)| *id != catalog.id);
            false
        } else {
            self.drafts.push(OptionDraft::catalog(catalog.id.clone()));
            self.prices
                .push((catalog.id.clone(), LineAmount::Value(catalog.price)));
            true
        }
    }

    /// Appends a freeform option.
    pub fn add_custom(
        &mut self,
        title: impl Into<String>,
        description: Option<String>,
        amount: LineAmount,
    ) {
        self.drafts.push(OptionDraft::Custom {
            title: title.into(),
            description,
            amount,
        });
    }

    /// Removes the draft at `index`, returning it if it existed.
    pub fn remove(&mut self, index: usize) -> Option<OptionDraft> {
        if index >= self.drafts.len() {
            return None;
        }
        let removed = self.drafts.remove(index);
        if let OptionDraft::Catalog { catalog_option_id } = &removed {
            self.prices.retain(|(id, _)| id != catalog_option_id);
        }
        Some(removed)
    }

    #[must_use]
    pub fn contains_catalog(&self, catalog_option_id: &CatalogOptionId) -> bool {
        self.drafts
            .iter()
            .any(|d| is_catalog_draft(d, catalog_option_id))
    }

    #[must_use]
    pub fn drafts(&self) -> &[OptionDraft] {
        &self.drafts
    }

    #[must_use]
    pub fn into_drafts(self) -> Vec<OptionDraft> {
        self.drafts
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    /// Running total of the staged drafts.
    ///
    /// Catalog drafts use the price seen when they were toggled in.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AmountOverflow` if the staged amounts cannot be
    /// summed.
    pub fn total(&self) -> Result<AmountSummary, DomainError> {
        let lines: Vec<LineAmount> = self
            .drafts
            .iter()
            .map(|d| match d {
                OptionDraft::Catalog { catalog_option_id } => self
                    .prices
                    .iter()
                    .find(|(id, _)| id == catalog_option_id)
                    .map_or(LineAmount::Missing, |(_, amount)| amount.clone()),
                OptionDraft::Custom { amount, .. } => amount.clone(),
            })
            .collect();
        compute_total(&lines)
    }
}

fn is_catalog_draft(draft: &OptionDraft, id: &CatalogOptionId) -> bool {
    matches!(draft, OptionDraft::Catalog { catalog_option_id } if catalog_option_id == id)
}
