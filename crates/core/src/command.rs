// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use sponsorlink_domain::{CatalogOption, CollaborationOption, FileRef, TransitionAction};

/// A command represents caller intent as data only.
///
/// Commands are the only way to request changes to an existing
/// collaboration. Option drafts are resolved against the catalog before
/// a command is built, so every command carries concrete options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Move the collaboration along one edge of the transition table.
    Transition {
        action: TransitionAction,
        /// Required by `submit_settlement` and `resubmit_settlement`.
        settlement_file: Option<FileRef>,
    },
    /// The `edit_options` table action: replace options while negotiating.
    EditOptions { options: Vec<CollaborationOption> },
    /// Replace the option set while pending or negotiating.
    ReplaceOptions { options: Vec<CollaborationOption> },
    /// Add or remove a single catalog option.
    ToggleCatalogOption { catalog: CatalogOption },
}

impl Command {
    /// Name recorded in the audit log.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Transition { action, .. } => action.as_str(),
            Self::EditOptions { .. } => "edit_options",
            Self::ReplaceOptions { .. } => "set_options",
            Self::ToggleCatalogOption { .. } => "toggle_catalog_option",
        }
    }

    /// True if applying this command rewrites the option list.
    #[must_use]
    pub const fn replaces_options(&self) -> bool {
        !matches!(self, Self::Transition { .. })
    }
}
