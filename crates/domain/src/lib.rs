// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain types and rules for sponsorship collaborations.
//!
//! Nothing here performs I/O. The crate holds the status enum and its
//! transition table, the collaboration aggregate, option types, the amount
//! engine and boundary validation.
//!
//! [`OptionSelection`] is a client-side staging helper: a UI composing a
//! proposal or an options edit keeps its working set and running total
//! there, then submits the resulting drafts. The engine itself only ever
//! receives drafts.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod amount;
mod collaboration;
mod error;
mod selection;
mod status;
mod transition;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use amount::{
    AmountSummary, FlagReason, FlaggedLine, LineAmount, compute_total, is_negative, total_of,
};
pub use collaboration::{Collaboration, CollaborationParts};
pub use error::{DomainError, ErrorKind};
pub use selection::OptionSelection;
pub use status::CollaborationStatus;
pub use transition::{
    Permitted, TRANSITIONS, TransitionAction, TransitionRule, allowed_actions, find_rule,
    resolve_transition,
};

// Re-export public types
pub use types::{
    CatalogOption, CatalogOptionId, CollaborationId, CollaborationOption, EventId, FileRef,
    NewCollaboration, OptionDraft, OptionId, OptionSource, Party, PartyId, PartyRole,
};
pub use validation::{
    validate_catalog_membership, validate_catalog_option, validate_custom_option,
    validate_event_ids, validate_identifier, validate_new_collaboration, validate_option_list,
    validate_settlement_file,
};
