// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod apply;
mod command;
mod engine;
mod error;
mod ports;
mod state;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::{apply, record_creation, record_linked_options};
pub use command::Command;
pub use engine::CollaborationEngine;
pub use error::{CollaboratorError, CoreError};
pub use ports::{
    CatalogLookup, ChangeNotifier, CollaborationStore, Collaborators, FileStorage, NoopNotifier,
    PartyDirectory,
};
pub use state::{
    Caller, CreationOutcome, DroppedOption, OptionEdit, SettlementDecision, TransitionPayload,
    TransitionResult,
};
