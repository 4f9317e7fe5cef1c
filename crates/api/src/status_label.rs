// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Display labels for collaboration statuses.
//!
//! Labels depend on who is looking: the party whose move it is sees a
//! call to action, the other party sees that they are waiting. The
//! engine never reads these.

use sponsorlink_domain::{CollaborationStatus, PartyRole};

/// Returns the label `viewer` should see for `status`.
#[must_use]
pub const fn status_label(status: CollaborationStatus, viewer: PartyRole) -> &'static str {
    match (status, viewer) {
        (CollaborationStatus::Pending, PartyRole::Organization) => "New proposal",
        (CollaborationStatus::Pending, PartyRole::Sponsor) => "Awaiting organization",
        (CollaborationStatus::Negotiation, _) => "In negotiation",
        (CollaborationStatus::Accepted, _) => "Accepted",
        (CollaborationStatus::Rejected, PartyRole::Organization) => "Declined",
        (CollaborationStatus::Rejected, PartyRole::Sponsor) => "Declined by organization",
        (CollaborationStatus::InProgress, PartyRole::Organization) => "Deliver and submit proof",
        (CollaborationStatus::InProgress, PartyRole::Sponsor) => "In progress",
        (CollaborationStatus::Settlement, PartyRole::Organization) => "Awaiting sponsor review",
        (CollaborationStatus::Settlement, PartyRole::Sponsor) => "Review settlement",
        (CollaborationStatus::SettlementRejected, PartyRole::Organization) => {
            "Settlement rejected, resubmit proof"
        }
        (CollaborationStatus::SettlementRejected, PartyRole::Sponsor) => {
            "Awaiting new settlement"
        }
        (CollaborationStatus::Completed, _) => "Completed",
        (CollaborationStatus::Canceled, _) => "Canceled",
    }
}
