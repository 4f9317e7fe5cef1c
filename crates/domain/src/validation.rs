// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::amount::{LineAmount, is_negative, total_of};
use crate::error::DomainError;
use crate::types::{CatalogOption, CollaborationOption, EventId, NewCollaboration};
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Validates that an identifier field is not blank.
///
/// # Errors
///
/// Returns `DomainError::BlankIdentifier` naming `field` if `value` is
/// empty or whitespace.
pub fn validate_identifier(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::BlankIdentifier { field });
    }
    Ok(())
}

/// Validates the event list of a new collaboration.
///
/// # Arguments
///
/// * `event_ids` - Linked events, primary first
///
/// # Errors
///
/// Returns an error if:
/// - The list is empty
/// - Any id is blank
/// - Any id appears twice
pub fn validate_event_ids(event_ids: &[EventId]) -> Result<(), DomainError> {
    if event_ids.is_empty() {
        return Err(DomainError::NoEventIds);
    }

    let mut seen: HashSet<&EventId> = HashSet::new();
    for event_id in event_ids {
        validate_identifier("event_id", event_id.as_str())?;
        if !seen.insert(event_id) {
            return Err(DomainError::DuplicateEventId {
                event_id: event_id.clone(),
            });
        }
    }

    Ok(())
}

/// Validates the shape of a creation request, before any lookups.
///
/// # Errors
///
/// Returns an error if either party id is blank or the event list is invalid.
pub fn validate_new_collaboration(new: &NewCollaboration) -> Result<(), DomainError> {
    validate_identifier("sponsor_id", new.sponsor_id.as_str())?;
    validate_identifier("organization_id", new.organization_id.as_str())?;
    validate_event_ids(&new.event_ids)
}

/// Validates one freeform option and returns the amount to store.
///
/// Missing or malformed amounts are stored as zero; the amount engine
/// flags them separately. Negative amounts are rejected outright.
///
/// # Arguments
///
/// * `index` - Position of the option in the submitted list
/// * `title` - The option title
/// * `amount` - The amount as submitted
///
/// # Errors
///
/// * `DomainError::BlankOptionTitle` if the title is blank
/// * `DomainError::NegativeAmount` if the amount is below zero
pub fn validate_custom_option(
    index: usize,
    title: &str,
    amount: &LineAmount,
) -> Result<Decimal, DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::BlankOptionTitle { index });
    }

    let negative = match amount {
        LineAmount::Value(value) if is_negative(*value) => Some(*value),
        LineAmount::Value(_) | LineAmount::Missing | LineAmount::Malformed(_) => None,
    };
    if let Some(amount) = negative {
        return Err(DomainError::NegativeAmount { index, amount });
    }

    Ok(amount.effective())
}

/// Checks that a catalog option belongs to one of the collaboration's events.
///
/// # Errors
///
/// Returns `DomainError::CatalogOptionOutsideEvents` otherwise.
pub fn validate_catalog_membership(
    catalog: &CatalogOption,
    event_ids: &[EventId],
) -> Result<(), DomainError> {
    if event_ids.contains(&catalog.event_id) {
        Ok(())
    } else {
        Err(DomainError::CatalogOptionOutsideEvents {
            catalog_option_id: catalog.id.clone(),
            event_id: catalog.event_id.clone(),
        })
    }
}

/// Validates a resolved option list before it replaces the current set.
///
/// # Errors
///
/// * `DomainError::EmptyOptionList` if there are no options
/// * `DomainError::NegativeAmount` if any amount is below zero
/// * `DomainError::AmountOverflow` if the amounts cannot be summed
pub fn validate_option_list(options: &[CollaborationOption]) -> Result<(), DomainError> {
    if options.is_empty() {
        return Err(DomainError::EmptyOptionList);
    }

    for (index, option) in options.iter().enumerate() {
        let amount = option.amount();
        if is_negative(amount) {
            return Err(DomainError::NegativeAmount { index, amount });
        }
    }

    total_of(options)?;
    Ok(())
}

/// Validates a catalog option before it is published.
///
/// # Errors
///
/// Returns an error if the title is blank or the price is negative.
pub fn validate_catalog_option(catalog: &CatalogOption) -> Result<(), DomainError> {
    validate_identifier("event_id", catalog.event_id.as_str())?;
    if catalog.title.trim().is_empty() {
        return Err(DomainError::BlankOptionTitle { index: 0 });
    }
    if is_negative(catalog.price) {
        return Err(DomainError::NegativeAmount {
            index: 0,
            amount: catalog.price,
        });
    }
    Ok(())
}

/// Validates an uploaded settlement file.
///
/// # Errors
///
/// Returns `DomainError::EmptySettlementFile` for an empty upload.
pub const fn validate_settlement_file(bytes: &[u8]) -> Result<(), DomainError> {
    if bytes.is_empty() {
        return Err(DomainError::EmptySettlementFile);
    }
    Ok(())
}
