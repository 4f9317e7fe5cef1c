// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Amount computation for option sets.
//!
//! A line with a missing or unparseable amount contributes zero and is
//! reported back so the author can fix it. The only failure is a sum that
//! exceeds what `Decimal` can represent.

use crate::error::DomainError;
use crate::types::CollaborationOption;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A line amount as submitted, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum LineAmount {
    Value(Decimal),
    Missing,
    Malformed(String),
}

impl LineAmount {
    /// Parses a raw amount string. Blank input counts as missing.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::Missing;
        };

        Decimal::from_str(raw).map_or_else(|_| Self::Malformed(raw.to_string()), Self::Value)
    }

    /// The value this line contributes to a total.
    #[must_use]
    pub fn effective(&self) -> Decimal {
        match self {
            Self::Value(amount) if !is_negative(*amount) => *amount,
            Self::Value(_) | Self::Missing | Self::Malformed(_) => Decimal::ZERO,
        }
    }
}

impl From<Decimal> for LineAmount {
    fn from(value: Decimal) -> Self {
        Self::Value(value)
    }
}

/// Why a line contributed zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FlagReason {
    Missing,
    Malformed { raw: String },
    Negative { amount: Decimal },
}

/// A line the caller should correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlaggedLine {
    pub index: usize,
    #[serde(flatten)]
    pub reason: FlagReason,
}

/// Result of [`compute_total`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AmountSummary {
    pub total: Decimal,
    pub flagged: Vec<FlaggedLine>,
}

impl AmountSummary {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.flagged.is_empty()
    }
}

/// Sums a list of submitted line amounts.
///
/// Missing, malformed and negative lines contribute zero and are
/// listed in `flagged` with their position.
///
/// # Errors
///
/// Returns `DomainError::AmountOverflow` if the total does not fit in a
/// `Decimal`.
pub fn compute_total(lines: &[LineAmount]) -> Result<AmountSummary, DomainError> {
    let mut summary = AmountSummary::default();

    for (index, line) in lines.iter().enumerate() {
        let reason = match line {
            LineAmount::Value(amount) if is_negative(*amount) => Some(FlagReason::Negative {
                amount: *amount,
            }),
            LineAmount::Value(_) => None,
            LineAmount::Missing => Some(FlagReason::Missing),
            LineAmount::Malformed(raw) => Some(FlagReason::Malformed { raw: raw.clone() }),
        };

        summary.total = checked_sum(summary.total, line.effective(), index)?;
        if let Some(reason) = reason {
            summary.flagged.push(FlaggedLine { index, reason });
        }
    }

    Ok(summary)
}

/// True for amounts strictly below zero. `-0` is not negative.
#[must_use]
pub fn is_negative(amount: Decimal) -> bool {
    amount.is_sign_negative() && !amount.is_zero()
}

/// Sums the amounts of options already linked to a collaboration.
///
/// # Errors
///
/// Returns `DomainError::AmountOverflow` if the total does not fit in a
/// `Decimal`.
pub fn total_of(options: &[CollaborationOption]) -> Result<Decimal, DomainError> {
    options
        .iter()
        .enumerate()
        .try_fold(Decimal::ZERO, |total, (index, option)| {
            checked_sum(total, option.amount(), index)
        })
}

fn checked_sum(total: Decimal, amount: Decimal, index: usize) -> Result<Decimal, DomainError> {
    total
        .checked_add(amount)
        .ok_or(DomainError::AmountOverflow { index })
}
