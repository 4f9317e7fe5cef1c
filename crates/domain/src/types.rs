// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::amount::LineAmount;
use crate::error::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an existing identifier.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Generates a fresh random identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Opaque identifier of a collaboration.
    CollaborationId
);
string_id!(
    /// Identifier of a sponsor or organization, issued by the identity provider.
    PartyId
);
string_id!(
    /// Identifier of an event owned by an organization.
    EventId
);
string_id!(
    /// Identifier of a catalog option, including backing records for custom options.
    CatalogOptionId
);
string_id!(
    /// Identifier of one option row linked to a collaboration.
    OptionId
);
string_id!(
    /// Reference to an uploaded object in file storage.
    FileRef
);

/// The caller's relationship to a collaboration.
///
/// The organization receives the proposal; the sponsor makes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    Organization,
    Sponsor,
}

impl PartyRole {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Organization => "organization",
            Self::Sponsor => "sponsor",
        }
    }

    /// The other side of the collaboration.
    #[must_use]
    pub const fn counterpart(&self) -> Self {
        match self {
            Self::Organization => Self::Sponsor,
            Self::Sponsor => Self::Organization,
        }
    }
}

impl std::fmt::Display for PartyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartyRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "organization" => Ok(Self::Organization),
            "sponsor" => Ok(Self::Sponsor),
            _ => Err(DomainError::InvalidRole {
                role: s.to_string(),
            }),
        }
    }
}

/// A registered sponsor or organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub party_id: PartyId,
    pub role: PartyRole,
    pub display_name: String,
}

/// A priced option an organization publishes for one of its events.
///
/// Read-only from the collaboration's point of view: options are
/// snapshotted when selected, so later edits here change nothing
/// already proposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogOption {
    pub id: CatalogOptionId,
    pub event_id: EventId,
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
}

/// Where a linked option came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptionSource {
    /// Snapshot of a catalog entry.
    Catalog { catalog_option_id: CatalogOptionId },
    /// Freeform option authored by a party. Options created with the
    /// collaboration carry a backing catalog-style record.
    Custom {
        backing_option_id: Option<CatalogOptionId>,
    },
}

/// One priced line item linked to a collaboration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaborationOption {
    option_id: OptionId,
    title: String,
    description: Option<String>,
    amount: Decimal,
    source: OptionSource,
}

impl CollaborationOption {
    /// Copies a catalog entry's current title, description and price.
    #[must_use]
    pub fn snapshot(catalog: &CatalogOption) -> Self {
        Self {
            option_id: OptionId::generate(),
            title: catalog.title.clone(),
            description: catalog.description.clone(),
            amount: catalog.price,
            source: OptionSource::Catalog {
                catalog_option_id: catalog.id.clone(),
            },
        }
    }

    /// Creates a freeform option without a backing record.
    #[must_use]
    pub fn custom(title: impl Into<String>, description: Option<String>, amount: Decimal) -> Self {
        Self {
            option_id: OptionId::generate(),
            title: title.into(),
            description,
            amount,
            source: OptionSource::Custom {
                backing_option_id: None,
            },
        }
    }

    /// Rebuilds an option read back from storage.
    #[must_use]
    pub const fn restore(
        option_id: OptionId,
        title: String,
        description: Option<String>,
        amount: Decimal,
        source: OptionSource,
    ) -> Self {
        Self {
            option_id,
            title,
            description,
            amount,
            source,
        }
    }

    /// Returns this custom option linked to its backing record.
    #[must_use]
    pub fn with_backing(mut self, backing_option_id: CatalogOptionId) -> Self {
        if self.is_custom() {
            self.source = OptionSource::Custom {
                backing_option_id: Some(backing_option_id),
            };
        }
        self
    }

    #[must_use]
    pub const fn option_id(&self) -> &OptionId {
        &self.option_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    #[must_use]
    pub const fn source(&self) -> &OptionSource {
        &self.source
    }

    #[must_use]
    pub const fn is_custom(&self) -> bool {
        matches!(self.source, OptionSource::Custom { .. })
    }

    /// The catalog entry this option was snapshotted from, if any.
    #[must_use]
    pub const fn catalog_option_id(&self) -> Option<&CatalogOptionId> {
        match &self.source {
            OptionSource::Catalog { catalog_option_id } => Some(catalog_option_id),
            OptionSource::Custom { .. } => None,
        }
    }

    /// Compares content while ignoring row identity and backing records.
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        self.title == other.title
            && self.description == other.description
            && self.amount == other.amount
            && self.catalog_option_id() == other.catalog_option_id()
    }
}

/// An option as submitted by a caller, before it is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptionDraft {
    Catalog {
        catalog_option_id: CatalogOptionId,
    },
    Custom {
        title: String,
        description: Option<String>,
        amount: LineAmount,
    },
}

impl OptionDraft {
    /// Convenience constructor for a custom draft with a known amount.
    #[must_use]
    pub fn custom(title: impl Into<String>, description: Option<String>, amount: Decimal) -> Self {
        Self::Custom {
            title: title.into(),
            description,
            amount: LineAmount::Value(amount),
        }
    }

    #[must_use]
    pub fn catalog(catalog_option_id: impl Into<CatalogOptionId>) -> Self {
        Self::Catalog {
            catalog_option_id: catalog_option_id.into(),
        }
    }

    #[must_use]
    pub const fn is_custom(&self) -> bool {
        matches!(self, Self::Custom { .. })
    }
}

/// Input to the creation transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCollaboration {
    pub sponsor_id: PartyId,
    pub organization_id: PartyId,
    /// The first id is the primary event.
    pub event_ids: Vec<EventId>,
    pub message: Option<String>,
}
