/*!
# Schedule Data Model

Two groups of types live here:

- **Field records**: what one table row says, field by field, before the row
  has been classified. Every field is optional; a field that does not apply to
  a row is absent, which is different from being present with a zero value.
- **The schedule tree**: `Schedule` → `Pool` → `Account`, in table order. Field
  declaration order is the canonical key order of the serialized form.
*/

use crate::amount::Amount;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ================================================================================================
// Field Vocabulary
// ================================================================================================

/// Fixed vocabulary of named fields a table row can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Total,
    Subtotal,
    PercentOfTotal,
    Pool,
    Name,
    Amount,
    Address,
    StartAt,
    Interval,
    Duration,
    Cliff,
    PortionSize,
    Remainder,
}

impl Field {
    pub const ALL: [Field; 13] = [
        Field::Total,
        Field::Subtotal,
        Field::PercentOfTotal,
        Field::Pool,
        Field::Name,
        Field::Amount,
        Field::Address,
        Field::StartAt,
        Field::Interval,
        Field::Duration,
        Field::Cliff,
        Field::PortionSize,
        Field::Remainder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Total => "total",
            Field::Subtotal => "subtotal",
            Field::PercentOfTotal => "percent_of_total",
            Field::Pool => "pool",
            Field::Name => "name",
            Field::Amount => "amount",
            Field::Address => "address",
            Field::StartAt => "start_at",
            Field::Interval => "interval",
            Field::Duration => "duration",
            Field::Cliff => "cliff",
            Field::PortionSize => "portion_size",
            Field::Remainder => "remainder",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("unknown field '{}'", s))
    }
}

/// Named fields read from one table row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldRecord {
    pub total: Option<Amount>,
    pub subtotal: Option<Amount>,
    pub percent_of_total: Option<Decimal>,
    pub pool: Option<String>,
    pub name: Option<String>,
    pub amount: Option<Amount>,
    pub address: Option<String>,
    pub start_at: Option<u64>,
    pub interval: Option<u64>,
    pub duration: Option<u64>,
    pub cliff: Option<Amount>,
    pub portion_size: Option<Amount>,
    pub remainder: Option<Amount>,
}

impl FieldRecord {
    pub fn is_empty(&self) -> bool {
        *self == FieldRecord::default()
    }

    /// Names of the fields present in this record, in vocabulary order
    pub fn present_fields(&self) -> Vec<Field> {
        let presence = [
            self.total.is_some(),
            self.subtotal.is_some(),
            self.percent_of_total.is_some(),
            self.pool.is_some(),
            self.name.is_some(),
            self.amount.is_some(),
            self.address.is_some(),
            self.start_at.is_some(),
            self.interval.is_some(),
            self.duration.is_some(),
            self.cliff.is_some(),
            self.portion_size.is_some(),
            self.remainder.is_some(),
        ];
        Field::ALL
            .iter()
            .zip(presence)
            .filter_map(|(field, present)| present.then_some(*field))
            .collect()
    }
}

// ================================================================================================
// Schedule Tree
// ================================================================================================

/// Complete vesting plan: the grand total split across pools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub total: Amount,
    pub pools: Vec<Pool>,
}

/// Named share of the grand total, split across accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub name: String,
    pub total: Amount,
    /// Reserved for downstream consumers; always `false` when built from a table
    pub partial: bool,
    pub accounts: Vec<Account>,
}

/// One recipient within a pool with its vesting parameters
///
/// Vesting parameters are carried through from the table as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_at: Option<u64>,
    /// Seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,
    /// Seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliff: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portion_size: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remainder: Option<Amount>,
}

impl Pool {
    /// Exact sum of this pool's account amounts
    pub fn allocated(&self) -> Amount {
        self.accounts.iter().map(|account| &account.amount).sum()
    }
}

/// Aggregate figures for a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub total: Amount,
    /// Sum of every account amount
    pub allocated: Amount,
    /// Grand total minus `allocated`, or `None` when accounts exceed the total
    pub unallocated: Option<Amount>,
    pub pool_count: usize,
    pub account_count: usize,
}

impl Schedule {
    pub fn summary(&self) -> ScheduleSummary {
        let allocated: Amount = self
            .pools
            .iter()
            .flat_map(|pool| pool.accounts.iter())
            .map(|account| &account.amount)
            .sum();

        let unallocated = (allocated <= self.total).then(|| {
            Amount::from(self.total.as_biguint() - allocated.as_biguint())
        });

        ScheduleSummary {
            total: self.total.clone(),
            allocated,
            unallocated,
            pool_count: self.pools.len(),
            account_count: self.pools.iter().map(|pool| pool.accounts.len()).sum(),
        }
    }

    pub fn pool(&self, name: &str) -> Option<&Pool> {
        self.pools.iter().find(|pool| pool.name == name)
    }
}

// ================================================================================================
// Tests
// ================================================================================================
