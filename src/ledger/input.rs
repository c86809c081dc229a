//! Manual entry and edit input

use chrono::NaiveDateTime;

use crate::error::{CoinlogError, CoinlogResult};
use crate::models::{Leg, Movement, Quantity, Transaction, TransactionKind};

/// Input for creating a transaction by hand
///
/// `primary` is what was bought, sold, deposited or withdrawn; `secondary`
/// is what was paid (Buy) or received (Sell) and is ignored for transfers.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub exchange: String,
    pub date: NaiveDateTime,
    pub kind: TransactionKind,
    pub primary: Option<Leg>,
    pub secondary: Option<Leg>,
    pub tag: Option<String>,
    pub note: Option<String>,
}

impl NewTransaction {
    pub fn into_transaction(self) -> CoinlogResult<Transaction> {
        if self.exchange.trim().is_empty() {
            return Err(CoinlogError::Validation("Exchange is required".into()));
        }
        let movement = Movement::from_legs(
            self.kind,
            self.primary.map(normalize_leg),
            self.secondary.map(normalize_leg),
        );
        Ok(Transaction::new(self.exchange, self.date, movement)
            .with_tag(self.tag.as_deref())
            .with_note(self.note.as_deref()))
    }
}

/// Optional changes to an existing transaction
///
/// `None` leaves a field alone. For tag and note an empty string clears
/// the value.
#[derive(Debug, Clone, Default)]
pub struct TransactionEdit {
    pub exchange: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub kind: Option<TransactionKind>,
    pub primary: Option<Leg>,
    pub secondary: Option<Leg>,
    pub tag: Option<String>,
    pub note: Option<String>,
}

impl TransactionEdit {
    pub fn is_empty(&self) -> bool {
        self.exchange.is_none()
            && self.date.is_none()
            && self.kind.is_none()
            && self.primary.is_none()
            && self.secondary.is_none()
            && self.tag.is_none()
            && self.note.is_none()
    }

    /// Apply the changes; legs carry over when only the kind changes
    pub fn apply(self, txn: &mut Transaction) -> CoinlogResult<()> {
        if let Some(exchange) = self.exchange {
            let exchange = exchange.trim();
            if exchange.is_empty() {
                return Err(CoinlogError::Validation("Exchange cannot be empty".into()));
            }
            txn.exchange = exchange.to_string();
        }
        if let Some(date) = self.date {
            txn.date = date;
        }

        if self.kind.is_some() || self.primary.is_some() || self.secondary.is_some() {
            let kind = self.kind.unwrap_or_else(|| txn.kind());
            let primary = self
                .primary
                .map(normalize_leg)
                .or_else(|| txn.movement.primary().cloned());
            let secondary = self
                .secondary
                .map(normalize_leg)
                .or_else(|| txn.movement.secondary().cloned());
            txn.movement = Movement::from_legs(kind, primary, secondary);
        }

        if let Some(tag) = self.tag {
            txn.tag = Some(tag).filter(|t| !t.trim().is_empty());
        }
        if let Some(note) = self.note {
            txn.note = Some(note).filter(|n| !n.trim().is_empty());
        }

        txn.touch();
        Ok(())
    }
}

/// Parse `amount` and `currency` text into a leg
pub fn parse_leg(amount: &str, currency: &str) -> CoinlogResult<Leg> {
    let amount = Quantity::parse(amount).map_err(|e| CoinlogError::Validation(e.to_string()))?;
    Ok(normalize_leg(Leg::new(amount, currency)))
}

/// Currencies entered by hand are upper-cased
fn normalize_leg(leg: Leg) -> Leg {
    Leg::new(leg.amount, leg.currency.to_uppercase())
}
