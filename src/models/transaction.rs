//! Transaction model
//!
//! A ledger entry on a crypto exchange. The kind-specific amounts live in
//! [`Movement`], whose variants only carry the legs that make sense for
//! that kind.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::TransactionId;
use super::kind::TransactionKind;
use super::quantity::Quantity;

/// One (amount, currency) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leg {
    /// Non-negative magnitude
    pub amount: Quantity,
    pub currency: String,
}

impl Leg {
    /// Create a leg; the amount is stored as a magnitude
    pub fn new(amount: Quantity, currency: impl Into<String>) -> Self {
        Self {
            amount: amount.abs(),
            currency: currency.into().trim().to_string(),
        }
    }

    /// `0.50 BTC`, `21,500.00 USD`
    pub fn display(&self) -> String {
        if self.currency.is_empty() {
            self.amount.format_for("")
        } else {
            format!("{} {}", self.amount.format_for(&self.currency), self.currency)
        }
    }
}

/// Kind-specific amounts of a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Movement {
    Buy {
        bought: Option<Leg>,
        paid: Option<Leg>,
    },
    Sell {
        sold: Option<Leg>,
        received: Option<Leg>,
    },
    Deposit {
        deposited: Option<Leg>,
    },
    Withdraw {
        withdrawn: Option<Leg>,
    },
}

impl Movement {
    /// Build a movement from role-based legs
    ///
    /// Buy: primary is what was bought, secondary what was paid.
    /// Sell: primary is what was sold, secondary what was received.
    /// Deposit / Withdraw use the primary leg only.
    pub fn from_legs(kind: TransactionKind, primary: Option<Leg>, secondary: Option<Leg>) -> Self {
        match kind {
            TransactionKind::Buy => Self::Buy {
                bought: primary,
                paid: secondary,
            },
            TransactionKind::Sell => Self::Sell {
                sold: primary,
                received: secondary,
            },
            TransactionKind::Deposit => Self::Deposit { deposited: primary },
            TransactionKind::Withdraw => Self::Withdraw { withdrawn: primary },
        }
    }

    /// Build a movement from the four ledger columns of the export layout
    pub fn from_ledger_legs(
        kind: TransactionKind,
        buy: Option<Leg>,
        sell: Option<Leg>,
        deposit: Option<Leg>,
        withdraw: Option<Leg>,
    ) -> Self {
        match kind {
            TransactionKind::Buy => Self::Buy {
                bought: buy,
                paid: sell,
            },
            TransactionKind::Sell => Self::Sell {
                sold: sell,
                received: buy,
            },
            TransactionKind::Deposit => Self::Deposit { deposited: deposit },
            TransactionKind::Withdraw => Self::Withdraw {
                withdrawn: withdraw,
            },
        }
    }

    pub fn kind(&self) -> TransactionKind {
        match self {
            Self::Buy { .. } => TransactionKind::Buy,
            Self::Sell { .. } => TransactionKind::Sell,
            Self::Deposit { .. } => TransactionKind::Deposit,
            Self::Withdraw { .. } => TransactionKind::Withdraw,
        }
    }

    /// The leg the kind is about: bought, sold, deposited or withdrawn
    pub fn primary(&self) -> Option<&Leg> {
        match self {
            Self::Buy { bought, .. } => bought.as_ref(),
            Self::Sell { sold, .. } => sold.as_ref(),
            Self::Deposit { deposited } => deposited.as_ref(),
            Self::Withdraw { withdrawn } => withdrawn.as_ref(),
        }
    }

    /// The counter leg of a trade: paid for a Buy, received for a Sell
    pub fn secondary(&self) -> Option<&Leg> {
        match self {
            Self::Buy { paid, .. } => paid.as_ref(),
            Self::Sell { received, .. } => received.as_ref(),
            Self::Deposit { .. } | Self::Withdraw { .. } => None,
        }
    }

    /// Leg written to the Buy Amount / Buy Currency export columns
    pub fn buy_leg(&self) -> Option<&Leg> {
        match self {
            Self::Buy { bought, .. } => bought.as_ref(),
            Self::Sell { received, .. } => received.as_ref(),
            _ => None,
        }
    }

    /// Leg written to the Sell Amount / Sell Currency export columns
    pub fn sell_leg(&self) -> Option<&Leg> {
        match self {
            Self::Buy { paid, .. } => paid.as_ref(),
            Self::Sell { sold, .. } => sold.as_ref(),
            _ => None,
        }
    }

    pub fn deposit_leg(&self) -> Option<&Leg> {
        match self {
            Self::Deposit { deposited } => deposited.as_ref(),
            _ => None,
        }
    }

    pub fn withdraw_leg(&self) -> Option<&Leg> {
        match self {
            Self::Withdraw { withdrawn } => withdrawn.as_ref(),
            _ => None,
        }
    }

    /// Currencies of every populated leg
    pub fn currencies(&self) -> impl Iterator<Item = &str> {
        self.primary()
            .into_iter()
            .chain(self.secondary())
            .map(|leg| leg.currency.as_str())
    }
}

/// A ledger transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    /// Exchange the transaction happened on
    pub exchange: String,

    /// When it happened (local time, as entered or imported)
    pub date: NaiveDateTime,

    pub movement: Movement,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction with a fresh identifier
    pub fn new(exchange: impl Into<String>, date: NaiveDateTime, movement: Movement) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            exchange: exchange.into().trim().to_string(),
            date,
            movement,
            tag: None,
            note: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the tag; blank tags are stored as `None`
    pub fn with_tag(mut self, tag: Option<&str>) -> Self {
        self.tag = non_blank(tag);
        self
    }

    /// Set the note; blank notes are stored as `None`
    pub fn with_note(mut self, note: Option<&str>) -> Self {
        self.note = non_blank(note);
        self
    }

    pub fn kind(&self) -> TransactionKind {
        self.movement.kind()
    }

    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Zero-based month (January = 0)
    pub fn month0(&self) -> u32 {
        self.date.month0()
    }

    /// Case-insensitive substring match over exchange, currencies, tag and note
    pub fn matches_search(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        std::iter::once(self.exchange.as_str())
            .chain(self.movement.currencies())
            .chain(self.tag.as_deref())
            .chain(self.note.as_deref())
            .any(|field| field.to_lowercase().contains(&q))
    }

    /// Mark as modified
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn leg(amount: &str, currency: &str) -> Leg {
        Leg::new(Quantity::parse(amount).unwrap(), currency)
    }

    #[test]
    fn test_leg_stores_magnitude() {
        let l = leg("-2.5", " ETH ");
        assert_eq!(l.amount, Quantity::parse("2.5").unwrap());
        assert_eq!(l.currency, "ETH");
        assert_eq!(l.display(), "2.50 ETH");
    }

    #[test]
    fn test_from_legs_by_kind() {
        let buy = Movement::from_legs(
            TransactionKind::Buy,
            Some(leg("0.5", "BTC")),
            Some(leg("21500", "USD")),
        );
        assert_eq!(buy.kind(), TransactionKind::Buy);
        assert_eq!(buy.buy_leg().unwrap().currency, "BTC");
        assert_eq!(buy.sell_leg().unwrap().currency, "USD");

        let sell = Movement::from_legs(
            TransactionKind::Sell,
            Some(leg("0.25", "BTC")),
            Some(leg("11200", "USD")),
        );
        assert_eq!(sell.sell_leg().unwrap().currency, "BTC");
        assert_eq!(sell.buy_leg().unwrap().currency, "USD");
    }

    #[test]
    fn test_transfers_drop_secondary_leg() {
        let deposit = Movement::from_legs(
            TransactionKind::Deposit,
            Some(leg("100", "USD")),
            Some(leg("1", "BTC")),
        );
        assert_eq!(deposit.primary().unwrap().currency, "USD");
        assert!(deposit.secondary().is_none());
        assert!(deposit.buy_leg().is_none());
        assert!(deposit.sell_leg().is_none());
        assert_eq!(deposit.deposit_leg().unwrap().currency, "USD");
        assert!(deposit.withdraw_leg().is_none());
    }

    #[test]
    fn test_ledger_legs_invert_export_columns() {
        let original = Movement::from_legs(
            TransactionKind::Sell,
            Some(leg("5", "SOL")),
            Some(leg("1100", "USDT")),
        );
        let rebuilt = Movement::from_ledger_legs(
            TransactionKind::Sell,
            original.buy_leg().cloned(),
            original.sell_leg().cloned(),
            None,
            None,
        );
        assert_eq!(original, rebuilt);
    }

    #[test]
    fn test_matches_search() {
        let txn = Transaction::new(
            "Coinbase",
            at(2025, 1, 15),
            Movement::from_legs(TransactionKind::Buy, Some(leg("0.5", "BTC")), None),
        )
        .with_tag(Some("DCA"))
        .with_note(Some("Weekly Bitcoin DCA"));

        assert!(txn.matches_search("coin"));
        assert!(txn.matches_search("btc"));
        assert!(txn.matches_search("dca"));
        assert!(txn.matches_search("weekly"));
        assert!(txn.matches_search(""));
        assert!(!txn.matches_search("kraken"));
    }

    #[test]
    fn test_blank_tag_is_none() {
        let txn = Transaction::new(
            "Kraken",
            at(2025, 1, 5),
            Movement::Deposit { deposited: None },
        )
        .with_tag(Some("   "));
        assert!(txn.tag.is_none());
    }

    #[test]
    fn test_serialization_round_trip() {
        let txn = Transaction::new(
            "Kraken",
            at(2025, 2, 6),
            Movement::from_legs(TransactionKind::Withdraw, Some(leg("1.5", "ETH")), None),
        )
        .with_note(Some("To cold wallet"));

        let json = serde_json::to_string(&txn).unwrap();
        assert!(json.contains("\"kind\":\"withdraw\""));
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(txn, back);
        assert_eq!(back.month0(), 1);
        assert_eq!(back.year(), 2025);
    }
}
