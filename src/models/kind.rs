//! Transaction kinds

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The category of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TransactionKind {
    #[default]
    Buy,
    Sell,
    Deposit,
    Withdraw,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 4] = [
        TransactionKind::Buy,
        TransactionKind::Sell,
        TransactionKind::Deposit,
        TransactionKind::Withdraw,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
            Self::Deposit => "Deposit",
            Self::Withdraw => "Withdraw",
        }
    }

    /// Trades carry two legs, transfers carry one
    pub fn is_trade(&self) -> bool {
        matches!(self, Self::Buy | Self::Sell)
    }

    /// Next kind in display order, wrapping around
    pub fn next(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Deposit,
            Self::Deposit => Self::Withdraw,
            Self::Withdraw => Self::Buy,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Self::Buy => Self::Withdraw,
            Self::Sell => Self::Buy,
            Self::Deposit => Self::Sell,
            Self::Withdraw => Self::Deposit,
        }
    }

    /// Classify free-form exchange text such as `"Market Buy"` or `"Send"`
    ///
    /// Trade keywords are checked first, then transfer keywords. `receive`
    /// always means Deposit and `send` always means Withdraw. Anything
    /// unrecognised falls back to Buy.
    pub fn classify(text: &str) -> Self {
        let v = text.trim().to_lowercase();
        if v.contains("buy") {
            Self::Buy
        } else if v.contains("sell") {
            Self::Sell
        } else if v.contains("deposit") || v.contains("receive") {
            Self::Deposit
        } else if v.contains("withdraw") || v.contains("send") || v == "sent" {
            Self::Withdraw
        } else {
            Self::Buy
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            "deposit" => Ok(Self::Deposit),
            "withdraw" | "withdrawal" => Ok(Self::Withdraw),
            other => Err(format!(
                "unknown transaction kind '{}' (expected buy, sell, deposit or withdraw)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_trades() {
        assert_eq!(TransactionKind::classify("buy"), TransactionKind::Buy);
        assert_eq!(TransactionKind::classify("Market Buy"), TransactionKind::Buy);
        assert_eq!(TransactionKind::classify(" SELL "), TransactionKind::Sell);
    }

    #[test]
    fn test_classify_transfers_are_never_trades() {
        assert_eq!(TransactionKind::classify("Receive"), TransactionKind::Deposit);
        assert_eq!(TransactionKind::classify("received"), TransactionKind::Deposit);
        assert_eq!(TransactionKind::classify("Send"), TransactionKind::Withdraw);
        assert_eq!(TransactionKind::classify("sent"), TransactionKind::Withdraw);
        assert_eq!(TransactionKind::classify("Crypto Deposit"), TransactionKind::Deposit);
        assert_eq!(TransactionKind::classify("withdrawal"), TransactionKind::Withdraw);
    }

    #[test]
    fn test_classify_unknown_defaults_to_buy() {
        assert_eq!(TransactionKind::classify("???"), TransactionKind::Buy);
        assert_eq!(TransactionKind::classify(""), TransactionKind::Buy);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Deposit".parse::<TransactionKind>().unwrap(), TransactionKind::Deposit);
        assert_eq!("withdrawal".parse::<TransactionKind>().unwrap(), TransactionKind::Withdraw);
        assert!("swap".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn test_cycle() {
        let mut kind = TransactionKind::Buy;
        for _ in 0..4 {
            kind = kind.next();
        }
        assert_eq!(kind, TransactionKind::Buy);
        assert_eq!(TransactionKind::Buy.prev(), TransactionKind::Withdraw);
    }
}
