//! Demo transactions seeded by `coinlog init --sample`

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{Leg, Movement, Quantity, Transaction, TransactionKind};

struct Seed {
    exchange: &'static str,
    date: (i32, u32, u32),
    kind: TransactionKind,
    primary: (i64, i64, &'static str),
    secondary: Option<(i64, i64, &'static str)>,
    tag: Option<&'static str>,
    note: Option<&'static str>,
}

/// Amounts are (whole units, hundredths, currency)
const SEEDS: [Seed; 18] = [
    Seed {
        exchange: "Kraken",
        date: (2025, 1, 5),
        kind: TransactionKind::Deposit,
        primary: (10_000, 0, "USD"),
        secondary: None,
        tag: None,
        note: Some("Initial funding"),
    },
    Seed {
        exchange: "Binance",
        date: (2025, 1, 10),
        kind: TransactionKind::Deposit,
        primary: (5_000, 0, "USDT"),
        secondary: None,
        tag: None,
        note: None,
    },
    Seed {
        exchange: "Coinbase",
        date: (2025, 1, 15),
        kind: TransactionKind::Buy,
        primary: (0, 50, "BTC"),
        secondary: Some((21_500, 0, "USD")),
        tag: Some("DCA"),
        note: Some("Weekly Bitcoin DCA"),
    },
    Seed {
        exchange: "Binance",
        date: (2025, 1, 18),
        kind: TransactionKind::Buy,
        primary: (10, 0, "SOL"),
        secondary: Some((1_850, 0, "USDT")),
        tag: None,
        note: None,
    },
    Seed {
        exchange: "Coinbase",
        date: (2025, 1, 22),
        kind: TransactionKind::Buy,
        primary: (2, 0, "ETH"),
        secondary: Some((6_400, 0, "USD")),
        tag: None,
        note: None,
    },
    Seed {
        exchange: "Binance",
        date: (2025, 2, 1),
        kind: TransactionKind::Buy,
        primary: (5, 0, "BNB"),
        secondary: Some((1_525, 0, "USDT")),
        tag: Some("Long-term"),
        note: None,
    },
    Seed {
        exchange: "Kraken",
        date: (2025, 2, 5),
        kind: TransactionKind::Buy,
        primary: (1, 50, "ETH"),
        secondary: Some((4_800, 0, "USD")),
        tag: None,
        note: None,
    },
    Seed {
        exchange: "Kraken",
        date: (2025, 2, 6),
        kind: TransactionKind::Withdraw,
        primary: (1, 50, "ETH"),
        secondary: None,
        tag: None,
        note: Some("To cold wallet"),
    },
    Seed {
        exchange: "Coinbase",
        date: (2025, 2, 10),
        kind: TransactionKind::Sell,
        primary: (0, 25, "BTC"),
        secondary: Some((11_200, 0, "USD")),
        tag: None,
        note: Some("Taking profits"),
    },
    Seed {
        exchange: "KuCoin",
        date: (2025, 2, 15),
        kind: TransactionKind::Deposit,
        primary: (1, 0, "ETH"),
        secondary: None,
        tag: None,
        note: None,
    },
    Seed {
        exchange: "KuCoin",
        date: (2025, 2, 18),
        kind: TransactionKind::Buy,
        primary: (1_000, 0, "MATIC"),
        secondary: Some((850, 0, "USDT")),
        tag: Some("Altcoin"),
        note: None,
    },
    Seed {
        exchange: "Kraken",
        date: (2025, 2, 20),
        kind: TransactionKind::Buy,
        primary: (500, 0, "ADA"),
        secondary: Some((225, 0, "USD")),
        tag: Some("Altcoin"),
        note: None,
    },
    Seed {
        exchange: "Gemini",
        date: (2025, 3, 1),
        kind: TransactionKind::Buy,
        primary: (0, 10, "BTC"),
        secondary: Some((4_350, 0, "USD")),
        tag: Some("DCA"),
        note: None,
    },
    Seed {
        exchange: "Coinbase",
        date: (2025, 3, 5),
        kind: TransactionKind::Buy,
        primary: (100, 0, "LINK"),
        secondary: Some((1_580, 0, "USD")),
        tag: Some("Altcoin"),
        note: None,
    },
    Seed {
        exchange: "Gemini",
        date: (2025, 3, 10),
        kind: TransactionKind::Buy,
        primary: (50, 0, "DOT"),
        secondary: Some((375, 0, "USD")),
        tag: None,
        note: None,
    },
    Seed {
        exchange: "Binance",
        date: (2025, 3, 12),
        kind: TransactionKind::Sell,
        primary: (5, 0, "SOL"),
        secondary: Some((1_100, 0, "USDT")),
        tag: None,
        note: None,
    },
    Seed {
        exchange: "Binance",
        date: (2025, 3, 15),
        kind: TransactionKind::Withdraw,
        primary: (2_000, 0, "USDT"),
        secondary: None,
        tag: None,
        note: Some("To bank account"),
    },
    Seed {
        exchange: "KuCoin",
        date: (2025, 3, 20),
        kind: TransactionKind::Sell,
        primary: (500, 0, "MATIC"),
        secondary: Some((460, 0, "USDT")),
        tag: None,
        note: None,
    },
];

fn leg((whole, hundredths, currency): (i64, i64, &str)) -> Leg {
    let atoms = Quantity::from_units(whole).atoms() + Quantity::from_units(hundredths).atoms() / 100;
    Leg::new(Quantity::from_atoms(atoms), currency)
}

fn midnight((y, m, d): (i32, u32, u32)) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(y, m, d)?.and_hms_opt(0, 0, 0)
}

/// The eighteen demo transactions (January to March 2025)
pub fn sample_transactions() -> Vec<Transaction> {
    SEEDS
        .iter()
        .filter_map(|seed| {
            let date = midnight(seed.date)?;
            let movement =
                Movement::from_legs(seed.kind, Some(leg(seed.primary)), seed.secondary.map(leg));
            Some(
                Transaction::new(seed.exchange, date, movement)
                    .with_tag(seed.tag)
                    .with_note(seed.note),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_set() {
        let txns = sample_transactions();
        assert_eq!(txns.len(), 18);

        let dca = &txns[2];
        assert_eq!(dca.exchange, "Coinbase");
        assert_eq!(dca.movement.buy_leg().unwrap().display(), "0.50 BTC");
        assert_eq!(dca.movement.sell_leg().unwrap().display(), "21,500.00 USD");

        let withdrawals = txns
            .iter()
            .filter(|t| t.kind() == TransactionKind::Withdraw)
            .count();
        assert_eq!(withdrawals, 2);
    }
}
