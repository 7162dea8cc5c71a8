use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, error};

use crate::models::{ColumnSet, RecordError, Table, Transaction};
use crate::types::{Channel, Currency, CustomerSegment, ProductType};

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_ROWS: usize = 5000;
pub const DEFAULT_DAYS: u32 = 90;
pub const DEFAULT_START_DATE: NaiveDate = NaiveDate::from_ymd_opt(2025, 9, 1).expect("valid calendar date");

const CURRENCY_WEIGHTS: [(Currency, f64); 10] = [
    (Currency::Usd, 0.30),
    (Currency::Eur, 0.20),
    (Currency::Gbp, 0.15),
    (Currency::Inr, 0.10),
    (Currency::Jpy, 0.08),
    (Currency::Cad, 0.05),
    (Currency::Aud, 0.04),
    (Currency::Chf, 0.03),
    (Currency::Cny, 0.03),
    (Currency::Sgd, 0.02)
];

const MERCHANT_COUNTRIES: [&str; 12] = ["US", "UK", "DE", "FR", "IN", "JP", "CA", "AU", "SG", "CH", "CN", "NL"];
const MAX_CUSTOMER_ID: u32 = 500;
const MAX_FX_JITTER: f64 = 0.02;
const AMOUNT_DECIMAL_PLACES: u32 = 2;
const FX_RATE_DECIMAL_PLACES: u32 = 6;

/// Reference rate converting one unit of `currency` into USD.
pub fn base_fx_rate(currency: Currency) -> f64 {
    match currency {
        Currency::Usd => 1.00,
        Currency::Eur => 1.08,
        Currency::Gbp => 1.27,
        Currency::Inr => 0.012,
        Currency::Jpy => 0.0067,
        Currency::Cad => 0.74,
        Currency::Aud => 0.65,
        Currency::Chf => 1.13,
        Currency::Cny => 0.14,
        Currency::Sgd => 0.74
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub rows: usize,
    pub start_date: NaiveDate,
    pub days: u32
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            rows: DEFAULT_ROWS,
            start_date: DEFAULT_START_DATE,
            days: DEFAULT_DAYS
        }
    }
}

/// Produces `rows` synthetic transactions over the default 90-day window. Deterministic for a given seed.
pub fn generate(seed: u64, rows: usize) -> Table {
    SyntheticGenerator::new(GeneratorConfig { seed, rows, ..GeneratorConfig::default() }).generate()
}

/// Deterministic generator of self-consistent sample transactions.
pub struct SyntheticGenerator {
    config: GeneratorConfig,
    rng: StdRng
}

impl SyntheticGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    pub fn generate(mut self) -> Table {
        let records: Vec<Transaction> = (1..=self.config.rows)
            .filter_map(|index| match self.next_transaction(index) {
                Ok(transaction) => Some(transaction),
                Err(error) => {
                    error!("Skipping synthetic transaction {index}: {error}");
                    None
                }
            })
            .collect();

        debug!("Generated {} synthetic transactions with seed {}", records.len(), self.config.seed);

        Table::new(ColumnSet::full(), records)
    }

    fn next_transaction(&mut self, index: usize) -> Result<Transaction, RecordError> {
        let days = self.config.days.max(1);
        let day_offset = self.rng.gen_range(0..days);
        let txn_date = self.config.start_date
            .checked_add_days(Days::new(u64::from(day_offset)))
            .unwrap_or(self.config.start_date);

        let currency = self.pick_currency();
        let product_type = ProductType::ALL[self.rng.gen_range(0..ProductType::ALL.len())];
        let amount = self.generate_amount(product_type);

        //NOTE: Jitter grows with elapsed time so each currency's rate drifts across the window
        let elapsed = f64::from(day_offset) / f64::from(days);
        let variation = 1.0 + self.rng.gen_range(-MAX_FX_JITTER..MAX_FX_JITTER) * elapsed;
        let fx_rate = to_decimal(base_fx_rate(currency) * variation, FX_RATE_DECIMAL_PLACES);

        let mut transaction = Transaction::converted(format!("TXN{:07}", index), currency, amount, fx_rate)?;
        transaction.customer_id = Some(format!("C{:05}", self.rng.gen_range(1..=MAX_CUSTOMER_ID)));
        transaction.txn_date = Some(txn_date);
        transaction.product_type = Some(product_type);
        transaction.merchant_country = Some(MERCHANT_COUNTRIES[self.rng.gen_range(0..MERCHANT_COUNTRIES.len())].to_string());
        transaction.channel = Some(Channel::ALL[self.rng.gen_range(0..Channel::ALL.len())]);
        transaction.customer_segment = Some(CustomerSegment::ALL[self.rng.gen_range(0..CustomerSegment::ALL.len())]);

        Ok(transaction)
    }

    fn pick_currency(&mut self) -> Currency {
        let roll: f64 = self.rng.r#gen();
        let mut cumulative = 0.0;

        for (currency, weight) in CURRENCY_WEIGHTS {
            cumulative += weight;

            if roll < cumulative {
                return currency;
            }
        }

        Currency::Sgd
    }

    fn generate_amount(&mut self, product_type: ProductType) -> Decimal {
        let amount = match product_type {
            ProductType::Ecom => self.rng.gen_range(10.0..500.0),
            ProductType::Retail => self.rng.gen_range(5.0..200.0),
            ProductType::Subscription => {
                let prices = [999, 1499, 1999, 2999, 4999, 9999];
                return Decimal::new(prices[self.rng.gen_range(0..prices.len())], AMOUNT_DECIMAL_PLACES);
            }
            ProductType::Travel => self.rng.gen_range(100.0..5000.0),
            ProductType::Forex => self.rng.gen_range(500.0..50000.0),
            ProductType::Remittance => self.rng.gen_range(100.0..10000.0),
            ProductType::Investment => self.rng.gen_range(1000.0..100000.0)
        };

        to_decimal(amount, AMOUNT_DECIMAL_PLACES)
    }
}

fn to_decimal(value: f64, places: u32) -> Decimal {
    Decimal::from_f64(value)
        .map(|decimal| decimal.round_dp(places))
        .unwrap_or(Decimal::ZERO)
}
