mod errors;
#[cfg(test)]
mod tests;

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::Serialize;

pub use errors::ParseCategoryError;

pub const BASE_CURRENCY: &str = "USD";

/// Currency codes a transaction may be denominated in.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Inr,
    Jpy,
    Cad,
    Aud,
    Chf,
    Cny,
    Sgd
}

impl Currency {
    pub const ALL: [Currency; 10] = [
        Currency::Usd, Currency::Eur, Currency::Gbp, Currency::Inr, Currency::Jpy,
        Currency::Cad, Currency::Aud, Currency::Chf, Currency::Cny, Currency::Sgd
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Inr => "INR",
            Currency::Jpy => "JPY",
            Currency::Cad => "CAD",
            Currency::Aud => "AUD",
            Currency::Chf => "CHF",
            Currency::Cny => "CNY",
            Currency::Sgd => "SGD"
        }
    }
}

impl Display for Currency {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ParseCategoryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        Currency::ALL.into_iter()
            .find(|currency| currency.code().eq_ignore_ascii_case(value))
            .ok_or_else(|| ParseCategoryError::unknown("currency", value))
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductType {
    Ecom,
    Retail,
    Subscription,
    Travel,
    Forex,
    Remittance,
    Investment
}

impl ProductType {
    pub const ALL: [ProductType; 7] = [
        ProductType::Ecom, ProductType::Retail, ProductType::Subscription, ProductType::Travel,
        ProductType::Forex, ProductType::Remittance, ProductType::Investment
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ProductType::Ecom => "ECOM",
            ProductType::Retail => "RETAIL",
            ProductType::Subscription => "SUBSCRIPTION",
            ProductType::Travel => "TRAVEL",
            ProductType::Forex => "FOREX",
            ProductType::Remittance => "REMITTANCE",
            ProductType::Investment => "INVESTMENT"
        }
    }
}

impl Display for ProductType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.code())
    }
}

impl FromStr for ProductType {
    type Err = ParseCategoryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        ProductType::ALL.into_iter()
            .find(|product| product.code().eq_ignore_ascii_case(value))
            .ok_or_else(|| ParseCategoryError::unknown("product type", value))
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Channel {
    Online,
    Pos,
    Mobile,
    Atm,
    Wire
}

impl Channel {
    pub const ALL: [Channel; 5] = [Channel::Online, Channel::Pos, Channel::Mobile, Channel::Atm, Channel::Wire];

    pub fn code(&self) -> &'static str {
        match self {
            Channel::Online => "ONLINE",
            Channel::Pos => "POS",
            Channel::Mobile => "MOBILE",
            Channel::Atm => "ATM",
            Channel::Wire => "WIRE"
        }
    }
}

impl Display for Channel {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.code())
    }
}

impl FromStr for Channel {
    type Err = ParseCategoryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        Channel::ALL.into_iter()
            .find(|channel| channel.code().eq_ignore_ascii_case(value))
            .ok_or_else(|| ParseCategoryError::unknown("channel", value))
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CustomerSegment {
    Retail,
    Premium,
    Corporate,
    Smb
}

impl CustomerSegment {
    pub const ALL: [CustomerSegment; 4] = [
        CustomerSegment::Retail, CustomerSegment::Premium, CustomerSegment::Corporate, CustomerSegment::Smb
    ];

    pub fn code(&self) -> &'static str {
        match self {
            CustomerSegment::Retail => "RETAIL",
            CustomerSegment::Premium => "PREMIUM",
            CustomerSegment::Corporate => "CORPORATE",
            CustomerSegment::Smb => "SMB"
        }
    }
}

impl Display for CustomerSegment {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.code())
    }
}

impl FromStr for CustomerSegment {
    type Err = ParseCategoryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        CustomerSegment::ALL.into_iter()
            .find(|segment| segment.code().eq_ignore_ascii_case(value))
            .ok_or_else(|| ParseCategoryError::unknown("customer segment", value))
    }
}

/// The known columns of a unified table, declared in export order.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Column {
    TxnId,
    CustomerId,
    TxnDate,
    Amount,
    Currency,
    FxRate,
    AmountUsd,
    BaseCurrency,
    ProductType,
    Channel,
    MerchantCountry,
    CustomerSegment
}

impl Column {
    pub const ALL: [Column; 12] = [
        Column::TxnId, Column::CustomerId, Column::TxnDate, Column::Amount, Column::Currency,
        Column::FxRate, Column::AmountUsd, Column::BaseCurrency, Column::ProductType,
        Column::Channel, Column::MerchantCountry, Column::CustomerSegment
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Column::TxnId => "txn_id",
            Column::CustomerId => "customer_id",
            Column::TxnDate => "txn_date",
            Column::Amount => "amount",
            Column::Currency => "currency",
            Column::FxRate => "fx_rate",
            Column::AmountUsd => "amount_usd",
            Column::BaseCurrency => "base_currency",
            Column::ProductType => "product_type",
            Column::Channel => "channel",
            Column::MerchantCountry => "merchant_country",
            Column::CustomerSegment => "customer_segment"
        }
    }

    /// Resolves a source header to a known column. Unknown headers yield `None`.
    pub fn from_header(header: &str) -> Option<Column> {
        let header = header.trim();
        Column::ALL.into_iter().find(|column| column.name() == header)
    }
}

impl Display for Column {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}
