use super::{Channel, Column, Currency, CustomerSegment, ParseCategoryError, ProductType};
use anyhow::Result;
use std::str::FromStr;

#[test]
fn test_currency_parses_codes_case_insensitively() -> Result<()> {
    let test_cases = vec![
        ("USD", Currency::Usd),
        ("eur", Currency::Eur),
        ("  JPY ", Currency::Jpy),
        ("Sgd", Currency::Sgd),
    ];

    for (input, expected) in test_cases {
        assert_eq!(Currency::from_str(input)?, expected);
    }

    Ok(())
}

#[test]
fn test_currency_rejects_unknown_codes() {
    assert_eq!(
        Currency::from_str("XAU"),
        Err(ParseCategoryError::UnknownCode { kind: "currency", value: "XAU".to_string() })
    );
    assert!(Currency::from_str("").is_err());
}

#[test]
fn test_categories_display_their_upper_case_codes() {
    assert_eq!(Currency::Chf.to_string(), "CHF");
    assert_eq!(ProductType::Remittance.to_string(), "REMITTANCE");
    assert_eq!(Channel::Atm.to_string(), "ATM");
    assert_eq!(CustomerSegment::Smb.to_string(), "SMB");
}

#[test]
fn test_every_category_code_parses_back_to_itself() -> Result<()> {
    for product in ProductType::ALL {
        assert_eq!(ProductType::from_str(product.code())?, product);
    }

    for channel in Channel::ALL {
        assert_eq!(Channel::from_str(channel.code())?, channel);
    }

    for segment in CustomerSegment::ALL {
        assert_eq!(CustomerSegment::from_str(segment.code())?, segment);
    }

    Ok(())
}

#[test]
fn test_column_resolves_known_headers_only() {
    assert_eq!(Column::from_header("amount_usd"), Some(Column::AmountUsd));
    assert_eq!(Column::from_header(" currency "), Some(Column::Currency));
    assert_eq!(Column::from_header("fx_rate_missing"), None);
    assert_eq!(Column::from_header("txn_ts"), None);
}

#[test]
fn test_column_order_follows_export_order() {
    let mut shuffled = vec![Column::CustomerSegment, Column::AmountUsd, Column::TxnId, Column::Currency];
    shuffled.sort();

    assert_eq!(shuffled, vec![Column::TxnId, Column::Currency, Column::AmountUsd, Column::CustomerSegment]);
}
