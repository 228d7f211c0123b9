use serde::{Deserialize, Serialize};

/// A decoded price together with the "last updated" text shown next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceQuote {
    pub price: String,
    pub updated: Option<String>,
}

/// One station page, one record. Every field is always present; data the
/// page does not publish is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationRecord {
    pub url: String,
    pub name: String,
    pub address: String,
    pub cross_street: Option<String>,
    pub phone: Option<String>,
    pub accepts_cash_credit_split: bool,
    pub regular_cash: Option<PriceQuote>,
    pub regular_credit: Option<PriceQuote>,
    pub premium_cash: Option<PriceQuote>,
    pub premium_credit: Option<PriceQuote>,
}

impl StationRecord {
    pub fn new(url: impl Into<String>, name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            address: address.into(),
            cross_street: None,
            phone: None,
            accepts_cash_credit_split: false,
            regular_cash: None,
            regular_credit: None,
            premium_cash: None,
            premium_credit: None,
        }
    }
}

/// Flat, fixed-width form of a [`StationRecord`] written by the sinks.
/// Column order follows the legacy station table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationRow {
    pub url: String,
    pub name: String,
    pub address: String,
    pub cross_street: Option<String>,
    pub phone: Option<String>,
    pub cash_credit: bool,
    pub regular_cash: Option<String>,
    pub regular_cash_time: Option<String>,
    pub premium_cash: Option<String>,
    pub premium_cash_time: Option<String>,
    pub regular_credit: Option<String>,
    pub regular_credit_time: Option<String>,
    pub premium_credit: Option<String>,
    pub premium_credit_time: Option<String>,
}

fn split_quote(quote: &Option<PriceQuote>) -> (Option<String>, Option<String>) {
    match quote {
        Some(quote) => (Some(quote.price.clone()), quote.updated.clone()),
        None => (None, None),
    }
}

// A time with no price beside it is dropped.
fn join_quote(price: Option<String>, updated: Option<String>) -> Option<PriceQuote> {
    price.map(|price| PriceQuote { price, updated })
}

impl From<&StationRecord> for StationRow {
    fn from(record: &StationRecord) -> Self {
        let (regular_cash, regular_cash_time) = split_quote(&record.regular_cash);
        let (premium_cash, premium_cash_time) = split_quote(&record.premium_cash);
        let (regular_credit, regular_credit_time) = split_quote(&record.regular_credit);
        let (premium_credit, premium_credit_time) = split_quote(&record.premium_credit);
        Self {
            url: record.url.clone(),
            name: record.name.clone(),
            address: record.address.clone(),
            cross_street: record.cross_street.clone(),
            phone: record.phone.clone(),
            cash_credit: record.accepts_cash_credit_split,
            regular_cash,
            regular_cash_time,
            premium_cash,
            premium_cash_time,
            regular_credit,
            regular_credit_time,
            premium_credit,
            premium_credit_time,
        }
    }
}

impl From<StationRow> for StationRecord {
    fn from(row: StationRow) -> Self {
        Self {
            url: row.url,
            name: row.name,
            address: row.address,
            cross_street: row.cross_street,
            phone: row.phone,
            accepts_cash_credit_split: row.cash_credit,
            regular_cash: join_quote(row.regular_cash, row.regular_cash_time),
            regular_credit: join_quote(row.regular_credit, row.regular_credit_time),
            premium_cash: join_quote(row.premium_cash, row.premium_cash_time),
            premium_credit: join_quote(row.premium_credit, row.premium_credit_time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_empty() {
        let record = StationRecord::new("http://x/1", "ARCO", "1 Main St");
        assert_eq!(record.cross_street, None);
        assert_eq!(record.phone, None);
        assert!(!record.accepts_cash_credit_split);
        assert!(record.regular_cash.is_none());
        assert!(record.regular_credit.is_none());
        assert!(record.premium_cash.is_none());
        assert!(record.premium_credit.is_none());
    }

    #[test]
    fn test_row_conversion() {
        let mut record = StationRecord::new("http://x/1", "ARCO", "1 Main St, Los Angeles, CA");
        record.phone = Some("(323) 555-0100".to_string());
        record.accepts_cash_credit_split = true;
        record.regular_cash = Some(PriceQuote {
            price: "3.79".to_string(),
            updated: Some("2 hours ago".to_string()),
        });
        record.premium_credit = Some(PriceQuote {
            price: "4.09".to_string(),
            updated: None,
        });

        let row = StationRow::from(&record);
        assert_eq!(row.regular_cash.as_deref(), Some("3.79"));
        assert_eq!(row.regular_cash_time.as_deref(), Some("2 hours ago"));
        assert_eq!(row.premium_credit.as_deref(), Some("4.09"));
        assert_eq!(row.premium_credit_time, None);
        assert_eq!(row.regular_credit, None);
        assert!(row.cash_credit);

        assert_eq!(StationRecord::from(row), record);
    }

    #[test]
    fn test_orphan_time_is_dropped() {
        let mut row = StationRow::from(&StationRecord::new("u", "n", "a"));
        row.premium_cash_time = Some("yesterday".to_string());
        assert_eq!(StationRecord::from(row).premium_cash, None);
    }
}
