use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

/// The recognized columns of a transaction CSV. Header names are matched
/// exactly (after trimming); anything else in the file is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Column {
    Customer,
    Date,
    Amount,
    Service,
    Product,
    Detail,
    State,
    City,
}

impl Column {
    pub fn all() -> &'static [Column] {
        &[
            Self::Customer,
            Self::Date,
            Self::Amount,
            Self::Service,
            Self::Product,
            Self::Detail,
            Self::State,
            Self::City,
        ]
    }

    /// The header name this column carries in the CSV.
    pub fn header(&self) -> &'static str {
        match self {
            Self::Customer => "cust_id",
            Self::Date => "t_date",
            Self::Amount => "t_amt",
            Self::Service => "services",
            Self::Product => "products_used",
            Self::Detail => "t_details",
            Self::State => "state",
            Self::City => "city",
        }
    }

    pub fn from_header(name: &str) -> Option<Column> {
        Column::all().iter().copied().find(|c| c.header() == name)
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.header())
    }
}

/// One CSV row. Every field is optional: a cell can be empty or fail to
/// parse, and a column can be missing from the file entirely. Aggregations
/// decide per-report how absent values are treated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub customer: Option<String>,
    pub date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub service: Option<String>,
    pub product: Option<String>,
    pub detail: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
}

impl Record {
    /// Calendar-month bucket key, e.g. "2024-03". Sorts chronologically.
    pub fn month_key(&self) -> Option<String> {
        self.date.map(|d| d.format("%Y-%m").to_string())
    }

    /// Calendar-quarter bucket key, e.g. "2024Q1". Sorts chronologically.
    pub fn quarter_key(&self) -> Option<String> {
        self.date
            .map(|d| format!("{}Q{}", d.year(), (d.month0() / 3) + 1))
    }

    /// Month number 1-12, merging the same month across years.
    pub fn month_of_year(&self) -> Option<u32> {
        self.date.map(|d| d.month())
    }
}
