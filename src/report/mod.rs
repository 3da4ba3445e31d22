mod aggregate;
mod recipes;

use anyhow::Result;
use rust_decimal::Decimal;

use crate::models::Dataset;

/// The fixed menu of reports. Each variant maps to one pure aggregation
/// over the loaded dataset; selecting one computes it from scratch, with
/// no state carried between selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    TotalSales,
    HighestSalesMonth,
    AvgPerCustomer,
    MonthlySalesTrend,
    HighestTransaction,
    TopServiceRevenue,
    TopProductRevenue,
    AvgPerService,
    UniqueCustomers,
    TopCustomers,
    AvgTransactionsPerCustomer,
    MultiServiceCustomers,
    RepeatBuyerShare,
    TopProductCategory,
    PopularServices,
    TopProductPerService,
    AvgPerProduct,
    HighSpendServices,
    TopState,
    TopCity,
    AvgPerState,
    ServicesByState,
    OutdoorStates,
    CaliforniaVsTexas,
    HighestSalesQuarter,
    MonthlySalesVariation,
    MonthlyTransactionCounts,
    SportsSeasonalTrend,
    CreditCount,
    CreditRevenue,
    CreditVsDebit,
    HighValueStates,
    ExerciseFitnessSales,
    HighSalesLowAvg,
    UnderperformingServices,
}

impl ReportKind {
    pub fn all() -> &'static [ReportKind] {
        &[
            Self::TotalSales,
            Self::HighestSalesMonth,
            Self::AvgPerCustomer,
            Self::MonthlySalesTrend,
            Self::HighestTransaction,
            Self::TopServiceRevenue,
            Self::TopProductRevenue,
            Self::AvgPerService,
            Self::UniqueCustomers,
            Self::TopCustomers,
            Self::AvgTransactionsPerCustomer,
            Self::MultiServiceCustomers,
            Self::RepeatBuyerShare,
            Self::TopProductCategory,
            Self::PopularServices,
            Self::TopProductPerService,
            Self::AvgPerProduct,
            Self::HighSpendServices,
            Self::TopState,
            Self::TopCity,
            Self::AvgPerState,
            Self::ServicesByState,
            Self::OutdoorStates,
            Self::CaliforniaVsTexas,
            Self::HighestSalesQuarter,
            Self::MonthlySalesVariation,
            Self::MonthlyTransactionCounts,
            Self::SportsSeasonalTrend,
            Self::CreditCount,
            Self::CreditRevenue,
            Self::CreditVsDebit,
            Self::HighValueStates,
            Self::ExerciseFitnessSales,
            Self::HighSalesLowAvg,
            Self::UnderperformingServices,
        ]
    }

    /// Display name, exactly as it appears in the report menu.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TotalSales => "Total Sales Amount",
            Self::HighestSalesMonth => "Month with Highest Total Sales",
            Self::AvgPerCustomer => "Average Transaction Amount per Customer",
            Self::MonthlySalesTrend => "Trend of Total Sales Over Months",
            Self::HighestTransaction => "Highest Single Transaction Amount",
            Self::TopServiceRevenue => "Top Revenue Service Category",
            Self::TopProductRevenue => "Top Revenue Product",
            Self::AvgPerService => "Average Transaction Amount per Service",
            Self::UniqueCustomers => "Unique Customers Count",
            Self::TopCustomers => "Top Spending Customers",
            Self::AvgTransactionsPerCustomer => "Average Number of Transactions per Customer",
            Self::MultiServiceCustomers => "Customers in Multiple Service Categories",
            Self::RepeatBuyerShare => "Percentage of Repeat Buyers",
            Self::TopProductCategory => "Product Category with Highest Total Sales",
            Self::PopularServices => "Most Popular Services (by Transaction Count)",
            Self::TopProductPerService => "Most Purchased Product per Service",
            Self::AvgPerProduct => "Average Transaction per Product Type",
            Self::HighSpendServices => "High-Spend Services (Above Avg)",
            Self::TopState => "State with Highest Total Sales",
            Self::TopCity => "City with Highest Transactions",
            Self::AvgPerState => "Average Spending per State",
            Self::ServicesByState => "Popular Services by State",
            Self::OutdoorStates => "States Buying Most Outdoor Recreation Products",
            Self::CaliforniaVsTexas => "Compare Spending: California vs Texas",
            Self::HighestSalesQuarter => "Quarter with Highest Sales",
            Self::MonthlySalesVariation => "Month-wise Total Sales Variation",
            Self::MonthlyTransactionCounts => "Total Transactions per Month",
            Self::SportsSeasonalTrend => "Sports Equipment Seasonal Trend",
            Self::CreditCount => "Transactions Done Using Credit",
            Self::CreditRevenue => "Revenue from Credit Transactions",
            Self::CreditVsDebit => "Credit vs Debit Avg Spending",
            Self::HighValueStates => "Top States/Cities for High-Value Marketing",
            Self::ExerciseFitnessSales => "Exercise & Fitness Inventory Check",
            Self::HighSalesLowAvg => "High Sales but Low Avg Value Categories",
            Self::UnderperformingServices => "Underperforming Service Categories",
        }
    }

    /// Look a report up by its menu name, case-insensitively.
    pub fn parse(s: &str) -> Option<ReportKind> {
        let wanted = s.trim();
        ReportKind::all()
            .iter()
            .copied()
            .find(|r| r.name().eq_ignore_ascii_case(wanted))
    }

    /// Compute this report against the dataset. The only failure modes
    /// are a missing column and (unreachably, with the fixed patterns) a
    /// bad filter pattern; undefined numeric results come back as values.
    pub fn run(&self, data: &Dataset) -> Result<ReportOutput> {
        match self {
            Self::TotalSales => recipes::total_sales(data),
            Self::HighestSalesMonth => recipes::highest_sales_month(data),
            Self::AvgPerCustomer => recipes::avg_per_customer(data),
            Self::MonthlySalesTrend => recipes::monthly_sales_trend(data),
            Self::HighestTransaction => recipes::highest_transaction(data),
            Self::TopServiceRevenue => recipes::top_service_revenue(data),
            Self::TopProductRevenue => recipes::top_product_revenue(data),
            Self::AvgPerService => recipes::avg_per_service(data),
            Self::UniqueCustomers => recipes::unique_customers(data),
            Self::TopCustomers => recipes::top_customers(data),
            Self::AvgTransactionsPerCustomer => recipes::avg_transactions_per_customer(data),
            Self::MultiServiceCustomers => recipes::multi_service_customers(data),
            Self::RepeatBuyerShare => recipes::repeat_buyer_share(data),
            Self::TopProductCategory => recipes::top_product_category(data),
            Self::PopularServices => recipes::popular_services(data),
            Self::TopProductPerService => recipes::top_product_per_service(data),
            Self::AvgPerProduct => recipes::avg_per_product(data),
            Self::HighSpendServices => recipes::high_spend_services(data),
            Self::TopState => recipes::top_state(data),
            Self::TopCity => recipes::top_city(data),
            Self::AvgPerState => recipes::avg_per_state(data),
            Self::ServicesByState => recipes::services_by_state(data),
            Self::OutdoorStates => recipes::outdoor_states(data),
            Self::CaliforniaVsTexas => recipes::california_vs_texas(data),
            Self::HighestSalesQuarter => recipes::highest_sales_quarter(data),
            Self::MonthlySalesVariation => recipes::monthly_sales_variation(data),
            Self::MonthlyTransactionCounts => recipes::monthly_transaction_counts(data),
            Self::SportsSeasonalTrend => recipes::sports_seasonal_trend(data),
            Self::CreditCount => recipes::credit_count(data),
            Self::CreditRevenue => recipes::credit_revenue(data),
            Self::CreditVsDebit => recipes::credit_vs_debit(data),
            Self::HighValueStates => recipes::high_value_states(data),
            Self::ExerciseFitnessSales => recipes::exercise_fitness_sales(data),
            Self::HighSalesLowAvg => recipes::high_sales_low_avg(data),
            Self::UnderperformingServices => recipes::underperforming_services(data),
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One computed value. `Undefined` stands in for divisions by zero and
/// means over empty sets; it renders as "NaN" instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Amount(Decimal),
    Count(u64),
    Percent(Decimal),
    Text(String),
    Undefined,
}

impl Scalar {
    pub fn render(&self) -> String {
        match self {
            Self::Amount(v) => crate::ui::util::format_amount(*v),
            Self::Count(n) => n.to_string(),
            Self::Percent(p) => format!("{p:.2}%"),
            Self::Text(s) => s.clone(),
            Self::Undefined => "NaN".into(),
        }
    }
}

/// What a report produces, shaped by how it is displayed: a single
/// labeled value, ranked bars, a time series, a small table, or a plain
/// list of names. All are read-only projections of the dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutput {
    Metric {
        label: String,
        value: Scalar,
    },
    /// `None` values are undefined aggregates; they render as NaN with an
    /// empty bar.
    Bars {
        title: String,
        rows: Vec<(String, Option<Decimal>)>,
    },
    Series {
        title: String,
        points: Vec<(String, Decimal)>,
    },
    Table {
        title: String,
        columns: Vec<&'static str>,
        rows: Vec<Vec<String>>,
    },
    Names {
        title: String,
        items: Vec<String>,
    },
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
