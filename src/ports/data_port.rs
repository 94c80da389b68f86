//! Market data access port trait.

use crate::domain::error::StratlabError;
use crate::domain::price_series::PriceSeries;
use chrono::NaiveDate;

pub trait PriceDataPort {
    /// Adjusted closes for `ticker` within `[start_date, end_date]`, ordered by date.
    /// An empty series is a valid answer; callers decide whether it is an error.
    fn fetch_prices(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, StratlabError>;

    fn list_tickers(&self) -> Result<Vec<String>, StratlabError>;
}
