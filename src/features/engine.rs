//! Feature builder

use super::indicators::{pct_change, sma};
use crate::data::{FeaturedRow, FeaturedSeries, RawSeries};
use tracing::debug;

/// Short moving-average window
pub const SHORT_MA_PERIOD: usize = 5;

/// Long moving-average window
pub const LONG_MA_PERIOD: usize = 10;

/// Derive daily return and the 5/10 row moving averages of adjusted close,
/// then drop every row holding a missing or non-finite value.
///
/// Indicators are computed over the raw rows first, so a missing value in the
/// source also invalidates the windows that span it. At least the first
/// `LONG_MA_PERIOD - 1` rows are always dropped.
pub fn build_features(series: &RawSeries) -> FeaturedSeries {
    let closes = series.adj_closes();

    let returns = pct_change(&closes);
    let ma_short = sma(&closes, SHORT_MA_PERIOD);
    let ma_long = sma(&closes, LONG_MA_PERIOD);

    let rows: Vec<FeaturedRow> = series
        .bars()
        .iter()
        .enumerate()
        .map(|(i, bar)| FeaturedRow {
            bar: *bar,
            daily_return: returns[i],
            ma_5: ma_short[i],
            ma_10: ma_long[i],
        })
        .filter(FeaturedRow::is_complete)
        .collect();

    debug!(
        ticker = series.ticker(),
        raw = series.len(),
        kept = rows.len(),
        "Built features"
    );

    FeaturedSeries::new(series.ticker(), rows)
}
