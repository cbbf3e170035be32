use serde::Serialize;
use stepstats::{DayBucket, HourBucket, MonthBucket, SortOrder, ViewModel, YearBucket};

use crate::cli::AppError;

/// Views fetched together by `stepstats all`
#[derive(Debug, Serialize)]
pub(crate) struct AllViews {
    pub(crate) hourly: ViewModel<Vec<HourBucket>>,
    pub(crate) daily: ViewModel<Vec<DayBucket>>,
    pub(crate) monthly: ViewModel<Vec<MonthBucket>>,
    pub(crate) yearly: ViewModel<Vec<YearBucket>>,
}

impl AllViews {
    pub(crate) fn ordered(self, order: SortOrder) -> Self {
        Self {
            hourly: ordered(self.hourly, order),
            daily: ordered(self.daily, order),
            monthly: ordered(self.monthly, order),
            yearly: ordered(self.yearly, order),
        }
    }
}

/// Apply the presentation order to a list view. Positional step arrays
/// inside each entry stay chronological.
pub(crate) fn ordered<T>(mut view: ViewModel<Vec<T>>, order: SortOrder) -> ViewModel<Vec<T>> {
    if order == SortOrder::Desc {
        view.data.reverse();
    }
    view
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(value)?)
}
