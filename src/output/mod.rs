mod format;
mod json;
mod table;

pub(crate) use format::NumberFormat;
pub(crate) use json::{AllViews, ordered, to_json};
pub(crate) use table::{
    TableOptions, print_daily_table, print_hourly_table, print_lifetime_table,
    print_monthly_table, print_yearly_table,
};
