use chrono::{Datelike, NaiveDate, NaiveTime};
use comfy_table::{Cell, Color, Table};
use stepstats::{
    DayBucket, Granularity, HourBucket, LifetimeSeries, MonthBucket, Origin, SortOrder, ViewModel,
    YearBucket,
};

use crate::output::format::{
    NumberFormat, bar, create_styled_table, format_number, header_cell, in_order, right_cell,
    styled_cell,
};

#[derive(Debug, Clone, Copy)]
pub(crate) struct TableOptions {
    pub(crate) order: SortOrder,
    pub(crate) use_color: bool,
    pub(crate) number_format: NumberFormat,
}

/// One table row: group label (first row of a group only), unit label, steps
struct Row {
    group: String,
    unit: String,
    steps: u64,
}

fn unit_label(granularity: Granularity, date: Option<NaiveDate>, hour: u32) -> String {
    date.zip(NaiveTime::from_hms_opt(hour, 0, 0))
        .map(|(d, t)| granularity.unit_label(d.and_time(t)))
        .unwrap_or_default()
}

fn build_table(
    group_label: Option<&str>,
    unit_label: &str,
    rows: &[Row],
    opts: &TableOptions,
) -> Table {
    let c = opts.use_color;
    let mut table = create_styled_table();

    let mut header = Vec::new();
    if let Some(label) = group_label {
        header.push(header_cell(label, c));
    }
    header.extend([
        header_cell(unit_label, c),
        header_cell("Steps", c),
        header_cell("", c),
    ]);
    table.set_header(header);

    let max = rows.iter().map(|r| r.steps).max().unwrap_or(0);
    let bar_color = if c { Some(Color::Green) } else { None };
    for row in rows {
        let mut cells = Vec::new();
        if group_label.is_some() {
            cells.push(Cell::new(&row.group));
        }
        cells.extend([
            Cell::new(&row.unit),
            right_cell(&format_number(row.steps, opts.number_format), None, false),
            styled_cell(&bar(row.steps, max), bar_color, false),
        ]);
        table.add_row(cells);
    }

    let cyan = if c { Some(Color::Cyan) } else { None };
    let total: u64 = rows.iter().map(|r| r.steps).sum();
    let mut total_row = vec![styled_cell("TOTAL", cyan, true)];
    if group_label.is_some() {
        total_row.push(Cell::new(""));
    }
    total_row.extend([
        right_cell(&format_number(total, opts.number_format), cyan, true),
        Cell::new(""),
    ]);
    table.add_row(total_row);
    table
}

fn print_table(title: &str, table: &Table, origin: Origin, use_color: bool) {
    println!("\n  {title}\n");
    println!("{table}");
    if origin == Origin::Synthetic {
        let note = "No step samples found, showing synthetic data";
        if use_color {
            println!("\n  \x1b[33m{note}\x1b[0m\n");
        } else {
            println!("\n  {note}\n");
        }
    } else {
        println!();
    }
}

/// Push grouped rows, labelling only the first row of each group
fn push_group(rows: &mut Vec<Row>, group: String, units: Vec<(String, u64)>) {
    for (i, (unit, steps)) in units.into_iter().enumerate() {
        rows.push(Row {
            group: if i == 0 { group.clone() } else { String::new() },
            unit,
            steps,
        });
    }
}

pub(crate) fn print_hourly_table(
    view: &ViewModel<Vec<HourBucket>>,
    date: NaiveDate,
    opts: TableOptions,
) {
    let rows: Vec<Row> = in_order(&view.data, opts.order)
        .into_iter()
        .map(|b| Row {
            group: String::new(),
            unit: unit_label(Granularity::Hour, Some(date), b.hour),
            steps: b.steps,
        })
        .collect();
    let title = format!(
        "Hourly Steps, {}",
        Granularity::Day.period_label(date.and_time(NaiveTime::MIN))
    );
    let table = build_table(None, "Hour", &rows, &opts);
    print_table(&title, &table, view.origin, opts.use_color);
}

pub(crate) fn print_daily_table(view: &ViewModel<Vec<DayBucket>>, opts: TableOptions) {
    let c = opts.use_color;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Date", c),
        header_cell("Peak Hour", c),
        header_cell("Steps", c),
        header_cell("", c),
    ]);

    let days = in_order(&view.data, opts.order);
    let max = days.iter().map(|d| d.total()).max().unwrap_or(0);
    let bar_color = if c { Some(Color::Green) } else { None };
    for day in &days {
        let total = day.total();
        let peak = day
            .steps
            .iter()
            .enumerate()
            .filter(|(_, steps)| **steps > 0)
            .max_by_key(|(hour, steps)| (**steps, std::cmp::Reverse(*hour)))
            .map(|(hour, _)| unit_label(Granularity::Hour, Some(day.date), hour as u32))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(Granularity::Day.period_label(day.date.and_time(NaiveTime::MIN))),
            Cell::new(peak),
            right_cell(&format_number(total, opts.number_format), None, false),
            styled_cell(&bar(total, max), bar_color, false),
        ]);
    }

    let cyan = if c { Some(Color::Cyan) } else { None };
    let total: u64 = days.iter().map(|d| d.total()).sum();
    table.add_row(vec![
        styled_cell("TOTAL", cyan, true),
        Cell::new(""),
        right_cell(&format_number(total, opts.number_format), cyan, true),
        Cell::new(""),
    ]);

    print_table("Daily Steps", &table, view.origin, c);
}

pub(crate) fn print_monthly_table(view: &ViewModel<Vec<MonthBucket>>, opts: TableOptions) {
    let mut rows = Vec::new();
    for month in in_order(&view.data, opts.order) {
        let days: Vec<(String, u64)> = month
            .steps
            .iter()
            .enumerate()
            .map(|(i, steps)| {
                let date = month.start.with_day0(i as u32);
                (unit_label(Granularity::Day, date, 0), *steps)
            })
            .collect();
        push_group(&mut rows, month.month.clone(), in_order_owned(days, opts.order));
    }
    let table = build_table(Some("Month"), "Day", &rows, &opts);
    print_table("Monthly Steps", &table, view.origin, opts.use_color);
}

pub(crate) fn print_yearly_table(view: &ViewModel<Vec<YearBucket>>, opts: TableOptions) {
    let mut rows = Vec::new();
    for year in in_order(&view.data, opts.order) {
        let months: Vec<(String, u64)> = year
            .steps
            .iter()
            .enumerate()
            .map(|(i, steps)| {
                let date = NaiveDate::from_ymd_opt(year.year, i as u32 + 1, 1);
                (unit_label(Granularity::Month, date, 0), *steps)
            })
            .collect();
        push_group(&mut rows, year.year.to_string(), in_order_owned(months, opts.order));
    }
    let table = build_table(Some("Year"), "Month", &rows, &opts);
    print_table("Yearly Steps", &table, view.origin, opts.use_color);
}

pub(crate) fn print_lifetime_table(view: &ViewModel<LifetimeSeries>, opts: TableOptions) {
    let years: Vec<(i32, u64)> = view.data.years().collect();
    let rows: Vec<Row> = in_order(&years, opts.order)
        .into_iter()
        .map(|(year, steps)| Row {
            group: String::new(),
            unit: year.to_string(),
            steps: *steps,
        })
        .collect();
    let table = build_table(None, "Year", &rows, &opts);
    print_table("Lifetime Steps", &table, view.origin, opts.use_color);
}

fn in_order_owned<T>(mut items: Vec<T>, order: SortOrder) -> Vec<T> {
    if order == SortOrder::Desc {
        items.reverse();
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> TableOptions {
        TableOptions {
            order: SortOrder::Asc,
            use_color: false,
            number_format: NumberFormat::default(),
        }
    }

    #[test]
    fn unit_labels() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 15);
        assert_eq!(unit_label(Granularity::Hour, date, 7), "7 AM");
        assert_eq!(unit_label(Granularity::Day, date, 0), "Day 15");
        assert_eq!(unit_label(Granularity::Hour, None, 7), "");
    }

    #[test]
    fn grouped_table_labels_first_row_and_totals() {
        let mut rows = Vec::new();
        push_group(
            &mut rows,
            "2025".to_string(),
            vec![("Jan".to_string(), 1_000), ("Feb".to_string(), 2_500)],
        );
        assert_eq!(rows[0].group, "2025");
        assert_eq!(rows[1].group, "");

        let rendered = build_table(Some("Year"), "Month", &rows, &opts()).to_string();
        assert!(rendered.contains("TOTAL"));
        assert!(rendered.contains("3,500"));
        assert!(rendered.contains("Feb"));
    }

    #[test]
    fn owned_order_reverses_for_desc() {
        assert_eq!(in_order_owned(vec![1, 2, 3], SortOrder::Desc), vec![3, 2, 1]);
        assert_eq!(in_order_owned(vec![1, 2, 3], SortOrder::Asc), vec![1, 2, 3]);
    }
}
