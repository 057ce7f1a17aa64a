use chrono::{Datelike, NaiveDate, NaiveDateTime};

use super::calendar::{Locale, first_of_month};

/// `dd/mm/yyyy`
pub fn format_date_br(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `dd/mm/yyyy HH:MM`
pub fn format_datetime_br(dt: NaiveDateTime) -> String {
    dt.format("%d/%m/%Y %H:%M").to_string()
}

/// Header above the month grid, e.g. "março de 2024" or "March 2024".
pub fn month_label(year: i32, month0: i32, locale: Locale) -> String {
    let Some(first) = first_of_month(year, month0) else {
        return String::new();
    };
    let name = locale.month_name(first.month0());
    let year = first.year();
    match locale {
        Locale::Portuguese => format!("{name} de {year}"),
        Locale::English => format!("{name} {year}"),
    }
}

/// Title of the task panel: "Hoje" for today, the date otherwise.
pub fn day_heading(selected: NaiveDate, today: NaiveDate) -> String {
    if selected == today {
        "Hoje".to_string()
    } else {
        format_date_br(selected)
    }
}
