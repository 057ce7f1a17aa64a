//! Month day lists and the grid layouts built from them.
//!
//! Everything here is a pure function of its inputs and the Gregorian
//! calendar; nothing is stored.

use chrono::{Datelike, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Language used for weekday and month labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Portuguese,
    English,
}

impl Locale {
    pub fn weekday_abbrev(&self, weekday: Weekday) -> &'static str {
        let idx = weekday.num_days_from_sunday() as usize;
        match self {
            Self::Portuguese => ["Dom", "Seg", "Ter", "Qua", "Qui", "Sex", "Sáb"][idx],
            Self::English => ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"][idx],
        }
    }

    /// Full month name for a zero-based month (0 = January).
    pub fn month_name(&self, month0: u32) -> &'static str {
        const PT: [&str; 12] = [
            "janeiro", "fevereiro", "março", "abril", "maio", "junho", "julho", "agosto",
            "setembro", "outubro", "novembro", "dezembro",
        ];
        const EN: [&str; 12] = [
            "January", "February", "March", "April", "May", "June", "July", "August",
            "September", "October", "November", "December",
        ];
        let idx = (month0 % 12) as usize;
        match self {
            Self::Portuguese => PT[idx],
            Self::English => EN[idx],
        }
    }
}

/// First column of the week grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    /// Column index of `weekday` in a week starting on `self`.
    pub fn column(&self, weekday: Weekday) -> usize {
        match self {
            Self::Sunday => weekday.num_days_from_sunday() as usize,
            Self::Monday => weekday.num_days_from_monday() as usize,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub day_of_month: u32,
    pub weekday: Weekday,
    pub weekday_label: &'static str,
}

impl CalendarDay {
    pub fn new(date: NaiveDate, locale: Locale) -> Self {
        Self {
            date,
            day_of_month: date.day(),
            weekday: date.weekday(),
            weekday_label: locale.weekday_abbrev(date.weekday()),
        }
    }
}

/// First day of `month0` (zero-based) in `year`. Months outside 0..=11 roll
/// into the neighbouring years, so 12 is January of `year + 1`.
pub fn first_of_month(year: i32, month0: i32) -> Option<NaiveDate> {
    let year = year.checked_add(month0.div_euclid(12))?;
    let month = month0.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Number of days in the month starting at `first`: the day before the
/// first of the following month.
fn month_length(first: NaiveDate) -> Option<u32> {
    match first.checked_add_months(Months::new(1)) {
        Some(next) => next.pred_opt().map(|last| last.day()),
        // December of the last representable year has no following month
        None if first.month() == 12 => Some(31),
        None => None,
    }
}

/// Every day of the month, ascending, with Portuguese weekday labels.
pub fn month_days(year: i32, month0: i32) -> Vec<CalendarDay> {
    month_days_in(year, month0, Locale::Portuguese)
}

pub fn month_days_in(year: i32, month0: i32, locale: Locale) -> Vec<CalendarDay> {
    let Some(first) = first_of_month(year, month0) else {
        return Vec::new();
    };
    let Some(len) = month_length(first) else {
        return Vec::new();
    };
    (1..=len)
        .filter_map(|day| first.with_day(day))
        .map(|date| CalendarDay::new(date, locale))
        .collect()
}

/// Split `items` into rows of `size`; only the last row may be shorter.
/// A size of zero is treated as one.
pub fn chunk_rows<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    items.chunks(size.max(1)).map(<[T]>::to_vec).collect()
}

/// Split `items` into at most `row_count` rows of equal length, the last one
/// taking the remainder.
pub fn balanced_rows<T: Clone>(items: &[T], row_count: usize) -> Vec<Vec<T>> {
    let per_row = items.len().div_ceil(row_count.max(1));
    chunk_rows(items, per_row)
}

/// Weeks of the month padded with `None` so each row starts on `week_start`.
/// Rows are always seven cells wide.
pub fn month_grid(
    year: i32,
    month0: i32,
    week_start: WeekStart,
    locale: Locale,
) -> Vec<Vec<Option<CalendarDay>>> {
    let days = month_days_in(year, month0, locale);
    let Some(first) = days.first() else {
        return Vec::new();
    };
    let lead = week_start.column(first.weekday);

    let mut cells: Vec<Option<CalendarDay>> = std::iter::repeat_n(None, lead)
        .chain(days.into_iter().map(Some))
        .collect();
    while cells.len() % 7 != 0 {
        cells.push(None);
    }
    chunk_rows(&cells, 7)
}

/// Month being displayed and the day picked in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthCursor {
    /// First day of the displayed month.
    pub displayed_month: NaiveDate,
    pub selected_day: Option<NaiveDate>,
}

impl MonthCursor {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            displayed_month: today.with_day(1).unwrap_or(today),
            selected_day: Some(today),
        }
    }

    pub fn year(&self) -> i32 {
        self.displayed_month.year()
    }

    pub fn month0(&self) -> i32 {
        self.displayed_month.month0() as i32
    }

    pub fn prev_month(&mut self) {
        self.displayed_month = self
            .displayed_month
            .checked_sub_months(Months::new(1))
            .unwrap_or(self.displayed_month);
        self.selected_day = None;
    }

    pub fn next_month(&mut self) {
        self.displayed_month = self
            .displayed_month
            .checked_add_months(Months::new(1))
            .unwrap_or(self.displayed_month);
        self.selected_day = None;
    }

    /// Select `date`, switching the displayed month if it lies elsewhere.
    pub fn select_day(&mut self, date: NaiveDate) {
        if !self.contains(date) {
            self.displayed_month = date.with_day(1).unwrap_or(date);
        }
        self.selected_day = Some(date);
    }

    pub fn jump_to_today(&mut self, today: NaiveDate) {
        *self = Self::new(today);
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.displayed_month.year() && date.month() == self.displayed_month.month()
    }

    pub fn days(&self, locale: Locale) -> Vec<CalendarDay> {
        month_days_in(self.year(), self.month0(), locale)
    }

    pub fn grid(&self, week_start: WeekStart, locale: Locale) -> Vec<Vec<Option<CalendarDay>>> {
        month_grid(self.year(), self.month0(), week_start, locale)
    }
}
