//! Calendar helpers over day counts (days since 1970-01-01).

use std::collections::BTreeSet;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use formula_bignum::{BigDecimal, BigNumber};

use crate::error::{CalcError, CalcResult};
use crate::functions::{BuiltinFunction, FunctionContext};

fn epoch() -> NaiveDate {
    NaiveDate::default()
}

fn date_from_day_count(value: &BigDecimal) -> CalcResult<NaiveDate> {
    let days = value
        .to_big_integer()
        .and_then(|d| d.to_i64())
        .map_err(|_| CalcError::evaluation("day count must be an integer"))?;
    let date = if days >= 0 {
        epoch().checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        epoch().checked_sub_days(Days::new(days.unsigned_abs()))
    };
    date.ok_or_else(|| CalcError::evaluation(format!("day count {days} is out of range")))
}

fn date_arg(args: &[BigDecimal]) -> CalcResult<NaiveDate> {
    date_from_day_count(&args[0])
}

inventory::submit! {
    BuiltinFunction {
        name: "day",
        arity: 1,
        implementation: day,
    }
}

fn day(ctx: &FunctionContext, args: &[BigDecimal]) -> CalcResult<BigDecimal> {
    ctx.integer(i64::from(date_arg(args)?.day()))
}

inventory::submit! {
    BuiltinFunction {
        name: "month",
        arity: 1,
        implementation: month,
    }
}

fn month(ctx: &FunctionContext, args: &[BigDecimal]) -> CalcResult<BigDecimal> {
    ctx.integer(i64::from(date_arg(args)?.month()))
}

inventory::submit! {
    BuiltinFunction {
        name: "year",
        arity: 1,
        implementation: year,
    }
}

fn year(ctx: &FunctionContext, args: &[BigDecimal]) -> CalcResult<BigDecimal> {
    ctx.integer(i64::from(date_arg(args)?.year()))
}

inventory::submit! {
    BuiltinFunction {
        name: "day_of_year",
        arity: 1,
        implementation: day_of_year,
    }
}

fn day_of_year(ctx: &FunctionContext, args: &[BigDecimal]) -> CalcResult<BigDecimal> {
    ctx.integer(i64::from(date_arg(args)?.ordinal()))
}

inventory::submit! {
    BuiltinFunction {
        name: "weekday",
        arity: 1,
        implementation: weekday,
    }
}

/// ISO weekday: 1 = Monday through 7 = Sunday.
fn weekday(ctx: &FunctionContext, args: &[BigDecimal]) -> CalcResult<BigDecimal> {
    ctx.integer(i64::from(date_arg(args)?.weekday().number_from_monday()))
}

inventory::submit! {
    BuiltinFunction {
        name: "networkdays",
        arity: 2,
        implementation: networkdays,
    }
}

/// Working days between two day counts, both ends inclusive; negative when `start > end`.
fn networkdays(ctx: &FunctionContext, args: &[BigDecimal]) -> CalcResult<BigDecimal> {
    let start = date_from_day_count(&args[0])?;
    let end = date_from_day_count(&args[1])?;
    let holidays: BTreeSet<(u32, u32)> = ctx
        .settings()
        .holidays
        .iter()
        .map(|h| (h.month, h.day))
        .collect();

    let count = if start <= end {
        working_days(start, end, &holidays)
    } else {
        -working_days(end, start, &holidays)
    };
    ctx.integer(count)
}

fn is_workday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Count Monday-Friday dates in `start..=end` that are not holidays.
fn working_days(start: NaiveDate, end: NaiveDate, holidays: &BTreeSet<(u32, u32)>) -> i64 {
    let total = (end - start).num_days() + 1;
    let full_weeks = total / 7;
    let mut count = full_weeks * 5;

    // Whole weeks always hold five workdays; walk the leftover days individually.
    let mut cursor = start + chrono::Duration::days(full_weeks * 7);
    while cursor <= end {
        if is_workday(cursor) {
            count += 1;
        }
        match cursor.succ_opt() {
            Some(next) => cursor = next,
            None => break,
        }
    }

    for year in start.year()..=end.year() {
        for &(month, day) in holidays {
            let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                continue;
            };
            if start <= date && date <= end && is_workday(date) {
                count -= 1;
            }
        }
    }
    count
}
