use chrono::NaiveDate;
use tempspan::{DateInterval, DateTimeInterval, Duration, Period};

fn main() {
    let shift: DateTimeInterval = "2012-04-01T14:15/P4DT1H45M".parse().unwrap();
    println!("shift: {shift} ({})", shift.duration().unwrap());

    for piece in shift.slice(Duration::from_hours(24)).unwrap() {
        println!("  {piece}");
    }

    let quarter: DateInterval = "2021-01-31/2021-05-01".parse().unwrap();
    for month_end in quarter.iterate(Period::from_months(1)).unwrap() {
        println!("month step: {month_end}");
    }

    let today = NaiveDate::from_ymd_opt(2021, 2, 14).unwrap();
    println!("contains {today}: {}", quarter.contains(today));
}
