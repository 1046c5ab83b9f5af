mod common;

use chrono::{Datelike, Duration, NaiveDate};
use common::d;
use saltstats_core::calendar::{month_markers, Semester};
use saltstats_core::{day_range, month_range, semester};

#[test]
fn day_range_ends_the_day_before() {
    for days in [1, 7, 30, 365] {
        let (start, end) = day_range(d(2016, 3, 1), days).unwrap();
        assert_eq!(end, d(2016, 2, 29));
        assert_eq!(end - start, Duration::days(days - 1));
    }
    assert!(day_range(d(2016, 3, 1), 0).is_err());
}

#[test]
fn day_range_beyond_the_calendar_is_an_error() {
    assert!(day_range(d(2016, 5, 3), i64::MAX / 1000).is_err());
    assert!(day_range(d(2016, 5, 3), i64::MAX).is_err());
    assert!(day_range(NaiveDate::MIN, 1).is_err());
}

#[test]
fn month_range_across_new_year() {
    assert_eq!(month_range(d(2016, 5, 3), 6).unwrap(), (d(2015, 11, 15), d(2016, 4, 15)));
    assert_eq!(month_range(d(2016, 1, 31), 1).unwrap(), (d(2015, 12, 15), d(2015, 12, 15)));
    assert!(month_range(d(2016, 1, 31), 0).is_err());
}

#[test]
fn month_markers_are_consecutive_months() {
    let markers = month_markers(d(2017, 2, 10), 14).unwrap();
    assert_eq!(markers.len(), 14);
    assert_eq!(markers.first(), Some(&d(2015, 12, 15)));
    assert_eq!(markers.last(), Some(&d(2017, 1, 15)));
    for pair in markers.windows(2) {
        let years = pair[1].year() - pair[0].year();
        let months = years * 12 + pair[1].month() as i32 - pair[0].month() as i32;
        assert_eq!(months, 1);
    }
}

#[test]
fn semester_ids() {
    assert_eq!(semester(d(2016, 5, 1)), "2016-1");
    assert_eq!(semester(d(2016, 10, 31)), "2016-1");
    assert_eq!(semester(d(2016, 11, 1)), "2016-2");
    assert_eq!(semester(d(2017, 4, 30)), "2016-2");
    assert_eq!(semester(d(2017, 8, 4)), "2017-1");
}

#[test]
fn semesters_order_chronologically() {
    let mut semesters: Vec<Semester> =
        ["2017-1", "2016-2", "2016-1"].iter().map(|s| s.parse().unwrap()).collect();
    semesters.sort();
    assert_eq!(semesters[0], Semester::containing(d(2016, 7, 1)));
    assert_eq!(semesters[2], Semester::containing(d(2017, 7, 1)));
    assert_eq!(serde_json::to_string(&semesters[1]).unwrap(), "\"2016-2\"");
}

#[test]
fn semester_bounds_outside_the_calendar_are_errors() {
    let s: Semester = format!("{}-2", NaiveDate::MAX.year()).parse().unwrap();
    assert!(s.first_day().is_ok());
    assert!(s.last_day().is_err());
    assert!(Semester::new(i32::MIN, 1).unwrap().first_day().is_err());
}
