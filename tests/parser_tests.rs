// tests/parser_tests.rs

use kala::{parse, DateTime, ErrorType, KalaError, Kind, Timezone};

// ---
// Accepted inputs
// ---

#[test]
fn test_parse_date_fields() {
    let value = parse("2024-03-05", Kind::Date).expect("parse should succeed");
    assert_eq!(value.year(), 2024);
    assert_eq!(value.month(), 3);
    assert_eq!(value.day(), 5);

    // Time-of-day fields default to zero.
    assert_eq!(value.hours(), 0);
    assert_eq!(value.minutes(), 0);
    assert_eq!(value.seconds(), 0);
    assert_eq!(value.milliseconds(), 0);

    // No designator in the input: the local offset is captured, never the
    // UTC marker.
    assert!(matches!(value.timezone(), Timezone::Offset(_)));
}

#[test]
fn test_parse_extended_years() {
    let cases = vec![
        ("+123456-01-02", 123456),
        ("-000100-12-31", -100),
        ("+000000-01-01", 0),
        ("-000000-01-01", 0),
        ("+002024-03-05", 2024),
    ];
    for (input, year) in cases {
        let value = parse(input, Kind::Date).expect("parse should succeed");
        assert_eq!(value.year(), year, "year of {input}");
    }
}

#[test]
fn test_parse_time_fields() {
    let value = parse("23:59:59.999Z", Kind::Time).expect("parse should succeed");
    assert_eq!(value.hours(), 23);
    assert_eq!(value.minutes(), 59);
    assert_eq!(value.seconds(), 59);
    assert_eq!(value.milliseconds(), 999);
    assert_eq!(value.timezone(), Timezone::Utc);

    // Date fields of a time-only value sit at their defaults.
    assert_eq!(value.year(), 0);
    assert_eq!(value.month(), 1);
    assert_eq!(value.day(), 1);

    let offsets = vec![
        ("12:30:45+05:30", 330),
        ("12:30:45-01:30", -90),
        ("12:30:45-00:30", -30),
        ("12:30:45+00:00", 0),
    ];
    for (input, minutes) in offsets {
        let value = parse(input, Kind::Time).expect("parse should succeed");
        assert_eq!(
            value.timezone(),
            Timezone::Offset(minutes),
            "offset of {input}"
        );
        assert_eq!(value.milliseconds(), 0, "fraction defaults for {input}");
    }
}

#[test]
fn test_parse_datetime_fields() {
    let value = parse("2024-03-05T14:09:07.250Z", Kind::DateTime).expect("parse should succeed");
    assert_eq!(value.year(), 2024);
    assert_eq!(value.month(), 3);
    assert_eq!(value.day(), 5);
    assert_eq!(value.hours(), 14);
    assert_eq!(value.minutes(), 9);
    assert_eq!(value.seconds(), 7);
    assert_eq!(value.milliseconds(), 250);
    assert_eq!(value.timezone(), Timezone::Utc);
}

#[test]
fn test_day_is_validated_syntactically_only() {
    // 1-31 passes regardless of month length; calendar validity belongs to
    // the host boundary.
    let value = parse("2024-02-31", Kind::Date).expect("parse should succeed");
    assert_eq!(value.day(), 31);
    assert!(value.to_chrono().is_err());
}

// ---
// Rejected inputs
// ---

#[test]
fn test_malformed_inputs_are_syntax_errors() {
    let cases = vec![
        ("2024-3-05", Kind::Date),
        ("24-03-05", Kind::Date),
        ("12345-01-01", Kind::Date),
        ("+12345-01-01", Kind::Date),
        ("2024-03", Kind::Date),
        ("2024-03-05 ", Kind::Date),
        (" 2024-03-05", Kind::Date),
        ("2024-03-05Z", Kind::Date),
        ("14:09", Kind::Time),
        ("14:09:07.25Z", Kind::Time),
        ("14:09:07.2500Z", Kind::Time),
        ("14:09:07.", Kind::Time),
        ("14:09:07z", Kind::Time),
        ("14:09:07+5:30", Kind::Time),
        ("14:09:07+05:3", Kind::Time),
        ("14:09:07+0530", Kind::Time),
        ("2024-03-05 14:09:07", Kind::DateTime),
        ("2024-03-05t14:09:07", Kind::DateTime),
        ("2024-03-05T14:09", Kind::DateTime),
    ];
    for (input, kind) in cases {
        let error = parse(input, kind).unwrap_err();
        assert_eq!(
            error.error_type(),
            ErrorType::Syntax,
            "should reject {input:?} as {kind}"
        );
    }
}

#[test]
fn test_out_of_range_fields_are_rejected_with_detail() {
    let cases = vec![
        ("2024-13-01", Kind::Date, "month must be between 01 and 12"),
        ("2024-00-01", Kind::Date, "month must be between 01 and 12"),
        ("2024-01-32", Kind::Date, "day must be between 01 and 31"),
        ("2024-01-00", Kind::Date, "day must be between 01 and 31"),
        ("24:00:00", Kind::Time, "hours must be between 00 and 23"),
        ("14:60:00", Kind::Time, "minutes must be between 00 and 59"),
        ("14:09:60", Kind::Time, "seconds must be between 00 and 59"),
        (
            "14:09:07+24:00",
            Kind::Time,
            "timezone hours must be between 00 and 23",
        ),
        (
            "14:09:07-05:60",
            Kind::Time,
            "timezone minutes must be between 00 and 59",
        ),
    ];
    for (input, kind, detail) in cases {
        let error = parse(input, kind).unwrap_err();
        let KalaError::Syntax(syntax) = &error else {
            panic!("expected a syntax error for {input:?}, got {error:?}");
        };
        assert_eq!(syntax.detail(), detail, "detail for {input:?}");
    }
}

#[test]
fn test_range_error_location_covers_the_digits() {
    let error = parse("2024-13-01", Kind::Date).unwrap_err();
    let KalaError::Syntax(syntax) = error else {
        panic!("expected a syntax error");
    };

    let location = syntax.location();
    assert_eq!(location.start.offset, 5);
    assert_eq!(location.end.offset, 7);
    assert_eq!((location.start.line, location.start.column), (1, 6));
    assert_eq!((location.end.line, location.end.column), (1, 8));
}

#[test]
fn test_empty_input_is_an_argument_error() {
    let error = DateTime::parse("", Kind::Date).unwrap_err();
    assert_eq!(error.error_type(), ErrorType::InvalidArgument);
    assert!(error.to_string().contains("non-empty"));
}

#[test]
fn test_unknown_kind_selector_is_an_argument_error() {
    let error = "week".parse::<Kind>().unwrap_err();
    assert_eq!(error.error_type(), ErrorType::InvalidArgument);
    assert!(error.to_string().contains("week"));
}
