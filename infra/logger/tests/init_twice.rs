use folio_logger::{Logger, LoggerError};

#[test]
fn second_init_reports_subscriber_error() {
    let _first = Logger::builder().name("folio-first").init().expect("first init");

    let err = Logger::builder().name("folio-second").init().expect_err("second init");
    assert!(matches!(err, LoggerError::Subscriber { .. }));
}
