use folio_logger::{LevelFilter, Logger};

#[test]
fn console_logger_has_no_file_writer() {
    let logger = Logger::builder()
        .name("folio-console")
        .level(LevelFilter::DEBUG)
        .init()
        .expect("first init in this test binary");

    assert!(!logger.writes_files());
    tracing::info!(section = "hero", "console only");
}
