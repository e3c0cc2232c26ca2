use quotes_core::db::{open_store, open_store_in_memory};
use quotes_core::init_logging;
use rusqlite::Connection;
use std::path::Path;

fn read_logs(dir: &Path) -> String {
    log::logger().flush();
    let mut contents = String::new();
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        contents.push_str(&std::fs::read_to_string(path).unwrap());
    }
    contents
}

// Only test in this binary that starts the global logger.
#[test]
fn schema_initialization_emits_start_ok_and_error_events() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("logs");
    init_logging("info", Some(log_dir.as_path())).unwrap();

    open_store_in_memory().unwrap();

    let broken = dir.path().join("broken.db");
    let conn = Connection::open(&broken).unwrap();
    conn.execute_batch("CREATE TABLE quotes (id INTEGER PRIMARY KEY, body TEXT);")
        .unwrap();
    drop(conn);
    open_store(&broken).unwrap_err();

    let logs = read_logs(&log_dir);
    assert!(logs.contains("event=schema_init module=db status=start"));
    assert!(logs.contains("event=schema_init module=db status=ok duration_ms="));
    assert!(logs.contains("event=schema_init module=db status=error duration_ms="));
}
