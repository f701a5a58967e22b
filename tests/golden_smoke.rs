// tests/golden_smoke.rs
use std::process::Command;

#[test]
fn golden_smoke_seeds_ndjson() {
    let tmp = tempfile::tempdir().unwrap();
    let in_path = tmp.path().join("events.ndjson");
    let db_path = tmp.path().join("events.sqlite");
    let db_url = format!("sqlite:{}", db_path.display());

    std::fs::write(
        &in_path,
        r#"
{"event_id":"open-mic","start_time":"2026-05-01T19:00:00Z","capacity":40,"price":5.0}
{"event_id":"headliner","event_description":"main stage","start_time":"2026-05-02T21:00:00Z","capacity":500,"price":45.0,"sold":120}
"#,
    )
    .unwrap();

    let exe = env!("CARGO_BIN_EXE_boxoffice");
    let status = Command::new(exe)
        .args(["seed", "--db", &db_url, "--file", in_path.to_str().unwrap()])
        .status()
        .unwrap();

    assert!(status.success());
    assert!(db_path.exists());

    // Seeding the same file again trips the primary key and must fail loudly.
    let status = Command::new(exe)
        .args(["seed", "--db", &db_url, "--file", in_path.to_str().unwrap()])
        .status()
        .unwrap();
    assert!(!status.success());
}
