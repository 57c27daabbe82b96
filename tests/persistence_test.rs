#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::io::Write;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_rocksdb_persistence_recovery() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    // 1. First run: create a payment
    let mut csv1 = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv1, "op, reference, variant, currency, total, status").unwrap();
    writeln!(csv1, "create, a, dummy, USD, 100.00,").unwrap();

    let mut cmd1 = Command::new(cargo_bin!("payrecord"));
    cmd1.arg(csv1.path()).arg("--db-path").arg(&db_path);

    let output1 = cmd1.output().expect("Failed to execute command");
    assert!(output1.status.success());
    let stdout1 = String::from_utf8_lossy(&output1.stdout);
    let row = stdout1.lines().nth(1).expect("missing payment row");
    assert!(row.ends_with("dummy,waiting,USD,100.00,0.00,0.00"));
    let token = row.split(',').next().unwrap().to_string();

    // 2. Second run: confirm the stored payment by its token
    let mut csv2 = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv2, "op, reference, variant, currency, total, status").unwrap();
    writeln!(csv2, "status, {}, , , , confirmed", token).unwrap();

    let mut cmd2 = Command::new(cargo_bin!("payrecord"));
    cmd2.arg(csv2.path()).arg("--db-path").arg(&db_path);

    let output2 = cmd2.output().expect("Failed to execute command");
    assert!(output2.status.success());
    let stdout2 = String::from_utf8_lossy(&output2.stdout);

    // Same payment, same token, new status
    assert_eq!(stdout2.lines().count(), 2);
    assert!(stdout2.contains(&format!("{},dummy,confirmed,USD,100.00,0.00,0.00", token)));
}
