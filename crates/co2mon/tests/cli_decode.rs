#![cfg(all(unix, feature = "cli"))]

use std::process::Command;

fn co2mon() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_co2mon"));
    cmd.arg("--log-level").arg("error");
    cmd
}

#[test]
fn decode_plain_frame_takes_fast_path() {
    let output = co2mon()
        .args(["--format", "json", "decode", "50 01 94 e5 0d 00 00 00"])
        .output()
        .expect("decode should run");

    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("decode should emit json");
    assert_eq!(value["encoding"], "plain");
    assert_eq!(value["operation"], "P");
    assert_eq!(value["quantity"], "co2");
    assert_eq!(value["raw_value"], 404);
    assert_eq!(value["value"], 404.0);
}

#[test]
fn decode_obfuscated_temperature_frame() {
    let output = co2mon()
        .args(["--format", "json", "decode", "32e4f620", "0546bf1a"])
        .output()
        .expect("decode should run");

    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("decode should emit json");
    assert_eq!(value["encoding"], "obfuscated");
    assert_eq!(value["plaintext"], "4211287b0d000000");
    assert_eq!(value["quantity"], "temperature");
    assert_eq!(value["raw_value"], 4392);
    let celsius = value["value"].as_f64().expect("value should be a number");
    assert!((celsius - 1.35).abs() < 1e-9);
}

#[test]
fn decode_unknown_operation_passes_through() {
    let output = co2mon()
        .args(["--format", "json", "decode", "94e44e210a46bfda"])
        .output()
        .expect("decode should run");

    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("decode should emit json");
    assert_eq!(value["operation"], "m");
    assert_eq!(value["name"], "UNKNOWN");
    assert!(value["quantity"].is_null());
    assert_eq!(value["raw_value"], 0x1234);
}

#[test]
fn decode_garbage_returns_60_with_transformed_bytes() {
    let output = co2mon()
        .args(["decode", "ffffffffffffffff"])
        .output()
        .expect("decode should run");

    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("checksum error: a320d117b068f117"));
}

#[test]
fn decode_short_frame_is_usage_error() {
    let output = co2mon()
        .args(["decode", "500194"])
        .output()
        .expect("decode should run");

    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn version_reports_package_version() {
    let output = co2mon().arg("version").output().expect("version should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), format!("co2mon {}", env!("CARGO_PKG_VERSION")));
}
