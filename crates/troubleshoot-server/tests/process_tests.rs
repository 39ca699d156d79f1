//! Process-level tests: the CRASH fault must take the whole binary down
//!
use std::process::{Command, Output};

fn troubleshoot(args: &[&str], envs: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_troubleshoot"));
    cmd.args(args)
        .env_remove("RUST_LOG")
        .env("TROUBLESHOOT_TIMER_DELAY_MS", "0")
        .env("TROUBLESHOOT_TIMER_PERIOD_MS", "10");
    for (k, v) in envs {
        cmd.env(k, v);
    }
    cmd.output().expect("failed to spawn troubleshoot binary")
}

#[test]
fn test_timer_crashes_after_fifth_tick() {
    // bounded so a missing crash ends the run instead of hanging it
    let out = troubleshoot(
        &["timer", "--message", "Ping"],
        &[("TROUBLESHOOT_TIMER_REPEAT_COUNT", "20")],
    );
    assert!(!out.status.success(), "process should terminate abnormally");

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        assert_eq!(out.status.signal(), Some(6), "expected SIGABRT");
    }

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Ping :: MyBean counter 5"));
    assert!(!stdout.contains("Ping :: MyBean counter 6"));
}

#[test]
fn test_timer_without_crash_runs_to_repeat_count() {
    let out = troubleshoot(
        &["timer", "--message", "Ping", "--no-crash"],
        &[("TROUBLESHOOT_TIMER_REPEAT_COUNT", "8")],
    );
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Ping :: MyBean counter 8"));
}

#[test]
fn test_timer_with_leak_keeps_running() {
    let out = troubleshoot(
        &["timer", "--message", "Ping", "--no-crash", "--mem-leak"],
        &[("TROUBLESHOOT_TIMER_REPEAT_COUNT", "2")],
    );
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Ping :: MyBean counter 1"));
    assert!(stdout.contains("Ping :: MyBean counter 2"));
}

#[test]
fn test_config_command_prints_resolved_values() {
    let out = troubleshoot(
        &["config", "--json", "--message", "BasicMessage", "--no-crash"],
        &[],
    );
    assert!(out.status.success());

    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["message"], "BasicMessage");
    assert_eq!(value["crash"], false);
    assert_eq!(value["mem-leak"], false);
    assert_eq!(value["timer"]["period-ms"], 10);
}

#[test]
fn test_invalid_env_value_fails_startup() {
    let out = troubleshoot(&["config"], &[("TROUBLESHOOT_CRASH", "sometimes")]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("TROUBLESHOOT_CRASH"));
}

#[test]
fn test_misspelled_env_key_fails_startup() {
    let out = troubleshoot(
        &["timer", "--message", "Ping", "--no-crash"],
        &[
            ("TROUBLESHOOT_MEMLEAK", "true"),
            ("TROUBLESHOOT_TIMER_REPEAT_COUNT", "1"),
        ],
    );
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("TROUBLESHOOT_MEMLEAK"));
    assert!(!String::from_utf8_lossy(&out.stdout).contains("MyBean"));
}

#[test]
fn test_resolved_configuration_is_logged_at_debug() {
    let out = troubleshoot(
        &["timer", "--message", "Ping", "--no-crash", "--mem-leak"],
        &[("RUST_LOG", "debug"), ("TROUBLESHOOT_TIMER_REPEAT_COUNT", "1")],
    );
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("configuration resolved"));
    assert!(stdout.contains("mem_leak=true"));
}
