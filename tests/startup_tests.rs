use std::process::Command;

fn proxy() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_playlist-proxy"));
    // an unroutable bind address: if the process ever got past the
    // credentials check it would fail differently
    cmd.args(["serve", "--bind", "256.0.0.1:0"])
        .env_remove("SPOTIPY_CLIENT_ID")
        .env_remove("SPOTIPY_CLIENT_SECRET");
    cmd
}

#[test]
fn refuses_to_start_without_credentials() {
    let out = proxy().output().expect("run binary");
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    let expected =
        "Error: SPOTIPY_CLIENT_ID or SPOTIPY_CLIENT_SECRET environment variable not set.";
    assert!(stderr.contains(expected), "{}", stderr);
}

#[test]
fn refuses_to_start_with_empty_secret() {
    let out = proxy()
        .env("SPOTIPY_CLIENT_ID", "id")
        .env("SPOTIPY_CLIENT_SECRET", "")
        .output()
        .expect("run binary");
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn config_validate_does_not_need_credentials() {
    let out = Command::new(env!("CARGO_BIN_EXE_playlist-proxy"))
        .arg("config-validate")
        .env_remove("SPOTIPY_CLIENT_ID")
        .env_remove("SPOTIPY_CLIENT_SECRET")
        .output()
        .expect("run binary");
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "OK");
}
