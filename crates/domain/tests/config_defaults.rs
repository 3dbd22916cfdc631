use vv_domain::config::{Config, ConfigSeverity};

#[test]
fn default_host_is_localhost() {
    let config = Config::default();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 4620);
}

#[test]
fn explicit_zero_host_parses() {
    let toml_str = r#"
[server]
host = "0.0.0.0"
port = 4620
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.server.host, "0.0.0.0");
}

#[test]
fn drain_delay_default_is_three_seconds() {
    let config = Config::default();
    assert_eq!(config.timeouts.drain_delay_secs, 3);
}

#[test]
fn context_caps_have_observed_defaults() {
    let config = Config::default();
    assert_eq!(config.context.max_achievements_per_role, 3);
    assert_eq!(config.context.max_skills, 12);
    assert_eq!(config.context.max_briefs, 3);
}

#[test]
fn provisioning_deadline_default_is_thirty_seconds() {
    let config = Config::default();
    assert_eq!(config.voice_provider.provisioning_timeout_secs, 30);
}

#[test]
fn partial_toml_fills_defaults() {
    let toml_str = r#"
[voice_provider]
base_url = "https://voice.example/v1"

[voice_provider.auth]
env = "VOICE_API_KEY"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.voice_provider.base_url, "https://voice.example/v1");
    assert_eq!(config.voice_provider.provisioning_timeout_secs, 30);
    assert!(!config.voice_provider.auth.is_unconfigured());
}

#[test]
fn missing_credentials_is_a_warning_not_an_error() {
    let config = Config::default();
    let issues = config.validate();
    let auth_issue = issues
        .iter()
        .find(|i| i.field == "voice_provider.auth")
        .expect("expected an auth warning");
    assert_eq!(auth_issue.severity, ConfigSeverity::Warning);
}

#[test]
fn zero_port_is_an_error() {
    let toml_str = r#"
[server]
port = 0
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    let issues = config.validate();
    assert!(issues
        .iter()
        .any(|i| i.severity == ConfigSeverity::Error && i.field == "server.port"));
}
