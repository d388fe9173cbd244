//! Tests for CLI preferences.

use parlor_cli::prefs::{CliPrefs, KEYS};

#[test]
fn config_toml_roundtrip() {
    let prefs = CliPrefs {
        server_url: Some("https://chat.example.com".to_owned()),
        title: Some("Help desk".to_owned()),
        welcome_message: Some("Hi!".to_owned()),
    };

    let toml_str = toml::to_string_pretty(&prefs).unwrap();
    let parsed: CliPrefs = toml::from_str(&toml_str).unwrap();

    assert_eq!(parsed.server_url.as_deref(), Some("https://chat.example.com"));
    assert_eq!(parsed.title.as_deref(), Some("Help desk"));
    assert_eq!(parsed.welcome_message.as_deref(), Some("Hi!"));
}

#[test]
fn config_defaults_are_none() {
    let prefs = CliPrefs::default();
    assert!(prefs.server_url.is_none());
    assert!(prefs.title.is_none());
    assert!(prefs.welcome_message.is_none());
}

#[test]
fn set_known_and_unknown_keys() {
    let mut prefs = CliPrefs::default();
    for key in KEYS {
        assert!(prefs.set(key, "value"));
    }
    assert!(!prefs.set("model", "x"));
    assert_eq!(prefs.title.as_deref(), Some("value"));
}

#[test]
fn server_flag_overrides_stored_url() {
    let prefs = CliPrefs {
        server_url: Some("https://stored.example.com".to_owned()),
        ..Default::default()
    };
    assert_eq!(
        prefs.client_config(None).server_url.as_str(),
        "https://stored.example.com"
    );
    assert_eq!(
        prefs
            .client_config(Some("http://flag.example.com"))
            .server_url
            .as_str(),
        "http://flag.example.com"
    );
    assert_eq!(
        CliPrefs::default().client_config(None).server_url.as_str(),
        "http://127.0.0.1:5000"
    );
}

#[test]
fn widget_texts_apply_over_defaults() {
    let prefs = CliPrefs {
        welcome_message: Some("Hello there".to_owned()),
        ..Default::default()
    };
    let config = prefs.widget_config();
    assert_eq!(config.welcome_message, "Hello there");
    assert_eq!(config.title, "Chat with Us");
    assert_eq!(config.storage_key, "parlor-chat-id");
}
