use std::path::Path;

use figment::Jail;
use sanjaya_core::config::{figment_for, resolve_with_base, Settings, CHUNK_SEPARATOR};

#[test]
fn defaults_without_any_source() {
    Jail::expect_with(|jail| {
        jail.clear_env();
        let settings = Settings::from_figment(&figment_for("dev")).map_err(|e| e.to_string())?;
        assert_eq!(settings.retrieval.top_k, 15);
        assert_eq!(settings.assets.chunks_file, "scripture_chunks.txt");
        assert_eq!(settings.assets.separator, CHUNK_SEPARATOR);
        assert_eq!(settings.gemini.embedding_model, "text-embedding-004");
        assert_eq!(settings.generation.max_output_tokens, 2048);
        assert!(settings.gemini.api_key.is_none());
        assert_eq!(settings.server.bind, "127.0.0.1:5000");
        assert!(settings.server.cors);
        Ok(())
    });
}

#[test]
fn server_settings_come_from_prefixed_env() {
    Jail::expect_with(|jail| {
        jail.clear_env();
        jail.set_env("APP_SERVER__BIND", "0.0.0.0:8080");
        jail.set_env("APP_SERVER__QUERY_BIN", "/opt/sanjaya/bin/sanjaya");
        let settings = Settings::from_figment(&figment_for("dev")).map_err(|e| e.to_string())?;
        assert_eq!(settings.server.bind, "0.0.0.0:8080");
        assert_eq!(settings.server.query_bin.as_deref(), Some("/opt/sanjaya/bin/sanjaya"));
        Ok(())
    });
}

#[test]
fn env_file_and_variables_layer_in_order() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[retrieval]\ntop_k = 5\n[gemini]\ntimeout_secs = 10\n")?;
        jail.create_file("config.prod.toml", "[retrieval]\ntop_k = 8\n")?;
        jail.set_env("APP_GEMINI__TIMEOUT_SECS", "3");
        jail.set_env("GEMINI_API_KEY", "abc123");

        let settings = Settings::from_figment(&figment_for("prod")).map_err(|e| e.to_string())?;
        assert_eq!(settings.retrieval.top_k, 8);
        assert_eq!(settings.gemini.timeout_secs, 3);
        assert_eq!(settings.gemini.api_key.as_deref(), Some("abc123"));
        Ok(())
    });
}

#[test]
fn prefixed_key_overrides_bare_key() {
    Jail::expect_with(|jail| {
        jail.set_env("GEMINI_API_KEY", "bare");
        jail.set_env("APP_GEMINI__API_KEY", "prefixed");
        let settings = Settings::from_figment(&figment_for("dev")).map_err(|e| e.to_string())?;
        assert_eq!(settings.gemini.api_key.as_deref(), Some("prefixed"));
        Ok(())
    });
}

#[test]
fn zero_top_k_is_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("APP_RETRIEVAL__TOP_K", "0");
        let err = Settings::from_figment(&figment_for("dev")).unwrap_err();
        assert!(err.to_string().contains("top_k"));
        Ok(())
    });
}

#[test]
fn out_of_range_temperature_is_rejected() {
    let mut settings = Settings::default();
    settings.generation.temperature = 3.5;
    assert!(settings.validate().is_err());
}

#[test]
fn relative_asset_paths_resolve_against_base() {
    let settings = Settings::default();
    let base = Path::new("/srv/sanjaya");
    assert_eq!(settings.assets.chunks_path(base), base.join("scripture_chunks.txt"));
    assert_eq!(resolve_with_base(base, "/abs/index"), Path::new("/abs/index"));
}
