//! Tests for configuration management functionality
//!
//! These tests verify the config providers and the planner client
//! configuration built on top of them.

#[cfg(test)]
mod tests {
    use std::env;
    use std::time::Duration;

    use crate::config::{
        CompositeConfigProvider, ConfigProvider, ConfigProviderExt, EnvConfigProvider,
        MemoryConfigProvider, PlannerConfig, ServiceConfig, DEFAULT_API_BASE,
    };
    use crate::error::ServiceError;

    #[test]
    fn test_memory_config_provider() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("api_base", "http://localhost:8080");
        provider.set("timeout", "30s");
        provider.set("verbose", "true");
        provider.set("port", "5000");

        assert_eq!(provider.get_string("api_base").unwrap(), "http://localhost:8080");
        assert_eq!(provider.get_duration("timeout").unwrap(), Duration::from_secs(30));
        assert_eq!(provider.get_bool("verbose").unwrap(), true);
        assert_eq!(provider.get_int("port").unwrap(), 5000);

        // Defaults
        assert_eq!(provider.get_string_or("missing", "default"), "default");
        assert_eq!(provider.get_int_or("missing", 60), 60);
        assert_eq!(provider.get_bool_or("missing", false), false);

        // Error cases
        assert!(provider.get_string("missing").is_err());
        assert!(provider.get_int("api_base").is_err());
    }

    #[test]
    fn test_env_config_provider() {
        env::set_var("PLANNER_CFGTEST_API_BASE", "https://planner.example.com");
        env::set_var("PLANNER_CFGTEST_TIMEOUT", "5m");

        let provider = EnvConfigProvider::new()
            .with_prefix("PLANNER")
            .with_namespace("CFGTEST");

        assert_eq!(provider.get_string("api_base").unwrap(), "https://planner.example.com");
        assert_eq!(provider.get_duration("timeout").unwrap(), Duration::from_secs(300));
        assert!(provider.get_string("user_agent").is_err());

        env::remove_var("PLANNER_CFGTEST_API_BASE");
        env::remove_var("PLANNER_CFGTEST_TIMEOUT");
    }

    #[test]
    fn test_composite_config_provider() {
        let mut first = MemoryConfigProvider::new();
        first.set("api_base", "http://first:5000");

        let mut second = MemoryConfigProvider::new();
        second.set("api_base", "http://second:5000");
        second.set("user_agent", "planner-tests");

        let composite = CompositeConfigProvider::new()
            .with_provider(first)
            .with_provider(second);

        assert_eq!(composite.get_string("api_base").unwrap(), "http://first:5000");
        assert_eq!(composite.get_string("user_agent").unwrap(), "planner-tests");
        assert!(composite.get_string("timeout").is_err());
    }

    #[test]
    fn test_planner_config_from_provider() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("api_base", "https://planner.example.com/");
        provider.set("timeout", "45");
        provider.set("user_agent", "custom-agent/1.0");

        let config = PlannerConfig::from_provider(&provider).unwrap();
        assert_eq!(config.base_url, "https://planner.example.com");
        assert_eq!(config.timeout, Some(Duration::from_secs(45)));
        assert_eq!(config.user_agent.as_deref(), Some("custom-agent/1.0"));
        assert_eq!(config.service_name(), "planner");
    }

    #[test]
    fn test_planner_config_defaults_to_local_backend() {
        let config = PlannerConfig::default();
        assert_eq!(config.base_url, DEFAULT_API_BASE);
        assert!(config.timeout.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_planner_config_rejects_bad_base_urls() {
        for base in ["ftp://planner.example.com", "not a url"] {
            let mut provider = MemoryConfigProvider::new();
            provider.set("api_base", base);

            let err = PlannerConfig::from_provider(&provider).unwrap_err();
            assert!(
                matches!(err, ServiceError::Configuration(_)),
                "{} gave {:?}",
                base,
                err
            );
        }

        let mut provider = MemoryConfigProvider::new();
        provider.set("timeout", "soon");
        assert!(PlannerConfig::from_provider(&provider).is_err());
    }

    #[test]
    fn test_planner_config_serde() {
        let config: PlannerConfig = serde_json::from_str(
            r#"{"base_url": "http://127.0.0.1:5000", "timeout": 10}"#,
        )
        .unwrap();
        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
        assert!(config.user_agent.is_none());

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["timeout"], "10s");

        let reloaded: PlannerConfig = serde_json::from_value(value).unwrap();
        assert_eq!(reloaded.timeout, Some(Duration::from_secs(10)));

        let err = serde_json::from_str::<PlannerConfig>(
            r#"{"base_url": "http://127.0.0.1:5000", "timeout": "soon"}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_planner_config_sub_second_timeout_survives_reload() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("timeout", "500ms");

        let config = PlannerConfig::from_provider(&provider).unwrap();
        assert_eq!(config.timeout, Some(Duration::from_millis(500)));

        let saved = serde_json::to_string(&config).unwrap();
        let reloaded: PlannerConfig = serde_json::from_str(&saved).unwrap();
        assert_eq!(reloaded.timeout, Some(Duration::from_millis(500)));
        assert_eq!(reloaded, config);
    }
}
