//! Tests for CLI vs TOML precedence rules.

use std::time::Duration;

use super::*;

mod cli_precedence {
    use super::*;

    #[test]
    fn cli_workspace_overrides_toml() {
        let cli = cli_with_credentials(&[]);
        let toml = toml(
            r#"
            [oms]
            workspace_id = "toml-ws"
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.adapter.workspace_id, "ws1");
    }

    #[test]
    fn cli_address_overrides_toml_workspace_id() {
        let cli = cli(&["--address", "cli-ws.ods.opinsights.azure.com", "--shared-key", KEY]);
        let toml = toml(
            r#"
            [oms]
            workspace_id = "toml-ws"
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.adapter.workspace_id, "cli-ws");
    }

    #[test]
    fn explicit_id_beats_address_at_same_level() {
        let cli = cli(&[
            "--address",
            "from-address.ods.opinsights.azure.com",
            "--workspace-id",
            "explicit",
            "--shared-key",
            KEY,
        ]);

        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        assert_eq!(config.adapter.workspace_id, "explicit");
    }

    #[test]
    fn cli_endpoint_overrides_toml() {
        let cli = cli_with_credentials(&["--endpoint", "https://cli.example.com/api/logs"]);
        let toml = toml(
            r#"
            [oms]
            endpoint = "https://toml.example.com/api/logs"
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(
            config.adapter.endpoint.unwrap().as_str(),
            "https://cli.example.com/api/logs"
        );
    }

    #[test]
    fn cli_timeouts_override_toml() {
        let cli = cli_with_credentials(&["--connect-timeout", "2", "--request-timeout", "30"]);
        let toml = toml(
            r"
            [http]
            connect_timeout = 7
            request_timeout = 8
        ",
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.adapter.timeouts.connect, Duration::from_secs(2));
        assert_eq!(config.adapter.timeouts.request, Duration::from_secs(30));
    }

    #[test]
    fn cli_retry_overrides_toml() {
        let cli = cli_with_credentials(&["--retry-max", "3", "--retry-step", "2"]);
        let toml = toml(
            r"
            [retry]
            max_attempts = 7
            step = 5
        ",
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.adapter.retry_policy.max_attempts, 3);
        assert_eq!(config.adapter.retry_policy.step, Duration::from_secs(2));
    }

    #[test]
    fn cli_source_overrides_toml() {
        let cli = cli_with_credentials(&["--source", "stderr"]);
        let toml = toml(
            r#"
            [input]
            source = "stdout"
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.source, "stderr");
    }
}

mod toml_fallback {
    use super::*;

    #[test]
    fn toml_values_used_when_cli_absent() {
        let cli = cli_with_credentials(&[]);
        let toml = toml(
            r#"
            [oms]
            log_type = "Custom"

            [http]
            connect_timeout = 3

            [retry]
            max_attempts = 4
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.adapter.default_log_type.to_string(), "Custom");
        assert_eq!(config.adapter.timeouts.connect, Duration::from_secs(3));
        assert_eq!(config.adapter.timeouts.request, Duration::from_secs(10));
        assert_eq!(config.adapter.retry_policy.max_attempts, 4);
        assert_eq!(config.adapter.retry_policy.step, Duration::from_secs(1));
    }

    #[test]
    fn defaults_used_when_nothing_set() {
        let cli = cli_with_credentials(&[]);

        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        assert_eq!(config.source, "stdout");
        assert_eq!(config.adapter.default_log_type.to_string(), "Bunyan");
        assert_eq!(config.adapter.timeouts.connect, Duration::from_secs(5));
        assert_eq!(config.adapter.timeouts.request, Duration::from_secs(10));
        assert_eq!(config.adapter.retry_policy.max_attempts, 10);
        assert!(!config.dry_run);
        assert!(!config.verbose);
    }
}
