//! CLI tests
//!
//! Covers argument parsing, JSON output format, and exit code semantics.

// =============================================================================
// CLI Argument Parsing Tests
// =============================================================================

mod cli_parsing {
    use clap::Parser;
    use watchpoint::cli::{Cli, Command, ExitCode};

    #[test]
    fn test_seasons_alias() {
        let cli = Cli::parse_from(["watchpoint", "s", "42"]);
        match cli.command {
            Command::Seasons(cmd) => assert_eq!(cmd.entity_id, 42),
            _ => panic!("Expected Seasons command"),
        }
    }

    #[test]
    fn test_episodes_positional_args() {
        let cli = Cli::parse_from(["watchpoint", "episodes", "42", "3"]);
        match cli.command {
            Command::Episodes(cmd) => {
                assert_eq!(cmd.entity_id, 42);
                assert_eq!(cmd.season, 3);
            }
            _ => panic!("Expected Episodes command"),
        }
    }

    #[test]
    fn test_episode_requires_season_and_episode() {
        assert!(Cli::try_parse_from(["watchpoint", "episode", "42"]).is_err());
        assert!(Cli::try_parse_from(["watchpoint", "episode", "42", "-s", "1"]).is_err());
        assert!(Cli::try_parse_from(["watchpoint", "episode", "42", "-s", "1", "-e", "2"]).is_ok());
    }

    #[test]
    fn test_next_command() {
        let cli = Cli::parse_from(["watchpoint", "next", "42", "-s", "1", "-e", "3"]);
        match cli.command {
            Command::Next(cmd) => {
                assert_eq!(cmd.entity_id, 42);
                assert_eq!(cmd.season, 1);
                assert_eq!(cmd.episode, 3);
            }
            _ => panic!("Expected Next command"),
        }
    }

    #[test]
    fn test_resolve_requires_video() {
        assert!(Cli::try_parse_from(["watchpoint", "resolve", "42"]).is_err());
        assert!(Cli::try_parse_from(["watchpoint", "resolve", "42", "--video", "901"]).is_ok());
    }

    #[test]
    fn test_finish_defaults() {
        let cli = Cli::parse_from(["watchpoint", "finish", "42", "--video", "901"]);
        match cli.command {
            Command::Finish(cmd) => {
                assert_eq!(cmd.season, 1);
                assert_eq!(cmd.episode, 1);
                assert!(!cmd.abandoned);
                assert!(!cmd.movie);
            }
            _ => panic!("Expected Finish command"),
        }
    }

    #[test]
    fn test_finish_movie_abandoned() {
        let cli = Cli::parse_from([
            "watchpoint",
            "finish",
            "7",
            "--video",
            "33",
            "--movie",
            "--abandoned",
        ]);
        match cli.command {
            Command::Finish(cmd) => {
                assert!(cmd.movie);
                assert!(cmd.abandoned);
            }
            _ => panic!("Expected Finish command"),
        }
    }

    #[test]
    fn test_global_user_flag_applies_anywhere() {
        let cli = Cli::parse_from(["watchpoint", "progress", "42", "-u", "7"]);
        assert_eq!(cli.user, Some(7));

        let cli = Cli::parse_from(["watchpoint", "-u", "7", "progress", "42"]);
        assert_eq!(cli.user, Some(7));
    }

    #[test]
    fn test_non_numeric_entity_rejected() {
        assert!(Cli::try_parse_from(["watchpoint", "seasons", "breaking-bad"]).is_err());
    }

    #[test]
    fn test_exit_code_values() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::NetworkError), 3);
        assert_eq!(i32::from(ExitCode::NotFound), 4);
        assert_eq!(i32::from(ExitCode::ValidationFailed), 5);
    }
}

// =============================================================================
// JSON Output Format Tests
// =============================================================================

mod json_output {
    use watchpoint::cli::{ExitCode, JsonOutput};
    use watchpoint::models::Season;

    #[test]
    fn test_success_wrapper_omits_error() {
        let output = JsonOutput::success(vec![Season { number: 1 }, Season { number: 2 }]);
        let json = serde_json::to_string(&output).unwrap();

        assert!(json.contains("\"data\""));
        assert!(!json.contains("\"error\""));
        assert!(!json.contains("\"exit_code\""));
    }

    #[test]
    fn test_error_wrapper_carries_code() {
        let output = JsonOutput::<()>::error_msg("Resource not found (404)", ExitCode::NotFound);
        let json = serde_json::to_string(&output).unwrap();

        assert!(json.contains("\"error\":\"Resource not found (404)\""));
        assert!(json.contains("\"exit_code\":4"));
        assert!(!json.contains("\"data\""));
    }
}
