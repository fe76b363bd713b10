//! CLI argument definitions using clap derive macros.

use clap::Parser;

/// Mirror Pinboard bookmarks to local annotated files.
///
/// Pindown fetches saved posts from the bookmarking API, writes each one
/// as a bookmark file, annotates it with the post's notes and tags, and
/// records sync progress in a preference profile.
#[derive(Parser, Debug)]
#[command(name = "pindown")]
#[command(author, version, about)]
pub struct Args {
    /// Reset the last-sync marker instead of downloading; an optional value rolls it back that many days
    #[arg(
        short = 'r',
        long = "reset",
        value_name = "DAYS",
        num_args = 0..=1,
        value_parser = clap::value_parser!(i64).range(0..=3650)
    )]
    pub reset: Option<Option<i64>>,

    /// Download only posts carrying this tag (repeatable, maximum 3)
    #[arg(short = 't', long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Skip the server-side freshness check before downloading
    #[arg(long)]
    pub skip_update: bool,

    /// Mirror log output to the console (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log errors only
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_args_parses_successfully() {
        let args = Args::try_parse_from(["pindown"]).unwrap();
        assert!(args.reset.is_none());
        assert!(args.tags.is_empty());
        assert!(!args.skip_update);
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
    }

    #[test]
    fn test_cli_reset_without_value() {
        let args = Args::try_parse_from(["pindown", "-r"]).unwrap();
        assert_eq!(args.reset, Some(None));
    }

    #[test]
    fn test_cli_reset_with_days_value() {
        let args = Args::try_parse_from(["pindown", "-r", "7"]).unwrap();
        assert_eq!(args.reset, Some(Some(7)));
    }

    #[test]
    fn test_cli_reset_long_flag() {
        let args = Args::try_parse_from(["pindown", "--reset", "30"]).unwrap();
        assert_eq!(args.reset, Some(Some(30)));
    }

    #[test]
    fn test_cli_reset_negative_days_rejected() {
        let result = Args::try_parse_from(["pindown", "-r", "-1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_reset_over_max_rejected() {
        let result = Args::try_parse_from(["pindown", "-r", "3651"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_single_tag() {
        let args = Args::try_parse_from(["pindown", "-t", "rust"]).unwrap();
        assert_eq!(args.tags, vec!["rust"]);
    }

    #[test]
    fn test_cli_tags_are_repeatable() {
        let args =
            Args::try_parse_from(["pindown", "-t", "rust", "-t", "cli", "--tag", "unix"]).unwrap();
        assert_eq!(args.tags, vec!["rust", "cli", "unix"]);
    }

    #[test]
    fn test_cli_four_tags_still_parse() {
        // The maximum-of-3 rule is a logged user error in main, not a
        // clap validation, so parsing itself accepts any count.
        let args =
            Args::try_parse_from(["pindown", "-t", "a", "-t", "b", "-t", "c", "-t", "d"]).unwrap();
        assert_eq!(args.tags.len(), 4);
    }

    #[test]
    fn test_cli_skip_update_flag() {
        let args = Args::try_parse_from(["pindown", "--skip-update"]).unwrap();
        assert!(args.skip_update);
    }

    #[test]
    fn test_cli_reset_followed_by_flag_leaves_value_unset() {
        let args = Args::try_parse_from(["pindown", "-r", "--skip-update"]).unwrap();
        assert_eq!(args.reset, Some(None));
        assert!(args.skip_update);
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["pindown", "-v"]).unwrap();
        assert_eq!(args.verbose, 1);

        let args = Args::try_parse_from(["pindown", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let args = Args::try_parse_from(["pindown", "-q"]).unwrap();
        assert!(args.quiet);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        // --help causes early exit, so we check it returns an error with Help kind
        let result = Args::try_parse_from(["pindown", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let result = Args::try_parse_from(["pindown", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let result = Args::try_parse_from(["pindown", "--invalid-flag"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
