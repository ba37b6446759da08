//! Tests for command-line parsing and output path derivation

#[cfg(test)]
mod tests {
    use clap::Parser;
    use flowlisa::analysis::lisa::ZeroIntensityPolicy;
    use flowlisa::io::cli::{Cli, Command, derived_output_path};
    use flowlisa::io::configuration::{
        DEFAULT_INTENSITY_COLUMN, DEFAULT_ORIGIN_COLUMN, SIGNIFICANCE_THRESHOLD,
    };
    use std::path::{Path, PathBuf};

    // Tests the lisa subcommand with only required arguments
    // Verified by changing default values to ensure defaults are used
    #[test]
    fn test_lisa_minimal_args() {
        let cli = Cli::parse_from(["flowlisa", "lisa", "-f", "flows.csv", "-d", "dist.csv"]);

        let Command::Lisa(args) = cli.command else {
            unreachable!("Expected lisa subcommand");
        };
        assert_eq!(args.flows, PathBuf::from("flows.csv"));
        assert_eq!(args.intensities, vec![DEFAULT_INTENSITY_COLUMN.to_string()]);
        assert_eq!(args.origin_column, DEFAULT_ORIGIN_COLUMN);
        assert!((args.threshold - SIGNIFICANCE_THRESHOLD).abs() < f64::EPSILON);
        assert_eq!(args.zero_intensity, ZeroIntensityPolicy::Propagate);
        assert!(!args.standardize);
        assert!(!args.no_distance_header);
        assert_eq!(args.output_path(), PathBuf::from("flows_lisa.csv"));
        assert!(!cli.quiet);
    }

    // Tests repeated intensity columns and custom column names
    // Verified by keeping only the last intensity column
    #[test]
    fn test_lisa_all_args() {
        let cli = Cli::parse_from([
            "flowlisa",
            "lisa",
            "--flows",
            "od.csv",
            "--distances",
            "dist.csv",
            "--origin-column",
            "num_x",
            "--destination-column",
            "num_y",
            "--intensity",
            "Zyouth_P",
            "--intensity",
            "Zpay_P",
            "--threshold",
            "1.96",
            "--zero-intensity",
            "reject",
            "--standardize",
            "--no-distance-header",
            "--output",
            "out.csv",
            "--summary",
            "summary.json",
            "--quiet",
        ]);

        assert!(cli.quiet);
        assert!(!cli.should_show_progress());
        let Command::Lisa(args) = cli.command else {
            unreachable!("Expected lisa subcommand");
        };
        assert_eq!(args.intensities, vec!["Zyouth_P", "Zpay_P"]);
        assert_eq!(args.columns().intensity, "Zyouth_P");
        assert_eq!(args.columns().destination, "num_y");
        assert_eq!(args.zero_intensity, ZeroIntensityPolicy::Reject);
        assert!(args.config().is_ok());
        assert_eq!(args.output_path(), PathBuf::from("out.csv"));
        assert_eq!(args.summary, Some(PathBuf::from("summary.json")));
    }

    // Tests an invalid threshold parses but fails validation
    // Verified by skipping threshold validation
    #[test]
    fn test_lisa_threshold_validation() {
        let cli = Cli::parse_from([
            "flowlisa", "lisa", "-f", "a.csv", "-d", "b.csv", "-t", "0",
        ]);
        let Command::Lisa(args) = cli.command else {
            unreachable!("Expected lisa subcommand");
        };
        assert!(args.config().is_err());
    }

    // Tests unknown zero-intensity policies are rejected by the parser
    // Verified by defaulting unknown values to propagate
    #[test]
    fn test_unknown_policy_rejected() {
        let result = Cli::try_parse_from([
            "flowlisa",
            "lisa",
            "-f",
            "a.csv",
            "-d",
            "b.csv",
            "--zero-intensity",
            "skip",
        ]);
        assert!(result.is_err());
    }

    // Tests the equity subcommand and its default output
    // Verified by using the lisa suffix for equity output
    #[test]
    fn test_equity_args() {
        let cli = Cli::parse_from([
            "flowlisa",
            "equity",
            "-a",
            "data/SIG_aggregates.csv",
            "--normalize-demand",
        ]);

        let Command::Equity(args) = cli.command else {
            unreachable!("Expected equity subcommand");
        };
        assert!(args.normalize_demand);
        assert_eq!(
            args.output_path(),
            PathBuf::from("data/SIG_aggregates_coulter.csv")
        );
        assert_eq!(
            args.summary_path(),
            PathBuf::from("data/SIG_aggregates_coulter_index.json")
        );
    }

    // Tests an explicit summary path replaces the default index file
    // Verified by always writing the default index file
    #[test]
    fn test_equity_summary_override() {
        let cli = Cli::parse_from([
            "flowlisa",
            "equity",
            "-a",
            "regions.csv",
            "--summary",
            "out/indices.json",
        ]);

        let Command::Equity(args) = cli.command else {
            unreachable!("Expected equity subcommand");
        };
        assert_eq!(args.summary_path(), PathBuf::from("out/indices.json"));
    }

    // Tests output paths sit next to the input
    // Verified by dropping the parent directory
    #[test]
    fn test_derived_output_path() {
        assert_eq!(
            derived_output_path(Path::new("/tmp/od.csv"), "_lisa"),
            PathBuf::from("/tmp/od_lisa.csv")
        );
        assert_eq!(
            derived_output_path(Path::new("od"), "_x"),
            PathBuf::from("od_x.csv")
        );
    }
}
