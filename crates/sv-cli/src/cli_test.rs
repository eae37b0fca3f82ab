use super::*;

#[test]
fn test_sample_with_globals() {
    let cli = Cli::try_parse_from([
        "sieve",
        "-v",
        "-p",
        "/tmp/project",
        "sample",
        "--datasets",
        "order,consumer",
        "--output",
        "json",
    ])
    .unwrap();
    assert!(cli.global.verbose);
    assert_eq!(cli.global.project_dir, PathBuf::from("/tmp/project"));
    match cli.command {
        Commands::Sample(args) => {
            assert_eq!(args.datasets.as_deref(), Some("order,consumer"));
            assert_eq!(args.output, OutputFormat::Json);
        }
        other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn test_profile_requires_dataset() {
    assert!(Cli::try_parse_from(["sieve", "profile"]).is_err());
    let cli = Cli::try_parse_from(["sieve", "profile", "order", "--max-cols", "3"]).unwrap();
    match cli.command {
        Commands::Profile(args) => {
            assert_eq!(args.dataset, "order");
            assert_eq!(args.max_cols, Some(3));
            assert_eq!(args.output, OutputFormat::Text);
        }
        other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["sieve", "fetch", "--resume", "-c", "alt.yml"]).unwrap();
    assert_eq!(cli.global.config, Some(PathBuf::from("alt.yml")));
    assert!(matches!(cli.command, Commands::Fetch(FetchArgs { resume: true, .. })));
}
