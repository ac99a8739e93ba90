use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["campusnav-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_locations_command() {
    let cli =
        Cli::try_parse_from(["campusnav-cli", "locations"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Locations)));
}

#[test]
fn parses_check_config_with_path_overrides() {
    let cli = Cli::try_parse_from([
        "campusnav-cli",
        "check-config",
        "--config",
        "conf.xml",
        "--locations",
        "locs.xml",
    ])
    .expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::CheckConfig)));
    assert_eq!(cli.config, Some(PathBuf::from("conf.xml")));
    assert_eq!(cli.locations, Some(PathBuf::from("locs.xml")));
}

#[test]
fn parses_suggest_keys() {
    let cli = Cli::try_parse_from(["campusnav-cli", "suggest", "li", "--keys", "down,down,enter"])
        .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Suggest { query, keys }) => {
            assert_eq!(query, "li");
            assert_eq!(
                keys,
                vec![FieldKey::ArrowDown, FieldKey::ArrowDown, FieldKey::Enter]
            );
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn rejects_unknown_key() {
    let result = Cli::try_parse_from(["campusnav-cli", "suggest", "li", "--keys", "space"]);
    assert!(result.is_err());
}

#[test]
fn parses_route_with_waypoints_in_order() {
    let cli = Cli::try_parse_from([
        "campusnav-cli",
        "route",
        "Gym",
        "Lab",
        "--via",
        "Library",
        "--via",
        "Student Center",
        "--json",
    ])
    .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Route {
            start,
            end,
            via,
            plan_only,
            json,
        }) => {
            assert_eq!(start, "Gym");
            assert_eq!(end, "Lab");
            assert_eq!(via, vec!["Library", "Student Center"]);
            assert!(!plan_only);
            assert!(json);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn route_requires_both_endpoints() {
    assert!(Cli::try_parse_from(["campusnav-cli", "route", "Gym"]).is_err());
}
