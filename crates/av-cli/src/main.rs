use anyhow::{Context, Result};
use av_asset::{AssetPath, VariantTag};
use av_core::{VariantConfig, VariantOrchestrator};
use av_store::{FsStore, StoreGraphHost};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Config file picked up from the project root when `--config` is absent
const PROJECT_CONFIG: &str = "asset-variants.toml";

fn cli() -> Command {
    let paths = || {
        Arg::new("paths")
            .required(true)
            .num_args(1..)
            .value_name("PATH")
            .help("Asset paths relative to the project root, e.g. Assets/Levels/Forest.unity")
    };

    Command::new("asset-variants")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Create tagged variants of scenes and prefabs with substituted sprites")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("project")
                .long("project")
                .global(true)
                .default_value(".")
                .value_parser(value_parser!(PathBuf))
                .help("Project directory holding the asset tree"),
        )
        .arg(
            Arg::new("tag")
                .long("tag")
                .global(true)
                .help("Variant tag; defaults to the configured default tag"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("scene")
                .about("Create scene variants")
                .arg(paths()),
        )
        .subcommand(
            Command::new("prefab")
                .about("Create prefab variants")
                .arg(paths()),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(project: &Path, explicit: Option<&PathBuf>) -> Result<VariantConfig> {
    let path = match explicit {
        Some(path) => path.clone(),
        None => {
            let candidate = project.join(PROJECT_CONFIG);
            if !candidate.is_file() {
                return Ok(VariantConfig::default());
            }
            candidate
        }
    };
    tracing::debug!(config = %path.display(), "loading configuration");
    VariantConfig::load(&path).with_context(|| format!("loading {}", path.display()))
}

fn resolve_tag(config: &VariantConfig, requested: Option<&String>) -> Result<VariantTag> {
    match requested {
        Some(tag) => tag
            .parse()
            .with_context(|| format!("invalid tag '{tag}'")),
        None => Ok(config.default_tag.clone()),
    }
}

fn parse_paths(args: &ArgMatches) -> Result<Vec<AssetPath>> {
    args.get_many::<String>("paths")
        .into_iter()
        .flatten()
        .map(|raw| {
            raw.parse::<AssetPath>()
                .with_context(|| format!("invalid asset path '{raw}'"))
        })
        .collect()
}

fn run(matches: &ArgMatches) -> Result<Vec<AssetPath>> {
    let project = matches
        .get_one::<PathBuf>("project")
        .context("missing project directory")?;
    let config = load_config(project, matches.get_one::<PathBuf>("config"))?;
    let tag = resolve_tag(&config, matches.get_one::<String>("tag"))?;

    let store = FsStore::open(project)
        .with_context(|| format!("opening project {}", project.display()))?;
    let host = StoreGraphHost::new(&store);
    let orchestrator = VariantOrchestrator::new(&store, &host, &config);

    let produced = match matches.subcommand() {
        Some(("scene", args)) => orchestrator.create_scene_variants(&parse_paths(args)?, &tag)?,
        Some(("prefab", args)) => orchestrator.create_object_variants(&parse_paths(args)?, &tag)?,
        _ => anyhow::bail!("unknown command"),
    };
    Ok(produced)
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("json"));

    for path in run(&matches)? {
        println!("{path}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use av_store::AssetStore;
    use av_test_utils::{seed_fs_store, FOREST_SCENE, ORC_PREFAB};

    fn matches(args: &[&str]) -> ArgMatches {
        cli().try_get_matches_from(args).unwrap()
    }

    #[test]
    fn cli_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn paths_are_required() {
        assert!(cli()
            .try_get_matches_from(["asset-variants", "scene"])
            .is_err());
    }

    #[test]
    fn dot_segments_in_paths_are_rejected() {
        let args = matches(&["asset-variants", "prefab", "Assets/../Outside/Orc.prefab"]);
        let (_, prefab) = args.subcommand().unwrap();
        let err = parse_paths(prefab).unwrap_err();
        assert!(err.to_string().contains("Assets/../Outside/Orc.prefab"));

        let args = matches(&["asset-variants", "prefab", ORC_PREFAB]);
        let (_, prefab) = args.subcommand().unwrap();
        assert_eq!(parse_paths(prefab).unwrap(), vec![AssetPath::from(ORC_PREFAB)]);
    }

    #[test]
    fn tag_defaults_to_config() {
        let config = VariantConfig::default();
        assert_eq!(resolve_tag(&config, None).unwrap().as_str(), "sd");
        assert_eq!(
            resolve_tag(&config, Some(&"hd".to_string())).unwrap().as_str(),
            "hd"
        );
        assert!(resolve_tag(&config, Some(&"a/b".to_string())).is_err());
    }

    #[test]
    fn project_config_is_picked_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(PROJECT_CONFIG),
            "folder_prefix = \"Alt-\"\ndefault_tag = \"hd\"\n",
        )
        .unwrap();
        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config.folder_prefix, "Alt-");
        assert_eq!(config.default_tag.as_str(), "hd");
    }

    #[test]
    fn runs_scene_and_prefab_commands() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::open(dir.path()).unwrap();
        seed_fs_store(&store).unwrap();
        let project = dir.path().to_str().unwrap();

        let scenes = run(&matches(&[
            "asset-variants", "scene", FOREST_SCENE, "--project", project, "--tag", "hd",
        ]))
        .unwrap();
        assert_eq!(scenes, vec![AssetPath::from("Assets/Variant-hd/Levels/Forest-hd.unity")]);

        let prefabs = run(&matches(&[
            "asset-variants", "prefab", ORC_PREFAB, "--project", project,
        ]))
        .unwrap();
        assert_eq!(prefabs, vec![AssetPath::from("Assets/Variant-sd/Enemies/Orc-sd.prefab")]);
        assert!(store.exists(&prefabs[0]));
    }
}
