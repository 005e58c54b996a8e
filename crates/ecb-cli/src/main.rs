//! `ecb` - drive the bridge from a terminal or a parent process
//!
//! `run` dispatches one command, `serve` answers one request per stdin line
//! until EOF or `quit`, `settings` reads and writes the config file and
//! `types` lists the registered component types.

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command as Cli};
use ecb_core::{BridgeConfig, Command, Dispatcher, Session, DEFAULT_CONFIG_FILE, SETTING_KEYS};
use ecb_reflect::{Namespace, TypeRegistry};
use ecb_scene::{SceneDocument, SceneGraph};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

fn scene_args(command: Cli) -> Cli {
    command
        .arg(
            Arg::new("scene")
                .long("scene")
                .value_parser(value_parser!(PathBuf))
                .help("Scene document to load before dispatching"),
        )
        .arg(
            Arg::new("write-back")
                .long("write-back")
                .action(ArgAction::SetTrue)
                .requires("scene")
                .help("Save the scene document after successful edits"),
        )
}

fn cli() -> Cli {
    Cli::new("ecb")
        .version(ecb_core::VERSION)
        .about("Editor command bridge")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Config file (default: ./ecb.toml when present)"),
        )
        .subcommand(
            scene_args(Cli::new("run").about("Dispatch one command and print its result")).arg(
                Arg::new("command")
                    .required(true)
                    .num_args(1..)
                    .trailing_var_arg(true)
                    .allow_hyphen_values(true)
                    .help("Command name followed by its arguments and --key=value options"),
            ),
        )
        .subcommand(scene_args(
            Cli::new("serve").about("Answer one request per stdin line until EOF or `quit`"),
        ))
        .subcommand(
            Cli::new("settings")
                .about("Inspect or change configuration")
                .subcommand_required(true)
                .subcommand(Cli::new("show").about("Print every setting"))
                .subcommand(
                    Cli::new("get")
                        .about("Print one setting")
                        .arg(Arg::new("key").required(true)),
                )
                .subcommand(
                    Cli::new("set")
                        .about("Change one setting in the config file")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true).allow_hyphen_values(true)),
                ),
        )
        .subcommand(
            Cli::new("types")
                .about("List registered component types")
                .arg(Arg::new("namespace").help("engine, extensions or user")),
        )
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Where the scene comes from and whether edits go back to it
#[derive(Debug, Default)]
struct SceneFile {
    path: Option<PathBuf>,
    write_back: bool,
}

impl SceneFile {
    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            path: matches.get_one::<PathBuf>("scene").cloned(),
            write_back: matches.get_flag("write-back"),
        }
    }

    fn load(&self, max_depth: usize) -> Result<SceneGraph> {
        let Some(path) = &self.path else {
            return Ok(SceneGraph::new());
        };
        let document = SceneDocument::load(path).with_context(|| format!("cannot load scene {}", path.display()))?;
        let graph = document.into_graph_with_depth(max_depth)?;
        tracing::info!(path = %path.display(), nodes = graph.len(), "scene loaded");
        Ok(graph)
    }

    fn store(&self, graph: &SceneGraph) -> Result<()> {
        match &self.path {
            Some(path) if self.write_back => {
                SceneDocument::from_graph(graph)
                    .save(path)
                    .with_context(|| format!("cannot save scene {}", path.display()))?;
                tracing::info!(path = %path.display(), "scene written back");
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

fn dispatcher(config: BridgeConfig) -> Result<Dispatcher> {
    Ok(Dispatcher::new(Arc::new(Session::new(config)?)))
}

async fn run(config: BridgeConfig, matches: &ArgMatches) -> Result<bool> {
    let tokens: Vec<String> = matches
        .get_many::<String>("command")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let command = Command::from_tokens(tokens)?;
    let scene = SceneFile::from_matches(matches);

    let mut graph = scene.load(config.max_traversal_depth)?;
    let dispatcher = dispatcher(config)?;
    let result = dispatcher.dispatch(&mut graph, &command).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    if result.success {
        scene.store(&graph)?;
    }
    Ok(result.success)
}

fn is_quit(line: &str) -> bool {
    matches!(line, "quit" | "exit")
}

async fn serve(config: BridgeConfig, matches: &ArgMatches) -> Result<()> {
    let scene = SceneFile::from_matches(matches);
    let mut graph = scene.load(config.max_traversal_depth)?;
    let dispatcher = dispatcher(config)?;
    tracing::info!(commands = dispatcher.len(), "serving requests from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut served = 0usize;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if is_quit(line) {
            break;
        }
        let result = dispatcher.dispatch_line(&mut graph, line).await;
        println!("{}", serde_json::to_string(&result)?);
        served += 1;
    }

    tracing::info!(served, "request loop finished");
    scene.store(&graph)
}

fn settings(config: BridgeConfig, config_path: Option<&Path>, matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("show", _)) => {
            for key in SETTING_KEYS {
                println!("{key} = {}", config.get(key)?);
            }
        }
        Some(("get", args)) => {
            let key = args.get_one::<String>("key").map_or("", String::as_str);
            println!("{}", config.get(key)?);
        }
        Some(("set", args)) => {
            let key = args.get_one::<String>("key").map_or("", String::as_str);
            let value = args.get_one::<String>("value").map_or("", String::as_str);

            // edit the file itself so environment overrides are not persisted
            let path = config_path.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
            let mut stored = if path.exists() {
                BridgeConfig::from_file(path)?
            } else {
                BridgeConfig::default()
            };
            stored.set(key, value)?;
            stored.validate()?;
            stored.save(path)?;
            tracing::info!(key, path = %path.display(), "setting saved");
            println!("{key} = {}", stored.get(key)?);
        }
        _ => unreachable!("settings requires a subcommand"),
    }
    Ok(())
}

fn types(config: &BridgeConfig, matches: &ArgMatches) -> Result<()> {
    let mut registry = TypeRegistry::with_builtins();
    registry.register_declarations(&config.types)?;

    let namespace = matches
        .get_one::<String>("namespace")
        .map(|raw| raw.parse::<Namespace>().map_err(anyhow::Error::msg))
        .transpose()?;
    let listed: Vec<_> = match namespace {
        Some(namespace) => registry.in_namespace(namespace).collect(),
        None => registry.iter().collect(),
    };

    for descriptor in listed {
        println!("{}", descriptor.qualified_name());
        for member in &descriptor.members {
            let access = if member.writable { "" } else { " (read-only)" };
            println!("  {}: {} = {}{access}", member.name, member.value_type, member.default);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let matches = cli().get_matches();
    let config_path = matches.get_one::<PathBuf>("config").cloned();
    let config = BridgeConfig::load(config_path.as_deref())?;
    init_tracing(config.debug);

    match matches.subcommand() {
        Some(("run", args)) => {
            let success = run(config, args).await?;
            Ok(if success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Some(("serve", args)) => {
            serve(config, args).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(("settings", args)) => {
            settings(config, config_path.as_deref(), args)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(("types", args)) => {
            types(&config, args)?;
            Ok(ExitCode::SUCCESS)
        }
        _ => unreachable!("clap requires a subcommand"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn run_keeps_command_options() {
        let matches = cli()
            .try_get_matches_from(["ecb", "run", "--scene", "level.json", "find", "Camera", "--by=component"])
            .unwrap();
        let (_, run) = matches.subcommand().unwrap();
        let tokens: Vec<&String> = run.get_many::<String>("command").unwrap().collect();
        assert_eq!(tokens, ["find", "Camera", "--by=component"]);
        assert_eq!(run.get_one::<PathBuf>("scene"), Some(&PathBuf::from("level.json")));
    }

    #[test]
    fn write_back_needs_a_scene() {
        assert!(cli().try_get_matches_from(["ecb", "serve", "--write-back"]).is_err());
    }

    #[test]
    fn quit_words() {
        assert!(is_quit("quit"));
        assert!(is_quit("exit"));
        assert!(!is_quit("ping"));
    }

    #[test]
    fn scene_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level.json");
        let scene = SceneFile {
            path: Some(path.clone()),
            write_back: true,
        };

        let mut graph = SceneGraph::new();
        let root = graph.add_root("root");
        graph.add_child(root, "Player").unwrap();
        scene.store(&graph).unwrap();

        let loaded = scene.load(ecb_scene::DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded.resolve("root/Player").is_ok());
    }

    #[test]
    fn scene_deeper_than_the_configured_limit_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let scene = SceneFile {
            path: Some(dir.path().join("deep.json")),
            write_back: true,
        };
        let mut graph = SceneGraph::new();
        let root = graph.add_root("root");
        let child = graph.add_child(root, "a").unwrap();
        graph.add_child(child, "b").unwrap();
        scene.store(&graph).unwrap();

        assert!(scene.load(2).is_err());
        assert_eq!(scene.load(3).unwrap().len(), 3);
    }

    #[test]
    fn no_scene_means_empty_graph() {
        let scene = SceneFile::default();
        assert!(scene.load(ecb_scene::DEFAULT_MAX_DEPTH).unwrap().is_empty());
        scene.store(&SceneGraph::new()).unwrap();
    }
}
