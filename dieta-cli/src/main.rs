use clap::{Parser, Subcommand};
use dieta_core::{
    Dashboard, DemoGenerator, FileStore, FoodStore, PlannerStore, SettingsStore, StoreError,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;

use commands::{
    ConfigCommand, DashboardCommand, DemoCommand, FoodCommand, PlanCommand, SettingsCommand,
    UserCommand,
};
use config::Config;

#[derive(Parser)]
#[command(name = "dieta")]
#[command(version)]
#[command(about = "Food catalog, meal planner and diet dashboard", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the food catalog
    Food(FoodCommand),

    /// Plan meals by date
    Plan(PlanCommand),

    /// Show nutrition totals, daily score and weekly trend
    Dashboard(DashboardCommand),

    /// Presentation mode with generated sample data
    Demo(DemoCommand),

    /// App settings (theme, language)
    Settings(SettingsCommand),

    /// User profile
    User(UserCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dieta=warn,dieta_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        match e.downcast_ref::<StoreError>() {
            Some(store_err) => {
                tracing::error!("{}", store_err);
                eprintln!("Error: {}", store_err.user_message());
            }
            None => eprintln!("Error: {}", e),
        }
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let cli_config_path = cli.config.clone();
    let config = Config::load(cli.config)?;
    tracing::debug!(data_dir = %config.data_dir.value.display(), "configuration loaded");

    execute_command(&cli.command, &config, cli_config_path)
}

fn execute_command(
    command: &Option<Commands>,
    config: &Config,
    cli_config_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let kv = FileStore::new(config.data_dir.value.clone());
    let foods = FoodStore::new(&kv);
    let planner = PlannerStore::new(&kv);
    let settings = SettingsStore::new(&kv);

    match command {
        Some(Commands::Food(cmd)) => {
            cmd.run(&foods)?;
        }
        Some(Commands::Plan(cmd)) => {
            let language = config.effective_language(&settings.load_settings()?.language);
            cmd.run(&planner, &foods, &language)?;
        }
        Some(Commands::Dashboard(cmd)) => {
            let language = config.effective_language(&settings.load_settings()?.language);
            let dashboard = Dashboard::new(&foods, &planner)
                .with_targets(config.targets.value)
                .with_language(language.clone());
            cmd.run(&dashboard, &language)?;
        }
        Some(Commands::Demo(cmd)) => {
            let demo = DemoGenerator::new(&kv, &foods, &planner).with_window(config.demo.value);
            cmd.run(&demo)?;
        }
        Some(Commands::Settings(cmd)) => {
            cmd.run(&settings)?;
        }
        Some(Commands::User(cmd)) => {
            cmd.run(&settings)?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(config, cli_config_path)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_nested_subcommands() {
        let cli = Cli::try_parse_from(["dieta", "food", "list", "--format", "json"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Food(_))));

        let cli = Cli::try_parse_from(["dieta", "user", "show"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::User(_))));
    }
}
