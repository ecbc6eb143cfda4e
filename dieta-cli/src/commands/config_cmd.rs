use clap::{Args, Subcommand};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use super::OutputFormat;
use crate::config::Config;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

const DEFAULT_CONFIG: &str = r#"# dieta configuration

# Directory holding the JSON data files (default: platform data dir/dieta)
# data_dir: ~/.local/share/dieta

# Display language (it, en). Overrides the stored app setting when set.
# language: it

# Daily nutrition targets used by the dashboard
targets:
  calories: 2200
  proteins: 120
  carbs: 280
  fats: 70

# Days generated around today by `dieta demo enable`
demo:
  past_days: 14
  future_days: 7
"#;

fn render_text(config: &Config) -> String {
    let file = match &config.config_file {
        Some(path) => path.display().to_string(),
        None => format!("{} (not found)", Config::default_config_path().display()),
    };

    let t = &config.targets.value;
    let d = &config.demo.value;
    let rows = [
        (
            "data_dir",
            config.data_dir.value.display().to_string(),
            config.data_dir.source,
        ),
        ("language", config.language.value.clone(), config.language.source),
        (
            "targets",
            format!(
                "{} kcal, {} g proteins, {} g carbs, {} g fats",
                t.calories, t.proteins, t.carbs, t.fats
            ),
            config.targets.source,
        ),
        (
            "demo",
            format!("{} day(s) back, {} day(s) ahead", d.past_days, d.future_days),
            config.demo.source,
        ),
    ];

    let mut out = format!("Config file: {}\n\n", file);
    for (key, value, source) in rows {
        out.push_str(&format!("{:<9} {}  [{}]\n", key, value, source));
    }
    out
}

impl ConfigCommand {
    pub fn run(
        &self,
        config: &Config,
        cli_config_path: Option<PathBuf>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => print!("{}", render_text(config)),
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = cli_config_path.unwrap_or_else(Config::default_config_path);

                if config_path.exists() {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'dieta config show' to view current configuration.");
                    return Ok(());
                }

                if let Some(parent) = config_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                let mut file = fs::File::create(&config_path)?;
                file.write_all(DEFAULT_CONFIG.as_bytes())?;

                println!("Created config file: {}", config_path.display());
                println!("\nEdit this file to customize your settings.");
                Ok(())
            }
        }
    }
}
