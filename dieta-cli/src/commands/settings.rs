use clap::{Args, Subcommand};
use dieta_core::{reduce, Action, AppState, SettingsStore, Theme};

use super::OutputFormat;

#[derive(Args)]
pub struct SettingsCommand {
    #[command(subcommand)]
    pub command: SettingsSubcommand,
}

#[derive(Subcommand)]
pub enum SettingsSubcommand {
    /// Show app settings
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Set the theme (light, dark, system)
    SetTheme {
        theme: String,
    },

    /// Set the display language (e.g. it, en)
    SetLanguage {
        language: String,
    },
}

impl SettingsCommand {
    pub fn run(&self, store: &SettingsStore<'_>) -> Result<(), Box<dyn std::error::Error>> {
        let state = AppState {
            settings: store.load_settings()?,
            ..Default::default()
        };

        let action = match &self.command {
            SettingsSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&state.settings)?)
                    }
                    OutputFormat::Text => {
                        println!("theme: {}", state.settings.theme);
                        println!("language: {}", state.settings.language);
                    }
                }
                return Ok(());
            }
            SettingsSubcommand::SetTheme { theme } => {
                let theme: Theme = theme.parse().map_err(|e: String| e)?;
                Action::SetTheme(theme)
            }
            SettingsSubcommand::SetLanguage { language } => {
                let language = language.trim().to_lowercase();
                if language.is_empty() {
                    return Err("Language must not be empty".into());
                }
                Action::SetLanguage(language)
            }
        };

        let state = reduce(state, &action);
        let saved = store.save_settings(state.settings)?;
        println!("Settings saved (theme: {}, language: {})", saved.theme, saved.language);
        Ok(())
    }
}
