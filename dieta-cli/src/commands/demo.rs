use clap::{Args, Subcommand};
use dieta_core::{today, DemoGenerator};

use super::confirm;

#[derive(Args)]
pub struct DemoCommand {
    #[command(subcommand)]
    pub command: DemoSubcommand,
}

#[derive(Subcommand)]
pub enum DemoSubcommand {
    /// Replace foods and plans with generated sample data
    Enable {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Leave presentation mode, keeping the generated data
    Disable,

    /// Delete all foods and planned meals
    Clear {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Show whether presentation mode is on
    Status,
}

impl DemoCommand {
    pub fn run(&self, demo: &DemoGenerator<'_>) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            DemoSubcommand::Enable { force } => {
                if !force && !confirm("This replaces all foods and planned meals. Continue?")? {
                    println!("Cancelled.");
                    return Ok(());
                }

                let summary = demo.enable(&mut rand::rng(), today())?;
                println!(
                    "Presentation mode enabled: {} foods, {} planned days",
                    summary.foods, summary.days
                );
                Ok(())
            }

            DemoSubcommand::Disable => {
                demo.disable()?;
                println!("Presentation mode disabled");
                Ok(())
            }

            DemoSubcommand::Clear { force } => {
                if !force && !confirm("Delete all foods and planned meals?")? {
                    println!("Cancelled.");
                    return Ok(());
                }

                demo.clear_all_data()?;
                println!("All food and planner data cleared");
                Ok(())
            }

            DemoSubcommand::Status => {
                let state = if demo.is_enabled() { "on" } else { "off" };
                println!("Presentation mode: {}", state);
                Ok(())
            }
        }
    }
}
