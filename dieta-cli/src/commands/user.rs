use clap::{Args, Subcommand};
use dieta_core::{reduce, Action, AppState, SettingsStore, UserInfo};

use super::OutputFormat;

#[derive(Args)]
pub struct UserCommand {
    #[command(subcommand)]
    pub command: UserSubcommand,
}

#[derive(Subcommand)]
pub enum UserSubcommand {
    /// Show the user profile
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Update profile fields
    Set(UserFields),
}

#[derive(Args, Default)]
pub struct UserFields {
    #[arg(long)]
    name: Option<String>,

    /// Age in years (1-120)
    #[arg(long)]
    age: Option<u32>,

    /// Weight in kg (1-500)
    #[arg(long)]
    weight: Option<f64>,

    /// Height in cm (1-300)
    #[arg(long)]
    height: Option<f64>,

    #[arg(long)]
    gender: Option<String>,

    /// e.g. sedentary, moderate, active
    #[arg(long)]
    activity_level: Option<String>,

    /// e.g. lose, maintain, gain
    #[arg(long)]
    goal: Option<String>,

    /// Dietary restriction (can be repeated; replaces the stored list)
    #[arg(long = "restriction", value_name = "RESTRICTION")]
    dietary_restrictions: Vec<String>,

    /// Allergy (can be repeated; replaces the stored list)
    #[arg(long = "allergy", value_name = "ALLERGY")]
    allergies: Vec<String>,
}

impl UserFields {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.weight.is_none()
            && self.height.is_none()
            && self.gender.is_none()
            && self.activity_level.is_none()
            && self.goal.is_none()
            && self.dietary_restrictions.is_empty()
            && self.allergies.is_empty()
    }

    fn apply(&self, mut info: UserInfo) -> UserInfo {
        if let Some(v) = &self.name {
            info.name = Some(v.clone());
        }
        if let Some(v) = self.age {
            info.age = Some(v);
        }
        if let Some(v) = self.weight {
            info.weight_kg = Some(v);
        }
        if let Some(v) = self.height {
            info.height_cm = Some(v);
        }
        if let Some(v) = &self.gender {
            info.gender = Some(v.clone());
        }
        if let Some(v) = &self.activity_level {
            info.activity_level = Some(v.clone());
        }
        if let Some(v) = &self.goal {
            info.goal = Some(v.clone());
        }
        if !self.dietary_restrictions.is_empty() {
            info.dietary_restrictions = self.dietary_restrictions.clone();
        }
        if !self.allergies.is_empty() {
            info.allergies = self.allergies.clone();
        }
        info
    }
}

impl UserCommand {
    pub fn run(&self, store: &SettingsStore<'_>) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            UserSubcommand::Show { format } => {
                let info = store.load_user_info()?;
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&info)?),
                    OutputFormat::Text => print_user(&info),
                }
                Ok(())
            }

            UserSubcommand::Set(fields) => {
                if fields.is_empty() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let state = AppState {
                    user_info: store.load_user_info()?,
                    ..Default::default()
                };
                let updated = fields.apply(state.user_info.clone());
                updated.validate()?;

                let state = reduce(state, &Action::SetUserInfo(updated));
                store.save_user_info(state.user_info)?;
                println!("Profile updated");
                Ok(())
            }
        }
    }
}

fn print_user(info: &UserInfo) {
    fn show<T: std::fmt::Display>(label: &str, value: &Option<T>) {
        match value {
            Some(v) => println!("{:<16} {}", label, v),
            None => println!("{:<16} -", label),
        }
    }

    show("name:", &info.name);
    show("age:", &info.age);
    show("weight (kg):", &info.weight_kg);
    show("height (cm):", &info.height_cm);
    show("gender:", &info.gender);
    show("activity level:", &info.activity_level);
    show("goal:", &info.goal);
    println!("{:<16} {}", "restrictions:", info.dietary_restrictions.join(", "));
    println!("{:<16} {}", "allergies:", info.allergies.join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides_only_given_fields() {
        let stored = UserInfo {
            name: Some("Anna".into()),
            age: Some(30),
            allergies: vec!["arachidi".into()],
            ..Default::default()
        };
        let fields = UserFields {
            age: Some(31),
            ..Default::default()
        };
        let updated = fields.apply(stored);
        assert_eq!(updated.name.as_deref(), Some("Anna"));
        assert_eq!(updated.age, Some(31));
        assert_eq!(updated.allergies, vec!["arachidi".to_string()]);
    }

    #[test]
    fn test_out_of_range_fields_fail_validation() {
        let fields = UserFields {
            age: Some(0),
            height: Some(400.0),
            ..Default::default()
        };
        assert!(fields.apply(UserInfo::default()).validate().is_err());
    }

    #[test]
    fn test_empty_fields() {
        assert!(UserFields::default().is_empty());
    }
}
