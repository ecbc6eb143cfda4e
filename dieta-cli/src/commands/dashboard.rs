use clap::Args;
use dieta_core::{today, Dashboard, DashboardData};
use std::future::Future;
use std::time::Duration;

use super::{parse_date, OutputFormat};

#[derive(Args)]
pub struct DashboardCommand {
    /// Date (YYYY-MM-DD), defaults to today
    #[arg(long, short)]
    date: Option<String>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Keep running and refresh periodically until interrupted
    #[arg(long, short)]
    watch: bool,

    /// Seconds between refreshes in watch mode
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    interval: u64,
}

impl DashboardCommand {
    pub fn run(
        &self,
        dashboard: &Dashboard<'_>,
        language: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let fixed_date = match &self.date {
            Some(d) => Some(parse_date(Some(d))?),
            None => None,
        };

        if !self.watch {
            let data = dashboard.refresh(fixed_date.unwrap_or_else(today))?;
            return self.print(&data, language);
        }

        let runtime = watch_runtime()?;
        runtime.block_on(self.watch_loop(dashboard, fixed_date, language, ctrl_c()))
    }

    /// Refreshes every `interval` seconds until `shutdown` completes.
    async fn watch_loop(
        &self,
        dashboard: &Dashboard<'_>,
        fixed_date: Option<chrono::NaiveDate>,
        language: &str,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval));
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    // Without --date the day rolls over at midnight.
                    let day = fixed_date.unwrap_or_else(today);
                    match dashboard.refresh(day) {
                        Ok(data) => {
                            if matches!(self.format, OutputFormat::Text) {
                                println!("\n{}", "#".repeat(40));
                            }
                            self.print(&data, language)?;
                        }
                        Err(e) => tracing::warn!("Dashboard refresh failed: {}", e),
                    }
                }
                _ = &mut shutdown => {
                    tracing::debug!("watch interrupted");
                    return Ok(());
                }
            }
        }
    }

    fn print(
        &self,
        data: &DashboardData,
        language: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string(data)?),
            OutputFormat::Text => print!("{}", render_text(data, language)),
        }
        Ok(())
    }
}

/// Single-threaded runtime for watch mode. Ctrl-C handling needs the
/// signal driver, which lives under the IO driver.
fn watch_runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Resolves on Ctrl-C. If the handler cannot be installed, never resolves.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

fn render_text(data: &DashboardData, language: &str) -> String {
    let english = language.to_lowercase().starts_with("en");
    let mut out = String::new();

    let title = format!("Dashboard {}", data.date);
    out.push_str(&format!("{}\n{}\n", title, "=".repeat(title.len())));
    out.push_str(&format!("Score: {}/100\n\n", data.daily_score));

    let rows = [
        (if english { "Calories" } else { "Calorie" }, &data.calories, "kcal"),
        (if english { "Proteins" } else { "Proteine" }, &data.proteins, "g"),
        (if english { "Carbs" } else { "Carboidrati" }, &data.carbs, "g"),
        (if english { "Fats" } else { "Grassi" }, &data.fats, "g"),
    ];
    for (label, progress, unit) in rows {
        out.push_str(&format!(
            "{:<12} {:>7.0} / {:<5.0} {:<4} {:>4.0}%\n",
            label,
            progress.current,
            progress.target,
            unit,
            progress.percent()
        ));
    }

    out.push('\n');
    for point in &data.weekly {
        out.push_str(&format!("{:<4} {:>3} {}\n", point.label, point.score, bar(point.score)));
    }

    out.push('\n');
    for meal in &data.meals {
        out.push_str(&format!(
            "{:<10} {:>2}  {}\n",
            meal.meal_type.label(language),
            meal.item_count,
            meal.status.label(language)
        ));
    }
    out
}

/// One block per 10 points.
fn bar(score: u8) -> String {
    "#".repeat(usize::from(score / 10))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dieta_core::dashboard::build_dashboard;
    use dieta_core::{
        DailyTargets, FoodStore, KeyValueStore, MemoryStore, PlannerData, PlannerStore,
    };

    fn empty_dashboard(language: &str) -> DashboardData {
        build_dashboard(
            &[],
            &PlannerData::new(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            &DailyTargets::default(),
            language,
        )
    }

    #[test]
    fn test_render_text_italian() {
        let text = render_text(&empty_dashboard("it"), "it");
        assert!(text.starts_with("Dashboard 2024-03-15"));
        assert!(text.contains("Score: 0/100"));
        assert!(text.contains("Colazione"));
        assert!(text.contains("Mancante"));
        assert!(text.contains("Ven"));
    }

    #[test]
    fn test_render_text_english() {
        let text = render_text(&empty_dashboard("en"), "en");
        assert!(text.contains("Breakfast"));
        assert!(text.contains("Missing"));
        assert!(text.contains("Calories"));
    }

    fn command(interval: u64) -> DashboardCommand {
        DashboardCommand {
            date: Some("2024-03-15".into()),
            format: OutputFormat::Json,
            watch: true,
            interval,
        }
    }

    #[test]
    fn test_watch_runtime_can_listen_for_ctrl_c() {
        let runtime = watch_runtime().unwrap();
        let interrupted = runtime.block_on(async {
            let mut interval = tokio::time::interval(Duration::from_millis(10));
            interval.tick().await;
            tokio::select! {
                _ = interval.tick() => false,
                _ = tokio::signal::ctrl_c() => true,
            }
        });
        assert!(!interrupted);
    }

    #[test]
    fn test_watch_loop_refreshes_until_shutdown() {
        let kv = MemoryStore::new();
        let foods = FoodStore::new(&kv);
        let planner = PlannerStore::new(&kv);
        let dashboard = Dashboard::new(&foods, &planner);
        let fixed = Some(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());

        let runtime = watch_runtime().unwrap();
        let _guard = runtime.enter();
        runtime
            .block_on(command(60).watch_loop(
                &dashboard,
                fixed,
                "it",
                tokio::time::sleep(Duration::from_millis(50)),
            ))
            .unwrap();
    }

    #[test]
    fn test_watch_loop_survives_failed_refresh() {
        let kv = MemoryStore::new();
        kv.set("foods", "{not json").unwrap();
        let foods = FoodStore::new(&kv);
        let planner = PlannerStore::new(&kv);
        let dashboard = Dashboard::new(&foods, &planner);

        let runtime = watch_runtime().unwrap();
        let _guard = runtime.enter();
        let result = runtime.block_on(command(60).watch_loop(
            &dashboard,
            None,
            "en",
            tokio::time::sleep(Duration::from_millis(50)),
        ));
        assert!(result.is_ok());
    }

    #[test]
    fn test_bar() {
        assert_eq!(bar(0), "");
        assert_eq!(bar(84), "########");
        assert_eq!(bar(100), "##########");
    }
}
