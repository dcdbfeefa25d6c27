//! Main application entry point

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use eframe::egui;
use tracing::info;
use tracing_subscriber::EnvFilter;

use eudr_data::{load_dataset, DashboardConfig, OverlayFetcher};

mod app;

use app::DashboardApp;

/// Dashboard of legal land-use restrictions relevant to the EU
/// Deforestation Regulation
#[derive(Parser, Debug)]
#[command(name = "eudr-dashboard", version, about)]
struct Args {
    /// Configuration file (defaults to eudr-dashboard.json when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Restriction dataset, JSON or CSV
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Base directory for relative overlay paths
    #[arg(long)]
    overlay_dir: Option<PathBuf>,
}

/// Defaults, then the config file, then command-line overrides
fn resolve_config(args: &Args, working_dir: &Path) -> Result<DashboardConfig> {
    let mut config = DashboardConfig::discover(args.config.as_deref(), working_dir)
        .context("Failed to read configuration")?;

    if let Some(dataset) = &args.dataset {
        config.dataset_path = dataset.clone();
    }
    if let Some(overlay_dir) = &args.overlay_dir {
        config.overlay_base_dir = Some(overlay_dir.clone());
    }
    Ok(config)
}

fn main() -> Result<()> {
    #[cfg(all(windows, not(debug_assertions)))]
    hide_console_window();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = resolve_config(&args, &std::env::current_dir()?)?;

    info!("Starting EUDR dashboard with dataset {:?}", config.dataset_path);
    let dataset = load_dataset(&config.dataset_path)
        .with_context(|| format!("Failed to load dataset {:?}", config.dataset_path))?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let fetcher = OverlayFetcher::new(config.overlay_base_dir(), config.http_timeout())
        .context("Failed to create HTTP client")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([900.0, 600.0]),
        default_theme: eframe::Theme::Dark,
        persist_window: false,
        ..Default::default()
    };

    eframe::run_native(
        "EUDR Legal Restrictions",
        options,
        Box::new(move |cc| Box::new(DashboardApp::new(cc, config, dataset, runtime, Arc::new(fetcher)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}

// Windows-specific: Hide console window in release builds
#[cfg(all(windows, not(debug_assertions)))]
fn hide_console_window() {
    use winapi::um::wincon::GetConsoleWindow;
    use winapi::um::winuser::{ShowWindow, SW_HIDE};

    unsafe {
        let window = GetConsoleWindow();
        if !window.is_null() {
            ShowWindow(window, SW_HIDE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_command_line_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(DashboardConfig::DEFAULT_FILE),
            r#"{"dataset_path": "from_file.json", "page_size": 25}"#,
        )
        .unwrap();

        let args = Args::try_parse_from(["eudr-dashboard", "--dataset", "cli.csv", "--overlay-dir", "capas"]).unwrap();
        let config = resolve_config(&args, dir.path()).unwrap();

        assert_eq!(config.dataset_path, PathBuf::from("cli.csv"));
        assert_eq!(config.overlay_base_dir(), PathBuf::from("capas"));
        assert_eq!(config.page_size, 25);
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args::try_parse_from(["eudr-dashboard", "--config", "nope.json"]).unwrap();
        assert!(resolve_config(&args, dir.path()).is_err());
    }
}
