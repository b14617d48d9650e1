use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use location_logger::config::{SensorKind, Settings};
use location_logger::dashboard;
use location_logger::platform::{
    DirectoryMediaLibrary, LocalFileSystem, Platform, PolicyPermissions, PositionSensor,
    SimulatedSensor, TermuxSensor,
};
use location_logger::App;

#[derive(Parser, Debug)]
#[command(name = "location_logger")]
#[command(about = "Record position fixes and export them to the Download album", long_about = None)]
struct Args {
    /// JSON settings file; flags below override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Port to serve the UI on
    #[arg(long)]
    port: Option<u16>,

    /// Private directory export files are written to
    #[arg(long)]
    documents_dir: Option<PathBuf>,

    /// Shared media directory holding albums
    #[arg(long)]
    media_root: Option<PathBuf>,

    /// Position source
    #[arg(long, value_enum)]
    sensor: Option<SensorKind>,

    /// Answer location permission requests with "denied"
    #[arg(long)]
    deny_location: bool,

    /// Answer media library permission requests with "denied"
    #[arg(long)]
    deny_media: bool,

    /// Give up on a fix after this many seconds (0 = wait indefinitely)
    #[arg(long, value_name = "SECONDS")]
    fix_timeout_secs: Option<u64>,
}

impl Args {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        if let Some(port) = self.port {
            settings.port = port;
        }
        if let Some(dir) = &self.documents_dir {
            settings.documents_dir = dir.clone();
        }
        if let Some(root) = &self.media_root {
            settings.media_root = root.clone();
        }
        if let Some(sensor) = self.sensor {
            settings.sensor = sensor;
        }
        if self.deny_location {
            settings.permissions.location = false;
        }
        if self.deny_media {
            settings.permissions.media_library = false;
        }
        if let Some(secs) = self.fix_timeout_secs {
            settings.fix_timeout_secs = Some(secs);
        }

        Ok(settings)
    }
}

fn build_platform(settings: &Settings) -> Platform {
    let sensor: Arc<dyn PositionSensor> = match settings.sensor {
        SensorKind::Termux => Arc::new(TermuxSensor::new()),
        SensorKind::Simulated => Arc::new(SimulatedSensor::default()),
    };

    Platform {
        permissions: Arc::new(PolicyPermissions::new(
            settings.permissions.location,
            settings.permissions.media_library,
        )),
        sensor,
        files: Arc::new(LocalFileSystem::new(&settings.documents_dir)),
        media: Arc::new(DirectoryMediaLibrary::new(&settings.media_root)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let settings = args.settings()?;

    log::info!("Location Logger starting");
    log::info!("  Sensor: {:?}", settings.sensor);
    log::info!("  Documents: {}", settings.documents_dir.display());
    log::info!("  Media root: {}", settings.media_root.display());
    match settings.fix_timeout() {
        Some(limit) => log::info!("  Fix timeout: {}s", limit.as_secs()),
        None => log::info!("  Fix timeout: none"),
    }

    let app = Arc::new(App::new(build_platform(&settings), settings.fix_timeout()));
    dashboard::start_dashboard(app, settings.port).await?;

    Ok(())
}
