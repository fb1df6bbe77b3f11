// Init command for writing a default settings file

use crate::config::{self, Settings};
use crate::ui;

pub fn init() -> anyhow::Result<()> {
    if Settings::exists() {
        ui::dim("Settings file detected. Skipping initialization.");
        return Ok(());
    }

    Settings::default().save()?;
    ui::success(&format!("Initialized {}", config::settings_path()));
    Ok(())
}
