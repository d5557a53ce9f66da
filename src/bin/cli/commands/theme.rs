use anyhow::{Context, Result};

use flashdeck_lib::settings::{lookup_as, save_as, Lookup, Theme, THEME_KEY};

use crate::app::App;

pub fn run(app: &App, new_theme: Option<&str>) -> Result<()> {
    let mut store = app
        .settings
        .lock()
        .map_err(|_| anyhow::anyhow!("Settings store is unavailable"))?;

    match new_theme {
        Some(name) => {
            let theme: Theme = serde_json::from_value(serde_json::Value::from(name))
                .with_context(|| format!("Unknown theme '{}'", name))?;
            save_as(&mut *store, THEME_KEY, &theme).context("Failed to save theme")?;
            println!("Theme set to {}", name);
        }
        None => {
            let theme = match lookup_as::<Theme, _>(&*store, THEME_KEY) {
                Ok(Lookup::Found(theme)) => theme,
                Ok(Lookup::Missing) => {
                    let theme = Theme::default();
                    save_as(&mut *store, THEME_KEY, &theme).context("Failed to save theme")?;
                    theme
                }
                Err(e) => {
                    log::warn!("Ignoring invalid theme setting: {}", e);
                    Theme::default()
                }
            };
            println!("{}", serde_json::to_value(theme)?.as_str().unwrap_or("light"));
        }
    }

    Ok(())
}
