use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let info = app.session.last_deck().context("Failed to read settings")?;

    let Some(info) = info else {
        match format {
            OutputFormat::Json => println!("null"),
            OutputFormat::Plain => println!("No deck has been used yet"),
        }
        return Ok(());
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        OutputFormat::Plain => {
            println!("{}", info);
            println!("  {}", info.path.display());
            if let Some(studied) = info.last_studied {
                println!("  last studied {}", studied.format("%Y-%m-%d %H:%M"));
            }

            let mut levels: Vec<_> = info.mastery_levels.iter().collect();
            levels.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)));
            for (question, level) in levels {
                println!("  {:>3}  {}", level, question);
            }
        }
    }

    Ok(())
}
