use anyhow::Result;
use pack_layout::config::Config;
use pack_layout::request::PackRequest;
use pack_layout::telemetry::init_tracing;
use tracing::{info, warn};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let mut cfg = Config::load()?;
    if let Some(path) = std::env::args().nth(1) {
        cfg.input.path = path.into();
    }

    info!(path = %cfg.input.path.display(), "loading pack request");
    let request = PackRequest::load(&cfg.input.path)?;

    let report = match request.generate(&cfg.defaults.generator_options()) {
        Ok(report) => report,
        Err(err) => {
            let payload = serde_json::json!({
                "error": err.kind(),
                "layer": err.layer(),
                "message": err.to_string(),
            });
            eprintln!("{payload}");
            anyhow::bail!(err);
        }
    };

    if report.layout.has_warnings() {
        warn!(count = report.layout.warnings.len(), "pack exceeds advisory limits");
    }
    info!(
        cells = report.layout.meta.cell_count,
        layers = report.layout.meta.layers.len(),
        volume_m3 = report.layout.meta.volume_m3,
        weight_kg = report.layout.meta.weight_kg,
        "pack layout generated"
    );

    let json = if cfg.output.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    match &cfg.output.path {
        Some(path) => {
            std::fs::write(path, json)?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{json}"),
    }

    Ok(())
}
