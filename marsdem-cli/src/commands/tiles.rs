//! Tile listing command.

use marsdem::{ElevationStore, ResolutionTier, TileSummary};

use super::common::print_json;
use crate::error::CliError;

/// List loaded tiles, as a table or as JSON.
pub fn run(store: &ElevationStore, json: bool) -> Result<(), CliError> {
    let tiles = store.tiles()?;
    if json {
        return print_json(&tiles);
    }

    let high = tiles.iter().filter(|t| t.tier == ResolutionTier::High).count();
    println!("Data directory: {}", store.base_dir().display());
    println!(
        "{} tiles ({} high-resolution, {} medium-resolution)",
        tiles.len(),
        high,
        tiles.len() - high
    );
    println!();
    for tile in &tiles {
        println!("{}", format_row(tile));
    }
    Ok(())
}

fn format_row(tile: &TileSummary) -> String {
    let name = tile
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!(
        "  {:<24} {:<6} lat [{:>7.2}, {:>7.2}]  lon [{:>6.1}, {:>6.1}]  {}x{}",
        name,
        tier_name(tile.tier),
        tile.min_lat,
        tile.max_lat,
        tile.min_lon,
        tile.max_lon,
        tile.width,
        tile.height
    )
}

fn tier_name(tier: ResolutionTier) -> &'static str {
    match tier {
        ResolutionTier::High => "high",
        ResolutionTier::Medium => "medium",
    }
}
