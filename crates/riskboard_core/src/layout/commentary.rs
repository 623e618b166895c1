//! Analysis notes derived from the asset statistics

use crate::encoding::{AssetCategory, VisualEncoder};
use crate::format::wrap_note;
use crate::model::AssetRecord;

pub const BULLET: &str = "• ";
const NO_SIGNALS: &str = "No notable signals.";

/// One note per focus and hedge asset, then one shared note for the neutrals
#[must_use]
pub fn commentary_notes(assets: &[AssetRecord], encoder: &VisualEncoder) -> Vec<String> {
    let gainers = assets.iter().filter(|a| a.is_gainer()).count();
    let categorized: Vec<(AssetCategory, &AssetRecord)> = assets
        .iter()
        .map(|a| (encoder.category_for(&a.ticker), a))
        .collect();

    let mut notes = Vec::new();

    for (_, asset) in categorized
        .iter()
        .filter(|(c, _)| *c == AssetCategory::Focus)
    {
        let color = AssetCategory::Focus.color_name();
        notes.push(if asset.is_gainer() {
            format!("FOCUS: {} ({color}) is holding up.", asset.ticker)
        } else {
            format!(
                "ALERT: {} ({color}) is critically underperforming.",
                asset.ticker
            )
        });
    }

    for (_, asset) in categorized
        .iter()
        .filter(|(c, _)| *c == AssetCategory::Hedge)
    {
        let color = AssetCategory::Hedge.color_name();
        notes.push(match (asset.is_gainer(), gainers) {
            (true, 1) => format!("DEFENSE: {} ({color}) is the sole positive hedge.", asset.ticker),
            (true, _) => format!("DEFENSE: {} ({color}) is a positive hedge.", asset.ticker),
            (false, _) => format!("WATCH: {} ({color}) hedge is under water.", asset.ticker),
        });
    }

    let neutrals: Vec<(AssetCategory, &AssetRecord)> = categorized
        .iter()
        .filter(|(c, _)| c.is_neutral())
        .copied()
        .collect();
    if !neutrals.is_empty() {
        let names: Vec<String> = neutrals
            .iter()
            .map(|(c, a)| format!("{} ({})", a.base_ticker(), c.color_name()))
            .collect();
        let verb = if names.len() == 1 { "is" } else { "are" };
        let trend = if neutrals.iter().all(|(_, a)| a.is_gainer()) {
            "keeping pace"
        } else {
            "lagging"
        };
        notes.push(format!("NEUTRAL: {} {verb} {trend}.", join_names(&names)));
    }

    notes
}

/// "A", "A and B", "A, B and C"
fn join_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [head @ .., last] => format!("{} and {last}", head.join(", ")),
    }
}

/// Wrap each note under a bullet, with a blank line between notes
#[must_use]
pub fn format_commentary(notes: &[String], width: usize) -> String {
    if notes.is_empty() {
        return format!("{BULLET}{NO_SIGNALS}");
    }
    notes
        .iter()
        .map(|note| wrap_note(note, BULLET, width).join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}
