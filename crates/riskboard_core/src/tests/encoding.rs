//! Tests for visual encoding rules
//!
//! These tests verify:
//! - Category palette colors for the demo tickers
//! - Deterministic priority when a ticker matches several patterns
//! - Sign-based coloring for uncategorized tickers
//! - Marker sizes, z-orders and line widths per category

use crate::config::Theme;
use crate::encoding::{
    AssetCategory, CategoryMap, CategoryRule, CategoryRules, FOCUS_MARKER_SIZE, MARKER_SIZE,
    VisualEncoder,
};
use crate::error::DataError;
use crate::model::AssetRecord;
use crate::store::MetricsStore;

fn demo_encoder() -> VisualEncoder {
    VisualEncoder::for_assets(
        Theme::default(),
        CategoryRules::default(),
        MetricsStore::demo().assets(),
    )
}

#[test]
fn test_demo_colors() {
    let encoder = demo_encoder();
    let theme = Theme::default();

    assert_eq!(
        encoder.color_for("UBI.PA", Some(-0.545027)),
        Ok(theme.alert_color)
    );
    assert_eq!(
        encoder.color_for("TTE.PA", Some(0.081493)),
        Ok(theme.positive_color)
    );
    assert_eq!(
        encoder.color_for("MC.PA", Some(-0.110825)),
        Ok(theme.accent_gold)
    );
    assert_eq!(
        encoder.color_for("SAN.PA", Some(-0.009974)),
        Ok(theme.accent_blue)
    );
}

#[test]
fn test_category_color_ignores_return() {
    let encoder = demo_encoder();
    let theme = Theme::default();

    // Palette lookup wins over the sign of the return
    assert_eq!(encoder.color_for("TTE.PA", Some(-0.5)), Ok(theme.positive_color));
    assert_eq!(encoder.color_for("UBI.PA", None), Ok(theme.alert_color));
}

#[test]
fn test_color_for_is_pure() {
    let encoder = demo_encoder();
    let first = encoder.color_for("AIR.PA", Some(0.12));
    for _ in 0..10 {
        assert_eq!(encoder.color_for("AIR.PA", Some(0.12)), first);
    }
}

#[test]
fn test_uncategorized_colored_by_sign() {
    let encoder = demo_encoder();
    let theme = Theme::default();

    assert_eq!(encoder.category_for("AIR.PA"), AssetCategory::Other);
    assert_eq!(encoder.color_for("AIR.PA", Some(-0.01)), Ok(theme.alert_color));
    assert_eq!(encoder.color_for("AIR.PA", Some(0.0)), Ok(theme.positive_color));
    assert_eq!(
        encoder.color_for("AIR.PA", None),
        Err(DataError::MissingReturn("AIR.PA".into()))
    );
}

#[test]
fn test_multi_match_resolves_by_priority() {
    // Hedge rule listed first, but Focus outranks it
    let rules = CategoryRules::new(vec![
        CategoryRule::new("TTE", AssetCategory::Hedge),
        CategoryRule::new("SAN", AssetCategory::Neutral2),
        CategoryRule::new("UBI", AssetCategory::Focus),
    ]);

    assert_eq!(rules.classify("UBITTE"), AssetCategory::Focus);
    assert_eq!(rules.classify("TTESAN"), AssetCategory::Hedge);
    assert_eq!(rules.rules()[0].category, AssetCategory::Focus);

    let map = CategoryMap::build(rules, ["UBITTE", "TTESAN"]);
    for _ in 0..3 {
        assert_eq!(map.get("UBITTE"), AssetCategory::Focus);
        assert_eq!(map.get("TTESAN"), AssetCategory::Hedge);
    }
}

#[test]
fn test_category_map_classifies_unknown_tickers() {
    let map = CategoryMap::build(CategoryRules::default(), ["UBI.PA"]);

    assert_eq!(map.get("UBI.PA"), AssetCategory::Focus);
    assert_eq!(map.get("MC.PA"), AssetCategory::Neutral1);
    assert_eq!(map.get("BNP.PA"), AssetCategory::Other);
}

#[test]
fn test_empty_pattern_never_matches() {
    let rules = CategoryRules::new(vec![CategoryRule::new("", AssetCategory::Focus)]);
    assert_eq!(rules.classify("UBI.PA"), AssetCategory::Other);
}

#[test]
fn test_marker_sizes() {
    let encoder = demo_encoder();

    assert_eq!(encoder.marker_size_for("UBI.PA"), FOCUS_MARKER_SIZE);
    assert_eq!(encoder.marker_size_for("UBI.PA"), 200.0);
    for ticker in ["MC.PA", "SAN.PA", "TTE.PA", "AIR.PA"] {
        assert_eq!(encoder.marker_size_for(ticker), MARKER_SIZE);
    }
}

#[test]
fn test_z_order_and_width() {
    let encoder = demo_encoder();

    assert_eq!(encoder.z_order_and_width_for("UBI.PA"), (10, 2.0));
    assert_eq!(encoder.z_order_and_width_for("TTE.PA"), (5, 1.2));
    assert_eq!(encoder.z_order_and_width_for("MC.PA"), (4, 1.2));
    assert_eq!(encoder.z_order_and_width_for("SAN.PA"), (4, 1.2));
    assert_eq!(encoder.z_order_and_width_for("AIR.PA"), (1, 1.0));
}

#[test]
fn test_line_color_for_other_is_muted() {
    let encoder = demo_encoder();
    let theme = Theme::default();

    assert_eq!(encoder.line_color_for("UBI.PA"), theme.alert_color);
    assert_eq!(encoder.line_color_for("AIR.PA"), theme.muted_color);
}

#[test]
fn test_attributes_for_demo_assets() {
    let encoder = demo_encoder();
    let theme = Theme::default();
    let store = MetricsStore::demo();

    let ubi = encoder.attributes_for(store.asset("UBI.PA").unwrap()).unwrap();
    assert_eq!(ubi.category, AssetCategory::Focus);
    assert_eq!(ubi.color, theme.alert_color);
    assert_eq!(ubi.marker_color, theme.alert_color);
    assert_eq!(ubi.marker_size, 200.0);
    assert_eq!((ubi.z_order, ubi.line_width), (10, 2.0));

    // Neutral line color, but the marker follows the sign of the return
    let mc = encoder.attributes_for(store.asset("MC.PA").unwrap()).unwrap();
    assert_eq!(mc.color, theme.accent_gold);
    assert_eq!(mc.marker_color, theme.alert_color);

    let gainer = AssetRecord::new("AIR.PA", "Airbus", 0.2, 0.25);
    let attrs = encoder.attributes_for(&gainer).unwrap();
    assert_eq!(attrs.category, AssetCategory::Other);
    assert_eq!(attrs.color, theme.positive_color);
    assert_eq!(attrs.z_order, 1);
}

#[test]
fn test_category_rules_deserialize_sorted() {
    let json = r#"[
        {"pattern": "SAN", "category": "Neutral2"},
        {"pattern": "UBI", "category": "Focus"}
    ]"#;
    let rules: CategoryRules = serde_json::from_str(json).unwrap();

    assert_eq!(rules.rules()[0].pattern, "UBI");
    assert_eq!(rules.rules()[1].pattern, "SAN");
    assert_eq!(rules.classify("SAN.PA"), AssetCategory::Neutral2);
}
