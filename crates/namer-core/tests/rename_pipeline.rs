//! Integration tests: outline → rename session → verify names and counts.
//!
//! Exercises the full `namer-core` pipeline over a realistic landing page.

use namer_core::emitter::emit_outline;
use namer_core::id::NodeId;
use namer_core::outline::parse_outline;
use namer_core::rename::{CountMode, RenameConfig};
use namer_core::session::{MemoryHost, PluginConfig, RunOutcome, rename_selection, run_plugin};
use namer_core::snapshot;
use pretty_assertions::assert_eq;

fn landing() -> namer_core::Document {
    parse_outline(include_str!("fixtures/landing.layers")).unwrap()
}

fn rename_selected(doc: &mut namer_core::Document, config: &RenameConfig) -> RunOutcome {
    let roots = doc.selection.clone();
    rename_selection(doc, &roots, config)
}

// ─── Full page ───────────────────────────────────────────────────────────

#[test]
fn landing_page_gets_standard_names() {
    let mut doc = landing();
    let outcome = rename_selected(&mut doc, &RenameConfig::default());

    assert_eq!(outcome, RunOutcome::Renamed { count: 17 });
    assert_eq!(
        emit_outline(&doc),
        include_str!("fixtures/landing.named.layers")
    );
}

#[test]
fn second_run_counts_zero_by_default() {
    let mut doc = landing();
    rename_selected(&mut doc, &RenameConfig::default());
    let before = emit_outline(&doc);

    let outcome = rename_selected(&mut doc, &RenameConfig::default());
    assert_eq!(outcome, RunOutcome::Renamed { count: 0 });
    assert_eq!(emit_outline(&doc), before);
}

#[test]
fn legacy_counting_reports_every_match() {
    let mut doc = landing();
    // 17 matched rules plus the mask-parent rename attempt.
    assert_eq!(
        rename_selected(&mut doc, &RenameConfig::legacy()),
        RunOutcome::Renamed { count: 18 }
    );
    // Nothing changes on a re-run, but the legacy count stays the same.
    assert_eq!(
        rename_selected(&mut doc, &RenameConfig::legacy()),
        RunOutcome::Renamed { count: 18 }
    );
    assert_eq!(
        emit_outline(&doc),
        include_str!("fixtures/landing.named.layers")
    );
}

#[test]
fn text_variant_names_text_after_content() {
    let mut doc = landing();
    let outcome = rename_selected(&mut doc, &RenameConfig::text_variant());

    assert_eq!(outcome, RunOutcome::Renamed { count: 19 });
    assert_eq!(
        doc.name_of("1:4"),
        Some("Welcome to the new way of shipping design systems,...")
    );
    assert_eq!(doc.name_of("1:5"), Some("Short intro"));
    // Inside the instance: untouched.
    assert_eq!(doc.name_of("1:20"), Some("Label"));
}

// ─── Rule interactions ───────────────────────────────────────────────────

#[test]
fn component_subtrees_stay_frozen() {
    let mut doc = landing();
    rename_selected(&mut doc, &RenameConfig::legacy());

    assert_eq!(doc.name_of("1:18"), Some("Button / Primary"));
    assert_eq!(doc.name_of("1:19"), Some("Frame 2"));
    assert_eq!(doc.name_of("1:20"), Some("Label"));
}

#[test]
fn divider_wins_over_auto_layout() {
    let mut doc = parse_outline(
        r#"
frame @d:1 "Frame 1" w=800 layout=vertical {
  frame @d:2 "Frame 2" w=800 h=1 layout=horizontal
  frame @d:3 "Frame 3" w=800 h=2 layout=horizontal
}
select @d:2 @d:3
"#,
    )
    .unwrap();
    assert_eq!(
        rename_selected(&mut doc, &RenameConfig::default()),
        RunOutcome::Renamed { count: 2 }
    );
    assert_eq!(doc.name_of("d:2"), Some("Divider"));
    assert_eq!(doc.name_of("d:3"), Some("Inner-row"));

    // With the divider rule disabled the 1px frame is just another row.
    let config = RenameConfig {
        divider_height: None,
        ..RenameConfig::default()
    };
    rename_selected(&mut doc, &config);
    assert_eq!(doc.name_of("d:2"), Some("Inner-row"));
}

#[test]
fn wrapper_versus_inner_column() {
    let mut doc = parse_outline(
        r#"
group @w:1 "Group 1" {
  frame @w:2 "Frame 5" layout=vertical {
    frame @w:3 "Frame 6" layout=vertical
  }
}
select @w:1
"#,
    )
    .unwrap();
    rename_selected(&mut doc, &RenameConfig::default());

    // An auto-layout frame under a group is a wrapper; under another
    // auto-layout frame it is an inner column.
    assert_eq!(doc.name_of("w:1"), Some("Group"));
    assert_eq!(doc.name_of("w:2"), Some("Wrapper"));
    assert_eq!(doc.name_of("w:3"), Some("Inner-column"));
}

#[test]
fn stroke_only_shapes_become_lines() {
    let mut doc = parse_outline(
        r#"
frame @s:1 "icons" {
  vector @s:2 "a" fill=[] stroke=[solid]
  vector @s:3 "b" fill=[solid] stroke=[solid]
  vector @s:4 "c" fill=[] stroke=[]
  vector @s:5 "d" fill=[] stroke=mixed
  ellipse @s:6 "e" fill=[gradient_radial, image] stroke=[]
}
select @s:1
"#,
    )
    .unwrap();
    rename_selected(&mut doc, &RenameConfig::default());

    assert_eq!(doc.name_of("s:2"), Some("Line"));
    assert_eq!(doc.name_of("s:3"), Some("Shape"));
    assert_eq!(doc.name_of("s:4"), Some("Shape"));
    assert_eq!(doc.name_of("s:5"), Some("Shape"));
    // Image beats gradient regardless of paint order.
    assert_eq!(doc.name_of("s:6"), Some("Image"));
}

#[test]
fn mask_parent_counts_follow_count_mode() {
    let source = r#"
group @m:1 "Group 9" {
  rectangle @m:2 "Rectangle 1" mask
}
frame @m:3 "Frame 9" {
  vector @m:4 "Vector 1" mask=true
}
select @m:2 @m:4
"#;

    let mut doc = parse_outline(source).unwrap();
    // Mask + Mask Group, then the lone mask under a frame.
    assert_eq!(
        rename_selected(&mut doc, &RenameConfig::default()),
        RunOutcome::Renamed { count: 3 }
    );
    assert_eq!(doc.name_of("m:1"), Some("Mask Group"));
    assert_eq!(doc.name_of("m:3"), Some("Frame 9"));

    let mut doc = parse_outline(source).unwrap();
    let config = RenameConfig {
        count_mode: CountMode::Matched,
        ..RenameConfig::default()
    };
    assert_eq!(
        rename_selected(&mut doc, &config),
        RunOutcome::Renamed { count: 3 }
    );
    assert_eq!(
        rename_selected(&mut doc, &config),
        RunOutcome::Renamed { count: 3 }
    );
}

#[test]
fn screen_rule_only_applies_to_selected_roots() {
    let mut doc = parse_outline(
        r#"
frame @r:1 "Desktop" w=1680
frame @r:2 "Outer" w=1200 {
  frame @r:3 "Nested desktop" w=1680
}
select @r:1 @r:2
"#,
    )
    .unwrap();
    assert_eq!(
        rename_selected(&mut doc, &RenameConfig::default()),
        RunOutcome::Renamed { count: 3 }
    );
    assert_eq!(doc.name_of("r:1"), Some("Screen"));
    assert_eq!(doc.name_of("r:2"), Some("Contain"));
    assert_eq!(doc.name_of("r:3"), Some("Contain"));
}

// ─── Sessions ─────────────────────────────────────────────────────────────

#[test]
fn session_over_snapshot_json() {
    let json = snapshot::to_json(&landing()).unwrap();
    let mut host = MemoryHost::new(snapshot::from_json(&json).unwrap());

    let outcome = run_plugin(&mut host, &PluginConfig::default());
    assert_eq!(outcome, RunOutcome::Renamed { count: 17 });
    assert_eq!(
        host.notifications,
        vec!["✨ Done, 17 Layers Renamed ✨".to_string()]
    );
    assert!(host.closed);
    assert_eq!(
        host.document.get_by_id(NodeId::intern("1:9")).map(|l| l.name.as_str()),
        Some("Mask Group")
    );
}

#[test]
fn session_without_selection_changes_nothing() {
    let mut doc = landing();
    doc.selection.clear();
    let before = emit_outline(&doc);
    let mut host = MemoryHost::new(doc);

    assert_eq!(
        run_plugin(&mut host, &PluginConfig::default()),
        RunOutcome::NothingSelected
    );
    assert_eq!(
        host.notifications,
        vec!["🙈 Oops! Please select at least one frame to get started 🎨".to_string()]
    );
    assert!(host.closed);
    assert_eq!(emit_outline(&host.document), before);
}
