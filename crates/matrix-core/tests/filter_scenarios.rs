//! # Filter Scenarios
//!
//! End-to-end decisions over realistic candidate matrices.

use matrix_core::{
    CandidateMatrix, FilterOverrides, MatrixEntry, MatrixFilter, MatrixOutputs, NumericVersion,
    PluginMetadata, ReleaseFeedEntry, SupportedRange, filter_matrix, parse_release_feed,
    parse_version_file,
};

// =============================================================================
// HELPERS
// =============================================================================

fn row(branch: &str, php: &str) -> Option<MatrixEntry> {
    Some(
        MatrixEntry::new()
            .with_field("php", php)
            .with_field("moodle-branch", branch)
            .with_field("database", "pgsql"),
    )
}

fn stable(n: u32) -> String {
    format!("MOODLE_{n}_STABLE")
}

fn branches(entries: &[MatrixEntry]) -> Vec<&str> {
    entries.iter().map(MatrixEntry::branch).collect()
}

fn ranged(lower: u32, upper: u32) -> PluginMetadata {
    PluginMetadata {
        component: Some("local_example".into()),
        supported: Some(SupportedRange::new(lower, upper)),
        requires: None,
    }
}

// =============================================================================
// EXPLICIT FILTER
// =============================================================================

#[test]
fn explicit_filter_keeps_exactly_the_listed_branch() {
    let matrix = vec![row(&stable(38), "7.2"), row(&stable(39), "7.4"), row("main", "8.1")];
    let overrides = FilterOverrides {
        branch_filter: FilterOverrides::parse_branch_filter("MOODLE_39_STABLE"),
        ..FilterOverrides::default()
    };

    let kept = filter_matrix(&matrix, &ranged(35, 500), &overrides, &[]);
    assert_eq!(branches(&kept), vec!["MOODLE_39_STABLE"]);
}

#[test]
fn explicit_filter_applies_without_metadata() {
    let matrix = vec![row(&stable(38), "7.2"), row(&stable(39), "7.4")];
    let overrides = FilterOverrides {
        branch_filter: FilterOverrides::parse_branch_filter("MOODLE_38_STABLE MOODLE_39_STABLE"),
        ..FilterOverrides::default()
    };

    let kept = filter_matrix(&matrix, &PluginMetadata::default(), &overrides, &[]);
    assert_eq!(kept.len(), 2);
}

// =============================================================================
// SUPPORTED RANGE
// =============================================================================

#[test]
fn closed_range_keeps_only_branches_inside() {
    let matrix = vec![
        row(&stable(34), "7.0"),
        row(&stable(35), "7.1"),
        row(&stable(36), "7.1"),
        row(&stable(39), "7.4"),
        row(&stable(310), "7.4"),
        row("main", "8.1"),
    ];

    let kept = filter_matrix(&matrix, &ranged(35, 39), &FilterOverrides::default(), &[]);
    assert_eq!(
        branches(&kept),
        vec!["MOODLE_35_STABLE", "MOODLE_36_STABLE", "MOODLE_39_STABLE"]
    );
}

#[test]
fn range_bound_missing_from_matrix_includes_main() {
    let matrix = vec![
        row(&stable(35), "7.1"),
        row(&stable(39), "7.4"),
        row(&stable(310), "7.4"),
        row(&stable(311), "8.0"),
        row("main", "8.1"),
    ];

    let kept = filter_matrix(&matrix, &ranged(35, 500), &FilterOverrides::default(), &[]);
    assert_eq!(
        branches(&kept),
        vec![
            "MOODLE_35_STABLE",
            "MOODLE_39_STABLE",
            "MOODLE_310_STABLE",
            "MOODLE_311_STABLE",
            "main"
        ]
    );
}

#[test]
fn numbered_branches_compare_numerically() {
    // Text ordering would put "310" before "39" and "400" before "5".
    let matrix = vec![row(&stable(39), "7.4"), row(&stable(310), "7.4"), row(&stable(400), "8.0")];

    let kept = filter_matrix(&matrix, &ranged(310, 400), &FilterOverrides::default(), &[]);
    assert_eq!(branches(&kept), vec!["MOODLE_310_STABLE", "MOODLE_400_STABLE"]);
}

#[test]
fn null_rows_do_not_count_as_known_branches() {
    let matrix = vec![None, row(&stable(39), "7.4"), None, row("main", "8.1")];

    let kept = filter_matrix(&matrix, &ranged(35, 400), &FilterOverrides::default(), &[]);
    assert_eq!(branches(&kept), vec!["MOODLE_39_STABLE", "main"]);
}

#[test]
fn branches_dropped_by_min_php_still_close_the_range() {
    let matrix = vec![
        row(&stable(311), "8.0"),
        row(&stable(500), "7.4"),
        row("main", "8.1"),
    ];
    let overrides = FilterOverrides {
        min_php: "8.0".parse().ok(),
        ..FilterOverrides::default()
    };

    let kept = filter_matrix(&matrix, &ranged(35, 500), &overrides, &[]);
    assert_eq!(branches(&kept), vec!["MOODLE_311_STABLE"]);
}

// =============================================================================
// OVERRIDES
// =============================================================================

#[test]
fn minimum_php_overrides_range_membership() {
    let matrix = vec![row(&stable(39), "7.4"), row(&stable(39), "8.0"), row(&stable(39), "8.1")];
    let overrides = FilterOverrides {
        min_php: "8.0".parse().ok(),
        ..FilterOverrides::default()
    };

    let kept = filter_matrix(&matrix, &ranged(35, 39), &overrides, &[]);
    let php: Vec<_> = kept
        .iter()
        .filter_map(|entry| entry.field("php").and_then(|v| v.as_str()))
        .collect();
    assert_eq!(php, vec!["8.0", "8.1"]);
}

#[test]
fn disabled_main_is_dropped_even_for_open_ranges() {
    let matrix = vec![row(&stable(311), "8.0"), row("main", "8.1")];
    let overrides = FilterOverrides {
        disable_main: true,
        ..FilterOverrides::default()
    };

    let kept = filter_matrix(&matrix, &ranged(35, 500), &overrides, &[]);
    assert_eq!(branches(&kept), vec!["MOODLE_311_STABLE"]);
}

// =============================================================================
// REQUIRED VERSION
// =============================================================================

#[test]
fn required_version_uses_release_feed() {
    let matrix = vec![row(&stable(35), "7.1"), row(&stable(38), "7.2"), row("main", "8.1")];
    let metadata = PluginMetadata {
        requires: Some(NumericVersion::from_whole(2018120300)),
        ..PluginMetadata::default()
    };
    let releases = vec![
        ReleaseFeedEntry::new("3.5", NumericVersion::from_whole(2018051700)),
        ReleaseFeedEntry::new("3.8", NumericVersion::from_whole(2019111800)),
    ];
    assert!(MatrixFilter::needs_release_feed(&metadata));

    let kept = filter_matrix(&matrix, &metadata, &FilterOverrides::default(), &releases);
    assert_eq!(branches(&kept), vec!["MOODLE_38_STABLE"]);
}

// =============================================================================
// FULL PIPELINE
// =============================================================================

#[test]
fn parsed_inputs_produce_published_outputs() {
    let metadata = parse_version_file(
        "<?php\n$plugin->component = 'tool_example';\n$plugin->requires = 2019052000;\n",
    )
    .expect("metadata");
    let releases = parse_release_feed(
        r#"{"updates":{"core":[
            {"version":"2019111800.00","branch":"3.8"},
            {"version":"2020061500.00","branch":"3.9"}
        ]}}"#,
    )
    .expect("feed");
    let matrix = CandidateMatrix::new(vec![
        row(&stable(39), "7.4"),
        row(&stable(38), "7.2"),
        row(&stable(37), "7.1"),
        None,
    ]);

    let kept = filter_matrix(&matrix.include, &metadata, &FilterOverrides::default(), &releases);
    let outputs = MatrixOutputs::assemble(&kept, &metadata).expect("outputs");

    assert_eq!(outputs.component, "tool_example");
    assert_eq!(outputs.highest_branch, "MOODLE_39_STABLE");
    assert_eq!(
        outputs.matrix,
        concat!(
            r#"{"include":[{"php":"7.4","moodle-branch":"MOODLE_39_STABLE","database":"pgsql"},"#,
            r#"{"php":"7.2","moodle-branch":"MOODLE_38_STABLE","database":"pgsql"}]}"#
        )
    );
}
