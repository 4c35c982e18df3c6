use gmx_stats::{pivot, StatDataset};

const TWO_BLOCK_REPORT: &str = "\
---------- Begin Simulation Statistics ----------
a 1
b 2
---------- End Simulation Statistics   ----------
---------- Begin Simulation Statistics ----------
a 3
c 4
---------- End Simulation Statistics   ----------
";

#[test]
fn report_folds_into_ordered_ragged_series() {
    let dataset = StatDataset::from_report(TWO_BLOCK_REPORT);
    let keys: Vec<_> = dataset.keys().collect();
    assert_eq!(keys, vec!["a", "b", "c"]);
    assert_eq!(
        dataset.series("a"),
        Some(["1".to_string(), "3".to_string()].as_slice())
    );
    assert_eq!(dataset.series("b"), Some(["2".to_string()].as_slice()));
    assert_eq!(dataset.series("c"), Some(["4".to_string()].as_slice()));
}

#[test]
fn pivot_drops_the_checkpoint_baseline_window() {
    let table = pivot(&StatDataset::from_report(TWO_BLOCK_REPORT)).unwrap();
    assert_eq!(table.header, vec!["a", "b", "c"]);
    // Two windows collapse to one row: index 0 is the pre-reset baseline.
    assert_eq!(table.rows, vec![vec!["3", "", ""]]);
}

#[test]
fn unterminated_trailing_block_contributes_nothing() {
    let report = format!(
        "{TWO_BLOCK_REPORT}---------- Begin Simulation Statistics ----------\na 99\n"
    );
    let dataset = StatDataset::from_report(&report);
    assert_eq!(
        dataset.series("a"),
        Some(["1".to_string(), "3".to_string()].as_slice())
    );
}

#[test]
fn report_without_markers_pivots_to_none() {
    let dataset = StatDataset::from_report("a 1\nb 2\n");
    assert!(dataset.is_empty());
    assert_eq!(pivot(&dataset), None);
}
