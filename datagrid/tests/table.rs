use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use datagrid::{
    CellValue, Column, ConfigError, SelectionMode, SortDirection, Table, TableConfig, TableRow,
};

#[derive(Debug, Clone, PartialEq)]
struct Asset {
    id: u32,
    serial: String,
    kind: &'static str,
    ram_gb: i64,
}

impl TableRow for Asset {
    type Key = u32;

    fn key(&self) -> u32 {
        self.id
    }
}

fn asset(id: u32, kind: &'static str, ram_gb: i64) -> Asset {
    Asset {
        id,
        serial: format!("SN-{id:03}"),
        kind,
        ram_gb,
    }
}

fn columns() -> Vec<Column<Asset>> {
    vec![
        Column::new("serial", "Serial", |a: &Asset| CellValue::from(a.serial.as_str())).sortable(),
        Column::new("kind", "Tipo", |a: &Asset| CellValue::from(a.kind)).sortable(),
        Column::new("ram", "RAM", |a: &Asset| CellValue::Integer(a.ram_gb))
            .sortable()
            .render_with(|value, _| format!("{value} GB")),
        Column::new("notes", "Notas", |_: &Asset| CellValue::Empty),
    ]
}

/// `n` assets alternating laptop/monitor, RAM cycling 8/16/32.
fn inventory(n: u32) -> Vec<Asset> {
    (0..n)
        .map(|i| {
            let kind = if i % 2 == 0 { "laptop" } else { "monitor" };
            asset(i, kind, [8, 16, 32][(i % 3) as usize])
        })
        .collect()
}

/// `n` assets where the first `laptops` are laptops and the rest docks.
fn split_inventory(n: u32, laptops: u32) -> Vec<Asset> {
    (0..n)
        .map(|i| asset(i, if i < laptops { "laptop" } else { "dock" }, 8))
        .collect()
}

fn multi() -> TableConfig {
    TableConfig::default().with_selection(SelectionMode::Multi)
}

fn table_with(rows: Vec<Asset>, config: TableConfig) -> Table<Asset> {
    Table::builder(columns()).rows(rows).config(config).build().unwrap()
}

fn ids<'a>(rows: impl Iterator<Item = &'a Asset>) -> Vec<u32> {
    rows.map(|a| a.id).collect()
}

// ============================================================================
// Filter
// ============================================================================

#[test]
fn test_filter_idempotent() {
    let mut table = Table::new(columns(), inventory(20));
    table.set_global_filter("laptop");
    let once = ids(table.filtered_rows());
    table.set_global_filter("laptop");
    assert_eq!(ids(table.filtered_rows()), once);
    assert_eq!(once.len(), 10);
}

#[test]
fn test_filter_any_column_case_insensitive() {
    let mut table = Table::new(columns(), inventory(20));
    table.set_global_filter("MONITOR");
    assert!(table.filtered_rows().all(|a| a.kind == "monitor"));

    // Matches the serial column
    table.set_global_filter("sn-01");
    assert_eq!(ids(table.filtered_rows()), (10..20).collect::<Vec<_>>());

    // Matches the raw value, not the rendered "32 GB"
    table.set_global_filter("gb");
    assert_eq!(table.filtered_count(), 0);
}

#[test]
fn test_empty_filter_passes_everything() {
    let mut table = Table::new(columns(), inventory(7));
    table.set_global_filter("laptop");
    table.set_global_filter("");
    assert_eq!(table.filtered_count(), 7);
}

// ============================================================================
// Sort
// ============================================================================

#[test]
fn test_sort_is_stable() {
    let mut table = Table::new(columns(), inventory(30));
    table.set_global_filter("laptop");
    let pre_sort = ids(table.filtered_rows());

    for direction in [SortDirection::Ascending, SortDirection::Descending] {
        table.toggle_sort("ram");
        assert_eq!(table.sort_direction("ram"), direction);

        let sorted: Vec<&Asset> = table.filtered_rows().collect();
        for pair in sorted.windows(2) {
            if pair[0].ram_gb == pair[1].ram_gb {
                let first = pre_sort.iter().position(|&id| id == pair[0].id);
                let second = pre_sort.iter().position(|&id| id == pair[1].id);
                assert!(first < second, "ties must keep their pre-sort order");
            }
        }
    }
}

#[test]
fn test_sort_orders_values() {
    let mut table = Table::new(columns(), inventory(6));
    table.toggle_sort("ram");
    let ram: Vec<i64> = table.filtered_rows().map(|a| a.ram_gb).collect();
    assert_eq!(ram, vec![8, 8, 16, 16, 32, 32]);

    table.toggle_sort("ram");
    let ram: Vec<i64> = table.filtered_rows().map(|a| a.ram_gb).collect();
    assert_eq!(ram, vec![32, 32, 16, 16, 8, 8]);
}

#[test]
fn test_sort_cycle_returns_to_none() {
    let mut table = Table::new(columns(), inventory(10));
    let original = ids(table.filtered_rows());

    table.toggle_sort("serial");
    table.toggle_sort("serial");
    table.toggle_sort("serial");

    assert_eq!(table.sort_direction("serial"), SortDirection::None);
    assert!(table.sort().is_none());
    assert!(table.sort_descriptors().is_empty());
    assert_eq!(ids(table.filtered_rows()), original);
}

#[test]
fn test_sort_new_column_replaces() {
    let mut table = Table::new(columns(), inventory(10));
    table.toggle_sort("serial");
    table.toggle_sort("serial");
    table.toggle_sort("kind");

    assert_eq!(table.sort_direction("serial"), SortDirection::None);
    assert_eq!(table.sort_direction("kind"), SortDirection::Ascending);
    assert_eq!(
        table.sort_descriptors(),
        vec![("kind".to_string(), SortDirection::Ascending)]
    );
}

#[test]
fn test_sort_ignores_unsortable_and_unknown() {
    let mut table = Table::new(columns(), inventory(10));
    table.toggle_sort("notes");
    table.toggle_sort("missing");
    assert!(table.sort().is_none());
}

/// A sensor reading whose value kind varies from row to row.
struct Reading {
    id: u32,
    value: CellValue,
}

impl TableRow for Reading {
    type Key = u32;

    fn key(&self) -> u32 {
        self.id
    }
}

fn reading_columns() -> Vec<Column<Reading>> {
    vec![Column::new("value", "Valor", |r: &Reading| r.value.clone()).sortable()]
}

/// `n` readings from a fixed-seed LCG, with values picked by `pick`.
fn readings(n: u32, pick: impl Fn(u64) -> CellValue) -> Vec<Reading> {
    let mut seed = 0x5eed_u64;
    (0..n)
        .map(|id| {
            seed = seed
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            Reading { id, value: pick(seed >> 33) }
        })
        .collect()
}

/// Check the ascending and descending orders of `table` by `key`. The
/// ascending order must be non-decreasing, ties must keep input order in both
/// directions, and descending must be ascending with its tie runs reversed.
fn assert_sorted_both_ways(
    table: &mut Table<Reading>,
    key: impl Fn(&CellValue) -> CellValue,
) {
    table.toggle_sort("value");
    let ascending: Vec<(u32, CellValue)> =
        table.filtered_rows().map(|r| (r.id, key(&r.value))).collect();
    table.toggle_sort("value");
    let descending: Vec<u32> = table.filtered_rows().map(|r| r.id).collect();

    let mut runs: Vec<Vec<u32>> = Vec::new();
    for (i, (id, value)) in ascending.iter().enumerate() {
        match i.checked_sub(1).map(|p| ascending[p].1.compare(value)) {
            Some(std::cmp::Ordering::Equal) => {
                if let Some(run) = runs.last_mut() {
                    run.push(*id);
                }
            }
            Some(std::cmp::Ordering::Greater) => {
                panic!("{:?} sorted after {:?}", value, ascending[i - 1].1)
            }
            _ => runs.push(vec![*id]),
        }
    }
    for run in &runs {
        assert!(run.windows(2).all(|w| w[0] < w[1]), "ties must keep input order");
    }

    let reversed: Vec<u32> = runs.into_iter().rev().flatten().collect();
    assert_eq!(descending, reversed);
}

#[test]
fn test_sort_mixed_kinds_as_text() {
    let rows = readings(3000, |r| match r % 5 {
        0 => CellValue::Integer((r % 50) as i64 - 25),
        1 => CellValue::Text(format!("{}", r % 40)),
        2 => CellValue::Empty,
        3 => CellValue::Number(f64::NAN),
        _ => CellValue::Integer(i64::MAX - (r % 3) as i64),
    });
    let mut table = Table::new(reading_columns(), rows);

    assert_sorted_both_ways(&mut table, CellValue::as_sort_text);

    // Empty values lead
    table.toggle_sort("value");
    table.toggle_sort("value");
    let first = table.filtered_rows().next().map(|r| r.value.clone());
    assert_eq!(first, Some(CellValue::Empty));
}

#[test]
fn test_sort_numbers_with_nan_and_large_integers() {
    let rows = readings(3000, |r| match r % 4 {
        0 => CellValue::Integer(i64::MAX - (r % 5) as i64),
        1 => CellValue::Number(f64::NAN),
        2 => CellValue::Number((r % 100) as f64 / 4.0 - 10.0),
        _ => CellValue::Integer((r % 30) as i64 - 15),
    });
    let mut table = Table::new(reading_columns(), rows);

    assert_sorted_both_ways(&mut table, CellValue::clone);

    // Numeric order survives, NaN goes last
    table.toggle_sort("value");
    table.toggle_sort("value");
    let values: Vec<&CellValue> = table.filtered_rows().map(|r| &r.value).collect();
    assert!(matches!(values.last(), Some(CellValue::Number(n)) if n.is_nan()));
    let max = values
        .iter()
        .rev()
        .find(|v| !matches!(v, CellValue::Number(n) if n.is_nan()));
    assert!(matches!(max, Some(CellValue::Integer(i64::MAX))));
}

// ============================================================================
// Pagination
// ============================================================================

#[test]
fn test_pages_cover_row_model() {
    let mut table = Table::new(columns(), inventory(47));
    table.set_global_filter("laptop");
    table.toggle_sort("ram");
    table.toggle_sort("ram");

    let expected = ids(table.filtered_rows());
    let mut concatenated = Vec::new();
    for page in 0..table.page_count() {
        table.set_page_index(page);
        concatenated.extend(ids(table.visible_rows()));
    }

    assert_eq!(concatenated, expected);
    let unique: HashSet<u32> = concatenated.iter().copied().collect();
    assert_eq!(unique.len(), concatenated.len());
}

#[test]
fn test_visible_rows_restartable() {
    let table = Table::new(columns(), inventory(25));
    let first = ids(table.visible_rows());
    let second = ids(table.visible_rows());
    assert_eq!(first, second);
    assert_eq!(first.len(), 10);
}

#[test]
fn test_page_size_change_resets_to_first_page() {
    let mut table = Table::new(columns(), inventory(45));
    table.set_page_index(3);
    assert_eq!(table.page_index(), 3);

    table.set_page_size(20);
    assert_eq!(table.page_size(), 20);
    assert_eq!(table.page_index(), 0);
}

#[test]
fn test_page_size_must_be_an_option() {
    let mut table = Table::new(columns(), inventory(45));
    table.set_page_index(2);
    table.set_page_size(15);
    assert_eq!(table.page_size(), 10);
    assert_eq!(table.page_index(), 2);
}

#[test]
fn test_set_page_index_clamps() {
    let mut table = Table::new(columns(), inventory(15));
    assert_eq!(table.page_count(), 2);
    table.set_page_index(999);
    assert_eq!(table.page_index(), 1);
    assert_eq!(ids(table.visible_rows()), (10..15).collect::<Vec<_>>());
}

#[test]
fn test_next_previous_stop_at_boundaries() {
    let mut table = Table::new(columns(), inventory(15));
    table.previous_page();
    assert_eq!(table.page_index(), 0);
    assert!(!table.can_previous_page());

    table.next_page();
    table.next_page();
    assert_eq!(table.page_index(), 1);
    assert!(!table.can_next_page());

    table.previous_page();
    assert_eq!(table.page_index(), 0);
}

#[test]
fn test_empty_table_stays_on_page_zero() {
    let mut table = Table::new(columns(), Vec::new());
    table.set_page_index(4);
    table.next_page();
    assert_eq!(table.page_index(), 0);
    assert_eq!(table.page_count(), 0);
    assert_eq!(table.visible_rows().count(), 0);
}

#[test]
fn test_end_to_end_filter_and_pages() {
    let mut table = Table::new(columns(), split_inventory(25, 12));
    assert_eq!(table.page_count(), 3);

    let mut sizes = Vec::new();
    for page in 0..3 {
        table.set_page_index(page);
        sizes.push(table.visible_rows().count());
    }
    assert_eq!(sizes, vec![10, 10, 5]);

    // On the last page, narrowing the filter clamps instead of resetting
    table.set_global_filter("laptop");
    assert_eq!(table.filtered_count(), 12);
    assert_eq!(table.page_count(), 2);
    assert_eq!(table.page_index(), 1);
    assert_eq!(table.visible_rows().count(), 2);

    // A filter change that keeps the page in range leaves it alone
    table.set_global_filter("lap");
    assert_eq!(table.page_index(), 1);

    table.set_page_index(0);
    assert_eq!(table.visible_rows().count(), 10);
}

#[test]
fn test_reset_page_on_filter_config() {
    let config = TableConfig::default().with_reset_page_on_filter(true);
    let mut table = table_with(split_inventory(25, 12), config);
    table.set_page_index(1);

    table.set_global_filter("laptop");
    assert_eq!(table.page_index(), 0);
}

#[test]
fn test_set_rows_resets_only_on_length_change() {
    let mut table = Table::new(columns(), inventory(30));
    table.set_page_index(2);

    // Same length: page kept
    table.set_rows(inventory(30));
    assert_eq!(table.page_index(), 2);

    table.set_rows(inventory(31));
    assert_eq!(table.page_index(), 0);
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_selection_survives_filter_changes() {
    let mut table = table_with(inventory(10), multi());
    table.toggle_row_selected(2);

    table.set_global_filter("monitor");
    assert!(table.filtered_rows().all(|a| a.id != 2));
    assert!(table.is_row_selected(&2));

    table.set_global_filter("");
    assert!(table.is_row_selected(&2));
}

#[test]
fn test_selection_survives_sort_and_pages() {
    let mut table = table_with(inventory(25), multi());
    table.toggle_row_selected(24);
    table.toggle_sort("serial");
    table.toggle_sort("serial");
    table.set_page_index(2);
    assert!(table.is_row_selected(&24));
    assert_eq!(ids(table.selected_rows()), vec![24]);
}

#[test]
fn test_select_all_scoped_to_filter() {
    // 10 rows, 4 laptops
    let mut table = table_with(split_inventory(10, 4), multi());
    table.toggle_row_selected(9);

    table.set_global_filter("laptop");
    table.toggle_all_rows_selected();
    assert_eq!(table.selected_keys(), &HashSet::from([0, 1, 2, 3, 9]));
    assert!(table.is_all_selected());

    table.toggle_all_rows_selected();
    // Only the 4 filtered rows are deselected; the dock outside the filter stays
    assert_eq!(table.selected_keys(), &HashSet::from([9]));
}

#[test]
fn test_select_all_spans_every_page() {
    let mut table = table_with(inventory(25), multi());
    table.toggle_all_rows_selected();
    assert_eq!(table.selected_keys().len(), 25);
    assert!(table.is_all_selected());
    assert!(!table.is_some_selected());
}

#[test]
fn test_select_all_completes_partial_selection() {
    let mut table = table_with(inventory(5), multi());
    table.toggle_row_selected(1);
    table.toggle_all_rows_selected();
    assert_eq!(table.selected_keys().len(), 5);
}

#[test]
fn test_indeterminate_state() {
    let mut table = table_with(inventory(5), multi());
    assert!(!table.is_all_selected());
    assert!(!table.is_some_selected());

    table.toggle_row_selected(0);
    assert!(table.is_some_selected());
    assert!(!table.is_all_selected());
}

#[test]
fn test_unknown_key_is_recorded() {
    let mut table = table_with(inventory(3), multi());
    table.toggle_row_selected(404);
    assert!(table.is_row_selected(&404));
    assert_eq!(table.selected_rows().count(), 0);
}

#[test]
fn test_selection_disabled_by_default() {
    let mut table = Table::new(columns(), inventory(3));
    table.toggle_row_selected(1);
    table.toggle_all_rows_selected();
    assert!(table.selected_keys().is_empty());
}

#[test]
fn test_single_selection_mode() {
    let config = TableConfig::default().with_selection(SelectionMode::Single);
    let mut table = table_with(inventory(5), config);
    table.toggle_row_selected(1);
    table.toggle_row_selected(3);
    assert_eq!(table.selected_keys(), &HashSet::from([3]));

    table.toggle_all_rows_selected();
    assert_eq!(table.selected_keys(), &HashSet::from([3]));
}

#[test]
fn test_uncontrolled_selection_notifies() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let mut table = Table::builder(columns())
        .rows(inventory(4))
        .config(multi())
        .on_selection_change(move |keys| sink.borrow_mut().push(keys.len()))
        .build()
        .unwrap();

    table.toggle_row_selected(0);
    table.toggle_all_rows_selected();
    table.toggle_all_rows_selected();
    assert_eq!(*seen.borrow(), vec![1, 4, 0]);
}

#[test]
fn test_controlled_selection_waits_for_sync() {
    let emitted: Rc<RefCell<Vec<HashSet<u32>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&emitted);
    let mut table = Table::builder(columns())
        .rows(inventory(4))
        .config(multi())
        .controlled_selection(HashSet::from([1]), move |keys| sink.borrow_mut().push(keys.clone()))
        .build()
        .unwrap();

    assert!(table.is_selection_controlled());
    assert!(table.is_row_selected(&1));

    table.toggle_row_selected(2);
    assert_eq!(emitted.borrow().last(), Some(&HashSet::from([1, 2])));
    // The owner has not accepted it yet
    assert!(!table.is_row_selected(&2));

    let accepted = emitted.borrow().last().cloned().unwrap();
    table.sync_selection(accepted);
    assert!(table.is_row_selected(&2));

    table.toggle_all_rows_selected();
    assert_eq!(emitted.borrow().last(), Some(&HashSet::from([0, 1, 2, 3])));
    assert_eq!(table.selected_keys(), &HashSet::from([1, 2]));
}

// ============================================================================
// Events and rendering
// ============================================================================

#[test]
fn test_click_row_emits_record() {
    let clicked = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&clicked);
    let mut table = Table::builder(columns())
        .rows(inventory(5))
        .on_row_click(move |asset: &Asset| sink.borrow_mut().push(asset.serial.clone()))
        .build()
        .unwrap();

    assert!(table.click_row(&3));
    assert!(!table.click_row(&99));
    assert_eq!(*clicked.borrow(), vec!["SN-003".to_string()]);
}

#[test]
fn test_click_row_without_handler() {
    let mut table = Table::new(columns(), inventory(2));
    assert!(!table.click_row(&0));
}

#[test]
fn test_render_page_view() {
    let mut table = table_with(inventory(12), multi());
    table.toggle_sort("ram");
    table.toggle_row_selected(0);
    table.set_page_index(1);

    let view = table.render();
    assert_eq!(view.headers.len(), 4);
    assert_eq!(view.headers[2].direction, SortDirection::Ascending);
    assert!(!view.headers[3].sortable);

    assert_eq!(view.page.page_index, 1);
    assert_eq!(view.page.page_count, 2);
    assert_eq!(view.page.filtered_count, 12);
    assert!(view.page.can_previous);
    assert!(!view.page.can_next);

    // Ascending by RAM, the last page holds the two remaining 32 GB rows
    assert_eq!(view.rows.len(), 2);
    assert!(view.rows.iter().all(|r| r.cells[2] == "32 GB"));
    assert!(view.some_selected);
    assert!(!view.all_selected);
}

#[test]
fn test_render_marks_selected_rows() {
    let mut table = table_with(inventory(3), multi());
    table.toggle_row_selected(1);
    let view = table.render();
    let selected: Vec<u32> = view.rows.iter().filter(|r| r.selected).map(|r| r.key).collect();
    assert_eq!(selected, vec![1]);
    assert_eq!(view.rows[1].cells, vec!["SN-001", "monitor", "16 GB", ""]);
}

#[test]
fn test_builder_rejects_invalid_config() {
    let config = TableConfig::default().with_page_size(33);
    let result = Table::builder(columns()).config(config).build();
    assert!(matches!(result, Err(ConfigError::PageSizeNotAnOption { size: 33, .. })));
}
