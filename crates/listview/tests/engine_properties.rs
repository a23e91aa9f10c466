use pipeline_admin_listview::{
    compute_filtered, compute_page, compute_sorted, total_pages, FieldKey, FieldValue,
    FilterState, ListViewConfig, ListViewEngine, PageSize, PageState, Record, SortDirection,
    SortState,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RowField {
    Id,
    Name,
    Tags,
    Note,
}

impl FieldKey for RowField {
    fn name(self) -> &'static str {
        match self {
            RowField::Id => "id",
            RowField::Name => "name",
            RowField::Tags => "tags",
            RowField::Note => "note",
        }
    }

    fn all() -> &'static [Self] {
        &[RowField::Id, RowField::Name, RowField::Tags, RowField::Note]
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Row {
    id: String,
    name: String,
    tags: Vec<String>,
    note: Option<String>,
}

impl Record for Row {
    type Field = RowField;

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, field: RowField) -> FieldValue<'_> {
        match field {
            RowField::Id => FieldValue::from(&self.id),
            RowField::Name => FieldValue::from(&self.name),
            RowField::Tags => FieldValue::from(&self.tags),
            RowField::Note => FieldValue::from(self.note.as_ref()),
        }
    }
}

fn row(id: &str, name: &str) -> Row {
    Row {
        id: id.to_string(),
        name: name.to_string(),
        tags: Vec::new(),
        note: None,
    }
}

fn rows(count: usize) -> Vec<Row> {
    (0..count)
        .map(|i| row(&format!("r{:03}", i), &format!("Row {:03}", i)))
        .collect()
}

fn config() -> ListViewConfig<RowField> {
    ListViewConfig::new(
        vec![RowField::Name, RowField::Tags, RowField::Note],
        vec![RowField::Name, RowField::Id, RowField::Note],
        SortState::asc(RowField::Id),
    )
}

fn ids(items: &[&Row]) -> Vec<String> {
    items.iter().map(|r| r.id.clone()).collect()
}

fn search(term: &str) -> FilterState {
    FilterState {
        term: term.to_string(),
        facet_term: String::new(),
    }
}

fn mixed_collection() -> Vec<Row> {
    vec![
        Row {
            id: "1".into(),
            name: "Alpha".into(),
            tags: vec!["addToCart".into()],
            note: Some("first".into()),
        },
        Row {
            id: "2".into(),
            name: "beta".into(),
            tags: vec![],
            note: None,
        },
        Row {
            id: "3".into(),
            name: "Gamma".into(),
            tags: vec!["viewCart".into(), "checkout".into()],
            note: None,
        },
        Row {
            id: "4".into(),
            name: "ALPHABET".into(),
            tags: vec![],
            note: Some("Cart note".into()),
        },
    ]
}

#[test]
fn test_filtered_is_ordered_subsequence_of_matches() {
    let items = mixed_collection();
    let searchable = [RowField::Name, RowField::Tags, RowField::Note];

    for term in ["alpha", "CART", "a", "zzz", "Note"] {
        let filtered = compute_filtered(&items, &search(term), &searchable, &[]);
        let folded = term.to_lowercase();

        let mut cursor = 0;
        for item in &filtered {
            let pos = items[cursor..]
                .iter()
                .position(|candidate| candidate.id == item.id)
                .expect("filtered item out of order");
            cursor += pos + 1;

            assert!(searchable
                .iter()
                .any(|field| item.field(*field).contains_folded(&folded)));
        }
    }
}

#[test]
fn test_blank_term_returns_whole_collection() {
    let items = mixed_collection();
    for term in ["", "   ", "\t"] {
        let filtered = compute_filtered(&items, &search(term), &[RowField::Name], &[]);
        assert_eq!(ids(&filtered), vec!["1", "2", "3", "4"]);
    }
}

#[test]
fn test_missing_optional_field_never_matches_nonblank_term() {
    let items = mixed_collection();
    let filtered = compute_filtered(&items, &search("first"), &[RowField::Note], &[]);
    assert_eq!(ids(&filtered), vec!["1"]);
}

#[test]
fn test_array_fields_match_any_element() {
    let items = mixed_collection();
    let filtered = compute_filtered(&items, &search("cart"), &[RowField::Tags], &[]);
    assert_eq!(ids(&filtered), vec!["1", "3"]);
}

#[test]
fn test_descending_is_reverse_of_ascending_without_ties() {
    let items = mixed_collection();
    let filtered: Vec<&Row> = items.iter().collect();

    let asc = compute_sorted(filtered.clone(), &SortState::asc(RowField::Name));
    let mut desc = compute_sorted(filtered, &SortState::desc(RowField::Name));
    assert_eq!(ids(&asc), vec!["1", "4", "2", "3"]);

    desc.reverse();
    assert_eq!(ids(&asc), ids(&desc));
}

#[test]
fn test_sort_is_stable_for_duplicate_keys() {
    let items = vec![
        row("a", "same"),
        row("b", "Other"),
        row("c", "SAME"),
        row("d", "same"),
        row("e", "another"),
    ];
    let filtered: Vec<&Row> = items.iter().collect();

    let asc = compute_sorted(filtered.clone(), &SortState::asc(RowField::Name));
    assert_eq!(ids(&asc), vec!["e", "b", "a", "c", "d"]);

    let desc = compute_sorted(filtered, &SortState::desc(RowField::Name));
    assert_eq!(ids(&desc), vec!["a", "c", "d", "b", "e"]);
}

#[test]
fn test_missing_fields_sort_as_empty_string() {
    let items = mixed_collection();
    let filtered: Vec<&Row> = items.iter().collect();
    let sorted = compute_sorted(filtered, &SortState::asc(RowField::Note));
    assert_eq!(ids(&sorted), vec!["2", "3", "4", "1"]);
}

#[test]
fn test_empty_collection_has_one_empty_page() {
    let items: Vec<Row> = Vec::new();
    let filtered = compute_filtered(&items, &FilterState::default(), &[RowField::Name], &[]);
    let sorted = compute_sorted(filtered, &SortState::asc(RowField::Name));

    assert_eq!(total_pages(sorted.len(), PageSize::Size50), 1);
    assert!(compute_page(&sorted, &PageState::default()).is_empty());

    let mut engine: ListViewEngine<Row> = ListViewEngine::new(config());
    assert_eq!(engine.set_page(5), 1);
    assert!(engine.page_items().is_empty());
    assert_eq!(engine.page_info().to_string(), "no items");
}

#[test]
fn test_one_hundred_one_items_span_three_pages() {
    let mut engine = ListViewEngine::with_items(config(), rows(101));
    assert_eq!(engine.total_pages(), 3);

    assert_eq!(engine.set_page(3), 3);
    let page = engine.page_items();
    assert_eq!(ids(&page), vec!["r100"]);

    let info = engine.page_info();
    assert_eq!((info.start, info.end, info.total), (101, 101, 101));
    assert!(!info.has_next);
}

#[test]
fn test_page_past_end_is_empty_slice() {
    let items = rows(10);
    let sorted: Vec<&Row> = items.iter().collect();
    let page = PageState {
        page: 4,
        size: PageSize::Size25,
    };
    assert!(compute_page(&sorted, &page).is_empty());
}

#[test]
fn test_select_all_on_page_is_idempotent() {
    let mut engine = ListViewEngine::with_items(config(), rows(120));
    engine.toggle_selection("r119");
    engine.set_page(2);

    engine.select_all_on_page();
    let once = engine.selection().clone();
    engine.select_all_on_page();
    assert_eq!(engine.selection(), &once);

    assert_eq!(once.len(), 51);
    assert!(once.contains("r050"));
    assert!(once.contains("r099"));
    assert!(!once.contains("r049"));
}

#[test]
fn test_select_all_filtered_replaces_selection() {
    let mut engine = ListViewEngine::with_items(config(), mixed_collection());
    engine.set_search_term("alpha");
    engine.toggle_selection("2");

    engine.select_all_filtered();
    assert_eq!(engine.selected_ids(), vec!["1", "4"]);
}

#[test]
fn test_search_and_page_size_changes_always_clear_selection() {
    let mut engine = ListViewEngine::with_items(config(), rows(80));
    engine.select_all_filtered();
    engine.set_page(2);

    engine.set_search_term("");
    assert!(engine.selection().is_empty());
    assert_eq!(engine.page_state().page, 1);

    engine.select_all_filtered();
    engine.set_page(2);
    engine.set_page_size(PageSize::Size50);
    assert!(engine.selection().is_empty());
    assert_eq!(engine.page_state().page, 1);
}

#[test]
fn test_sort_and_page_changes_keep_selection() {
    let mut engine = ListViewEngine::with_items(config(), rows(80));
    engine.toggle_selection("r003");
    engine.toggle_selection("r070");

    engine.set_page(2);
    engine.set_sort(RowField::Name, SortDirection::Desc);
    engine.next_page();

    assert_eq!(engine.selected_ids(), vec!["r003", "r070"]);
}

#[test]
fn test_removal_leaves_no_trace_and_keeps_order() {
    let mut engine = ListViewEngine::with_items(config(), rows(6));
    engine.select_all_filtered();

    let removed = engine.remove_items(["r001", "r004", "missing"]);
    assert_eq!(removed, 2);

    let remaining: Vec<&str> = engine.items().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(remaining, vec!["r000", "r002", "r003", "r005"]);
    assert!(!engine.is_selected("r001"));
    assert!(!engine.is_selected("r004"));
    assert_eq!(engine.selection().len(), 4);
}

#[test]
fn test_removal_does_not_touch_view_state() {
    let mut engine = ListViewEngine::with_items(config(), rows(60));
    engine.set_sort(RowField::Name, SortDirection::Desc);
    engine.set_page(2);
    let before = engine.state();

    engine.remove_items(["r000"]);
    let after = engine.state();
    assert_eq!(before.filter, after.filter);
    assert_eq!(before.sort, after.sort);
    assert_eq!(before.page, after.page);
}

#[test]
fn test_facet_and_search_terms_must_both_match() {
    let config = config().with_facets(vec![RowField::Tags]);
    let mut engine = ListViewEngine::with_items(config, mixed_collection());

    engine.set_facet_term("cart");
    assert_eq!(ids(&engine.filtered()), vec!["1", "3"]);

    engine.set_search_term("gam");
    assert_eq!(ids(&engine.filtered()), vec!["3"]);

    engine.set_facet_term("");
    assert_eq!(ids(&engine.filtered()), vec!["3"]);
    assert_eq!(
        engine.facet_values(),
        vec!["addToCart", "checkout", "viewCart"]
    );
}

#[test]
fn test_sort_select_remove_scenario() {
    let mut engine = ListViewEngine::with_items(
        config(),
        vec![row("a", "Zed"), row("b", "Ann"), row("c", "Mid")],
    );

    assert!(engine.set_sort(RowField::Name, SortDirection::Asc));
    let names: Vec<&str> = engine.sorted().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Ann", "Mid", "Zed"]);

    engine.select_all_filtered();
    assert_eq!(engine.selected_ids(), vec!["a", "b", "c"]);

    engine.remove_items(["a"]);
    let names: Vec<&str> = engine.sorted().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Ann", "Mid"]);

    let collection: Vec<&str> = engine.items().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(collection, vec!["b", "c"]);
    assert_eq!(engine.selected_ids(), vec!["b", "c"]);
}
