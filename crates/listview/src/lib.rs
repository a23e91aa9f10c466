//! List view engine for pipeline admin
//!
//! This crate holds the list-processing pipeline shared by every collection
//! view of the admin dashboard: an in-memory collection is filtered by a
//! search term, ordered by a sort key, sliced into pages, and a selection of
//! item ids is tracked across those changes.
//!
//! # Features
//!
//! - Case-insensitive substring search over a configurable field list
//! - Secondary facet filter (e.g. "method" on scenarios)
//! - Stable, case-insensitive sorting in either direction
//! - Clamped 1-based pagination over a fixed set of page sizes
//! - Selection that survives sort and page changes and is cleared by filter
//!   and page-size changes
//!
//! Every operation is synchronous and total. Fetching and deleting items is
//! the caller's business; results are fed back through
//! [`ListViewEngine::replace_collection`] and [`ListViewEngine::remove_items`].

mod highlight;
mod record;
mod state;

use log::debug;
use std::collections::BTreeSet;
use std::collections::HashSet;
use thiserror::Error;

pub use highlight::*;
pub use record::*;
pub use state::*;

/// Errors raised while interpreting list view input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListViewError {
    #[error("Unsupported page size: {0}")]
    InvalidPageSize(usize),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid sort specification: {0}")]
    InvalidSortSpec(String),
}

/// Items of `items` matching the filter, in collection order.
///
/// The search term must be contained in at least one `searchable` field and
/// the facet term in at least one `facets` field. Inactive terms match
/// everything.
pub fn compute_filtered<'a, T: Record>(
    items: &'a [T],
    filter: &FilterState,
    searchable: &[T::Field],
    facets: &[T::Field],
) -> Vec<&'a T> {
    let term = filter.active_term();
    let facet_term = filter.active_facet_term();

    items
        .iter()
        .filter(|item| match &term {
            Some(term) => matches_any(*item, searchable, term),
            None => true,
        })
        .filter(|item| match &facet_term {
            Some(term) => matches_any(*item, facets, term),
            None => true,
        })
        .collect()
}

fn matches_any<T: Record>(item: &T, fields: &[T::Field], folded_term: &str) -> bool {
    fields
        .iter()
        .any(|field| item.field(*field).contains_folded(folded_term))
}

/// Stable sort of a filtered view by one field.
pub fn compute_sorted<'a, T: Record>(
    filtered: Vec<&'a T>,
    sort: &SortState<T::Field>,
) -> Vec<&'a T> {
    let mut keyed: Vec<(String, &'a T)> = filtered
        .into_iter()
        .map(|item| (item.field(sort.field).sort_key(), item))
        .collect();

    match sort.direction {
        SortDirection::Asc => keyed.sort_by(|a, b| a.0.cmp(&b.0)),
        SortDirection::Desc => keyed.sort_by(|a, b| b.0.cmp(&a.0)),
    }

    keyed.into_iter().map(|(_, item)| item).collect()
}

/// The slice `[(page-1)*size, min(page*size, len))` of a sorted view.
///
/// A page past the end yields an empty slice.
pub fn compute_page<'s, 'a, T>(sorted: &'s [&'a T], page: &PageState) -> &'s [&'a T] {
    let size = page.size.get();
    let start = page.page.max(1).saturating_sub(1).saturating_mul(size).min(sorted.len());
    let end = start.saturating_add(size).min(sorted.len());
    &sorted[start..end]
}

/// Filtered, sorted and paginated view over a collection of records
#[derive(Debug, Clone)]
pub struct ListViewEngine<T: Record> {
    items: Vec<T>,
    config: ListViewConfig<T::Field>,
    filter: FilterState,
    sort: SortState<T::Field>,
    page: PageState,
    selection: SelectionSet,
}

impl<T: Record> ListViewEngine<T> {
    /// Create an engine with an empty collection and default state
    pub fn new(config: ListViewConfig<T::Field>) -> Self {
        Self {
            items: Vec::new(),
            filter: FilterState::default(),
            sort: config.default_sort,
            page: PageState::new(config.default_page_size),
            selection: SelectionSet::new(),
            config,
        }
    }

    /// Create an engine over an initial collection
    pub fn with_items(config: ListViewConfig<T::Field>, items: Vec<T>) -> Self {
        let mut engine = Self::new(config);
        engine.items = items;
        engine
    }

    pub fn config(&self) -> &ListViewConfig<T::Field> {
        &self.config
    }

    /// The whole collection, in the order it was loaded
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn sort(&self) -> &SortState<T::Field> {
        &self.sort
    }

    pub fn page_state(&self) -> &PageState {
        &self.page
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Change the search term. Clears the selection and returns to page 1.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.filter.term = term.into();
        self.selection.clear();
        self.page.page = 1;
    }

    /// Change the facet term. Same reset rules as the search term.
    pub fn set_facet_term(&mut self, term: impl Into<String>) {
        self.filter.facet_term = term.into();
        self.selection.clear();
        self.page.page = 1;
    }

    /// Change the sort key. Keeps the selection and returns to page 1.
    ///
    /// Returns `false` and leaves the state untouched when the field is not
    /// one of the configured sortable fields.
    pub fn set_sort(&mut self, field: T::Field, direction: SortDirection) -> bool {
        if !self.config.is_sortable(field) {
            debug!("ignoring sort on non-sortable field {:?}", field);
            return false;
        }
        self.sort = SortState::new(field, direction);
        self.page.page = 1;
        true
    }

    /// Change the page size. Clears the selection and returns to page 1.
    pub fn set_page_size(&mut self, size: PageSize) {
        self.page.size = size;
        self.page.page = 1;
        self.selection.clear();
    }

    /// Jump to a page, clamped to `[1, total_pages]`. Returns the page set.
    pub fn set_page(&mut self, page: usize) -> usize {
        self.page.page = page.clamp(1, self.total_pages());
        self.page.page
    }

    pub fn next_page(&mut self) -> usize {
        let current = self.current_page();
        self.set_page(current.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> usize {
        let current = self.current_page();
        self.set_page(current.saturating_sub(1))
    }

    /// Items matching the filter, in collection order
    pub fn filtered(&self) -> Vec<&T> {
        compute_filtered(
            &self.items,
            &self.filter,
            &self.config.searchable,
            &self.config.facets,
        )
    }

    /// Items matching the filter, in sort order
    pub fn sorted(&self) -> Vec<&T> {
        compute_sorted(self.filtered(), &self.sort)
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered().len()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered_count(), self.page.size)
    }

    /// The page number in effect, clamped against the current filtered count
    pub fn current_page(&self) -> usize {
        self.page.clamped(self.filtered_count())
    }

    /// Items on the current page
    pub fn page_items(&self) -> Vec<&T> {
        let sorted = self.sorted();
        let page = PageState {
            page: self.page.clamped(sorted.len()),
            size: self.page.size,
        };
        compute_page(&sorted, &page).to_vec()
    }

    pub fn page_info(&self) -> PageInfo {
        PageInfo::new(&self.page, self.filtered_count())
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    /// Add the id to the selection if absent, remove it if present
    pub fn toggle_selection(&mut self, id: &str) -> bool {
        self.selection.toggle(id)
    }

    /// Union the selection with the given ids
    pub fn select_ids<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in ids {
            self.selection.insert(id);
        }
    }

    /// Union the selection with the ids on the current page
    pub fn select_all_on_page(&mut self) {
        let ids: Vec<String> = self
            .page_items()
            .into_iter()
            .map(|item| item.id().to_string())
            .collect();
        self.select_ids(ids);
    }

    /// Replace the selection with exactly the ids of the filtered view
    pub fn select_all_filtered(&mut self) {
        self.selection = self
            .filtered()
            .into_iter()
            .map(|item| item.id().to_string())
            .collect();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected ids in a stable order
    pub fn selected_ids(&self) -> Vec<String> {
        self.selection.to_vec()
    }

    /// Selected items, in collection order
    pub fn selected_items(&self) -> Vec<&T> {
        self.items
            .iter()
            .filter(|item| self.selection.contains(item.id()))
            .collect()
    }

    /// Drop items by id from the collection and the selection.
    ///
    /// Filter, sort and page state are left alone; an out-of-range page is
    /// clamped the next time the view is read. Returns the number of items
    /// removed from the collection.
    pub fn remove_items<I, S>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids: HashSet<String> = ids.into_iter().map(|id| id.as_ref().to_string()).collect();
        if ids.is_empty() {
            return 0;
        }

        let before = self.items.len();
        self.items.retain(|item| !ids.contains(item.id()));
        self.selection.retain(|id| !ids.contains(id));

        let removed = before - self.items.len();
        debug!("removed {} of {} requested items", removed, ids.len());
        removed
    }

    /// Swap in a freshly fetched collection.
    ///
    /// Selected ids that are no longer present are dropped from the selection.
    pub fn replace_collection(&mut self, items: Vec<T>) {
        let present: HashSet<&str> = items.iter().map(|item| item.id()).collect();
        self.selection.retain(|id| present.contains(id));

        debug!("collection replaced: {} -> {} items", self.items.len(), items.len());
        self.items = items;
    }

    /// Sorted unique values of the facet fields over the whole collection
    pub fn facet_values(&self) -> Vec<String> {
        let mut values = BTreeSet::new();
        for item in &self.items {
            for field in &self.config.facets {
                for value in item.field(*field).values() {
                    values.insert(value.to_string());
                }
            }
        }
        values.into_iter().collect()
    }

    /// Snapshot of the filter, sort, page and selection slices
    pub fn state(&self) -> ViewState<T::Field> {
        ViewState {
            filter: self.filter.clone(),
            sort: self.sort,
            page: self.page,
            selection: self.selection.clone(),
        }
    }

    /// Restore a snapshot taken with [`ListViewEngine::state`]
    ///
    /// Selected ids that are no longer in the collection are dropped.
    pub fn restore(&mut self, state: ViewState<T::Field>) {
        self.filter = state.filter;
        self.sort = state.sort;
        self.page = state.page;
        self.selection = state.selection;

        let present: HashSet<&str> = self.items.iter().map(|item| item.id()).collect();
        self.selection.retain(|id| present.contains(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    enum PetField {
        #[serde(rename = "id")]
        Id,
        #[serde(rename = "name")]
        Name,
        #[serde(rename = "tags")]
        Tags,
        #[serde(rename = "born")]
        Born,
    }

    impl FieldKey for PetField {
        fn name(self) -> &'static str {
            match self {
                PetField::Id => "id",
                PetField::Name => "name",
                PetField::Tags => "tags",
                PetField::Born => "born",
            }
        }

        fn all() -> &'static [Self] {
            &[PetField::Id, PetField::Name, PetField::Tags, PetField::Born]
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Pet {
        id: String,
        name: String,
        tags: Vec<String>,
        born: Option<String>,
    }

    impl Record for Pet {
        type Field = PetField;

        fn id(&self) -> &str {
            &self.id
        }

        fn field(&self, field: PetField) -> FieldValue<'_> {
            match field {
                PetField::Id => FieldValue::from(&self.id),
                PetField::Name => FieldValue::from(&self.name),
                PetField::Tags => FieldValue::from(&self.tags),
                PetField::Born => match &self.born {
                    Some(born) => FieldValue::Timestamp(born),
                    None => FieldValue::Missing,
                },
            }
        }
    }

    fn pet(id: &str, name: &str, tags: &[&str], born: Option<&str>) -> Pet {
        Pet {
            id: id.to_string(),
            name: name.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            born: born.map(str::to_string),
        }
    }

    fn config() -> ListViewConfig<PetField> {
        ListViewConfig::new(
            vec![PetField::Name, PetField::Id],
            vec![PetField::Name, PetField::Id, PetField::Born],
            SortState::asc(PetField::Name),
        )
        .with_facets(vec![PetField::Tags])
    }

    fn engine() -> ListViewEngine<Pet> {
        ListViewEngine::with_items(
            config(),
            vec![
                pet("p1", "Rex", &["dog", "large"], Some("2021-03-01T10:00:00")),
                pet("p2", "felix", &["cat"], None),
                pet("p3", "Bella", &["dog", "small"], Some("2019-07-15T08:30:00")),
            ],
        )
    }

    fn names(items: &[&Pet]) -> Vec<String> {
        items.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn test_default_view_sorted_by_name() {
        let engine = engine();
        assert_eq!(names(&engine.sorted()), vec!["Bella", "felix", "Rex"]);
        assert_eq!(engine.page_state().size, PageSize::Size50);
    }

    #[test]
    fn test_search_ignores_unconfigured_fields() {
        let mut engine = engine();
        engine.set_search_term("dog");
        assert!(engine.filtered().is_empty());

        engine.set_search_term("P2");
        assert_eq!(names(&engine.filtered()), vec!["felix"]);
    }

    #[test]
    fn test_facet_and_search_combine() {
        let mut engine = engine();
        engine.set_facet_term("DOG");
        assert_eq!(names(&engine.sorted()), vec!["Bella", "Rex"]);

        engine.set_search_term("re");
        assert_eq!(names(&engine.sorted()), vec!["Rex"]);
        assert_eq!(engine.facet_values(), vec!["cat", "dog", "large", "small"]);
    }

    #[test]
    fn test_missing_timestamp_sorts_first_ascending() {
        let mut engine = engine();
        assert!(engine.set_sort(PetField::Born, SortDirection::Asc));
        assert_eq!(names(&engine.sorted()), vec!["felix", "Bella", "Rex"]);

        engine.set_sort(PetField::Born, SortDirection::Desc);
        assert_eq!(names(&engine.sorted()), vec!["Rex", "Bella", "felix"]);
    }

    #[test]
    fn test_set_sort_rejects_non_sortable_field() {
        let mut engine = engine();
        engine.set_page(1);
        assert!(!engine.set_sort(PetField::Tags, SortDirection::Desc));
        assert_eq!(engine.sort().field, PetField::Name);
    }

    #[test]
    fn test_sort_keeps_selection_and_resets_page() {
        let mut engine = engine();
        engine.set_page_size(PageSize::Size25);
        engine.toggle_selection("p1");
        engine.set_sort(PetField::Id, SortDirection::Desc);
        assert!(engine.is_selected("p1"));
        assert_eq!(engine.page_state().page, 1);
    }

    #[test]
    fn test_set_page_clamps() {
        let items: Vec<Pet> = (0..60)
            .map(|i| pet(&format!("id{:02}", i), &format!("pet{:02}", i), &[], None))
            .collect();
        let mut engine = ListViewEngine::with_items(config(), items);
        assert_eq!(engine.set_page(0), 1);
        assert_eq!(engine.set_page(7), 2);
        assert_eq!(engine.page_items().len(), 10);
        assert_eq!(engine.prev_page(), 1);
        assert_eq!(engine.next_page(), 2);
        assert_eq!(engine.next_page(), 2);
    }

    #[test]
    fn test_page_clamps_after_removal() {
        let items: Vec<Pet> = (0..51)
            .map(|i| pet(&format!("id{:02}", i), &format!("pet{:02}", i), &[], None))
            .collect();
        let mut engine = ListViewEngine::with_items(config(), items);
        engine.set_page(2);
        assert_eq!(engine.page_items().len(), 1);

        engine.remove_items(["id50"]);
        assert_eq!(engine.page_state().page, 2);
        assert_eq!(engine.current_page(), 1);
        assert_eq!(engine.page_items().len(), 50);
    }

    #[test]
    fn test_replace_collection_prunes_selection() {
        let mut engine = engine();
        engine.select_all_filtered();
        engine.replace_collection(vec![pet("p2", "felix", &["cat"], None)]);
        assert_eq!(engine.selected_ids(), vec!["p2".to_string()]);
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn test_selected_items_in_collection_order() {
        let mut engine = engine();
        engine.toggle_selection("p3");
        engine.toggle_selection("p1");
        let selected: Vec<&str> = engine.selected_items().iter().map(|p| p.id()).collect();
        assert_eq!(selected, vec!["p1", "p3"]);
    }

    #[test]
    fn test_state_snapshot_restore() {
        let mut engine = engine();
        engine.set_search_term("e");
        engine.set_sort(PetField::Id, SortDirection::Desc);
        engine.toggle_selection("p1");
        let state = engine.state();

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["sort"]["field"], "id");
        assert_eq!(json["sort"]["direction"], "desc");
        assert_eq!(json["page"]["size"], 50);
        assert_eq!(json["selection"], serde_json::json!(["p1"]));

        let mut other = ListViewEngine::with_items(config(), engine.items().to_vec());
        other.restore(serde_json::from_value(json).unwrap());
        assert_eq!(other.state(), state);
    }

    #[test]
    fn test_restore_drops_removed_ids_from_selection() {
        let mut engine = engine();
        engine.select_all_filtered();
        let state = engine.state();

        engine.remove_items(["p1"]);
        engine.restore(state);

        assert!(!engine.is_selected("p1"));
        assert_eq!(engine.selected_ids(), vec!["p2".to_string(), "p3".to_string()]);
        assert_eq!(engine.selected_items().len(), 2);
    }

    #[test]
    fn test_sort_spec_parse() {
        let sort = SortState::<PetField>::parse("born:desc").unwrap();
        assert_eq!(sort, SortState::desc(PetField::Born));
        let sort = SortState::<PetField>::parse("name-asc").unwrap();
        assert_eq!(sort, SortState::asc(PetField::Name));
        let sort = SortState::<PetField>::parse("ID").unwrap();
        assert_eq!(sort.to_string(), "id:asc");
        assert_eq!(
            SortState::<PetField>::parse("color:asc"),
            Err(ListViewError::UnknownField("color".to_string()))
        );
        assert!(SortState::<PetField>::parse("name:up").is_err());
    }
}
