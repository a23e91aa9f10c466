//! State slices owned by a list view

use serde::{Deserialize, Serialize};
use std::collections::btree_set;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::record::FieldKey;
use crate::ListViewError;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// The opposite direction
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = ListViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(ListViewError::InvalidSortSpec(other.to_string())),
        }
    }
}

/// Chosen sort key and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: FieldKey")]
pub struct SortState<F: FieldKey> {
    pub field: F,
    pub direction: SortDirection,
}

impl<F: FieldKey> SortState<F> {
    pub fn new(field: F, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn asc(field: F) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: F) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// Parse `field:dir`, `field-dir` or a bare `field` (ascending)
    pub fn parse(spec: &str) -> Result<Self, ListViewError> {
        let spec = spec.trim();
        let (name, direction) = match spec.rsplit_once(':') {
            Some((name, dir)) => (name, dir.parse()?),
            None => match spec.rsplit_once('-') {
                Some((name, dir)) if dir.parse::<SortDirection>().is_ok() => (name, dir.parse()?),
                _ => (spec, SortDirection::Asc),
            },
        };

        let field = F::parse(name).ok_or_else(|| ListViewError::UnknownField(name.to_string()))?;
        Ok(Self::new(field, direction))
    }
}

impl<F: FieldKey> fmt::Display for SortState<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field.name(), self.direction.as_str())
    }
}

/// Supported page sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum PageSize {
    Size25,
    #[default]
    Size50,
    Size100,
    Size200,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [
        PageSize::Size25,
        PageSize::Size50,
        PageSize::Size100,
        PageSize::Size200,
    ];

    pub fn get(self) -> usize {
        match self {
            PageSize::Size25 => 25,
            PageSize::Size50 => 50,
            PageSize::Size100 => 100,
            PageSize::Size200 => 200,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = ListViewError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        PageSize::ALL
            .iter()
            .copied()
            .find(|size| size.get() == value)
            .ok_or(ListViewError::InvalidPageSize(value))
    }
}

impl From<PageSize> for usize {
    fn from(size: PageSize) -> Self {
        size.get()
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Free-text search plus the optional facet term
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub term: String,
    #[serde(default)]
    pub facet_term: String,
}

impl FilterState {
    /// Case-folded search term, `None` when empty or whitespace-only
    pub fn active_term(&self) -> Option<String> {
        fold_active(&self.term)
    }

    /// Case-folded facet term, `None` when empty or whitespace-only
    pub fn active_facet_term(&self) -> Option<String> {
        fold_active(&self.facet_term)
    }

    pub fn is_active(&self) -> bool {
        self.active_term().is_some() || self.active_facet_term().is_some()
    }
}

fn fold_active(term: &str) -> Option<String> {
    if term.trim().is_empty() {
        None
    } else {
        Some(term.to_lowercase())
    }
}

/// 1-based page number and page size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    pub page: usize,
    pub size: PageSize,
}

impl PageState {
    pub fn new(size: PageSize) -> Self {
        Self { page: 1, size }
    }

    /// The page number clamped to `[1, total_pages(filtered_count)]`
    pub fn clamped(&self, filtered_count: usize) -> usize {
        self.page.clamp(1, total_pages(filtered_count, self.size))
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}

/// Number of pages for a filtered count, never less than one
pub fn total_pages(filtered_count: usize, size: PageSize) -> usize {
    filtered_count.div_ceil(size.get()).max(1)
}

/// Selected item ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet {
    ids: BTreeSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Add the id if absent, remove it if present. Returns whether it is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Keep only the ids accepted by the predicate
    pub fn retain<P: FnMut(&str) -> bool>(&mut self, mut keep: P) {
        self.ids.retain(|id| keep(id));
    }

    pub fn iter(&self) -> btree_set::Iter<'_, String> {
        self.ids.iter()
    }

    /// Selected ids in a stable order
    pub fn to_vec(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a String;
    type IntoIter = btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

/// Per-resource configuration of a list view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListViewConfig<F: FieldKey> {
    /// Fields the search term is matched against
    pub searchable: Vec<F>,

    /// Fields the view may be sorted by
    pub sortable: Vec<F>,

    /// Fields the facet term is matched against
    pub facets: Vec<F>,

    pub default_sort: SortState<F>,

    pub default_page_size: PageSize,
}

impl<F: FieldKey> ListViewConfig<F> {
    pub fn new(searchable: Vec<F>, sortable: Vec<F>, default_sort: SortState<F>) -> Self {
        Self {
            searchable,
            sortable,
            facets: Vec::new(),
            default_sort,
            default_page_size: PageSize::default(),
        }
    }

    pub fn with_facets(mut self, facets: Vec<F>) -> Self {
        self.facets = facets;
        self
    }

    pub fn with_default_page_size(mut self, size: PageSize) -> Self {
        self.default_page_size = size;
        self
    }

    pub fn is_sortable(&self, field: F) -> bool {
        self.sortable.contains(&field)
    }
}

/// Serializable snapshot of every state slice of a view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: FieldKey")]
pub struct ViewState<F: FieldKey> {
    pub filter: FilterState,
    pub sort: SortState<F>,
    pub page: PageState,
    pub selection: SelectionSet,
}

/// Position of the current page within the filtered view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
    /// 1-based index of the first item on the page, 0 when empty
    pub start: usize,
    /// 1-based index of the last item on the page, 0 when empty
    pub end: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

impl PageInfo {
    pub fn new(page: &PageState, total: usize) -> Self {
        let total_pages = total_pages(total, page.size);
        let current = page.clamped(total);
        let size = page.size.get();
        let (start, end) = if total == 0 {
            (0, 0)
        } else {
            ((current - 1) * size + 1, (current * size).min(total))
        };

        Self {
            page: current,
            total_pages,
            total,
            start,
            end,
            has_prev: current > 1,
            has_next: current < total_pages,
        }
    }
}

impl fmt::Display for PageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 0 {
            write!(f, "no items")
        } else {
            write!(
                f,
                "{}-{} / {} (page {} of {})",
                self.start, self.end, self.total, self.page, self.total_pages
            )
        }
    }
}
