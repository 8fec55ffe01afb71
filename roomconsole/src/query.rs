//! Client-side query state of a paginated, sortable, filterable collection.

use std::collections::BTreeMap;

use crate::types::SortDirection;

/// What the user asked to see: page, ordering and filters.
///
/// `page` is always at least 1. Any change to ordering or filtering moves
/// back to the first page, since the old page number no longer refers to
/// the same rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    page: u32,
    sort_by: Option<String>,
    sort_direction: SortDirection,
    filter: Option<String>,
    params: BTreeMap<String, String>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(None)
    }
}

impl QueryState {
    pub fn new(default_sort: Option<&str>) -> Self {
        Self {
            page: 1,
            sort_by: default_sort.map(str::to_string),
            sort_direction: SortDirection::Asc,
            filter: None,
            params: BTreeMap::new(),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn sort_by(&self) -> Option<&str> {
        self.sort_by.as_deref()
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Whether any filter narrows the collection.
    pub fn is_filtered(&self) -> bool {
        self.filter.is_some() || !self.params.is_empty()
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Set the free-text filter. Blank text clears it.
    pub fn set_filter(&mut self, text: &str) {
        let text = text.trim();
        self.filter = (!text.is_empty()).then(|| text.to_string());
        self.page = 1;
    }

    /// Sort by `column`, toggling direction when it is already the sort column.
    pub fn set_sort(&mut self, column: &str) {
        if self.sort_by.as_deref() == Some(column) {
            self.sort_direction = self.sort_direction.toggled();
        } else {
            self.sort_by = Some(column.to_string());
            self.sort_direction = SortDirection::Asc;
        }
        self.page = 1;
    }

    /// Set an additional named filter (e.g. a role or room type selector).
    /// `None` removes it.
    pub fn set_param(&mut self, key: &str, value: Option<&str>) {
        match value.filter(|v| !v.is_empty()) {
            Some(v) => {
                self.params.insert(key.to_string(), v.to_string());
            }
            None => {
                self.params.remove(key);
            }
        }
        self.page = 1;
    }

    /// Jump to a page. Range checks against the server's last page are the
    /// caller's job; only the lower bound is enforced here.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn next_page(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    pub fn previous_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Serialise into request query parameters.
    ///
    /// Order is fixed: `page`, `sort_by`, `sort_direction`, the filter under
    /// `filter_key`, then extra parameters by key.
    pub fn to_query(&self, filter_key: &str) -> Vec<(String, String)> {
        let mut query = vec![("page".to_string(), self.page.to_string())];
        if let Some(column) = &self.sort_by {
            query.push(("sort_by".into(), column.clone()));
            query.push(("sort_direction".into(), self.sort_direction.to_string()));
        }
        if let Some(filter) = &self.filter {
            query.push((filter_key.to_string(), filter.clone()));
        }
        for (key, value) in &self.params {
            query.push((key.clone(), value.clone()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page() {
        let q = QueryState::new(Some("name"));
        assert_eq!(q.page(), 1);
        assert_eq!(q.sort_by(), Some("name"));
        assert_eq!(q.sort_direction(), SortDirection::Asc);
        assert_eq!(q.filter(), None);
    }

    #[test]
    fn filter_resets_page() {
        let mut q = QueryState::new(None);
        q.set_page(5);
        q.set_filter("admin");
        assert_eq!(q.page(), 1);
        assert_eq!(q.filter(), Some("admin"));

        q.set_page(3);
        q.set_filter("   ");
        assert_eq!(q.page(), 1);
        assert_eq!(q.filter(), None);
    }

    #[test]
    fn sort_toggles_on_same_column() {
        let mut q = QueryState::new(None);
        let mut seen = Vec::new();
        for _ in 0..3 {
            q.set_page(4);
            q.set_sort("name");
            assert_eq!(q.page(), 1);
            seen.push(q.sort_direction());
        }
        assert_eq!(
            seen,
            vec![SortDirection::Asc, SortDirection::Desc, SortDirection::Asc]
        );
    }

    #[test]
    fn sort_on_new_column_starts_ascending() {
        let mut q = QueryState::new(Some("name"));
        q.set_sort("name");
        assert_eq!(q.sort_direction(), SortDirection::Desc);
        q.set_sort("id");
        assert_eq!(q.sort_by(), Some("id"));
        assert_eq!(q.sort_direction(), SortDirection::Asc);
    }

    #[test]
    fn param_change_resets_page() {
        let mut q = QueryState::new(None);
        q.set_page(2);
        q.set_param("room_type", Some("3"));
        assert_eq!(q.page(), 1);
        assert_eq!(q.param("room_type"), Some("3"));
        q.set_param("room_type", None);
        assert_eq!(q.param("room_type"), None);
    }

    #[test]
    fn page_never_below_one() {
        let mut q = QueryState::new(None);
        q.previous_page();
        assert_eq!(q.page(), 1);
        q.set_page(0);
        assert_eq!(q.page(), 1);
        q.next_page();
        q.next_page();
        assert_eq!(q.page(), 3);
        q.previous_page();
        assert_eq!(q.page(), 2);
    }

    #[test]
    fn query_parameters_are_ordered() {
        let mut q = QueryState::new(Some("name"));
        q.set_param("role", Some("2"));
        q.set_param("authenticator", Some("ldap"));
        q.set_filter("john");
        q.set_page(2);

        let pairs = q.to_query("name");
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            ["page", "sort_by", "sort_direction", "name", "authenticator", "role"]
        );
        assert_eq!(pairs[0].1, "2");
        assert_eq!(pairs[3].1, "john");
    }

    #[test]
    fn empty_filter_is_omitted() {
        let q = QueryState::new(None);
        assert_eq!(q.to_query("search"), vec![("page".into(), "1".into())]);
    }
}
