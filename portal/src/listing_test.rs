use super::*;

#[test]
fn default_query_is_first_page_newest_first() {
    let query = ListQuery::default();
    assert_eq!(query.page, 1);
    assert_eq!(query.page_size, DEFAULT_PAGE_SIZE);
    assert_eq!(query.sort_by, "createdAt");
    assert_eq!(query.order, SortOrder::Desc);
}

#[test]
fn query_string_omits_blank_search() {
    let query = ListQuery::default();
    assert_eq!(query.to_query_string(), "page=1&pageSize=10&sortBy=createdAt&order=desc");
}

#[test]
fn query_string_encodes_search() {
    let mut query = ListQuery::default();
    query.set_search(" routeur wifi&co ");
    assert_eq!(
        query.to_query_string(),
        "page=1&pageSize=10&search=routeur%20wifi%26co&sortBy=createdAt&order=desc"
    );
}

#[test]
fn set_search_resets_page() {
    let mut query = ListQuery { page: 4, ..ListQuery::default() };
    query.set_search("x");
    assert_eq!(query.page, 1);
}

#[test]
fn toggle_sort_flips_same_column() {
    let mut query = ListQuery::default();
    query.toggle_sort("createdAt");
    assert_eq!(query.order, SortOrder::Asc);
    query.toggle_sort("createdAt");
    assert_eq!(query.order, SortOrder::Desc);
}

#[test]
fn toggle_sort_new_column_starts_ascending() {
    let mut query = ListQuery { page: 3, ..ListQuery::default() };
    query.toggle_sort("libelle");
    assert_eq!(query.sort_by, "libelle");
    assert_eq!(query.order, SortOrder::Asc);
    assert_eq!(query.page, 1);
}

#[test]
fn paging_is_clamped() {
    let mut query = ListQuery::default();
    query.prev_page();
    assert_eq!(query.page, 1);
    query.next_page(2);
    query.next_page(2);
    assert_eq!(query.page, 2);
    query.next_page(0);
    assert_eq!(query.page, 1);
}
