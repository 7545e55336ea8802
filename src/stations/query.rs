//! Query Pipeline
//!
//! Pure transformation over a snapshot of station records:
//! filter by status, filter by minimum bikes, search, sort, paginate.
//! The order of the steps is fixed.

use std::cmp::Ordering;

use serde::Serialize;

use crate::stations::StationRecord;

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: usize = 100;

// == Sort Key ==
/// Field to order results by. `Number` is the fallback and always sorts
/// ascending, whatever direction was asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Number,
    Name,
    AvailableBikes,
    Occupancy,
}

impl SortKey {
    /// Parses a sort key case-insensitively; anything unrecognized is `Number`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("name") => SortKey::Name,
            Some("availablebikes") => SortKey::AvailableBikes,
            Some("occupancy") => SortKey::Occupancy,
            _ => SortKey::Number,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Number => "number",
            SortKey::Name => "name",
            SortKey::AvailableBikes => "availableBikes",
            SortKey::Occupancy => "occupancy",
        }
    }

    fn compare(self, a: &StationRecord, b: &StationRecord) -> Ordering {
        match self {
            SortKey::Number => a.number.cmp(&b.number),
            SortKey::Name => a
                .name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name)),
            SortKey::AvailableBikes => a.available_bikes.cmp(&b.available_bikes),
            SortKey::Occupancy => a.occupancy().total_cmp(&b.occupancy()),
        }
    }
}

// == Sort Direction ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Only `desc` (any case) means descending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(dir) if dir.trim().eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

// == Station Query ==
/// Full query signature accepted by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StationQuery {
    pub status: Option<String>,
    pub min_bikes: Option<u32>,
    pub search: Option<String>,
    pub sort: SortKey,
    pub direction: SortDirection,
    /// 1-based page number, clamped to >= 1
    pub page: usize,
    /// Clamped to 1..=MAX_PAGE_SIZE
    pub page_size: usize,
}

impl Default for StationQuery {
    fn default() -> Self {
        Self {
            status: None,
            min_bikes: None,
            search: None,
            sort: SortKey::Number,
            direction: SortDirection::Asc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl StationQuery {
    /// Sets the page and page size, clamping both into range.
    pub fn paged(mut self, page: i64, page_size: i64) -> Self {
        self.page = clamp_page(page);
        self.page_size = clamp_page_size(page_size);
        self
    }

    /// Returns the query with page bounds forced into range.
    pub fn normalized(mut self) -> Self {
        self.page = self.page.max(1);
        self.page_size = self.page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }
}

/// Clamps a requested page number to >= 1.
pub fn clamp_page(page: i64) -> usize {
    usize::try_from(page.max(1)).unwrap_or(usize::MAX)
}

/// Clamps a requested page size into 1..=MAX_PAGE_SIZE.
pub fn clamp_page_size(page_size: i64) -> usize {
    // Bounded by MAX_PAGE_SIZE, so the cast cannot truncate
    page_size.clamp(1, MAX_PAGE_SIZE as i64) as usize
}

// == Page ==
/// One page of results plus accurate count metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    /// Maps the items, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
            has_previous: self.has_previous,
            has_next: self.has_next,
        }
    }
}

// == Pipeline ==
/// Runs the full pipeline over `records`.
pub fn execute(records: Vec<StationRecord>, query: &StationQuery) -> Page<StationRecord> {
    let query = query.clone().normalized();
    let status = query
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut matched: Vec<StationRecord> = records
        .into_iter()
        .filter(|r| status.map_or(true, |s| r.status.eq_ignore_ascii_case(s)))
        .filter(|r| query.min_bikes.map_or(true, |min| r.available_bikes >= min))
        .filter(|r| needle.as_deref().map_or(true, |n| matches_search(r, n)))
        .collect();

    sort_records(&mut matched, query.sort, query.direction);
    paginate(matched, query.page, query.page_size)
}

/// Case-insensitive substring match on name or address. `needle` is lowercase.
fn matches_search(record: &StationRecord, needle: &str) -> bool {
    record.name.to_lowercase().contains(needle) || record.address.to_lowercase().contains(needle)
}

/// Stable sort; ties keep their incoming order in both directions.
pub fn sort_records(records: &mut [StationRecord], key: SortKey, direction: SortDirection) {
    match (key, direction) {
        (SortKey::Number, _) | (_, SortDirection::Asc) => {
            records.sort_by(|a, b| key.compare(a, b))
        }
        (_, SortDirection::Desc) => records.sort_by(|a, b| key.compare(b, a)),
    }
}

/// Slices out one page. `page` and `page_size` must already be clamped.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let total_count = items.len();
    let total_pages = total_count.div_ceil(page_size);
    let offset = (page - 1).saturating_mul(page_size);

    let items = items.into_iter().skip(offset).take(page_size).collect();

    Page {
        items,
        page,
        page_size,
        total_count,
        total_pages,
        has_previous: page > 1,
        has_next: page < total_pages,
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::stations::test_support::sample_records;

    fn numbers(page: &Page<StationRecord>) -> Vec<u32> {
        page.items.iter().map(|r| r.number).collect()
    }

    #[test]
    fn test_no_filters_returns_all_by_number() {
        let page = execute(sample_records(), &StationQuery::default());
        assert_eq!(numbers(&page), vec![1, 2, 3]);
        assert_eq!(page.total_count, 3);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next);
        assert!(!page.has_previous);
    }

    #[test]
    fn test_status_filter_is_case_insensitive() {
        let query = StationQuery {
            status: Some("open".to_string()),
            ..Default::default()
        };
        let page = execute(sample_records(), &query);
        assert_eq!(page.total_count, 2);
        assert!(page.items.iter().all(|r| r.status == "OPEN"));
    }

    #[test]
    fn test_min_bikes_filter() {
        let query = StationQuery {
            min_bikes: Some(8),
            ..Default::default()
        };
        let page = execute(sample_records(), &query);
        assert_eq!(numbers(&page), vec![2]);
    }

    #[test]
    fn test_search_matches_name_or_address() {
        let by_name = StationQuery {
            search: Some("closed".to_string()),
            ..Default::default()
        };
        let page = execute(sample_records(), &by_name);
        assert_eq!(numbers(&page), vec![3]);

        let by_address = StationQuery {
            search: Some("ADDRESS 2".to_string()),
            ..Default::default()
        };
        let page = execute(sample_records(), &by_address);
        assert_eq!(numbers(&page), vec![2]);
    }

    #[test]
    fn test_blank_search_and_status_are_ignored() {
        let query = StationQuery {
            status: Some("  ".to_string()),
            search: Some("".to_string()),
            ..Default::default()
        };
        assert_eq!(execute(sample_records(), &query).total_count, 3);
    }

    #[test]
    fn test_sort_by_name_asc() {
        let query = StationQuery {
            sort: SortKey::Name,
            ..Default::default()
        };
        let page = execute(sample_records(), &query);
        assert_eq!(page.items[0].name, "CLOSED STATION");
    }

    #[test]
    fn test_sort_by_available_bikes_desc() {
        let query = StationQuery {
            sort: SortKey::AvailableBikes,
            direction: SortDirection::Desc,
            ..Default::default()
        };
        assert_eq!(numbers(&execute(sample_records(), &query)), vec![2, 1, 3]);
    }

    #[test]
    fn test_sort_by_occupancy() {
        let query = StationQuery {
            sort: SortKey::Occupancy,
            ..Default::default()
        };
        // 0%, 25%, 33.33%
        assert_eq!(numbers(&execute(sample_records(), &query)), vec![3, 1, 2]);
    }

    #[test]
    fn test_unknown_sort_key_falls_back_to_number() {
        assert_eq!(SortKey::parse(Some("bogus")), SortKey::Number);
        assert_eq!(SortKey::parse(None), SortKey::Number);
        assert_eq!(SortKey::parse(Some("AvailableBikes")), SortKey::AvailableBikes);
        assert_eq!(SortDirection::parse(Some("DESC")), SortDirection::Desc);
        assert_eq!(SortDirection::parse(Some("down")), SortDirection::Asc);
    }

    #[test]
    fn test_number_sort_ignores_direction() {
        let bogus_desc = StationQuery {
            sort: SortKey::parse(Some("bogus")),
            direction: SortDirection::parse(Some("desc")),
            ..Default::default()
        };
        assert_eq!(numbers(&execute(sample_records(), &bogus_desc)), vec![1, 2, 3]);

        let default_desc = StationQuery {
            direction: SortDirection::Desc,
            ..Default::default()
        };
        assert_eq!(
            execute(sample_records(), &default_desc),
            execute(sample_records(), &StationQuery::default())
        );
    }

    #[test]
    fn test_first_page_of_two() {
        let query = StationQuery::default().paged(1, 2);
        let page = execute(sample_records(), &query);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_count, 3);
        assert_eq!(page.total_pages, 2);
        assert!(page.has_next);
        assert!(!page.has_previous);
    }

    #[test]
    fn test_page_beyond_last_is_empty_with_accurate_counts() {
        let query = StationQuery::default().paged(5, 2);
        let page = execute(sample_records(), &query);
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 3);
        assert_eq!(page.total_pages, 2);
        assert!(page.has_previous);
        assert!(!page.has_next);
    }

    #[test]
    fn test_empty_result() {
        let query = StationQuery {
            status: Some("MAINTENANCE".to_string()),
            ..Default::default()
        };
        let page = execute(sample_records(), &query);
        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next);
    }

    #[test]
    fn test_page_bounds_are_clamped() {
        let query = StationQuery::default().paged(-3, 1_000);
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, MAX_PAGE_SIZE);

        let query = StationQuery::default().paged(2, 0);
        assert_eq!(query.page_size, 1);

        let unclamped = StationQuery {
            page: 0,
            page_size: 0,
            ..Default::default()
        };
        let page = execute(sample_records(), &unclamped);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 1);
        assert_eq!(page.items.len(), 1);
    }
}
