//! Client-side list helpers used by the CRUD screens: search, filter,
//! pagination and CSV export over rows already fetched from the API.

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Case-insensitive substring match against any of `fields`.
/// An empty (or whitespace) term matches everything.
pub fn matches_search<'a>(term: &str, fields: impl IntoIterator<Item = &'a str>) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(&term))
}

/// Drop-down filter where one option ("All Departments", "All Statuses", ...)
/// means "no filter".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceFilter {
    all_label: &'static str,
    selected: String,
}

impl ChoiceFilter {
    pub fn new(all_label: &'static str) -> Self {
        Self {
            all_label,
            selected: all_label.to_string(),
        }
    }

    pub fn select(&mut self, value: impl Into<String>) {
        self.selected = value.into();
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn all_label(&self) -> &'static str {
        self.all_label
    }

    pub fn matches(&self, value: &str) -> bool {
        self.selected == self.all_label || self.selected == value
    }

    /// Options for the drop-down: the "all" label followed by `values`.
    pub fn options<I, S>(&self, values: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        std::iter::once(self.all_label.to_string())
            .chain(values.into_iter().map(Into::into))
            .collect()
    }
}

/// One page of a filtered list. Pages are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether pagination controls are needed at all.
    pub fn is_paginated(&self) -> bool {
        self.total_pages > 1
    }
}

pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1))
}

/// Slice out page `page` (clamped into `1..=total_pages`).
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_pages(total_items, page_size);
    let page = page.clamp(1, total_pages.max(1));

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total_items);
    let items = items.get(start..end).map(<[T]>::to_vec).unwrap_or_default();

    Page {
        items,
        page,
        total_pages,
        total_items,
    }
}

/// CSV text: every cell quoted, embedded quotes doubled, rows joined by `\n`.
pub fn to_csv<H, R, C>(headers: &[H], rows: R) -> String
where
    H: AsRef<str>,
    R: IntoIterator,
    R::Item: IntoIterator<Item = C>,
    C: AsRef<str>,
{
    let mut lines = vec![headers
        .iter()
        .map(|h| quote(h.as_ref()))
        .collect::<Vec<_>>()
        .join(",")];
    for row in rows {
        lines.push(
            row.into_iter()
                .map(|c| quote(c.as_ref()))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    lines.join("\n")
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_is_case_insensitive_over_fields() {
        assert!(matches_search("ali", ["Alice Moyo", "EMP-001"]));
        assert!(matches_search("emp-0", ["Alice Moyo", "EMP-001"]));
        assert!(!matches_search("bob", ["Alice Moyo", "EMP-001"]));
        assert!(matches_search("  ", ["anything"]));
    }

    #[test]
    fn choice_filter_all_label_matches_everything() {
        let mut filter = ChoiceFilter::new("All Departments");
        assert!(filter.matches("Finance"));
        filter.select("IT");
        assert!(filter.matches("IT"));
        assert!(!filter.matches("Finance"));
        assert_eq!(
            filter.options(["IT", "Finance"]),
            vec!["All Departments", "IT", "Finance"]
        );
    }

    #[test]
    fn paginate_slices_and_clamps() {
        let items: Vec<u32> = (1..=23).collect();
        let first = paginate(&items, 1, 10);
        assert_eq!(first.items, (1..=10).collect::<Vec<_>>());
        assert_eq!(first.total_pages, 3);
        assert!(!first.has_previous());
        assert!(first.has_next());

        let last = paginate(&items, 3, 10);
        assert_eq!(last.items, vec![21, 22, 23]);

        let beyond = paginate(&items, 99, 10);
        assert_eq!(beyond.page, 3);

        let before = paginate(&items, 0, 10);
        assert_eq!(before.page, 1);
    }

    #[test]
    fn paginate_empty_list() {
        let page = paginate::<u32>(&[], 4, DEFAULT_PAGE_SIZE);
        assert!(page.items.is_empty());
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 0);
        assert!(!page.is_paginated());
    }

    #[test]
    fn csv_quotes_every_cell() {
        let csv = to_csv(
            &["Employee ID", "Name"],
            vec![vec!["E1", "Tendai \"T\" Moyo"], vec!["E2", "Rudo, R."]],
        );
        assert_eq!(
            csv,
            "\"Employee ID\",\"Name\"\n\"E1\",\"Tendai \"\"T\"\" Moyo\"\n\"E2\",\"Rudo, R.\""
        );
    }
}
