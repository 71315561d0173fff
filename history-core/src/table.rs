use chrono::NaiveDate;

/// Page sizes offered for the daily table.
pub const ROWS_PER_PAGE_OPTIONS: [usize; 3] = [10, 20, 50];

pub const DEFAULT_ROWS_PER_PAGE: usize = 10;

/// Pagination over a fixed number of rows. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    total: usize,
    page: usize,
    rows_per_page: usize,
}

impl Pager {
    pub fn new(total: usize) -> Self {
        Self { total, page: 1, rows_per_page: DEFAULT_ROWS_PER_PAGE }
    }

    pub fn with_rows_per_page(total: usize, rows_per_page: usize) -> Self {
        let mut pager = Self::new(total);
        pager.set_rows_per_page(rows_per_page);
        pager
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of pages; an empty table still shows one page.
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.rows_per_page).max(1)
    }

    pub fn go_to(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages());
    }

    pub fn first(&mut self) {
        self.go_to(1);
    }

    pub fn prev(&mut self) {
        self.go_to(self.page.saturating_sub(1));
    }

    pub fn next(&mut self) {
        self.go_to(self.page + 1);
    }

    pub fn last(&mut self) {
        self.go_to(self.total_pages());
    }

    pub fn is_first(&self) -> bool {
        self.page == 1
    }

    pub fn is_last(&self) -> bool {
        self.page == self.total_pages()
    }

    /// Change the page size and jump back to the first page. Sizes outside
    /// [`ROWS_PER_PAGE_OPTIONS`] fall back to the default.
    pub fn set_rows_per_page(&mut self, rows_per_page: usize) {
        self.rows_per_page = if ROWS_PER_PAGE_OPTIONS.contains(&rows_per_page) {
            rows_per_page
        } else {
            DEFAULT_ROWS_PER_PAGE
        };
        self.page = 1;
    }

    /// Half-open index range of the rows on the current page.
    pub fn bounds(&self) -> std::ops::Range<usize> {
        let start = ((self.page - 1) * self.rows_per_page).min(self.total);
        let end = (start + self.rows_per_page).min(self.total);
        start..end
    }

    /// "Showing 11 to 20 of 31 entries"
    pub fn summary(&self) -> String {
        let bounds = self.bounds();
        format!("Showing {} to {} of {} entries", bounds.start + 1, bounds.end, self.total)
    }
}

pub fn format_temperature(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v:.1}{unit}"),
        None => "N/A".to_string(),
    }
}

/// "Mon, Jan 1, 2024"
pub fn format_table_date(date: NaiveDate) -> String {
    date.format("%a, %b %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::date;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(Pager::new(31).total_pages(), 4);
        assert_eq!(Pager::new(30).total_pages(), 3);
        assert_eq!(Pager::new(0).total_pages(), 1);
        assert_eq!(Pager::with_rows_per_page(31, 50).total_pages(), 1);
    }

    #[test]
    fn navigation_is_clamped() {
        let mut pager = Pager::new(31);
        pager.prev();
        assert_eq!(pager.page(), 1);
        assert!(pager.is_first());

        pager.last();
        assert_eq!(pager.page(), 4);
        pager.next();
        assert_eq!(pager.page(), 4);
        assert!(pager.is_last());

        pager.go_to(0);
        assert_eq!(pager.page(), 1);
        pager.go_to(99);
        assert_eq!(pager.page(), 4);
    }

    #[test]
    fn last_page_is_partial() {
        let mut pager = Pager::new(31);
        pager.last();
        assert_eq!(pager.bounds(), 30..31);
        assert_eq!(pager.summary(), "Showing 31 to 31 of 31 entries");
    }

    #[test]
    fn changing_page_size_resets_to_first_page() {
        let mut pager = Pager::new(120);
        pager.go_to(3);
        pager.set_rows_per_page(20);

        assert_eq!(pager.page(), 1);
        assert_eq!(pager.bounds(), 0..20);
        assert_eq!(pager.total_pages(), 6);
    }

    #[test]
    fn unsupported_page_size_uses_default() {
        let pager = Pager::with_rows_per_page(40, 7);
        assert_eq!(pager.rows_per_page(), DEFAULT_ROWS_PER_PAGE);
    }

    #[test]
    fn formats_cells() {
        assert_eq!(format_temperature(Some(12.345), "°C"), "12.3°C");
        assert_eq!(format_temperature(None, "°C"), "N/A");
        assert_eq!(format_table_date(date("2024-01-01")), "Mon, Jan 1, 2024");
    }
}
