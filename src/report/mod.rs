//! Salary listing for one month.
//!
//! Turns attendance, breakdowns and anomaly counts into [`SalaryRow`]s,
//! sorted by employee name, and pages through them with an optional field
//! officer filter.

mod row;

pub use row::SalaryRow;

use std::collections::HashSet;

use serde::Serialize;

use crate::config::DEFAULT_ROWS_PER_PAGE;

/// One page of a [`SalaryReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<'a> {
    /// The requested page number, 1-based.
    pub page_number: usize,
    /// Number of pages for the active filter.
    pub total_pages: usize,
    /// Number of rows matching the active filter.
    pub total_rows: usize,
    /// The rows on this page.
    pub rows: Vec<&'a SalaryRow>,
}

/// The salary rows of one month, sorted by employee name.
///
/// # Example
///
/// ```
/// use field_payroll::report::{SalaryReport, SalaryRow};
///
/// let rows = vec![
///     SalaryRow { employee_id: 2, name: "meera shah".into(), ..Default::default() },
///     SalaryRow { employee_id: 1, name: "Arjun Das".into(), ..Default::default() },
/// ];
/// let report = SalaryReport::build(rows);
///
/// assert_eq!(report.field_officers(), vec!["Arjun Das", "meera shah"]);
/// let page = report.page(Some("meera shah"), 1);
/// assert_eq!(page.total_pages, 1);
/// assert_eq!(page.rows[0].employee_id, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalaryReport {
    rows: Vec<SalaryRow>,
    rows_per_page: usize,
}

impl SalaryReport {
    /// Sorts `rows` case-insensitively by name, using the default page size.
    pub fn build(rows: Vec<SalaryRow>) -> Self {
        Self::with_rows_per_page(rows, DEFAULT_ROWS_PER_PAGE)
    }

    /// Sorts `rows` case-insensitively by name with a custom page size.
    ///
    /// A page size of zero is treated as one.
    pub fn with_rows_per_page(mut rows: Vec<SalaryRow>, rows_per_page: usize) -> Self {
        rows.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.employee_id.cmp(&b.employee_id))
        });
        Self {
            rows,
            rows_per_page: rows_per_page.max(1),
        }
    }

    /// All rows in display order.
    pub fn rows(&self) -> &[SalaryRow] {
        &self.rows
    }

    /// Rows per page.
    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    /// Whether the month has any attendance at all.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct employee names, in display order.
    pub fn field_officers(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(|row| row.name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Returns one page of rows, optionally restricted to one field officer.
    ///
    /// `page_number` is 1-based; numbers outside the available pages give an
    /// empty page. Page counts follow the filtered row count.
    pub fn page(&self, field_officer: Option<&str>, page_number: usize) -> Page<'_> {
        let filtered: Vec<&SalaryRow> = self
            .rows
            .iter()
            .filter(|r| field_officer.is_none_or(|name| r.name == name))
            .collect();

        let total_rows = filtered.len();
        let total_pages = total_rows.div_ceil(self.rows_per_page);

        let start = page_number
            .checked_sub(1)
            .and_then(|index| index.checked_mul(self.rows_per_page));
        let rows = match start {
            Some(start) => filtered
                .into_iter()
                .skip(start)
                .take(self.rows_per_page)
                .collect(),
            None => Vec::new(),
        };

        Page {
            page_number,
            total_pages,
            total_rows,
            rows,
        }
    }
}
