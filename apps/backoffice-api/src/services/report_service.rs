//! Sales reports.
//!
//! Inclusive ranges of UTC calendar days over `sold_at`, oldest sale first.
//! Reports always read the database; they never go through the list cache.

use chrono::{NaiveDate, Utc};
use tracing::debug;

use backoffice_core::{DateRange, Sale};
use backoffice_db::Database;

use crate::error::ApiResult;

/// Report service implementation.
pub struct ReportService {
    db: Database,
}

impl ReportService {
    /// Create a new report service.
    pub fn new(db: Database) -> Self {
        ReportService { db }
    }

    /// Sales from `start` through `end`, both days included.
    pub async fn by_date(&self, start: NaiveDate, end: NaiveDate) -> ApiResult<Vec<Sale>> {
        self.in_range(DateRange::new(start, end)?).await
    }

    /// Sales in one calendar month.
    pub async fn by_month(&self, year: i32, month: u32) -> ApiResult<Vec<Sale>> {
        self.in_range(DateRange::for_month(year, month)?).await
    }

    /// Sales from Monday through Sunday of the current week.
    pub async fn current_week(&self) -> ApiResult<Vec<Sale>> {
        self.in_range(DateRange::week_containing(Utc::now().date_naive())?)
            .await
    }

    async fn in_range(&self, range: DateRange) -> ApiResult<Vec<Sale>> {
        let sales = self
            .db
            .sales()
            .list_between(range.start_at(), range.end_before())
            .await?;

        debug!(start = %range.start(), end = %range.end(), count = sales.len(), "Sales report");
        Ok(sales)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
