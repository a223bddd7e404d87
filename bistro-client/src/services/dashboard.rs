//! Dashboard figures

use std::sync::Arc;

use chrono::Datelike;
use shared::models::{
    Bill, DashboardStatistics, DashboardSummary, MenuItem, MonthlyRevenue, PopularItems, Staff,
    popular_items,
};
use shared::response::{ListResponse, Page};
use shared::util::today;

use crate::ClientResult;
use crate::filters::{BillFilter, MenuFilter, StaffFilter};
use crate::http::HttpClient;

/// Page size used to pull "all" bills and staff for the cards
pub const OVERVIEW_LIMIT: u32 = 1000;
/// Items per category in the best-seller lists
pub const POPULAR_LIMIT: usize = 5;

/// Everything the dashboard shows, computed from the list endpoints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardOverview {
    pub summary: DashboardSummary,
    pub monthly_revenue: MonthlyRevenue,
    pub popular: PopularItems,
}

pub struct DashboardService<C> {
    http: Arc<C>,
}

service!(DashboardService);

fn settled<T: Default>(what: &str, result: ClientResult<T>) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!(source = what, error = %e, "Dashboard source unavailable, using empty data");
        T::default()
    })
}

impl<C: HttpClient> DashboardService<C> {
    /// Aggregates computed by the backend
    pub async fn statistics(&self) -> ClientResult<DashboardStatistics> {
        self.http.get("dashboard/statistics/").await
    }

    /// Cards, revenue chart and best sellers for the current month
    ///
    /// Sources are fetched concurrently; one that fails contributes empty
    /// data instead of failing the whole overview.
    pub async fn overview(&self) -> DashboardOverview {
        let now = today();
        let bills_filter = BillFilter {
            limit: Some(OVERVIEW_LIMIT),
            ..BillFilter::default()
        };
        let staff_filter = StaffFilter {
            limit: Some(OVERVIEW_LIMIT),
            ..StaffFilter::default()
        };

        let (revenue, bills, staff, menu) = tokio::join!(
            self.http.get_query::<MonthlyRevenue>(
                "bills/monthly_revenue/",
                vec![("year".to_string(), now.year().to_string())],
            ),
            self.http
                .get_query::<ListResponse<Bill>>("bills/", bills_filter.to_query()),
            self.http
                .get_query::<ListResponse<Staff>>("staff/", staff_filter.to_query()),
            self.http
                .get_query::<ListResponse<MenuItem>>("menu-items/", MenuFilter::default().to_query()),
        );

        let revenue = settled("monthly_revenue", revenue);
        let bills: Page<Bill> = settled("bills", bills.map(Page::from));
        let staff = settled("staff", staff.map(ListResponse::into_vec));
        let menu = settled("menu", menu.map(ListResponse::into_vec));

        DashboardOverview {
            summary: DashboardSummary::compute(
                bills.count,
                &bills.results,
                &staff,
                &revenue,
                now.month(),
            ),
            popular: popular_items(&bills.results, &menu, POPULAR_LIMIT),
            monthly_revenue: revenue,
        }
    }
}
