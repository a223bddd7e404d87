//! List filters and their query-string form
//!
//! Empty values (blank search, "all" ranges, unset dates) never reach the
//! query string.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use shared::models::{MenuCategory, StaffRole, TableStatus};
use shared::response::PageRequest;

/// Customer list page size
pub const CUSTOMER_PAGE_SIZE: u32 = 10;

#[derive(Debug, Default)]
struct Query(Vec<(String, String)>);

impl Query {
    fn push(&mut self, key: &str, value: impl ToString) {
        self.0.push((key.to_string(), value.to_string()));
    }

    fn push_opt(&mut self, key: &str, value: Option<impl ToString>) {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    fn push_text(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.push(key, value);
        }
    }

    fn push_date(&mut self, key: &str, value: Option<NaiveDate>) {
        self.push_opt(key, value.map(|d| d.format("%Y-%m-%d")));
    }
}

/// Unknown range label
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown range: {0}")]
pub struct UnknownRange(pub String);

/// Loyalty point bracket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoyaltyRange {
    #[default]
    All,
    UpTo50,
    From51To100,
    From101To200,
    From200,
}

impl LoyaltyRange {
    pub fn bounds(self) -> (Option<u32>, Option<u32>) {
        match self {
            Self::All => (None, None),
            Self::UpTo50 => (Some(0), Some(50)),
            Self::From51To100 => (Some(51), Some(100)),
            Self::From101To200 => (Some(101), Some(200)),
            Self::From200 => (Some(200), None),
        }
    }
}

impl FromStr for LoyaltyRange {
    type Err = UnknownRange;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "all" => Ok(Self::All),
            "0-50" => Ok(Self::UpTo50),
            "51-100" => Ok(Self::From51To100),
            "101-200" => Ok(Self::From101To200),
            "200+" => Ok(Self::From200),
            other => Err(UnknownRange(other.to_string())),
        }
    }
}

/// Total spend bracket, in VND
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpentRange {
    #[default]
    All,
    UpTo5M,
    From5MTo10M,
    From10MTo20M,
    From20M,
}

impl SpentRange {
    pub fn bounds(self) -> (Option<u64>, Option<u64>) {
        match self {
            Self::All => (None, None),
            Self::UpTo5M => (Some(0), Some(5_000_000)),
            Self::From5MTo10M => (Some(5_000_000), Some(10_000_000)),
            Self::From10MTo20M => (Some(10_000_000), Some(20_000_000)),
            Self::From20M => (Some(20_000_000), None),
        }
    }
}

impl FromStr for SpentRange {
    type Err = UnknownRange;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "all" => Ok(Self::All),
            "0-5000000" => Ok(Self::UpTo5M),
            "5000000-10000000" => Ok(Self::From5MTo10M),
            "10000000-20000000" => Ok(Self::From10MTo20M),
            "20000000+" => Ok(Self::From20M),
            other => Err(UnknownRange(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        })
    }
}

impl FromStr for SortOrder {
    type Err = UnknownRange;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(UnknownRange(other.to_string())),
        }
    }
}

/// Customer list filter
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerFilter {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub loyalty: LoyaltyRange,
    pub spent: SpentRange,
    /// Field to order by, e.g. `loyalty_points`
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
    pub joined_from: Option<NaiveDate>,
    pub joined_to: Option<NaiveDate>,
}

impl Default for CustomerFilter {
    fn default() -> Self {
        Self {
            page: 1,
            limit: CUSTOMER_PAGE_SIZE,
            search: None,
            loyalty: LoyaltyRange::All,
            spent: SpentRange::All,
            sort_by: None,
            sort_order: SortOrder::Desc,
            joined_from: None,
            joined_to: None,
        }
    }
}

impl CustomerFilter {
    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(field.into());
        self.sort_order = order;
        self
    }

    /// `-field` for descending, `field` for ascending
    pub fn ordering(&self) -> Option<String> {
        let field = self.sort_by.as_deref().map(str::trim).filter(|f| !f.is_empty())?;
        Some(match self.sort_order {
            SortOrder::Asc => field.to_string(),
            SortOrder::Desc => format!("-{}", field),
        })
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut q = Query::default();
        q.push("page", self.page.max(1));
        q.push("limit", self.limit);
        q.push_text("search", self.search.as_deref());

        let (min, max) = self.loyalty.bounds();
        q.push_opt("loyalty_points_min", min);
        q.push_opt("loyalty_points_max", max);
        let (min, max) = self.spent.bounds();
        q.push_opt("total_spent_min", min);
        q.push_opt("total_spent_max", max);

        q.push_opt("ordering", self.ordering());
        q.push_date("created_at_after", self.joined_from);
        q.push_date("created_at_before", self.joined_to);
        q.0
    }
}

/// Table list filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableFilter {
    pub floor: Option<i32>,
    pub status: Option<TableStatus>,
}

impl TableFilter {
    pub fn floor(floor: i32) -> Self {
        Self {
            floor: Some(floor),
            status: None,
        }
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut q = Query::default();
        q.push_opt("floor", self.floor);
        q.push_opt("status", self.status.map(|s| s.as_str()));
        q.0
    }
}

/// Bill list filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillFilter {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl BillFilter {
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from_date: Some(from),
            to_date: Some(to),
            ..Self::default()
        }
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut q = Query::default();
        q.push_date("from_date", self.from_date);
        q.push_date("to_date", self.to_date);
        q.push_text("search", self.search.as_deref());
        q.push_opt("page", self.page);
        q.push_opt("limit", self.limit);
        q.0
    }
}

/// Menu list filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuFilter {
    pub search: Option<String>,
    pub category: Option<MenuCategory>,
}

impl MenuFilter {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut q = Query::default();
        q.push_text("search", self.search.as_deref());
        q.push_opt("category", self.category.map(|c| c.as_str()));
        q.0
    }
}

/// Staff list filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaffFilter {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub role: Option<StaffRole>,
}

impl StaffFilter {
    pub fn paged(page: PageRequest) -> Self {
        Self {
            page: Some(page.page),
            limit: Some(page.limit),
            ..Self::default()
        }
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut q = Query::default();
        q.push_opt("page", self.page);
        q.push_opt("limit", self.limit);
        q.push_text("search", self.search.as_deref());
        q.push_opt("role", self.role.map(|r| r.as_str()));
        q.0
    }
}
