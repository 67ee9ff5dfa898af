//! The API endpoints URIs.

/// The route for loading the seed feed into the database.
pub const SEED_DB: &str = "/seed-db";
/// The route for listing transactions a page at a time.
pub const TRANSACTIONS: &str = "/transactions";
/// The route for the sales totals of a month.
pub const STATISTICS: &str = "/statistics";
/// The route for the price histogram of a month.
pub const PRICE_RANGE_STATISTICS: &str = "/price-range-statistics";
/// The route for the category histogram of a month.
pub const CATEGORY_PIE_CHART: &str = "/category-pie-chart";
/// The route for the statistics and both histograms of a month in one response.
pub const COMBINED_DATA: &str = "/combined-data";
