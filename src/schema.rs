//! Column-name constants for the pipeline tables.
//! Single source of truth for joins, aggregation, and the output schemas.

// ── Shared key columns ──────────────────────────────────────────────────────
pub mod keys {
    pub const STORE_ID: &str = "store_id";
    pub const PRODUCT_ID: &str = "product_id";
    pub const YEAR: &str = "year";
    pub const WEEK: &str = "week";
}

// ── Store file columns ──────────────────────────────────────────────────────
pub mod store {
    /// Identifier column as it arrives in the raw file.
    pub const RAW_ID: &str = "store";
    /// Category column as it arrives in the raw file.
    pub const RAW_CATEGORY: &str = "category";

    pub const PREMISE: &str = "premise";
    pub const CATEGORY: &str = "store_category";
    pub const ZIPCODE: &str = "zipcode";
}

// ── Product file columns ────────────────────────────────────────────────────
pub mod product {
    /// Identifier column as it arrives in the raw file.
    pub const RAW_ID: &str = "product";
    /// Category column as it arrives in the raw file.
    pub const RAW_CATEGORY: &str = "category";

    pub const BRAND: &str = "brand";
    pub const CATEGORY: &str = "product_category";
    pub const MANUFACTURER: &str = "manufacturer";
    pub const SUBCATEGORY: &str = "subcategory";
}

// ── Transaction file columns ────────────────────────────────────────────────
pub mod transaction {
    pub const DATE: &str = "transaction_date";
    pub const QUANTITY: &str = "quantity";
    pub const NET_VALUE: &str = "net_value";
    pub const DISCOUNT: &str = "discount";
}

// ── Derived calendar columns ────────────────────────────────────────────────
pub mod calendar {
    pub const MONTH: &str = "month";
    /// Calendar day of the transaction, for distinct-day counting.
    pub const DAY: &str = "transaction_day";
}

// ── Weekly modeling table columns ───────────────────────────────────────────
pub mod weekly {
    /// Summed weekly quantity; also the modeling target.
    pub const QUANTITY: &str = "quantity";
    pub const AVG_NET_VALUE: &str = "avg_net_value";
    pub const TOTAL_DISCOUNT: &str = "total_discount";
    /// Distinct calendar days with activity in the week.
    pub const ACTIVE_DAYS: &str = "n_transaction_days";
    pub const PREV_WEEK_QUANTITY: &str = "prev_week_quantity";
    pub const ROLLING_MEAN_4W: &str = "rolling_mean_4w";
}

// ── Evaluation results columns ──────────────────────────────────────────────
pub mod results {
    pub const ACTUAL: &str = "actual_quantity";
    pub const PREDICTED: &str = "predicted_quantity";
}
