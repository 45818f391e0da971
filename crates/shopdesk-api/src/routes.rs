// ── Backend route table ──
//
// Paths are relative to the backend base URL. Item routes take the
// canonical id already rendered as a string.

// ── Auth ─────────────────────────────────────────────────────────────

pub const LOGIN: &str = "/api/auth/login";
pub const LOGOUT: &str = "/api/auth/logout";

// ── Products ─────────────────────────────────────────────────────────

pub const PRODUCTS: &str = "/api/products";

pub fn product(id: &str) -> String {
    format!("/api/products/{id}")
}

// ── Orders ───────────────────────────────────────────────────────────

pub const ORDERS: &str = "/api/orders/all-orders";

// ── Customers ────────────────────────────────────────────────────────

pub const CUSTOMERS: &str = "/api/profile/all";

pub fn customer_status(id: &str) -> String {
    format!("/api/auth/status/{id}")
}

// ── Banners ──────────────────────────────────────────────────────────

pub const BANNERS: &str = "/api/banners";

pub fn banner(id: &str) -> String {
    format!("/api/banners/{id}")
}

pub fn banner_toggle(id: &str) -> String {
    format!("/api/banners/{id}/toggle")
}

// ── Categories ───────────────────────────────────────────────────────

pub const CATEGORIES: &str = "/api/categories/";
pub const SUBCATEGORIES: &str = "/api/categories/getAllSubCategories/";

pub fn category(id: &str) -> String {
    format!("/api/categories/{id}")
}

pub fn category_status(id: &str) -> String {
    format!("/api/categories/{id}/status")
}

pub fn subcategory_status(id: &str) -> String {
    format!("/api/categories/{id}/subStatus")
}

// ── Coupons ──────────────────────────────────────────────────────────

pub const COUPONS: &str = "/api/coupons";

pub fn coupon(id: &str) -> String {
    format!("/api/coupons/{id}")
}

pub fn coupon_status(id: &str) -> String {
    format!("/api/coupons/{id}/status")
}
