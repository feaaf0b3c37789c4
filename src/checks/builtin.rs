//! The default storefront suite

use crate::models::{Check, TestCase};

/// Routes every deployment must serve
pub const CORE_ROUTES: &[&str] = &["/", "/products", "/login", "/register"];

/// Ordered built-in cases
pub fn builtin_suite() -> Vec<TestCase> {
    vec![
        TestCase::new("load_home_page", Check::title_present("/"))
            .describe("Home page loads with a title"),
        TestCase::new("load_products_page", Check::url_contains("/products", "/products"))
            .describe("Products page is reachable"),
        TestCase::new("navigate_to_login_page", Check::url_contains("/login", "/login"))
            .describe("Login page is reachable"),
        TestCase::new(
            "navigate_to_register_page",
            Check::url_contains("/register", "/register"),
        )
        .describe("Register page is reachable"),
        TestCase::new("redirect_to_login_from_cart", Check::url_contains("/cart", "/login"))
            .describe("Anonymous cart visit redirects to login"),
        TestCase::new("home_page_title", Check::title_present("/"))
            .describe("Home page title is not empty"),
        TestCase::new("products_page_title", Check::title_present("/products"))
            .describe("Products page title is not empty"),
        TestCase::new(
            "basic_routes_no_errors",
            Check::no_error_content(CORE_ROUTES.iter().copied()),
        )
        .describe("Core routes render without error pages"),
        TestCase::new("application_served_from_base", Check::served_from_base("/"))
            .describe("Application is served from the configured host"),
    ]
}

/// Look up a built-in case by name
pub fn find_case(name: &str) -> Option<TestCase> {
    builtin_suite().into_iter().find(|c| c.name == name)
}
