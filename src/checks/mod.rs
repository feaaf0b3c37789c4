//! Test case evaluation
//!
//! Every check performs its own navigation and its own bounded wait before
//! asserting, so a case never depends on where the previous one left the
//! session.
//!
//! ## Built-in cases
//!
//! - Home, products, login and register pages load
//! - Cart redirects anonymous users to login
//! - Home and products pages carry a title
//! - Core routes render without "Cannot GET" / "404"
//! - The application is served from the configured host

mod builtin;

pub use builtin::{builtin_suite, find_case};

use std::time::Duration;
use tracing::debug;

use crate::browser::{wait_for_url_contains, BrowserError, BrowserSession, BODY_SELECTOR};
use crate::models::{BaseUrl, Check, CheckOutcome};

/// Everything a check needs besides the session
#[derive(Clone, Debug)]
pub struct CheckContext {
    pub base_url: BaseUrl,
    pub wait_timeout: Duration,
}

impl CheckContext {
    pub fn new(base_url: BaseUrl, wait_timeout: Duration) -> Self {
        Self {
            base_url,
            wait_timeout,
        }
    }
}

/// Evaluate a check against the shared session.
///
/// Assertion misses come back as `Ok(CheckOutcome::Fail)`; browser-level
/// problems, including wait timeouts, come back as `Err`.
pub async fn evaluate<S: BrowserSession>(
    check: &Check,
    session: &S,
    ctx: &CheckContext,
) -> Result<CheckOutcome, BrowserError> {
    match check {
        Check::TitlePresent { path } => {
            open_page(session, ctx, path).await?;
            let title = session.title().await?;
            if title.is_empty() {
                Ok(CheckOutcome::Fail(format!("{path} has an empty title")))
            } else {
                Ok(CheckOutcome::Pass)
            }
        }
        Check::UrlContains { path, expected } => url_lands_on(session, ctx, path, expected).await,
        Check::ServedFromBase { path } => {
            let authority = ctx.base_url.authority();
            url_lands_on(session, ctx, path, &authority).await
        }
        Check::NoErrorContent { paths, forbidden } => {
            for path in paths {
                open_page(session, ctx, path).await?;
                let source = session.page_source().await?;
                if let Some(hit) = forbidden.iter().find(|f| source.contains(f.as_str())) {
                    return Ok(CheckOutcome::Fail(format!(
                        "{path} page source contains '{hit}'"
                    )));
                }
            }
            Ok(CheckOutcome::Pass)
        }
    }
}

/// Navigate and wait for the body element
async fn open_page<S: BrowserSession>(
    session: &S,
    ctx: &CheckContext,
    path: &str,
) -> Result<(), BrowserError> {
    let url = ctx.base_url.route(path);
    debug!("Opening {}", url);
    session.navigate(&url).await?;
    session
        .wait_for_element(BODY_SELECTOR, ctx.wait_timeout)
        .await
}

async fn url_lands_on<S: BrowserSession>(
    session: &S,
    ctx: &CheckContext,
    path: &str,
    expected: &str,
) -> Result<CheckOutcome, BrowserError> {
    session.navigate(&ctx.base_url.route(path)).await?;
    wait_for_url_contains(session, expected, ctx.wait_timeout).await?;

    let current = session.current_url().await?;
    if current.contains(expected) {
        Ok(CheckOutcome::Pass)
    } else {
        Ok(CheckOutcome::Fail(format!(
            "expected URL containing '{expected}', got {current}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::builtin::CORE_ROUTES;
    use super::*;
    use crate::testing::{storefront_session, FakePage};

    fn ctx() -> CheckContext {
        CheckContext::new(
            BaseUrl::parse("http://localhost:3000/").unwrap(),
            Duration::from_secs(10),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_cart_redirects_to_login() {
        let session = storefront_session();
        let outcome = evaluate(&Check::url_contains("/cart", "/login"), &session, &ctx())
            .await
            .unwrap();

        assert_eq!(outcome, CheckOutcome::Pass);
        assert_eq!(
            session.state().navigations,
            vec!["http://localhost:3000/cart"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_url_wait_times_out_as_error() {
        let session = storefront_session();
        let err = evaluate(&Check::url_contains("/products", "/checkout"), &session, &ctx())
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test(start_paused = true)]
    async fn test_core_routes_have_no_error_content() {
        let session = storefront_session();
        let check = Check::no_error_content(CORE_ROUTES.iter().copied());
        let outcome = evaluate(&check, &session, &ctx()).await.unwrap();

        assert_eq!(outcome, CheckOutcome::Pass);
        assert_eq!(session.state().navigations.len(), CORE_ROUTES.len());
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_page_detected() {
        let session = storefront_session().page(
            "http://localhost:3000/register",
            FakePage::rendered("http://localhost:3000/register", "Error")
                .with_source("<html><body><pre>Cannot GET /register</pre></body></html>"),
        );

        let check = Check::no_error_content(CORE_ROUTES.iter().copied());
        let outcome = evaluate(&check, &session, &ctx()).await.unwrap();

        assert_eq!(
            outcome,
            CheckOutcome::Fail("/register page source contains 'Cannot GET'".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_title_fails() {
        let session = storefront_session().page(
            "http://localhost:3000/products",
            FakePage::rendered("http://localhost:3000/products", ""),
        );

        let outcome = evaluate(&Check::title_present("/products"), &session, &ctx())
            .await
            .unwrap();
        assert!(matches!(outcome, CheckOutcome::Fail(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_whitespace_title_counts_as_present() {
        let session = storefront_session().page(
            "http://localhost:3000/products",
            FakePage::rendered("http://localhost:3000/products", " "),
        );

        let outcome = evaluate(&Check::title_present("/products"), &session, &ctx())
            .await
            .unwrap();
        assert_eq!(outcome, CheckOutcome::Pass);
    }

    #[tokio::test(start_paused = true)]
    async fn test_served_from_base_host() {
        let session = storefront_session();
        let outcome = evaluate(&Check::served_from_base("/"), &session, &ctx())
            .await
            .unwrap();
        assert_eq!(outcome, CheckOutcome::Pass);
    }
}
