// ── Console facade ──
//
// Entry point for consumers. Owns the authenticated client and hands out
// one view per resource kind. Every view's background refresh hangs off
// the console's cancellation token, so `disconnect()` stops them all.

use std::sync::Arc;

use secrecy::SecretString;
use shopdesk_api::{AdminClient, routes};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::ConsoleConfig;
use crate::error::CoreError;
use crate::model::Resource;
use crate::view::{
    BannersView, CategoriesView, CouponsView, CustomersView, OrdersView, ProductsView,
    ResourceView, SubcategoriesView,
};

/// An authenticated session with one admin backend.
///
/// Cheaply cloneable via `Arc<ConsoleInner>`.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    config: ConsoleConfig,
    client: AdminClient,
    cancel: CancellationToken,
}

impl Console {
    /// Build a console from a config that carries a token.
    pub fn new(config: ConsoleConfig) -> Result<Self, CoreError> {
        let Some(token) = config.token.as_ref() else {
            return Err(CoreError::Config {
                message: "no authentication token configured; log in first".into(),
            });
        };
        let client = AdminClient::new(config.base_url.clone(), token, &config.transport())?;
        Ok(Self::with_client(config, client))
    }

    /// Build a console around an existing client.
    pub fn with_client(config: ConsoleConfig, client: AdminClient) -> Self {
        info!(url = %config.base_url, "console ready");
        Self {
            inner: Arc::new(ConsoleInner {
                config,
                client,
                cancel: CancellationToken::new(),
            }),
        }
    }

    /// Exchange credentials for a bearer token.
    pub async fn login(
        config: &ConsoleConfig,
        email: &str,
        password: &SecretString,
    ) -> Result<SecretString, CoreError> {
        let client = AdminClient::anonymous(config.base_url.clone(), &config.transport())?;
        let response = client.login(email, password).await?;
        if response.token.is_empty() {
            return Err(CoreError::AuthenticationFailed {
                message: "backend returned an empty token".into(),
            });
        }
        info!(email, "logged in");
        Ok(SecretString::from(response.token))
    }

    /// End the backend session and stop every view.
    pub async fn logout(&self) -> Result<(), CoreError> {
        let result = self.inner.client.logout().await;
        self.disconnect();
        result?;
        info!("logged out");
        Ok(())
    }

    /// Stop background refresh on every view created from this console.
    pub fn disconnect(&self) {
        if !self.inner.cancel.is_cancelled() {
            self.inner.cancel.cancel();
            info!("console disconnected");
        }
    }

    pub fn is_connected(&self) -> bool {
        !self.inner.cancel.is_cancelled()
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &AdminClient {
        &self.inner.client
    }

    // ── Views ────────────────────────────────────────────────────────

    /// Orders, with new-arrival detection.
    pub fn orders(&self) -> OrdersView {
        ResourceView::with_notifier(
            self.inner.client.clone(),
            routes::ORDERS,
            self.inner.config.poll_interval,
            self.inner.cancel.child_token(),
        )
    }

    pub fn customers(&self) -> CustomersView {
        self.view(routes::CUSTOMERS)
    }

    pub fn banners(&self) -> BannersView {
        self.view(routes::BANNERS)
    }

    pub fn categories(&self) -> CategoriesView {
        self.view(routes::CATEGORIES)
    }

    pub fn subcategories(&self) -> SubcategoriesView {
        self.view(routes::SUBCATEGORIES)
    }

    pub fn coupons(&self) -> CouponsView {
        self.view(routes::COUPONS)
    }

    pub fn products(&self) -> ProductsView {
        self.view(routes::PRODUCTS)
    }

    fn view<T: Resource>(&self, path: &'static str) -> ResourceView<T> {
        ResourceView::new(
            self.inner.client.clone(),
            path,
            self.inner.config.poll_interval,
            self.inner.cancel.child_token(),
        )
    }
}
