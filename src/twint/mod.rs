//! The TWINT payment link codec.
//!
//! [`TwintService`] encodes payment requests as URIs consumable by an
//! external wallet app (or a browser fallback) and decodes the return deep
//! link carrying the settlement status back into the app. It owns the
//! process-wide admin configuration record, loaded once at construction
//! from durable storage and replaced wholesale on save. The service never
//! moves money - it only encodes a request and decodes a return signal.

pub mod launcher;
pub mod links;
pub mod validation;

pub use launcher::UrlOpener;
pub use links::{
    PaymentReturn, PaymentStatus, UserPaymentRequest, generate_payment_return_link,
    parse_payment_return_link,
};
pub use validation::{validate_amount, validate_iban, validate_message, validate_phone_number};

use crate::db::{StoragePool, storage};
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};
use tracing::{info, instrument, warn};

/// Fallback default message when the admin has not configured one.
const DEFAULT_REQUEST_MESSAGE: &str = "Getränke Tracker";
/// Fallback payee display name.
const DEFAULT_ADMIN_INFO: &str = "Admin";

/// Admin payee configuration. Exactly one instance exists process-wide;
/// created empty, replaced wholesale on save, never partially patched.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TwintAdminConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_name: Option<String>,
}

/// The payment link codec. One instance per process, constructed by the
/// composition root over the shared storage pool.
#[derive(Debug)]
pub struct TwintService {
    pool: StoragePool,
    admin_config: Mutex<TwintAdminConfig>,
}

impl TwintService {
    /// Constructs the codec, loading the stored admin configuration.
    ///
    /// A missing, unreadable or corrupt stored record is logged and treated
    /// as the empty configuration; construction never fails.
    #[instrument(skip(pool))]
    pub async fn load(pool: StoragePool) -> Self {
        let admin_config = match storage::get_value(&pool, storage::TWINT_ADMIN_CONFIG_KEY).await {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!("Ignoring corrupt TWINT admin config in storage: {}", e);
                TwintAdminConfig::default()
            }),
            Ok(None) => TwintAdminConfig::default(),
            Err(e) => {
                warn!("Failed to load TWINT admin config, starting empty: {}", e);
                TwintAdminConfig::default()
            }
        };
        Self {
            pool,
            admin_config: Mutex::new(admin_config),
        }
    }

    fn lock_config(&self) -> Result<MutexGuard<'_, TwintAdminConfig>> {
        self.admin_config
            .lock()
            .map_err(|_| Error::Storage("Failed to acquire TWINT config lock".to_string()))
    }

    /// Returns a defensive copy of the admin configuration.
    #[must_use]
    pub fn admin_config(&self) -> TwintAdminConfig {
        match self.lock_config() {
            Ok(config) => config.clone(),
            Err(e) => {
                warn!("TWINT config unavailable, returning empty: {}", e);
                TwintAdminConfig::default()
            }
        }
    }

    /// Replaces the admin configuration wholesale (no merge) and persists
    /// it under its fixed storage key.
    #[instrument(skip(self, config))]
    pub async fn save_admin_config(&self, config: TwintAdminConfig) -> Result<()> {
        let json = serde_json::to_string(&config)?;
        {
            let mut guard = self.lock_config()?;
            *guard = config;
        }
        storage::set_value(&self.pool, storage::TWINT_ADMIN_CONFIG_KEY, &json).await?;
        info!("TWINT admin config replaced.");
        Ok(())
    }

    /// Builds a `twint://pay` payment request URI.
    ///
    /// An explicitly passed `iban` overrides the stored admin IBAN; with
    /// neither present the `iban` parameter is omitted entirely.
    #[must_use]
    pub fn generate_payment_request(
        &self,
        amount: f64,
        message: &str,
        iban: Option<&str>,
    ) -> String {
        let effective_iban = iban.map(ToString::to_string).or_else(|| self.admin_config().iban);
        links::build_payment_request(amount, message, effective_iban.as_deref())
    }

    /// Payload for a locally rendered QR code - the same URI as
    /// [`generate_payment_request`](Self::generate_payment_request).
    #[must_use]
    pub fn generate_payment_qr_code(
        &self,
        amount: f64,
        message: &str,
        iban: Option<&str>,
    ) -> String {
        self.generate_payment_request(amount, message, iban)
    }

    /// Composes the full payment-request bundle for one user's tab.
    ///
    /// The wallet message is `"<admin default or 'Getränke Tracker'> -
    /// <description>"`; the return deep link is always stamped
    /// `status=pending` at generation time and is advisory - it is handed
    /// to the caller, not dispatched here.
    #[must_use]
    pub fn generate_user_payment_request(
        &self,
        user_id: &str,
        amount: f64,
        description: &str,
    ) -> UserPaymentRequest {
        let config = self.admin_config();
        let default_message = config
            .default_message
            .unwrap_or_else(|| DEFAULT_REQUEST_MESSAGE.to_string());
        let wallet_message = format!("{default_message} - {description}").trim().to_string();

        let payment_url = self.generate_payment_request(amount, &wallet_message, None);
        let deep_link_url =
            links::generate_payment_return_link(user_id, amount, PaymentStatus::Pending);

        UserPaymentRequest {
            qr_code_data: payment_url.clone(),
            payment_url,
            message: format!("Zahlungsanfrage für {amount:.2} CHF"),
            deep_link_url,
            admin_info: config
                .merchant_name
                .unwrap_or_else(|| DEFAULT_ADMIN_INFO.to_string()),
        }
    }

    /// Attempts to open the payment request in the wallet app, falling back
    /// to the TWINT web URL when no handler claims the scheme. Errors are
    /// swallowed; the return value is the only signal.
    pub async fn open_twint_app(
        &self,
        opener: &dyn UrlOpener,
        amount: f64,
        message: &str,
        iban: Option<&str>,
    ) -> bool {
        let app_url = self.generate_payment_request(amount, message, iban);
        let web_url = links::build_web_fallback_url(amount, message);
        launcher::open_with_fallback(opener, &app_url, &web_url)
    }

    /// Probes whether a wallet app handles the `twint` scheme, using a
    /// fixed throwaway test URI. Best-effort only.
    pub async fn can_open_twint_app(&self, opener: &dyn UrlOpener) -> bool {
        opener.can_open(&links::build_payment_request(1.0, "test", None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{init_test_tracing, setup_test_storage};
    use crate::errors::Result;
    use std::sync::Arc;

    fn full_config() -> TwintAdminConfig {
        TwintAdminConfig {
            iban: Some("CH9300762011623852957".to_string()),
            phone_number: Some("+41791234567".to_string()),
            default_message: Some("Bierlounge".to_string()),
            merchant_name: Some("Bierlounge Bar".to_string()),
        }
    }

    #[tokio::test]
    async fn test_admin_config_round_trip_through_fresh_service() -> Result<()> {
        init_test_tracing();
        let pool = setup_test_storage()?;

        let service = TwintService::load(Arc::clone(&pool)).await;
        assert_eq!(service.admin_config(), TwintAdminConfig::default());

        service.save_admin_config(full_config()).await?;
        drop(service);

        let reloaded = TwintService::load(pool).await;
        assert_eq!(reloaded.admin_config(), full_config());
        Ok(())
    }

    #[tokio::test]
    async fn test_save_replaces_wholesale_without_merge() -> Result<()> {
        init_test_tracing();
        let pool = setup_test_storage()?;
        let service = TwintService::load(pool).await;

        service.save_admin_config(full_config()).await?;
        service
            .save_admin_config(TwintAdminConfig {
                merchant_name: Some("Nur Name".to_string()),
                ..TwintAdminConfig::default()
            })
            .await?;

        let config = service.admin_config();
        assert!(config.iban.is_none(), "Save must replace, never merge.");
        assert_eq!(config.merchant_name.as_deref(), Some("Nur Name"));
        Ok(())
    }

    #[tokio::test]
    async fn test_explicit_iban_overrides_stored_admin_iban() -> Result<()> {
        init_test_tracing();
        let pool = setup_test_storage()?;
        let service = TwintService::load(pool).await;
        service.save_admin_config(full_config()).await?;

        let with_override =
            service.generate_payment_request(5.0, "Tab", Some("CH5604835012345678009"));
        assert!(with_override.contains("iban=CH5604835012345678009"));

        let with_admin_iban = service.generate_payment_request(5.0, "Tab", None);
        assert!(with_admin_iban.contains("iban=CH9300762011623852957"));
        Ok(())
    }

    #[tokio::test]
    async fn test_iban_parameter_omitted_without_any_iban() -> Result<()> {
        init_test_tracing();
        let pool = setup_test_storage()?;
        let service = TwintService::load(pool).await;

        let link = service.generate_payment_request(5.0, "Tab", None);
        assert!(!link.contains("iban="));
        assert_eq!(link, service.generate_payment_qr_code(5.0, "Tab", None));
        Ok(())
    }

    #[tokio::test]
    async fn test_user_payment_request_bundle() -> Result<()> {
        init_test_tracing();
        let pool = setup_test_storage()?;
        let service = TwintService::load(pool).await;
        service.save_admin_config(full_config()).await?;

        let request = service.generate_user_payment_request("u1", 12.5, "Offener Deckel");

        assert_eq!(request.payment_url, request.qr_code_data);
        assert!(request.payment_url.contains("message=Bierlounge+-+Offener+Deckel"));
        assert_eq!(request.message, "Zahlungsanfrage für 12.50 CHF");
        assert_eq!(request.admin_info, "Bierlounge Bar");
        assert!(
            request.deep_link_url.contains("status=pending"),
            "The advisory return link is always stamped pending at generation time."
        );

        let decoded = parse_payment_return_link(&request.deep_link_url).unwrap();
        assert_eq!(decoded.user_id.as_deref(), Some("u1"));
        assert_eq!(decoded.status, Some(PaymentStatus::Pending));
        Ok(())
    }

    #[tokio::test]
    async fn test_user_payment_request_defaults_without_config() -> Result<()> {
        init_test_tracing();
        let pool = setup_test_storage()?;
        let service = TwintService::load(pool).await;

        let request = service.generate_user_payment_request("u1", 3.0, "Bier");
        assert!(request.payment_url.contains("Getr%C3%A4nke+Tracker+-+Bier"));
        assert_eq!(request.admin_info, "Admin");
        Ok(())
    }

    #[tokio::test]
    async fn test_open_and_probe_via_opener_seam() -> Result<()> {
        init_test_tracing();
        let pool = setup_test_storage()?;
        let service = TwintService::load(pool).await;

        struct NeverOpener;
        impl UrlOpener for NeverOpener {
            fn can_open(&self, _url: &str) -> bool {
                false
            }
            fn open(&self, _url: &str) -> Result<()> {
                Err(Error::UrlOpen("no handler".to_string()))
            }
        }

        assert!(!service.can_open_twint_app(&NeverOpener).await);
        assert!(
            !service.open_twint_app(&NeverOpener, 5.0, "Tab", None).await,
            "When both the app and the web fallback fail, the result is false."
        );
        Ok(())
    }
}
