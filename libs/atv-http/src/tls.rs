//! TLS connector construction.
//!
//! Native root certificates are loaded once per process; the OS store lookup
//! is slow on some platforms and the result never changes at runtime.

use crate::config::{TlsRootConfig, TransportSecurity};
use crate::error::HttpError;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use rustls_pki_types::CertificateDer;
use std::sync::{Arc, OnceLock};

static NATIVE_ROOTS: OnceLock<Vec<CertificateDer<'static>>> = OnceLock::new();

fn native_root_certs() -> &'static [CertificateDer<'static>] {
    NATIVE_ROOTS
        .get_or_init(|| {
            let result = rustls_native_certs::load_native_certs();
            for err in &result.errors {
                tracing::warn!(error = %err, "error loading native root certificate");
            }
            if result.certs.is_empty() {
                tracing::warn!("no native root CA certificates found");
            } else {
                tracing::debug!(count = result.certs.len(), "loaded native root certificates");
            }
            result.certs
        })
        .as_slice()
}

/// Use the process-wide crypto provider when one is installed, otherwise
/// aws-lc-rs without installing it globally.
fn crypto_provider() -> Arc<rustls::crypto::CryptoProvider> {
    rustls::crypto::CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()))
}

fn native_client_config() -> Result<rustls::ClientConfig, HttpError> {
    let certs = native_root_certs();
    if certs.is_empty() {
        return Err(HttpError::Tls(
            "no native root CA certificates found in OS certificate store".into(),
        ));
    }

    let mut roots = rustls::RootCertStore::empty();
    let (added, ignored) = roots.add_parsable_certificates(certs.iter().cloned());
    if ignored > 0 {
        tracing::warn!(added, ignored, "some native root certificates could not be parsed");
    }
    if added == 0 {
        return Err(HttpError::Tls(
            format!("no valid native root CA certificates parsed ({ignored} rejected)").into(),
        ));
    }

    rustls::ClientConfig::builder_with_provider(crypto_provider())
        .with_safe_default_protocol_versions()
        .map_err(|e| HttpError::Tls(Box::new(e)))
        .map(|builder| {
            builder
                .with_root_certificates(roots)
                .with_no_client_auth()
        })
}

/// Build the HTTPS connector for the given root strategy.
///
/// # Errors
///
/// Returns `HttpError::Tls` when the root store cannot be assembled.
pub(crate) fn build_https_connector(
    tls_roots: TlsRootConfig,
    transport: TransportSecurity,
) -> Result<HttpsConnector<HttpConnector>, HttpError> {
    let allow_http = transport == TransportSecurity::AllowInsecureHttp;

    let builder = match tls_roots {
        TlsRootConfig::WebPki => hyper_rustls::HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(crypto_provider())
            .map_err(|e| HttpError::Tls(Box::new(e)))?,
        TlsRootConfig::Native => {
            hyper_rustls::HttpsConnectorBuilder::new().with_tls_config(native_client_config()?)
        }
    };

    let connector = if allow_http {
        builder.https_or_http().enable_all_versions().build()
    } else {
        builder.https_only().enable_all_versions().build()
    };
    Ok(connector)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_native_roots_cached() {
        let first = native_root_certs();
        let second = native_root_certs();
        assert!(std::ptr::eq(first, second), "should return the cached slice");
    }

    #[test]
    fn test_webpki_connector_builds() {
        assert!(build_https_connector(TlsRootConfig::WebPki, TransportSecurity::TlsOnly).is_ok());
        assert!(
            build_https_connector(TlsRootConfig::WebPki, TransportSecurity::AllowInsecureHttp)
                .is_ok()
        );
    }
}
