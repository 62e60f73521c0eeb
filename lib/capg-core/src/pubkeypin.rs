//! Public key pinning of the cluster CA
//!
//! A pin is `sha256:<hex>` where the digest covers the DER encoded
//! SubjectPublicKeyInfo of a certificate. Joining nodes use pins to trust
//! the control plane without the full CA chain.

use crate::{CoreError, Result};
use capg_api::GCEClusterProviderSpec;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::io::BufReader;
use tracing::debug;
use x509_parser::certificate::X509Certificate;

/// Hash format supported by pins
const FORMAT_SHA256: &str = "sha256";

/// Compute the public key pin of a certificate
pub fn hash(cert: &X509Certificate<'_>) -> String {
    let digest = Sha256::digest(cert.public_key().raw);
    format!("{}:{}", FORMAT_SHA256, hex::encode(digest))
}

/// Compute the public key pin of the first certificate in PEM data
pub fn ca_cert_hash(pem: &[u8]) -> Result<String> {
    let der = first_certificate(pem)?;
    let (_, cert) = x509_parser::parse_x509_certificate(der.as_ref())
        .map_err(|e| CoreError::CertificateParse(e.to_string()))?;
    Ok(hash(&cert))
}

fn first_certificate(pem: &[u8]) -> Result<Vec<u8>> {
    let mut reader = BufReader::new(pem);
    let der = rustls_pemfile::certs(&mut reader)
        .next()
        .ok_or_else(|| CoreError::CertificateParse("no certificate found in PEM data".to_string()))?
        .map_err(|e| CoreError::CertificateParse(e.to_string()))?;
    Ok(der.to_vec())
}

/// Set of allowed public key pins
#[derive(Clone, Debug, Default)]
pub struct PinSet {
    sha256_hashes: BTreeSet<String>,
}

impl PinSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add pins in `format:hex-value` form to the set
    pub fn allow<S: AsRef<str>>(&mut self, pins: &[S]) -> Result<()> {
        for pin in pins {
            let pin = pin.as_ref();
            let (format, value) = pin.split_once(':').ok_or_else(|| {
                CoreError::InvalidPin(format!(
                    "{:?}: expected \"format:hex-value\", known format is {}",
                    pin, FORMAT_SHA256
                ))
            })?;

            match format.to_lowercase().as_str() {
                FORMAT_SHA256 => self.allow_sha256(value)?,
                _ => {
                    return Err(CoreError::InvalidPin(format!(
                        "unknown hash format {:?}, known format is {}",
                        format, FORMAT_SHA256
                    )))
                }
            }
        }
        Ok(())
    }

    fn allow_sha256(&mut self, value: &str) -> Result<()> {
        let value = value.to_lowercase();
        let bytes = hex::decode(&value)
            .map_err(|e| CoreError::InvalidPin(format!("{:?}: {}", value, e)))?;
        if bytes.len() != 32 {
            return Err(CoreError::InvalidPin(format!(
                "expected a 32 byte SHA-256 hash, found {} bytes",
                bytes.len()
            )));
        }
        self.sha256_hashes.insert(value);
        Ok(())
    }

    /// Check a certificate against the set
    pub fn check(&self, cert: &X509Certificate<'_>) -> Result<()> {
        let pin = hash(cert);
        let value = pin.trim_start_matches("sha256:");
        if self.sha256_hashes.contains(value) {
            Ok(())
        } else {
            Err(CoreError::PinMismatch(pin))
        }
    }

    /// Check the first certificate in PEM data against the set
    pub fn check_pem(&self, pem: &[u8]) -> Result<()> {
        let der = first_certificate(pem)?;
        let (_, cert) = x509_parser::parse_x509_certificate(&der)
            .map_err(|e| CoreError::CertificateParse(e.to_string()))?;
        self.check(&cert)
    }

    pub fn is_empty(&self) -> bool {
        self.sha256_hashes.is_empty()
    }
}

/// Check the CA of a provider spec against its recorded discovery hashes.
/// Specs without discovery hashes pass.
pub fn verify_discovery_hashes(spec: &GCEClusterProviderSpec) -> Result<()> {
    let mut pins = PinSet::new();
    pins.allow(&spec.discovery_hashes)?;
    if pins.is_empty() {
        return Ok(());
    }
    pins.check_pem(&spec.ca_key_pair.cert.0)?;
    debug!("CA certificate matches {} discovery hash(es)", spec.discovery_hashes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use capg_api::KeyPair;

    const CA_CERT: &[u8] = include_bytes!("testdata/ca.crt");
    const CA_KEY: &[u8] = include_bytes!("testdata/ca.key");
    const OTHER_CA_CERT: &[u8] = include_bytes!("testdata/other-ca.crt");
    const CA_HASH: &str =
        "sha256:8dd27d6a606f946edef7f0b641759068ae424dc4e35220d89a0a97ec70fff8fe";
    const OTHER_CA_HASH: &str =
        "sha256:a987d3d163acd186bdb8ceb581dd4308c9150358d96825a2f26f3d2c14b32427";

    #[test]
    fn test_ca_cert_hash() {
        assert_eq!(ca_cert_hash(CA_CERT).unwrap(), CA_HASH);
        assert_eq!(ca_cert_hash(OTHER_CA_CERT).unwrap(), OTHER_CA_HASH);
    }

    #[test]
    fn test_ca_cert_hash_is_deterministic() {
        let first = ca_cert_hash(CA_CERT).unwrap();
        for _ in 0..3 {
            assert_eq!(ca_cert_hash(CA_CERT).unwrap(), first);
        }
    }

    #[test]
    fn test_ca_cert_hash_rejects_non_certificates() {
        assert!(matches!(ca_cert_hash(b""), Err(CoreError::CertificateParse(_))));
        assert!(matches!(ca_cert_hash(b"not a pem"), Err(CoreError::CertificateParse(_))));
        assert!(matches!(ca_cert_hash(CA_KEY), Err(CoreError::CertificateParse(_))));

        let garbage = b"-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n";
        assert!(matches!(ca_cert_hash(garbage), Err(CoreError::CertificateParse(_))));
    }

    #[test]
    fn test_pin_set_allow_and_check() {
        let mut pins = PinSet::new();
        assert!(pins.is_empty());
        pins.allow(&[CA_HASH]).unwrap();
        assert!(!pins.is_empty());

        assert!(pins.check_pem(CA_CERT).is_ok());
        assert!(matches!(
            pins.check_pem(OTHER_CA_CERT),
            Err(CoreError::PinMismatch(pin)) if pin == OTHER_CA_HASH
        ));
    }

    #[test]
    fn test_pin_set_accepts_uppercase() {
        let mut pins = PinSet::new();
        pins.allow(&[CA_HASH.to_uppercase()]).unwrap();
        assert!(pins.check_pem(CA_CERT).is_ok());
    }

    #[test]
    fn test_pin_set_rejects_malformed_pins() {
        let mut pins = PinSet::new();
        for pin in [
            "8dd27d6a606f946edef7f0b641759068ae424dc4e35220d89a0a97ec70fff8fe",
            "md5:8dd27d6a606f946edef7f0b641759068",
            "sha256:xyz",
            "sha256:8dd27d6a",
        ] {
            assert!(
                matches!(pins.allow(&[pin]), Err(CoreError::InvalidPin(_))),
                "pin {} should be rejected",
                pin
            );
        }
        assert!(pins.is_empty());
    }

    #[test]
    fn test_verify_discovery_hashes() {
        let mut spec = GCEClusterProviderSpec {
            ca_key_pair: KeyPair::new(CA_CERT, CA_KEY),
            ..Default::default()
        };
        assert!(verify_discovery_hashes(&spec).is_ok());

        spec.discovery_hashes = vec![OTHER_CA_HASH.to_string(), CA_HASH.to_string()];
        assert!(verify_discovery_hashes(&spec).is_ok());

        spec.discovery_hashes = vec![OTHER_CA_HASH.to_string()];
        assert!(matches!(
            verify_discovery_hashes(&spec),
            Err(CoreError::PinMismatch(_))
        ));
    }
}
