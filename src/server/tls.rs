//! rustls configuration for the HTTPS listener.
//!
//! Restricted to TLS 1.2 and 1.3 with AEAD cipher suites only; TLS 1.2 suites
//! additionally require ECDHE key exchange.

use std::path::Path;
use std::sync::Arc;

use rustls::crypto::{ring, CryptoProvider};
use rustls::pki_types::pem::PemObject;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::{CipherSuite, ServerConfig};
use thiserror::Error;

/// Cipher suites the listener will negotiate.
pub const ALLOWED_CIPHER_SUITES: &[CipherSuite] = &[
    CipherSuite::TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256,
    CipherSuite::TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384,
    CipherSuite::TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384,
    CipherSuite::TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305_SHA256,
    CipherSuite::TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256,
    CipherSuite::TLS13_AES_128_GCM_SHA256,
    CipherSuite::TLS13_AES_256_GCM_SHA384,
    CipherSuite::TLS13_CHACHA20_POLY1305_SHA256,
];

#[derive(Debug, Error)]
pub enum TlsError {
    #[error("failed to read certificates from {path}: {reason}")]
    Certificates { path: String, reason: String },

    #[error("no certificates found in {0}")]
    NoCertificates(String),

    #[error("failed to read private key from {path}: {reason}")]
    PrivateKey { path: String, reason: String },

    #[error("invalid TLS configuration: {0}")]
    Rustls(#[from] rustls::Error),
}

/// Protocol versions the listener will negotiate.
pub const PROTOCOL_VERSIONS: &[&rustls::SupportedProtocolVersion] =
    &[&rustls::version::TLS12, &rustls::version::TLS13];

/// Crypto provider limited to [`ALLOWED_CIPHER_SUITES`].
pub fn restricted_provider() -> CryptoProvider {
    let mut provider = ring::default_provider();
    provider
        .cipher_suites
        .retain(|suite| ALLOWED_CIPHER_SUITES.contains(&suite.suite()));
    provider
}

/// Build a server config from PEM certificate chain and key files.
pub fn server_config(cert_file: &Path, key_file: &Path) -> Result<ServerConfig, TlsError> {
    let certs = load_certificates(cert_file)?;
    let key = PrivateKeyDer::from_pem_file(key_file).map_err(|e| TlsError::PrivateKey {
        path: key_file.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut config = ServerConfig::builder_with_provider(Arc::new(restricted_provider()))
        .with_protocol_versions(PROTOCOL_VERSIONS)?
        .with_no_client_auth()
        .with_single_cert(certs, key)?;
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

    Ok(config)
}

fn load_certificates(path: &Path) -> Result<Vec<CertificateDer<'static>>, TlsError> {
    let to_error = |e: rustls::pki_types::pem::Error| TlsError::Certificates {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    let certs = CertificateDer::pem_file_iter(path)
        .map_err(to_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_error)?;

    if certs.is_empty() {
        return Err(TlsError::NoCertificates(path.display().to_string()));
    }
    Ok(certs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustls::pki_types::ServerName;
    use rustls::{ClientConfig, ClientConnection, Connection, ProtocolVersion, RootCertStore};

    struct SelfSigned {
        _dir: tempfile::TempDir,
        cert: std::path::PathBuf,
        key: std::path::PathBuf,
    }

    fn self_signed() -> SelfSigned {
        let dir = tempfile::tempdir().unwrap();
        let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
        let cert = dir.path().join("cert.pem");
        let key = dir.path().join("key.pem");
        std::fs::write(&cert, certified.cert.pem()).unwrap();
        std::fs::write(&key, certified.key_pair.serialize_pem()).unwrap();
        SelfSigned {
            _dir: dir,
            cert,
            key,
        }
    }

    fn client_config(
        cert: &Path,
        version: &'static rustls::SupportedProtocolVersion,
    ) -> Arc<ClientConfig> {
        let mut roots = RootCertStore::empty();
        for der in load_certificates(cert).unwrap() {
            roots.add(der).unwrap();
        }
        let config = ClientConfig::builder_with_provider(Arc::new(ring::default_provider()))
            .with_protocol_versions(&[version])
            .unwrap()
            .with_root_certificates(roots)
            .with_no_client_auth();
        Arc::new(config)
    }

    fn transfer(from: &mut Connection, to: &mut Connection) {
        let mut buf = Vec::new();
        while from.wants_write() {
            from.write_tls(&mut buf).unwrap();
        }
        let mut rd = &buf[..];
        while !rd.is_empty() {
            to.read_tls(&mut rd).unwrap();
            to.process_new_packets().unwrap();
        }
    }

    /// Complete an in-memory handshake and return the server side.
    fn handshake(server_config: ServerConfig, client_config: Arc<ClientConfig>) -> Connection {
        let name = ServerName::try_from("localhost").unwrap();
        let mut client = Connection::Client(ClientConnection::new(client_config, name).unwrap());
        let mut server =
            Connection::Server(rustls::ServerConnection::new(Arc::new(server_config)).unwrap());

        while client.is_handshaking() || server.is_handshaking() {
            transfer(&mut client, &mut server);
            transfer(&mut server, &mut client);
        }
        server
    }

    #[test]
    fn test_server_config_from_pem_files() {
        let files = self_signed();
        let config = server_config(&files.cert, &files.key).unwrap();

        assert_eq!(
            config.alpn_protocols,
            vec![b"h2".to_vec(), b"http/1.1".to_vec()]
        );
        let suites = &config.crypto_provider().cipher_suites;
        assert!(!suites.is_empty());
        for suite in suites {
            assert!(ALLOWED_CIPHER_SUITES.contains(&suite.suite()));
            assert!(PROTOCOL_VERSIONS
                .iter()
                .any(|v| v.version == suite.version().version));
        }
    }

    #[test]
    fn test_handshake_tls13() {
        let files = self_signed();
        let config = server_config(&files.cert, &files.key).unwrap();

        let server = handshake(config, client_config(&files.cert, &rustls::version::TLS13));
        assert_eq!(server.protocol_version(), Some(ProtocolVersion::TLSv1_3));
        let suite = server.negotiated_cipher_suite().unwrap().suite();
        assert!(ALLOWED_CIPHER_SUITES.contains(&suite));
    }

    #[test]
    fn test_handshake_tls12_uses_ecdhe_aead() {
        let files = self_signed();
        let config = server_config(&files.cert, &files.key).unwrap();

        let server = handshake(config, client_config(&files.cert, &rustls::version::TLS12));
        assert_eq!(server.protocol_version(), Some(ProtocolVersion::TLSv1_2));
        let suite = server.negotiated_cipher_suite().unwrap().suite();
        assert!(ALLOWED_CIPHER_SUITES.contains(&suite));
    }

    #[test]
    fn test_missing_private_key_file() {
        let files = self_signed();
        let err = server_config(&files.cert, &files.cert.with_file_name("missing.pem"))
            .unwrap_err();
        assert!(matches!(err, TlsError::PrivateKey { .. }));
    }

    #[test]
    fn test_restricted_provider_only_allowed_suites() {
        let provider = restricted_provider();
        assert!(!provider.cipher_suites.is_empty());
        for suite in &provider.cipher_suites {
            assert!(ALLOWED_CIPHER_SUITES.contains(&suite.suite()));
        }
    }

    #[test]
    fn test_restricted_provider_keeps_tls13_suites() {
        let provider = restricted_provider();
        let suites: Vec<_> = provider.cipher_suites.iter().map(|s| s.suite()).collect();
        assert!(suites.contains(&CipherSuite::TLS13_AES_128_GCM_SHA256));
        assert!(suites.contains(&CipherSuite::TLS13_CHACHA20_POLY1305_SHA256));
        assert!(!suites.contains(&CipherSuite::TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256));
    }

    #[test]
    fn test_missing_certificate_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = server_config(&dir.path().join("cert.pem"), &dir.path().join("key.pem"))
            .unwrap_err();
        assert!(matches!(err, TlsError::Certificates { .. }));
    }

    #[test]
    fn test_empty_certificate_file() {
        let dir = tempfile::tempdir().unwrap();
        let cert = dir.path().join("cert.pem");
        std::fs::write(&cert, "").unwrap();

        let err = server_config(&cert, &dir.path().join("key.pem")).unwrap_err();
        assert!(matches!(err, TlsError::NoCertificates(_)));
    }
}
