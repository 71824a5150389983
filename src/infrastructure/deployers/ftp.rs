//! FTP Deployer
//!
//! Explicit FTPS (AUTH TLS) upload of the staging tree. Every remote
//! directory is checked and created when missing before its files are
//! uploaded. The control connection is always closed with QUIT.

use std::fs::File;
use std::path::Path;
use std::time::Duration;

use suppaftp::native_tls::{Protocol, TlsConnector};
use suppaftp::types::FileType;
use suppaftp::{NativeTlsConnector, NativeTlsFtpStream};
use tracing::{debug, info, warn};

use super::mirror::{mirror_tree, remote_path, resolve_server, FileStamp, RemoteSession};
use crate::config::{CertificatePolicy, DeployerSettings, TlsVersion};
use crate::domain::ports::{DeployError, Deployer, ProgressReporter, TransferResult};
use crate::domain::value_objects::CancellationToken;

pub const FTP_ALIAS: &str = "ftp";
const DEFAULT_PORT: u16 = 21;

#[derive(Debug, Clone, Copy, Default)]
pub struct FtpDeployer;

impl FtpDeployer {
    pub fn new() -> Self {
        Self
    }

    fn connector(settings: &DeployerSettings) -> Result<NativeTlsConnector, DeployError> {
        let protocol = match settings.min_tls {
            TlsVersion::Tls10 => Protocol::Tlsv10,
            TlsVersion::Tls11 => Protocol::Tlsv11,
            TlsVersion::Tls12 => Protocol::Tlsv12,
        };

        let mut builder = TlsConnector::builder();
        builder.min_protocol_version(Some(protocol));
        if settings.certificate_policy == CertificatePolicy::AcceptAny {
            warn!(
                server = %settings.server,
                "certificate validation disabled (certificate_policy = accept-any)"
            );
            builder
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true);
        }

        builder
            .build()
            .map(NativeTlsConnector::from)
            .map_err(|e| DeployError::InvalidSetting {
                setting: "min_tls",
                message: e.to_string(),
            })
    }

    fn open(settings: &DeployerSettings) -> Result<NativeTlsFtpStream, DeployError> {
        let (addr, host) = resolve_server(&settings.server, DEFAULT_PORT)?;
        let timeout = Duration::from_secs(settings.timeout_secs.max(1));
        let connection = |e: suppaftp::FtpError| DeployError::Connection {
            server: settings.server.clone(),
            message: e.to_string(),
        };

        let stream = NativeTlsFtpStream::connect_timeout(addr, timeout).map_err(connection)?;
        let connector = Self::connector(settings)?;
        stream.into_secure(connector, &host).map_err(connection)
    }

    fn transfer(
        stream: &mut NativeTlsFtpStream,
        source: &Path,
        settings: &DeployerSettings,
        reporter: &dyn ProgressReporter,
        cancel: &CancellationToken,
    ) -> TransferResult {
        stream
            .login(&settings.username, &settings.password)
            .map_err(|e| DeployError::Authentication {
                server: settings.server.clone(),
                username: settings.username.clone(),
                message: e.to_string(),
            })?;
        stream
            .transfer_type(FileType::Binary)
            .map_err(|e| DeployError::remote("", e))?;

        // cwd moves during directory checks; relative roots are taken from
        // the login directory
        let root = settings.folder.trim();
        let root = if root.starts_with('/') {
            root.to_string()
        } else {
            let home = stream.pwd().map_err(|e| DeployError::remote(root, e))?;
            remote_path(&home, root)
        };

        let mut session = FtpSession { stream };
        mirror_tree(&mut session, source, &root, reporter, cancel)
    }
}

impl Deployer for FtpDeployer {
    fn name(&self) -> &'static str {
        "FTP"
    }

    fn alias(&self) -> &'static str {
        FTP_ALIAS
    }

    fn validate(&self, settings: &DeployerSettings) -> Result<(), DeployError> {
        require(settings.server.as_str(), "server")?;
        require(settings.username.as_str(), "username")?;
        Ok(())
    }

    fn deploy(
        &self,
        source: &Path,
        settings: &DeployerSettings,
        reporter: &dyn ProgressReporter,
        cancel: &CancellationToken,
    ) -> TransferResult {
        self.validate(settings)?;
        let mut stream = Self::open(settings)?;

        let outcome = Self::transfer(&mut stream, source, settings, reporter, cancel);
        if let Err(e) = stream.quit() {
            debug!(error = %e, "ftp quit failed");
        }

        if let Ok(count) = &outcome {
            info!(server = %settings.server, files = count, "ftp upload complete");
        }
        outcome
    }
}

fn require(value: &str, setting: &'static str) -> Result<(), DeployError> {
    if value.trim().is_empty() {
        return Err(DeployError::MissingSetting {
            deployer: FTP_ALIAS,
            setting,
        });
    }
    Ok(())
}

struct FtpSession<'a> {
    stream: &'a mut NativeTlsFtpStream,
}

impl RemoteSession for FtpSession<'_> {
    fn ensure_dir(&mut self, path: &str) -> Result<(), DeployError> {
        let mut current = String::new();
        for segment in path.split('/') {
            if segment.is_empty() {
                if current.is_empty() {
                    current.push('/');
                }
                continue;
            }
            current = remote_path(&current, segment);
            if self.stream.cwd(&current).is_err() {
                debug!(dir = %current, "creating remote directory");
                self.stream
                    .mkdir(&current)
                    .map_err(|e| DeployError::remote(&current, e))?;
            }
        }
        Ok(())
    }

    fn upload(&mut self, local: &Path, remote: &str, _stamp: &FileStamp) -> Result<(), DeployError> {
        let mut file = File::open(local).map_err(|e| DeployError::io(local, e))?;
        self.stream
            .put_file(remote, &mut file)
            .map_err(|e| DeployError::remote(remote, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::NoopReporter;
    use tempfile::tempdir;

    #[test]
    fn requires_server_and_username() {
        let err = FtpDeployer
            .validate(&DeployerSettings::new("ftp"))
            .unwrap_err();
        assert!(matches!(
            err,
            DeployError::MissingSetting {
                setting: "server",
                ..
            }
        ));

        let err = FtpDeployer
            .validate(&DeployerSettings::new("ftp").with_server("ftp.example.com"))
            .unwrap_err();
        assert!(matches!(
            err,
            DeployError::MissingSetting {
                setting: "username",
                ..
            }
        ));
    }

    #[test]
    fn unreachable_server_is_connection_error() {
        let staging = tempdir().unwrap();
        std::fs::write(staging.path().join("a.txt"), "a").unwrap();
        let mut settings = DeployerSettings::new("ftp")
            .with_server("127.0.0.1:1")
            .with_credentials("deploy", "secret")
            .with_folder("/www");
        settings.timeout_secs = 2;

        let result = FtpDeployer.deploy(
            staging.path(),
            &settings,
            &NoopReporter,
            &CancellationToken::new(),
        );

        assert!(matches!(result, Err(DeployError::Connection { .. })));
    }
}
