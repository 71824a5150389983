//! SFTP Deployer
//!
//! Uploads the staging tree over SSH. Files whose remote size and mtime
//! already match are skipped, so repeated pushes only send changes.

use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::net::TcpStream;
use std::path::Path;
use std::time::Duration;

use ssh2::{FileStat, Session, Sftp};
use tracing::{debug, info};

use super::mirror::{mirror_tree, remote_path, resolve_server, FileStamp, RemoteSession};
use crate::config::DeployerSettings;
use crate::domain::ports::{DeployError, Deployer, ProgressReporter, TransferResult};
use crate::domain::value_objects::CancellationToken;

pub const SFTP_ALIAS: &str = "sftp";
const DEFAULT_PORT: u16 = 22;

#[derive(Debug, Clone, Copy, Default)]
pub struct SftpDeployer;

impl SftpDeployer {
    pub fn new() -> Self {
        Self
    }

    fn open(settings: &DeployerSettings) -> Result<Session, DeployError> {
        let (addr, _) = resolve_server(&settings.server, DEFAULT_PORT)?;
        let timeout = Duration::from_secs(settings.timeout_secs.max(1));
        let connection = |message: String| DeployError::Connection {
            server: settings.server.clone(),
            message,
        };

        let tcp = TcpStream::connect_timeout(&addr, timeout).map_err(|e| connection(e.to_string()))?;
        let mut session = Session::new().map_err(|e| connection(e.to_string()))?;
        session.set_tcp_stream(tcp);
        session.set_timeout(u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX));
        session.handshake().map_err(|e| connection(e.to_string()))?;

        let auth = match &settings.private_key {
            Some(key) => session.userauth_pubkey_file(
                &settings.username,
                None,
                key,
                settings.passphrase.as_deref(),
            ),
            None => session.userauth_password(&settings.username, &settings.password),
        };
        auth.map_err(|e| DeployError::Authentication {
            server: settings.server.clone(),
            username: settings.username.clone(),
            message: e.to_string(),
        })?;

        if !session.authenticated() {
            return Err(DeployError::NotConnected {
                server: settings.server.clone(),
            });
        }
        Ok(session)
    }
}

impl Deployer for SftpDeployer {
    fn name(&self) -> &'static str {
        "SFTP"
    }

    fn alias(&self) -> &'static str {
        SFTP_ALIAS
    }

    fn validate(&self, settings: &DeployerSettings) -> Result<(), DeployError> {
        let missing = |setting| DeployError::MissingSetting {
            deployer: SFTP_ALIAS,
            setting,
        };
        if settings.server.trim().is_empty() {
            return Err(missing("server"));
        }
        if settings.username.trim().is_empty() {
            return Err(missing("username"));
        }
        if settings.password.is_empty() && settings.private_key.is_none() {
            return Err(missing("password"));
        }
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
        let session = Self::open(settings)?;

        let outcome = session
            .sftp()
            .map_err(|e| DeployError::Connection {
                server: settings.server.clone(),
                message: e.to_string(),
            })
            .and_then(|sftp| {
                let mut remote = SftpSession { sftp };
                mirror_tree(&mut remote, source, settings.folder.trim(), reporter, cancel)
            });

        if let Err(e) = session.disconnect(None, "publish complete", None) {
            debug!(error = %e, "ssh disconnect failed");
        }

        if let Ok(count) = &outcome {
            info!(server = %settings.server, files = count, "sftp upload complete");
        }
        outcome
    }
}

struct SftpSession {
    sftp: Sftp,
}

impl RemoteSession for SftpSession {
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
            // usually "already exists"
            if let Err(e) = self.sftp.mkdir(Path::new(&current), 0o755) {
                debug!(dir = %current, error = %e, "mkdir ignored");
            }
        }
        Ok(())
    }

    fn list_files(&mut self, dir: &str) -> Result<Option<HashMap<String, FileStamp>>, DeployError> {
        let dir = if dir.is_empty() { "." } else { dir };
        let entries = match self.sftp.readdir(Path::new(dir)) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir, error = %e, "remote listing failed, uploading everything");
                return Ok(None);
            }
        };

        let listing = entries
            .into_iter()
            .filter(|(_, stat)| stat.is_file())
            .filter_map(|(path, stat)| {
                let name = path.file_name()?.to_string_lossy().into_owned();
                let stamp = FileStamp {
                    size: stat.size?,
                    modified: stat.mtime,
                };
                Some((name, stamp))
            })
            .collect();
        Ok(Some(listing))
    }

    fn upload(&mut self, local: &Path, remote: &str, stamp: &FileStamp) -> Result<(), DeployError> {
        let mut source = File::open(local).map_err(|e| DeployError::io(local, e))?;
        let target = Path::new(remote);

        let mut file = self
            .sftp
            .create(target)
            .map_err(|e| DeployError::remote(remote, e))?;
        io::copy(&mut source, &mut file).map_err(|e| DeployError::remote(remote, e))?;
        drop(file);

        if let Some(mtime) = stamp.modified {
            let times = FileStat {
                size: None,
                uid: None,
                gid: None,
                perm: None,
                atime: Some(mtime),
                mtime: Some(mtime),
            };
            if let Err(e) = self.sftp.setstat(target, times) {
                debug!(remote, error = %e, "could not set remote mtime");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::NoopReporter;
    use tempfile::tempdir;

    #[test]
    fn requires_credentials() {
        let settings = DeployerSettings::new("sftp").with_server("example.com");
        let mut with_user = settings.clone();
        with_user.username = "deploy".to_string();

        assert!(matches!(
            SftpDeployer.validate(&settings),
            Err(DeployError::MissingSetting {
                setting: "username",
                ..
            })
        ));
        assert!(matches!(
            SftpDeployer.validate(&with_user),
            Err(DeployError::MissingSetting {
                setting: "password",
                ..
            })
        ));
        assert!(SftpDeployer
            .validate(&with_user.with_private_key("/home/deploy/.ssh/id_ed25519"))
            .is_ok());
    }

    #[test]
    fn unreachable_server_is_connection_error() {
        let staging = tempdir().unwrap();
        std::fs::write(staging.path().join("a.txt"), "a").unwrap();
        let mut settings = DeployerSettings::new("sftp")
            .with_server("127.0.0.1:1")
            .with_credentials("deploy", "secret")
            .with_folder("/var/www");
        settings.timeout_secs = 2;

        let result = SftpDeployer.deploy(
            staging.path(),
            &settings,
            &NoopReporter,
            &CancellationToken::new(),
        );

        assert!(matches!(result, Err(DeployError::Connection { .. })));
    }
}
