//! Remote upload over SSH.
//!
//! One authenticated session per transfer: connect, handshake,
//! password auth, SCP the file, done. The session and its TCP stream
//! are dropped (and thus closed) on both success and failure paths.
//! Unknown host keys are accepted; there is no known_hosts lookup.

use crate::Result;

use anyhow::{Context, bail};
use ssh2::Session;
use std::fs;
use std::io::Write;
use std::net::TcpStream;
use std::path::Path;

/// Connection settings for the remote host, supplied by the caller.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

/// Copy one local file to one remote path, overwriting it.
pub fn ship(config: &RemoteConfig, local: &Path, remote: &str) -> Result<()> {
    let data =
        fs::read(local).with_context(|| format!("read local file {}", local.display()))?;

    let tcp = TcpStream::connect((config.host.as_str(), config.port))
        .with_context(|| format!("connect to {}:{}", config.host, config.port))?;

    let mut session = Session::new().context("create ssh session")?;
    session.set_tcp_stream(tcp);
    session
        .handshake()
        .with_context(|| format!("ssh handshake with {}", config.host))?;

    session
        .userauth_password(&config.user, &config.password)
        .with_context(|| format!("authenticate as {}@{}", config.user, config.host))?;
    if !session.authenticated() {
        bail!("authentication rejected for {}@{}", config.user, config.host);
    }

    let mut channel = session
        .scp_send(Path::new(remote), 0o644, data.len() as u64, None)
        .with_context(|| format!("open scp channel for {}", remote))?;
    channel
        .write_all(&data)
        .with_context(|| format!("send {} bytes to {}", data.len(), remote))?;

    channel.send_eof()?;
    channel.wait_eof()?;
    channel.close()?;
    channel.wait_close()?;

    Ok(())
}
