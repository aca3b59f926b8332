use super::ifreq::{IfReq, TUNSETIFF};
use super::TUN_CONTROL_PATH;
use crate::{Result, TunsinkError};
use std::fs::{File, OpenOptions};
use std::io::{self, Read};
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::{Path, PathBuf};

/// The two kernel operations device acquisition is built from.
pub trait TunBackend {
    type Node: Read;

    fn control_path(&self) -> &Path;

    /// Opens the control node read/write.
    fn open_control(&self) -> io::Result<Self::Node>;

    /// Issues `TUNSETIFF`. On success the kernel may have rewritten the name
    /// in `req`.
    fn set_interface(&self, node: &Self::Node, req: &mut IfReq) -> io::Result<()>;
}

/// `/dev/net/tun` + `ioctl(2)`.
#[derive(Debug, Clone)]
pub struct KernelBackend {
    control_path: PathBuf,
}

impl KernelBackend {
    /// Backend that opens `path` instead of `/dev/net/tun`.
    pub fn with_control_path(path: impl Into<PathBuf>) -> Self {
        Self { control_path: path.into() }
    }
}

impl Default for KernelBackend {
    fn default() -> Self {
        Self::with_control_path(TUN_CONTROL_PATH)
    }
}

impl TunBackend for KernelBackend {
    type Node = File;

    fn control_path(&self) -> &Path {
        &self.control_path
    }

    fn open_control(&self) -> io::Result<File> {
        OpenOptions::new().read(true).write(true).open(&self.control_path)
    }

    fn set_interface(&self, node: &File, req: &mut IfReq) -> io::Result<()> {
        // SAFETY: req is a live, properly sized ifreq for the whole call.
        let rc = unsafe { libc::ioctl(node.as_raw_fd(), TUNSETIFF as _, req as *mut IfReq) };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

/// A bound tun interface. Reading yields one raw IP packet per call.
///
/// The underlying node is closed when the device is dropped, on every exit
/// path of its owner.
#[derive(Debug)]
pub struct TunDevice<N = File> {
    node: N,
    name: String,
}

impl TunDevice<File> {
    /// Creates (or attaches to) `name` through `/dev/net/tun`.
    pub fn create(name: &str) -> Result<Self> {
        provision(&KernelBackend::default(), name)
    }
}

impl<N> TunDevice<N> {
    /// Interface name as reported by the kernel.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<N: Read> Read for TunDevice<N> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.node.read(buf)
    }
}

impl AsRawFd for TunDevice<File> {
    fn as_raw_fd(&self) -> RawFd {
        self.node.as_raw_fd()
    }
}

impl<N> Drop for TunDevice<N> {
    fn drop(&mut self) {
        log::debug!("Closing TUN device {}", self.name);
    }
}

/// Opens the control node and binds a tun interface called `name` to it.
///
/// No retry on either step. If the bind is rejected the node is closed
/// before the error is returned.
pub fn provision<B: TunBackend>(backend: &B, name: &str) -> Result<TunDevice<B::Node>> {
    let node = backend.open_control().map_err(|source| TunsinkError::DeviceOpen {
        path: backend.control_path().to_path_buf(),
        source,
    })?;

    let mut req = IfReq::new_tun(name);
    if let Err(source) = backend.set_interface(&node, &mut req) {
        drop(node);
        return Err(TunsinkError::DeviceBind { name: name.to_string(), source });
    }

    let device = TunDevice { node, name: req.name() };
    log::info!("TUN device {} created", device.name);
    Ok(device)
}
