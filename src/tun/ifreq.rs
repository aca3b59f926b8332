use super::IFNAMSIZ;

pub const IFF_TUN: libc::c_short = 0x0001;
pub const IFF_NO_PI: libc::c_short = 0x1000;

/// `_IOW('T', 202, int)`. The write direction bit differs per architecture.
#[cfg(not(any(
    target_arch = "mips",
    target_arch = "mips64",
    target_arch = "powerpc",
    target_arch = "powerpc64",
    target_arch = "sparc",
    target_arch = "sparc64"
)))]
pub const TUNSETIFF: libc::c_ulong = 0x4004_54ca;

#[cfg(any(
    target_arch = "mips",
    target_arch = "mips64",
    target_arch = "powerpc",
    target_arch = "powerpc64",
    target_arch = "sparc",
    target_arch = "sparc64"
))]
pub const TUNSETIFF: libc::c_ulong = 0x8004_54ca;

/// Interface request passed to `TUNSETIFF`.
///
/// Only the name and flags members of the kernel's `struct ifreq` are used;
/// the padding keeps the size at the full 40 bytes the kernel copies in.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct IfReq {
    name: [u8; IFNAMSIZ],
    flags: libc::c_short,
    _pad: [u8; 22],
}

impl IfReq {
    /// Tun mode, no packet information header. The name is truncated to
    /// `IFNAMSIZ - 1` bytes so the terminating NUL always survives.
    pub fn new_tun(name: &str) -> Self {
        let mut req = Self {
            name: [0; IFNAMSIZ],
            flags: IFF_TUN | IFF_NO_PI,
            _pad: [0; 22],
        };
        let bytes = name.as_bytes();
        let len = bytes.len().min(IFNAMSIZ - 1);
        req.name[..len].copy_from_slice(&bytes[..len]);
        req
    }

    /// Mode flags sent to the kernel.
    pub fn flags(&self) -> libc::c_short {
        self.flags
    }

    /// Name as currently held in the descriptor, up to the first NUL.
    /// After a successful `TUNSETIFF` this is the name the kernel assigned.
    pub fn name(&self) -> String {
        let end = self.name.iter().position(|&b| b == 0).unwrap_or(IFNAMSIZ);
        String::from_utf8_lossy(&self.name[..end]).into_owned()
    }

    /// Overwrites the name field, as the kernel does on return.
    pub fn set_name(&mut self, name: &str) {
        *self = Self { flags: self.flags, ..Self::new_tun(name) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_kernel_ifreq() {
        assert_eq!(std::mem::size_of::<IfReq>(), 40);
    }

    #[test]
    #[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
    fn tunsetiff_encoding() {
        assert_eq!(TUNSETIFF, 0x4004_54ca);
    }

    #[test]
    fn tun_flags_without_packet_info() {
        let req = IfReq::new_tun("tun0");
        assert_eq!(req.flags(), 0x1001);
        assert_eq!(req.name(), "tun0");
    }

    #[test]
    fn long_name_is_truncated_and_terminated() {
        let req = IfReq::new_tun("a-very-long-interface-name");
        assert_eq!(req.name(), "a-very-long-int");
        assert_eq!(req.name().len(), IFNAMSIZ - 1);
    }

    #[test]
    fn set_name_keeps_flags() {
        let mut req = IfReq::new_tun("tun%d");
        req.set_name("tun3");
        assert_eq!(req.name(), "tun3");
        assert_eq!(req.flags(), IFF_TUN | IFF_NO_PI);
    }
}
