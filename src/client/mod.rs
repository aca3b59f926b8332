pub mod runner;

use crate::TunsinkError;
use std::io::Read;

pub use runner::{exit_status, run_client};

/// Bytes requested from the device per read.
pub const PACKET_BUFFER_SIZE: usize = 2048;

/// Fixed receive buffer reused by every read. Only the prefix filled by the
/// latest read is ever handed out.
pub struct PacketBuffer {
    data: [u8; PACKET_BUFFER_SIZE],
}

impl PacketBuffer {
    /// Zero-filled, allocated once per loop.
    pub fn new() -> Self {
        Self { data: [0; PACKET_BUFFER_SIZE] }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    fn filled(&self, len: usize) -> &[u8] {
        &self.data[..len]
    }
}

impl Default for PacketBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Receives every packet read from the device, valid for that iteration only.
///
/// Forwarding (encryption, transport to a peer) would hook in here.
pub trait PacketSink {
    fn accept(&mut self, packet: &[u8]);
}

/// Drops packets once they have been counted.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink;

impl PacketSink for DiscardSink {
    fn accept(&mut self, _packet: &[u8]) {}
}

impl<F: FnMut(&[u8])> PacketSink for F {
    fn accept(&mut self, packet: &[u8]) {
        self(packet)
    }
}

/// Why and after how much traffic the loop stopped.
#[derive(Debug)]
pub struct IngestReport {
    pub packets: u64,
    pub bytes: u64,
    /// Always `TunsinkError::Read`.
    pub error: TunsinkError,
}

/// Blocking read loop over a bound device.
///
/// Runs until the first read error; zero-length reads are reported like any
/// other. The device is owned by the loop and closed when `run` returns.
pub struct IngestLoop<R, S = DiscardSink> {
    device: R,
    sink: S,
    buffer: PacketBuffer,
}

impl<R: Read> IngestLoop<R> {
    pub fn new(device: R) -> Self {
        Self::with_sink(device, DiscardSink)
    }
}

impl<R: Read, S: PacketSink> IngestLoop<R, S> {
    /// Loop that hands each packet to `sink` after it has been counted.
    pub fn with_sink(device: R, sink: S) -> Self {
        Self { device, sink, buffer: PacketBuffer::new() }
    }

    /// Reads into the packet buffer until the device returns an error.
    ///
    /// Each read logs its length and passes exactly the bytes read to the
    /// sink. The error ends the loop and is returned in the report; the
    /// device is dropped (closed) on the way out.
    pub fn run(mut self) -> IngestReport {
        let mut packets = 0u64;
        let mut bytes = 0u64;

        loop {
            let n = match self.device.read(&mut self.buffer.data) {
                Ok(n) => n,
                Err(e) => {
                    log::error!("Reading from TUN device: {}", e);
                    return IngestReport { packets, bytes, error: TunsinkError::Read(e) };
                }
            };
            debug_assert!(n <= self.buffer.capacity());

            packets += 1;
            bytes += n as u64;
            log::info!("Received {} bytes from TUN", n);
            self.sink.accept(self.buffer.filled(n));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::io;
    use std::rc::Rc;

    /// Replays a fixed sequence of read results, then fails.
    struct ScriptedDevice {
        script: VecDeque<io::Result<Vec<u8>>>,
        requested: Rc<Cell<usize>>,
        closed: Rc<Cell<usize>>,
    }

    impl ScriptedDevice {
        fn new(script: Vec<io::Result<Vec<u8>>>) -> Self {
            Self {
                script: script.into(),
                requested: Rc::default(),
                closed: Rc::default(),
            }
        }
    }

    impl Read for ScriptedDevice {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.requested.set(buf.len());
            match self.script.pop_front() {
                Some(Ok(packet)) => {
                    buf[..packet.len()].copy_from_slice(&packet);
                    Ok(packet.len())
                }
                Some(Err(e)) => Err(e),
                None => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted")),
            }
        }
    }

    impl Drop for ScriptedDevice {
        fn drop(&mut self) {
            self.closed.set(self.closed.get() + 1);
        }
    }

    fn device_gone() -> io::Error {
        io::Error::from_raw_os_error(libc::EIO)
    }

    #[test]
    fn zero_length_read_does_not_stop_the_loop() {
        let device = ScriptedDevice::new(vec![
            Ok(vec![0x45; 64]),
            Ok(vec![]),
            Ok(vec![0x60; 128]),
            Err(device_gone()),
        ]);
        let closed = device.closed.clone();

        let mut seen = Vec::new();
        let report = IngestLoop::with_sink(device, |p: &[u8]| seen.push(p.len())).run();

        assert_eq!(seen, vec![64, 0, 128]);
        assert_eq!(report.packets, 3);
        assert_eq!(report.bytes, 192);
        match report.error {
            TunsinkError::Read(e) => assert_eq!(e.raw_os_error(), Some(libc::EIO)),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(closed.get(), 1);
    }

    #[test]
    fn stale_tail_is_never_handed_out() {
        let device = ScriptedDevice::new(vec![Ok(vec![0xAA; 1500]), Ok(vec![0xBB; 20])]);

        let mut packets: Vec<Vec<u8>> = Vec::new();
        let report = IngestLoop::with_sink(device, |p: &[u8]| packets.push(p.to_vec())).run();

        assert_eq!(report.packets, 2);
        assert_eq!(packets[1], vec![0xBB; 20]);
    }

    #[test]
    fn reads_request_the_full_buffer() {
        let device = ScriptedDevice::new(vec![Ok(vec![1; PACKET_BUFFER_SIZE])]);
        let requested = device.requested.clone();

        let mut lens = Vec::new();
        IngestLoop::with_sink(device, |p: &[u8]| lens.push(p.len())).run();

        assert_eq!(requested.get(), PACKET_BUFFER_SIZE);
        assert_eq!(lens, vec![PACKET_BUFFER_SIZE]);
        assert!(lens.iter().all(|&n| n <= PACKET_BUFFER_SIZE));
    }

    #[test]
    fn interrupted_read_is_terminal() {
        let device = ScriptedDevice::new(vec![
            Err(io::Error::from(io::ErrorKind::Interrupted)),
            Ok(vec![0x45; 40]),
        ]);

        let report = IngestLoop::new(device).run();

        assert_eq!(report.packets, 0);
        assert!(matches!(report.error, TunsinkError::Read(ref e) if e.kind() == io::ErrorKind::Interrupted));
    }

    #[test]
    fn first_read_error_closes_device() {
        let device = ScriptedDevice::new(vec![Err(device_gone())]);
        let closed = device.closed.clone();

        let report = IngestLoop::new(device).run();

        assert_eq!(report.packets, 0);
        assert_eq!(report.bytes, 0);
        assert_eq!(closed.get(), 1);
        assert!(report.error.to_string().starts_with("Reading from TUN device"));
    }
}
