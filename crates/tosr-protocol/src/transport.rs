//! Byte transport to the relay board.
//!
//! The protocol layer never opens or configures the serial line. It is
//! handed something that moves bytes, with baud rate and read timeout
//! already set by whoever opened it.

use std::io::{self, Read, Write};

/// A blocking, half-duplex byte channel.
pub trait Transport {
    /// Write `bytes`, returning how many were accepted.
    fn send(&mut self, bytes: &[u8]) -> io::Result<usize>;

    /// Fill `buf`, returning how many bytes arrived before the read timed out.
    fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Throw away input already waiting on the channel, returning how many
    /// bytes were dropped.
    fn discard_input(&mut self) -> io::Result<usize>;
}

/// Upper bound on bytes dropped by one `discard_input`.
pub const MAX_DISCARD: usize = 64;

/// Any blocking stream works as a transport: a serial port handle, a TCP
/// socket to a board server, or an in-memory double.
///
/// A read timeout or end of stream ends `receive` with the bytes gathered so
/// far. Other errors propagate unless some bytes already arrived.
///
/// `discard_input` reads until the stream times out, so on a serial port it
/// costs one read timeout. Wrap the port in a type implementing `Transport`
/// directly to flush the driver queue instead.
impl<T: Read + Write + ?Sized> Transport for T {
    fn send(&mut self, bytes: &[u8]) -> io::Result<usize> {
        let written = loop {
            match self.write(bytes) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        self.flush()?;
        Ok(written)
    }

    fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e)
                    if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) =>
                {
                    log::trace!("read timed out after {} of {} bytes", filled, buf.len());
                    break;
                }
                Err(e) if filled > 0 => {
                    log::debug!("read stopped after {} bytes: {}", filled, e);
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }

    fn discard_input(&mut self) -> io::Result<usize> {
        let mut scratch = [0u8; 16];
        let mut dropped = 0;
        while dropped < MAX_DISCARD {
            match self.read(&mut scratch) {
                Ok(0) => break,
                Ok(n) => dropped += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e)
                    if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) =>
                {
                    break
                }
                Err(e) => return Err(e),
            }
        }
        if dropped > 0 {
            log::debug!("discarded {} stale input bytes", dropped);
        }
        Ok(dropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Stream that hands out scripted read results, one per call.
    struct Scripted {
        reads: VecDeque<io::Result<Vec<u8>>>,
        /// Errors returned by the next writes, before any data is accepted.
        write_errors: VecDeque<io::Error>,
        written: Vec<u8>,
    }

    impl Scripted {
        fn new(reads: Vec<io::Result<Vec<u8>>>) -> Self {
            Scripted {
                reads: reads.into(),
                write_errors: VecDeque::new(),
                written: Vec::new(),
            }
        }
    }

    impl Read for Scripted {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.reads.pop_front() {
                Some(Ok(data)) => {
                    buf[..data.len()].copy_from_slice(&data);
                    Ok(data.len())
                }
                Some(Err(e)) => Err(e),
                None => Ok(0),
            }
        }
    }

    impl Write for Scripted {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if let Some(e) = self.write_errors.pop_front() {
                return Err(e);
            }
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn timeout() -> io::Error {
        io::Error::new(io::ErrorKind::TimedOut, "timeout")
    }

    #[test]
    fn test_send_passes_through() {
        let mut stream = Scripted::new(vec![]);
        assert_eq!(stream.send(b"Z").unwrap(), 1);
        assert_eq!(stream.written, b"Z");
    }

    #[test]
    fn test_send_retries_interrupted() {
        let mut stream = Scripted::new(vec![]);
        stream
            .write_errors
            .push_back(io::Error::new(io::ErrorKind::Interrupted, "signal"));
        assert_eq!(stream.send(b"e").unwrap(), 1);
        assert_eq!(stream.written, b"e");
    }

    #[test]
    fn test_send_propagates_hard_error() {
        let mut stream = Scripted::new(vec![]);
        stream
            .write_errors
            .push_back(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
        let err = stream.send(b"e").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(stream.written.is_empty());
    }

    #[test]
    fn test_receive_gathers_split_reads() {
        let mut stream = Scripted::new(vec![Ok(vec![3]), Ok(vec![12])]);
        let mut buf = [0u8; 2];
        assert_eq!(stream.receive(&mut buf).unwrap(), 2);
        assert_eq!(buf, [3, 12]);
    }

    #[test]
    fn test_receive_timeout_returns_partial() {
        let mut stream = Scripted::new(vec![Ok(vec![3]), Err(timeout())]);
        let mut buf = [0u8; 2];
        assert_eq!(stream.receive(&mut buf).unwrap(), 1);

        let mut stream = Scripted::new(vec![Err(timeout())]);
        assert_eq!(stream.receive(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_receive_retries_interrupted() {
        let interrupted = io::Error::new(io::ErrorKind::Interrupted, "signal");
        let mut stream = Scripted::new(vec![Err(interrupted), Ok(vec![7])]);
        let mut buf = [0u8; 1];
        assert_eq!(stream.receive(&mut buf).unwrap(), 1);
        assert_eq!(buf, [7]);
    }

    #[test]
    fn test_receive_propagates_hard_error() {
        let broken = io::Error::new(io::ErrorKind::BrokenPipe, "gone");
        let mut stream = Scripted::new(vec![Err(broken)]);
        let mut buf = [0u8; 1];
        let err = stream.receive(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_discard_input_drains_until_timeout() {
        let mut stream = Scripted::new(vec![Ok(vec![0x05]), Ok(vec![15, 3]), Err(timeout())]);
        assert_eq!(stream.discard_input().unwrap(), 3);
        assert!(stream.reads.is_empty());

        let mut stream = Scripted::new(vec![Err(timeout()), Ok(vec![9])]);
        assert_eq!(stream.discard_input().unwrap(), 0);
        assert_eq!(stream.reads.len(), 1);
    }

    #[test]
    fn test_discard_input_is_bounded() {
        let chatter = (0..20).map(|_| Ok(vec![0xAA; 16])).collect();
        let mut stream = Scripted::new(chatter);
        assert_eq!(stream.discard_input().unwrap(), MAX_DISCARD);
    }
}
