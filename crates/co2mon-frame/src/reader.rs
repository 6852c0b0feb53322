use std::io::{ErrorKind, Read};

use tracing::trace;

use crate::codec::{decode, RawFrame, Record, FRAME_SIZE};
use crate::error::{FrameError, Result};

/// Reads fixed-size frames from any `Read` stream.
///
/// Handles partial reads internally; callers always get complete frames.
#[derive(Debug)]
pub struct FrameReader<T> {
    inner: T,
    frames_read: u64,
}

impl<T: Read> FrameReader<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            frames_read: 0,
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached, with
    /// the number of bytes of the incomplete frame.
    pub fn read_frame(&mut self) -> Result<RawFrame> {
        self.fill_frame()
    }

    /// Read and decode the next frame.
    pub fn read_record(&mut self) -> Result<Record> {
        let frame = self.fill_frame()?;
        decode(&frame)
    }

    fn fill_frame(&mut self) -> Result<RawFrame> {
        let mut frame = [0u8; FRAME_SIZE];
        let mut filled = 0usize;

        while filled < FRAME_SIZE {
            match self.inner.read(&mut frame[filled..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed { received: filled }),
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.frames_read = self.frames_read.saturating_add(1);
        trace!(frame = ?frame, seq = self.frames_read, "read frame");
        Ok(frame)
    }

    /// Number of complete frames read so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read> crate::source::FrameSource for FrameReader<T> {
    /// Recorded captures need no session key.
    fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    fn read_frame(&mut self) -> Result<RawFrame> {
        self.fill_frame()
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use super::*;
    use crate::codec::{obfuscate, Record};

    const CO2_PLAIN: RawFrame = [0x50, 0x01, 0x94, 0xe5, 0x0d, 0x00, 0x00, 0x00];

    fn wire(records: &[Record]) -> Vec<u8> {
        records
            .iter()
            .flat_map(|r| obfuscate(&r.to_plaintext()))
            .collect()
    }

    #[test]
    fn read_single_frame() {
        let mut reader = FrameReader::new(Cursor::new(CO2_PLAIN.to_vec()));
        assert_eq!(reader.read_frame().unwrap(), CO2_PLAIN);
        assert_eq!(reader.frames_read(), 1);
    }

    #[test]
    fn read_multiple_records() {
        let records = [
            Record { operation: b'P', value: 612 },
            Record { operation: b'B', value: 4711 },
            Record { operation: b'A', value: 3876 },
        ];
        let mut reader = FrameReader::new(Cursor::new(wire(&records)));

        for expected in records {
            assert_eq!(reader.read_record().unwrap(), expected);
        }
        assert!(matches!(
            reader.read_frame(),
            Err(FrameError::ConnectionClosed { received: 0 })
        ));
    }

    #[test]
    fn partial_read_handling() {
        let byte_reader = ByteByByteReader {
            bytes: CO2_PLAIN.to_vec(),
            pos: 0,
        };
        let mut reader = FrameReader::new(byte_reader);
        assert_eq!(reader.read_frame().unwrap(), CO2_PLAIN);
    }

    #[test]
    fn connection_closed_cleanly() {
        let mut reader = FrameReader::new(Cursor::new(Vec::<u8>::new()));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed { received: 0 }));
    }

    #[test]
    fn connection_closed_mid_frame() {
        let mut reader = FrameReader::new(Cursor::new(CO2_PLAIN[..5].to_vec()));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed { received: 5 }));
        assert_eq!(reader.frames_read(), 0);
    }

    #[test]
    fn garbage_frame_is_checksum_error() {
        let mut reader = FrameReader::new(Cursor::new(vec![0xff; FRAME_SIZE]));
        let err = reader.read_record().unwrap_err();
        assert!(matches!(err, FrameError::Checksum { .. }));
    }

    #[test]
    fn interrupted_read_retries() {
        let reader = InterruptedThenData {
            interrupted: false,
            inner: Cursor::new(CO2_PLAIN.to_vec()),
        };
        let mut framed = FrameReader::new(reader);
        assert_eq!(framed.read_frame().unwrap(), CO2_PLAIN);
    }

    #[test]
    fn read_would_block_propagates_io_error() {
        let reader = WouldBlockReader;
        let mut framed = FrameReader::new(reader);
        let err = framed.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::WouldBlock));
    }

    #[test]
    fn frames_over_socket_pair() {
        let (mut left, right) = std::os::unix::net::UnixStream::pair().unwrap();
        let mut reader = FrameReader::new(right);

        let writer = std::thread::spawn(move || {
            for value in 400..432u16 {
                let frame = obfuscate(&Record { operation: b'P', value }.to_plaintext());
                left.write_all(&frame).unwrap();
            }
        });

        for value in 400..432u16 {
            let record = reader.read_record().unwrap();
            assert_eq!(record, Record { operation: b'P', value });
        }
        writer.join().unwrap();
    }

    #[test]
    fn accessors_and_into_inner() {
        let mut reader = FrameReader::new(Cursor::new(Vec::<u8>::new()));
        let _ = reader.get_ref();
        let _ = reader.get_mut();
        assert!(format!("{reader:?}").contains("frames_read: 0"));
        let _inner = reader.into_inner();
    }

    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct InterruptedThenData {
        interrupted: bool,
        inner: Cursor<Vec<u8>>,
    }

    impl Read for InterruptedThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.inner.read(buf)
        }
    }

    struct WouldBlockReader;

    impl Read for WouldBlockReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::WouldBlock))
        }
    }
}
