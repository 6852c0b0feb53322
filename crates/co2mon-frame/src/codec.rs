use crate::error::{FrameError, Result};

/// Size of one device report.
pub const FRAME_SIZE: usize = 8;

/// One raw report as read from the device.
pub type RawFrame = [u8; FRAME_SIZE];

/// Session key sent to the device at initialization and used to unscramble
/// every frame afterwards.
pub const OBFUSCATION_KEY: RawFrame = [0xc4, 0xc6, 0xc0, 0x92, 0x40, 0x23, 0xdc, 0x96];

/// Fixed state the device firmware folds into every frame ("Htemp99e").
pub const CIPHER_STATE: RawFrame = *b"Htemp99e";

/// Byte scramble table. `SHUFFLE[i]` is the destination index of wire byte `i`.
pub const SHUFFLE: [usize; FRAME_SIZE] = [2, 4, 0, 7, 1, 6, 5, 3];

/// First trailer byte of a valid plaintext frame. The remaining three are zero.
pub const TRAILER: u8 = 0x0d;

/// `CIPHER_STATE` with the nibbles of each byte swapped.
const CIPHER_MASK: RawFrame = nibble_swap(CIPHER_STATE);

const fn nibble_swap(state: RawFrame) -> RawFrame {
    let mut out = [0u8; FRAME_SIZE];
    let mut i = 0;
    while i < FRAME_SIZE {
        out[i] = state[i].rotate_left(4);
        i += 1;
    }
    out
}

/// Which representation of a frame passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// The device sent the frame unscrambled.
    Plain,
    /// The frame validated only after [`decrypt`].
    Obfuscated,
}

/// A validated frame: operation code plus raw 16-bit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    /// Operation code, an ASCII character on all known firmware.
    pub operation: u8,
    /// Raw value, big-endian on the wire.
    pub value: u16,
}

impl Record {
    /// Build a record from a frame that already passed [`check`].
    pub fn from_plaintext(frame: &RawFrame) -> Self {
        Self {
            operation: frame[0],
            value: u16::from_be_bytes([frame[1], frame[2]]),
        }
    }

    /// Encode this record as a plaintext frame with checksum and trailer.
    pub fn to_plaintext(&self) -> RawFrame {
        let [hi, lo] = self.value.to_be_bytes();
        let sum = self.operation.wrapping_add(hi).wrapping_add(lo);
        [self.operation, hi, lo, sum, TRAILER, 0, 0, 0]
    }

    /// The operation code as a character.
    pub fn operation_char(&self) -> char {
        char::from(self.operation)
    }
}

/// Validate a plaintext frame: byte-sum checksum and fixed trailer.
pub fn check(frame: &RawFrame) -> bool {
    frame[0].wrapping_add(frame[1]).wrapping_add(frame[2]) == frame[3]
        && frame[4] == TRAILER
        && frame[5..] == [0, 0, 0]
}

/// Reverse the device's frame obfuscation.
///
/// Unscramble byte positions, XOR with the session key, rotate the whole
/// frame right by three bits as one 64-bit ring, then subtract the
/// nibble-swapped cipher state byte by byte.
pub fn decrypt(frame: &RawFrame) -> RawFrame {
    let mut unshuffled = [0u8; FRAME_SIZE];
    for (i, &dst) in SHUFFLE.iter().enumerate() {
        unshuffled[dst] = frame[i];
    }

    let mut keyed = [0u8; FRAME_SIZE];
    for i in 0..FRAME_SIZE {
        keyed[i] = unshuffled[i] ^ OBFUSCATION_KEY[i];
    }

    let mut out = [0u8; FRAME_SIZE];
    for i in 0..FRAME_SIZE {
        let prev = keyed[(i + FRAME_SIZE - 1) % FRAME_SIZE];
        let rotated = (keyed[i] >> 3) | (prev << 5);
        out[i] = rotated.wrapping_sub(CIPHER_MASK[i]);
    }
    out
}

/// Apply the device's frame obfuscation. Inverse of [`decrypt`].
///
/// Devices never need this from the host side; it exists to build
/// obfuscated fixtures and to simulate a device.
pub fn obfuscate(plain: &RawFrame) -> RawFrame {
    let mut rotated = [0u8; FRAME_SIZE];
    for i in 0..FRAME_SIZE {
        rotated[i] = plain[i].wrapping_add(CIPHER_MASK[i]);
    }

    let mut keyed = [0u8; FRAME_SIZE];
    for i in 0..FRAME_SIZE {
        let next = rotated[(i + 1) % FRAME_SIZE];
        keyed[i] = ((rotated[i] << 3) | (next >> 5)) ^ OBFUSCATION_KEY[i];
    }

    let mut out = [0u8; FRAME_SIZE];
    for (i, &src) in SHUFFLE.iter().enumerate() {
        out[i] = keyed[src];
    }
    out
}

/// Recover the plaintext of a frame.
///
/// The raw bytes are checked first; only if they fail is the obfuscation
/// reversed and checked once more. On failure the error carries the
/// transformed bytes.
pub fn plaintext(frame: &RawFrame) -> Result<(RawFrame, Encoding)> {
    if check(frame) {
        return Ok((*frame, Encoding::Plain));
    }

    let decrypted = decrypt(frame);
    if check(&decrypted) {
        Ok((decrypted, Encoding::Obfuscated))
    } else {
        Err(FrameError::Checksum { bytes: decrypted })
    }
}

/// Decode one frame into its operation code and raw value.
pub fn decode(frame: &RawFrame) -> Result<Record> {
    let (plain, _) = plaintext(frame)?;
    Ok(Record::from_plaintext(&plain))
}
