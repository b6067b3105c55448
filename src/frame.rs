//! Frame construction and checksum verification.
//!
//! Every exchange with the sensor uses the same fixed 9-byte layout:
//!
//! ```text
//! [0]=0xFF  [1]=0x01  [2]=command  [3]=payload_hi  [4]=payload_lo
//! [5..=7]=0x00  [8]=checksum
//! ```
//!
//! The checksum is the modular complement of the sum of bytes 1..=7:
//! `(256 - (sum % 256))` truncated to 8 bits. When the sum is a multiple
//! of 256 the truncation yields `0x00`; the sensor expects exactly that.

use crate::constants::{FRAME_HEAD, SENSOR_ID};

/// Length in bytes of every command and response frame.
pub const FRAME_LEN: usize = 9;

/// A raw 9-byte protocol frame.
pub type Frame = [u8; FRAME_LEN];

/// Builds a command frame with header, payload and checksum filled in.
///
/// The 16-bit `value` is split big-endian into bytes 3 and 4, but only
/// when non-zero: a zero payload leaves those bytes at their
/// zero-initialized default, so "command without payload" and "command
/// with payload 0" produce identical frames on the wire.
pub fn build_command(command: u8, value: u16) -> Frame {
    let mut frame: Frame = [FRAME_HEAD, SENSOR_ID, command, 0, 0, 0, 0, 0, 0];
    if value != 0 {
        frame[3] = (value >> 8) as u8;
        frame[4] = (value & 0xFF) as u8;
    }
    frame[8] = checksum(&frame);
    frame
}

/// Computes the checksum over bytes 1..=7 of a frame.
pub fn checksum(frame: &Frame) -> u8 {
    let sum: u16 = frame[1..8].iter().map(|&b| u16::from(b)).sum();
    (256 - (sum % 256)) as u8
}

/// Returns true when byte 8 matches the checksum recomputed over bytes 1..=7.
pub fn verify(frame: &Frame) -> bool {
    checksum(frame) == frame[8]
}
