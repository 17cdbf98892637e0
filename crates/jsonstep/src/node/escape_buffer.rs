//! Decoding of four-digit `\uXXXX` escapes without buffering characters.
//!
//! [`UnicodeEscapeBuffer`] accumulates exactly four ASCII hexadecimal digits
//! into a `u16` as they arrive and hands back the UTF-16 code unit when the
//! fourth digit is provided. Surrogate halves are returned as-is; pairing them
//! up is the string scanner's job.

use crate::error::ErrorReason;

/// Accumulates up to four hexadecimal digits of one `\u` escape.
#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    acc: u16,
    len: u8,
}

impl UnicodeEscapeBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Convert a single ASCII hex digit into its 0..=15 value.
    #[inline]
    fn hex_val(c: char) -> Option<u16> {
        #[allow(clippy::cast_possible_truncation)]
        c.to_digit(16).map(|d| d as u16)
    }

    /// Feed one digit.
    ///
    /// Returns `Ok(None)` until the fourth digit arrives, then the decoded
    /// code unit; the buffer resets itself afterwards.
    pub(crate) fn feed(&mut self, c: char) -> Result<Option<u16>, ErrorReason> {
        let d = Self::hex_val(c).ok_or(ErrorReason::IllegalUnicode)?;
        self.acc = (self.acc << 4) | d;
        self.len += 1;
        if self.len < 4 {
            return Ok(None);
        }
        let unit = self.acc;
        *self = Self::new();
        Ok(Some(unit))
    }
}
