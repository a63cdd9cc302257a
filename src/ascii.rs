//! ASCII MC protocol codec.
//!
//! Requests are plain ASCII hex text:
//!
//! | Field | Chars | Value |
//! |-------|:-----:|-------|
//! | Command | 2 | `00` bit read, `01` word read, `02` bit write, `03` word write |
//! | PC number | 2 | `FF` |
//! | Monitoring timer | 4 | `000A` |
//! | Device code | 4 | e.g. `4420` for D |
//! | Head address | 8 | big-endian hex |
//! | Point count | 4 | low byte as hex, then `00` |
//! | Data | n | writes only |
//!
//! Responses start with a 2-char subheader and a 2-char completion code
//! (`00` on success), followed by the data.
//!
//! Word data arrives with its two byte halves in reverse reading order;
//! [`swap_word_halves`] restores the natural order before hex parsing.
//!
//! Word writes apply the same swap to outgoing data so that a written value
//! reads back unchanged. This layout has not been checked against an adapter
//! capture yet; verify it on hardware before relying on word writes.

use crate::codec::{
    device_code, Codec, Encoding, CMD_READ_BITS, CMD_READ_WORDS, CMD_WRITE_BITS, CMD_WRITE_WORDS,
    MONITOR_TIMER, PC_NO,
};
use crate::device::Device;
use crate::error::{McError, Result};

/// Maximum points per ASCII request (one count byte).
pub const MAX_ASCII_POINTS: usize = 0xFF;

/// Characters per word in the data section.
const WORD_CHARS: usize = 4;

/// Subheader plus completion code.
const RESPONSE_HEADER_CHARS: usize = 4;

/// Swaps the two byte halves of a 4-character hex word.
///
/// `"3412"` becomes `"1234"`. Applying it twice yields the input.
///
/// # Example
///
/// ```
/// use fx3_mcprotocol::swap_word_halves;
///
/// assert_eq!(&swap_word_halves(*b"3412"), b"1234");
/// assert_eq!(&swap_word_halves(*b"00FF"), b"FF00");
/// ```
pub fn swap_word_halves(raw: [u8; 4]) -> [u8; 4] {
    [raw[2], raw[3], raw[0], raw[1]]
}

/// Parses up to four uppercase or lowercase hex digits.
fn parse_hex(digits: &[u8]) -> Option<u16> {
    if digits.is_empty() || digits.len() > 4 || !digits.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    digits
        .iter()
        .try_fold(0u16, |acc, &d| Some(acc << 4 | char::from(d).to_digit(16)? as u16))
}

/// ASCII MC protocol codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiCodec;

impl AsciiCodec {
    fn header(command: u8, device: Device, start: u32, count: usize) -> Result<String> {
        let code = device_code(device, Encoding::Ascii)?;
        if count > MAX_ASCII_POINTS {
            return Err(McError::invalid_parameter(
                "count",
                format!("must not exceed {}", MAX_ASCII_POINTS),
            ));
        }

        Ok(format!(
            "{:02X}{:02X}{:04X}{:04X}{:08X}{:02X}00",
            command, PC_NO, MONITOR_TIMER, code, start, count
        ))
    }

    /// Reads the frame as text and checks the completion code.
    ///
    /// Non-ASCII bytes are dropped. Returns the data section. A hex completion
    /// code other than `00` becomes [`McError::PlcError`]; a completion field
    /// that is not hex (e.g. `"??"`) is reported as [`McError::InvalidResponse`].
    fn checked_data(frame: &[u8]) -> Result<String> {
        let text: String = frame
            .iter()
            .filter(|b| b.is_ascii())
            .map(|&b| char::from(b))
            .collect();

        if text.len() < RESPONSE_HEADER_CHARS {
            return Err(McError::invalid_response(format!(
                "response too short: expected at least {} characters, got {}",
                RESPONSE_HEADER_CHARS,
                text.len()
            )));
        }

        let completion = &text[2..4];
        if completion != "00" {
            let code = parse_hex(completion.as_bytes()).ok_or_else(|| {
                McError::invalid_response(format!("malformed completion code: {:?}", completion))
            })?;
            return Err(McError::plc_error(code));
        }

        Ok(text[RESPONSE_HEADER_CHARS..].to_string())
    }
}

impl Codec for AsciiCodec {
    fn encoding(&self) -> Encoding {
        Encoding::Ascii
    }

    fn supports_bits(&self) -> bool {
        true
    }

    fn supports_writes(&self) -> bool {
        true
    }

    fn build_read_words(&self, device: Device, start: u32, count: usize) -> Result<Vec<u8>> {
        Ok(Self::header(CMD_READ_WORDS, device, start, count)?.into_bytes())
    }

    fn build_read_bits(&self, device: Device, start: u32, count: usize) -> Result<Vec<u8>> {
        Ok(Self::header(CMD_READ_BITS, device, start, count)?.into_bytes())
    }

    fn build_write_words(&self, device: Device, start: u32, values: &[u16]) -> Result<Vec<u8>> {
        let mut frame = Self::header(CMD_WRITE_WORDS, device, start, values.len())?.into_bytes();
        frame.reserve(values.len() * WORD_CHARS);
        for value in values {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(format!("{:04X}", value).as_bytes());
            frame.extend_from_slice(&swap_word_halves(raw));
        }
        Ok(frame)
    }

    fn build_write_bits(&self, device: Device, start: u32, values: &[bool]) -> Result<Vec<u8>> {
        let mut frame = Self::header(CMD_WRITE_BITS, device, start, values.len())?.into_bytes();
        frame.extend(values.iter().map(|&on| if on { b'1' } else { b'0' }));
        // Odd point counts carry one dummy point
        if values.len() % 2 == 1 {
            frame.push(b'0');
        }
        Ok(frame)
    }

    fn parse_read_words(&self, frame: &[u8], count: usize) -> Result<Vec<u16>> {
        let data = Self::checked_data(frame)?;
        let needed = count.checked_mul(WORD_CHARS).ok_or_else(|| {
            McError::invalid_parameter("count", format!("{} words overflow the data length", count))
        })?;
        if data.len() < needed {
            return Err(McError::invalid_response(format!(
                "expected {} data characters for {} words, got {}",
                needed,
                count,
                data.len()
            )));
        }

        data.as_bytes()[..needed]
            .chunks_exact(WORD_CHARS)
            .map(|chunk| {
                let swapped = swap_word_halves([chunk[0], chunk[1], chunk[2], chunk[3]]);
                parse_hex(&swapped).ok_or_else(|| {
                    McError::invalid_response(format!(
                        "invalid hex word: {:?}",
                        String::from_utf8_lossy(chunk)
                    ))
                })
            })
            .collect()
    }

    fn parse_read_bits(&self, frame: &[u8], count: usize) -> Result<Vec<bool>> {
        let data = Self::checked_data(frame)?;
        if data.len() < count {
            return Err(McError::invalid_response(format!(
                "expected {} bit characters, got {}",
                count,
                data.len()
            )));
        }

        Ok(data.bytes().take(count).map(|c| c == b'1').collect())
    }

    fn parse_write_response(&self, frame: &[u8]) -> Result<()> {
        Self::checked_data(frame).map(|_| ())
    }
}
