//! Fixed-width short codes for section ids.
//!
//! A routine code is `#` followed by one 3-character group per section. Each
//! group is a base-69 number holding the last four digits of a six-digit
//! section id that always starts with `17`.

use crate::error::{Error, Result};
use crate::source::SHORT_CODE_SENTINEL;

const CHARSET: &[u8; 69] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ+.%@*$!";
const BASE: u32 = 69;
const GROUP: usize = 3;
const ID_PREFIX: &str = "17";

fn digit(c: char) -> Option<u32> {
    CHARSET.iter().position(|&b| b as char == c).map(|p| p as u32)
}

/// Decode one 3-character group into a section id.
pub fn decode_section(group: &str) -> Result<String> {
    let chars: Vec<char> = group.chars().collect();
    if chars.len() != GROUP {
        return Err(Error::Descriptor(format!(
            "short code group must be exactly {} characters, got {:?}",
            GROUP, group
        )));
    }
    let mut value = 0u32;
    for c in chars {
        let d = digit(c)
            .ok_or_else(|| Error::Descriptor(format!("invalid character {:?} in short code", c)))?;
        value = value * BASE + d;
    }
    if value > 9999 {
        return Err(Error::Descriptor(format!("short code group {:?} is out of range", group)));
    }
    Ok(format!("{}{:04}", ID_PREFIX, value))
}

/// Decode a full routine code (`#` plus groups) into section ids.
pub fn decode_routine(code: &str) -> Result<Vec<String>> {
    let code = code.trim();
    let payload = code
        .strip_prefix(SHORT_CODE_SENTINEL)
        .ok_or_else(|| Error::Descriptor(format!("short code must start with {}", SHORT_CODE_SENTINEL)))?;
    let chars: Vec<char> = payload.chars().collect();
    if chars.is_empty() {
        return Err(Error::Descriptor("short code has no sections".into()));
    }
    if chars.len() % GROUP != 0 {
        return Err(Error::Descriptor(format!(
            "short code length {} is not a multiple of {}",
            chars.len(),
            GROUP
        )));
    }
    chars
        .chunks(GROUP)
        .map(|g| decode_section(&g.iter().collect::<String>()))
        .collect()
}

/// Encode a six-digit `17xxxx` section id into one group.
pub fn encode_section(section_id: &str) -> Result<String> {
    let digits: String = section_id.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 6 || !digits.starts_with(ID_PREFIX) {
        return Err(Error::Descriptor(format!("invalid section id {:?}", section_id)));
    }
    let mut rest: u32 = digits[2..]
        .parse()
        .map_err(|_| Error::Descriptor(format!("invalid section id {:?}", section_id)))?;
    let mut out = [0u8; GROUP];
    for slot in out.iter_mut().rev() {
        *slot = CHARSET[(rest % BASE) as usize];
        rest /= BASE;
    }
    Ok(out.iter().map(|&b| b as char).collect())
}

/// Encode the valid ids among `section_ids`; `#000` when none are valid.
pub fn encode_routine<S: AsRef<str>>(section_ids: &[S]) -> String {
    let groups: Vec<String> = section_ids
        .iter()
        .filter_map(|id| encode_section(id.as_ref()).ok())
        .collect();
    if groups.is_empty() {
        return format!("{}000", SHORT_CODE_SENTINEL);
    }
    format!("{}{}", SHORT_CODE_SENTINEL, groups.concat())
}
