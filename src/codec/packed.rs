//! 16-bit packed B4G4R4A4 (B in the low nibble, A in the high nibble)

/// Expand a 4-bit channel to 8 bits
fn expand4(v: u16) -> u8 {
    (v as u8 & 0x0f) * 17
}

/// Round an 8-bit channel to 4 bits
fn quantize4(v: u8) -> u16 {
    ((v as u16 * 15 + 127) / 255) & 0x0f
}

pub fn encode(rgba: &[u8]) -> Vec<u8> {
    rgba.chunks_exact(4)
        .flat_map(|px| {
            let packed = (quantize4(px[3]) << 12)
                | (quantize4(px[0]) << 8)
                | (quantize4(px[1]) << 4)
                | quantize4(px[2]);
            packed.to_le_bytes()
        })
        .collect()
}

pub fn decode(data: &[u8]) -> Vec<u8> {
    data.chunks_exact(2)
        .flat_map(|bytes| {
            let v = u16::from_le_bytes([bytes[0], bytes[1]]);
            [expand4(v >> 8), expand4(v >> 4), expand4(v), expand4(v >> 12)]
        })
        .collect()
}
