/// Stable identifier for a verbatim name string.
///
/// The first 16 bytes of the blake3 digest are laid out as a UUID with the
/// version nibble set to 8 (vendor-defined) and the RFC 4122 variant bits.
pub fn name_string_id(verbatim: &str) -> String {
    let hash = blake3::hash(verbatim.as_bytes());
    let mut b = [0u8; 16];
    b.copy_from_slice(&hash.as_bytes()[..16]);
    b[6] = (b[6] & 0x0f) | 0x80;
    b[8] = (b[8] & 0x3f) | 0x80;

    let hex: String = b.iter().map(|byte| format!("{byte:02x}")).collect();
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_input_same_id() {
        assert_eq!(
            name_string_id("Homo sapiens L."),
            name_string_id("Homo sapiens L.")
        );
        assert_ne!(name_string_id("Homo sapiens L."), name_string_id("Homo sapiens"));
    }

    #[test]
    fn uuid_layout_with_version_8() {
        let id = name_string_id("Salix alba");
        assert_eq!(id.len(), 36);
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.iter().map(|p| p.len()).collect::<Vec<_>>(), [8, 4, 4, 4, 12]);
        assert!(parts[2].starts_with('8'));
        assert!(matches!(parts[3].as_bytes()[0], b'8' | b'9' | b'a' | b'b'));
    }
}
