/// Calculate the key tag for a DNSKEY record (RFC 4034 Appendix B)
pub fn calculate_key_tag(flags: u16, protocol: u8, algorithm: u8, public_key: &[u8]) -> u16 {
    // RSAMD5 uses the low 16 bits of the modulus instead of the checksum
    if algorithm == 1 {
        return match public_key {
            [.., hi, lo] => u16::from_be_bytes([*hi, *lo]),
            _ => 0,
        };
    }

    let [flags_hi, flags_lo] = flags.to_be_bytes();
    let rdata = [flags_hi, flags_lo, protocol, algorithm]
        .into_iter()
        .chain(public_key.iter().copied());

    // u64 so keys of any size sum without overflow
    let accumulator = rdata.enumerate().fold(0u64, |acc, (i, byte)| {
        let word = if i % 2 == 0 {
            u64::from(byte) << 8
        } else {
            u64::from(byte)
        };
        acc.wrapping_add(word)
    });

    let folded = accumulator.wrapping_add((accumulator >> 16) & 0xFFFF);
    (folded & 0xFFFF) as u16
}
