/// Bit helpers for the FAST segment test

/// Check if a 16-bit circular mask holds at least `min_count` consecutive set
/// bits, wrapping from bit 15 back to bit 0
pub fn has_consecutive_bits(mask: u16, min_count: usize) -> bool {
    if min_count == 0 || min_count > 16 {
        return false;
    }
    if mask == u16::MAX {
        return true;
    }

    // A run of n bits survives n-1 AND-ed rotations
    let mut test_mask = mask;
    for i in 1..min_count {
        test_mask &= mask.rotate_right(i as u32);
        if test_mask == 0 {
            return false;
        }
    }

    test_mask != 0
}
