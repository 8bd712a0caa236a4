// Lookup table for bytes which may appear in a key: ascii alphanumerics together with
// "@&_:./?+-". Every other byte, including all non-ascii bytes, terminates a key.
pub(crate) static KEY_ALLOWED: [bool; 256] = {
    const __: bool = false; // disallowed
    const OK: bool = true; // permitted bytes
    [
        //   1   2   3   4   5   6   7   8   9   A   B   C   D   E   F
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 0
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 1
        __, __, __, __, __, __, OK, __, __, __, __, OK, __, OK, OK, OK, // 2
        OK, OK, OK, OK, OK, OK, OK, OK, OK, OK, OK, __, __, __, __, OK, // 3
        OK, OK, OK, OK, OK, OK, OK, OK, OK, OK, OK, OK, OK, OK, OK, OK, // 4
        OK, OK, OK, OK, OK, OK, OK, OK, OK, OK, OK, __, __, __, __, OK, // 5
        __, OK, OK, OK, OK, OK, OK, OK, OK, OK, OK, OK, OK, OK, OK, OK, // 6
        OK, OK, OK, OK, OK, OK, OK, OK, OK, OK, OK, __, __, __, __, __, // 7
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 8
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 9
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // A
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // B
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // C
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // D
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // E
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // F
    ]
};

#[inline]
pub(crate) fn is_key_byte(b: u8) -> bool {
    KEY_ALLOWED[b as usize]
}
