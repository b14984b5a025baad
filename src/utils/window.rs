/// Reads a window title through a length query followed by a text query.
///
/// `length` reports the title length in UTF-16 units. The text query gets a
/// buffer one unit longer for the terminator and returns how many units it
/// copied. Neither result is trusted: a stale handle may report a shorter
/// copy, or none at all.
pub fn read_title_with<L, T>(length: L, text: T) -> String
where
    L: FnOnce() -> i32,
    T: FnOnce(&mut [u16]) -> i32,
{
    let len = usize::try_from(length()).unwrap_or(0);
    let mut buf = vec![0u16; len + 1];
    let copied = usize::try_from(text(&mut buf)).unwrap_or(0).min(len);
    decode_utf16(&buf[..copied])
}

/// 解码到第一个 NUL 为止
pub fn decode_utf16(buf: &[u16]) -> String {
    let end = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    String::from_utf16_lossy(&buf[..end])
}
