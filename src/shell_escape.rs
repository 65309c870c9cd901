use std::borrow::Cow;
use std::iter::repeat;

/// Common UCS2 code points
mod ucs2 {
    pub const DOUBLEQUOTE: u16 = 0x0022; // '"'
    pub const BACKSLASH: u16 = 0x005C; // '\\'
    pub const SPACE: u16 = 0x0020; // ' '
    pub const LINEFEED: u16 = 0x000A; // '\n'
    pub const HTAB: u16 = 0x0009; // '\t'
    pub const VTAB: u16 = 0x000B; // '\v'
}

/// Losslessly quote one command line token in UTF-16, the form the service control manager
/// stores the binary path in.
///
/// Tokens without whitespace or quotes are returned untouched. Backslashes are only doubled in
/// front of a quote, including the closing one.
pub fn escape(s: &[u16]) -> Cow<'_, [u16]> {
    static ESCAPE_CHARS: &[u16] = &[
        ucs2::SPACE,
        ucs2::LINEFEED,
        ucs2::HTAB,
        ucs2::VTAB,
        ucs2::DOUBLEQUOTE,
    ];
    let needs_escape = s.iter().any(|c| ESCAPE_CHARS.contains(c));
    if !needs_escape {
        return Cow::Borrowed(s);
    }

    let mut escaped: Vec<u16> = Vec::with_capacity(s.len() + 2);
    escaped.push(ucs2::DOUBLEQUOTE);

    let mut chars = s.iter().copied().peekable();
    loop {
        let mut num_slashes = 0;
        while let Some(&ucs2::BACKSLASH) = chars.peek() {
            chars.next();
            num_slashes += 1;
        }

        match chars.next() {
            Some(ucs2::DOUBLEQUOTE) => {
                escaped.extend(repeat(ucs2::BACKSLASH).take(num_slashes * 2 + 1));
                escaped.push(ucs2::DOUBLEQUOTE);
            }
            Some(c) => {
                escaped.extend(repeat(ucs2::BACKSLASH).take(num_slashes));
                escaped.push(c);
            }
            None => {
                escaped.extend(repeat(ucs2::BACKSLASH).take(num_slashes * 2));
                break;
            }
        }
    }

    escaped.push(ucs2::DOUBLEQUOTE);
    Cow::Owned(escaped)
}
