//! Key codes shared across platforms
//!
//! Codes use the Win32 virtual-key numbering so callers can pass the same
//! small integer on every platform.

/// Keys with a portable code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Enter / Return
    Enter,
    /// Escape
    Escape,
    /// Space bar
    Space,
    /// Left arrow
    Left,
    /// Up arrow
    Up,
    /// Right arrow
    Right,
    /// Down arrow
    Down,
}

impl KeyCode {
    /// Every portable key
    pub const ALL: [Self; 7] = [
        Self::Enter,
        Self::Escape,
        Self::Space,
        Self::Left,
        Self::Up,
        Self::Right,
        Self::Down,
    ];

    /// Virtual-key code
    pub const fn code(self) -> i32 {
        match self {
            Self::Enter => 13,
            Self::Escape => 27,
            Self::Space => 32,
            Self::Left => 37,
            Self::Up => 38,
            Self::Right => 39,
            Self::Down => 40,
        }
    }

    /// Map a virtual-key code back to a portable key
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.code() == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_virtual_keys() {
        assert_eq!(KeyCode::Space.code(), 32);
        assert_eq!(KeyCode::Enter.code(), 13);
        assert_eq!(KeyCode::Escape.code(), 27);
        assert_eq!(KeyCode::Down.code(), 40);
    }

    #[test]
    fn test_from_code() {
        for key in KeyCode::ALL {
            assert_eq!(KeyCode::from_code(key.code()), Some(key));
        }
        assert_eq!(KeyCode::from_code(65), None);
    }
}
