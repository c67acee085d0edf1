use std::collections::HashMap;

/// Platform-independent key identifiers
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    K0, K1, K2, K3, K4, K5, K6, K7, K8, K9,
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    Up, Down, Left, Right,
    Space, Tab, Shift, Ctrl, Ins, Del, Home, End, PgUp, PgDn,
    Back, Escape, Enter, Pause, Scroll,
}

impl Key {
    /// Every key, in index order
    #[rustfmt::skip]
    pub const ALL: [Self; 67] = [
        Self::A, Self::B, Self::C, Self::D, Self::E, Self::F, Self::G, Self::H, Self::I,
        Self::J, Self::K, Self::L, Self::M, Self::N, Self::O, Self::P, Self::Q, Self::R,
        Self::S, Self::T, Self::U, Self::V, Self::W, Self::X, Self::Y, Self::Z,
        Self::K0, Self::K1, Self::K2, Self::K3, Self::K4,
        Self::K5, Self::K6, Self::K7, Self::K8, Self::K9,
        Self::F1, Self::F2, Self::F3, Self::F4, Self::F5, Self::F6,
        Self::F7, Self::F8, Self::F9, Self::F10, Self::F11, Self::F12,
        Self::Up, Self::Down, Self::Left, Self::Right,
        Self::Space, Self::Tab, Self::Shift, Self::Ctrl, Self::Ins, Self::Del,
        Self::Home, Self::End, Self::PgUp, Self::PgDn,
        Self::Back, Self::Escape, Self::Enter, Self::Pause, Self::Scroll,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Slot of this key in per-key state arrays
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Immutable platform code -> `Key` table, built once by the host
#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    table: HashMap<u32, Key>,
}

impl KeyMap {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (u32, Key)>) -> Self {
        Self {
            table: pairs.into_iter().collect(),
        }
    }

    #[inline]
    pub fn lookup(&self, code: u32) -> Option<Key> {
        self.table.get(&code).copied()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl FromIterator<(u32, Key)> for KeyMap {
    fn from_iter<I: IntoIterator<Item = (u32, Key)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
