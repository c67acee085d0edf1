/// Per-frame state of one key or mouse button
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HwButton {
    /// Went down this frame
    pub pressed: bool,
    /// Went up this frame
    pub released: bool,
    /// Currently down
    pub held: bool,
}

/// Turns raw "is down" samples into pressed/held/released transitions.
///
/// `update` must run exactly once per frame. Changes that happen and revert
/// between two updates are not seen.
#[derive(Debug, Clone)]
pub struct ButtonLatch {
    old: Vec<bool>,
    state: Vec<HwButton>,
}

impl ButtonLatch {
    pub fn new(count: usize) -> Self {
        Self {
            old: vec![false; count],
            state: vec![HwButton::default(); count],
        }
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Compare this frame's samples with the last frame's.
    /// Extra samples beyond `len()` are ignored; missing ones count as up.
    pub fn update(&mut self, samples: &[bool]) {
        for (i, (old, button)) in self.old.iter_mut().zip(self.state.iter_mut()).enumerate() {
            let new = samples.get(i).copied().unwrap_or(false);
            button.pressed = false;
            button.released = false;

            if new != *old {
                if new {
                    button.pressed = !button.held;
                    button.held = true;
                } else {
                    button.released = true;
                    button.held = false;
                }
            }
            *old = new;
        }
    }

    /// State of button `i`; out-of-range indices read as idle
    #[inline]
    pub fn get(&self, i: usize) -> HwButton {
        self.state.get(i).copied().unwrap_or_default()
    }
}
