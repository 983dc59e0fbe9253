#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

impl<T> Size<T> {
    pub fn new(width: T, height: T) -> Self {
        Size { width, height }
    }

    pub fn cast<U: From<T>>(self) -> Size<U> {
        Size {
            width: U::from(self.width),
            height: U::from(self.height),
        }
    }
}

/// Size in physical pixels.
pub type PhysicalSize = Size<u32>;

/// Distances from each edge of the window, in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Insets {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Insets {
    pub const ZERO: Insets = Insets {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Insets {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn is_zero(&self) -> bool {
        self.left == 0 && self.top == 0 && self.right == 0 && self.bottom == 0
    }

    /// Edge-wise maximum of two inset sets.
    pub fn union(self, other: Insets) -> Insets {
        Insets {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

/// System-reserved screen regions reported by the host.
///
/// The bridge only reads this; the host owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InsetState {
    pub status_bars: Insets,
    pub navigation_bars: Insets,
    pub display_cutout: Insets,
}

impl InsetState {
    /// Combined insets of the status and navigation bars.
    pub fn system_bars(&self) -> Insets {
        self.status_bars.union(self.navigation_bars)
    }

    /// Whether any system bar currently takes up screen space.
    pub fn system_bars_visible(&self) -> bool {
        !self.system_bars().is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_takes_edge_maximum() {
        let a = Insets::new(0, 24, 0, 0);
        let b = Insets::new(0, 0, 0, 48);
        assert_eq!(a.union(b), Insets::new(0, 24, 0, 48));
    }

    #[test]
    fn hidden_bars_are_not_visible() {
        let state = InsetState {
            display_cutout: Insets::new(0, 32, 0, 0),
            ..Default::default()
        };
        // A cutout alone is not a system bar.
        assert!(!state.system_bars_visible());
    }

    #[test]
    fn status_bar_is_visible() {
        let state = InsetState {
            status_bars: Insets::new(0, 24, 0, 0),
            ..Default::default()
        };
        assert!(state.system_bars_visible());
        assert_eq!(state.system_bars(), Insets::new(0, 24, 0, 0));
    }

    #[test]
    fn size_cast() {
        let size: Size<u64> = Size::new(1080u32, 2400u32).cast();
        assert_eq!(size, Size::new(1080u64, 2400u64));
    }
}
