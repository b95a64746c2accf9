//! Dialog placement and sizing.

/// Which edge a dialog is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogSide {
    /// Drawer sliding in from the left.
    Left,
    /// Drawer sliding in from the right.
    Right,
    /// Centered on screen (default).
    #[default]
    Center,
}

/// Dialog size preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogSize {
    /// Small preset (30% of screen).
    Sm,
    /// Medium preset (50% of screen).
    #[default]
    Md,
    /// Large preset (70% of screen).
    Lg,
    /// Extra large preset (90% of screen).
    Xl,
}

impl DialogSize {
    /// Fraction of the screen width the panel takes.
    pub fn fraction(self) -> f32 {
        match self {
            DialogSize::Sm => 0.30,
            DialogSize::Md => 0.50,
            DialogSize::Lg => 0.70,
            DialogSize::Xl => 0.90,
        }
    }
}

/// A panel's position on screen, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogArea {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl DialogArea {
    /// Calculate the panel area for a screen of the given size.
    ///
    /// Drawers take the full height; centered dialogs scale both dimensions.
    pub fn calculate(screen_width: u16, screen_height: u16, side: DialogSide, size: DialogSize) -> Self {
        let fraction = size.fraction();
        let width = ((screen_width as f32 * fraction) as u16)
            .max(10)
            .min(screen_width);

        match side {
            DialogSide::Left => Self {
                x: 0,
                y: 0,
                width,
                height: screen_height,
            },
            DialogSide::Right => Self {
                x: screen_width.saturating_sub(width),
                y: 0,
                width,
                height: screen_height,
            },
            DialogSide::Center => {
                let height = ((screen_height as f32 * fraction) as u16)
                    .max(3)
                    .min(screen_height);
                Self {
                    x: screen_width.saturating_sub(width) / 2,
                    y: screen_height.saturating_sub(height) / 2,
                    width,
                    height,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered() {
        let area = DialogArea::calculate(100, 40, DialogSide::Center, DialogSize::Md);
        assert_eq!(area, DialogArea { x: 25, y: 10, width: 50, height: 20 });
    }

    #[test]
    fn test_right_drawer() {
        let area = DialogArea::calculate(100, 40, DialogSide::Right, DialogSize::Sm);
        assert_eq!(area, DialogArea { x: 70, y: 0, width: 30, height: 40 });
    }

    #[test]
    fn test_tiny_screen_clamps() {
        let area = DialogArea::calculate(8, 2, DialogSide::Center, DialogSize::Sm);
        assert_eq!(area.width, 8);
        assert_eq!(area.height, 2);
    }
}
