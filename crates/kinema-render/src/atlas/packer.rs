/// Packing failure.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AtlasError {
    /// The item does not fit in the remaining space (or at all). Callers
    /// create a new atlas generation; no defragmentation is attempted.
    Full { width: u32, height: u32 },
}

/// Shelf-packing allocator.
///
/// A cursor `(x, y)` and the current shelf's `line_height` track the next
/// free position. An item is placed on the current shelf when it fits
/// horizontally; otherwise the cursor wraps to a new shelf below. Placements
/// are immutable; there is no free operation.
#[derive(Debug, Clone)]
pub struct ShelfPacker {
    width: u32,
    height: u32,
    padding: u32,
    cursor_x: u32,
    cursor_y: u32,
    line_height: u32,
}

impl ShelfPacker {
    pub fn new(width: u32, height: u32, padding: u32) -> Self {
        Self {
            width,
            height,
            padding,
            cursor_x: padding,
            cursor_y: padding,
            line_height: 0,
        }
    }

    /// Reserves a `w`×`h` rectangle, returning its top-left corner.
    pub fn place(&mut self, w: u32, h: u32) -> Result<(u32, u32), AtlasError> {
        if w == 0 || h == 0 || w + 2 * self.padding > self.width {
            return Err(AtlasError::Full { width: w, height: h });
        }

        // Wrap to a new shelf when the item doesn't fit horizontally.
        if self.cursor_x + w + self.padding > self.width {
            self.cursor_y += self.line_height + self.padding;
            self.cursor_x = self.padding;
            self.line_height = 0;
        }

        if self.cursor_y + h + self.padding > self.height {
            return Err(AtlasError::Full { width: w, height: h });
        }

        let x = self.cursor_x;
        let y = self.cursor_y;

        self.cursor_x += w + self.padding;
        self.line_height = self.line_height.max(h);

        Ok((x, y))
    }

    pub fn reset(&mut self) {
        self.cursor_x = self.padding;
        self.cursor_y = self.padding;
        self.line_height = 0;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}
