/// Pixel dimensions of a widget or picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    pub scale: f64,
    pub display: Size,
}

/// Scales `content` to fit inside `viewport` keeping its aspect ratio.
///
/// The scale is the smaller of the two axis ratios, so it may exceed 1 for
/// pictures smaller than the viewport. Returns `None` for empty sizes.
pub fn fit_to_viewport(content: Size, viewport: Size) -> Option<Fit> {
    if content.is_empty() || viewport.is_empty() {
        return None;
    }

    let wscale = f64::from(viewport.width) / f64::from(content.width);
    let hscale = f64::from(viewport.height) / f64::from(content.height);
    let scale = wscale.min(hscale);

    Some(Fit {
        scale,
        display: Size::new(
            (f64::from(content.width) * scale).floor() as u32,
            (f64::from(content.height) * scale).floor() as u32,
        ),
    })
}

/// One scroll axis: `value` stays within `0..=upper - page`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Adjustment {
    value: f64,
    upper: f64,
    page: f64,
}

impl Adjustment {
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn max_value(&self) -> f64 {
        (self.upper - self.page).max(0.0)
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value.clamp(0.0, self.max_value());
    }

    /// Updates the scrollable extent, keeping the value in range.
    pub fn configure(&mut self, upper: f64, page: f64) {
        self.upper = upper;
        self.page = page;
        self.set_value(self.value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_picture_fits_by_width() {
        let fit = fit_to_viewport(Size::new(800, 400), Size::new(400, 400)).unwrap();
        assert_eq!(fit.scale, 0.5);
        assert_eq!(fit.display, Size::new(400, 200));
    }

    #[test]
    fn display_size_is_floored() {
        let fit = fit_to_viewport(Size::new(300, 199), Size::new(150, 150)).unwrap();
        assert_eq!(fit.display, Size::new(150, 99));
    }

    #[test]
    fn small_picture_scales_up() {
        let fit = fit_to_viewport(Size::new(100, 50), Size::new(400, 400)).unwrap();
        assert_eq!(fit.scale, 4.0);
        assert_eq!(fit.display, Size::new(400, 200));
    }

    #[test]
    fn empty_sizes_do_not_fit() {
        assert!(fit_to_viewport(Size::new(0, 10), Size::new(10, 10)).is_none());
        assert!(fit_to_viewport(Size::new(10, 10), Size::default()).is_none());
    }

    #[test]
    fn adjustment_clamps_to_scrollable_range() {
        let mut adj = Adjustment::default();
        adj.configure(500.0, 200.0);
        adj.set_value(450.0);
        assert_eq!(adj.value(), 300.0);
        adj.set_value(-5.0);
        assert_eq!(adj.value(), 0.0);

        adj.set_value(250.0);
        adj.configure(300.0, 200.0);
        assert_eq!(adj.value(), 100.0);
    }
}
