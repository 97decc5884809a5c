//! Detail overlay state, kept apart from the search state.

use crate::models::{ImageRecord, SelectedImage};

/// The currently selected photo and whether its overlay is showing
#[derive(Debug, Clone, Default)]
pub struct DetailOverlay {
    selected: Option<SelectedImage>,
    modal_open: bool,
}

impl DetailOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the overlay on `record`, replacing any previous selection
    pub fn select_image(&mut self, record: &ImageRecord) {
        self.selected = Some(SelectedImage::from(record));
        self.modal_open = true;
    }

    /// Close the overlay and drop the selection
    pub fn deselect_image(&mut self) {
        self.selected = None;
        self.modal_open = false;
    }

    pub fn is_open(&self) -> bool {
        self.modal_open
    }

    /// The selection to render, if the overlay is open
    pub fn visible(&self) -> Option<&SelectedImage> {
        if self.modal_open {
            self.selected.as_ref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::mock::make_image;

    #[test]
    fn test_select_and_deselect() {
        let mut overlay = DetailOverlay::new();
        assert!(!overlay.is_open());
        assert!(overlay.visible().is_none());

        overlay.select_image(&make_image("a").counts(3, 40));
        assert!(overlay.is_open());
        let shown = overlay.visible().unwrap();
        assert_eq!(shown.id, "a");
        assert_eq!(shown.full_url, "http://example.com/a/regular.jpg");
        assert_eq!(shown.download_count, 3);
        assert_eq!(shown.view_count, 40);

        overlay.select_image(&make_image("b"));
        assert_eq!(overlay.visible().unwrap().id, "b");

        overlay.deselect_image();
        assert!(!overlay.is_open());
        assert!(overlay.visible().is_none());
    }
}
