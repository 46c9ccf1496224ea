//! Watermark styling for rendered certificates

/// Styling for the tiled watermark layer drawn under certificate
/// content.
#[derive(Debug, Clone)]
pub struct WatermarkOptions {
    pub text: String,
    /// 0.0 (invisible) to 1.0 (opaque).
    pub opacity: f64,
    /// Point size of the tiled text.
    pub font_size: f64,
    pub color: (u8, u8, u8),
    /// Rotation in degrees, counter-clockwise.
    pub angle: f64,
    /// Vertical tile step in mm; columns advance at 1.5x this.
    pub spacing: f64,
}

impl WatermarkOptions {
    /// Branding watermark for an institution, e.g.
    /// `VERIFIED • EXAMPLE UNIVERSITY • 2025`.
    pub fn for_institution(institution: &str, year: i32) -> Self {
        Self {
            text: format!("VERIFIED \u{2022} {} \u{2022} {}", institution.to_uppercase(), year),
            ..Self::default()
        }
    }

    /// Watermark color blended toward white by the opacity factor.
    /// Text fills carry no alpha channel here, so transparency is
    /// approximated against the white page.
    pub(crate) fn effective_color(&self) -> (f64, f64, f64) {
        let a = self.opacity.clamp(0.0, 1.0);
        let blend = |c: u8| (1.0 - a) + a * f64::from(c) / 255.0;
        (blend(self.color.0), blend(self.color.1), blend(self.color.2))
    }
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            text: String::new(),
            opacity: 0.1,
            font_size: 24.0,
            color: (30, 64, 175),
            angle: -30.0,
            spacing: 60.0,
        }
    }
}
