//! PDF certificate renderer
//!
//! Draws a single A4 portrait page: tiled watermark under everything,
//! centered header, status badge, details table, security-features
//! list, the QR image (when one was supplied) and a footer. Layout
//! coordinates are top-origin millimeters converted at the edge.

use crate::error::{ArtifactError, ArtifactResult};
use crate::metadata::CertificateData;
use crate::watermark::WatermarkOptions;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::Utc;
use cv_core::VerificationStatus;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::*;

const PAGE_WIDTH_MM: f64 = 210.0;
const PAGE_HEIGHT_MM: f64 = 297.0;
const PT_PER_MM: f64 = 72.0 / 25.4;

/// Rendered QR size on the page.
const QR_SIZE_MM: f64 = 50.0;

const INK: (u8, u8, u8) = (30, 41, 59);
const MUTED: (u8, u8, u8) = (100, 116, 139);
const BORDER: (u8, u8, u8) = (200, 200, 200);

/// Render the secure certificate for a validation. `qr_data_uri` may be
/// empty, in which case the QR block is omitted entirely.
pub fn render_certificate(
    data: &CertificateData,
    qr_data_uri: &str,
    watermark: &WatermarkOptions,
) -> ArtifactResult<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        "Certificate Validation Report",
        Mm(PAGE_WIDTH_MM as f32),
        Mm(PAGE_HEIGHT_MM as f32),
        "Layer 1",
    );
    let layer = doc.get_page(page).get_layer(layer);
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    draw_watermark(&layer, &font, watermark);

    // Header
    layer.set_fill_color(rgb(INK));
    text_centered(
        &layer,
        &font,
        "CERTIFICATE VALIDATION REPORT",
        22.0,
        PAGE_WIDTH_MM / 2.0,
        30.0,
    );
    let institution = or_default(&data.metadata.institution, "Unknown Institution");
    text_centered(&layer, &font, institution, 16.0, PAGE_WIDTH_MM / 2.0, 45.0);

    // Status badge
    let status = VerificationStatus::classify(&data.authenticity, data.confidence_score);
    layer.set_fill_color(rgb(status.rgb()));
    fill_rect(&layer, PAGE_WIDTH_MM / 2.0 - 30.0, 55.0, 60.0, 15.0);
    layer.set_fill_color(rgb((255, 255, 255)));
    text_centered(&layer, &font, status.label(), 12.0, PAGE_WIDTH_MM / 2.0, 65.0);

    // Details table
    layer.set_fill_color(rgb(INK));
    let score = format!("{}%", data.confidence_score);
    let validation_date = Utc::now().format("%Y-%m-%d").to_string();
    let details = [
        ("Student Name:", or_default(&data.metadata.student_name, "Unknown")),
        ("Degree:", or_default(&data.metadata.degree, "Unknown")),
        ("Institution:", or_default(&data.metadata.institution, "Unknown")),
        (
            "Graduation Date:",
            or_default(&data.metadata.graduation_date, "Unknown"),
        ),
        (
            "Certificate ID:",
            or_default(&data.metadata.certificate_id, "Unknown"),
        ),
        ("Validation Date:", validation_date.as_str()),
        ("Confidence Score:", score.as_str()),
    ];
    let mut y = 95.0;
    for (label, value) in details {
        layer.use_text(label, 12.0, Mm(20.0), from_top(y), &font);
        layer.use_text(value, 12.0, Mm(70.0), from_top(y), &font);
        y += 12.0;
    }

    // Security features list
    layer.use_text("Security Features:", 14.0, Mm(20.0), from_top(y + 15.0), &font);
    let features = [
        "\u{2022} Cryptographic QR Code with verification hash",
        "\u{2022} Digital watermark with institution branding",
        "\u{2022} Tamper-proof design with embedded metadata",
        "\u{2022} Timestamp-based validation system",
    ];
    y += 30.0;
    for feature in features {
        layer.use_text(feature, 10.0, Mm(25.0), from_top(y), &font);
        y += 8.0;
    }

    if !qr_data_uri.is_empty() {
        draw_qr_block(&layer, &font, qr_data_uri)?;
    }

    // Footer
    layer.set_fill_color(rgb(MUTED));
    let generated = format!("Generated on {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));
    text_centered(&layer, &font, &generated, 8.0, PAGE_WIDTH_MM / 2.0, PAGE_HEIGHT_MM - 10.0);
    text_centered(
        &layer,
        &font,
        "This document contains cryptographic security features",
        8.0,
        PAGE_WIDTH_MM / 2.0,
        PAGE_HEIGHT_MM - 5.0,
    );

    Ok(doc.save_to_bytes()?)
}

/// Tile the rotated watermark text across the page before any content.
fn draw_watermark(layer: &PdfLayerReference, font: &IndirectFontRef, options: &WatermarkOptions) {
    let (r, g, b) = options.effective_color();
    layer.set_fill_color(Color::Rgb(Rgb::new(r as f32, g as f32, b as f32, None)));

    let mut y = 20.0;
    while y < PAGE_HEIGHT_MM - 20.0 {
        let mut x = 20.0;
        while x < PAGE_WIDTH_MM - 20.0 {
            layer.begin_text_section();
            layer.set_font(font, options.font_size as f32);
            layer.set_text_matrix(TextMatrix::TranslateRotate(
                Mm(x as f32).into_pt(),
                from_top(y).into_pt(),
                options.angle as f32,
            ));
            layer.write_text(&options.text, font);
            layer.end_text_section();
            x += options.spacing * 1.5;
        }
        y += options.spacing;
    }
}

/// QR image with white backing, border and caption near the lower
/// right corner.
fn draw_qr_block(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    qr_data_uri: &str,
) -> ArtifactResult<()> {
    let b64 = qr_data_uri
        .strip_prefix("data:image/png;base64,")
        .ok_or_else(|| ArtifactError::QrDecode("unsupported data URI scheme".to_string()))?;
    let png = BASE64
        .decode(b64)
        .map_err(|e| ArtifactError::QrDecode(e.to_string()))?;
    let decoded = image_crate::load_from_memory(&png)
        .map_err(|e| ArtifactError::QrDecode(e.to_string()))?;
    let buffer = decoded.to_rgb8();
    let px_width = buffer.width();
    let rgb_image = image_crate::DynamicImage::ImageRgb8(buffer);

    let qr_x = PAGE_WIDTH_MM - QR_SIZE_MM - 20.0;
    let qr_y = PAGE_HEIGHT_MM - QR_SIZE_MM - 50.0;

    // White backing for scan contrast, then a light border
    layer.set_fill_color(rgb((255, 255, 255)));
    fill_rect(layer, qr_x - 5.0, qr_y - 5.0, QR_SIZE_MM + 10.0, QR_SIZE_MM + 15.0);
    layer.set_outline_color(rgb(BORDER));
    layer.set_outline_thickness(0.5);
    stroke_rect(layer, qr_x - 5.0, qr_y - 5.0, QR_SIZE_MM + 10.0, QR_SIZE_MM + 15.0);

    // dpi scales the bitmap to QR_SIZE_MM on the page
    let dpi = f64::from(px_width) * 25.4 / QR_SIZE_MM;
    Image::from_dynamic_image(&rgb_image).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(qr_x as f32)),
            translate_y: Some(from_top(qr_y + QR_SIZE_MM)),
            dpi: Some(dpi as f32),
            ..ImageTransform::default()
        },
    );

    layer.set_fill_color(rgb(INK));
    text_centered(
        layer,
        font,
        "Scan to verify authenticity",
        8.0,
        qr_x + QR_SIZE_MM / 2.0,
        qr_y + QR_SIZE_MM + 8.0,
    );
    Ok(())
}

/// Convert a top-origin y coordinate to the bottom-origin page space.
fn from_top(y_mm: f64) -> Mm {
    Mm((PAGE_HEIGHT_MM - y_mm) as f32)
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

/// Horizontally centered text, approximating the Helvetica advance at
/// half an em per character.
fn text_centered(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    font_size: f64,
    center_x_mm: f64,
    top_y_mm: f64,
) {
    let width_mm = text.chars().count() as f64 * font_size * 0.5 / PT_PER_MM;
    layer.use_text(
        text,
        font_size as f32,
        Mm((center_x_mm - width_mm / 2.0) as f32),
        from_top(top_y_mm),
        font,
    );
}

fn rect_ring(x: f64, top_y: f64, w: f64, h: f64) -> Vec<(Point, bool)> {
    let bottom = from_top(top_y + h);
    let top = from_top(top_y);
    vec![
        (Point::new(Mm(x as f32), bottom), false),
        (Point::new(Mm((x + w) as f32), bottom), false),
        (Point::new(Mm((x + w) as f32), top), false),
        (Point::new(Mm(x as f32), top), false),
    ]
}

/// Axis-aligned filled rectangle. The rings carry no arc segments, so
/// the status badge renders square-cornered instead of with a 3 mm
/// corner radius.
fn fill_rect(layer: &PdfLayerReference, x: f64, top_y: f64, w: f64, h: f64) {
    layer.add_polygon(Polygon {
        rings: vec![rect_ring(x, top_y, w, h)],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
}

fn stroke_rect(layer: &PdfLayerReference, x: f64, top_y: f64, w: f64, h: f64) {
    layer.add_line(Line {
        points: rect_ring(x, top_y, w, h),
        is_closed: true,
    });
}
