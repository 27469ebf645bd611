//! Payment and contact hand-off links.
//!
//! Payment itself happens outside the storefront: the customer scans a UPI
//! code, then sends a screenshot to the trainer over a messaging link.

use fitplan_core::Price;
use qrcode::render::svg;
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode};
use thiserror::Error;

use crate::config::PaymentConfig;

const MESSAGING_BASE: &str = "https://t.me/+";

/// Smallest rendered edge of a code, in pixels.
const QR_MIN_SIZE: u32 = 220;

/// A payload too long to fit in a QR code.
#[derive(Debug, Error)]
#[error("could not encode QR code: {0}")]
pub struct QrRenderError(#[from] QrError);

/// UPI deep link for paying `price` to the configured payee.
///
/// Query values are percent-encoded; the amount uses the plain decimal form
/// (`1199`, not `₹1,199`).
#[must_use]
pub fn upi_uri(config: &PaymentConfig, price: &Price) -> String {
    format!(
        "upi://pay?pa={}&pn={}&am={}&cu={}",
        urlencoding::encode(&config.upi_id),
        urlencoding::encode(&config.payee_name),
        urlencoding::encode(&price.plain_amount()),
        price.currency_code.code(),
    )
}

/// Messaging link to the trainer's phone number.
#[must_use]
pub fn contact_uri(config: &PaymentConfig) -> String {
    let digits: String = config
        .contact_phone
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    format!("{MESSAGING_BASE}{digits}")
}

/// Render `payload` as an inline SVG QR code.
///
/// Medium error correction keeps the codes scannable from a phone screen
/// photographed at an angle.
///
/// # Errors
///
/// Returns [`QrRenderError`] if the payload does not fit in a QR code.
pub fn qr_svg(payload: &str) -> Result<String, QrRenderError> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)?;
    let mut image = code
        .render::<svg::Color<'_>>()
        .min_dimensions(QR_MIN_SIZE, QR_MIN_SIZE)
        .dark_color(svg::Color("#111111"))
        .light_color(svg::Color("#ffffff"))
        .build();

    // Drop the XML declaration; the SVG is embedded in HTML
    if let Some(start) = image.find("<svg") {
        image = image.split_off(start);
    }
    Ok(image)
}

/// Steps shown under the payment codes.
pub const FOLLOW_UP_STEPS: [&str; 4] = [
    "Make the payment using the QR code",
    "Take a screenshot of the payment confirmation",
    "Send the screenshot to us on Telegram",
    "Receive your personalized plan within 24 hours",
];

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> PaymentConfig {
        PaymentConfig {
            upi_id: "gym.trainer@okaxis".to_string(),
            payee_name: "Gym Trainer".to_string(),
            contact_phone: "+91 98765 43210".to_string(),
        }
    }

    #[test]
    fn test_upi_uri_encodes_price_and_payee() {
        assert_eq!(
            upi_uri(&config(), &Price::inr(1199)),
            "upi://pay?pa=gym.trainer%40okaxis&pn=Gym%20Trainer&am=1199&cu=INR"
        );
    }

    #[test]
    fn test_contact_uri_keeps_digits_only() {
        assert_eq!(contact_uri(&config()), "https://t.me/+919876543210");
    }

    #[test]
    fn test_qr_svg_is_inline_and_payload_specific() {
        let vegan = qr_svg(&upi_uri(&config(), &Price::inr(1199))).unwrap();
        let veg = qr_svg(&upi_uri(&config(), &Price::inr(999))).unwrap();

        assert!(vegan.starts_with("<svg"));
        assert!(vegan.trim_end().ends_with("</svg>"));
        assert_ne!(vegan, veg);
        assert_eq!(vegan, qr_svg(&upi_uri(&config(), &Price::inr(1199))).unwrap());
    }

    #[test]
    fn test_qr_svg_rejects_oversized_payload() {
        let payload = "x".repeat(8000);
        assert!(qr_svg(&payload).is_err());
    }
}
