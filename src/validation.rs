use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

use crate::{
    dto::upload::FileUpload,
    error::{ClientError, ClientResult},
};

pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
pub const MAX_VIDEO_BYTES: usize = 50 * 1024 * 1024;
pub const MAX_ADDITIONAL_IMAGES: usize = 5;
pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 2000;
pub const DISCOUNT_MIN: u32 = 1;
pub const DISCOUNT_MAX: u32 = 100;
pub const GENERATED_CODE_LEN: usize = 8;

static PH_MOBILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+63|0)?9\d{9}$").expect("valid phone regex"));
static OTP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{6}$").expect("valid otp regex"));
static DISCOUNT_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9]{4,20}$").expect("valid code regex"));
static CLOCK_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("valid time regex"));

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Philippine mobile number: `09XXXXXXXXX`, `+639XXXXXXXXX` or `9XXXXXXXXX`.
pub fn is_valid_ph_mobile(phone: &str) -> bool {
    PH_MOBILE.is_match(phone.trim())
}

pub fn is_valid_otp(otp: &str) -> bool {
    OTP.is_match(otp.trim())
}

pub fn is_valid_clock_time(time: &str) -> bool {
    CLOCK_TIME.is_match(time)
}

pub fn clamp_discount_value(value: i64) -> u32 {
    value.clamp(DISCOUNT_MIN as i64, DISCOUNT_MAX as i64) as u32
}

/// Normalises user-typed codes to the uppercase alphanumeric form the API stores.
pub fn normalize_discount_code(code: &str) -> String {
    code.trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

pub fn is_valid_discount_code(code: &str) -> bool {
    DISCOUNT_CODE.is_match(code)
}

/// Random candidate code; the server stays the authority on uniqueness.
pub fn generate_discount_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..GENERATED_CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

pub fn validate_image(upload: &FileUpload) -> ClientResult<()> {
    if !upload.mime.starts_with("image/") {
        return Err(ClientError::validation(format!(
            "{} is not an image file",
            upload.file_name
        )));
    }
    if upload.size() > MAX_IMAGE_BYTES {
        return Err(ClientError::validation(format!(
            "{} is larger than 10MB",
            upload.file_name
        )));
    }
    Ok(())
}

pub fn validate_video(upload: &FileUpload) -> ClientResult<()> {
    if upload.mime != "video/mp4" {
        return Err(ClientError::validation(format!(
            "{} must be an MP4 video",
            upload.file_name
        )));
    }
    if upload.size() > MAX_VIDEO_BYTES {
        return Err(ClientError::validation(format!(
            "{} is larger than 50MB",
            upload.file_name
        )));
    }
    Ok(())
}

pub fn validate_http_link(link: &str) -> ClientResult<()> {
    if link.starts_with("http://") || link.starts_with("https://") {
        Ok(())
    } else {
        Err(ClientError::validation(
            "Registration link must start with http:// or https://",
        ))
    }
}

pub fn require(value: &str, label: &str) -> ClientResult<()> {
    if value.trim().is_empty() {
        Err(ClientError::validation(format!("{label} is required")))
    } else {
        Ok(())
    }
}

pub fn max_chars(value: &str, max: usize, label: &str) -> ClientResult<()> {
    if value.chars().count() > max {
        Err(ClientError::validation(format!(
            "{label} must be at most {max} characters"
        )))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn philippine_mobile_numbers() {
        assert!(is_valid_ph_mobile("09123456789"));
        assert!(is_valid_ph_mobile("+639123456789"));
        assert!(is_valid_ph_mobile("09171234567"));
        assert!(!is_valid_ph_mobile("123456789"));
        assert!(!is_valid_ph_mobile("08123456789"));
        assert!(!is_valid_ph_mobile("0912345678"));
    }

    #[test]
    fn otp_must_be_six_digits() {
        assert!(is_valid_otp("123456"));
        assert!(!is_valid_otp("12345"));
        assert!(!is_valid_otp("12345a"));
        assert!(!is_valid_otp("1234567"));
    }

    #[test]
    fn discount_value_is_clamped() {
        assert_eq!(clamp_discount_value(150), 100);
        assert_eq!(clamp_discount_value(0), 1);
        assert_eq!(clamp_discount_value(-20), 1);
        assert_eq!(clamp_discount_value(35), 35);
    }

    #[test]
    fn generated_codes_are_uppercase_alphanumeric() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let code = generate_discount_code(&mut rng);
            assert_eq!(code.len(), GENERATED_CODE_LEN);
            assert!(is_valid_discount_code(&code), "{code}");
        }
    }

    #[test]
    fn code_normalization_strips_and_uppercases() {
        assert_eq!(normalize_discount_code(" summer-25 "), "SUMMER25");
    }

    #[test]
    fn file_limits() {
        let big = FileUpload::new("big.png", "image/png", vec![0; 12 * 1024 * 1024]);
        assert!(validate_image(&big).is_err());
        let ok = FileUpload::new("ok.png", "image/png", vec![0; 2 * 1024 * 1024]);
        assert!(validate_image(&ok).is_ok());
        let pdf = FileUpload::new("doc.pdf", "application/pdf", vec![0; 10]);
        assert!(validate_image(&pdf).is_err());

        let mov = FileUpload::new("clip.mov", "video/quicktime", vec![0; 10]);
        assert!(validate_video(&mov).is_err());
        let mp4 = FileUpload::new("clip.mp4", "video/mp4", vec![0; 10]);
        assert!(validate_video(&mp4).is_ok());
    }

    #[test]
    fn clock_times() {
        assert!(is_valid_clock_time("09:30"));
        assert!(is_valid_clock_time("23:59"));
        assert!(!is_valid_clock_time("24:00"));
        assert!(!is_valid_clock_time("9:30"));
    }
}
