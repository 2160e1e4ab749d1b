//! Image content negotiation.

/// Image representations served by `/image/*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Webp,
    Svg,
    Gif,
}

impl ImageFormat {
    /// Asset file name under `<STATIC_DIR>/images/`.
    pub fn file_name(self) -> &'static str {
        match self {
            ImageFormat::Png => "pig_icon.png",
            ImageFormat::Jpeg => "jackal.jpg",
            ImageFormat::Webp => "wolf_1.webp",
            ImageFormat::Svg => "svg_logo.svg",
            ImageFormat::Gif => "animated.gif",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Webp => "image/webp",
            ImageFormat::Svg => "image/svg+xml",
            ImageFormat::Gif => "image/gif",
        }
    }
}

/// Pick an image format for an `Accept` header.
///
/// Absent or blank ⇒ GIF. Otherwise the first media type found, in the
/// order webp, gif, svg, jpeg, png (or `image/*`). `None` means 406.
pub fn negotiate_image(accept: Option<&str>) -> Option<ImageFormat> {
    let accept = match accept.map(str::trim) {
        None | Some("") => return Some(ImageFormat::Gif),
        Some(a) => a,
    };

    if accept.contains("image/webp") {
        Some(ImageFormat::Webp)
    } else if accept.contains("image/gif") {
        Some(ImageFormat::Gif)
    } else if accept.contains("image/svg+xml") {
        Some(ImageFormat::Svg)
    } else if accept.contains("image/jpeg") {
        Some(ImageFormat::Jpeg)
    } else if accept.contains("image/png") || accept.contains("image/*") {
        Some(ImageFormat::Png)
    } else {
        None
    }
}
