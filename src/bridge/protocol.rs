//! Custom protocol handlers for efficient data transfer
//!
//! Implements the `frame://` protocol for direct binary transfer of
//! rendered frames, bypassing Tauri's IPC JSON serialization.

use image::{codecs::jpeg::JpegEncoder, ImageBuffer, ImageEncoder, Rgba};
use tauri::http::Response as HttpResponse;
use tracing::warn;

use super::shared_state::{SharedFrameBuffer, SharedRenderStats};
use crate::config::compression::JPEG_QUALITY;

type Response = HttpResponse<Vec<u8>>;

/// Handle requests to the custom `frame://` protocol
///
/// Supported endpoints:
/// - `frame` or `frame.jpg`: JPEG-compressed frame
/// - `frame.raw`: raw RGBA frame
/// - `stats`: render statistics as JSON
pub fn handle_frame_protocol(
    uri_path: &str,
    buffer: &SharedFrameBuffer,
    stats: &SharedRenderStats,
) -> Response {
    let resource = uri_path.trim_start_matches('/');

    match resource {
        "frame" | "frame.jpg" => handle_jpeg_frame(buffer),
        "frame.raw" => handle_raw_frame(buffer),
        "stats" => handle_stats(stats),
        _ => text_response(404, "Not Found"),
    }
}

/// Handle JPEG-compressed frame request
fn handle_jpeg_frame(buffer: &SharedFrameBuffer) -> Response {
    let Ok(guard) = buffer.0.lock() else {
        return text_response(500, "Frame buffer unavailable");
    };

    let Some(frame) = guard.as_ref() else {
        return text_response(503, "Frame not ready");
    };

    let Some(img) =
        ImageBuffer::<Rgba<u8>, _>::from_raw(frame.width, frame.height, frame.data.clone())
    else {
        warn!(
            width = frame.width,
            height = frame.height,
            len = frame.data.len(),
            "frame buffer does not match its dimensions"
        );
        return text_response(500, "Frame buffer corrupt");
    };

    // JPEG has no alpha channel
    let rgb_img = image::DynamicImage::ImageRgba8(img).to_rgb8();

    let mut jpeg_data = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut jpeg_data, JPEG_QUALITY);
    if let Err(err) = encoder.write_image(
        rgb_img.as_raw(),
        frame.width,
        frame.height,
        image::ExtendedColorType::Rgb8,
    ) {
        warn!(%err, "jpeg encoding failed");
        return text_response(500, "Encoding failed");
    }

    frame_response("image/jpeg", frame.width, frame.height, jpeg_data)
}

/// Handle raw RGBA frame request
fn handle_raw_frame(buffer: &SharedFrameBuffer) -> Response {
    let Ok(guard) = buffer.0.lock() else {
        return text_response(500, "Frame buffer unavailable");
    };

    match guard.as_ref() {
        Some(frame) => frame_response(
            "application/octet-stream",
            frame.width,
            frame.height,
            frame.data.clone(),
        ),
        None => text_response(503, "Frame not ready"),
    }
}

/// Handle render stats request
fn handle_stats(stats: &SharedRenderStats) -> Response {
    let json = stats
        .0
        .lock()
        .ok()
        .and_then(|guard| serde_json::to_vec(&*guard).ok())
        .unwrap_or_default();

    HttpResponse::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(json)
        .unwrap()
}

fn frame_response(content_type: &str, width: u32, height: u32, body: Vec<u8>) -> Response {
    HttpResponse::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("X-Frame-Width", width.to_string())
        .header("X-Frame-Height", height.to_string())
        .header("Access-Control-Allow-Origin", "*")
        .header(
            "Access-Control-Expose-Headers",
            "X-Frame-Width, X-Frame-Height",
        )
        .body(body)
        .unwrap()
}

fn text_response(status: u16, message: &str) -> Response {
    HttpResponse::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .body(message.as_bytes().to_vec())
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::shared_state::FramePixels;

    fn buffer_with_frame(width: u32, height: u32) -> SharedFrameBuffer {
        let buffer = SharedFrameBuffer::default();
        *buffer.0.lock().unwrap() = Some(FramePixels {
            data: vec![128u8; (width * height * 4) as usize],
            width,
            height,
        });
        buffer
    }

    #[test]
    fn test_unknown_resource_is_404() {
        let response = handle_frame_protocol(
            "/nope",
            &SharedFrameBuffer::default(),
            &SharedRenderStats::default(),
        );
        assert_eq!(response.status(), 404);
    }

    #[test]
    fn test_missing_frame_is_503() {
        for endpoint in ["/frame", "/frame.jpg", "/frame.raw"] {
            let response = handle_frame_protocol(
                endpoint,
                &SharedFrameBuffer::default(),
                &SharedRenderStats::default(),
            );
            assert_eq!(response.status(), 503, "{endpoint}");
        }
    }

    #[test]
    fn test_raw_frame_carries_dimensions() {
        let buffer = buffer_with_frame(4, 2);
        let response =
            handle_frame_protocol("/frame.raw", &buffer, &SharedRenderStats::default());

        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["X-Frame-Width"], "4");
        assert_eq!(response.headers()["X-Frame-Height"], "2");
        assert_eq!(response.body().len(), 4 * 2 * 4);
    }

    #[test]
    fn test_jpeg_frame_encodes() {
        let buffer = buffer_with_frame(16, 16);
        let response =
            handle_frame_protocol("/frame.jpg", &buffer, &SharedRenderStats::default());

        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["Content-Type"], "image/jpeg");
        // JPEG SOI marker
        assert_eq!(&response.body()[..2], &[0xff, 0xd8]);
    }

    #[test]
    fn test_stats_endpoint_returns_json() {
        let stats = SharedRenderStats::default();
        stats.0.lock().unwrap().frame_count = 7;

        let response = handle_frame_protocol("/stats", &SharedFrameBuffer::default(), &stats);
        assert_eq!(response.status(), 200);

        let parsed: crate::bridge::shared_state::RenderStats =
            serde_json::from_slice(response.body()).unwrap();
        assert_eq!(parsed.frame_count, 7);
    }
}
