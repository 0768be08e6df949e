//! HTTP artwork palette against a mock image host

use image::{ImageFormat, Rgba, RgbaImage};
use nghe_playback::{ArtworkPalette, HttpArtworkPalette, PlaybackError, Rgb};
use std::io::Cursor;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn png(color: [u8; 4]) -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbaImage::from_pixel(32, 32, Rgba(color))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

#[tokio::test]
async fn fetches_and_analyses_artwork() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/covers/1.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "image/png")
                .set_body_bytes(png([20, 200, 90, 255])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let palette = HttpArtworkPalette::new(Duration::from_secs(5)).unwrap();
    let color = palette
        .dominant_color(&format!("{}/covers/1.png", server.uri()))
        .await
        .unwrap();

    assert_eq!(color, Rgb::new(20, 200, 90));
}

#[tokio::test]
async fn missing_artwork_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let palette = HttpArtworkPalette::new(Duration::from_secs(5)).unwrap();
    let result = palette
        .dominant_color(&format!("{}/covers/404.png", server.uri()))
        .await;

    assert!(matches!(result, Err(PlaybackError::Artwork(_))));
}

#[tokio::test]
async fn non_image_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not found</html>"))
        .mount(&server)
        .await;

    let palette = HttpArtworkPalette::new(Duration::from_secs(5)).unwrap();
    let result = palette
        .dominant_color(&format!("{}/covers/2.png", server.uri()))
        .await;

    assert!(matches!(result, Err(PlaybackError::Artwork(_))));
}
