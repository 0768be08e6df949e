//! Dominant color extraction from cover art
//!
//! Downsamples the image, samples opaque pixels and runs a small k-means.
//! The largest cluster's centroid is the dominant color.

use crate::error::{PlaybackError, Result};
use crate::types::Rgb;
use async_trait::async_trait;
use image::imageops::FilterType;
use std::time::Duration;
use tracing::debug;

const THUMBNAIL_SIZE: u32 = 64;
const MAX_SAMPLES: usize = 2048;
const CLUSTERS: usize = 4;
const MAX_ITERATIONS: usize = 8;

/// Source of theming colors for artwork
#[async_trait]
pub trait ArtworkPalette: Send + Sync {
    /// Dominant color of the artwork at `artwork_url`
    async fn dominant_color(&self, artwork_url: &str) -> Result<Rgb>;
}

/// Fetches artwork over HTTP and analyses it with the `image` crate
#[derive(Debug, Clone)]
pub struct HttpArtworkPalette {
    http: reqwest::Client,
}

impl HttpArtworkPalette {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PlaybackError::Artwork(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl ArtworkPalette for HttpArtworkPalette {
    async fn dominant_color(&self, artwork_url: &str) -> Result<Rgb> {
        debug!(url = %artwork_url, "Fetching artwork");

        let response = self
            .http
            .get(artwork_url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| PlaybackError::Artwork(e.to_string()))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PlaybackError::Artwork(e.to_string()))?;

        tokio::task::spawn_blocking(move || dominant_color_from_bytes(&bytes))
            .await
            .map_err(|e| PlaybackError::Artwork(e.to_string()))?
    }
}

/// Decode an encoded image and compute its dominant color
pub fn dominant_color_from_bytes(bytes: &[u8]) -> Result<Rgb> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| PlaybackError::Artwork(format!("Failed to decode artwork: {e}")))?;

    let small = image
        .resize(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Nearest)
        .to_rgba8();

    let samples = sample_pixels(small.pixels().map(|p| p.0), MAX_SAMPLES);
    dominant_color(&samples)
        .ok_or_else(|| PlaybackError::Artwork("artwork has no opaque pixels".to_string()))
}

fn sample_pixels(pixels: impl ExactSizeIterator<Item = [u8; 4]>, max_samples: usize) -> Vec<[f32; 3]> {
    let total = pixels.len();
    if total == 0 || max_samples == 0 {
        return Vec::new();
    }

    let step = (total / max_samples).max(1);
    pixels
        .step_by(step)
        .filter(|[_, _, _, a]| *a >= 16)
        .map(|[r, g, b, _]| [f32::from(r), f32::from(g), f32::from(b)])
        .take(max_samples)
        .collect()
}

fn squared_distance(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

fn nearest(centroids: &[[f32; 3]], sample: &[f32; 3]) -> usize {
    centroids
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            squared_distance(a, sample).total_cmp(&squared_distance(b, sample))
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Centroid of the most populated k-means cluster
fn dominant_color(samples: &[[f32; 3]]) -> Option<Rgb> {
    if samples.is_empty() {
        return None;
    }

    let k = CLUSTERS.min(samples.len());
    let mut centroids: Vec<[f32; 3]> = (0..k).map(|i| samples[i * samples.len() / k]).collect();
    let mut counts = vec![0usize; k];

    for _ in 0..MAX_ITERATIONS {
        let mut sums = vec![[0f32; 3]; k];
        counts = vec![0usize; k];

        for sample in samples {
            let cluster = nearest(&centroids, sample);
            counts[cluster] += 1;
            for channel in 0..3 {
                sums[cluster][channel] += sample[channel];
            }
        }

        let mut moved = false;
        for cluster in 0..k {
            if counts[cluster] == 0 {
                continue;
            }
            let n = counts[cluster] as f32;
            let updated = [sums[cluster][0] / n, sums[cluster][1] / n, sums[cluster][2] / n];
            if squared_distance(&updated, &centroids[cluster]) > 0.25 {
                moved = true;
            }
            centroids[cluster] = updated;
        }

        if !moved {
            break;
        }
    }

    let (best, _) = counts.iter().enumerate().max_by_key(|(_, count)| **count)?;
    let [r, g, b] = centroids[best];
    Some(Rgb::new(
        r.round().clamp(0.0, 255.0) as u8,
        g.round().clamp(0.0, 255.0) as u8,
        b.round().clamp(0.0, 255.0) as u8,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn encode(image: &RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn solid_image_returns_its_color() {
        let image = RgbaImage::from_pixel(100, 100, Rgba([200, 30, 40, 255]));
        let color = dominant_color_from_bytes(&encode(&image)).unwrap();
        assert_eq!(color, Rgb::new(200, 30, 40));
    }

    #[test]
    fn majority_color_wins() {
        let image = RgbaImage::from_fn(100, 100, |x, _| {
            if x < 75 {
                Rgba([10, 120, 220, 255])
            } else {
                Rgba([250, 250, 250, 255])
            }
        });
        let color = dominant_color_from_bytes(&encode(&image)).unwrap();
        assert!(color.b > 200 && color.r < 40, "got {}", color);
    }

    #[test]
    fn transparent_image_has_no_color() {
        let image = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 0]));
        assert!(dominant_color_from_bytes(&encode(&image)).is_err());
    }

    #[test]
    fn garbage_bytes_fail() {
        assert!(matches!(
            dominant_color_from_bytes(b"definitely not an image"),
            Err(PlaybackError::Artwork(_))
        ));
    }
}
