//! Helpers behind the `qrlocate` binary
//!
//! Loading page images from disk, pre-filter summaries and one-line
//! renderings of scan outcomes.

use crate::detector::planner::RegionPlanner;
use crate::detector::scoring::{ContrastCheck, EdgeDensityScorer};
use crate::error::PixelAccessError;
use crate::models::{PixelBuffer, PixelSource, ScanOutcome, ScoredRegion};
use crate::ScanOptions;
use image::GenericImageView;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Failure loading a page image from disk
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be opened or decoded
    #[error("cannot load image: {0}")]
    Image(#[from] image::ImageError),
    /// The decoded image did not form a valid pixel buffer
    #[error(transparent)]
    Buffer(#[from] PixelAccessError),
}

fn max_dim_from_env() -> Option<u32> {
    match env::var("QR_MAX_DIM") {
        Ok(value) => match value.trim().parse::<u32>() {
            Ok(0) => None,
            Ok(v) => Some(v),
            Err(_) => None,
        },
        Err(_) => None,
    }
}

/// Load an image file as an RGBA8 page buffer
///
/// `QR_MAX_DIM` optionally caps the longest side, resized with point
/// sampling so module edges stay sharp.
pub fn load_page<P: AsRef<Path>>(path: P) -> Result<PixelBuffer, LoadError> {
    let img = image::open(path)?;
    let img = match max_dim_from_env() {
        Some(max_dim) if img.width().max(img.height()) > max_dim => {
            img.resize(max_dim, max_dim, image::imageops::FilterType::Nearest)
        }
        _ => img,
    };
    let (width, height) = img.dimensions();
    Ok(PixelBuffer::new(width, height, img.to_rgba8().into_raw())?)
}

/// Page-level diagnostics shown by the CLI
#[derive(Debug, Clone, PartialEq)]
pub struct PageSummary {
    /// Page width
    pub width: u32,
    /// Page height
    pub height: u32,
    /// Coarse dark-pixel ratio
    pub dark_ratio: f32,
    /// Whether the contrast check passes
    pub has_contrast: bool,
    /// Every planned region with its score
    pub regions: Vec<ScoredRegion>,
}

/// Run the pre-filters on `page` without decoding anything
pub fn summarize(page: &PixelBuffer, options: &ScanOptions) -> PageSummary {
    let verdict = ContrastCheck::from_options(options).evaluate(page);
    let scorer = EdgeDensityScorer::from_options(options);
    let regions = RegionPlanner::plan(page.width(), page.height())
        .into_iter()
        .filter_map(|region| {
            let window = page.read_region(&region).ok()?;
            Some(scorer.score(region, &window))
        })
        .collect();
    PageSummary {
        width: page.width(),
        height: page.height(),
        dark_ratio: verdict.dark_ratio,
        has_contrast: verdict.has_contrast,
        regions,
    }
}

/// One-line rendering of a scan outcome
pub fn describe_outcome(outcome: &ScanOutcome) -> String {
    match outcome {
        ScanOutcome::NotFound => "no QR code".to_string(),
        ScanOutcome::Match(m) => {
            let corners: Vec<String> = m
                .quad
                .iter()
                .map(|p| format!("({:.1},{:.1})", p.x, p.y))
                .collect();
            format!(
                "{:?} from {} at {}x zoom, side {:.1}px, corners {}",
                m.text,
                m.source_region_label,
                m.zoom_factor,
                m.quad[0].distance(&m.quad[1]),
                corners.join(" ")
            )
        }
    }
}

/// Image files under `root`, sorted, optionally truncated to `limit`
pub fn page_iter<P: AsRef<Path>>(root: P, limit: Option<usize>) -> impl Iterator<Item = PathBuf> {
    let mut images = collect_images(root.as_ref());
    images.sort();
    if let Some(limit) = limit {
        images.truncate(limit);
    }
    images.into_iter()
}

fn collect_images(root: &Path) -> Vec<PathBuf> {
    let mut stack = vec![root.to_path_buf()];
    let mut images = Vec::new();

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            if let Some(ext) = path.extension() {
                let ext = ext.to_string_lossy().to_lowercase();
                if ext == "png" || ext == "jpg" || ext == "jpeg" || ext == "gif" || ext == "bmp" {
                    images.push(path);
                }
            }
        }
    }

    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GlobalMatch, Point};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEMP_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_dir() -> PathBuf {
        let mut path = env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before UNIX epoch")
            .as_nanos();
        let sequence = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        path.push(format!("qr_locator_tools_{nanos}_{sequence}"));
        fs::create_dir_all(&path).expect("failed to create temp dir");
        path
    }

    #[test]
    fn page_iter_filters_and_sorts() {
        let dir = temp_dir();
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("b.png"), b"").unwrap();
        fs::write(dir.join("a.JPG"), b"").unwrap();
        fs::write(dir.join("notes.txt"), b"").unwrap();
        fs::write(dir.join("nested/c.bmp"), b"").unwrap();

        let names: Vec<_> = page_iter(&dir, None)
            .map(|p| p.strip_prefix(&dir).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.JPG"),
                PathBuf::from("b.png"),
                PathBuf::from("nested/c.bmp")
            ]
        );
        assert_eq!(page_iter(&dir, Some(1)).count(), 1);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn load_page_round_trips_png() {
        let dir = temp_dir();
        let path = dir.join("page.png");
        let mut img = image::RgbaImage::new(4, 3);
        img.put_pixel(1, 2, image::Rgba([10, 20, 30, 255]));
        img.save(&path).unwrap();

        let page = load_page(&path).unwrap();
        assert_eq!((page.width(), page.height()), (4, 3));
        assert_eq!(page.pixel(1, 2), [10, 20, 30, 255]);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn load_page_reports_missing_file() {
        let err = load_page("/nonexistent/qr_locator/page.png").unwrap_err();
        assert!(matches!(err, LoadError::Image(_)));
    }

    #[test]
    fn summarize_blank_page() {
        let page = PixelBuffer::filled(300, 300, [255; 4]).unwrap();
        let summary = summarize(&page, &ScanOptions::default());
        assert!(!summary.has_contrast);
        assert_eq!(summary.regions.len(), 3);
        assert!(summary.regions.iter().all(|r| !r.worth_decoding));
    }

    #[test]
    fn describe_outcome_formats_match() {
        let outcome = ScanOutcome::Match(GlobalMatch {
            text: "hi".into(),
            quad: [
                Point::new(1.0, 2.0),
                Point::new(4.0, 6.0),
                Point::new(0.0, 9.0),
                Point::new(-3.0, 5.0),
            ],
            source_region_label: "top-left".into(),
            zoom_factor: 1.0,
        });
        let line = describe_outcome(&outcome);
        assert!(line.starts_with("\"hi\" from top-left"));
        assert!(line.contains("side 5.0px"), "{}", line);
        assert!(line.contains("(1.0,2.0)"));
        assert_eq!(describe_outcome(&ScanOutcome::NotFound), "no QR code");
    }
}
