//! Common test utilities and helpers for the card intake tests
//!
//! This module provides bitmap fixtures encoded as real image files and
//! classifier wrappers for observing the upload slot.

#![allow(dead_code)]

/// Bitmap fixtures encoded as PNG
pub mod fixtures {
    use std::io::Cursor;

    use card_intake::{MemoryFile, PortableImage};
    use image::{ImageFormat, Rgba, RgbaImage};

    pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    /// Encode a bitmap as PNG bytes
    pub fn png_bytes(image: &RgbaImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        image
            .write_to(&mut out, ImageFormat::Png)
            .expect("encode png fixture");
        out.into_inner()
    }

    /// Single-color bitmap
    pub fn solid(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
        RgbaImage::from_pixel(width, height, color)
    }

    /// 100x100 checkerboard of 10px cells with exactly 45% black pixels.
    ///
    /// The first nine cell rows alternate black/white (five black cells each);
    /// the last cell row is white.
    pub fn checkerboard_45() -> RgbaImage {
        RgbaImage::from_fn(100, 100, |x, y| {
            let (cx, cy) = (x / 10, y / 10);
            if cy < 9 && (cx + cy) % 2 == 0 {
                BLACK
            } else {
                WHITE
            }
        })
    }

    /// 100x100 bitmap whose first `black_rows` rows are black, the rest white.
    /// The black ratio is exactly `black_rows / 100`.
    pub fn stripes(black_rows: u32) -> RgbaImage {
        RgbaImage::from_fn(100, 100, |_, y| if y < black_rows { BLACK } else { WHITE })
    }

    pub fn png_file(name: &str, image: &RgbaImage) -> MemoryFile {
        MemoryFile::new(name, "image/png", png_bytes(image))
    }

    /// The data URI an accepted PNG fixture is expected to produce
    pub fn png_uri(image: &RgbaImage) -> PortableImage {
        PortableImage::encode("image/png", &png_bytes(image))
    }
}

/// Classifier wrappers for observing and timing the slot
pub mod mock_check {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use card_intake::{
        ClassificationVerdict, DecodeError, PlausibilityCheck, PortableImage,
        QrPlausibilityClassifier,
    };

    /// Counts classify calls, delegating to the real classifier
    #[derive(Default)]
    pub struct CountingCheck {
        calls: AtomicUsize,
        inner: QrPlausibilityClassifier,
    }

    impl CountingCheck {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PlausibilityCheck for CountingCheck {
        async fn classify(
            &self,
            image: &PortableImage,
        ) -> Result<ClassificationVerdict, DecodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.classify(image).await
        }
    }

    /// Delays classification of one specific image, then delegates
    pub struct SlowFor {
        slow: PortableImage,
        delay: Duration,
        inner: QrPlausibilityClassifier,
    }

    impl SlowFor {
        pub fn new(slow: PortableImage, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                slow,
                delay,
                inner: QrPlausibilityClassifier::new(),
            })
        }
    }

    #[async_trait]
    impl PlausibilityCheck for SlowFor {
        async fn classify(
            &self,
            image: &PortableImage,
        ) -> Result<ClassificationVerdict, DecodeError> {
            if *image == self.slow {
                tokio::time::sleep(self.delay).await;
            }
            self.inner.classify(image).await
        }
    }
}

/// Records every image handed to a slot's completion callback
pub mod recorder {
    use std::sync::{Arc, Mutex};

    use card_intake::PortableImage;

    #[derive(Clone, Default)]
    pub struct Completions(Arc<Mutex<Vec<PortableImage>>>);

    impl Completions {
        pub fn new() -> Self {
            Self::default()
        }

        /// Callback suitable for `UploadSlotControllerBuilder::on_complete`
        pub fn callback(&self) -> impl Fn(&PortableImage) + Send + Sync + 'static {
            let seen = self.0.clone();
            move |image| seen.lock().unwrap().push(image.clone())
        }

        pub fn all(&self) -> Vec<PortableImage> {
            self.0.lock().unwrap().clone()
        }

        pub fn count(&self) -> usize {
            self.0.lock().unwrap().len()
        }
    }
}
