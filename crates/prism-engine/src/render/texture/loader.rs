use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// Decoded RGBA8 image ready for upload.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 rows, top row first.
    pub rgba: Vec<u8>,
}

/// Reasons a texture never arrives or cannot be uploaded. None of them are
/// fatal: the placeholder stays bound.
#[derive(Debug, thiserror::Error)]
pub enum TextureLoadError {
    #[error("failed to load texture {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("texture loader for {0} stopped without a result")]
    Disconnected(PathBuf),

    #[error("texture is {width}x{height}; the device accepts 1 to {max} texels per side")]
    Unsupported { width: u32, height: u32, max: u32 },

    #[error("texture pixel buffer holds {len} bytes, expected {width}x{height} RGBA8")]
    Malformed { width: u32, height: u32, len: usize },
}

type LoadResult = Result<DecodedImage, TextureLoadError>;

/// Reads and decodes an image file into RGBA8.
pub fn load_image(path: &Path) -> LoadResult {
    let image = image::open(path).map_err(|source| TextureLoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = image.into_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(DecodedImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

/// Fire-and-forget image load on a background thread.
///
/// The result is delivered over a single-consumer channel and picked up by
/// [`TextureLoader::poll`], which the render loop calls once per frame. The
/// texture is therefore only ever replaced between frames, on the render thread.
#[derive(Debug)]
pub struct TextureLoader {
    path: PathBuf,
    rx: Option<Receiver<LoadResult>>,
}

impl TextureLoader {
    /// Starts loading `path` and returns immediately.
    pub fn spawn(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (tx, rx) = mpsc::channel();

        let thread_path = path.clone();
        let spawned = thread::Builder::new()
            .name("prism-texture-loader".to_string())
            .spawn(move || {
                let result = load_image(&thread_path);
                // The receiver is gone if the renderer was dropped first.
                let _ = tx.send(result);
            });

        // On spawn failure the sender was dropped with the closure, so the next
        // poll reports `Disconnected`.
        if let Err(e) = spawned {
            log::warn!("could not start texture loader thread: {e}");
        }

        log::debug!("requested texture {}", path.display());
        Self { path, rx: Some(rx) }
    }

    #[cfg(test)]
    fn from_receiver(path: impl Into<PathBuf>, rx: Receiver<LoadResult>) -> Self {
        Self {
            path: path.into(),
            rx: Some(rx),
        }
    }

    /// Returns the load result once it is available; `None` while the load is
    /// still running and on every call after the result was taken.
    pub fn poll(&mut self) -> Option<LoadResult> {
        let rx = self.rx.as_ref()?;
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                Err(TextureLoadError::Disconnected(self.path.clone()))
            }
        };
        self.rx = None;
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("prism-{}-{name}", std::process::id()))
    }

    fn wait_for(loader: &mut TextureLoader) -> LoadResult {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(result) = loader.poll() {
                return result;
            }
            assert!(Instant::now() < deadline, "texture loader timed out");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn pending_until_result_arrives() {
        let (tx, rx) = mpsc::channel();
        let mut loader = TextureLoader::from_receiver("box.png", rx);

        assert!(loader.poll().is_none());
        assert!(loader.rx.is_some());

        tx.send(Ok(DecodedImage {
            width: 1,
            height: 1,
            rgba: vec![1, 2, 3, 4],
        }))
        .unwrap();

        let image = loader.poll().unwrap().unwrap();
        assert_eq!(image.rgba, [1, 2, 3, 4]);
        assert!(loader.rx.is_none());
        assert!(loader.poll().is_none());
    }

    #[test]
    fn dropped_sender_reports_disconnect_once() {
        let (tx, rx) = mpsc::channel::<LoadResult>();
        let mut loader = TextureLoader::from_receiver("box.png", rx);
        drop(tx);

        assert!(matches!(
            loader.poll(),
            Some(Err(TextureLoadError::Disconnected(_)))
        ));
        assert!(loader.poll().is_none());
    }

    #[test]
    fn loads_png_from_disk() {
        let path = temp_path("checker.png");
        let mut img = image::RgbaImage::new(4, 2);
        img.put_pixel(3, 1, image::Rgba([10, 20, 30, 255]));
        img.save(&path).unwrap();

        let mut loader = TextureLoader::spawn(&path);
        let decoded = wait_for(&mut loader).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!((decoded.width, decoded.height), (4, 2));
        assert_eq!(decoded.rgba.len(), 4 * 2 * 4);
        let last = &decoded.rgba[decoded.rgba.len() - 4..];
        assert_eq!(last, [10, 20, 30, 255]);
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let mut loader = TextureLoader::spawn(temp_path("does-not-exist.png"));
        match wait_for(&mut loader) {
            Err(TextureLoadError::Decode { path, .. }) => {
                let name = format!("prism-{}-does-not-exist.png", std::process::id());
                assert!(path.ends_with(name));
            }
            other => panic!("expected decode error, got {other:?}"),
        }
    }
}
