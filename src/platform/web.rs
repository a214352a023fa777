//! Browser glue: image loading and viewport measurement

use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlImageElement;

use crate::assets::{AssetCatalog, ImageInfo};

/// Where to load each image from
#[derive(Debug, Clone)]
pub struct ImageSources {
    pub background: String,
    pub bird: String,
    pub pipes: Vec<String>,
}

impl Default for ImageSources {
    fn default() -> Self {
        Self {
            background: "assets/bg.jpg".to_string(),
            bird: "assets/bird.png".to_string(),
            pipes: vec![
                "assets/pillar.png".to_string(),
                "assets/pillar2.png".to_string(),
            ],
        }
    }
}

/// Decoded `<img>` handles, kept for texture upload.
/// `pipes` has the same order as `AssetCatalog::pipe_variants`.
#[derive(Debug, Clone, Default)]
pub struct ImageSet {
    pub background: Option<HtmlImageElement>,
    pub bird: Option<HtmlImageElement>,
    pub pipes: Vec<HtmlImageElement>,
}

/// Everything the asset loader produced
#[derive(Debug, Clone, Default)]
pub struct LoadedAssets {
    /// Sizes the simulation sizes itself from
    pub catalog: AssetCatalog,
    /// The images themselves, for the renderer
    pub images: ImageSet,
}

/// Load one image and wait for it to decode. Failures are logged and give
/// `None`.
pub async fn load_image(src: &str) -> Option<HtmlImageElement> {
    let image = HtmlImageElement::new().ok()?;
    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        image.set_onload(Some(&resolve));
        image.set_onerror(Some(&reject));
    });
    image.set_src(src);

    let loaded = JsFuture::from(promise).await;
    image.set_onload(None);
    image.set_onerror(None);

    match loaded {
        Ok(_) => {
            log::debug!(
                "Loaded {} ({}x{})",
                src,
                image.natural_width(),
                image.natural_height()
            );
            Some(image)
        }
        Err(_) => {
            log::warn!("Failed to load image {}", src);
            None
        }
    }
}

fn info(image: &HtmlImageElement) -> ImageInfo {
    ImageInfo::new(image.natural_width() as f32, image.natural_height() as f32)
}

/// Load every image; whatever fails is simply absent
pub async fn load_assets(sources: &ImageSources, end_cue_count: usize) -> LoadedAssets {
    let background = load_image(&sources.background).await;
    let bird = load_image(&sources.bird).await;

    let mut pipes = Vec::with_capacity(sources.pipes.len());
    for src in &sources.pipes {
        if let Some(image) = load_image(src).await {
            pipes.push(image);
        }
    }

    log::info!(
        "Assets loaded: background={} bird={} pipes={}",
        background.is_some(),
        bird.is_some(),
        pipes.len()
    );

    let catalog = AssetCatalog {
        pipe_variants: pipes.iter().map(info).collect(),
        background: background.as_ref().map(info),
        bird: bird.as_ref().map(info),
        end_cue_count,
    };

    LoadedAssets {
        catalog,
        images: ImageSet {
            background,
            bird,
            pipes,
        },
    }
}

/// Viewport size in CSS pixels plus device pixel ratio
pub fn viewport() -> (f32, f32, f32) {
    let Some(window) = web_sys::window() else {
        return (0.0, 0.0, 1.0);
    };
    let width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    (width as f32, height as f32, window.device_pixel_ratio() as f32)
}
