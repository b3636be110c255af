//! Browser-style feature probes: cookies, fonts, rendering and audio

use std::sync::Arc;

use async_trait::async_trait;
use dfp_error::Result;

use super::Collector;
use crate::constants::{fonts, render};
use crate::data::{FeaturesInfo, Signal, SignalCategory};
use crate::platform::{canvas_fingerprint, webgl_fingerprint, FeaturesSource, Probe};

pub struct FeaturesCollector {
    source: Arc<dyn FeaturesSource>,
}

impl FeaturesCollector {
    pub fn new(source: Arc<dyn FeaturesSource>) -> Self {
        Self { source }
    }

    /// Canvas and WebGL digests from one fresh surface
    fn render_digests(&self) -> (String, String) {
        let mut surface = self
            .source
            .create_surface(render::CANVAS_WIDTH, render::CANVAS_HEIGHT);
        let canvas = canvas_fingerprint(surface.as_mut());
        let webgl = webgl_fingerprint(surface.as_mut());
        (canvas, webgl)
    }
}

#[async_trait]
impl Collector for FeaturesCollector {
    fn category(&self) -> SignalCategory {
        SignalCategory::Features
    }

    async fn collect(&self) -> Result<Signal> {
        let fonts = detect_fonts(self.source.as_ref()).await;
        // The surface is not Send; keep it out of the async state
        let (canvas, webgl) = self.render_digests();

        Ok(FeaturesInfo {
            cookies_enabled: self.source.cookies_enabled(),
            fonts,
            canvas,
            webgl,
            audio_context: self.source.audio_context(),
        }
        .into())
    }
}

/// Candidate fonts available on `source`, in candidate order
///
/// A font counts as available on the first base family whose check is
/// positive. Failed checks count as absent; an unsupported check means the
/// source cannot detect fonts at all and yields an empty list.
pub async fn detect_fonts(source: &dyn FeaturesSource) -> Vec<String> {
    let mut detected = Vec::new();
    for font in fonts::CANDIDATES {
        for base in fonts::BASE_FONTS {
            let query = format!("{} \"{}\", {}", fonts::QUERY_SIZE, font, base);
            match source.check_font(&query).await {
                Probe::Supported(true) => {
                    detected.push(font.to_string());
                    break;
                }
                Probe::Supported(false) | Probe::Failed(_) => {}
                Probe::Unsupported => return Vec::new(),
            }
        }
    }
    detected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_string;
    use crate::platform::{
        DebugRendererInfo, MockFeaturesSource, NullSurface, RecordedSurface, RenderSurface,
    };
    use std::sync::Mutex;

    fn base_source() -> MockFeaturesSource {
        let mut source = MockFeaturesSource::new();
        source.expect_cookies_enabled().return_const(true);
        source.expect_audio_context().return_const(false);
        source
    }

    #[tokio::test]
    async fn test_fonts_detected_in_candidate_order() {
        let queries = Arc::new(Mutex::new(Vec::new()));
        let seen = queries.clone();

        let mut source = base_source();
        source.expect_check_font().returning(move |query| {
            seen.lock().unwrap().push(query.to_string());
            let hit = (query.contains("\"Verdana\"") && query.ends_with("serif"))
                || query == "12px \"Arial\", monospace";
            Probe::Supported(hit)
        });

        let fonts = detect_fonts(&source).await;
        assert_eq!(fonts, vec!["Arial".to_string(), "Verdana".to_string()]);

        let queries = queries.lock().unwrap();
        // Arial stops after its first base family
        assert_eq!(queries[0], "12px \"Arial\", monospace");
        assert_eq!(queries[1], "12px \"Arial Black\", monospace");
        // Verdana matches on "sans-serif", the second base family
        assert!(queries.contains(&"12px \"Verdana\", sans-serif".to_string()));
        assert!(!queries.contains(&"12px \"Verdana\", serif".to_string()));
    }

    #[tokio::test]
    async fn test_unsupported_font_checks_yield_empty_list() {
        let mut source = base_source();
        source
            .expect_check_font()
            .times(1)
            .returning(|_| Probe::Unsupported);
        assert!(detect_fonts(&source).await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_font_checks_count_as_absent() {
        let mut source = base_source();
        source.expect_check_font().returning(|query| {
            if query.contains("\"Tahoma\"") {
                Probe::Supported(true)
            } else {
                Probe::Failed("font loading blocked".into())
            }
        });
        assert_eq!(detect_fonts(&source).await, vec!["Tahoma".to_string()]);
    }

    #[tokio::test]
    async fn test_features_without_rendering_contexts() {
        let mut source = base_source();
        source.expect_check_font().returning(|_| Probe::Unsupported);
        source
            .expect_create_surface()
            .times(1)
            .returning(|w, h| Box::new(NullSurface::new(w, h)) as Box<dyn RenderSurface>);

        let signal = FeaturesCollector::new(Arc::new(source)).collect().await.unwrap();
        assert_eq!(
            signal,
            Signal::Features(FeaturesInfo {
                cookies_enabled: true,
                fonts: vec![],
                canvas: String::new(),
                webgl: String::new(),
                audio_context: false,
            })
        );
    }

    #[tokio::test]
    async fn test_fresh_surface_per_collection() {
        let info = DebugRendererInfo {
            vendor: "Mesa".into(),
            renderer: "llvmpipe".into(),
        };
        let expected_webgl = hash_string("Mesa~llvmpipe");

        let mut source = base_source();
        source.expect_check_font().returning(|_| Probe::Supported(false));
        source.expect_create_surface().times(2).returning(move |w, h| {
            assert_eq!((w, h), (200, 30));
            Box::new(RecordedSurface::new(w, h, Some(vec![9, 9]), Some(info.clone())))
                as Box<dyn RenderSurface>
        });

        let collector = FeaturesCollector::new(Arc::new(source));
        for _ in 0..2 {
            match collector.collect().await.unwrap() {
                Signal::Features(features) => {
                    assert_eq!(features.canvas, hash_string("9,9"));
                    assert_eq!(features.webgl, expected_webgl);
                }
                other => panic!("unexpected signal {:?}", other),
            }
        }
    }
}
