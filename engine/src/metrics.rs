use fontdue::{Font, FontSettings};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub font_size: f32,
    pub line_height: f32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            line_height: 1.5,
        }
    }
}

impl FontMetrics {
    pub fn scaled(self, factor: f32) -> Self {
        Self { font_size: self.font_size * factor, ..self }
    }

    pub fn line_px(&self) -> f32 {
        self.font_size * self.line_height
    }
}

pub trait TextMeasurer: Send + Sync {
    fn measure(&self, text: &str, metrics: FontMetrics) -> f32;
}

/// Width heuristic used when no font file is available.
#[derive(Debug, Default, Clone)]
pub struct SimpleMeasurer;

impl TextMeasurer for SimpleMeasurer {
    fn measure(&self, text: &str, metrics: FontMetrics) -> f32 {
        if text.is_ascii() {
            return text.len() as f32 * metrics.font_size * 0.6;
        }
        text.chars()
            .map(|ch| {
                if is_wide(ch) {
                    metrics.font_size
                } else if ch.is_ascii() {
                    metrics.font_size * 0.6
                } else {
                    metrics.font_size * 0.7
                }
            })
            .sum()
    }
}

fn is_wide(ch: char) -> bool {
    matches!(
        ch as u32,
        0x1100..=0x115F
            | 0x2E80..=0x303E
            | 0x3040..=0x33FF
            | 0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xAC00..=0xD7A3
            | 0xF900..=0xFAFF
            | 0xFF00..=0xFF60
            | 0x1F300..=0x1FAFF
            | 0x20000..=0x2FFFD
    )
}

#[derive(Clone)]
pub struct SharedMeasurer(pub Arc<dyn TextMeasurer>);

impl SharedMeasurer {
    pub fn new(measurer: impl TextMeasurer + 'static) -> Self {
        Self(Arc::new(measurer))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct GlyphKey {
    ch: char,
    size: u16,
}

#[derive(Debug)]
struct GlyphCache {
    advances: LruCache<GlyphKey, f32>,
    hits: u64,
    misses: u64,
}

impl GlyphCache {
    fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(64)).unwrap_or(NonZeroUsize::MIN);
        Self { advances: LruCache::new(capacity), hits: 0, misses: 0 }
    }

    fn advance(&mut self, key: GlyphKey, font: &Font) -> f32 {
        if let Some(hit) = self.advances.get(&key) {
            self.hits += 1;
            return *hit;
        }
        let advance = font.metrics(key.ch, key.size as f32).advance_width.max(0.0);
        self.advances.put(key, advance);
        self.misses += 1;
        advance
    }

    fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Measures with real glyph advances, memoized per (char, px size).
#[derive(Clone)]
pub struct FontdueMeasurer {
    font: Arc<Font>,
    cache: Arc<Mutex<GlyphCache>>,
}

impl FontdueMeasurer {
    pub fn new(font: Font, cache_capacity: usize) -> Self {
        Self {
            font: Arc::new(font),
            cache: Arc::new(Mutex::new(GlyphCache::new(cache_capacity))),
        }
    }

    pub fn hit_rate(&self) -> f64 {
        self.lock().hit_rate()
    }

    fn lock(&self) -> MutexGuard<'_, GlyphCache> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TextMeasurer for FontdueMeasurer {
    fn measure(&self, text: &str, metrics: FontMetrics) -> f32 {
        let size = metrics.font_size.round().max(1.0) as u16;
        let mut cache = self.lock();
        text.chars().map(|ch| cache.advance(GlyphKey { ch, size }, &self.font)).sum()
    }
}

/// Fontdue when a font loads, the heuristic otherwise.
#[derive(Clone)]
pub enum RealMeasurer {
    Fontdue(FontdueMeasurer),
    Simple(SimpleMeasurer),
}

impl RealMeasurer {
    pub fn new() -> Self {
        let cap = if std::env::var("ST_LOW_SPEC").ok().as_deref() == Some("1") {
            1024
        } else {
            4096
        };
        match load_default_font() {
            Some(font) => RealMeasurer::Fontdue(FontdueMeasurer::new(font, cap)),
            None => {
                tracing::debug!("no font found, using heuristic text measurement");
                RealMeasurer::Simple(SimpleMeasurer)
            }
        }
    }

    pub fn hit_rate(&self) -> Option<f64> {
        match self {
            RealMeasurer::Fontdue(m) => Some(m.hit_rate()),
            RealMeasurer::Simple(_) => None,
        }
    }
}

impl Default for RealMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasurer for RealMeasurer {
    fn measure(&self, text: &str, metrics: FontMetrics) -> f32 {
        match self {
            RealMeasurer::Fontdue(m) => m.measure(text, metrics),
            RealMeasurer::Simple(m) => m.measure(text, metrics),
        }
    }
}

fn load_default_font() -> Option<Font> {
    let from_env = std::env::var("ST_FONT_PATH").ok();
    let candidates = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/System/Library/Fonts/SFNS.ttf",
        "C:\\Windows\\Fonts\\segoeui.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];
    let font = from_env
        .as_deref()
        .into_iter()
        .chain(candidates)
        .filter_map(|path| std::fs::read(path).ok())
        .find_map(|bytes| Font::from_bytes(bytes, FontSettings::default()).ok());
    font
}
