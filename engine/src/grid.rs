use crate::{block_signature, FontMetrics, HeightCache, Line, LineBreaker, RealMeasurer, SharedMeasurer};
use st_core::{plain_text, rows_for_height, Block, BlockList, ContentType, GRID_COLUMNS, ROW_UNIT_PX};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub columns: u32,
    pub row_unit: f32,
    pub column_width: f32,
    /// Applied above and below every block.
    pub padding: f32,
    pub metrics: FontMetrics,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: GRID_COLUMNS,
            row_unit: ROW_UNIT_PX,
            column_width: 60.0,
            padding: 4.0,
            metrics: FontMetrics::default(),
        }
    }
}

impl GridConfig {
    /// Column width that fits `columns` into a container `width` px wide.
    pub fn for_width(width: f32) -> Self {
        let base = Self::default();
        Self { column_width: (width / base.columns as f32).max(1.0), ..base }
    }

    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.columns.hash(&mut hasher);
        for value in [self.row_unit, self.column_width, self.padding, self.metrics.font_size, self.metrics.line_height] {
            value.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }
}

/// How a content type occupies vertical space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockStyle {
    Text { scale: f32, indent: f32 },
    Fixed(f32),
}

impl BlockStyle {
    pub fn for_type(content_type: ContentType) -> Self {
        match content_type {
            ContentType::Paragraph => BlockStyle::Text { scale: 1.0, indent: 0.0 },
            ContentType::Heading1 => BlockStyle::Text { scale: 2.0, indent: 0.0 },
            ContentType::Heading2 => BlockStyle::Text { scale: 1.5, indent: 0.0 },
            ContentType::Heading3 => BlockStyle::Text { scale: 1.25, indent: 0.0 },
            ContentType::Task | ContentType::BulletPoint | ContentType::NumberedList => {
                BlockStyle::Text { scale: 1.0, indent: 24.0 }
            }
            ContentType::Blockquote => BlockStyle::Text { scale: 1.0, indent: 16.0 },
            ContentType::Divider => BlockStyle::Fixed(22.0),
            ContentType::Image => BlockStyle::Fixed(200.0),
            ContentType::Attachment => BlockStyle::Fixed(48.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BlockMeasure {
    pub lines: Vec<Line>,
    pub pixel_height: f32,
    pub rows: u32,
}

/// Turns block content into rendered pixel heights and grid row spans.
pub struct GridEngine {
    breaker: LineBreaker,
    measurer: SharedMeasurer,
}

impl GridEngine {
    pub fn new() -> Self {
        Self::with_measurer(SharedMeasurer::new(RealMeasurer::new()))
    }

    pub fn with_measurer(measurer: SharedMeasurer) -> Self {
        Self { breaker: LineBreaker, measurer }
    }

    pub fn measure(&self, block: &Block, config: &GridConfig) -> BlockMeasure {
        let padding = config.padding * 2.0;
        let (lines, content_height) = match BlockStyle::for_type(block.content_type) {
            BlockStyle::Fixed(height) => (Vec::new(), height),
            BlockStyle::Text { scale, indent } => {
                let metrics = config.metrics.scaled(scale);
                let width = (config.column_width * block.position.w as f32 - padding - indent).max(metrics.font_size);
                let text = plain_text(&block.text);
                let lines = self.breaker.wrap(&text, width, self.measurer.0.as_ref(), metrics);
                let height = lines.len().max(1) as f32 * metrics.line_px();
                (lines, height)
            }
        };
        let pixel_height = content_height + padding;
        BlockMeasure { lines, pixel_height, rows: rows_for_height(pixel_height, config.row_unit) }
    }

    pub fn pixel_height(&self, block: &Block, config: &GridConfig) -> f32 {
        self.measure(block, config).pixel_height
    }

    pub fn row_span(&self, block: &Block, config: &GridConfig) -> u32 {
        self.measure(block, config).rows
    }

    /// Recomputes `h` for every block whose signature changed and returns
    /// how many spans were updated.
    pub fn relayout(&self, list: &mut BlockList, config: &GridConfig, cache: &mut HeightCache) -> usize {
        let key = config.fingerprint();
        let mut spans = Vec::with_capacity(list.len());
        let mut stale = Vec::new();
        for block in list.blocks() {
            let sig = block_signature(block, key);
            match cache.get(&block.id, sig) {
                Some(rows) => spans.push((block.id.clone(), rows)),
                None => stale.push((block, sig)),
            }
        }

        #[cfg(feature = "parallel")]
        let measured: Vec<_> = stale
            .par_iter()
            .map(|(block, sig)| (block.id.clone(), *sig, self.row_span(block, config)))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let measured: Vec<_> = stale
            .iter()
            .map(|(block, sig)| (block.id.clone(), *sig, self.row_span(block, config)))
            .collect();

        for (id, sig, rows) in measured {
            cache.insert(id.clone(), sig, rows);
            spans.push((id, rows));
        }
        cache.retain_live(list.blocks().iter().map(|b| &b.id));

        let mut changed = 0;
        for (id, rows) in spans {
            if list.set_row_span(&id, rows) {
                changed += 1;
            }
        }
        tracing::debug!(changed, hit_rate = cache.hit_rate(), "grid relayout");
        changed
    }
}

impl Default for GridEngine {
    fn default() -> Self {
        Self::new()
    }
}
