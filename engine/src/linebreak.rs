use crate::{FontMetrics, TextMeasurer};
use unicode_linebreak::linebreaks;

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub width: f32,
}

#[derive(Debug, Clone, Default)]
pub struct LineBreaker;

impl LineBreaker {
    pub fn break_positions(&self, text: &str) -> Vec<usize> {
        linebreaks(text).map(|(idx, _)| idx).collect()
    }

    /// Greedy wrap at break opportunities; hard newlines always break.
    /// A segment wider than `max_width` on its own is split per char.
    pub fn wrap(&self, text: &str, max_width: f32, measurer: &dyn TextMeasurer, metrics: FontMetrics) -> Vec<Line> {
        let mut out = Vec::new();
        for paragraph in text.split('\n') {
            self.wrap_paragraph(paragraph, max_width, measurer, metrics, &mut out);
        }
        out
    }

    fn wrap_paragraph(
        &self,
        text: &str,
        max_width: f32,
        measurer: &dyn TextMeasurer,
        metrics: FontMetrics,
        out: &mut Vec<Line>,
    ) {
        if text.is_empty() {
            out.push(Line { text: String::new(), width: 0.0 });
            return;
        }
        let mut current = String::new();
        let mut start = 0usize;
        for end in self.break_positions(text) {
            let segment = &text[start..end];
            start = end;
            let candidate = format!("{}{}", current, segment);
            if measurer.measure(candidate.trim_end(), metrics) <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                push_line(out, &current, measurer, metrics);
                current.clear();
            }
            if measurer.measure(segment.trim_end(), metrics) <= max_width {
                current.push_str(segment);
            } else {
                current = split_overlong(segment, max_width, measurer, metrics, out);
            }
        }
        if !current.is_empty() {
            push_line(out, &current, measurer, metrics);
        }
    }
}

fn split_overlong(
    segment: &str,
    max_width: f32,
    measurer: &dyn TextMeasurer,
    metrics: FontMetrics,
    out: &mut Vec<Line>,
) -> String {
    let mut current = String::new();
    let mut buf = [0u8; 4];
    let mut width = 0.0;
    for ch in segment.chars() {
        let w = measurer.measure(ch.encode_utf8(&mut buf), metrics);
        if width + w > max_width && !current.is_empty() {
            push_line(out, &current, measurer, metrics);
            current.clear();
            width = 0.0;
        }
        current.push(ch);
        width += w;
    }
    current
}

fn push_line(out: &mut Vec<Line>, text: &str, measurer: &dyn TextMeasurer, metrics: FontMetrics) {
    let text = text.trim_end();
    out.push(Line { text: text.to_string(), width: measurer.measure(text, metrics) });
}
