//! # Text Fitting
//!
//! A label carries up to five lines: the label text in bold, then four
//! metadata lines in regular weight at a smaller size. The fitting rule
//! starts at the maximum size and shrinks in fixed steps until the widest
//! line fits the available width and the stacked lines fit the available
//! height. Text that still overflows at the floor size is printed anyway.

use serde::Serialize;

use crate::font::StandardFont;

/// Parameters of the fitting rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitRule {
    /// Starting size of the label text.
    pub max_size: f64,
    /// Smallest size the label text may shrink to.
    pub min_size: f64,
    pub step: f64,
    /// Metadata size relative to the label text size.
    pub data_ratio: f64,
    /// Line advance relative to font size.
    pub line_height: f64,
}

impl Default for FitRule {
    fn default() -> Self {
        Self {
            max_size: 10.0,
            min_size: 4.0,
            step: 0.25,
            data_ratio: 0.8,
            line_height: 1.15,
        }
    }
}

/// Font sizes chosen for one label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FittedText {
    pub title_font: &'static str,
    pub title_size: f64,
    pub data_font: &'static str,
    pub data_size: f64,
    pub line_height: f64,
    /// False when the floor size was reached and the text still overflows.
    pub fits: bool,
}

impl FitRule {
    /// Width and height of the text block at label size `size`.
    pub fn measure(&self, title: &str, data: &[String], size: f64) -> (f64, f64) {
        let data_size = size * self.data_ratio;
        let title_w = StandardFont::HelveticaBold.measure(title, size);
        let width = data
            .iter()
            .map(|line| StandardFont::Helvetica.measure(line, data_size))
            .fold(title_w, f64::max);
        let height = size * self.line_height + data.len() as f64 * data_size * self.line_height;
        (width, height)
    }

    /// Pick the largest size at which the text fits `width` × `height`.
    pub fn fit(&self, title: &str, data: &[String], width: f64, height: f64) -> FittedText {
        let mut size = self.max_size;
        let fits = loop {
            let (w, h) = self.measure(title, data, size);
            if w <= width && h <= height {
                break true;
            }
            let next = size - self.step;
            if next < self.min_size || self.step <= 0.0 {
                break false;
            }
            size = next;
        };
        FittedText {
            title_font: StandardFont::HelveticaBold.pdf_name(),
            title_size: size,
            data_font: StandardFont::Helvetica.pdf_name(),
            data_size: size * self.data_ratio,
            line_height: self.line_height,
            fits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> Vec<String> {
        vec![
            "Producto: X".to_string(),
            "Determinación: Y".to_string(),
            "Lote: Z".to_string(),
            "Analista: A    Fecha: 01/01/2026".to_string(),
        ]
    }

    #[test]
    fn roomy_cell_keeps_max_size() {
        let fitted = FitRule::default().fit("L1/A", &data(), 500.0, 500.0);
        assert_eq!(fitted.title_size, 10.0);
        assert_eq!(fitted.data_size, 8.0);
        assert!(fitted.fits);
    }

    #[test]
    fn long_text_shrinks_until_it_fits() {
        let rule = FitRule::default();
        let title = "Lote-Extra-Largo/12 1:10-->2:20-->5:50";
        let fitted = rule.fit(title, &data(), 90.0, 40.0);
        assert!(fitted.fits);
        assert!(fitted.title_size < rule.max_size);
        let (w, h) = rule.measure(title, &data(), fitted.title_size);
        assert!(w <= 90.0 && h <= 40.0);
        let (w, h) = rule.measure(title, &data(), fitted.title_size + rule.step);
        assert!(w > 90.0 || h > 40.0);
    }

    #[test]
    fn hopeless_text_stops_at_floor() {
        let rule = FitRule::default();
        let fitted = rule.fit(&"W".repeat(200), &data(), 90.0, 40.0);
        assert!(!fitted.fits);
        assert_eq!(fitted.title_size, rule.min_size);
    }
}
