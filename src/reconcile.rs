//! Page reconciliation: choose native text, OCR text, or native text with the
//! OCR-only sentences appended.

use serde::{Deserialize, Serialize};

use crate::text::{segment, segment_plausible, similarity, upper_bound};

/// Default agreement threshold.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

/// How a page's text was produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decision {
    /// Both sources were empty
    Empty,
    /// Native text was empty, OCR text used as is
    OcrOnly,
    /// OCR text was empty, native text used as is
    NativeOnly,
    /// The sources agreed above the threshold; native text kept
    Agreed { similarity: f64 },
    /// Native text kept, `appended` OCR-only sentences added after it
    Merged { similarity: f64, appended: usize },
}

impl Decision {
    /// Page-level similarity, when both sources had text.
    pub fn similarity(&self) -> Option<f64> {
        match self {
            Decision::Agreed { similarity } | Decision::Merged { similarity, .. } => {
                Some(*similarity)
            }
            _ => None,
        }
    }

    /// Number of OCR sentences appended to the native text.
    pub fn appended(&self) -> usize {
        match self {
            Decision::Merged { appended, .. } => *appended,
            _ => 0,
        }
    }
}

/// Output of [`Reconciler::reconcile`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// Reconciled page text
    pub text: String,

    /// Which branch produced it
    pub decision: Decision,
}

/// Merges the native and OCR text of one page.
///
/// The threshold trades duplication against recall: lower values trust OCR
/// more (more merging, more risk of near-duplicate sentences), higher values
/// trust native text more (less merging, more risk of missing OCR-only
/// content such as diagram captions).
#[derive(Debug, Clone, Copy)]
pub struct Reconciler {
    threshold: f64,
}

impl Reconciler {
    /// Create a reconciler with the given agreement threshold.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// The agreement threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Reconcile two cleaned texts of the same page.
    pub fn reconcile(&self, native: &str, ocr: &str) -> Reconciliation {
        let native = native.trim();
        let ocr = ocr.trim();

        if native.is_empty() {
            let decision = if ocr.is_empty() {
                Decision::Empty
            } else {
                Decision::OcrOnly
            };
            return Reconciliation {
                text: ocr.to_string(),
                decision,
            };
        }
        if ocr.is_empty() {
            return Reconciliation {
                text: native.to_string(),
                decision: Decision::NativeOnly,
            };
        }

        let score = similarity(native, ocr);
        if score > self.threshold {
            return Reconciliation {
                text: native.to_string(),
                decision: Decision::Agreed { similarity: score },
            };
        }

        let unique = self.unique_ocr_sentences(native, ocr);
        let mut text = native.to_string();
        for sentence in &unique {
            text.push(' ');
            text.push_str(sentence);
        }

        Reconciliation {
            text,
            decision: Decision::Merged {
                similarity: score,
                appended: unique.len(),
            },
        }
    }

    /// OCR sentences with no native sentence scoring at or above the threshold,
    /// in OCR order.
    pub fn unique_ocr_sentences<'a>(&self, native: &str, ocr: &'a str) -> Vec<&'a str> {
        let native_sentences = segment(native);
        segment_plausible(ocr)
            .into_iter()
            .map(|sentence| sentence.text)
            .filter(|candidate| {
                !native_sentences.iter().any(|known| {
                    upper_bound(candidate, known.text) >= self.threshold
                        && similarity(candidate, known.text) >= self.threshold
                })
            })
            .collect()
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

/// Reconcile with the default threshold.
pub fn reconcile(native: &str, ocr: &str) -> String {
    Reconciler::default().reconcile(native, ocr).text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_native_uses_ocr() {
        let result = Reconciler::default().reconcile("", "α + β = γ.");
        assert_eq!(result.text, "α + β = γ.");
        assert_eq!(result.decision, Decision::OcrOnly);
    }

    #[test]
    fn test_empty_ocr_uses_native() {
        let result = Reconciler::default().reconcile("Native text.", "");
        assert_eq!(result.text, "Native text.");
        assert_eq!(result.decision, Decision::NativeOnly);
    }

    #[test]
    fn test_both_empty() {
        let result = Reconciler::default().reconcile("", "");
        assert_eq!(result.text, "");
        assert_eq!(result.decision, Decision::Empty);
    }

    #[test]
    fn test_agreeing_sources_keep_native() {
        let native = "The derivative is continuous.";
        let result = Reconciler::default().reconcile(native, "Te derivtive is contiuous");
        assert_eq!(result.text, native);
        assert!(matches!(result.decision, Decision::Agreed { similarity } if similarity > 0.8));
    }

    #[test]
    fn test_unique_ocr_sentence_appended() {
        let result = Reconciler::default()
            .reconcile("Theorem 1 holds.", "Theorem 1 holds. See Figure 3 for details.");
        assert_eq!(result.text, "Theorem 1 holds. See Figure 3 for details.");
        assert_eq!(result.decision.appended(), 1);
        assert!(result.decision.similarity().unwrap() <= 0.8);
    }

    #[test]
    fn test_duplicate_ocr_sentences_not_appended() {
        let native = "Il teorema vale. La dimostrazione segue. Fine della sezione.";
        let ocr = "Il teorema vaIe. Nota a margine sul grafico.";
        let result = Reconciler::default().reconcile(native, ocr);
        assert_eq!(
            result.text,
            "Il teorema vale. La dimostrazione segue. Fine della sezione. Nota a margine sul grafico."
        );
    }

    #[test]
    fn test_duplicate_detected_when_case_folding_grows_text() {
        let native = format!("{}.", "i\u{307}".repeat(8));
        let ocr = "See the table. İİİİİİİİ.";
        let unique = Reconciler::default().unique_ocr_sentences(&native, ocr);
        assert_eq!(unique, vec!["See the table."]);
    }

    #[test]
    fn test_noise_sentences_not_appended() {
        let result = Reconciler::default().reconcile("Short native text here.", "... Caption A.");
        assert_eq!(result.text, "Short native text here. Caption A.");
    }

    #[test]
    fn test_higher_threshold_merges_more() {
        let native = "The function is continuous on the interval.";
        let ocr = "The functon is continuous on the interva1.";
        let strict = Reconciler::new(0.99).reconcile(native, ocr);
        assert!(strict.text.len() > native.len());
        let lenient = Reconciler::new(0.5).reconcile(native, ocr);
        assert_eq!(lenient.text, native);
    }
}
