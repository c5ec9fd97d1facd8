use super::model::{KineticsEntry, Reference};

// ---------------------------------------------------------------------------
// Number formatting
// ---------------------------------------------------------------------------

/// Format a number the way a browser prints it: shortest round-trip digits,
/// integral values without a fraction, and exponent form for very large or
/// very small magnitudes (`1e-7`, `1e+21`).
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "NaN".to_string()
        } else if value > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-6..1e21).contains(&magnitude) {
        let text = format!("{value:e}");
        return match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => text,
        };
    }
    format!("{value}")
}

// ---------------------------------------------------------------------------
// Label pieces
// ---------------------------------------------------------------------------

/// `" - {first author}, {year}"`. A reference without authors keeps the
/// separator and prints an empty author; one without a year ends at the
/// author.
pub fn reference_title(reference: &Reference) -> String {
    let author = reference.first_author().unwrap_or_default();
    match reference.year {
        Some(year) => format!(" - {author}, {year}"),
        None => format!(" - {author}"),
    }
}

/// `"{result}. {source}"` followed by `"/{index}"` when the entry has one.
fn base_label(result: &str, source: &str, index: Option<i64>) -> String {
    match index {
        Some(i) => format!("{result}. {source}/{i}"),
        None => format!("{result}. {source}"),
    }
}

/// Label parameters for one Arrhenius series.
#[derive(Debug, Clone, Copy)]
pub struct LabelParts<'a> {
    pub result: &'a str,
    pub source: &'a str,
    pub index: Option<i64>,
    pub forward: bool,
    pub reference: Option<&'a Reference>,
}

impl<'a> From<&'a KineticsEntry> for LabelParts<'a> {
    fn from(entry: &'a KineticsEntry) -> Self {
        Self {
            result: &entry.result,
            source: &entry.source,
            index: entry.index,
            forward: entry.forward,
            reference: entry.reference.as_ref(),
        }
    }
}

impl LabelParts<'_> {
    /// Label of the single series drawn when the entry has no pressure list.
    /// The reference title comes before the reverse marker.
    pub fn single_pressure(&self) -> String {
        let mut label = base_label(self.result, self.source, self.index);
        if let Some(reference) = self.reference {
            label.push_str(&reference_title(reference));
        }
        if !self.forward {
            label.push_str(" *");
        }
        label
    }

    /// Label of the series drawn at one `pressure`. The reverse marker comes
    /// before the reference title.
    pub fn at_pressure(&self, pressure: f64, pressure_units: &str) -> String {
        let mut label = base_label(self.result, self.source, self.index);
        label.push_str(&format!(" ({} {pressure_units})", format_number(pressure)));
        if !self.forward {
            label.push_str(" *");
        }
        if let Some(reference) = self.reference {
            label.push_str(&reference_title(reference));
        }
        label
    }
}

/// Label of one pressure-dependence series: `"{T} {Tunits}"`.
pub fn temperature_label(temperature: f64, temperature_units: &str) -> String {
    format!("{} {temperature_units}", format_number(temperature))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(index: Option<i64>, forward: bool, reference: Option<&Reference>) -> LabelParts<'_> {
        LabelParts {
            result: "R1",
            source: "NIST",
            index,
            forward,
            reference,
        }
    }

    #[test]
    fn numbers_print_like_a_browser() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(0.01), "0.01");
        assert_eq!(format_number(298.15), "298.15");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(2.5e21), "2.5e+21");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn index_suffix_only_when_present() {
        assert_eq!(parts(None, true, None).single_pressure(), "R1. NIST");
        assert_eq!(parts(Some(3), true, None).single_pressure(), "R1. NIST/3");
        assert_eq!(parts(Some(0), true, None).single_pressure(), "R1. NIST/0");
    }

    #[test]
    fn reverse_marker_ends_single_pressure_label() {
        let reference = Reference {
            authors: vec!["O&#39;Brien".to_string()],
            year: Some(1998),
        };
        let label = parts(None, false, Some(&reference)).single_pressure();
        assert_eq!(label, "R1. NIST - O'Brien, 1998 *");
        assert!(label.ends_with(" *"));
        assert!(!parts(None, true, None).single_pressure().ends_with('*'));
    }

    #[test]
    fn pressure_label_places_reference_last() {
        let reference = Reference {
            authors: vec!["Baulch, D. L.".to_string()],
            year: Some(2005),
        };
        assert_eq!(
            parts(Some(2), false, Some(&reference)).at_pressure(0.1, "bar"),
            "R1. NIST/2 (0.1 bar) * - Baulch, 2005"
        );
        assert_eq!(parts(None, true, None).at_pressure(1.0, "atm"), "R1. NIST (1 atm)");
    }

    #[test]
    fn reference_without_year_ends_at_author() {
        let reference = Reference {
            authors: vec!["Smith, A.".to_string()],
            year: None,
        };
        assert_eq!(reference_title(&reference), " - Smith");
        assert_eq!(
            parts(None, true, Some(&reference)).single_pressure(),
            "R1. NIST - Smith"
        );
    }

    #[test]
    fn temperature_labels_use_units() {
        assert_eq!(temperature_label(300.0, "K"), "300 K");
        assert_eq!(temperature_label(1234.5, "K"), "1234.5 K");
    }
}
