use std::path::PathBuf;

use clap::Parser;

/// Arrhenius and pressure-dependence plots of tabulated rate coefficients.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Kinetics file to open at startup (.json, .csv or .parquet).
    pub file: Option<PathBuf>,

    /// Reject entries with mismatched grids or non-positive values instead
    /// of plotting non-finite points.
    #[arg(short, long)]
    pub strict: bool,

    /// Write the built series as JSON to this path and exit without a window.
    #[arg(short, long, value_name = "OUT", requires = "file")]
    pub export: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_headless_export() {
        let args = Args::try_parse_from(["kinetics-plot", "data.json", "--strict", "--export", "out.json"])
            .unwrap();
        assert_eq!(args.file, Some(PathBuf::from("data.json")));
        assert!(args.strict);
        assert_eq!(args.export, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn export_needs_an_input_file() {
        assert!(Args::try_parse_from(["kinetics-plot", "--export", "out.json"]).is_err());
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["kinetics-plot"]).unwrap();
        assert!(args.file.is_none());
        assert!(!args.strict);
    }
}
