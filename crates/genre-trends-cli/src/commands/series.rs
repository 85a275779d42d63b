//! Series command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use genre_trends::{ChartConfig, Series, SeriesReport};

use crate::Selection;

pub fn run(selection: &Selection, output: Option<PathBuf>) -> Result<()> {
    let mut controller = super::controller(selection, ChartConfig::default());
    super::load(&mut controller, selection)?;
    let report = SeriesReport::from_controller(&controller);

    println!(
        "{} genres (region {}, family {})",
        report.series.len(),
        report.region,
        report.family
    );
    if let Some(years) = report.domains.years {
        println!("Years: {}-{}", years.min, years.max);
    }
    println!();
    print_table(&report.series);

    if let Some(output_path) = output {
        report
            .write_json(&output_path)
            .with_context(|| format!("Failed to write to {}", output_path.display()))?;
        println!("Saved to: {}", output_path.display());
    }

    Ok(())
}

fn print_table(series: &[Series]) {
    println!(
        "{:<16} {:>6} {:>6} {:>6} {:>10} {:>10}",
        "Genre", "Years", "First", "Last", "Peak", "Total"
    );
    println!("{:-<60}", "");

    let mut sorted: Vec<&Series> = series.iter().collect();
    sorted.sort_by(|a, b| {
        b.total()
            .partial_cmp(&a.total())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.genre.cmp(&b.genre))
    });

    for s in sorted {
        let first = s.points.first().map_or(0, |p| p.year);
        let last = s.points.last().map_or(0, |p| p.year);
        let peak = s.points.iter().map(|p| p.value).fold(0.0, f64::max);
        println!(
            "{:<16} {:>6} {:>6} {:>6} {:>10.2} {:>10.2}",
            s.genre,
            s.points.len(),
            first,
            last,
            peak,
            s.total()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genre_trends::{FamilyFilter, PlatformFamily, Region};
    use std::io::Write;

    #[test]
    fn test_series_export_parses_back() {
        let mut input = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        input
            .write_all(
                b"Year,Genre,Platform,EU_Sales\n\
                  2001,Action,PS2,1.5\n\
                  2001,Action,Wii,2.0\n\
                  2003,Puzzle,DS,0.4\n\
                  1999,Racing,DS,9.0\n",
            )
            .unwrap();
        let output = tempfile::NamedTempFile::new().unwrap();

        let mut selection = Selection::for_input(input.path());
        selection.region = Region::Europe;
        selection.family = PlatformFamily::Nintendo.into();
        run(&selection, Some(output.path().to_path_buf())).unwrap();

        let content = std::fs::read_to_string(output.path()).unwrap();
        let report: SeriesReport = serde_json::from_str(&content).unwrap();
        assert_eq!(report.region, Region::Europe);
        assert_eq!(report.family, FamilyFilter::Family(PlatformFamily::Nintendo));
        let genres: Vec<&str> = report.series.iter().map(|s| s.genre.as_str()).collect();
        assert_eq!(genres, vec!["Action", "Puzzle"]);
        assert_eq!(report.series[0].value_at(2001), Some(2.0));
        assert!(report.hidden.is_empty());
    }

    #[test]
    fn test_series_missing_input() {
        let selection = Selection::for_input(std::path::Path::new("/nonexistent/vgsales.csv"));
        assert!(run(&selection, None).is_err());
    }
}
