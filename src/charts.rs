//! # Chart Variants
//!
//! The four charts this crate knows how to produce, and the glue that loads
//! their fonts, lays them out and writes the PNG pair.
//!
//! | Name | Symbols | Rows | Output |
//! |------|---------|------|--------|
//! | `dot-baseline` | dots, 1mm | +0.5 … −0.3 | `dotchart.png` |
//! | `dot-relabelled` | dots, 1mm | labelled by spacing | `dotchart_mm.png` |
//! | `landolt-v1` | Landolt C, rotation V1 | +0.3 … −0.7 | `landolt.png` |
//! | `landolt-v2` | Landolt C, rotation V2 | +0.3 … −0.7 | `landolt_v2.png` |
//!
//! ## Adding a chart
//!
//! 1. Define a `ChartSpec` constant below
//! 2. Add it to [`CHARTS`]

use std::path::{Path, PathBuf};

use crate::config::{ChartRowSpec, ChartSpec, LabelStyle, PageGeometry, SymbolKind};
use crate::dots::DotGlyphRenderer;
use crate::error::ChartError;
use crate::glyph::TtfGlyphs;
use crate::landolt::{LandoltSymbols, RotationConvention};
use crate::layout::{ChartLayoutEngine, ChartRender};

/// Legge's dot chart. Baseline (0 log) spacing is 2.28mm; each row above or
/// below scales it by 10^0.1. Sequences follow Legge's charts.
#[rustfmt::skip]
pub const DOT_ROWS: &[ChartRowSpec] = &[
    ChartRowSpec { label: "+0.5", size_param: 7.2093, sequence: "jfhdhdfj" },
    ChartRowSpec { label: "+0.4", size_param: 5.7266, sequence: "hdjfjdhf" },
    ChartRowSpec { label: "+0.3", size_param: 4.5489, sequence: "jdfhdfjh" },
    ChartRowSpec { label: "+0.2", size_param: 3.6134, sequence: "fhdjdfdf" },
    ChartRowSpec { label: "+0.1", size_param: 2.8703, sequence: "dhfjfhjd" },
    ChartRowSpec { label: "0", size_param: 2.2800, sequence: "fjhddjfh" },
    ChartRowSpec { label: "-0.1", size_param: 1.8111, sequence: "fjdhhjdf" },
    ChartRowSpec { label: "-0.2", size_param: 1.4386, sequence: "hfjddhfh" },
    ChartRowSpec { label: "-0.3", size_param: 1.1428, sequence: "hdjdjfdj" },
];

/// Same rows as [`DOT_ROWS`], labelled with the dot spacing instead of the
/// log value.
#[rustfmt::skip]
pub const DOT_ROWS_MM: &[ChartRowSpec] = &[
    ChartRowSpec { label: "7.21mm", size_param: 7.2093, sequence: "jfhdhdfj" },
    ChartRowSpec { label: "5.73mm", size_param: 5.7266, sequence: "hdjfjdhf" },
    ChartRowSpec { label: "4.55mm", size_param: 4.5489, sequence: "jdfhdfjh" },
    ChartRowSpec { label: "3.61mm", size_param: 3.6134, sequence: "fhdjdfdf" },
    ChartRowSpec { label: "2.87mm", size_param: 2.8703, sequence: "dhfjfhjd" },
    ChartRowSpec { label: "2.28mm", size_param: 2.2800, sequence: "fjhddjfh" },
    ChartRowSpec { label: "1.81mm", size_param: 1.8111, sequence: "fjdhhjdf" },
    ChartRowSpec { label: "1.44mm", size_param: 1.4386, sequence: "hfjddhfh" },
    ChartRowSpec { label: "1.14mm", size_param: 1.1428, sequence: "hdjdjfdj" },
];

/// Landolt C chart. A 102pt "C" in the Sloan font has a 2.28mm gap (measured),
/// other rows step by 10^0.1. Orientation orders are pseudorandom, reusing
/// published sequences where available.
#[rustfmt::skip]
pub const LANDOLT_ROWS: &[ChartRowSpec] = &[
    ChartRowSpec { label: "+0.3", size_param: 203.0, sequence: "rlulddru" },
    ChartRowSpec { label: "+0.2", size_param: 162.0, sequence: "ludrrlud" },
    ChartRowSpec { label: "+0.1", size_param: 128.0, sequence: "rduuldrl" },
    ChartRowSpec { label: "0", size_param: 102.0, sequence: "ulrdrlud" },
    ChartRowSpec { label: "-0.1", size_param: 81.0, sequence: "dludrurl" },
    ChartRowSpec { label: "-0.2", size_param: 64.0, sequence: "rudlurld" },
    ChartRowSpec { label: "-0.3", size_param: 51.0, sequence: "rldrlduu" },
    ChartRowSpec { label: "-0.4", size_param: 41.0, sequence: "lrulddru" },
    ChartRowSpec { label: "-0.5", size_param: 32.0, sequence: "rlurduld" },
    ChartRowSpec { label: "-0.6", size_param: 25.0, sequence: "rddulurl" },
    ChartRowSpec { label: "-0.7", size_param: 20.0, sequence: "ludrrlud" },
];

pub const SLOAN_FONT: &str = "ecfonts/Sloan.otf";

pub const DOT_BASELINE: ChartSpec = ChartSpec {
    name: "dot-baseline",
    output_stem: "dotchart",
    page: PageGeometry::LETTER_600DPI,
    labels: LabelStyle::FREE_SERIF_72,
    fudge_factor: 1.0,
    symbols: SymbolKind::Dots { dot_diameter_mm: 1.0 },
    rows: DOT_ROWS,
};

pub const DOT_RELABELLED: ChartSpec = ChartSpec {
    name: "dot-relabelled",
    output_stem: "dotchart_mm",
    rows: DOT_ROWS_MM,
    ..DOT_BASELINE
};

pub const LANDOLT_V1: ChartSpec = ChartSpec {
    name: "landolt-v1",
    output_stem: "landolt",
    page: PageGeometry::LETTER_300DPI,
    labels: LabelStyle::FREE_SERIF_36,
    fudge_factor: 1.0,
    symbols: SymbolKind::Landolt {
        font_file: SLOAN_FONT,
        rotation: RotationConvention::V1,
    },
    rows: LANDOLT_ROWS,
};

pub const LANDOLT_V2: ChartSpec = ChartSpec {
    name: "landolt-v2",
    output_stem: "landolt_v2",
    symbols: SymbolKind::Landolt {
        font_file: SLOAN_FONT,
        rotation: RotationConvention::V2,
    },
    ..LANDOLT_V1
};

/// All chart variants, in display order.
pub const CHARTS: &[ChartSpec] = &[DOT_BASELINE, DOT_RELABELLED, LANDOLT_V1, LANDOLT_V2];

/// List all chart names.
pub fn list_charts() -> Vec<&'static str> {
    CHARTS.iter().map(|c| c.name).collect()
}

/// Get a chart by name.
pub fn by_name(name: &str) -> Option<&'static ChartSpec> {
    let name = name.to_lowercase();
    CHARTS.iter().find(|c| c.name == name)
}

/// Font files to use instead of the ones named in a spec.
#[derive(Debug, Clone, Default)]
pub struct FontOverrides {
    pub symbols: Option<PathBuf>,
    pub labels: Option<PathBuf>,
}

impl FontOverrides {
    fn pick<'a>(over: &'a Option<PathBuf>, default: &'a str) -> &'a Path {
        over.as_deref().unwrap_or(Path::new(default))
    }
}

/// Load the chart's fonts and produce the plain and labelled renders.
pub fn render_chart(
    spec: &ChartSpec,
    fonts: &FontOverrides,
) -> Result<(ChartRender, ChartRender), ChartError> {
    let label_glyphs = TtfGlyphs::open(FontOverrides::pick(&fonts.labels, spec.labels.font_file))?;
    log::debug!("{}: labels from {}", spec.name, label_glyphs.path());

    match spec.symbols {
        SymbolKind::Dots { dot_diameter_mm } => {
            let dots = DotGlyphRenderer::new(spec.page.dpi, dot_diameter_mm);
            ChartLayoutEngine::new(spec, &dots, &label_glyphs).render_pair()
        }
        SymbolKind::Landolt {
            font_file,
            rotation,
        } => {
            let glyphs = TtfGlyphs::open(FontOverrides::pick(&fonts.symbols, font_file))?;
            log::debug!("{}: symbols from {}", spec.name, glyphs.path());
            let symbols = LandoltSymbols::new(&glyphs, rotation);
            ChartLayoutEngine::new(spec, &symbols, &label_glyphs).render_pair()
        }
    }
}

/// Temporary name a file is staged under before being renamed into place.
fn staging_path(dir: &Path, file_name: &str) -> PathBuf {
    dir.join(format!(".{}.partial", file_name))
}

/// Encode both renders and write `<stem>.png` and `<stem>_labelled.png` into
/// `dir`.
///
/// Either both files end up in `dir` or neither does: the PNGs are staged
/// under temporary names and renamed into place, and any failure removes
/// whatever was already written.
pub fn write_pair(
    spec: &ChartSpec,
    plain: &ChartRender,
    labelled: &ChartRender,
    dir: &Path,
) -> Result<(PathBuf, PathBuf), ChartError> {
    let plain_png = plain.canvas.to_png()?;
    let labelled_png = labelled.canvas.to_png()?;

    let plain_path = dir.join(spec.plain_file_name());
    let labelled_path = dir.join(spec.labelled_file_name());
    let plain_staged = staging_path(dir, &spec.plain_file_name());
    let labelled_staged = staging_path(dir, &spec.labelled_file_name());

    let result = std::fs::write(&plain_staged, plain_png)
        .and_then(|()| std::fs::write(&labelled_staged, labelled_png))
        .and_then(|()| std::fs::rename(&plain_staged, &plain_path))
        .and_then(|()| {
            std::fs::rename(&labelled_staged, &labelled_path).inspect_err(|_| {
                let _ = std::fs::remove_file(&plain_path);
            })
        });

    if let Err(e) = result {
        let _ = std::fs::remove_file(&plain_staged);
        let _ = std::fs::remove_file(&labelled_staged);
        log::error!("{}: writing {} failed: {}", spec.name, dir.display(), e);
        return Err(e.into());
    }

    log::info!("{}: wrote {}", spec.name, plain_path.display());
    log::info!("{}: wrote {}", spec.name, labelled_path.display());
    Ok((plain_path, labelled_path))
}

/// Render a chart and write its PNG pair into `dir`.
pub fn write_chart(
    spec: &ChartSpec,
    fonts: &FontOverrides,
    dir: &Path,
) -> Result<(PathBuf, PathBuf), ChartError> {
    let (plain, labelled) = render_chart(spec, fonts)?;
    write_pair(spec, &plain, &labelled, dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_charts() {
        assert_eq!(
            list_charts(),
            vec!["dot-baseline", "dot-relabelled", "landolt-v1", "landolt-v2"]
        );
    }

    #[test]
    fn test_by_name() {
        assert_eq!(by_name("landolt-v2").unwrap().output_stem, "landolt_v2");
        assert_eq!(by_name("DOT-BASELINE").unwrap().name, "dot-baseline");
        assert!(by_name("snellen").is_none());
    }

    #[test]
    fn test_every_row_has_eight_valid_symbols() {
        for chart in CHARTS {
            for row in chart.rows {
                assert_eq!(row.sequence.chars().count(), 8, "{} {}", chart.name, row.label);
                let valid: &[char] = match chart.symbols {
                    SymbolKind::Dots { .. } => &['d', 'f', 'h', 'j'],
                    SymbolKind::Landolt { .. } => &['u', 'l', 'r', 'd'],
                };
                assert!(row.sequence.chars().all(|c| valid.contains(&c)));
            }
        }
    }

    #[test]
    fn test_rows_descend_in_size() {
        for chart in CHARTS {
            for pair in chart.rows.windows(2) {
                assert!(pair[0].size_param > pair[1].size_param, "{}", chart.name);
            }
        }
    }

    #[test]
    fn test_dot_spacing_follows_log_progression() {
        // Each row is one 0.1 log step from its neighbour.
        let step = 10f32.powf(0.1);
        for pair in DOT_ROWS.windows(2) {
            let ratio = pair[0].size_param / pair[1].size_param;
            assert!((ratio - step).abs() < 0.01, "{} → {}", pair[0].label, pair[1].label);
        }
    }

    #[test]
    fn test_relabelled_matches_baseline_geometry() {
        assert_eq!(DOT_RELABELLED.page, DOT_BASELINE.page);
        for (a, b) in DOT_ROWS.iter().zip(DOT_ROWS_MM) {
            assert_eq!(a.size_param, b.size_param);
            assert_eq!(a.sequence, b.sequence);
            assert_eq!(b.label, format!("{:.2}mm", a.size_param));
        }
    }

    #[test]
    fn test_landolt_variants_differ_only_in_rotation() {
        assert_eq!(LANDOLT_V1.rows, LANDOLT_V2.rows);
        assert_eq!(LANDOLT_V1.page, LANDOLT_V2.page);
        let (SymbolKind::Landolt { rotation: r1, .. }, SymbolKind::Landolt { rotation: r2, .. }) =
            (LANDOLT_V1.symbols, LANDOLT_V2.symbols)
        else {
            panic!("landolt charts must use Landolt symbols");
        };
        assert_ne!(r1, r2);
    }

    #[test]
    fn test_output_names() {
        assert_eq!(DOT_BASELINE.plain_file_name(), "dotchart.png");
        assert_eq!(DOT_BASELINE.labelled_file_name(), "dotchart_labelled.png");
        assert_eq!(LANDOLT_V1.plain_file_name(), "landolt.png");
        assert_eq!(LANDOLT_V1.labelled_file_name(), "landolt_labelled.png");
    }

    fn blank_render() -> ChartRender {
        ChartRender {
            canvas: crate::canvas::Canvas::page(8, 8).unwrap(),
            rows: Vec::new(),
            labels: Vec::new(),
            final_y: 0.0,
        }
    }

    fn fresh_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_write_pair_leaves_no_temporaries() {
        let dir = fresh_dir("tactile_charts_write_pair_ok");
        let (plain, labelled) = write_pair(&DOT_BASELINE, &blank_render(), &blank_render(), &dir).unwrap();

        let mut names: Vec<String> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["dotchart.png", "dotchart_labelled.png"]);
        assert!(plain.is_file() && labelled.is_file());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_write_pair_failure_on_second_file_keeps_neither() {
        let dir = fresh_dir("tactile_charts_write_pair_fail");
        // A directory squatting on the labelled name makes its rename fail.
        std::fs::create_dir(dir.join("dotchart_labelled.png")).unwrap();

        let err = write_pair(&DOT_BASELINE, &blank_render(), &blank_render(), &dir).unwrap_err();
        assert!(matches!(err, ChartError::Io(_)));

        assert!(!dir.join("dotchart.png").exists());
        let entries: Vec<String> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, vec!["dotchart_labelled.png"]);
        assert!(dir.join("dotchart_labelled.png").is_dir());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_label_font_writes_nothing() {
        let dir = std::env::temp_dir().join("tactile_charts_missing_font");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let fonts = FontOverrides {
            symbols: None,
            labels: Some(PathBuf::from("/nonexistent/FreeSerif.ttf")),
        };
        let err = write_chart(&DOT_BASELINE, &fonts, &dir).unwrap_err();
        assert!(matches!(err, ChartError::FontLoad { .. }));
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
