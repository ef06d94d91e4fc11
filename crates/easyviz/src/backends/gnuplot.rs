//! Gnuplot backend: emits a gnuplot script with inline data blocks.

use ndarray::Array2;

use crate::{
    backend::{Dialect, ScriptBackend, Session, quote},
    command::{AxisSetting, Command, SurfaceKind},
    error::{Error, Result},
    linespec::{LineSpec, LineStyle, Marker},
    value::Value,
};

/// The gnuplot backend.
pub type GnuplotBackend = ScriptBackend<Gnuplot>;

/// Colour maps with a gnuplot palette definition.
const PALETTES: &[(&str, &str)] = &[
    ("default", "set palette rgbformulae 7,5,15"),
    ("hot", "set palette rgbformulae 21,22,23"),
    ("gray", "set palette gray"),
    ("jet", "set palette rgbformulae 33,13,10"),
    ("ocean", "set palette rgbformulae 23,28,3"),
    ("cool", "set palette defined (0 \"cyan\", 1 \"magenta\")"),
    ("copper", "set palette defined (0 \"black\", 1 \"#ffc77f\")"),
];

/// Gnuplot dialect.
#[derive(Debug, Default)]
pub struct Gnuplot;

/// Gnuplot point type for a marker.
fn point_type(marker: Marker) -> u8 {
    match marker {
        Marker::Plus => 1,
        Marker::Cross => 2,
        Marker::Asterisk => 3,
        Marker::Square => 4,
        Marker::Dot => 7,
        Marker::Circle => 6,
        Marker::TriangleUp => 8,
        Marker::TriangleDown | Marker::TriangleLeft | Marker::TriangleRight => 10,
        Marker::Diamond => 12,
        Marker::Pentagram | Marker::Hexagram => 14,
    }
}

/// The `with ...` clause for a line spec.
fn with_clause(spec: &LineSpec) -> String {
    let mut clause = match (spec.draws_line(), spec.marker) {
        (true, Some(_)) => "linespoints".to_string(),
        (false, Some(_)) => "points".to_string(),
        (_, None) => "lines".to_string(),
    };
    if let Some(style) = spec.style {
        let dt = match style {
            LineStyle::Solid => 1,
            LineStyle::Dashed => 2,
            LineStyle::Dotted => 3,
            LineStyle::DashDot => 4,
        };
        clause.push_str(&format!(" dt {dt}"));
    }
    if let Some(marker) = spec.marker {
        clause.push_str(&format!(" pt {}", point_type(marker)));
    }
    if let Some(color) = spec.color {
        clause.push_str(&format!(" lc rgb {}", quote(color.name())));
    }
    clause
}

/// Inline data for a grid: one scan line per row, blank line between rows.
fn grid_block(x: &Array2<f64>, y: &Array2<f64>, z: &Array2<f64>) -> Vec<String> {
    let mut out = Vec::with_capacity(z.len() + z.nrows() + 1);
    for ((xr, yr), zr) in x.rows().into_iter().zip(y.rows()).zip(z.rows()) {
        for ((a, b), c) in xr.iter().zip(yr.iter()).zip(zr.iter()) {
            out.push(format!("{a} {b} {c}"));
        }
        out.push(String::new());
    }
    out.push("e".to_string());
    out
}

/// Terminal settings for a hardcopy file, chosen by extension.
fn terminal_for(file: &str) -> Result<&'static str> {
    let ext = file.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("ps") => Ok("set terminal postscript color"),
        Some("eps") => Ok("set terminal postscript eps color"),
        Some("png") => Ok("set terminal png"),
        Some("pdf") => Ok("set terminal pdfcairo"),
        Some("svg") => Ok("set terminal svg"),
        _ => Err(Error::args(
            "hardcopy",
            format!("gnuplot cannot write '{file}' (use .ps, .eps, .png, .pdf or .svg)"),
        )),
    }
}

/// Palette command for a colour map name.
fn palette(map: &str) -> Result<&'static str> {
    PALETTES
        .iter()
        .find(|(name, _)| *name == map)
        .map(|(_, cmd)| *cmd)
        .ok_or_else(|| {
            let known: Vec<&str> = PALETTES.iter().map(|(n, _)| *n).collect();
            Error::args(
                "colormap",
                format!("unknown colour map '{map}' (known: {})", known.join(", ")),
            )
        })
}

impl Dialect for Gnuplot {
    const NAME: &'static str = "gnuplot";
    const DISPLAY: &'static str = "Gnuplot";

    fn preamble(&self) -> Vec<String> {
        vec!["# generated by easyviz (gnuplot backend)".to_string()]
    }

    fn translate(&self, command: &Command, session: &Session) -> Result<Vec<String>> {
        let plot = if session.replaces() { "plot" } else { "replot" };
        let lines = match command {
            Command::Figure(_) => vec![format!("set terminal x11 {} persist", session.figure)],
            Command::Hold(_) => Vec::new(),
            Command::Line { x, y, z, spec } => {
                let mut out = Vec::with_capacity(x.len() + 2);
                match z {
                    None => {
                        out.push(format!("{plot} '-' with {} notitle", with_clause(spec)));
                        out.extend(x.iter().zip(y.iter()).map(|(a, b)| format!("{a} {b}")));
                    }
                    Some(z) => {
                        let splot = if session.replaces() { "splot" } else { "replot" };
                        out.push(format!("{splot} '-' with {} notitle", with_clause(spec)));
                        out.extend(
                            x.iter()
                                .zip(y.iter())
                                .zip(z.iter())
                                .map(|((a, b), c)| format!("{a} {b} {c}")),
                        );
                    }
                }
                out.push("e".to_string());
                out
            }
            Command::Surface { x, y, z, kind } => {
                let splot = if session.replaces() { "splot" } else { "replot" };
                let mut out = match kind {
                    SurfaceKind::Surf => vec![
                        "unset hidden3d".to_string(),
                        "set pm3d".to_string(),
                        format!("{splot} '-' with pm3d notitle"),
                    ],
                    SurfaceKind::Mesh => vec![
                        "unset pm3d".to_string(),
                        "set hidden3d".to_string(),
                        format!("{splot} '-' with lines notitle"),
                    ],
                };
                out.extend(grid_block(x, y, z));
                out
            }
            Command::Contour { x, y, z, levels } => {
                let mut out = vec![
                    "set contour base".to_string(),
                    "unset surface".to_string(),
                    "set view map".to_string(),
                ];
                if let Some(n) = levels {
                    out.push(format!("set cntrparam levels {n}"));
                }
                out.push("splot '-' with lines notitle".to_string());
                out.extend(grid_block(x, y, z));
                out
            }
            Command::Quiver { x, y, u, v } => {
                let mut out = vec![format!("{plot} '-' with vectors notitle")];
                for i in 0..x.len() {
                    out.push(format!("{} {} {} {}", x[i], y[i], u[i], v[i]));
                }
                out.push("e".to_string());
                out
            }
            Command::Title(t) => vec![format!("set title {}", quote(t))],
            Command::Label(axis, t) => vec![format!("set {}label {}", axis.letter(), quote(t))],
            Command::Legend(labels) => {
                let quoted: Vec<String> = labels.iter().map(|l| quote(l)).collect();
                vec![
                    "set key on".to_string(),
                    format!("# legend: {}", quoted.join(" ")),
                ]
            }
            Command::Axis(AxisSetting::Limits([a, b, c, d])) => vec![
                format!("set xrange [{a}:{b}]"),
                format!("set yrange [{c}:{d}]"),
            ],
            Command::Axis(AxisSetting::Mode(mode)) => match *mode {
                "equal" => vec!["set size ratio -1".to_string()],
                "tight" => vec!["set autoscale fix".to_string()],
                "off" => vec!["unset border".to_string(), "unset tics".to_string()],
                _ => vec!["set border".to_string(), "set tics".to_string()],
            },
            Command::Grid(true) => vec!["set grid".to_string()],
            Command::Grid(false) => vec!["unset grid".to_string()],
            Command::Colorbar => vec!["set colorbox".to_string()],
            Command::Colormap(map) => vec![palette(map)?.to_string()],
            Command::Hardcopy(file) => vec![
                terminal_for(file)?.to_string(),
                format!("set output {}", quote(file)),
                "replot".to_string(),
                "set output".to_string(),
                format!("set terminal x11 {} persist", session.figure.max(1)),
            ],
            Command::Show => vec!["pause mouse close".to_string()],
            Command::Clf => vec!["reset".to_string()],
        };
        Ok(lines)
    }

    fn extras(&self) -> &'static [&'static str] {
        &["hot", "gray", "jet", "ocean", "cool", "copper"]
    }

    fn extra(&self, name: &str, args: &[Value], _session: &Session) -> Result<Vec<String>> {
        if !args.is_empty() {
            return Err(Error::args(name, "colour map shortcuts take no arguments"));
        }
        Ok(vec![palette(name)?.to_string()])
    }
}
