//! Backend-independent parsing of the common plotting primitives.
//!
//! Every backend accepts the same call forms; [`Command::parse`] validates
//! the arguments once so dialects only translate well-formed commands.

use std::fmt;

use ndarray::{Array1, Array2};

use crate::{
    error::{Error, Result},
    linespec::LineSpec,
    utils,
    value::Value,
};

/// Primitives every backend provides.
pub const PRIMITIVES: &[&str] = &[
    "axis", "clf", "colorbar", "colormap", "contour", "figure", "grid", "hardcopy", "hold",
    "legend", "mesh", "plot", "plot3", "quiver", "show", "surf", "title", "xlabel", "ylabel",
    "zlabel",
];

/// Axis named by a label command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// x axis.
    X,
    /// y axis.
    Y,
    /// z axis.
    Z,
}

impl Axis {
    /// Lowercase letter.
    pub fn letter(self) -> char {
        match self {
            Self::X => 'x',
            Self::Y => 'y',
            Self::Z => 'z',
        }
    }
}

/// Named axis modes accepted by `axis(mode)`.
pub const AXIS_MODES: &[&str] = &["equal", "tight", "on", "off"];

/// Argument of `axis`.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisSetting {
    /// `[xmin, xmax, ymin, ymax]`.
    Limits([f64; 4]),
    /// One of [`AXIS_MODES`].
    Mode(&'static str),
}

/// How a surface is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Shaded surface.
    Surf,
    /// Wireframe.
    Mesh,
}

/// A validated call to one of the common primitives.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Select or create a figure; `None` creates the next one.
    Figure(Option<u32>),
    /// Set (`Some`) or toggle (`None`) hold.
    Hold(Option<bool>),
    /// A 2D or 3D curve.
    Line {
        /// x samples.
        x: Array1<f64>,
        /// y samples.
        y: Array1<f64>,
        /// z samples for `plot3`.
        z: Option<Array1<f64>>,
        /// Style.
        spec: LineSpec,
    },
    /// A surface over a grid.
    Surface {
        /// x grid.
        x: Array2<f64>,
        /// y grid.
        y: Array2<f64>,
        /// Heights.
        z: Array2<f64>,
        /// Shaded or wireframe.
        kind: SurfaceKind,
    },
    /// Contour lines of a scalar field.
    Contour {
        /// x grid.
        x: Array2<f64>,
        /// y grid.
        y: Array2<f64>,
        /// Field values.
        z: Array2<f64>,
        /// Number of levels, if given.
        levels: Option<usize>,
    },
    /// Arrows `(u, v)` anchored at `(x, y)`.
    Quiver {
        /// Anchor x.
        x: Array1<f64>,
        /// Anchor y.
        y: Array1<f64>,
        /// Arrow x component.
        u: Array1<f64>,
        /// Arrow y component.
        v: Array1<f64>,
    },
    /// Axes title.
    Title(String),
    /// Axis label.
    Label(Axis, String),
    /// Legend entries.
    Legend(Vec<String>),
    /// Axis limits or mode.
    Axis(AxisSetting),
    /// Grid lines on or off.
    Grid(bool),
    /// Show a colour bar.
    Colorbar,
    /// Select a colour map.
    Colormap(String),
    /// Save the current figure.
    Hardcopy(String),
    /// Display all figures.
    Show,
    /// Clear the current figure.
    Clf,
}

impl Command {
    /// Validate a call to the primitive `name`.
    pub fn parse(name: &str, args: &[Value]) -> Result<Self> {
        match name {
            "figure" => match args {
                [] => Ok(Self::Figure(None)),
                [n] => Ok(Self::Figure(Some(figure_number(n)?))),
                _ => Err(arity(name, args.len(), "figure() | figure(n)")),
            },
            "hold" => match args {
                [] => Ok(Self::Hold(None)),
                [flag] => Ok(Self::Hold(Some(on_off(name, flag)?))),
                _ => Err(arity(name, args.len(), "hold() | hold('on' | 'off')")),
            },
            "plot" => parse_plot(args),
            "plot3" => parse_plot3(args),
            "surf" => parse_surface(name, args, SurfaceKind::Surf),
            "mesh" => parse_surface(name, args, SurfaceKind::Mesh),
            "contour" => parse_contour(args),
            "quiver" => parse_quiver(args),
            "title" => Ok(Self::Title(single_text(name, args)?)),
            "xlabel" => Ok(Self::Label(Axis::X, single_text(name, args)?)),
            "ylabel" => Ok(Self::Label(Axis::Y, single_text(name, args)?)),
            "zlabel" => Ok(Self::Label(Axis::Z, single_text(name, args)?)),
            "legend" => {
                if args.is_empty() {
                    return Err(arity(name, 0, "legend(label, ...)"));
                }
                let labels = args
                    .iter()
                    .map(|a| a.text(name).map(str::to_string))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self::Legend(labels))
            }
            "axis" => parse_axis(args),
            "grid" => match args {
                [] => Ok(Self::Grid(true)),
                [flag] => Ok(Self::Grid(on_off(name, flag)?)),
                _ => Err(arity(name, args.len(), "grid() | grid('on' | 'off')")),
            },
            "colorbar" => no_args(name, args).map(|()| Self::Colorbar),
            "colormap" => Ok(Self::Colormap(single_text(name, args)?)),
            "hardcopy" => Ok(Self::Hardcopy(single_text(name, args)?)),
            "show" => no_args(name, args).map(|()| Self::Show),
            "clf" => no_args(name, args).map(|()| Self::Clf),
            other => Err(Error::UnknownSymbol(other.to_string())),
        }
    }

    /// The primitive this command came from.
    pub fn primitive(&self) -> &'static str {
        match self {
            Self::Figure(_) => "figure",
            Self::Hold(_) => "hold",
            Self::Line { z: None, .. } => "plot",
            Self::Line { z: Some(_), .. } => "plot3",
            Self::Surface {
                kind: SurfaceKind::Surf,
                ..
            } => "surf",
            Self::Surface {
                kind: SurfaceKind::Mesh,
                ..
            } => "mesh",
            Self::Contour { .. } => "contour",
            Self::Quiver { .. } => "quiver",
            Self::Title(_) => "title",
            Self::Label(Axis::X, _) => "xlabel",
            Self::Label(Axis::Y, _) => "ylabel",
            Self::Label(Axis::Z, _) => "zlabel",
            Self::Legend(_) => "legend",
            Self::Axis(_) => "axis",
            Self::Grid(_) => "grid",
            Self::Colorbar => "colorbar",
            Self::Colormap(_) => "colormap",
            Self::Hardcopy(_) => "hardcopy",
            Self::Show => "show",
            Self::Clf => "clf",
        }
    }

    /// True for commands that add an item to the current axes.
    pub fn is_plot_item(&self) -> bool {
        matches!(
            self,
            Self::Line { .. } | Self::Surface { .. } | Self::Contour { .. } | Self::Quiver { .. }
        )
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.primitive();
        match self {
            Self::Figure(None) | Self::Hold(None) | Self::Colorbar | Self::Show | Self::Clf => {
                write!(f, "{name}()")
            }
            Self::Figure(Some(n)) => write!(f, "{name}({n})"),
            Self::Hold(Some(on)) | Self::Grid(on) => {
                write!(f, "{name}('{}')", if *on { "on" } else { "off" })
            }
            Self::Line { x, z, spec, .. } => {
                let dims = if z.is_some() { "x, y, z" } else { "x, y" };
                write!(f, "{name}({dims}; n={}, spec='{spec}')", x.len())
            }
            Self::Surface { z, .. } | Self::Contour { z, .. } => {
                let (r, c) = z.dim();
                write!(f, "{name}(x, y, z; {r}x{c})")?;
                if let Self::Contour {
                    levels: Some(n), ..
                } = self
                {
                    write!(f, " levels={n}")?;
                }
                Ok(())
            }
            Self::Quiver { x, .. } => write!(f, "{name}(x, y, u, v; n={})", x.len()),
            Self::Title(s) | Self::Label(_, s) | Self::Colormap(s) | Self::Hardcopy(s) => {
                write!(f, "{name}('{s}')")
            }
            Self::Legend(labels) => {
                let quoted: Vec<String> = labels.iter().map(|l| format!("'{l}'")).collect();
                write!(f, "{name}({})", quoted.join(", "))
            }
            Self::Axis(AxisSetting::Limits([a, b, c, d])) => {
                write!(f, "{name}([{a}, {b}, {c}, {d}])")
            }
            Self::Axis(AxisSetting::Mode(m)) => write!(f, "{name}('{m}')"),
        }
    }
}

/// Error for an unsupported argument count.
fn arity(symbol: &str, got: usize, usage: &str) -> Error {
    Error::args(
        symbol,
        format!("invalid number of arguments ({got}); usage: {usage}"),
    )
}

/// Reject any arguments.
fn no_args(symbol: &str, args: &[Value]) -> Result<()> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(arity(symbol, args.len(), &format!("{symbol}()")))
    }
}

/// Exactly one text argument.
fn single_text(symbol: &str, args: &[Value]) -> Result<String> {
    match args {
        [s] => Ok(s.text(symbol)?.to_string()),
        _ => Err(arity(symbol, args.len(), &format!("{symbol}(text)"))),
    }
}

/// A positive figure number.
fn figure_number(value: &Value) -> Result<u32> {
    let n = value.number("figure")?;
    if n < 1.0 || n.fract() != 0.0 || n > f64::from(u32::MAX) {
        return Err(Error::args("figure", format!("invalid figure number {n}")));
    }
    Ok(n as u32)
}

/// `'on'`/`'off'` or a number.
fn on_off(symbol: &str, value: &Value) -> Result<bool> {
    match value {
        Value::Number(n) => Ok(*n != 0.0),
        Value::Text(s) => match s.to_ascii_lowercase().as_str() {
            "on" => Ok(true),
            "off" => Ok(false),
            other => Err(Error::args(
                symbol,
                format!("expected 'on' or 'off', got '{other}'"),
            )),
        },
        other => Err(Error::args(
            symbol,
            format!("expected 'on' or 'off', got {}", other.type_name()),
        )),
    }
}

/// Split a trailing line spec off the argument list.
fn split_spec<'a>(symbol: &str, args: &'a [Value]) -> Result<(&'a [Value], LineSpec)> {
    match args.split_last() {
        Some((Value::Text(s), rest)) => {
            let spec = LineSpec::parse(s).map_err(|e| Error::args(symbol, e.to_string()))?;
            Ok((rest, spec))
        }
        _ => Ok((args, LineSpec::default())),
    }
}

/// Require equal lengths.
fn same_len(symbol: &str, arrays: &[&Array1<f64>]) -> Result<()> {
    let n = arrays.first().map_or(0, |a| a.len());
    if arrays.iter().any(|a| a.len() != n) {
        let lens: Vec<usize> = arrays.iter().map(|a| a.len()).collect();
        return Err(Error::args(
            symbol,
            format!("vectors must have the same length, got {lens:?}"),
        ));
    }
    if n == 0 {
        return Err(Error::args(symbol, "no data"));
    }
    Ok(())
}

/// `plot(y)`, `plot(x, y)`, optionally followed by a line spec.
fn parse_plot(args: &[Value]) -> Result<Command> {
    let (data, spec) = split_spec("plot", args)?;
    let (x, y) = match data {
        [y] => {
            let y = y.vector("plot")?;
            (Array1::range(1.0, y.len() as f64 + 1.0, 1.0), y)
        }
        [x, y] => (x.vector("plot")?, y.vector("plot")?),
        _ => {
            return Err(arity(
                "plot",
                args.len(),
                "plot(y) | plot(x, y) | plot(x, y, spec)",
            ));
        }
    };
    same_len("plot", &[&x, &y])?;
    Ok(Command::Line {
        x,
        y,
        z: None,
        spec,
    })
}

/// `plot3(x, y, z)`, optionally followed by a line spec.
fn parse_plot3(args: &[Value]) -> Result<Command> {
    let (data, spec) = split_spec("plot3", args)?;
    let [x, y, z] = data else {
        return Err(arity("plot3", args.len(), "plot3(x, y, z) | plot3(x, y, z, spec)"));
    };
    let (x, y, z) = (x.vector("plot3")?, y.vector("plot3")?, z.vector("plot3")?);
    same_len("plot3", &[&x, &y, &z])?;
    Ok(Command::Line {
        x,
        y,
        z: Some(z),
        spec,
    })
}

/// Grid coordinates for a `rows`×`cols` field: matrices, vectors, or absent.
fn grid_coords(
    symbol: &str,
    x: Option<&Value>,
    y: Option<&Value>,
    rows: usize,
    cols: usize,
) -> Result<(Array2<f64>, Array2<f64>)> {
    let (Some(x), Some(y)) = (x, y) else {
        let xs = Array1::range(0.0, rows as f64, 1.0);
        let ys = Array1::range(0.0, cols as f64, 1.0);
        return Ok(utils::ndgrid2(&xs, &ys));
    };
    let (xa, ya) = (x.array(symbol)?, y.array(symbol)?);
    if xa.ndim() == 1 && ya.ndim() == 1 {
        let (xs, ys) = (x.vector(symbol)?, y.vector(symbol)?);
        if xs.len() != rows || ys.len() != cols {
            return Err(Error::args(
                symbol,
                format!(
                    "coordinate vectors of length {} and {} do not match a {rows}x{cols} grid",
                    xs.len(),
                    ys.len()
                ),
            ));
        }
        return Ok(utils::ndgrid2(&xs, &ys));
    }
    let (xm, ym) = (x.matrix(symbol)?, y.matrix(symbol)?);
    if xm.dim() != (rows, cols) || ym.dim() != (rows, cols) {
        return Err(Error::args(
            symbol,
            format!("coordinate grids must be {rows}x{cols}"),
        ));
    }
    Ok((xm, ym))
}

/// `surf(z)`, `surf(x, y, z)` and the `mesh` equivalents.
fn parse_surface(symbol: &str, args: &[Value], kind: SurfaceKind) -> Result<Command> {
    let (x, y, z) = match args {
        [z] => (None, None, z),
        [x, y, z] => (Some(x), Some(y), z),
        _ => {
            return Err(arity(
                symbol,
                args.len(),
                &format!("{symbol}(z) | {symbol}(x, y, z)"),
            ));
        }
    };
    let z = z.matrix(symbol)?;
    let (rows, cols) = z.dim();
    let (x, y) = grid_coords(symbol, x, y, rows, cols)?;
    Ok(Command::Surface { x, y, z, kind })
}

/// `contour(z)`, `contour(x, y, z)`, `contour(x, y, z, n)`.
fn parse_contour(args: &[Value]) -> Result<Command> {
    let (x, y, z, levels) = match args {
        [z] => (None, None, z, None),
        [x, y, z] => (Some(x), Some(y), z, None),
        [x, y, z, n] => (Some(x), Some(y), z, Some(n)),
        _ => {
            return Err(arity(
                "contour",
                args.len(),
                "contour(z) | contour(x, y, z) | contour(x, y, z, n)",
            ));
        }
    };
    let levels = match levels {
        Some(n) => {
            let n = n.number("contour")?;
            if n < 1.0 || n.fract() != 0.0 {
                return Err(Error::args("contour", format!("invalid level count {n}")));
            }
            Some(n as usize)
        }
        None => None,
    };
    let z = z.matrix("contour")?;
    let (rows, cols) = z.dim();
    let (x, y) = grid_coords("contour", x, y, rows, cols)?;
    Ok(Command::Contour { x, y, z, levels })
}

/// `quiver(x, y, u, v)` over arrays of any matching shape.
fn parse_quiver(args: &[Value]) -> Result<Command> {
    let [x, y, u, v] = args else {
        return Err(arity("quiver", args.len(), "quiver(x, y, u, v)"));
    };
    let flat = |value: &Value| -> Result<(Vec<usize>, Array1<f64>)> {
        let a = value.array("quiver")?;
        let shape = a.shape().to_vec();
        Ok((shape, a.iter().copied().collect()))
    };
    let (sx, x) = flat(x)?;
    let (sy, y) = flat(y)?;
    let (su, u) = flat(u)?;
    let (sv, v) = flat(v)?;
    if sx != sy || sx != su || sx != sv {
        return Err(Error::args("quiver", "x, y, u and v must have the same shape"));
    }
    same_len("quiver", &[&x, &y, &u, &v])?;
    Ok(Command::Quiver { x, y, u, v })
}

/// `axis([xmin, xmax, ymin, ymax])`, `axis(xmin, xmax, ymin, ymax)`, `axis(mode)`.
fn parse_axis(args: &[Value]) -> Result<Command> {
    let limits: Vec<f64> = match args {
        [Value::Text(mode)] => {
            let mode = mode.to_ascii_lowercase();
            return AXIS_MODES
                .iter()
                .find(|m| **m == mode)
                .map(|m| Command::Axis(AxisSetting::Mode(*m)))
                .ok_or_else(|| {
                    Error::args(
                        "axis",
                        format!("unknown mode '{mode}' (expected {})", AXIS_MODES.join(", ")),
                    )
                });
        }
        [v] => v.vector("axis")?.to_vec(),
        [a, b, c, d] => vec![
            a.number("axis")?,
            b.number("axis")?,
            c.number("axis")?,
            d.number("axis")?,
        ],
        _ => {
            return Err(arity(
                "axis",
                args.len(),
                "axis([xmin, xmax, ymin, ymax]) | axis(mode)",
            ));
        }
    };
    let [a, b, c, d] = limits[..] else {
        return Err(Error::args("axis", "limits need exactly four values"));
    };
    if a >= b || c >= d {
        return Err(Error::args(
            "axis",
            format!("empty axis range [{a}, {b}] x [{c}, {d}]"),
        ));
    }
    Ok(Command::Axis(AxisSetting::Limits([a, b, c, d])))
}
