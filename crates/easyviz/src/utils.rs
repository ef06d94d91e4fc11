//! Backend-independent utilities merged into every facade namespace.
//!
//! These are sample-data and coordinate helpers that plotting scripts use
//! alongside the primitives: MATLAB's `peaks` surface, the `flow` volume,
//! spherical/cartesian conversion and grid construction.

use ndarray::{Array, Array1, Array2, Array3, ArrayD, Dimension, Zip};

use crate::{
    error::{Error, Result},
    value::Value,
};

/// Grid resolution used by `peaks()` without arguments.
pub const PEAKS_DEFAULT_N: usize = 49;

/// Largest number of samples a sized utility call may allocate per array.
pub const MAX_GRID: usize = 1 << 24;

/// A named utility callable through the facade.
#[derive(Debug, Clone, Copy)]
pub struct Utility {
    /// Name bound in the namespace.
    pub name: &'static str,
    /// Accepted call forms.
    pub usage: &'static str,
    /// Dynamic entry point.
    pub func: fn(&[Value]) -> Result<Value>,
}

impl Utility {
    /// Invoke the utility.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        (self.func)(args)
    }
}

/// Every utility, in namespace order.
pub const UTILITIES: &[Utility] = &[
    Utility {
        name: "peaks",
        usage: "peaks() | peaks(n) | peaks(x, y)",
        func: call_peaks,
    },
    Utility {
        name: "cart2sph",
        usage: "cart2sph(x, y, z) -> (theta, phi, r)",
        func: call_cart2sph,
    },
    Utility {
        name: "sph2cart",
        usage: "sph2cart(theta, phi, r) -> (x, y, z)",
        func: call_sph2cart,
    },
    Utility {
        name: "flow",
        usage: "flow() | flow(n) | flow(x, y, z) -> (x, y, z, v)",
        func: call_flow,
    },
    Utility {
        name: "ndgrid",
        usage: "ndgrid(x, y) | ndgrid(x, y, z)",
        func: call_ndgrid,
    },
    Utility {
        name: "linspace",
        usage: "linspace(start, stop, n)",
        func: call_linspace,
    },
];

/// Names of all utilities.
pub fn names() -> impl Iterator<Item = &'static str> {
    UTILITIES.iter().map(|u| u.name)
}

/// Look up a utility by name.
pub fn find(name: &str) -> Option<&'static Utility> {
    UTILITIES.iter().find(|u| u.name == name)
}

/// `n` evenly spaced samples over `[start, stop]`.
pub fn linspace(start: f64, stop: f64, n: usize) -> Array1<f64> {
    Array1::linspace(start, stop, n)
}

/// Samples from `start` to `stop` inclusive in increments of `step`.
pub fn seq(start: f64, stop: f64, step: f64) -> Array1<f64> {
    if step == 0.0 || (stop - start) / step < 0.0 {
        return Array1::from(vec![start]);
    }
    let count = ((stop - start) / step + 1e-10).floor() as usize + 1;
    Array1::from_iter((0..count).map(|i| start + step * i as f64))
}

/// Matrix-indexed 2D grid: `x[[i, j]] == xs[i]`, `y[[i, j]] == ys[j]`.
pub fn ndgrid2(xs: &Array1<f64>, ys: &Array1<f64>) -> (Array2<f64>, Array2<f64>) {
    let shape = (xs.len(), ys.len());
    (
        Array2::from_shape_fn(shape, |(i, _)| xs[i]),
        Array2::from_shape_fn(shape, |(_, j)| ys[j]),
    )
}

/// Matrix-indexed 3D grid.
pub fn ndgrid3(
    xs: &Array1<f64>,
    ys: &Array1<f64>,
    zs: &Array1<f64>,
) -> (Array3<f64>, Array3<f64>, Array3<f64>) {
    let shape = (xs.len(), ys.len(), zs.len());
    (
        Array3::from_shape_fn(shape, |(i, _, _)| xs[i]),
        Array3::from_shape_fn(shape, |(_, j, _)| ys[j]),
        Array3::from_shape_fn(shape, |(_, _, k)| zs[k]),
    )
}

/// Value of the peaks function at a single point.
fn peaks_at(x: f64, y: f64) -> f64 {
    3.0 * (1.0 - x).powi(2) * (-x.powi(2) - (y + 1.0).powi(2)).exp()
        - 10.0 * (x / 5.0 - x.powi(3) - y.powi(5)) * (-x.powi(2) - y.powi(2)).exp()
        - 1.0 / 3.0 * (-(x + 1.0).powi(2) - y.powi(2)).exp()
}

/// The peaks surface sampled on an `n`×`n` grid over `[-3, 3]²`.
pub fn peaks(n: usize) -> Array2<f64> {
    let axis = linspace(-3.0, 3.0, n);
    let (x, y) = ndgrid2(&axis, &axis);
    peaks_on(&x, &y)
}

/// The peaks function evaluated elementwise on matching grids.
pub fn peaks_on<D: Dimension>(x: &Array<f64, D>, y: &Array<f64, D>) -> Array<f64, D> {
    Zip::from(x).and(y).map_collect(|&x, &y| peaks_at(x, y))
}

/// Cartesian to spherical: returns `(theta, phi, r)` with `phi` the elevation.
pub fn cart2sph<D: Dimension>(
    x: &Array<f64, D>,
    y: &Array<f64, D>,
    z: &Array<f64, D>,
) -> (Array<f64, D>, Array<f64, D>, Array<f64, D>) {
    let theta = Zip::from(x).and(y).map_collect(|&x, &y| y.atan2(x));
    let phi = Zip::from(x)
        .and(y)
        .and(z)
        .map_collect(|&x, &y, &z| z.atan2(x.hypot(y)));
    let r = Zip::from(x)
        .and(y)
        .and(z)
        .map_collect(|&x, &y, &z| (x * x + y * y + z * z).sqrt());
    (theta, phi, r)
}

/// Spherical to cartesian; inverse of [`cart2sph`].
pub fn sph2cart<D: Dimension>(
    theta: &Array<f64, D>,
    phi: &Array<f64, D>,
    r: &Array<f64, D>,
) -> (Array<f64, D>, Array<f64, D>, Array<f64, D>) {
    let x = Zip::from(theta)
        .and(phi)
        .and(r)
        .map_collect(|&t, &p, &r| r * p.cos() * t.cos());
    let y = Zip::from(theta)
        .and(phi)
        .and(r)
        .map_collect(|&t, &p, &r| r * p.cos() * t.sin());
    let z = Zip::from(phi).and(r).map_collect(|&p, &r| r * p.sin());
    (x, y, z)
}

/// Speed profile of a submerged jet on the given grid, as `log(|v|)`.
pub fn flow_on<D: Dimension>(
    x: &Array<f64, D>,
    y: &Array<f64, D>,
    z: &Array<f64, D>,
) -> Array<f64, D> {
    const A: f64 = 2.0;
    const NU: f64 = 1.0;

    // x is the jet axis.
    let (_, phi, r) = cart2sph(y, z, x);
    let vr = Zip::from(&phi).and(&r).map_collect(|&phi, &r| {
        2.0 * NU / r * ((A * A - 1.0) / (A - phi.cos()).powi(2) - 1.0)
    });
    let vphi = Zip::from(&phi)
        .and(&r)
        .map_collect(|&phi, &r| -2.0 * NU * phi.sin() / (A - phi.cos()) / r);
    let vth = Array::zeros(r.raw_dim());
    let (vx, vy, vz) = sph2cart(&vth, &vphi, &vr);
    Zip::from(&vx)
        .and(&vy)
        .and(&vz)
        .map_collect(|&a, &b, &c| (a * a + b * b + c * c).sqrt().ln())
}

/// Arrays returned by [`flow`].
pub type FlowVolume = (Array3<f64>, Array3<f64>, Array3<f64>, Array3<f64>);

/// The flow volume on the default or an `n`-based grid: `(x, y, z, v)`.
/// The jet axis gets `2 * n` samples.
pub fn flow(n: Option<usize>) -> Result<FlowVolume> {
    let (xs, ys, zs) = match n {
        None => (
            seq(0.1, 10.0, 0.2),
            seq(-3.0, 3.0, 0.25),
            seq(-3.0, 3.0, 0.25),
        ),
        Some(n) => (
            linspace(
                0.1,
                10.0,
                n.checked_mul(2)
                    .ok_or_else(|| Error::args("flow", format!("grid size {n} is too large")))?,
            ),
            linspace(-3.0, 3.0, n),
            linspace(-3.0, 3.0, n),
        ),
    };
    let (x, y, z) = ndgrid3(&xs, &ys, &zs);
    let v = flow_on(&x, &y, &z);
    Ok((x, y, z, v))
}

/// Ensure every array has the shape of the first.
fn same_shape(symbol: &str, arrays: &[&ArrayD<f64>]) -> Result<()> {
    let Some(first) = arrays.first() else {
        return Ok(());
    };
    for a in &arrays[1..] {
        if a.shape() != first.shape() {
            return Err(Error::args(
                symbol,
                format!(
                    "array shapes differ: {:?} vs {:?}",
                    first.shape(),
                    a.shape()
                ),
            ));
        }
    }
    Ok(())
}

/// Interpret a value as a grid size for an array of `n^rank * factor`
/// samples, which must stay within [`MAX_GRID`].
fn count(symbol: &str, value: &Value, rank: u32, factor: usize) -> Result<usize> {
    let n = value.number(symbol)?;
    if !n.is_finite() || n < 1.0 {
        return Err(Error::args(symbol, format!("invalid grid size {n}")));
    }
    if n > MAX_GRID as f64 {
        return Err(Error::args(
            symbol,
            format!("grid size {n} exceeds {MAX_GRID} samples"),
        ));
    }
    let n = n as usize;
    n.checked_pow(rank)
        .and_then(|samples| samples.checked_mul(factor))
        .filter(|&samples| samples <= MAX_GRID)
        .map(|_| n)
        .ok_or_else(|| {
            Error::args(
                symbol,
                format!("grid size {n} exceeds {MAX_GRID} samples"),
            )
        })
}

/// Error for an unsupported argument count.
fn arity(symbol: &str, got: usize) -> Error {
    let usage = find(symbol).map_or("", |u| u.usage);
    Error::args(symbol, format!("invalid number of arguments ({got}); usage: {usage}"))
}

/// Dynamic entry point for `peaks`.
fn call_peaks(args: &[Value]) -> Result<Value> {
    match args {
        [] => Ok(peaks(PEAKS_DEFAULT_N).into()),
        [n] => Ok(peaks(count("peaks", n, 2, 1)?).into()),
        [x, y] => {
            let (x, y) = (x.array("peaks")?, y.array("peaks")?);
            same_shape("peaks", &[&x, &y])?;
            Ok(peaks_on(&x, &y).into())
        }
        _ => Err(arity("peaks", args.len())),
    }
}

/// Dynamic entry point for `cart2sph`.
fn call_cart2sph(args: &[Value]) -> Result<Value> {
    let [x, y, z] = args else {
        return Err(arity("cart2sph", args.len()));
    };
    let (x, y, z) = (x.array("cart2sph")?, y.array("cart2sph")?, z.array("cart2sph")?);
    same_shape("cart2sph", &[&x, &y, &z])?;
    let (t, p, r) = cart2sph(&x, &y, &z);
    Ok(Value::Tuple(vec![t.into(), p.into(), r.into()]))
}

/// Dynamic entry point for `sph2cart`.
fn call_sph2cart(args: &[Value]) -> Result<Value> {
    let [t, p, r] = args else {
        return Err(arity("sph2cart", args.len()));
    };
    let (t, p, r) = (t.array("sph2cart")?, p.array("sph2cart")?, r.array("sph2cart")?);
    same_shape("sph2cart", &[&t, &p, &r])?;
    let (x, y, z) = sph2cart(&t, &p, &r);
    Ok(Value::Tuple(vec![x.into(), y.into(), z.into()]))
}

/// Dynamic entry point for `flow`.
fn call_flow(args: &[Value]) -> Result<Value> {
    let (x, y, z, v) = match args {
        [] => flow(None)?,
        [n] => flow(Some(count("flow", n, 3, 2)?))?,
        [x, y, z] => {
            let (x, y, z) = (x.volume("flow")?, y.volume("flow")?, z.volume("flow")?);
            if x.dim() != y.dim() || x.dim() != z.dim() {
                return Err(Error::args("flow", "grid shapes differ"));
            }
            let v = flow_on(&x, &y, &z);
            (x, y, z, v)
        }
        _ => return Err(arity("flow", args.len())),
    };
    Ok(Value::Tuple(vec![x.into(), y.into(), z.into(), v.into()]))
}

/// Dynamic entry point for `ndgrid`.
fn call_ndgrid(args: &[Value]) -> Result<Value> {
    match args {
        [x, y] => {
            let (x, y) = ndgrid2(&x.vector("ndgrid")?, &y.vector("ndgrid")?);
            Ok(Value::Tuple(vec![x.into(), y.into()]))
        }
        [x, y, z] => {
            let (x, y, z) = ndgrid3(
                &x.vector("ndgrid")?,
                &y.vector("ndgrid")?,
                &z.vector("ndgrid")?,
            );
            Ok(Value::Tuple(vec![x.into(), y.into(), z.into()]))
        }
        _ => Err(arity("ndgrid", args.len())),
    }
}

/// Dynamic entry point for `linspace`.
fn call_linspace(args: &[Value]) -> Result<Value> {
    let [start, stop, n] = args else {
        return Err(arity("linspace", args.len()));
    };
    Ok(linspace(
        start.number("linspace")?,
        stop.number("linspace")?,
        count("linspace", n, 1, 1)?,
    )
    .into())
}
