//! Demo scenes drawn through the facade.

use std::f64::consts::PI;

use anyhow::{Context, Result};
use easyviz::{Facade, Value};

/// A canned plotting script.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Scene {
    /// Two curves on one set of axes.
    Line,
    /// Shaded `peaks` surface with a colour bar.
    Peaks,
    /// Rotational vector field.
    Quiver,
}

/// Call `name`, attaching the symbol to any error.
fn call(facade: &Facade, name: &str, args: &[Value]) -> Result<Value> {
    facade
        .call(name, args)
        .with_context(|| format!("demo call to '{name}' failed"))
}

/// Split a tuple result into its parts.
fn parts(value: Value, what: &str) -> Result<Vec<Value>> {
    match value {
        Value::Tuple(parts) => Ok(parts),
        other => anyhow::bail!("{what} returned {} instead of a tuple", other.type_name()),
    }
}

/// `sin` and `cos` over one period.
fn line(facade: &Facade) -> Result<()> {
    let x = call(
        facade,
        "linspace",
        &[0.0.into(), (2.0 * PI).into(), 50.0.into()],
    )?;
    let xs = x.as_array().context("linspace returned no array")?;
    let sin = Value::from(xs.mapv(f64::sin));
    let cos = Value::from(xs.mapv(f64::cos));

    call(facade, "figure", &[])?;
    call(facade, "plot", &[x.clone(), sin, "b-".into()])?;
    call(facade, "hold", &["on".into()])?;
    call(facade, "plot", &[x, cos, "r--".into()])?;
    call(facade, "hold", &["off".into()])?;
    call(facade, "title", &["sin and cos".into()])?;
    call(facade, "xlabel", &["t".into()])?;
    call(facade, "ylabel", &["amplitude".into()])?;
    call(facade, "legend", &["sin(t)".into(), "cos(t)".into()])?;
    call(facade, "grid", &["on".into()])?;
    Ok(())
}

/// The `peaks` surface.
fn peaks(facade: &Facade) -> Result<()> {
    let z = call(facade, "peaks", &[25.0.into()])?;
    call(facade, "figure", &[])?;
    call(facade, "surf", &[z])?;
    call(facade, "colormap", &["hot".into()])?;
    call(facade, "colorbar", &[])?;
    call(facade, "title", &["peaks".into()])?;
    Ok(())
}

/// Arrows `(-y, x)` on a 9×9 grid.
fn quiver(facade: &Facade) -> Result<()> {
    let axis = call(facade, "linspace", &[(-2.0).into(), 2.0.into(), 9.0.into()])?;
    let grid = parts(call(facade, "ndgrid", &[axis.clone(), axis])?, "ndgrid")?;
    let [x, y] = grid.as_slice() else {
        anyhow::bail!("ndgrid returned {} arrays", grid.len());
    };
    let u = Value::from(y.as_array().context("ndgrid y")?.mapv(|v| -v));
    let v = Value::from(x.as_array().context("ndgrid x")?.clone());

    call(facade, "figure", &[])?;
    call(facade, "quiver", &[x.clone(), y.clone(), u, v])?;
    call(facade, "axis", &["equal".into()])?;
    call(facade, "title", &["rotation".into()])?;
    Ok(())
}

/// Draw `scene` through `facade`.
pub fn run(facade: &Facade, scene: Scene) -> Result<()> {
    match scene {
        Scene::Line => line(facade),
        Scene::Peaks => peaks(facade),
        Scene::Quiver => quiver(facade),
    }
}
