//! Matplotlib backend: emits a pyplot script.

use ndarray::Array2;

use crate::{
    backend::{Dialect, ScriptBackend, Session, join_numbers},
    command::{AxisSetting, Command, SurfaceKind},
    error::{Error, Result},
    value::Value,
};

/// The matplotlib backend.
pub type MatplotlibBackend = ScriptBackend<Matplotlib>;

/// Colour maps pyplot knows under the same name.
const COLORMAPS: &[&str] = &[
    "autumn", "bone", "cool", "copper", "gray", "hot", "hsv", "jet", "pink", "spring", "summer",
    "viridis", "winter",
];

/// Matplotlib dialect.
#[derive(Debug, Default)]
pub struct Matplotlib;

/// Python string literal.
fn py_str(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Python list literal for a vector.
fn py_list<'a>(values: impl IntoIterator<Item = &'a f64>) -> String {
    format!("[{}]", join_numbers(values))
}

/// `np.array([[...], ...])` for a matrix.
fn np_matrix(m: &Array2<f64>) -> String {
    let rows: Vec<String> = m.rows().into_iter().map(|r| py_list(r.iter())).collect();
    format!("np.array([{}])", rows.join(", "))
}

impl Dialect for Matplotlib {
    const NAME: &'static str = "matplotlib";
    const DISPLAY: &'static str = "Matplotlib";

    fn preamble(&self) -> Vec<String> {
        vec![
            "import numpy as np".to_string(),
            "import matplotlib.pyplot as plt".to_string(),
        ]
    }

    fn translate(&self, command: &Command, session: &Session) -> Result<Vec<String>> {
        let mut out = Vec::new();
        if command.is_plot_item() && !session.hold && session.items > 0 {
            out.push("plt.cla()".to_string());
        }
        match command {
            Command::Figure(_) => out.push(format!("plt.figure({})", session.figure)),
            Command::Hold(_) => {}
            Command::Line {
                x,
                y,
                z: None,
                spec,
            } => {
                let mut call = format!("plt.plot({}, {}", py_list(x), py_list(y));
                if !spec.is_empty() {
                    call.push_str(&format!(", {}", py_str(&spec.to_string())));
                }
                call.push(')');
                out.push(call);
            }
            Command::Line {
                x,
                y,
                z: Some(z),
                spec,
            } => {
                out.push("ax = plt.gcf().add_subplot(projection='3d')".to_string());
                let mut call = format!("ax.plot({}, {}, {}", py_list(x), py_list(y), py_list(z));
                if !spec.is_empty() {
                    call.push_str(&format!(", {}", py_str(&spec.to_string())));
                }
                call.push(')');
                out.push(call);
            }
            Command::Surface { x, y, z, kind } => {
                out.push(format!("X = {}", np_matrix(x)));
                out.push(format!("Y = {}", np_matrix(y)));
                out.push(format!("Z = {}", np_matrix(z)));
                out.push("ax = plt.gcf().add_subplot(projection='3d')".to_string());
                out.push(match kind {
                    SurfaceKind::Surf => "ax.plot_surface(X, Y, Z)".to_string(),
                    SurfaceKind::Mesh => "ax.plot_wireframe(X, Y, Z)".to_string(),
                });
            }
            Command::Contour { x, y, z, levels } => {
                out.push(format!("X = {}", np_matrix(x)));
                out.push(format!("Y = {}", np_matrix(y)));
                out.push(format!("Z = {}", np_matrix(z)));
                out.push(match levels {
                    Some(n) => format!("plt.contour(X, Y, Z, {n})"),
                    None => "plt.contour(X, Y, Z)".to_string(),
                });
            }
            Command::Quiver { x, y, u, v } => out.push(format!(
                "plt.quiver({}, {}, {}, {})",
                py_list(x),
                py_list(y),
                py_list(u),
                py_list(v)
            )),
            Command::Title(t) => out.push(format!("plt.title({})", py_str(t))),
            Command::Label(axis, t) => out.push(match axis.letter() {
                'z' => format!("plt.gca().set_zlabel({})", py_str(t)),
                letter => format!("plt.{letter}label({})", py_str(t)),
            }),
            Command::Legend(labels) => {
                let quoted: Vec<String> = labels.iter().map(|l| py_str(l)).collect();
                out.push(format!("plt.legend([{}])", quoted.join(", ")));
            }
            Command::Axis(AxisSetting::Limits(limits)) => {
                out.push(format!("plt.axis({})", py_list(limits)));
            }
            Command::Axis(AxisSetting::Mode(mode)) => out.push(format!("plt.axis('{mode}')")),
            Command::Grid(on) => out.push(format!(
                "plt.grid({})",
                if *on { "True" } else { "False" }
            )),
            Command::Colorbar => out.push("plt.colorbar()".to_string()),
            Command::Colormap(map) => {
                if !COLORMAPS.contains(&map.as_str()) {
                    return Err(Error::args(
                        "colormap",
                        format!(
                            "unknown colour map '{map}' (known: {})",
                            COLORMAPS.join(", ")
                        ),
                    ));
                }
                out.push(format!("plt.set_cmap({})", py_str(map)));
            }
            Command::Hardcopy(file) => out.push(format!("plt.savefig({})", py_str(file))),
            Command::Show => out.push("plt.show()".to_string()),
            Command::Clf => out.push("plt.clf()".to_string()),
        }
        Ok(out)
    }

    fn extras(&self) -> &'static [&'static str] {
        &["savefig"]
    }

    fn extra(&self, name: &str, args: &[Value], session: &Session) -> Result<Vec<String>> {
        let [file] = args else {
            return Err(Error::args(name, "usage: savefig(filename)"));
        };
        self.translate(&Command::Hardcopy(file.text(name)?.to_string()), session)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::backend::Backend;

    #[test]
    fn plot_and_labels() {
        let b = MatplotlibBackend::new();
        b.execute("plot", &[vec![1.0, 2.0].into(), vec![3.0, 4.5].into(), "b:".into()])
            .unwrap();
        b.execute("title", &["it's".into()]).unwrap();
        b.execute("zlabel", &["z".into()]).unwrap();
        assert_eq!(
            b.transcript(),
            vec![
                "import numpy as np",
                "import matplotlib.pyplot as plt",
                "plt.figure(1)",
                "plt.plot([1, 2], [3, 4.5], 'b:')",
                "plt.title('it\\'s')",
                "plt.gca().set_zlabel('z')",
            ]
        );
    }

    #[test]
    fn replacing_plot_clears_axes() {
        let b = MatplotlibBackend::new();
        b.execute("plot", &[vec![1.0].into()]).unwrap();
        b.execute("plot", &[vec![2.0].into()]).unwrap();
        assert_eq!(
            b.transcript().iter().filter(|l| *l == "plt.cla()").count(),
            1
        );
    }

    #[test]
    fn surface_uses_numpy_grids() {
        let b = MatplotlibBackend::new();
        b.execute("mesh", &[array![[1.0, 2.0]].into()]).unwrap();
        let t = b.transcript();
        assert!(t.contains(&"Z = np.array([[1, 2]])".to_string()));
        assert_eq!(t.last().unwrap(), "ax.plot_wireframe(X, Y, Z)");
    }

    #[test]
    fn savefig_alias() {
        let b = MatplotlibBackend::new();
        b.execute("savefig", &["a.png".into()]).unwrap();
        assert_eq!(b.transcript().last().unwrap(), "plt.savefig('a.png')");
        assert!(b.execute("colormap", &["nope".into()]).is_err());
    }
}
