//! VTK backend: describes the VTK pipeline each command would build.

use crate::{
    backend::{Dialect, ScriptBackend, Session},
    command::{AxisSetting, Command, SurfaceKind},
    error::{Error, Result},
    value::Value,
};

/// The VTK backend.
pub type VtkBackend = ScriptBackend<Vtk>;

/// VTK dialect.
#[derive(Debug, Default)]
pub struct Vtk;

impl Dialect for Vtk {
    const NAME: &'static str = "vtk";
    const DISPLAY: &'static str = "VTK";

    fn preamble(&self) -> Vec<String> {
        vec!["vtkRenderer renderer".to_string()]
    }

    fn translate(&self, command: &Command, session: &Session) -> Result<Vec<String>> {
        let mut out = Vec::new();
        if command.is_plot_item() && !session.hold && session.items > 0 {
            out.push("renderer.RemoveAllViewProps()".to_string());
        }
        match command {
            Command::Figure(_) => {
                out.push(format!("vtkRenderWindow window{}", session.figure));
                out.push(format!("window{}.AddRenderer(renderer)", session.figure));
            }
            Command::Hold(_) => {}
            Command::Line { x, spec, z, .. } => {
                out.push(format!(
                    "vtkPoints points({} x {})",
                    x.len(),
                    if z.is_some() { 3 } else { 2 }
                ));
                out.push("vtkPolyLine -> vtkPolyDataMapper -> vtkActor".to_string());
                if let Some(color) = spec.color {
                    let (r, g, b) = color.rgb();
                    out.push(format!("actor.GetProperty().SetColor({r}, {g}, {b})"));
                }
            }
            Command::Surface { z, kind, .. } => {
                let (rows, cols) = z.dim();
                out.push(format!("vtkStructuredGrid dims({rows}, {cols}, 1)"));
                out.push(
                    "vtkStructuredGridGeometryFilter -> vtkPolyDataMapper -> vtkActor".to_string(),
                );
                if *kind == SurfaceKind::Mesh {
                    out.push("actor.GetProperty().SetRepresentationToWireframe()".to_string());
                }
            }
            Command::Contour { z, levels, .. } => {
                let (rows, cols) = z.dim();
                out.push(format!("vtkStructuredGrid dims({rows}, {cols}, 1)"));
                out.push(format!(
                    "vtkContourFilter.GenerateValues({}, {}, {})",
                    levels.unwrap_or(10),
                    z.fold(f64::INFINITY, |a, &b| a.min(b)),
                    z.fold(f64::NEG_INFINITY, |a, &b| a.max(b)),
                ));
                out.push("vtkPolyDataMapper -> vtkActor".to_string());
            }
            Command::Quiver { x, .. } => {
                out.push(format!("vtkPolyData vectors({})", x.len()));
                out.push(
                    "vtkGlyph3D(vtkArrowSource) -> vtkPolyDataMapper -> vtkActor".to_string(),
                );
            }
            Command::Title(t) => out.push(format!("vtkTextActor title({t:?})")),
            Command::Label(axis, t) => {
                out.push(format!(
                    "cubeAxes.Set{}Title({t:?})",
                    axis.letter().to_ascii_uppercase()
                ));
            }
            Command::Legend(labels) => {
                out.push(format!("vtkLegendBoxActor entries({})", labels.len()));
            }
            Command::Axis(AxisSetting::Limits([a, b, c, d])) => {
                out.push(format!("cubeAxes.SetBounds({a}, {b}, {c}, {d}, 0, 1)"));
            }
            Command::Axis(AxisSetting::Mode(mode)) => out.push(format!("# axis {mode}")),
            Command::Grid(on) => out.push(format!(
                "cubeAxes.SetDrawXGridlines({})",
                u8::from(*on)
            )),
            Command::Colorbar => out.push("vtkScalarBarActor".to_string()),
            Command::Colormap(map) => out.push(format!("vtkLookupTable {map}")),
            Command::Hardcopy(file) => {
                let writer = match file.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase()) {
                    Some(ext) if ext == "png" => "vtkPNGWriter",
                    Some(ext) if ext == "jpg" || ext == "jpeg" => "vtkJPEGWriter",
                    Some(ext) if ext == "ps" || ext == "eps" => "vtkPostScriptWriter",
                    _ => {
                        return Err(Error::args(
                            "hardcopy",
                            format!("vtk cannot write '{file}' (use .png, .jpg or .ps)"),
                        ));
                    }
                };
                out.push(format!("vtkWindowToImageFilter -> {writer}({file:?})"));
            }
            Command::Show => out.push("vtkRenderWindowInteractor.Start()".to_string()),
            Command::Clf => out.push("renderer.RemoveAllViewProps()".to_string()),
        }
        Ok(out)
    }

    fn extras(&self) -> &'static [&'static str] {
        &["render_window"]
    }

    fn extra(&self, name: &str, args: &[Value], session: &Session) -> Result<Vec<String>> {
        let [w, h] = args else {
            return Err(Error::args(name, "usage: render_window(width, height)"));
        };
        let (w, h) = (w.number(name)?, h.number(name)?);
        if w < 1.0 || h < 1.0 {
            return Err(Error::args(name, format!("invalid window size {w}x{h}")));
        }
        Ok(vec![format!(
            "window{}.SetSize({}, {})",
            session.figure.max(1),
            w as u32,
            h as u32
        )])
    }
}
