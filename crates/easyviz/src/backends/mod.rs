//! Built-in backends.

/// Gnuplot script backend.
pub mod gnuplot;
/// Pyplot script backend.
pub mod matplotlib;
/// Call-trace backend.
pub mod template;
/// VTK pipeline backend.
#[cfg(feature = "vtk")]
pub mod vtk;

pub use gnuplot::GnuplotBackend;
pub use matplotlib::MatplotlibBackend;
pub use template::TemplateBackend;
#[cfg(feature = "vtk")]
pub use vtk::VtkBackend;
