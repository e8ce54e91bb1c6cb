//! ferrogl core crate.
//!
//! Typed GPU resources and host/shader value marshalling over an abstract
//! graphics API. Everything that touches the driver goes through
//! [`api::GraphicsApi`], so the same code runs against a real context or the
//! in-process [`headless::HeadlessGl`].
//!
//! | Module | Contents |
//! |---|---|
//! | [`types`] | Shading-language type registry: sizes, layout slots, names |
//! | [`marshal`] | Flattening host values to wire buffers and back |
//! | [`object`] | Lifecycle of buffers, shaders, programs, pipelines, vertex arrays, textures |
//! | [`api`] | The driver seam and its command vocabulary |
//! | [`headless`] | Software implementation of the seam |
//! | [`texture`] | Pixel shape checks and image sources |
//! | [`math`] | Row-major matrix values |
//! | [`logging`] | Logger initialization |
//!
//! ```
//! use ferrogl_core::api::ShaderStage;
//! use ferrogl_core::headless::HeadlessGl;
//! use ferrogl_core::math::Mat2;
//! use ferrogl_core::object::{GlObject, Program, Shader};
//!
//! # fn main() -> ferrogl_core::Result<()> {
//! let mut gl = HeadlessGl::default();
//! let mut shader = Shader::new(ShaderStage::Vertex, "uniform mat2 rotation;\nvoid main() {}");
//! shader.create(&mut gl)?;
//! shader.compile(&mut gl)?;
//!
//! let mut program = Program::new();
//! program.create(&mut gl)?;
//! program.attach(&mut gl, &shader)?;
//! program.link(&mut gl)?;
//!
//! let rotation = Mat2::from_rows([[0.0, -1.0], [1.0, 0.0]]);
//! program.set_uniform(&mut gl, "rotation", rotation)?;
//! assert_eq!(program.get_uniform::<Mat2>(&mut gl, "rotation")?, rotation);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod headless;
pub mod logging;
pub mod marshal;
pub mod math;
pub mod object;
pub mod texture;
pub mod types;

mod error;

pub use error::{GlError, Result};
