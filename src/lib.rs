//! Loading, compiling, linking and binding OpenGL shader programs, and
//! uploading their uniforms.
//!
//! ```no_run
//! use shader_program::{GlDriver, ShaderProgram};
//!
//! // after gl::load_with, with the context current on this thread
//! let driver = unsafe { GlDriver::current() };
//! let program = ShaderProgram::load(driver, "shaders/triangle")?;
//! let uniforms = program.use_program();
//! uniforms.set_float("time", 0.5);
//! # Ok::<(), shader_program::ShaderError>(())
//! ```

extern crate nalgebra_glm as glm;

pub mod driver;
mod error;
mod program;
pub mod source;

pub use driver::{Driver, GlDriver, Handle, Location};
pub use error::{ShaderError, Stage};
pub use program::{ShaderProgram, Uniforms, INFO_LOG_CAPACITY};
