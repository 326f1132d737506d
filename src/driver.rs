//! The graphics driver calls a [`ShaderProgram`](crate::ShaderProgram) is
//! built on.
//!
//! [`GlDriver`] issues them against the OpenGL context current on the calling
//! thread. Anything else implementing [`Driver`] can stand in for it.

use crate::error::Stage;
use gl::types::{GLchar, GLint, GLsizei, GLuint};
use std::{ffi::CString, marker::PhantomData};

/// Driver-assigned identifier of a shader or program object.
pub type Handle = GLuint;

/// Location of a uniform inside a linked program. Negative when unresolved.
pub type Location = GLint;

/// Location the driver reports for a name it does not know.
pub const UNKNOWN_LOCATION: Location = -1;

pub trait Driver {
    fn create_shader(&self, stage: Stage) -> Handle;
    fn shader_source(&self, shader: Handle, source: &str);
    fn compile_shader(&self, shader: Handle);
    fn shader_compile_status(&self, shader: Handle) -> bool;
    /// At most `capacity - 1` bytes of the shader's info log.
    fn shader_info_log(&self, shader: Handle, capacity: usize) -> String;
    fn delete_shader(&self, shader: Handle);

    fn create_program(&self) -> Handle;
    fn attach_shader(&self, program: Handle, shader: Handle);
    fn link_program(&self, program: Handle);
    fn program_link_status(&self, program: Handle) -> bool;
    /// At most `capacity - 1` bytes of the program's info log.
    fn program_info_log(&self, program: Handle, capacity: usize) -> String;
    fn delete_program(&self, program: Handle);

    fn use_program(&self, program: Handle);
    fn current_program(&self) -> Handle;

    fn uniform_location(&self, program: Handle, name: &str) -> Location;
    fn uniform_1i(&self, location: Location, value: i32);
    fn uniform_1f(&self, location: Location, value: f32);
    fn uniform_3f(&self, location: Location, x: f32, y: f32, z: f32);
    fn uniform_3fv(&self, location: Location, value: &[f32; 3]);
    /// Uploads a column-major matrix without transposing it.
    fn uniform_matrix_4fv(&self, location: Location, value: &[f32; 16]);
}

impl<D: Driver + ?Sized> Driver for &D {
    fn create_shader(&self, stage: Stage) -> Handle {
        (**self).create_shader(stage)
    }

    fn shader_source(&self, shader: Handle, source: &str) {
        (**self).shader_source(shader, source)
    }

    fn compile_shader(&self, shader: Handle) {
        (**self).compile_shader(shader)
    }

    fn shader_compile_status(&self, shader: Handle) -> bool {
        (**self).shader_compile_status(shader)
    }

    fn shader_info_log(&self, shader: Handle, capacity: usize) -> String {
        (**self).shader_info_log(shader, capacity)
    }

    fn delete_shader(&self, shader: Handle) {
        (**self).delete_shader(shader)
    }

    fn create_program(&self) -> Handle {
        (**self).create_program()
    }

    fn attach_shader(&self, program: Handle, shader: Handle) {
        (**self).attach_shader(program, shader)
    }

    fn link_program(&self, program: Handle) {
        (**self).link_program(program)
    }

    fn program_link_status(&self, program: Handle) -> bool {
        (**self).program_link_status(program)
    }

    fn program_info_log(&self, program: Handle, capacity: usize) -> String {
        (**self).program_info_log(program, capacity)
    }

    fn delete_program(&self, program: Handle) {
        (**self).delete_program(program)
    }

    fn use_program(&self, program: Handle) {
        (**self).use_program(program)
    }

    fn current_program(&self) -> Handle {
        (**self).current_program()
    }

    fn uniform_location(&self, program: Handle, name: &str) -> Location {
        (**self).uniform_location(program, name)
    }

    fn uniform_1i(&self, location: Location, value: i32) {
        (**self).uniform_1i(location, value)
    }

    fn uniform_1f(&self, location: Location, value: f32) {
        (**self).uniform_1f(location, value)
    }

    fn uniform_3f(&self, location: Location, x: f32, y: f32, z: f32) {
        (**self).uniform_3f(location, x, y, z)
    }

    fn uniform_3fv(&self, location: Location, value: &[f32; 3]) {
        (**self).uniform_3fv(location, value)
    }

    fn uniform_matrix_4fv(&self, location: Location, value: &[f32; 16]) {
        (**self).uniform_matrix_4fv(location, value)
    }
}

/// Raw OpenGL calls through the function pointers loaded by `gl::load_with`.
#[derive(Debug, Clone, Copy)]
pub struct GlDriver {
    // tied to the thread whose context is current
    _not_send: PhantomData<*const ()>,
}

impl GlDriver {
    /// # Safety
    ///
    /// `gl::load_with` must have been called, and an OpenGL context must stay
    /// current on this thread for as long as the driver, or anything built
    /// with it, is in use.
    pub unsafe fn current() -> Self {
        Self {
            _not_send: PhantomData,
        }
    }
}

fn read_info_log(
    capacity: usize,
    fetch: impl FnOnce(GLsizei, *mut GLsizei, *mut GLchar),
) -> String {
    if capacity == 0 {
        return String::new();
    }
    let mut buffer = vec![0u8; capacity];
    let mut written: GLsizei = 0;
    fetch(
        capacity as GLsizei,
        &mut written,
        buffer.as_mut_ptr() as *mut GLchar,
    );
    buffer.truncate(written.max(0) as usize);
    String::from_utf8_lossy(&buffer).into_owned()
}

impl Driver for GlDriver {
    fn create_shader(&self, stage: Stage) -> Handle {
        let kind = match stage {
            Stage::Vertex => gl::VERTEX_SHADER,
            Stage::Fragment => gl::FRAGMENT_SHADER,
        };
        unsafe { gl::CreateShader(kind) }
    }

    fn shader_source(&self, shader: Handle, source: &str) {
        let pointer = source.as_ptr() as *const GLchar;
        let length = source.len() as GLint;
        unsafe { gl::ShaderSource(shader, 1, &pointer, &length) }
    }

    fn compile_shader(&self, shader: Handle) {
        unsafe { gl::CompileShader(shader) }
    }

    fn shader_compile_status(&self, shader: Handle) -> bool {
        let mut success = gl::FALSE as GLint;
        unsafe { gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success) };
        success == gl::TRUE as GLint
    }

    fn shader_info_log(&self, shader: Handle, capacity: usize) -> String {
        read_info_log(capacity, |size, written, buffer| unsafe {
            gl::GetShaderInfoLog(shader, size, written, buffer)
        })
    }

    fn delete_shader(&self, shader: Handle) {
        unsafe { gl::DeleteShader(shader) }
    }

    fn create_program(&self) -> Handle {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: Handle, shader: Handle) {
        unsafe { gl::AttachShader(program, shader) }
    }

    fn link_program(&self, program: Handle) {
        unsafe { gl::LinkProgram(program) }
    }

    fn program_link_status(&self, program: Handle) -> bool {
        let mut success = gl::FALSE as GLint;
        unsafe { gl::GetProgramiv(program, gl::LINK_STATUS, &mut success) };
        success == gl::TRUE as GLint
    }

    fn program_info_log(&self, program: Handle, capacity: usize) -> String {
        read_info_log(capacity, |size, written, buffer| unsafe {
            gl::GetProgramInfoLog(program, size, written, buffer)
        })
    }

    fn delete_program(&self, program: Handle) {
        unsafe { gl::DeleteProgram(program) }
    }

    fn use_program(&self, program: Handle) {
        unsafe { gl::UseProgram(program) }
    }

    fn current_program(&self) -> Handle {
        let mut program: GLint = 0;
        unsafe { gl::GetIntegerv(gl::CURRENT_PROGRAM, &mut program) };
        program as Handle
    }

    fn uniform_location(&self, program: Handle, name: &str) -> Location {
        // a name with an interior nul can never match a uniform
        match CString::new(name) {
            Ok(name) => unsafe {
                gl::GetUniformLocation(program, name.as_ptr())
            },
            Err(_) => UNKNOWN_LOCATION,
        }
    }

    fn uniform_1i(&self, location: Location, value: i32) {
        unsafe { gl::Uniform1i(location, value) }
    }

    fn uniform_1f(&self, location: Location, value: f32) {
        unsafe { gl::Uniform1f(location, value) }
    }

    fn uniform_3f(&self, location: Location, x: f32, y: f32, z: f32) {
        unsafe { gl::Uniform3f(location, x, y, z) }
    }

    fn uniform_3fv(&self, location: Location, value: &[f32; 3]) {
        unsafe { gl::Uniform3fv(location, 1, value.as_ptr()) }
    }

    fn uniform_matrix_4fv(&self, location: Location, value: &[f32; 16]) {
        unsafe {
            gl::UniformMatrix4fv(location, 1, gl::FALSE, value.as_ptr())
        }
    }
}
