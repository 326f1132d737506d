use crate::{
    driver::{Driver, GlDriver, Handle, Location},
    error::{ShaderError, Stage},
    source::{read_source, stage_paths},
};
use std::path::Path;

/// Bytes fetched from a compile or link info log, terminator included.
pub const INFO_LOG_CAPACITY: usize = 512;

/// A linked vertex + fragment program, deleted from the driver on drop.
///
/// Construction never fails outright: every read, compile and link failure is
/// logged and kept in [`diagnostics`](Self::diagnostics). A program that did
/// not link stays usable, but [`use_program`](Self::use_program) and the
/// uniform setters do nothing for it. Use [`load`](Self::load) or
/// [`into_result`](Self::into_result) to get the first failure as an error.
#[derive(Debug)]
pub struct ShaderProgram<D: Driver = GlDriver> {
    driver: D,
    handle: Handle,
    linked: bool,
    diagnostics: Vec<ShaderError>,
}

impl<D: Driver> ShaderProgram<D> {
    /// Builds from `<base>.vs` and `<base>.fs`.
    pub fn from_path(driver: D, base: impl AsRef<Path>) -> Self {
        let (vertex_path, fragment_path) = stage_paths(base);
        Self::from_paths(driver, vertex_path, fragment_path)
    }

    /// Builds from two source files. An unreadable file compiles as an empty
    /// source.
    pub fn from_paths(
        driver: D,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Self {
        let mut diagnostics = Vec::new();
        let mut read = |path: &Path| {
            read_source(path).unwrap_or_else(|error| {
                log::error!("{}", error);
                diagnostics.push(error);
                String::new()
            })
        };
        let vertex = read(vertex_path.as_ref());
        let fragment = read(fragment_path.as_ref());

        let mut program = Self::from_sources(driver, &vertex, &fragment);
        diagnostics.append(&mut program.diagnostics);
        program.diagnostics = diagnostics;
        program
    }

    /// Compiles both stages and links them.
    pub fn from_sources(driver: D, vertex: &str, fragment: &str) -> Self {
        let mut diagnostics = Vec::new();

        let vertex_shader =
            compile_stage(&driver, Stage::Vertex, vertex, &mut diagnostics);
        let fragment_shader = compile_stage(
            &driver,
            Stage::Fragment,
            fragment,
            &mut diagnostics,
        );

        let handle = driver.create_program();
        driver.attach_shader(handle, vertex_shader);
        driver.attach_shader(handle, fragment_shader);
        driver.link_program(handle);

        let linked = driver.program_link_status(handle);
        if !linked {
            let info_log = driver.program_info_log(handle, INFO_LOG_CAPACITY);
            let error = ShaderError::Link { log: info_log };
            log::error!("{}", error);
            diagnostics.push(error);
        }

        driver.delete_shader(vertex_shader);
        driver.delete_shader(fragment_shader);

        log::debug!("program {} built, linked: {}", handle, linked);

        Self {
            driver,
            handle,
            linked,
            diagnostics,
        }
    }

    /// Like [`from_path`](Self::from_path), failing on the first diagnostic.
    pub fn load(
        driver: D,
        base: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        Self::from_path(driver, base).into_result()
    }

    /// Like [`from_paths`](Self::from_paths), failing on the first diagnostic.
    pub fn load_paths(
        driver: D,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        Self::from_paths(driver, vertex_path, fragment_path).into_result()
    }

    /// The first recorded failure, if any. The program is released on error.
    pub fn into_result(mut self) -> Result<Self, ShaderError> {
        if self.diagnostics.is_empty() {
            Ok(self)
        } else {
            Err(self.diagnostics.remove(0))
        }
    }

    pub fn program(&self) -> Handle {
        self.handle
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Failures recorded while reading, compiling and linking, in that order.
    pub fn diagnostics(&self) -> &[ShaderError] {
        &self.diagnostics
    }

    /// Makes this the current program on the context.
    ///
    /// The returned interface binds this program again before an upload if
    /// another one was made current in the meantime.
    pub fn use_program(&self) -> Uniforms<'_, D> {
        if self.linked {
            self.driver.use_program(self.handle);
        } else {
            log::warn!("program {} did not link, not binding it", self.handle);
        }
        Uniforms { program: self }
    }

    pub fn set_int(&self, name: &str, value: i32) {
        self.uniforms().set_int(name, value);
    }

    pub fn set_float(&self, name: &str, value: f32) {
        self.uniforms().set_float(name, value);
    }

    pub fn set_vec3(&self, name: &str, x: f32, y: f32, z: f32) {
        self.uniforms().set_vec3(name, x, y, z);
    }

    pub fn set_vec3v(&self, name: &str, value: &glm::Vec3) {
        self.uniforms().set_vec3v(name, value);
    }

    pub fn set_mat4(&self, name: &str, value: &glm::Mat4) {
        self.uniforms().set_mat4(name, value);
    }

    fn uniforms(&self) -> Uniforms<'_, D> {
        Uniforms { program: self }
    }
}

impl<D: Driver> Drop for ShaderProgram<D> {
    fn drop(&mut self) {
        self.driver.delete_program(self.handle);
    }
}

fn compile_stage<D: Driver>(
    driver: &D,
    stage: Stage,
    source: &str,
    diagnostics: &mut Vec<ShaderError>,
) -> Handle {
    let shader = driver.create_shader(stage);
    driver.shader_source(shader, source);
    driver.compile_shader(shader);
    if !driver.shader_compile_status(shader) {
        let info_log = driver.shader_info_log(shader, INFO_LOG_CAPACITY);
        let error = ShaderError::Compile {
            stage,
            log: info_log,
        };
        log::error!("{}", error);
        diagnostics.push(error);
    }
    shader
}

/// Uniform uploads for a program returned by
/// [`ShaderProgram::use_program`].
///
/// Every upload binds the program first unless it is already current. Names
/// the program does not know are ignored.
pub struct Uniforms<'a, D: Driver> {
    program: &'a ShaderProgram<D>,
}

impl<'a, D: Driver> Uniforms<'a, D> {
    fn location(&self, name: &str) -> Option<Location> {
        let program = self.program;
        if !program.linked {
            return None;
        }
        if program.driver.current_program() != program.handle {
            log::trace!(
                "binding program {} for a uniform upload",
                program.handle
            );
            program.driver.use_program(program.handle);
        }
        let location = program.driver.uniform_location(program.handle, name);
        if location < 0 {
            log::trace!("no uniform `{}` in program {}", name, program.handle);
            None
        } else {
            Some(location)
        }
    }

    pub fn set_int(&self, name: &str, value: i32) {
        if let Some(location) = self.location(name) {
            self.program.driver.uniform_1i(location, value);
        }
    }

    pub fn set_float(&self, name: &str, value: f32) {
        if let Some(location) = self.location(name) {
            self.program.driver.uniform_1f(location, value);
        }
    }

    pub fn set_vec3(&self, name: &str, x: f32, y: f32, z: f32) {
        if let Some(location) = self.location(name) {
            self.program.driver.uniform_3f(location, x, y, z);
        }
    }

    pub fn set_vec3v(&self, name: &str, value: &glm::Vec3) {
        if let Some(location) = self.location(name) {
            self.program
                .driver
                .uniform_3fv(location, &[value.x, value.y, value.z]);
        }
    }

    pub fn set_mat4(&self, name: &str, value: &glm::Mat4) {
        if let Some(location) = self.location(name) {
            let mut columns = [0.0; 16];
            columns.copy_from_slice(value.as_slice());
            self.program.driver.uniform_matrix_4fv(location, &columns);
        }
    }
}
