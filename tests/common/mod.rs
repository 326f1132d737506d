#![allow(dead_code)]
//! An in-memory driver that records what a `ShaderProgram` asks of it.
//!
//! A stage compiles when its source has a `void main` and no `@`. A program
//! links when it has one compiled vertex and one compiled fragment stage.
//! Uniforms are every `uniform <type> <name>;` statement of the linked stages.

use shader_program::{Driver, Handle, Location, Stage};
use std::{cell::RefCell, collections::HashMap};

pub const VERTEX_SRC: &str = "#version 330 core
layout (location = 0) in vec3 position;
uniform mat4 view_projection;
uniform mat4 model;
void main() {
    gl_Position = view_projection * model * vec4(position, 1.0);
}
";

pub const FRAGMENT_SRC: &str = "#version 330 core
out vec4 color;
uniform vec3 tint;
uniform float time;
uniform int mode;
void main() {
    color = vec4(tint * time, float(mode));
}
";

pub const BROKEN_SRC: &str = "#version 330 core
void main() {
    gl_Position = @;
}
";

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Float(f32),
    Vec3([f32; 3]),
    Mat4([f32; 16]),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub program: Handle,
    pub name: String,
    pub value: Value,
}

#[derive(Debug)]
struct Shader {
    stage: Stage,
    source: String,
    compiled: bool,
    deleted: bool,
}

#[derive(Debug, Default)]
struct Program {
    attached: Vec<Handle>,
    linked: bool,
    uniforms: Vec<String>,
    deletions: usize,
}

#[derive(Debug, Default)]
struct State {
    next_handle: Handle,
    shaders: HashMap<Handle, Shader>,
    programs: HashMap<Handle, Program>,
    // location -> (program, name)
    locations: Vec<(Handle, String)>,
    current: Handle,
    last_program: Option<Handle>,
    use_calls: usize,
    uploads: Vec<Upload>,
    compile_log: Option<String>,
}

impl State {
    fn allocate(&mut self) -> Handle {
        self.next_handle += 1;
        self.next_handle
    }

    fn upload(&mut self, location: Location, value: Value) {
        let (program, name) = self.locations[location as usize].clone();
        assert_eq!(
            program, self.current,
            "uniform `{}` uploaded while another program is current",
            name
        );
        self.uploads.push(Upload {
            program,
            name,
            value,
        });
    }
}

#[derive(Debug, Default)]
pub struct FakeDriver {
    state: RefCell<State>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every failed compile reports `log` instead of the default message.
    pub fn with_compile_log(log: impl Into<String>) -> Self {
        let driver = Self::default();
        driver.state.borrow_mut().compile_log = Some(log.into());
        driver
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.state.borrow().uploads.clone()
    }

    /// The most recently created program, even if it has been deleted since.
    pub fn last_program(&self) -> Option<Handle> {
        self.state.borrow().last_program
    }

    pub fn use_calls(&self) -> usize {
        self.state.borrow().use_calls
    }

    pub fn is_linked(&self, program: Handle) -> bool {
        self.state.borrow().programs[&program].linked
    }

    pub fn program_deletions(&self, program: Handle) -> usize {
        self.state.borrow().programs[&program].deletions
    }

    pub fn live_shaders(&self) -> usize {
        let state = self.state.borrow();
        state.shaders.values().filter(|shader| !shader.deleted).count()
    }

    pub fn shader_sources(&self, program: Handle) -> Vec<(Stage, String)> {
        let state = self.state.borrow();
        state.programs[&program]
            .attached
            .iter()
            .map(|handle| {
                let shader = &state.shaders[handle];
                (shader.stage, shader.source.clone())
            })
            .collect()
    }
}

fn truncate(log: &str, capacity: usize) -> String {
    let mut end = capacity.saturating_sub(1).min(log.len());
    while !log.is_char_boundary(end) {
        end -= 1;
    }
    log[..end].to_owned()
}

fn uniform_names(source: &str) -> Vec<String> {
    source
        .split(';')
        .map(str::trim)
        .filter(|statement| statement.starts_with("uniform "))
        .filter_map(|statement| statement.split_whitespace().last())
        .map(str::to_owned)
        .collect()
}

impl Driver for FakeDriver {
    fn create_shader(&self, stage: Stage) -> Handle {
        let mut state = self.state.borrow_mut();
        let handle = state.allocate();
        state.shaders.insert(
            handle,
            Shader {
                stage,
                source: String::new(),
                compiled: false,
                deleted: false,
            },
        );
        handle
    }

    fn shader_source(&self, shader: Handle, source: &str) {
        let mut state = self.state.borrow_mut();
        state.shaders.get_mut(&shader).unwrap().source = source.to_owned();
    }

    fn compile_shader(&self, shader: Handle) {
        let mut state = self.state.borrow_mut();
        let shader = state.shaders.get_mut(&shader).unwrap();
        shader.compiled =
            shader.source.contains("void main") && !shader.source.contains('@');
    }

    fn shader_compile_status(&self, shader: Handle) -> bool {
        self.state.borrow().shaders[&shader].compiled
    }

    fn shader_info_log(&self, shader: Handle, capacity: usize) -> String {
        let state = self.state.borrow();
        if state.shaders[&shader].compiled {
            return String::new();
        }
        let log = match &state.compile_log {
            Some(log) => log.clone(),
            None => "0:3: error: syntax error, unexpected '@'".to_owned(),
        };
        truncate(&log, capacity)
    }

    fn delete_shader(&self, shader: Handle) {
        let mut state = self.state.borrow_mut();
        state.shaders.get_mut(&shader).unwrap().deleted = true;
    }

    fn create_program(&self) -> Handle {
        let mut state = self.state.borrow_mut();
        let handle = state.allocate();
        state.programs.insert(handle, Program::default());
        state.last_program = Some(handle);
        handle
    }

    fn attach_shader(&self, program: Handle, shader: Handle) {
        let mut state = self.state.borrow_mut();
        state.programs.get_mut(&program).unwrap().attached.push(shader);
    }

    fn link_program(&self, program: Handle) {
        let mut state = self.state.borrow_mut();
        let attached = state.programs[&program].attached.clone();
        let stages: Vec<_> = attached
            .iter()
            .map(|handle| &state.shaders[handle])
            .filter(|shader| shader.compiled)
            .map(|shader| shader.stage)
            .collect();
        let linked = stages.len() == 2
            && stages.contains(&Stage::Vertex)
            && stages.contains(&Stage::Fragment);
        let uniforms = if linked {
            attached
                .iter()
                .flat_map(|handle| uniform_names(&state.shaders[handle].source))
                .collect()
        } else {
            Vec::new()
        };
        let entry = state.programs.get_mut(&program).unwrap();
        entry.linked = linked;
        entry.uniforms = uniforms;
    }

    fn program_link_status(&self, program: Handle) -> bool {
        self.state.borrow().programs[&program].linked
    }

    fn program_info_log(&self, program: Handle, capacity: usize) -> String {
        if self.program_link_status(program) {
            String::new()
        } else {
            truncate(
                "error: linking with uncompiled/unspecialized shader",
                capacity,
            )
        }
    }

    fn delete_program(&self, program: Handle) {
        let mut state = self.state.borrow_mut();
        state.programs.get_mut(&program).unwrap().deletions += 1;
        if state.current == program {
            state.current = 0;
        }
    }

    fn use_program(&self, program: Handle) {
        let mut state = self.state.borrow_mut();
        state.use_calls += 1;
        if program == 0 || state.programs[&program].linked {
            state.current = program;
        }
    }

    fn current_program(&self) -> Handle {
        self.state.borrow().current
    }

    fn uniform_location(&self, program: Handle, name: &str) -> Location {
        let mut state = self.state.borrow_mut();
        if !state.programs[&program].uniforms.iter().any(|u| u == name) {
            return -1;
        }
        let key = (program, name.to_owned());
        match state.locations.iter().position(|entry| *entry == key) {
            Some(location) => location as Location,
            None => {
                state.locations.push(key);
                (state.locations.len() - 1) as Location
            }
        }
    }

    fn uniform_1i(&self, location: Location, value: i32) {
        self.state.borrow_mut().upload(location, Value::Int(value));
    }

    fn uniform_1f(&self, location: Location, value: f32) {
        self.state.borrow_mut().upload(location, Value::Float(value));
    }

    fn uniform_3f(&self, location: Location, x: f32, y: f32, z: f32) {
        self.state
            .borrow_mut()
            .upload(location, Value::Vec3([x, y, z]));
    }

    fn uniform_3fv(&self, location: Location, value: &[f32; 3]) {
        self.state.borrow_mut().upload(location, Value::Vec3(*value));
    }

    fn uniform_matrix_4fv(&self, location: Location, value: &[f32; 16]) {
        self.state.borrow_mut().upload(location, Value::Mat4(*value));
    }
}
