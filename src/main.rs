extern crate nalgebra_glm as glm;

use gl::types::{GLsizei, GLsizeiptr};
use shader_program::{GlDriver, ShaderProgram};
use std::time::Instant;

const SCREEN_WIDTH: u32 = 800;
const SCREEN_HEIGHT: u32 = 600;
const DEFAULT_SHADER: &str = "shaders/triangle";

type Position = [f32; 3];
type RGB = [f32; 3];

// fields are read by the driver out of the vertex buffer
#[allow(dead_code)]
#[repr(C)]
struct Vertex {
    position: Position,
    color: RGB,
}

const TRIANGLE: [Vertex; 3] = [
    Vertex {
        position: [0.5, -0.5, 0.0],
        color: [0.0, 1.0, 0.0],
    },
    Vertex {
        position: [0.0, 0.5, 0.0],
        color: [0.0, 0.0, 1.0],
    },
    Vertex {
        position: [-0.5, -0.5, 0.0],
        color: [1.0, 0.0, 0.0],
    },
];

struct Triangle {
    vao: u32,
    vbo: u32,
}

impl Triangle {
    unsafe fn new() -> Self {
        let (mut vao, mut vbo) = (0, 0);
        gl::GenVertexArrays(1, &mut vao);
        gl::GenBuffers(1, &mut vbo);
        gl::BindVertexArray(vao);
        gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
        gl::BufferData(
            gl::ARRAY_BUFFER,
            std::mem::size_of_val(&TRIANGLE) as GLsizeiptr,
            TRIANGLE.as_ptr() as *const _,
            gl::STATIC_DRAW,
        );

        let stride = std::mem::size_of::<Vertex>() as GLsizei;
        let rgb_offset = std::mem::size_of::<Position>();
        gl::EnableVertexAttribArray(0);
        gl::VertexAttribPointer(
            0,
            3,
            gl::FLOAT,
            gl::FALSE,
            stride,
            std::ptr::null(),
        );
        gl::EnableVertexAttribArray(1);
        gl::VertexAttribPointer(
            1,
            3,
            gl::FLOAT,
            gl::FALSE,
            stride,
            rgb_offset as *const _,
        );
        gl::BindVertexArray(0);

        Self { vao, vbo }
    }

    unsafe fn draw(&self) {
        gl::BindVertexArray(self.vao);
        gl::DrawArrays(gl::TRIANGLES, 0, TRIANGLE.len() as GLsizei);
        gl::BindVertexArray(0);
    }
}

impl Drop for Triangle {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteVertexArrays(1, &self.vao);
        }
    }
}

fn main() {
    env_logger::init();

    let base = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SHADER.to_owned());

    let sdl = sdl2::init().expect("Could not init sdl2");
    let video_system = sdl.video().expect("Could not initialize video system");
    {
        let gl_attr = video_system.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(3, 3);
    }

    let window = video_system
        .window("shader-program", SCREEN_WIDTH, SCREEN_HEIGHT)
        .opengl()
        .resizable()
        .build()
        .expect("Could not create window");
    let _gl_context = window
        .gl_create_context()
        .expect("Could not create OpenGL context");
    gl::load_with(|s| video_system.gl_get_proc_address(s) as *const _);

    // the context above stays current on this thread until main returns
    let driver = unsafe { GlDriver::current() };
    let program = ShaderProgram::from_path(driver, &base);
    if !program.is_linked() {
        // each diagnostic was already logged while building
        log::error!(
            "{} did not link ({} diagnostics)",
            base,
            program.diagnostics().len()
        );
        std::process::exit(1);
    }
    log::info!("loaded {} as program {}", base, program.program());

    let triangle = unsafe { Triangle::new() };
    let mut event_pump = sdl.event_pump().expect("Could not get event pump");

    let (width, height) = window.size();
    let mut aspect = width as f32 / height as f32;

    let start = Instant::now();
    'app: loop {
        for event in event_pump.poll_iter() {
            use sdl2::event::Event;
            match event {
                Event::Quit { .. } => {
                    break 'app;
                }
                Event::KeyDown { scancode, .. } => {
                    use sdl2::keyboard::Scancode::*;
                    if let Some(Escape) = scancode {
                        break 'app;
                    }
                }
                Event::Window { win_event, .. } => {
                    use sdl2::event::WindowEvent;
                    if let WindowEvent::SizeChanged(width, height) = win_event {
                        aspect = width as f32 / height.max(1) as f32;
                        unsafe { gl::Viewport(0, 0, width, height) };
                    }
                }
                _ => {}
            }
        }

        let time = start.elapsed().as_secs_f32();
        let projection = glm::perspective_rh(aspect, 0.9, 0.1, 100.0);
        let view: glm::Mat4 =
            glm::translate(&glm::identity(), &glm::vec3(0.0, 0.0, -2.0));
        let model: glm::Mat4 =
            glm::rotate(&glm::identity(), time, &glm::vec3(0.0, 1.0, 0.0));

        unsafe {
            gl::ClearColor(0.1, 0.2, 0.3, 1.0);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }

        let uniforms = program.use_program();
        uniforms.set_mat4("view_projection", &(projection * view));
        uniforms.set_mat4("model", &model);
        uniforms.set_vec3v("tint", &glm::vec3(1.0, 0.9, 0.8));
        uniforms.set_float("time", time);
        unsafe { triangle.draw() };

        window.gl_swap_window();
    }
}
