use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};

use ferrogl_core::api::{BufferTarget, BufferUsage, ShaderStage, TextureFilter, TextureParameter};
use ferrogl_core::headless::HeadlessGl;
use ferrogl_core::logging::{LoggingConfig, init_logging};
use ferrogl_core::math::{Mat3, Mat4};
use ferrogl_core::object::{
    Bindable, Buffer, GlObject, Program, ProgramPipeline, Shader, Texture2D, VertexArray, VertexAttribute,
};
use ferrogl_core::texture::SourceImage;
use ferrogl_core::types::ElementType;

const VERTEX: &str = "\
#version 450 core
uniform mat4 model;
uniform mat3 normal_matrix;
uniform vec3 lights[2];
void main() {}
";

const FRAGMENT: &str = "\
#version 450 core
uniform sampler2D albedo;
uniform vec4 tint;
uniform bool shaded;
void main() {}
";

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    uv: [f32; 2],
}

const QUAD: [Vertex; 4] = [
    Vertex { position: [-1.0, -1.0, 0.0], uv: [0.0, 0.0] },
    Vertex { position: [1.0, -1.0, 0.0], uv: [1.0, 0.0] },
    Vertex { position: [1.0, 1.0, 0.0], uv: [1.0, 1.0] },
    Vertex { position: [-1.0, 1.0, 0.0], uv: [0.0, 1.0] },
];

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    print_type_table();

    let mut gl = HeadlessGl::default();

    let mut buffer = Buffer::new(BufferTarget::Array);
    buffer.create(&mut gl).context("creating vertex buffer")?;
    buffer.set_data(&mut gl, &QUAD, BufferUsage::StaticDraw).context("uploading quad")?;

    let mut vao = VertexArray::new();
    vao.create(&mut gl).context("creating vertex array")?;
    vao.add_binding_point(0, 0)?;
    vao.add_vertex_attribute(0, VertexAttribute::of::<[f32; 3]>(0));
    vao.add_vertex_attribute(0, VertexAttribute::of::<[f32; 2]>(1));
    vao.setup(&mut gl, &buffer).context("configuring vertex input")?;
    for layout in vao.compute_layout()? {
        log::info!("binding {}: stride {} bytes", layout.binding, layout.stride);
    }

    let mut program = build_program(&mut gl).context("building forward program")?;
    program.bind(&mut gl)?;
    program.set_uniform(&mut gl, "model", Mat4::identity())?;
    program.set_uniform(&mut gl, "normal_matrix", Mat3::identity())?;
    program.set_uniform_array(&mut gl, "lights", &[[0.0f32, 4.0, 2.0], [-3.0, 1.0, 0.5]])?;
    program.set_uniform(&mut gl, "tint", [1.0f32, 0.8, 0.6, 1.0])?;
    program.set_uniform(&mut gl, "shaded", true)?;

    let lights = program.get_uniform_array::<[f32; 3]>(&mut gl, "lights", 2)?;
    let shaded = program.get_uniform::<bool>(&mut gl, "shaded")?;
    println!("lights = {lights:?}, shaded = {shaded}");

    let mut pipeline = ProgramPipeline::new();
    pipeline.create(&mut gl).context("creating pipeline")?;
    pipeline.add_stage(&mut gl, &mut [Shader::new(ShaderStage::Vertex, VERTEX)])?;
    pipeline.add_stage(&mut gl, &mut [Shader::new(ShaderStage::Fragment, FRAGMENT)])?;
    pipeline.use_all_stages(&mut gl)?;
    pipeline.bind(&mut gl)?;

    let mut texture = Texture2D::new(checkerboard(8)?, true);
    texture.create(&mut gl).context("uploading checkerboard")?;
    texture.texture().set_parameter(&mut gl, TextureParameter::MinFilter(TextureFilter::LinearMipmapLinear))?;
    texture.texture().bind_unit(&mut gl, 0)?;

    println!("{} driver calls, {} driver messages", gl.calls().len(), gl.messages().len());

    texture.delete(&mut gl);
    pipeline.delete(&mut gl);
    program.delete(&mut gl);
    vao.delete(&mut gl);
    buffer.delete(&mut gl);
    Ok(())
}

fn build_program(gl: &mut HeadlessGl) -> Result<Program> {
    let mut shaders = [Shader::new(ShaderStage::Vertex, VERTEX), Shader::new(ShaderStage::Fragment, FRAGMENT)];
    let mut program = Program::new();
    program.create(gl)?;
    for shader in &mut shaders {
        shader.create(gl)?;
        shader.compile(gl).with_context(|| format!("compiling {} shader", shader.stage().name()))?;
        program.attach(gl, shader)?;
    }
    program.link(gl)?;
    for shader in &mut shaders {
        program.detach(gl, shader)?;
        shader.delete(gl);
    }
    Ok(program)
}

fn checkerboard(size: u32) -> Result<SourceImage> {
    let pixels = (0..size * size)
        .map(|i| if (i % size + i / size) % 2 == 0 { [255, 255, 255, 255] } else { [32, 32, 32, 255] })
        .collect();
    Ok(SourceImage::new(size, size, pixels)?)
}

fn print_type_table() {
    println!("{:<10} {:>6} {:>6} {:>6}", "type", "comps", "bytes", "slots");
    for ty in ElementType::SUPPORTED {
        println!(
            "{:<10} {:>6} {:>6} {:>6}",
            ty.glsl_name(),
            ty.component_count(),
            ty.total_size(),
            ty.layout_slots()
        );
    }
}
