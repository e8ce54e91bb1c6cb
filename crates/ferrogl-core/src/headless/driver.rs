use crate::api::{
    AttribFormat, BindTarget, BufferUsage, BuildStatus, GraphicsApi, InternalFormat, ObjectKind, ProgramStages,
    ShaderStage, StorageFlags, TexImage, TextureParameter, UniformShape, UniformTarget, UniformWrite,
};
use crate::marshal::{WireData, WireSlice, WireSliceMut};
use crate::types::{ElementKind, ElementType};

use super::state::{
    ActiveUniform, BufferObject, Object, PipelineObject, ProgramObject, ShaderObject, TextureLevel, TextureObject,
    TextureStorage, VertexArrayObject, VertexAttribState, VertexBufferBinding,
};
use super::{Call, HeadlessGl, glsl, report};

const fn delete_entry_point(kind: ObjectKind) -> &'static str {
    match kind {
        ObjectKind::Buffer => "glDeleteBuffers",
        ObjectKind::Shader(_) => "glDeleteShader",
        ObjectKind::Program => "glDeleteProgram",
        ObjectKind::ProgramPipeline => "glDeleteProgramPipelines",
        ObjectKind::VertexArray => "glDeleteVertexArrays",
        ObjectKind::Texture => "glDeleteTextures",
    }
}

/// Looks up a live object of one variant, reporting a missing or mistyped name.
macro_rules! typed_object {
    ($fn:ident, $variant:ident, $ty:ty, $what:literal) => {
        fn $fn(&mut self, handle: u32, call: &'static str) -> Option<&mut $ty> {
            match self.objects.get_mut(&handle) {
                Some(Object::$variant(object)) => Some(object),
                Some(other) => {
                    let text = format!("object {handle} is a {}, not a {}", other.kind_name(), $what);
                    report(&mut self.messages, call, text);
                    None
                }
                None => {
                    report(&mut self.messages, call, format!("{handle} is not a live {}", $what));
                    None
                }
            }
        }
    };
}

impl HeadlessGl {
    typed_object!(buffer_mut, Buffer, BufferObject, "buffer");
    typed_object!(shader_mut, Shader, ShaderObject, "shader");
    typed_object!(program_mut, Program, ProgramObject, "program");
    typed_object!(pipeline_mut, Pipeline, PipelineObject, "program pipeline");
    typed_object!(vertex_array_mut, VertexArray, VertexArrayObject, "vertex array");
    typed_object!(texture_mut, Texture, TextureObject, "texture");

    /// Drops one attachment of `shader`, freeing it if it was pending deletion.
    fn release_shader(&mut self, shader: u32) {
        let free = match self.objects.get_mut(&shader) {
            Some(Object::Shader(s)) => {
                s.attachments = s.attachments.saturating_sub(1);
                s.pending_delete && s.attachments == 0
            }
            _ => false,
        };
        if free {
            self.objects.remove(&shader);
            log::trace!("shader {shader} freed after its last detach");
        }
    }

    fn link(&self, attached: &[u32]) -> Result<Vec<ActiveUniform>, String> {
        if attached.is_empty() {
            return Err("error: no shaders attached".to_owned());
        }

        let mut shaders = Vec::with_capacity(attached.len());
        for &handle in attached {
            match self.objects.get(&handle) {
                Some(Object::Shader(s)) if s.compiled => shaders.push(s),
                _ => return Err(format!("error: shader {handle} is not compiled")),
            }
        }
        let compute = shaders.iter().filter(|s| s.stage == ShaderStage::Compute).count();
        if compute > 0 && compute < shaders.len() {
            return Err("error: compute shaders cannot be linked with other stages".to_owned());
        }

        let mut uniforms: Vec<ActiveUniform> = Vec::new();
        let mut location = 0i32;
        for decl in shaders.into_iter().flat_map(|s| &s.uniforms) {
            if let Some(existing) = uniforms.iter().find(|u| u.name == decl.name) {
                if existing.ty != decl.ty {
                    return Err(format!(
                        "error: uniform `{}` declared as `{}` and `{}`",
                        decl.name, existing.ty, decl.ty
                    ));
                }
                continue;
            }
            let active = ActiveUniform {
                name: decl.name.clone(),
                ty: decl.ty,
                location,
                values: WireData::zeroed(decl.ty.kind().wire_kind(), decl.ty.flat_len()),
            };
            location += active.len() as i32;
            uniforms.push(active);
        }
        Ok(uniforms)
    }
}

/// Resolves `name`, `name[i]` against a linked uniform list.
fn resolve_location(uniforms: &[ActiveUniform], name: &str) -> Option<i32> {
    let (base, index) = match name.strip_suffix(']').and_then(|n| n.split_once('[')) {
        Some((base, index)) => (base, Some(index.parse::<usize>().ok()?)),
        None => (name, None),
    };
    let uniform = uniforms.iter().find(|u| u.name == base)?;
    match index {
        None => Some(uniform.location),
        Some(i) if uniform.ty.array_length().is_some_and(|len| i < len) => Some(uniform.location + i as i32),
        Some(_) => None,
    }
}

fn shape_matches(shape: UniformShape, element: ElementType) -> bool {
    match (shape, element) {
        (UniformShape::Vector { components: 1 }, ElementType::Scalar(_)) => true,
        (UniformShape::Vector { components }, ElementType::Vector(v)) => components == v.components(),
        (UniformShape::Matrix { columns, rows, .. }, ElementType::Matrix(m)) => {
            columns == m.columns() && rows == m.rows()
        }
        _ => false,
    }
}

/// Copies `count` elements into `dst` starting at element `first`. Transposed
/// matrices arrive row by row and are stored column by column.
fn store<T: Copy>(dst: &mut [T], src: &[T], first: usize, count: usize, shape: UniformShape) {
    let n = shape.components();
    for e in 0..count {
        let out = &mut dst[(first + e) * n..(first + e + 1) * n];
        let input = &src[e * n..(e + 1) * n];
        match shape {
            UniformShape::Matrix { columns, rows, transpose: true } => {
                let (columns, rows) = (columns as usize, rows as usize);
                for r in 0..rows {
                    for c in 0..columns {
                        out[c * rows + r] = input[r * columns + c];
                    }
                }
            }
            _ => out.copy_from_slice(input),
        }
    }
}

fn load<T: Copy>(dst: &mut [T], src: &[T]) {
    let n = dst.len().min(src.len());
    dst[..n].copy_from_slice(&src[..n]);
}

impl GraphicsApi for HeadlessGl {
    fn create_object(&mut self, kind: ObjectKind) -> u32 {
        let handle = self.next_name;
        self.next_name += 1;
        self.objects.insert(handle, Object::new(kind));
        self.calls.push(Call::CreateObject { kind, handle });
        handle
    }

    fn delete_object(&mut self, kind: ObjectKind, handle: u32) {
        self.calls.push(Call::DeleteObject { kind, handle });
        if handle == 0 {
            return;
        }
        let call = delete_entry_point(kind);

        let attached = match self.objects.get_mut(&handle) {
            None => {
                if self.init.report_double_delete {
                    report(&mut self.messages, call, format!("{handle} is not a live {}", kind.name()));
                }
                return;
            }
            Some(object) if object.kind_name() != kind.name() => {
                let text = format!("object {handle} is a {}, not a {}", object.kind_name(), kind.name());
                report(&mut self.messages, call, text);
                return;
            }
            Some(Object::Shader(shader)) if shader.pending_delete => {
                if self.init.report_double_delete {
                    report(&mut self.messages, call, format!("shader {handle} is already pending deletion"));
                }
                return;
            }
            Some(Object::Shader(shader)) if shader.attachments > 0 => {
                shader.pending_delete = true;
                return;
            }
            Some(Object::Program(program)) => std::mem::take(&mut program.attached),
            Some(_) => Vec::new(),
        };

        self.objects.remove(&handle);
        self.bound.retain(|_, bound| *bound != handle);
        for shader in attached {
            self.release_shader(shader);
        }
    }

    fn bind_object(&mut self, target: BindTarget, handle: u32) {
        self.calls.push(Call::BindObject { target, handle });
        let key = self.binding_key(target);
        if handle == 0 {
            self.bound.remove(&key);
            return;
        }

        let accepted = match (target, self.objects.get(&handle)) {
            (BindTarget::Buffer(_), Some(Object::Buffer(_))) => Ok(()),
            (BindTarget::Program, Some(Object::Program(p))) if p.linked => Ok(()),
            (BindTarget::Program, Some(Object::Program(_))) => Err(format!("program {handle} is not linked")),
            (BindTarget::ProgramPipeline, Some(Object::Pipeline(_))) => Ok(()),
            (BindTarget::VertexArray, Some(Object::VertexArray(_))) => Ok(()),
            (BindTarget::Texture(_), Some(Object::Texture(_))) => Ok(()),
            (_, Some(other)) => Err(format!("cannot bind a {} to {target:?}", other.kind_name())),
            (_, None) => Err(format!("{handle} is not a live object")),
        };
        match accepted {
            Ok(()) => {
                self.bound.insert(key, handle);
            }
            Err(text) => report(&mut self.messages, "glBind", text),
        }
    }

    fn buffer_data(&mut self, buffer: u32, data: &[u8], usage: BufferUsage) {
        self.calls.push(Call::BufferData { buffer, len: data.len(), usage });
        let Some(object) = self.buffer_mut(buffer, "glNamedBufferData") else { return };
        if object.immutable {
            report(&mut self.messages, "glNamedBufferData", format!("buffer {buffer} has immutable storage"));
            return;
        }
        object.data = data.to_vec();
    }

    fn buffer_storage(&mut self, buffer: u32, data: &[u8], flags: StorageFlags) {
        self.calls.push(Call::BufferStorage { buffer, len: data.len(), flags });
        let Some(object) = self.buffer_mut(buffer, "glNamedBufferStorage") else { return };
        if object.immutable {
            report(&mut self.messages, "glNamedBufferStorage", format!("buffer {buffer} has immutable storage"));
            return;
        }
        object.data = data.to_vec();
        object.immutable = true;
    }

    fn shader_source(&mut self, shader: u32, source: &str) {
        self.calls.push(Call::ShaderSource { shader });
        if let Some(object) = self.shader_mut(shader, "glShaderSource") {
            object.source = source.to_owned();
        }
    }

    fn compile_shader(&mut self, shader: u32) -> BuildStatus {
        let status = match self.shader_mut(shader, "glCompileShader") {
            Some(object) => match glsl::scan(&object.source) {
                Ok(uniforms) => {
                    object.compiled = true;
                    object.uniforms = uniforms;
                    BuildStatus::ok()
                }
                Err(log) => {
                    object.compiled = false;
                    object.uniforms.clear();
                    BuildStatus::failed(log)
                }
            },
            None => BuildStatus::failed(format!("{shader} is not a shader")),
        };
        self.calls.push(Call::CompileShader { shader, success: status.success });
        status
    }

    fn attach_shader(&mut self, program: u32, shader: u32) {
        self.calls.push(Call::AttachShader { program, shader });
        if self.shader_mut(shader, "glAttachShader").is_none() {
            return;
        }
        let Some(object) = self.program_mut(program, "glAttachShader") else { return };
        if object.attached.contains(&shader) {
            report(&mut self.messages, "glAttachShader", format!("shader {shader} is already attached to {program}"));
            return;
        }
        object.attached.push(shader);
        if let Some(s) = self.shader_mut(shader, "glAttachShader") {
            s.attachments += 1;
        }
    }

    fn detach_shader(&mut self, program: u32, shader: u32) {
        self.calls.push(Call::DetachShader { program, shader });
        let Some(object) = self.program_mut(program, "glDetachShader") else { return };
        match object.attached.iter().position(|&s| s == shader) {
            Some(index) => {
                object.attached.remove(index);
                self.release_shader(shader);
            }
            None => report(&mut self.messages, "glDetachShader", format!("shader {shader} is not attached to {program}")),
        }
    }

    fn program_separable(&mut self, program: u32, separable: bool) {
        self.calls.push(Call::ProgramSeparable { program, separable });
        if let Some(object) = self.program_mut(program, "glProgramParameteri") {
            object.separable = separable;
        }
    }

    fn link_program(&mut self, program: u32) -> BuildStatus {
        let result = match self.objects.get(&program) {
            Some(Object::Program(object)) => self.link(&object.attached),
            _ => Err(format!("{program} is not a program")),
        };
        let status = match result {
            Ok(uniforms) => {
                log::trace!("program {program} linked with {} active uniforms", uniforms.len());
                if let Some(object) = self.program_mut(program, "glLinkProgram") {
                    object.linked = true;
                    object.uniforms = uniforms;
                }
                BuildStatus::ok()
            }
            Err(log) => {
                if let Some(Object::Program(object)) = self.objects.get_mut(&program) {
                    object.linked = false;
                    object.uniforms.clear();
                }
                BuildStatus::failed(log)
            }
        };
        self.calls.push(Call::LinkProgram { program, success: status.success });
        status
    }

    fn uniform_location(&mut self, program: u32, name: &str) -> Option<i32> {
        self.calls.push(Call::UniformLocation { program, name: name.to_owned() });
        let object = self.program_mut(program, "glGetUniformLocation")?;
        if !object.linked {
            report(&mut self.messages, "glGetUniformLocation", format!("program {program} is not linked"));
            return None;
        }
        resolve_location(&object.uniforms, name)
    }

    fn program_uniform(&mut self, target: UniformTarget, write: UniformWrite<'_>) {
        let call = "glProgramUniform";
        self.calls.push(Call::ProgramUniform { target, entry_point: write.entry_point(), count: write.count() });
        if target.location == -1 {
            return;
        }

        let Some(object) = self.program_mut(target.program, call) else { return };
        if !object.linked {
            report(&mut self.messages, call, format!("program {} is not linked", target.program));
            return;
        }
        let found = object.uniforms.iter_mut().find_map(|u| u.element_at(target.location).map(|first| (u, first)));
        let Some((uniform, first)) = found else {
            report(&mut self.messages, call, format!("no uniform at location {}", target.location));
            return;
        };

        let shape = write.shape();
        if !shape_matches(shape, uniform.ty.element_type()) || write.kind() != uniform.ty.kind().wire_kind() {
            let text = format!("{} does not match `{}` {}", write.entry_point(), uniform.ty, uniform.name);
            report(&mut self.messages, call, text);
            return;
        }
        if uniform.ty.array_length().is_none() && write.count() > 1 {
            let text = format!("count {} for non-array uniform `{}`", write.count(), uniform.name);
            report(&mut self.messages, call, text);
            return;
        }

        let count = write.count().min(uniform.len() - first);
        match (&mut uniform.values, write.data()) {
            (WireData::Int(dst), WireSlice::Int(src)) => store(dst, src, first, count, shape),
            (WireData::UInt(dst), WireSlice::UInt(src)) => store(dst, src, first, count, shape),
            (WireData::Float(dst), WireSlice::Float(src)) => store(dst, src, first, count, shape),
            (WireData::Double(dst), WireSlice::Double(src)) => store(dst, src, first, count, shape),
            _ => {}
        }
        if uniform.ty.kind() == ElementKind::Bool {
            let n = shape.components();
            if let WireData::Int(values) = &mut uniform.values {
                for value in &mut values[first * n..(first + count) * n] {
                    *value = i32::from(*value != 0);
                }
            }
        }
    }

    fn get_uniform(&mut self, target: UniformTarget, out: WireSliceMut<'_>) {
        let call = "glGetUniform";
        self.calls.push(Call::GetUniform { target, len: out.len() });
        let Some(object) = self.program_mut(target.program, call) else { return };
        if !object.linked {
            report(&mut self.messages, call, format!("program {} is not linked", target.program));
            return;
        }
        let found = object.uniforms.iter().find_map(|u| u.element_at(target.location).map(|first| (u, first)));
        let Some((uniform, first)) = found else {
            report(&mut self.messages, call, format!("no uniform at location {}", target.location));
            return;
        };

        let start = first * uniform.ty.component_count();
        match (out, &uniform.values) {
            (WireSliceMut::Int(dst), WireData::Int(src)) => load(dst, &src[start..]),
            (WireSliceMut::UInt(dst), WireData::UInt(src)) => load(dst, &src[start..]),
            (WireSliceMut::Float(dst), WireData::Float(src)) => load(dst, &src[start..]),
            (WireSliceMut::Double(dst), WireData::Double(src)) => load(dst, &src[start..]),
            (out, values) => {
                let text = format!("{} read of {} uniform `{}`", out.kind().name(), values.kind().name(), uniform.name);
                report(&mut self.messages, call, text);
            }
        }
    }

    fn use_program_stages(&mut self, pipeline: u32, stages: ProgramStages, program: u32) {
        let call = "glUseProgramStages";
        self.calls.push(Call::UseProgramStages { pipeline, stages, program });
        if program != 0 {
            let Some(object) = self.program_mut(program, call) else { return };
            if !(object.linked && object.separable) {
                report(&mut self.messages, call, format!("program {program} is not a linked separable program"));
                return;
            }
        }
        let Some(object) = self.pipeline_mut(pipeline, call) else { return };
        for stage in ShaderStage::ALL.into_iter().filter(|s| stages.contains(s.stage_bit())) {
            if program == 0 {
                object.stages.remove(&stage);
            } else {
                object.stages.insert(stage, program);
            }
        }
    }

    fn enable_vertex_attrib(&mut self, vao: u32, location: u32) {
        let call = "glEnableVertexArrayAttrib";
        self.calls.push(Call::EnableVertexAttrib { vao, location });
        if let Some(attrib) = self.attrib_mut(vao, location, call) {
            attrib.enabled = true;
        }
    }

    fn vertex_attrib_format(&mut self, vao: u32, location: u32, format: AttribFormat) {
        let call = "glVertexArrayAttribFormat";
        self.calls.push(Call::VertexAttribFormat { vao, location, format });
        if !(1..=4).contains(&format.components) {
            report(&mut self.messages, call, format!("{} components", format.components));
            return;
        }
        if let Some(attrib) = self.attrib_mut(vao, location, call) {
            attrib.format = Some(format);
        }
    }

    fn vertex_attrib_binding(&mut self, vao: u32, location: u32, binding: u32) {
        self.calls.push(Call::VertexAttribBinding { vao, location, binding });
        if let Some(attrib) = self.attrib_mut(vao, location, "glVertexArrayAttribBinding") {
            attrib.binding = Some(binding);
        }
    }

    fn vertex_buffer(&mut self, vao: u32, binding: u32, buffer: u32, offset: usize, stride: u32) {
        let call = "glVertexArrayVertexBuffer";
        self.calls.push(Call::VertexBuffer { vao, binding, buffer, offset, stride });
        if buffer != 0 && self.buffer_mut(buffer, call).is_none() {
            return;
        }
        if let Some(object) = self.vertex_array_mut(vao, call) {
            object.buffers.insert(binding, VertexBufferBinding { buffer, offset, stride });
        }
    }

    fn max_vertex_attribs(&self) -> u32 {
        self.init.max_vertex_attribs
    }

    fn active_texture(&mut self, unit: u32) {
        self.calls.push(Call::ActiveTexture { unit });
        if unit >= self.init.max_texture_units {
            let text = format!("unit {unit} exceeds {} units", self.init.max_texture_units);
            report(&mut self.messages, "glActiveTexture", text);
            return;
        }
        self.active_unit = unit;
    }

    fn max_texture_units(&self) -> u32 {
        self.init.max_texture_units
    }

    fn texture_parameter(&mut self, texture: u32, parameter: TextureParameter) {
        self.calls.push(Call::TextureParameter { texture, parameter });
        let Some(object) = self.texture_mut(texture, "glTextureParameter") else { return };
        match object.parameters.iter_mut().find(|p| p.name() == parameter.name()) {
            Some(existing) => *existing = parameter,
            None => object.parameters.push(parameter),
        }
    }

    fn generate_mipmap(&mut self, texture: u32) {
        let call = "glGenerateTextureMipmap";
        self.calls.push(Call::GenerateMipmap { texture });
        let Some(object) = self.texture_mut(texture, call) else { return };
        if object.storage.is_none() && !object.levels.contains_key(&0) {
            report(&mut self.messages, call, format!("texture {texture} has no base level"));
            return;
        }
        object.mipmap_generations += 1;
    }

    fn texture_image(&mut self, texture: u32, image: TexImage<'_>) {
        let call = "glTexImage";
        self.calls.push(Call::TextureImage {
            texture,
            target: image.target,
            level: image.level,
            dimensions: image.dimensions.to_vec(),
        });
        let Some(object) = self.texture_mut(texture, call) else { return };
        if object.storage.is_some() {
            report(&mut self.messages, call, format!("texture {texture} has immutable storage"));
            return;
        }
        object.levels.insert(
            image.level,
            TextureLevel {
                target: image.target,
                internal_format: image.internal_format,
                format: image.format,
                pixel_type: image.pixel_type,
                dimensions: image.dimensions.to_vec(),
                data: image.data.to_vec(),
            },
        );
    }

    fn texture_storage_2d(&mut self, texture: u32, levels: u32, format: InternalFormat, width: u32, height: u32) {
        let call = "glTextureStorage2D";
        self.calls.push(Call::TextureStorage2D { texture, levels, format, width, height });
        let Some(object) = self.texture_mut(texture, call) else { return };
        if object.storage.is_some() {
            report(&mut self.messages, call, format!("texture {texture} has immutable storage"));
            return;
        }
        object.storage = Some(TextureStorage { levels });
    }
}

impl HeadlessGl {
    fn attrib_mut(&mut self, vao: u32, location: u32, call: &'static str) -> Option<&mut VertexAttribState> {
        if location >= self.init.max_vertex_attribs {
            let text = format!("location {location} exceeds {} attributes", self.init.max_vertex_attribs);
            report(&mut self.messages, call, text);
            return None;
        }
        Some(self.vertex_array_mut(vao, call)?.attribs.entry(location).or_default())
    }
}
