use std::collections::{BTreeMap, HashSet};

use crate::api::{AttribFormat, BindTarget, GraphicsApi, ObjectKind};
use crate::error::{GlError, Result};

use super::{Bindable, Buffer, GlObject, Handle, Lifecycle, VertexAttribute};

/// An attribute with its byte offset inside the vertex record.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PlacedAttribute {
    pub attribute: VertexAttribute,
    pub relative_offset: u32,
}

/// Final layout of one binding point.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BindingLayout {
    pub binding: u32,
    /// Byte offset of the first vertex in the source buffer.
    pub base_offset: usize,
    pub stride: u32,
    pub attributes: Vec<PlacedAttribute>,
}

/// Vertex input layout: binding points and the attributes read from each.
///
/// Attribute declaration order inside a binding point fixes both the stride
/// and every relative offset.
#[derive(Debug)]
pub struct VertexArray {
    life: Lifecycle,
    binding_points: BTreeMap<u32, usize>,
    attributes: BTreeMap<u32, Vec<VertexAttribute>>,
}

impl VertexArray {
    pub const fn new() -> Self {
        Self {
            life: Lifecycle::new(ObjectKind::VertexArray),
            binding_points: BTreeMap::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Declares binding point `index` starting `base_offset` bytes into the buffer.
    pub fn add_binding_point(&mut self, index: u32, base_offset: usize) -> Result<()> {
        if self.binding_points.contains_key(&index) {
            return Err(GlError::invalid_state(
                "vertex array",
                format!("binding point {index} is already declared"),
            ));
        }
        self.binding_points.insert(index, base_offset);
        Ok(())
    }

    /// Appends `attribute` to the record layout of binding point `binding`.
    pub fn add_vertex_attribute(&mut self, binding: u32, attribute: VertexAttribute) {
        self.attributes.entry(binding).or_default().push(attribute);
    }

    pub fn binding_points(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        self.binding_points.iter().map(|(&index, &offset)| (index, offset))
    }

    pub fn attributes(&self, binding: u32) -> &[VertexAttribute] {
        self.attributes.get(&binding).map(Vec::as_slice).unwrap_or_default()
    }

    /// Computes stride and relative offsets for every binding point, in
    /// ascending binding order.
    ///
    /// Rejects an empty layout, a binding point without attributes,
    /// attributes for an undeclared binding point, and a location used twice
    /// anywhere in the vertex array.
    pub fn compute_layout(&self) -> Result<Vec<BindingLayout>> {
        if self.binding_points.is_empty() {
            return Err(GlError::invalid_state("vertex array", "no binding points declared"));
        }
        if let Some(binding) = self.attributes.keys().find(|b| !self.binding_points.contains_key(*b)) {
            return Err(GlError::invalid_state(
                "vertex array",
                format!("attributes declared for undeclared binding point {binding}"),
            ));
        }

        let mut seen = HashSet::new();
        let mut layouts = Vec::with_capacity(self.binding_points.len());
        for (&binding, &base_offset) in &self.binding_points {
            let attributes = self.attributes(binding);
            if attributes.is_empty() {
                return Err(GlError::invalid_state(
                    "vertex array",
                    format!("binding point {binding} has no attributes"),
                ));
            }

            let mut relative_offset = 0;
            let mut placed = Vec::with_capacity(attributes.len());
            for attribute in attributes {
                if !seen.insert(attribute.location()) {
                    return Err(GlError::invalid_state(
                        "vertex array",
                        format!("attribute location {} is declared twice", attribute.location()),
                    ));
                }
                placed.push(PlacedAttribute { attribute: *attribute, relative_offset });
                relative_offset += attribute.size();
            }

            layouts.push(BindingLayout { binding, base_offset, stride: relative_offset, attributes: placed });
        }
        Ok(layouts)
    }

    /// Finalises the input format and points every binding at `buffer`.
    ///
    /// Per attribute: enable, format, binding. Then the binding point's
    /// buffer, offset and stride. All validation happens before the first
    /// driver call.
    pub fn setup(&self, gl: &mut dyn GraphicsApi, buffer: &Buffer) -> Result<()> {
        let vao = self.life.require("set up")?;
        if buffer.handle().is_none() {
            return Err(GlError::invalid_state("buffer", "cannot source vertices: handle is 0"));
        }

        let layouts = self.compute_layout()?;
        let max = gl.max_vertex_attribs();
        if let Some(attribute) = layouts
            .iter()
            .flat_map(|l| &l.attributes)
            .find(|p| p.attribute.location() >= max)
        {
            return Err(GlError::invalid_state(
                "vertex array",
                format!("attribute location {} exceeds the limit of {max}", attribute.attribute.location()),
            ));
        }

        for layout in &layouts {
            for placed in &layout.attributes {
                let attribute = placed.attribute;
                gl.enable_vertex_attrib(vao, attribute.location());
                gl.vertex_attrib_format(
                    vao,
                    attribute.location(),
                    AttribFormat {
                        components: attribute.components(),
                        ty: attribute.ty(),
                        normalized: attribute.is_normalized(),
                        relative_offset: placed.relative_offset,
                    },
                );
                gl.vertex_attrib_binding(vao, attribute.location(), layout.binding);
            }
            gl.vertex_buffer(vao, layout.binding, buffer.handle().get(), layout.base_offset, layout.stride);
            log::trace!(
                "vertex array {} binding {}: stride {}, {} attributes",
                self.life.handle(),
                layout.binding,
                layout.stride,
                layout.attributes.len()
            );
        }
        log::debug!("vertex array {} set up with {} binding points", self.life.handle(), layouts.len());
        Ok(())
    }
}

impl Default for VertexArray {
    fn default() -> Self {
        Self::new()
    }
}

impl GlObject for VertexArray {
    fn handle(&self) -> Handle {
        self.life.handle()
    }

    /// Usable once it holds at least one binding point and one attribute.
    fn is_valid(&self) -> bool {
        self.life.is_live() && !self.binding_points.is_empty() && !self.attributes.is_empty()
    }

    fn create(&mut self, gl: &mut dyn GraphicsApi) -> Result<()> {
        self.life.create(gl).map(|_| ())
    }

    fn delete(&mut self, gl: &mut dyn GraphicsApi) {
        self.life.delete(gl);
    }
}

impl Bindable for VertexArray {
    fn bind(&self, gl: &mut dyn GraphicsApi) -> Result<()> {
        let vao = self.life.require("bind")?;
        if !self.is_valid() {
            return Err(GlError::invalid_state("vertex array", "cannot bind: no binding points or attributes"));
        }
        gl.bind_object(BindTarget::VertexArray, vao);
        Ok(())
    }

    fn unbind(&self, gl: &mut dyn GraphicsApi) -> Result<()> {
        self.life.require("unbind")?;
        gl.bind_object(BindTarget::VertexArray, 0);
        Ok(())
    }
}
