//! GPU object lifecycle.
//!
//! Every resource wraps a [`Handle`] that is 0 until `create` and back to 0
//! after `delete`. The shared rules:
//!
//! - `create` on a live object is a programmer error and panics.
//! - `delete` is idempotent; the second call makes no driver call.
//! - binding or using an object whose handle is 0 is an
//!   [`InvalidState`](crate::GlError::InvalidState) error and never reaches
//!   the driver.

mod buffer;
mod pipeline;
mod program;
mod shader;
mod texture;
mod uniform_cache;
mod vertex_array;
mod vertex_attribute;

pub use buffer::Buffer;
pub use pipeline::ProgramPipeline;
pub use program::Program;
pub use shader::{Shader, ShaderState};
pub use texture::{Texture, Texture2D};
pub use uniform_cache::UniformLocationCache;
pub use vertex_array::{BindingLayout, PlacedAttribute, VertexArray};
pub use vertex_attribute::{VertexAttribute, VertexFormat, VertexScalar};

use std::fmt;

use crate::api::{GraphicsApi, ObjectKind};
use crate::error::{GlError, Result};

/// Driver object name. `Handle::NONE` (0) means nothing is allocated.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Default)]
pub struct Handle(u32);

impl Handle {
    pub const NONE: Handle = Handle(0);

    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Capability shared by every GPU-resident object.
pub trait GlObject {
    fn handle(&self) -> Handle;

    /// Whether the object can be used: allocated, and compiled or linked for
    /// the kinds that need it.
    fn is_valid(&self) -> bool {
        !self.handle().is_none()
    }

    /// Allocates the driver object.
    ///
    /// # Panics
    ///
    /// If the object is already live.
    fn create(&mut self, gl: &mut dyn GraphicsApi) -> Result<()>;

    /// Frees the driver object and resets the handle to 0. Safe to repeat.
    fn delete(&mut self, gl: &mut dyn GraphicsApi);
}

/// Objects that can be made current on a binding slot.
///
/// Binding never changes the handle.
pub trait Bindable: GlObject {
    fn bind(&self, gl: &mut dyn GraphicsApi) -> Result<()>;
    fn unbind(&self, gl: &mut dyn GraphicsApi) -> Result<()>;
}

/// Handle bookkeeping shared by the concrete resources.
#[derive(Debug)]
pub(crate) struct Lifecycle {
    kind: ObjectKind,
    handle: Handle,
}

impl Lifecycle {
    pub(crate) const fn new(kind: ObjectKind) -> Self {
        Self { kind, handle: Handle::NONE }
    }

    #[inline]
    pub(crate) fn handle(&self) -> Handle {
        self.handle
    }

    #[inline]
    pub(crate) fn is_live(&self) -> bool {
        !self.handle.is_none()
    }

    pub(crate) fn create(&mut self, gl: &mut dyn GraphicsApi) -> Result<Handle> {
        assert!(
            self.handle.is_none(),
            "{} {} created twice without an intervening delete",
            self.kind.name(),
            self.handle
        );
        let raw = gl.create_object(self.kind);
        if raw == 0 {
            return Err(GlError::invalid_state(self.kind.name(), "driver returned handle 0"));
        }
        self.handle = Handle(raw);
        log::debug!("created {} {}", self.kind.name(), self.handle);
        Ok(self.handle)
    }

    /// Returns whether a driver object was actually freed.
    pub(crate) fn delete(&mut self, gl: &mut dyn GraphicsApi) -> bool {
        if self.handle.is_none() {
            return false;
        }
        gl.delete_object(self.kind, self.handle.get());
        log::debug!("deleted {} {}", self.kind.name(), self.handle);
        self.handle = Handle::NONE;
        true
    }

    /// Raw handle for a driver call, or an error naming the refused operation.
    pub(crate) fn require(&self, operation: &str) -> Result<u32> {
        if self.handle.is_none() {
            return Err(GlError::invalid_state(
                self.kind.name(),
                format!("cannot {operation}: handle is 0"),
            ));
        }
        Ok(self.handle.get())
    }
}
