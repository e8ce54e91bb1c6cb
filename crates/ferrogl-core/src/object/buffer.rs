use bytemuck::Pod;

use crate::api::{BindTarget, BufferTarget, BufferUsage, GraphicsApi, ObjectKind, StorageFlags};
use crate::error::{GlError, Result};

use super::{Bindable, GlObject, Handle, Lifecycle};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum BufferStore {
    Empty,
    Mutable(BufferUsage),
    Immutable(StorageFlags),
}

/// GPU memory block bound to one [`BufferTarget`].
///
/// The store is either mutable (`set_data`, any number of times) or
/// immutable (`set_storage`, once). Once immutable, the store stays fixed
/// until the buffer is deleted.
#[derive(Debug)]
pub struct Buffer {
    life: Lifecycle,
    target: BufferTarget,
    store: BufferStore,
    len: usize,
}

impl Buffer {
    pub const fn new(target: BufferTarget) -> Self {
        Self { life: Lifecycle::new(ObjectKind::Buffer), target, store: BufferStore::Empty, len: 0 }
    }

    #[inline]
    pub fn target(&self) -> BufferTarget {
        self.target
    }

    /// Size of the current store in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_immutable(&self) -> bool {
        matches!(self.store, BufferStore::Immutable(_))
    }

    pub fn usage(&self) -> Option<BufferUsage> {
        match self.store {
            BufferStore::Mutable(usage) => Some(usage),
            _ => None,
        }
    }

    pub fn storage_flags(&self) -> Option<StorageFlags> {
        match self.store {
            BufferStore::Immutable(flags) => Some(flags),
            _ => None,
        }
    }

    /// Replaces the mutable store with `data`.
    pub fn set_data<T: Pod>(&mut self, gl: &mut dyn GraphicsApi, data: &[T], usage: BufferUsage) -> Result<()> {
        let handle = self.life.require("upload data")?;
        if self.is_immutable() {
            return Err(GlError::invalid_state("buffer", "store is immutable after set_storage"));
        }
        let bytes: &[u8] = bytemuck::cast_slice(data);
        gl.buffer_data(handle, bytes, usage);
        self.store = BufferStore::Mutable(usage);
        self.len = bytes.len();
        Ok(())
    }

    /// Allocates the immutable store. Allowed once per created buffer.
    pub fn set_storage<T: Pod>(&mut self, gl: &mut dyn GraphicsApi, data: &[T], flags: StorageFlags) -> Result<()> {
        let handle = self.life.require("allocate storage")?;
        if self.is_immutable() {
            return Err(GlError::invalid_state("buffer", "immutable storage is already allocated"));
        }
        if let Some(rule) = flags.violation() {
            return Err(GlError::invalid_state("buffer", rule));
        }
        let bytes: &[u8] = bytemuck::cast_slice(data);
        gl.buffer_storage(handle, bytes, flags);
        self.store = BufferStore::Immutable(flags);
        self.len = bytes.len();
        Ok(())
    }
}

impl GlObject for Buffer {
    fn handle(&self) -> Handle {
        self.life.handle()
    }

    fn create(&mut self, gl: &mut dyn GraphicsApi) -> Result<()> {
        self.life.create(gl).map(|_| ())
    }

    fn delete(&mut self, gl: &mut dyn GraphicsApi) {
        if self.life.delete(gl) {
            self.store = BufferStore::Empty;
            self.len = 0;
        }
    }
}

impl Bindable for Buffer {
    fn bind(&self, gl: &mut dyn GraphicsApi) -> Result<()> {
        let handle = self.life.require("bind")?;
        gl.bind_object(BindTarget::Buffer(self.target), handle);
        Ok(())
    }

    fn unbind(&self, gl: &mut dyn GraphicsApi) -> Result<()> {
        self.life.require("unbind")?;
        gl.bind_object(BindTarget::Buffer(self.target), 0);
        Ok(())
    }
}
